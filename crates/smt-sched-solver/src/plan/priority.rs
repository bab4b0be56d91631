// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use smt_sched_model::prelude::Product;
use std::cmp::Ordering;

/// Orders products before model construction.
///
/// Priority weighting is applied here, by ordering, and nowhere else:
/// the solver's objective stays the scalar makespan. The sort is stable,
/// so callers that pre-group products keep their relative order within
/// equal keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrioritySorter;

impl PrioritySorter {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Sort key: priority class rank, then due date, then release date,
    /// then id.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        a.priority()
            .rank()
            .cmp(&b.priority().rank())
            .then_with(|| a.due().cmp(&b.due()))
            .then_with(|| a.release().cmp(&b.release()))
            .then_with(|| a.id().cmp(b.id()))
    }

    pub fn sort<'p>(&self, products: &mut Vec<&'p Product>) {
        products.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use smt_sched_model::prelude::{PriorityClass, ProductId};

    fn product(id: &str, priority: PriorityClass, due_day: u32) -> Product {
        let release = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let due = NaiveDate::from_ymd_opt(2025, 6, due_day)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap();
        Product::new(ProductId::from(id), id, 100, release, due)
            .unwrap()
            .with_priority(priority)
    }

    #[test]
    fn test_priority_class_dominates() {
        let low_early = product("A", PriorityClass::Low, 3);
        let critical_late = product("B", PriorityClass::Critical, 27);

        let mut products = vec![&low_early, &critical_late];
        PrioritySorter::new().sort(&mut products);
        let ids: Vec<_> = products.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_due_date_breaks_priority_ties() {
        let late = product("A", PriorityClass::Standard, 27);
        let early = product("B", PriorityClass::Standard, 5);

        let mut products = vec![&late, &early];
        PrioritySorter::new().sort(&mut products);
        let ids: Vec<_> = products.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_id_is_the_final_tiebreak() {
        let b = product("B", PriorityClass::Standard, 5);
        let a = product("A", PriorityClass::Standard, 5);

        let mut products = vec![&b, &a];
        PrioritySorter::new().sort(&mut products);
        let ids: Vec<_> = products.iter().map(|p| p.id().as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }
}
