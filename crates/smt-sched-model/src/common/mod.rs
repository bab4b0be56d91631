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

use serde::{Deserialize, Serialize};

pub trait IdentifierMarkerName: Copy {
    const NAME: &'static str;
}

/// A phantom-tagged identifier.
///
/// Stage, line and product ids share the same wrapper but are distinct
/// types; passing a `LineId` where a `StageId` is expected is a compile
/// error. The inner value is the externally supplied id, never an index.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier<I, U>(I, #[serde(skip)] core::marker::PhantomData<U>);

impl<I, U> Identifier<I, U> {
    #[inline]
    pub fn new(id: I) -> Self {
        Self(id, core::marker::PhantomData)
    }

    #[inline]
    pub fn value(&self) -> &I {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> I {
        self.0
    }
}

impl<U> Identifier<String, U> {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<U> From<&str> for Identifier<String, U> {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s.to_owned())
    }
}

impl<I, U> std::fmt::Display for Identifier<I, U>
where
    I: std::fmt::Display,
    U: IdentifierMarkerName,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME, self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageIdMarker;

impl IdentifierMarkerName for StageIdMarker {
    const NAME: &'static str = "StageId";
}

/// Identifier of a production stage.
pub type StageId = Identifier<u32, StageIdMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineIdMarker;

impl IdentifierMarkerName for LineIdMarker {
    const NAME: &'static str = "LineId";
}

/// Identifier of a production line.
pub type LineId = Identifier<String, LineIdMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductIdMarker;

impl IdentifierMarkerName for ProductIdMarker {
    const NAME: &'static str = "ProductId";
}

/// Identifier of a product (an order position to schedule).
pub type ProductId = Identifier<String, ProductIdMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_marker_name() {
        assert_eq!(format!("{}", StageId::new(3)), "StageId(3)");
        assert_eq!(format!("{}", LineId::from("SMT-1")), "LineId(SMT-1)");
        assert_eq!(format!("{}", ProductId::from("PCB-A")), "ProductId(PCB-A)");
    }

    #[test]
    fn test_string_id_accessors() {
        let id = LineId::from("SMT-1");
        assert_eq!(id.as_str(), "SMT-1");
        assert_eq!(id.clone().into_inner(), "SMT-1".to_owned());
    }

    #[test]
    fn test_ids_are_ordered_and_hashable() {
        use std::collections::BTreeSet;
        let set: BTreeSet<StageId> = [StageId::new(2), StageId::new(1)].into_iter().collect();
        assert_eq!(set.iter().next(), Some(&StageId::new(1)));
    }
}
