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

use crate::common::ProductId;
use crate::problem::calendar::WorkCalendar;
use crate::problem::flags::FeatureFlags;
use crate::problem::line::LineFleet;
use crate::problem::product::Product;
use crate::problem::routing::RoutingCatalog;
use crate::problem::stage::StageCatalog;
use crate::problem::transfer::{LineTransferMatrix, StageTransferMatrix};
use chrono::NaiveDate;

/// The complete read-only input of one solve call.
///
/// Constructed through [`ProblemBuilder`](crate::problem::builder::ProblemBuilder),
/// which performs the cross-entity referential checks. The solver holds
/// this by shared reference for the duration of a call and never mutates
/// it; parallel solve calls must use independent instances.
#[derive(Debug, Clone)]
pub struct Problem {
    pub(crate) stages: StageCatalog,
    pub(crate) lines: LineFleet,
    pub(crate) products: Vec<Product>,
    pub(crate) routings: RoutingCatalog,
    pub(crate) calendar: WorkCalendar,
    pub(crate) stage_transfers: StageTransferMatrix,
    pub(crate) line_transfers: LineTransferMatrix,
    pub(crate) reference_date: NaiveDate,
    pub(crate) flags: FeatureFlags,
}

impl Problem {
    #[inline]
    pub fn stages(&self) -> &StageCatalog {
        &self.stages
    }

    #[inline]
    pub fn lines(&self) -> &LineFleet {
        &self.lines
    }

    /// Products in input order. The solver applies priority ordering on
    /// top of this; callers that pre-group products simply pass them in
    /// the grouped order.
    #[inline]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[inline]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    #[inline]
    pub fn routings(&self) -> &RoutingCatalog {
        &self.routings
    }

    #[inline]
    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    #[inline]
    pub fn stage_transfers(&self) -> &StageTransferMatrix {
        &self.stage_transfers
    }

    #[inline]
    pub fn line_transfers(&self) -> &LineTransferMatrix {
        &self.line_transfers
    }

    /// The zero of the working-minute axis.
    #[inline]
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    #[inline]
    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    /// Total units that need production across all products.
    #[inline]
    pub fn total_required_qty(&self) -> u64 {
        self.products
            .iter()
            .map(|p| u64::from(p.required_qty()))
            .sum()
    }
}
