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

use crate::problem::calendar::WorkCalendar;
use crate::problem::err::{
    DuplicateProductError, ProblemBuildError, UnknownLineError, UnknownStageError,
};
use crate::problem::flags::FeatureFlags;
use crate::problem::line::{Line, LineFleet};
use crate::problem::prob::Problem;
use crate::problem::product::Product;
use crate::problem::routing::RoutingCatalog;
use crate::problem::stage::{Stage, StageCatalog};
use crate::problem::transfer::{LineTransferMatrix, StageTransferMatrix};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Assembles a [`Problem`], checking referential integrity at
/// [`build`](ProblemBuilder::build): line capabilities, routing steps,
/// allowed-line filters and lot configs may only reference declared
/// stages and lines, and product ids must be unique.
#[derive(Debug)]
pub struct ProblemBuilder {
    stages: StageCatalog,
    lines: LineFleet,
    products: Vec<Product>,
    routings: RoutingCatalog,
    calendar: WorkCalendar,
    stage_transfers: StageTransferMatrix,
    line_transfers: LineTransferMatrix,
    reference_date: NaiveDate,
    flags: FeatureFlags,
}

impl ProblemBuilder {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            stages: StageCatalog::new(),
            lines: LineFleet::new(),
            products: Vec::new(),
            routings: RoutingCatalog::new(1.0),
            calendar: WorkCalendar::default(),
            stage_transfers: StageTransferMatrix::zero(),
            line_transfers: LineTransferMatrix::zero(),
            reference_date,
            flags: FeatureFlags::default(),
        }
    }

    #[inline]
    pub fn with_stage(mut self, stage: Stage) -> Result<Self, ProblemBuildError> {
        self.stages.insert(stage)?;
        Ok(self)
    }

    #[inline]
    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.insert(line);
        self
    }

    #[inline]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    #[inline]
    pub fn with_routings(mut self, routings: RoutingCatalog) -> Self {
        self.routings = routings;
        self
    }

    #[inline]
    pub fn with_calendar(mut self, calendar: WorkCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    #[inline]
    pub fn with_stage_transfers(mut self, matrix: StageTransferMatrix) -> Self {
        self.stage_transfers = matrix;
        self
    }

    #[inline]
    pub fn with_line_transfers(mut self, matrix: LineTransferMatrix) -> Self {
        self.line_transfers = matrix;
        self
    }

    #[inline]
    pub fn with_flags(mut self, flags: FeatureFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn build(self) -> Result<Problem, ProblemBuildError> {
        // Line capabilities must reference declared stages.
        for line in self.lines.iter() {
            for (stage, _) in line.iter_capabilities() {
                if !self.stages.contains_id(stage) {
                    return Err(UnknownStageError::new(
                        stage,
                        format!("Capability of line {}", line.id()),
                    )
                    .into());
                }
            }
        }

        // Product ids must be unique; lot configs must reference declared
        // stages.
        let mut seen = BTreeSet::new();
        for product in &self.products {
            if !seen.insert(product.id().clone()) {
                return Err(DuplicateProductError::new(product.id().clone()).into());
            }
            for (stage, _) in product.iter_stage_lot_configs() {
                if !self.stages.contains_id(stage) {
                    return Err(UnknownStageError::new(
                        stage,
                        format!("Lot config of product {}", product.id()),
                    )
                    .into());
                }
            }
        }

        // Configured routings must reference declared stages and lines.
        for (product, routing) in self.routings.iter() {
            for step in routing.steps() {
                if !self.stages.contains_id(step.stage()) {
                    return Err(UnknownStageError::new(
                        step.stage(),
                        format!("Routing of product {}", product),
                    )
                    .into());
                }
                if let Some(filtered) = step.allowed_lines_iter() {
                    for line in filtered {
                        if !self.lines.contains_id(line) {
                            return Err(UnknownLineError::new(
                                line.clone(),
                                format!("Routing of product {}", product),
                            )
                            .into());
                        }
                    }
                }
            }
        }

        Ok(Problem {
            stages: self.stages,
            lines: self.lines,
            products: self.products,
            routings: self.routings,
            calendar: self.calendar,
            stage_transfers: self.stage_transfers,
            line_transfers: self.line_transfers,
            reference_date: self.reference_date,
            flags: self.flags,
        })
    }
}
