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

pub mod err;

use crate::problem::lot::{LotConfig, LotStrategy};
use crate::problem::prob::Problem;
use crate::problem::product::Product;
pub use err::ValidationIssue;

/// Outcome of the structural pre-solve checks.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    errors: Vec<ValidationIssue>,
    warnings: Vec<String>,
}

impl ValidationReport {
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    #[inline]
    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    #[inline]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    #[inline]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

/// Checks the structural prerequisites of a solve call.
///
/// This runs before any model construction. A failing report maps to an
/// `InvalidInput` result carrying the error messages; warnings ride along
/// on successful results.
pub fn validate(problem: &Problem) -> ValidationReport {
    let mut report = ValidationReport::default();

    if problem.stages().is_empty() {
        report.errors.push(ValidationIssue::NoStages);
    }
    if problem.lines().iter_active().next().is_none() {
        report.errors.push(ValidationIssue::NoActiveLines);
    }
    // The remaining checks are per product and meaningless without stages
    // or lines.
    if !report.is_ok() {
        return report;
    }

    for product in problem.products() {
        if product.required_qty() == 0 {
            report
                .warnings
                .push(format!("Product {} needs no production", product.id()));
            continue;
        }

        validate_candidates(problem, product, &mut report);
        validate_window(problem, product, &mut report);
        validate_lot_configs(product, &mut report);
    }

    report
}

/// Every routed stage must have at least one candidate line: active,
/// supporting the stage, and admitted by the step filter.
fn validate_candidates(problem: &Problem, product: &Product, report: &mut ValidationReport) {
    let routing = problem.routings().resolve(
        product.id(),
        problem.stages(),
        problem.flags().enable_custom_routing,
    );
    for step in routing.steps() {
        let has_candidate = problem
            .lines()
            .iter_active_supporting(step.stage())
            .any(|line| step.admits(line.id()));
        if !has_candidate {
            report.errors.push(ValidationIssue::NoCandidateLine {
                product: product.id().clone(),
                stage: step.stage(),
            });
        }
    }
}

/// The `[release, due]` window must contain at least one working day.
fn validate_window(problem: &Problem, product: &Product, report: &mut ValidationReport) {
    let calendar = problem.calendar();
    let mut day = product.release().date();
    let until = product.due().date();
    let mut found = false;
    while day <= until {
        if calendar.is_working_day(day, None) {
            found = true;
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    if !found {
        report.errors.push(ValidationIssue::NoWorkingDaysInWindow {
            product: product.id().clone(),
        });
    }
}

fn validate_lot_configs(product: &Product, report: &mut ValidationReport) {
    let mut check = |config: &LotConfig, stage| {
        let reason = match config.strategy {
            LotStrategy::FixedQuantity(0) => Some("fixed batch quantity is zero"),
            LotStrategy::FixedBatches(0) => Some("fixed batch count is zero"),
            LotStrategy::Percentage(0) => Some("batch percentage is zero"),
            LotStrategy::Percentage(p) if p > 100 => Some("batch percentage exceeds 100"),
            _ => None,
        };
        if let Some(reason) = reason {
            report.errors.push(ValidationIssue::InvalidLotConfig {
                product: product.id().clone(),
                stage,
                reason: reason.to_owned(),
            });
        }
    };

    for (stage, config) in product.iter_stage_lot_configs() {
        check(config, Some(stage));
    }
    if let Some(config) = product.product_lot_config() {
        check(config, None);
    }
}
