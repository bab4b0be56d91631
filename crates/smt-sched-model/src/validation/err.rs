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

use crate::common::{ProductId, StageId};

/// One structural defect found before model construction.
///
/// Any of these makes the input unschedulable; the engine reports them as
/// failure reasons of an `InvalidInput` result instead of building a
/// model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The stage catalog is empty.
    NoStages,
    /// No line is active.
    NoActiveLines,
    /// A routed stage of a product has no active line that both supports
    /// the stage and passes the step's allowed-line filter.
    NoCandidateLine { product: ProductId, stage: StageId },
    /// A product's `[release, due]` window contains no working day.
    NoWorkingDaysInWindow { product: ProductId },
    /// A lot-split config can never produce a valid batch list.
    InvalidLotConfig {
        product: ProductId,
        stage: Option<StageId>,
        reason: String,
    },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::NoStages => write!(f, "No stages are configured"),
            ValidationIssue::NoActiveLines => write!(f, "No production line is active"),
            ValidationIssue::NoCandidateLine { product, stage } => write!(
                f,
                "Product {} has no candidate line at stage {}",
                product, stage
            ),
            ValidationIssue::NoWorkingDaysInWindow { product } => write!(
                f,
                "Product {} has no working day between release and due date",
                product
            ),
            ValidationIssue::InvalidLotConfig {
                product,
                stage,
                reason,
            } => match stage {
                Some(stage) => write!(
                    f,
                    "Lot config of product {} at stage {} is invalid: {}",
                    product, stage, reason
                ),
                None => write!(
                    f,
                    "Lot config of product {} is invalid: {}",
                    product, reason
                ),
            },
        }
    }
}

impl std::error::Error for ValidationIssue {}
