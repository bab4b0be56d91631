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

use smt_sched_model::prelude::{ProductId, StageId};

/// A (product, stage) pair ended up with no line that supports the stage
/// and passes the routing step's allowed-line filter. The model cannot
/// express an exactly-one line choice for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoCandidateLineError {
    product: ProductId,
    stage: StageId,
}

impl NoCandidateLineError {
    pub fn new(product: ProductId, stage: StageId) -> Self {
        Self { product, stage }
    }

    pub fn product(&self) -> &ProductId {
        &self.product
    }

    pub fn stage(&self) -> StageId {
        self.stage
    }
}

impl std::fmt::Display for NoCandidateLineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Product {} has no candidate line at stage {}",
            self.product, self.stage
        )
    }
}

impl std::error::Error for NoCandidateLineError {}

/// Errors raised while flattening a problem into the solver model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SolverModelBuildError {
    NoCandidateLine(NoCandidateLineError),
}

impl std::fmt::Display for SolverModelBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverModelBuildError::NoCandidateLine(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SolverModelBuildError {}

impl From<NoCandidateLineError> for SolverModelBuildError {
    fn from(err: NoCandidateLineError) -> Self {
        SolverModelBuildError::NoCandidateLine(err)
    }
}
