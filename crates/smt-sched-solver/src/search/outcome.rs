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

use crate::model::LineIndex;

/// One task's placement in a complete schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub line: LineIndex,
    pub start: i64,
    pub end: i64,
}

/// A complete assignment found by the search, indexed by task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSolution {
    pub placements: Vec<Placement>,
    /// Makespan over the final tasks.
    pub objective: i64,
}

/// Terminal state of a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The tree was exhausted; the incumbent is optimal.
    Optimal(SearchSolution),
    /// The budget ran out; the incumbent is the best known schedule.
    Feasible(SearchSolution),
    /// The tree was exhausted without any complete schedule.
    Infeasible,
    /// The budget ran out before any complete schedule was found.
    ResourcesExhausted,
}

impl SearchOutcome {
    #[inline]
    pub fn solution(&self) -> Option<&SearchSolution> {
        match self {
            SearchOutcome::Optimal(sol) | SearchOutcome::Feasible(sol) => Some(sol),
            _ => None,
        }
    }

    #[inline]
    pub fn is_proven(&self) -> bool {
        matches!(self, SearchOutcome::Optimal(_) | SearchOutcome::Infeasible)
    }
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchOutcome::Optimal(sol) => write!(f, "Optimal(objective: {})", sol.objective),
            SearchOutcome::Feasible(sol) => write!(f, "Feasible(objective: {})", sol.objective),
            SearchOutcome::Infeasible => write!(f, "Infeasible"),
            SearchOutcome::ResourcesExhausted => write!(f, "ResourcesExhausted"),
        }
    }
}
