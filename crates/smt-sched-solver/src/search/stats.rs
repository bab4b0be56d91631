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

use std::time::Duration;

/// Counters of one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    nodes_explored: u64,
    backtracks: u64,
    pruned_by_bound: u64,
    solutions_found: u64,
    total_time: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored += 1;
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks += 1;
    }

    #[inline]
    pub fn on_pruned_by_bound(&mut self) {
        self.pruned_by_bound += 1;
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found += 1;
    }

    #[inline]
    pub fn set_total_time(&mut self, time: Duration) {
        self.total_time = time;
    }

    #[inline]
    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    #[inline]
    pub fn backtracks(&self) -> u64 {
        self.backtracks
    }

    #[inline]
    pub fn pruned_by_bound(&self) -> u64 {
        self.pruned_by_bound
    }

    #[inline]
    pub fn solutions_found(&self) -> u64 {
        self.solutions_found
    }

    #[inline]
    pub fn total_time(&self) -> Duration {
        self.total_time
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStatistics(nodes: {}, backtracks: {}, pruned: {}, solutions: {}, time: {:?})",
            self.nodes_explored,
            self.backtracks,
            self.pruned_by_bound,
            self.solutions_found,
            self.total_time
        )
    }
}
