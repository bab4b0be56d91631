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

//! Constraint scheduling engine for the SMT assembly scheduler.
//!
//! The pipeline runs leaves-first: the lot-splitting planner expands
//! products into work units, the solver model flattens (work unit,
//! routing step) pairs into an indexed task table with per-line
//! processing times and precedence links, the branch-and-bound search
//! assigns every task a line and a start minute under no-overlap,
//! precedence, transfer and deadline constraints while minimizing the
//! makespan, and the decoder turns the assignment back into dated task
//! records with statistics. [`engine::SchedulerEngine`] orchestrates the
//! whole call behind a single `solve(time_limit)` entry point.

pub mod decode;
pub mod engine;
pub mod model;
pub mod plan;
pub mod prelude;
pub mod search;
