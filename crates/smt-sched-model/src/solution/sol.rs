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

use crate::common::{LineId, ProductId, StageId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Terminal status of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleStatus {
    /// The solver proved the returned schedule optimal.
    Optimal,
    /// A schedule was found but optimality was not proven within the
    /// budget.
    Feasible,
    /// The solver proved no schedule exists.
    Infeasible,
    /// The budget ran out before any schedule was found.
    Timeout,
    /// Structural input errors were found before model construction.
    InvalidInput,
    /// Every product's required quantity is zero.
    NoProductionNeeded,
    /// An internal consistency error (e.g. a calendar walk past its
    /// horizon guard) aborted the call.
    Error,
}

impl ScheduleStatus {
    /// `true` when the result carries a usable schedule.
    #[inline]
    pub fn has_schedule(&self) -> bool {
        matches!(self, ScheduleStatus::Optimal | ScheduleStatus::Feasible)
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScheduleStatus::Optimal => "Optimal",
            ScheduleStatus::Feasible => "Feasible",
            ScheduleStatus::Infeasible => "Infeasible",
            ScheduleStatus::Timeout => "Timeout",
            ScheduleStatus::InvalidInput => "InvalidInput",
            ScheduleStatus::NoProductionNeeded => "NoProductionNeeded",
            ScheduleStatus::Error => "Error",
        };
        write!(f, "{}", s)
    }
}

/// One scheduled (work unit, stage) placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub product: ProductId,
    /// Name shown for the product at this stage.
    pub display_name: String,
    pub stage: StageId,
    pub stage_order: u32,
    pub stage_name: String,
    pub line: LineId,
    pub line_name: String,
    pub quantity: u32,
    /// Start coordinate on the working-minute axis.
    pub start_minute: i64,
    /// End coordinate on the working-minute axis; `end - start` equals
    /// `processing_minutes`.
    pub end_minute: i64,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub processing_minutes: i64,
    /// Stage-to-stage transfer consumed before this task started.
    pub stage_transfer_minutes: i64,
    /// Line-to-line transfer consumed before this task started.
    pub line_transfer_minutes: i64,
    /// Product of the previous task on the same line, when any; a change
    /// of product marks a changeover.
    pub previous_product_on_line: Option<ProductId>,
    pub batch: u32,
    pub total_batches: u32,
}

/// A product that finishes after its due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissedDeadline {
    pub product: ProductId,
    pub due: NaiveDateTime,
    pub finished_at: NaiveDateTime,
    pub working_days_late: u32,
}

/// Post-hoc capacity explanation attached to infeasible results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityAnalysis {
    pub product: ProductId,
    /// Floor on the product's processing need, summed over its routing.
    pub min_required_minutes: i64,
    /// Working minutes available between release and due date.
    pub available_minutes: i64,
    pub feeder_slots_required: u32,
    pub fleet_max_feeder_slots: u32,
}

impl CapacityAnalysis {
    #[inline]
    pub fn is_over_time_budget(&self) -> bool {
        self.min_required_minutes > self.available_minutes
    }

    #[inline]
    pub fn is_over_feeder_limit(&self) -> bool {
        self.feeder_slots_required > self.fleet_max_feeder_slots
    }
}

/// Busy share of one line within the makespan window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineUtilization {
    pub line: LineId,
    pub busy_minutes: i64,
    pub available_minutes: i64,
    /// `busy / available`, 0 when nothing was available.
    pub utilization: f64,
}

/// Required versus available minutes of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLoad {
    pub stage: StageId,
    pub stage_name: String,
    pub required_minutes: i64,
    pub available_minutes: i64,
    pub bottleneck: bool,
}

/// Product switches per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeoverStats {
    pub line: LineId,
    pub changeovers: u32,
}

/// Everything a solve call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub status: ScheduleStatus,
    pub makespan_minutes: i64,
    pub solve_time_ms: u64,
    pub plan_start: Option<NaiveDateTime>,
    pub expected_completion: Option<NaiveDateTime>,
    pub tasks: Vec<TaskRecord>,
    pub missed_deadlines: Vec<MissedDeadline>,
    pub capacity_analyses: Vec<CapacityAnalysis>,
    pub line_utilizations: Vec<LineUtilization>,
    pub stage_loads: Vec<StageLoad>,
    pub changeover_stats: Vec<ChangeoverStats>,
    pub failure_reasons: Vec<String>,
    pub warnings: Vec<String>,
}

impl ScheduleResult {
    /// An empty result shell with the given status.
    pub fn empty(status: ScheduleStatus) -> Self {
        Self {
            status,
            makespan_minutes: 0,
            solve_time_ms: 0,
            plan_start: None,
            expected_completion: None,
            tasks: Vec::new(),
            missed_deadlines: Vec::new(),
            capacity_analyses: Vec::new(),
            line_utilizations: Vec::new(),
            stage_loads: Vec::new(),
            changeover_stats: Vec::new(),
            failure_reasons: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn invalid_input(reasons: Vec<String>) -> Self {
        let mut result = Self::empty(ScheduleStatus::InvalidInput);
        result.failure_reasons = reasons;
        result
    }

    pub fn no_production_needed() -> Self {
        Self::empty(ScheduleStatus::NoProductionNeeded)
    }

    pub fn internal_error(reason: impl Into<String>) -> Self {
        let mut result = Self::empty(ScheduleStatus::Error);
        result.failure_reasons.push(reason.into());
        result
    }

    /// Tasks of one product, in start order.
    pub fn tasks_of(&self, product: &ProductId) -> Vec<&TaskRecord> {
        let mut tasks: Vec<_> = self.tasks.iter().filter(|t| &t.product == product).collect();
        tasks.sort_by_key(|t| (t.start_minute, t.stage_order, t.batch));
        tasks
    }

    /// Tasks on one line, in start order.
    pub fn tasks_on(&self, line: &LineId) -> Vec<&TaskRecord> {
        let mut tasks: Vec<_> = self.tasks.iter().filter(|t| &t.line == line).collect();
        tasks.sort_by_key(|t| t.start_minute);
        tasks
    }
}
