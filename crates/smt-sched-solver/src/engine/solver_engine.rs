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

use crate::decode::{capacity_analyses, Decoder};
use crate::engine::config::EngineConfig;
use crate::model::SolverModel;
use crate::plan::priority::PrioritySorter;
use crate::search::{BnbSearch, SearchConfig, SearchOutcome};
use smt_sched_model::prelude::{
    validate, Problem, Product, ScheduleResult, ScheduleStatus,
};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Phases of one solve call. `Failed` is terminal and carries its
/// reasons in the returned result; nothing is reused across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolvePhase {
    Init,
    Validated,
    Planned,
    Modeled,
    Solving,
    Decoded,
    Failed,
}

impl std::fmt::Display for SolvePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolvePhase::Init => "Init",
            SolvePhase::Validated => "Validated",
            SolvePhase::Planned => "Planned",
            SolvePhase::Modeled => "Modeled",
            SolvePhase::Solving => "Solving",
            SolvePhase::Decoded => "Decoded",
            SolvePhase::Failed => "Failed",
        };
        write!(f, "{}", s)
    }
}

/// The orchestrator: owns the problem for the duration of a call and
/// exposes the single public entry point [`solve`](Self::solve).
///
/// The engine is single-threaded and blocking; the only cancellation
/// channel is the time budget handed to `solve`. Retries are never
/// automatic — callers re-invoke with changed inputs if desired.
pub struct SchedulerEngine {
    problem: Problem,
    config: EngineConfig,
}

impl SchedulerEngine {
    #[inline]
    pub fn new(problem: Problem) -> Self {
        Self {
            problem,
            config: EngineConfig::default(),
        }
    }

    #[inline]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Computes a schedule within the given wall-clock budget.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn solve(&self, time_limit: Duration) -> ScheduleResult {
        let started = Instant::now();
        let mut phase = SolvePhase::Init;
        info!(%phase, "solve started");

        // Validated: structural prerequisites.
        let report = validate(&self.problem);
        if !report.is_ok() {
            phase = SolvePhase::Failed;
            warn!(%phase, errors = report.errors().len(), "input validation failed");
            let mut result = ScheduleResult::invalid_input(report.error_messages());
            result.warnings = report.warnings().to_vec();
            return finalize(result, started);
        }
        phase = SolvePhase::Validated;
        let mut warnings = report.warnings().to_vec();

        if self.problem.total_required_qty() == 0 {
            info!(%phase, "all products are covered by stock");
            let mut result = ScheduleResult::no_production_needed();
            result.warnings = warnings;
            return finalize(result, started);
        }

        // Planned: priority ordering and work-unit materialization (the
        // planner proper runs inside the model build, unit by unit).
        let mut ordered: Vec<&Product> = self.problem.products().iter().collect();
        if self.problem.flags().enable_priority_scheduling {
            PrioritySorter::new().sort(&mut ordered);
            warnings.push(format!(
                "Priority ordering applied to {} products",
                ordered.len()
            ));
        }
        phase = SolvePhase::Planned;
        info!(%phase, products = ordered.len(), "products ordered");

        let model = match SolverModel::build(&self.problem, &ordered) {
            Ok(model) => model,
            Err(err) => {
                phase = SolvePhase::Failed;
                warn!(%phase, %err, "model construction failed");
                let mut result = ScheduleResult::invalid_input(vec![err.to_string()]);
                result.warnings = warnings;
                return finalize(result, started);
            }
        };
        phase = SolvePhase::Modeled;
        info!(
            %phase,
            tasks = model.num_tasks(),
            lines = model.num_lines(),
            horizon = model.horizon(),
            "model constructed"
        );

        let split_tasks = model
            .tasks()
            .iter()
            .filter(|t| t.total_batches > 1)
            .count();
        if split_tasks > 0 {
            warnings.push(format!(
                "Lot splitting materialized {} batched tasks",
                split_tasks
            ));
        }

        // Solving.
        phase = SolvePhase::Solving;
        let search_config = SearchConfig {
            time_limit: remaining_budget(time_limit, started),
            seed: self.config.seed,
            node_limit: self.config.node_limit,
        };
        let (outcome, stats) = BnbSearch::new(&model, search_config).run();
        info!(%phase, outcome = %outcome, %stats, "search finished");
        let proven = matches!(&outcome, SearchOutcome::Optimal(_));

        let mut result = match outcome {
            SearchOutcome::Optimal(solution) | SearchOutcome::Feasible(solution) => {
                match Decoder::new(&self.problem, &model).decode(&solution) {
                    Ok(decoded) => {
                        phase = SolvePhase::Decoded;
                        let status = if proven {
                            ScheduleStatus::Optimal
                        } else {
                            ScheduleStatus::Feasible
                        };
                        let mut result = ScheduleResult::empty(status);
                        result.makespan_minutes = solution.objective;
                        result.plan_start = decoded.plan_start;
                        result.expected_completion = decoded.expected_completion;
                        result.tasks = decoded.tasks;
                        result.line_utilizations = decoded.line_utilizations;
                        result.changeover_stats = decoded.changeover_stats;
                        for load in &decoded.stage_loads {
                            if load.bottleneck {
                                warnings.push(format!(
                                    "Stage {} is a bottleneck: {} required vs {} available minutes",
                                    load.stage_name, load.required_minutes, load.available_minutes
                                ));
                            }
                        }
                        result.stage_loads = decoded.stage_loads;
                        if !decoded.missed_deadlines.is_empty() {
                            warnings.push(format!(
                                "{} products miss their due date",
                                decoded.missed_deadlines.len()
                            ));
                        }
                        result.missed_deadlines = decoded.missed_deadlines;
                        result
                    }
                    Err(err) => {
                        phase = SolvePhase::Failed;
                        warn!(%phase, %err, "decoding failed");
                        ScheduleResult::internal_error(err.to_string())
                    }
                }
            }
            SearchOutcome::Infeasible => {
                phase = SolvePhase::Failed;
                let analyses = capacity_analyses(&self.problem, &model);
                let mut reasons = Vec::new();
                for analysis in &analyses {
                    if analysis.is_over_time_budget() {
                        reasons.push(format!(
                            "Product {} needs at least {} working minutes but only {} are available between release and due date",
                            analysis.product,
                            analysis.min_required_minutes,
                            analysis.available_minutes
                        ));
                    }
                    if analysis.is_over_feeder_limit() {
                        reasons.push(format!(
                            "Product {} needs {} feeder slots but the fleet maximum is {}",
                            analysis.product,
                            analysis.feeder_slots_required,
                            analysis.fleet_max_feeder_slots
                        ));
                    }
                }
                if reasons.is_empty() {
                    reasons.push("No feasible schedule exists under the given constraints".to_owned());
                }
                let mut result = ScheduleResult::empty(ScheduleStatus::Infeasible);
                result.capacity_analyses = analyses;
                result.failure_reasons = reasons;
                result
            }
            SearchOutcome::ResourcesExhausted => {
                phase = SolvePhase::Failed;
                let mut result = ScheduleResult::empty(ScheduleStatus::Timeout);
                result.failure_reasons.push(format!(
                    "No feasible schedule found within the {:?} budget",
                    time_limit
                ));
                result
            }
        };

        info!(%phase, status = %result.status, "solve finished");
        result.warnings = warnings;
        finalize(result, started)
    }
}

#[inline]
fn remaining_budget(time_limit: Duration, started: Instant) -> Duration {
    time_limit.saturating_sub(started.elapsed())
}

#[inline]
fn finalize(mut result: ScheduleResult, started: Instant) -> ScheduleResult {
    result.solve_time_ms = started.elapsed().as_millis() as u64;
    result
}
