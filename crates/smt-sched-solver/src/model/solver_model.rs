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

use crate::model::err::{NoCandidateLineError, SolverModelBuildError};
use crate::model::index::{LineIndex, TaskIndex};
use crate::plan::{plan_product_units, WorkUnit};
use smallvec::SmallVec;
use smt_sched_model::prelude::{LineId, Problem, Product, ProductId, StageId};
use std::collections::HashMap;

/// Extra working-minute room the horizon keeps beyond the latest due
/// date, in calendar days.
const HORIZON_DUE_SLACK_DAYS: u32 = 30;

/// Feasibility floor: working days of room after the earliest release.
const HORIZON_FLOOR_DAYS: i64 = 7;

/// One line choice of a task, with its constant processing duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub line: LineIndex,
    pub processing: i64,
}

/// A precedence edge into a task.
///
/// `delay` is the stage-transfer part, already gated by the feature
/// flags. `with_line_transfer` marks inter-stage edges, where the
/// line-to-line transfer between the chosen lines is added on top;
/// batch-order edges move no material and never pay it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecedenceLink {
    pub pred: TaskIndex,
    pub delay: i64,
    pub with_line_transfer: bool,
}

/// One row of the flattened task table: a (work unit, routing step)
/// pair.
#[derive(Debug, Clone)]
pub struct SolverTask {
    /// Index into [`SolverModel::products`].
    pub product: usize,
    pub stage: StageId,
    /// Position of the stage within the product's routing.
    pub stage_ordinal: usize,
    pub batch: u32,
    pub total_batches: u32,
    pub qty: u32,
    pub candidates: SmallVec<[Candidate; 4]>,
    /// Release coordinate on the working-minute axis.
    pub release: i64,
    /// Due-minute upper bound on the end, present only under hard
    /// deadlines and only on last-step tasks.
    pub hard_due: Option<i64>,
    pub preds: SmallVec<[PrecedenceLink; 3]>,
    /// `true` for the task whose end defines the product's completion
    /// (last routing step of the last batch).
    pub is_final: bool,
}

impl SolverTask {
    /// The fastest processing this task can get on any candidate line.
    #[inline]
    pub fn min_processing(&self) -> i64 {
        self.candidates
            .iter()
            .map(|c| c.processing)
            .min()
            .expect("a solver task always has at least one candidate")
    }

    #[inline]
    pub fn processing_on(&self, line: LineIndex) -> Option<i64> {
        self.candidates
            .iter()
            .find(|c| c.line == line)
            .map(|c| c.processing)
    }
}

/// Per-product data the decoder and the capacity analysis reach back to.
#[derive(Debug, Clone)]
pub struct ProductInfo {
    pub id: ProductId,
    pub release_minute: i64,
    pub due_minute: i64,
    pub due: chrono::NaiveDateTime,
    pub feeder_slots: u32,
    pub required_qty: u32,
}

/// The indexed, immutable input of the search: tasks in topological
/// order, the active-line table, the dense line-transfer matrix, and the
/// horizon.
///
/// The disjunctive resource is the (line, stage) *track*: each line runs
/// one machine per stage, so tasks of different stages may overlap on
/// the same line while tasks on the same track may not.
#[derive(Debug, Clone)]
pub struct SolverModel {
    tasks: Vec<SolverTask>,
    /// Reverse precedence adjacency.
    succs: Vec<Vec<TaskIndex>>,
    lines: Vec<LineId>,
    /// Dense stage positions for track indexing.
    stage_positions: HashMap<StageId, usize>,
    /// `line_transfer[from][to]` in minutes; all zeros when line
    /// transfer time is disabled.
    line_transfer: Vec<Vec<i64>>,
    products: Vec<ProductInfo>,
    horizon: i64,
}

impl SolverModel {
    /// Flattens the problem into the task table.
    ///
    /// `ordered_products` carries the priority-sorted product order; task
    /// indices follow it, so the search explores higher-priority work
    /// first.
    pub fn build(
        problem: &Problem,
        ordered_products: &[&Product],
    ) -> Result<Self, SolverModelBuildError> {
        let flags = problem.flags();
        let calendar = problem.calendar();
        let reference = problem.reference_date();

        let lines: Vec<LineId> = problem
            .lines()
            .iter_active()
            .map(|l| l.id().clone())
            .collect();
        let line_index: HashMap<&LineId, LineIndex> = lines
            .iter()
            .enumerate()
            .map(|(i, id)| (id, LineIndex::new(i)))
            .collect();

        let line_transfer = if flags.enable_line_transfer_time {
            lines
                .iter()
                .map(|from| {
                    lines
                        .iter()
                        .map(|to| problem.line_transfers().between(from, to).value())
                        .collect()
                })
                .collect()
        } else {
            vec![vec![0; lines.len()]; lines.len()]
        };

        let stage_positions: HashMap<StageId, usize> = problem
            .stages()
            .iter_ordered()
            .enumerate()
            .map(|(i, s)| (s.id(), i))
            .collect();

        let mut tasks: Vec<SolverTask> = Vec::new();
        let mut products: Vec<ProductInfo> = Vec::new();

        for product in ordered_products {
            if product.required_qty() == 0 {
                continue;
            }
            let routing = problem.routings().resolve(
                product.id(),
                problem.stages(),
                flags.enable_custom_routing,
            );
            let units = plan_product_units(product, &routing, flags.enable_lot_splitting);
            if units.is_empty() {
                continue;
            }

            let product_index = products.len();
            let release_minute = calendar
                .datetime_to_minutes(product.release(), reference, None)
                .value();
            let due_minute = calendar
                .datetime_to_minutes(product.due(), reference, None)
                .value();
            products.push(ProductInfo {
                id: product.id().clone(),
                release_minute,
                due_minute,
                due: product.due(),
                feeder_slots: product.feeder_slots(),
                required_qty: product.required_qty(),
            });

            let stage_mode = units
                .iter()
                .any(|u| matches!(u, WorkUnit::StageBatch { .. }));
            if stage_mode {
                build_stage_mode_tasks(
                    problem,
                    product,
                    &routing,
                    &units,
                    product_index,
                    release_minute,
                    due_minute,
                    &line_index,
                    &mut tasks,
                )?;
            } else {
                build_product_mode_tasks(
                    problem,
                    product,
                    &routing,
                    &units,
                    product_index,
                    release_minute,
                    due_minute,
                    &line_index,
                    &mut tasks,
                )?;
            }
        }

        let mut succs = vec![Vec::new(); tasks.len()];
        for (i, task) in tasks.iter().enumerate() {
            for link in &task.preds {
                succs[link.pred.get()].push(TaskIndex::new(i));
            }
        }

        let horizon = compute_horizon(problem, &tasks, &line_transfer, &products);

        Ok(Self {
            tasks,
            succs,
            lines,
            stage_positions,
            line_transfer,
            products,
            horizon,
        })
    }

    #[inline]
    pub fn tasks(&self) -> &[SolverTask] {
        &self.tasks
    }

    #[inline]
    pub fn task(&self, index: TaskIndex) -> &SolverTask {
        &self.tasks[index.get()]
    }

    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn successors(&self, index: TaskIndex) -> &[TaskIndex] {
        &self.succs[index.get()]
    }

    #[inline]
    pub fn lines(&self) -> &[LineId] {
        &self.lines
    }

    #[inline]
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn line_id(&self, index: LineIndex) -> &LineId {
        &self.lines[index.get()]
    }

    #[inline]
    pub fn line_transfer(&self, from: LineIndex, to: LineIndex) -> i64 {
        self.line_transfer[from.get()][to.get()]
    }

    #[inline]
    pub fn products(&self) -> &[ProductInfo] {
        &self.products
    }

    #[inline]
    pub fn num_stages(&self) -> usize {
        self.stage_positions.len()
    }

    /// Dense index of the (line, stage) disjunctive track.
    #[inline]
    pub fn track(&self, line: LineIndex, stage: StageId) -> usize {
        let stage_pos = self.stage_positions[&stage];
        line.get() * self.stage_positions.len() + stage_pos
    }

    #[inline]
    pub fn num_tracks(&self) -> usize {
        self.lines.len() * self.stage_positions.len()
    }

    /// Upper bound of every time variable.
    #[inline]
    pub fn horizon(&self) -> i64 {
        self.horizon
    }
}

/// Candidate lines of one (product, stage, qty) triple, or the
/// structural error naming it.
fn collect_candidates(
    problem: &Problem,
    product: &Product,
    routing: &smt_sched_model::prelude::Routing,
    stage: StageId,
    qty: u32,
    line_index: &HashMap<&LineId, LineIndex>,
) -> Result<SmallVec<[Candidate; 4]>, SolverModelBuildError> {
    let mut candidates = SmallVec::new();
    for line in problem.lines().iter_active_supporting(stage) {
        if let Some(processing) = routing.processing_time(stage, qty, line) {
            candidates.push(Candidate {
                line: line_index[line.id()],
                processing: processing.value(),
            });
        }
    }
    if candidates.is_empty() {
        return Err(NoCandidateLineError::new(product.id().clone(), stage).into());
    }
    Ok(candidates)
}

/// Stage-level mode: one task per (stage, batch); intra-stage batch
/// order plus the pipeline edge onto the corresponding upstream batch
/// `min(b, N_prev)`.
#[allow(clippy::too_many_arguments)]
fn build_stage_mode_tasks(
    problem: &Problem,
    product: &Product,
    routing: &smt_sched_model::prelude::Routing,
    units: &[WorkUnit],
    product_index: usize,
    release_minute: i64,
    due_minute: i64,
    line_index: &HashMap<&LineId, LineIndex>,
    tasks: &mut Vec<SolverTask>,
) -> Result<(), SolverModelBuildError> {
    let flags = problem.flags();
    let steps = routing.steps();
    let last_ordinal = steps.len() - 1;

    // Tasks indexed per (step ordinal, batch) for linking.
    let mut step_tasks: Vec<Vec<TaskIndex>> = Vec::with_capacity(steps.len());

    for (ordinal, step) in steps.iter().enumerate() {
        let stage = step.stage();
        let batch_units: Vec<&WorkUnit> = units
            .iter()
            .filter(|u| u.stage() == Some(stage))
            .collect();
        let total = batch_units.len() as u32;
        let min_gap = product
            .stage_lot_config(stage)
            .map(|c| c.min_gap.value())
            .unwrap_or(0);

        let mut indices = Vec::with_capacity(batch_units.len());
        for unit in batch_units {
            let index = TaskIndex::new(tasks.len());
            let mut preds: SmallVec<[PrecedenceLink; 3]> = SmallVec::new();

            if unit.batch() > 1 {
                preds.push(PrecedenceLink {
                    pred: indices[unit.batch() as usize - 2],
                    delay: min_gap,
                    with_line_transfer: false,
                });
            }
            if ordinal > 0 {
                let upstream = &step_tasks[ordinal - 1];
                let corresponding = (unit.batch() as usize).min(upstream.len());
                let delay = if flags.enable_stage_transfer_time {
                    problem
                        .stage_transfers()
                        .between(steps[ordinal - 1].stage(), stage)
                        .value()
                } else {
                    0
                };
                preds.push(PrecedenceLink {
                    pred: upstream[corresponding - 1],
                    delay,
                    with_line_transfer: true,
                });
            }

            let is_last_step = ordinal == last_ordinal;
            tasks.push(SolverTask {
                product: product_index,
                stage,
                stage_ordinal: ordinal,
                batch: unit.batch(),
                total_batches: total,
                qty: unit.qty(),
                candidates: collect_candidates(
                    problem, product, routing, stage, unit.qty(), line_index,
                )?,
                release: release_minute,
                hard_due: (flags.use_hard_deadline_constraint && is_last_step)
                    .then_some(due_minute),
                preds,
                is_final: is_last_step && unit.batch() == total,
            });
            indices.push(index);
        }
        step_tasks.push(indices);
    }
    Ok(())
}

/// Product-level mode: each batch traverses the full routing; routing
/// precedence within the batch, same-stage serialization between
/// consecutive batches.
#[allow(clippy::too_many_arguments)]
fn build_product_mode_tasks(
    problem: &Problem,
    product: &Product,
    routing: &smt_sched_model::prelude::Routing,
    units: &[WorkUnit],
    product_index: usize,
    release_minute: i64,
    due_minute: i64,
    line_index: &HashMap<&LineId, LineIndex>,
    tasks: &mut Vec<SolverTask>,
) -> Result<(), SolverModelBuildError> {
    let flags = problem.flags();
    let steps = routing.steps();
    let last_ordinal = steps.len() - 1;
    let total = units.len() as u32;
    let min_gap = product
        .product_lot_config()
        .map(|c| c.min_gap.value())
        .unwrap_or(0);

    let mut previous_batch: Vec<TaskIndex> = Vec::new();
    for unit in units {
        let mut this_batch = Vec::with_capacity(steps.len());
        for (ordinal, step) in steps.iter().enumerate() {
            let stage = step.stage();
            let index = TaskIndex::new(tasks.len());
            let mut preds: SmallVec<[PrecedenceLink; 3]> = SmallVec::new();

            if ordinal > 0 {
                let delay = if flags.enable_stage_transfer_time {
                    problem
                        .stage_transfers()
                        .between(steps[ordinal - 1].stage(), stage)
                        .value()
                } else {
                    0
                };
                preds.push(PrecedenceLink {
                    pred: this_batch[ordinal - 1],
                    delay,
                    with_line_transfer: true,
                });
            }
            if unit.batch() > 1 {
                preds.push(PrecedenceLink {
                    pred: previous_batch[ordinal],
                    delay: min_gap,
                    with_line_transfer: false,
                });
            }

            tasks.push(SolverTask {
                product: product_index,
                stage,
                stage_ordinal: ordinal,
                batch: unit.batch(),
                total_batches: total,
                qty: unit.qty(),
                candidates: collect_candidates(
                    problem, product, routing, stage, unit.qty(), line_index,
                )?,
                release: release_minute,
                hard_due: (flags.use_hard_deadline_constraint && ordinal == last_ordinal)
                    .then_some(due_minute),
                preds,
                is_final: ordinal == last_ordinal && unit.batch() == total,
            });
            this_batch.push(index);
        }
        previous_batch = this_batch;
    }
    Ok(())
}

/// `H = max(2 * sum of minimal processing + transfer buffer, minutes up
/// to latest due + 30 days)`, floored at seven default-shift days after
/// the earliest release.
fn compute_horizon(
    problem: &Problem,
    tasks: &[SolverTask],
    line_transfer: &[Vec<i64>],
    products: &[ProductInfo],
) -> i64 {
    let calendar = problem.calendar();
    let reference = problem.reference_date();

    let max_line_transfer = line_transfer
        .iter()
        .flat_map(|row| row.iter().copied())
        .max()
        .unwrap_or(0);
    let sum_min_processing: i64 = tasks.iter().map(|t| t.min_processing()).sum();
    let transfer_buffer: i64 = tasks
        .iter()
        .flat_map(|t| t.preds.iter())
        .map(|l| l.delay + max_line_transfer)
        .sum();

    let earliest_release = products.iter().map(|p| p.release_minute).min().unwrap_or(0);
    let latest_due_date = products
        .iter()
        .map(|p| p.due.date())
        .max()
        .unwrap_or(reference);

    let processing_bound = earliest_release + 2 * sum_min_processing + transfer_buffer;
    let due_bound = match calendar.add_working_days(latest_due_date, HORIZON_DUE_SLACK_DAYS, None) {
        Ok(date) => calendar
            .datetime_to_minutes(
                date.and_hms_opt(23, 59, 0).expect("valid end-of-day time"),
                reference,
                None,
            )
            .value(),
        Err(_) => 0,
    };
    let floor =
        earliest_release + HORIZON_FLOOR_DAYS * calendar.default_shift().working_minutes();

    processing_bound.max(due_bound).max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use smt_sched_model::prelude::{
        FeatureFlags, Line, LotConfig, LotStrategy, ProblemBuilder, RouteStep, Routing,
        RoutingCatalog, Stage, StageTransferMatrix,
    };
    use smt_sched_core::prelude::MinuteDelta;

    #[inline]
    fn sid(n: u32) -> StageId {
        StageId::new(n)
    }
    #[inline]
    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn two_stage_problem(flags: FeatureFlags, product: Product) -> Problem {
        let pid = product.id().clone();
        let mut routings = RoutingCatalog::new(1.0);
        routings.insert(
            pid.clone(),
            Routing::new(
                &pid,
                vec![RouteStep::new(sid(1), 10), RouteStep::new(sid(2), 20)],
                1.0,
                1.0,
            )
            .unwrap()
            .with_leadtime_override(sid(1), 0.5)
            .with_leadtime_override(sid(2), 1.0),
        );

        let mut transfers = StageTransferMatrix::zero();
        transfers.set(sid(1), sid(2), MinuteDelta::new(15));

        ProblemBuilder::new(date())
            .with_stage(Stage::new(sid(1), "Pick & Place", 10))
            .unwrap()
            .with_stage(Stage::new(sid(2), "AOI", 20))
            .unwrap()
            .with_line(
                Line::new(LineId::from("SMT-1"), "one")
                    .with_capability(sid(1), 1.0)
                    .unwrap()
                    .with_capability(sid(2), 1.0)
                    .unwrap(),
            )
            .with_routings(routings)
            .with_stage_transfers(transfers)
            .with_flags(flags)
            .with_product(product)
            .build()
            .unwrap()
    }

    fn base_product(qty: u32) -> Product {
        Product::new(
            ProductId::from("P"),
            "P",
            qty,
            date().and_hms_opt(8, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 20)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_product_mode_links() {
        let problem = two_stage_problem(FeatureFlags::default(), base_product(100));
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();

        // One batch, two steps.
        assert_eq!(model.num_tasks(), 2);
        let first = model.task(TaskIndex::new(0));
        let second = model.task(TaskIndex::new(1));
        assert!(first.preds.is_empty());
        assert_eq!(second.preds.len(), 1);
        // Stage transfer 15 rides on the routing edge.
        assert_eq!(second.preds[0].delay, 15);
        assert!(second.preds[0].with_line_transfer);
        assert!(!first.is_final);
        assert!(second.is_final);
        // Processing: ceil(0.5*100)=50 and ceil(1.0*100)=100.
        assert_eq!(first.min_processing(), 50);
        assert_eq!(second.min_processing(), 100);
    }

    #[test]
    fn test_stage_transfer_flag_zeroes_delays() {
        let flags = FeatureFlags {
            enable_stage_transfer_time: false,
            ..FeatureFlags::default()
        };
        let problem = two_stage_problem(flags, base_product(100));
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();
        assert_eq!(model.task(TaskIndex::new(1)).preds[0].delay, 0);
    }

    #[test]
    fn test_stage_mode_pipeline_correspondence() {
        // Stage 1 in 2 batches, stage 2 in 5: downstream batch b waits on
        // upstream batch min(b, 2).
        let product = base_product(500)
            .with_stage_lot_config(sid(1), LotConfig::new(LotStrategy::FixedQuantity(250)))
            .with_stage_lot_config(sid(2), LotConfig::new(LotStrategy::FixedQuantity(100)));
        let problem = two_stage_problem(FeatureFlags::default(), product);
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();

        // Tasks 0,1 = stage 1 batches; 2..7 = stage 2 batches.
        assert_eq!(model.num_tasks(), 7);
        let corresponding: Vec<usize> = (2..7)
            .map(|i| {
                model.task(TaskIndex::new(i))
                    .preds
                    .iter()
                    .find(|l| l.with_line_transfer)
                    .map(|l| l.pred.get())
                    .unwrap()
            })
            .collect();
        // Batches 1..5 map onto upstream tasks 0,1,1,1,1.
        assert_eq!(corresponding, vec![0, 1, 1, 1, 1]);

        // Intra-stage order: batch b also waits on batch b-1.
        for i in 3..7 {
            let batch_pred = model
                .task(TaskIndex::new(i))
                .preds
                .iter()
                .find(|l| !l.with_line_transfer)
                .unwrap();
            assert_eq!(batch_pred.pred.get(), i - 1);
        }

        // Only the last batch of the last stage is final.
        let finals: Vec<usize> = (0..7)
            .filter(|&i| model.task(TaskIndex::new(i)).is_final)
            .collect();
        assert_eq!(finals, vec![6]);
    }

    #[test]
    fn test_no_candidate_line_is_a_build_error() {
        // The line supports stage 1 only; stage 2 of the default routing
        // has no candidate.
        let problem = ProblemBuilder::new(date())
            .with_stage(Stage::new(sid(1), "Pick & Place", 10))
            .unwrap()
            .with_stage(Stage::new(sid(2), "AOI", 20))
            .unwrap()
            .with_line(
                Line::new(LineId::from("SMT-1"), "one")
                    .with_capability(sid(1), 1.0)
                    .unwrap(),
            )
            .with_product(base_product(100))
            .build()
            .unwrap();

        let ordered: Vec<&Product> = problem.products().iter().collect();
        let err = SolverModel::build(&problem, &ordered).unwrap_err();
        assert!(matches!(err, SolverModelBuildError::NoCandidateLine(_)));
    }

    #[test]
    fn test_hard_deadline_only_on_last_step() {
        let flags = FeatureFlags {
            use_hard_deadline_constraint: true,
            ..FeatureFlags::default()
        };
        let problem = two_stage_problem(flags, base_product(100));
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();

        assert!(model.task(TaskIndex::new(0)).hard_due.is_none());
        assert!(model.task(TaskIndex::new(1)).hard_due.is_some());
    }

    #[test]
    fn test_horizon_leaves_room() {
        let problem = two_stage_problem(FeatureFlags::default(), base_product(100));
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();

        let sum_processing: i64 = model.tasks().iter().map(|t| t.min_processing()).sum();
        assert!(model.horizon() >= 2 * sum_processing);
        // Seven default-shift days of feasibility floor.
        assert!(model.horizon() >= 7 * 480);
    }

    #[test]
    fn test_track_indexing_separates_stages() {
        let problem = two_stage_problem(FeatureFlags::default(), base_product(100));
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();

        let line = LineIndex::new(0);
        assert_ne!(model.track(line, sid(1)), model.track(line, sid(2)));
        assert_eq!(model.num_tracks(), 2);
    }

    #[test]
    fn test_zero_required_products_are_skipped() {
        let product = base_product(100).with_stock_qty(100);
        let problem = two_stage_problem(FeatureFlags::default(), product);
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();
        assert_eq!(model.num_tasks(), 0);
        assert!(model.products().is_empty());
    }
}
