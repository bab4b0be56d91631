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

use crate::model::{LineIndex, SolverModel, TaskIndex};
use crate::search::outcome::{Placement, SearchOutcome, SearchSolution};
use crate::search::stats::SearchStatistics;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};
use tracing::debug;

/// Knobs of one search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub time_limit: Duration,
    /// Seed of the tie-break shuffling. Identical seeds reproduce the
    /// search exactly.
    pub seed: u64,
    pub node_limit: Option<u64>,
}

impl Default for SearchConfig {
    #[inline]
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            seed: 0,
            node_limit: None,
        }
    }
}

/// A candidate placement generated at one node.
#[derive(Debug, Clone, Copy)]
struct ChildPlacement {
    task: usize,
    line: LineIndex,
    start: i64,
    end: i64,
}

/// Undo record of one applied placement.
#[derive(Debug, Clone, Copy)]
struct Undo {
    task: usize,
    track: usize,
    prev_track_ready: i64,
    prev_frontier: (i64, usize),
    prev_final_max: i64,
}

/// A stack frame: the ordered children of one node.
#[derive(Debug)]
struct Frame {
    children: Vec<ChildPlacement>,
    next: usize,
}

/// Branch-and-bound search over the solver model.
///
/// The tree branches over (ready task, candidate line) placements at the
/// earliest feasible start, with a canonical non-decreasing `(start,
/// task)` order along every branch for symmetry breaking. Any feasible
/// schedule is dominated by one the tree generates, so exhausting the
/// tree proves optimality of the incumbent, or infeasibility when none
/// was found. The incumbent makespan prunes via a critical-chain lower
/// bound.
pub struct BnbSearch<'m> {
    model: &'m SolverModel,
    config: SearchConfig,

    // Per-task state.
    line_of: Vec<Option<LineIndex>>,
    start_of: Vec<i64>,
    end_of: Vec<i64>,
    scheduled: Vec<bool>,
    unscheduled_pred_count: Vec<u32>,
    scheduled_count: usize,

    // Per-(line, stage) track state.
    track_ready: Vec<i64>,

    // Canonical ordering frontier: the last placement's (start, task).
    frontier: (i64, usize),
    // Max end among scheduled final tasks.
    final_max: i64,

    // Static root bounds.
    root_est: Vec<i64>,
    /// `root_est + min processing + minimal chain to a final task`;
    /// `None` for tasks with no path into the objective.
    objective_bound: Vec<Option<i64>>,

    incumbent: Option<SearchSolution>,
    stats: SearchStatistics,
    rng: ChaCha8Rng,
}

impl<'m> BnbSearch<'m> {
    pub fn new(model: &'m SolverModel, config: SearchConfig) -> Self {
        let n = model.num_tasks();
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut search = Self {
            model,
            config,
            line_of: vec![None; n],
            start_of: vec![0; n],
            end_of: vec![0; n],
            scheduled: vec![false; n],
            unscheduled_pred_count: model.tasks().iter().map(|t| t.preds.len() as u32).collect(),
            scheduled_count: 0,
            track_ready: vec![0; model.num_tracks()],
            frontier: (i64::MIN, 0),
            final_max: 0,
            root_est: vec![0; n],
            objective_bound: vec![None; n],
            incumbent: None,
            stats: SearchStatistics::default(),
            rng,
        };
        search.compute_root_bounds();
        search
    }

    /// Runs the search to proof or budget exhaustion.
    pub fn run(mut self) -> (SearchOutcome, SearchStatistics) {
        let started = Instant::now();
        let n = self.model.num_tasks();

        if n == 0 {
            self.stats.set_total_time(started.elapsed());
            let outcome = SearchOutcome::Optimal(SearchSolution {
                placements: Vec::new(),
                objective: 0,
            });
            return (outcome, self.stats);
        }

        // Root propagation: a hard deadline below the earliest possible
        // end proves infeasibility without search.
        if self.root_deadline_violation() {
            self.stats.set_total_time(started.elapsed());
            return (SearchOutcome::Infeasible, self.stats);
        }

        let mut stack: Vec<Frame> = Vec::with_capacity(n + 1);
        let mut trail: Vec<Undo> = Vec::with_capacity(n);
        stack.push(Frame {
            children: self.generate_children(),
            next: 0,
        });

        let exhausted = loop {
            if started.elapsed() >= self.config.time_limit {
                break false;
            }
            if let Some(limit) = self.config.node_limit {
                if self.stats.nodes_explored() >= limit {
                    break false;
                }
            }

            let Some(frame) = stack.last_mut() else {
                break true;
            };
            if frame.next >= frame.children.len() {
                stack.pop();
                if let Some(undo) = trail.pop() {
                    self.undo_placement(undo);
                    self.stats.on_backtrack();
                }
                continue;
            }

            let child = frame.children[frame.next];
            frame.next += 1;

            let undo = self.apply_placement(child);
            self.stats.on_node_explored();

            if self.scheduled_count == n {
                self.record_solution();
                self.undo_placement(undo);
                continue;
            }

            if let Some(best) = &self.incumbent {
                if self.lower_bound() >= best.objective {
                    self.undo_placement(undo);
                    self.stats.on_pruned_by_bound();
                    continue;
                }
            }

            trail.push(undo);
            stack.push(Frame {
                children: self.generate_children(),
                next: 0,
            });
        };

        self.stats.set_total_time(started.elapsed());
        debug!(
            nodes = self.stats.nodes_explored(),
            solutions = self.stats.solutions_found(),
            exhausted, "search finished"
        );

        let outcome = match (exhausted, self.incumbent.take()) {
            (true, Some(best)) => SearchOutcome::Optimal(best),
            (true, None) => SearchOutcome::Infeasible,
            (false, Some(best)) => SearchOutcome::Feasible(best),
            (false, None) => SearchOutcome::ResourcesExhausted,
        };
        (outcome, self.stats)
    }

    /// Forward pass over the (topological) task order: earliest starts
    /// ignoring resource contention, and the reverse chain bound into
    /// the objective.
    fn compute_root_bounds(&mut self) {
        let tasks = self.model.tasks();

        for (i, task) in tasks.iter().enumerate() {
            let mut est = task.release;
            for link in &task.preds {
                let pred = link.pred.get();
                let bound = self.root_est[pred] + tasks[pred].min_processing() + link.delay;
                est = est.max(bound);
            }
            self.root_est[i] = est;
        }

        // Reverse pass: minimal remaining chain from each task into a
        // final task's end. Line transfers are bounded below by zero.
        let mut tail: Vec<Option<i64>> = vec![None; tasks.len()];
        for i in (0..tasks.len()).rev() {
            let task = &tasks[i];
            let mut best: Option<i64> = task.is_final.then_some(0);
            for succ in self.model.successors(TaskIndex::new(i)) {
                let succ_task = self.model.task(*succ);
                let delay = succ_task
                    .preds
                    .iter()
                    .filter(|l| l.pred.get() == i)
                    .map(|l| l.delay)
                    .max()
                    .unwrap_or(0);
                if let Some(succ_tail) = tail[succ.get()] {
                    let chain = delay + succ_task.min_processing() + succ_tail;
                    best = Some(best.map_or(chain, |b| b.max(chain)));
                }
            }
            tail[i] = best;
        }

        for i in 0..tasks.len() {
            self.objective_bound[i] =
                tail[i].map(|t| self.root_est[i] + tasks[i].min_processing() + t);
        }
    }

    /// `true` if some task can never meet its hard deadline, even with
    /// fastest lines and no contention.
    fn root_deadline_violation(&self) -> bool {
        self.model.tasks().iter().enumerate().any(|(i, task)| {
            task.hard_due
                .is_some_and(|due| self.root_est[i] + task.min_processing() > due)
        })
    }

    /// Lower bound on the objective at the current node.
    fn lower_bound(&self) -> i64 {
        let mut bound = self.final_max;
        for (i, scheduled) in self.scheduled.iter().enumerate() {
            if !scheduled {
                if let Some(b) = self.objective_bound[i] {
                    bound = bound.max(b);
                }
            }
        }
        bound
    }

    /// All feasible placements of ready tasks, in canonical order:
    /// ascending (start, end, task, line), with seeded shuffling of
    /// exact ties.
    fn generate_children(&mut self) -> Vec<ChildPlacement> {
        let tasks = self.model.tasks();
        let mut children = Vec::new();

        for (i, task) in tasks.iter().enumerate() {
            if self.scheduled[i] || self.unscheduled_pred_count[i] > 0 {
                continue;
            }
            for candidate in &task.candidates {
                let mut est = task.release;
                for link in &task.preds {
                    let pred = link.pred.get();
                    let mut bound = self.end_of[pred] + link.delay;
                    if link.with_line_transfer {
                        let pred_line = self.line_of[pred]
                            .expect("predecessors of a ready task are scheduled");
                        bound += self.model.line_transfer(pred_line, candidate.line);
                    }
                    est = est.max(bound);
                }
                let track = self.model.track(candidate.line, task.stage);
                let start = est.max(self.track_ready[track]);
                let end = start + candidate.processing;

                if let Some(due) = task.hard_due {
                    if end > due {
                        continue;
                    }
                }
                if end > self.model.horizon() {
                    continue;
                }
                // Canonical order: time never decreases along a branch,
                // ties resolved by task index.
                if (start, i) <= self.frontier {
                    continue;
                }
                children.push(ChildPlacement {
                    task: i,
                    line: candidate.line,
                    start,
                    end,
                });
            }
        }

        children.sort_by_key(|c| (c.start, c.end, c.task, c.line.get()));
        self.shuffle_ties(&mut children);
        children
    }

    /// Shuffles runs of children where the same task has several
    /// equivalent line choices (identical start and end), so those are
    /// explored in seed-dependent order. Ties between different tasks
    /// keep the task order, which encodes the priority sort.
    fn shuffle_ties(&mut self, children: &mut [ChildPlacement]) {
        let mut i = 0;
        while i < children.len() {
            let key = (children[i].start, children[i].end, children[i].task);
            let mut j = i + 1;
            while j < children.len()
                && (children[j].start, children[j].end, children[j].task) == key
            {
                j += 1;
            }
            if j - i > 1 {
                children[i..j].shuffle(&mut self.rng);
            }
            i = j;
        }
    }

    fn apply_placement(&mut self, child: ChildPlacement) -> Undo {
        let task = &self.model.tasks()[child.task];
        let track = self.model.track(child.line, task.stage);

        let undo = Undo {
            task: child.task,
            track,
            prev_track_ready: self.track_ready[track],
            prev_frontier: self.frontier,
            prev_final_max: self.final_max,
        };

        self.line_of[child.task] = Some(child.line);
        self.start_of[child.task] = child.start;
        self.end_of[child.task] = child.end;
        self.scheduled[child.task] = true;
        self.scheduled_count += 1;
        self.track_ready[track] = child.end;
        self.frontier = (child.start, child.task);
        if task.is_final {
            self.final_max = self.final_max.max(child.end);
        }
        for succ in self.model.successors(TaskIndex::new(child.task)) {
            self.unscheduled_pred_count[succ.get()] -= 1;
        }

        undo
    }

    fn undo_placement(&mut self, undo: Undo) {
        for succ in self.model.successors(TaskIndex::new(undo.task)) {
            self.unscheduled_pred_count[succ.get()] += 1;
        }
        self.line_of[undo.task] = None;
        self.scheduled[undo.task] = false;
        self.scheduled_count -= 1;
        self.track_ready[undo.track] = undo.prev_track_ready;
        self.frontier = undo.prev_frontier;
        self.final_max = undo.prev_final_max;
    }

    /// Records the current complete schedule when it improves on the
    /// incumbent.
    fn record_solution(&mut self) {
        let objective = self.final_max;
        if self
            .incumbent
            .as_ref()
            .is_some_and(|best| best.objective <= objective)
        {
            return;
        }
        let placements = (0..self.model.num_tasks())
            .map(|i| Placement {
                line: self.line_of[i].expect("complete schedules assign every task"),
                start: self.start_of[i],
                end: self.end_of[i],
            })
            .collect();
        debug!(objective, "improved incumbent");
        self.incumbent = Some(SearchSolution {
            placements,
            objective,
        });
        self.stats.on_solution_found();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SolverModel;
    use chrono::NaiveDate;
    use smt_sched_model::prelude::*;

    #[inline]
    fn sid(n: u32) -> StageId {
        StageId::new(n)
    }
    #[inline]
    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn product(id: &str, qty: u32, due_day: u32) -> Product {
        Product::new(
            ProductId::from(id),
            id,
            qty,
            date().and_hms_opt(8, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, due_day)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap(),
        )
        .unwrap()
    }

    fn run_search(problem: &Problem) -> (SearchOutcome, SearchStatistics) {
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(problem, &ordered).unwrap();
        BnbSearch::new(&model, SearchConfig::default()).run()
    }

    /// One product, four stages, one line at efficiency 1.0, lead times
    /// 0.5/1.2/0.8/0.3 min/unit for 100 units: strictly sequential, so
    /// the optimal makespan is 50+120+80+30 = 280.
    #[test]
    fn test_single_product_linear_routing_is_optimal() {
        let pid = ProductId::from("P");
        let mut routings = RoutingCatalog::new(1.0);
        routings.insert(
            pid.clone(),
            Routing::new(
                &pid,
                vec![
                    RouteStep::new(sid(1), 10),
                    RouteStep::new(sid(2), 20),
                    RouteStep::new(sid(3), 30),
                    RouteStep::new(sid(4), 40),
                ],
                1.0,
                1.0,
            )
            .unwrap()
            .with_leadtime_override(sid(1), 0.5)
            .with_leadtime_override(sid(2), 1.2)
            .with_leadtime_override(sid(3), 0.8)
            .with_leadtime_override(sid(4), 0.3),
        );

        let mut line = Line::new(LineId::from("SMT-1"), "one");
        for s in 1..=4 {
            line = line.with_capability(sid(s), 1.0).unwrap();
        }
        let mut builder = ProblemBuilder::new(date());
        for (i, name) in ["Solder Paste", "Pick & Place", "Reflow", "AOI"]
            .iter()
            .enumerate()
        {
            builder = builder
                .with_stage(Stage::new(sid(i as u32 + 1), *name, (i as u32 + 1) * 10))
                .unwrap();
        }
        let problem = builder
            .with_line(line)
            .with_routings(routings)
            .with_product(product("P", 100, 30))
            .build()
            .unwrap();

        let (outcome, _) = run_search(&problem);
        match outcome {
            SearchOutcome::Optimal(sol) => {
                assert_eq!(sol.objective, 280);
                // Four sequential tasks.
                let mut ends: Vec<i64> = sol.placements.iter().map(|p| p.end).collect();
                ends.sort_unstable();
                assert_eq!(ends, vec![50, 170, 250, 280]);
            }
            other => panic!("expected optimal, got {other}"),
        }
    }

    /// Stage-level split with pipeline gain: stage 1 in [250, 250],
    /// stage 2 in five batches of 100 on one line (separate machines per
    /// stage), lead times 0.5 and 1.0 min/unit. Batches 2..5 of stage 2
    /// wait on stage-1 batch 2 (ends at 250): makespan 250 + 4*100 = 650.
    #[test]
    fn test_stage_split_pipeline_makespan() {
        let pid = ProductId::from("P");
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

        let problem = ProblemBuilder::new(date())
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
            .with_product(
                product("P", 500, 30)
                    .with_stage_lot_config(
                        sid(1),
                        LotConfig::new(LotStrategy::FixedQuantity(250)),
                    )
                    .with_stage_lot_config(
                        sid(2),
                        LotConfig::new(LotStrategy::FixedQuantity(100)),
                    ),
            )
            .build()
            .unwrap();

        let (outcome, _) = run_search(&problem);
        match outcome {
            SearchOutcome::Optimal(sol) => assert_eq!(sol.objective, 650),
            other => panic!("expected optimal, got {other}"),
        }
    }

    /// Hard deadline far below the processing floor: proven infeasible
    /// at the root, without expanding the tree.
    #[test]
    fn test_root_deadline_proves_infeasible() {
        let flags = FeatureFlags {
            use_hard_deadline_constraint: true,
            ..FeatureFlags::default()
        };
        // 1000 units at 1.0 min/unit on two stages, due one day after
        // release (480 working minutes).
        let due = NaiveDate::from_ymd_opt(2025, 6, 3)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap();
        let release = date().and_hms_opt(8, 0, 0).unwrap();
        let problem = ProblemBuilder::new(date())
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
            .with_flags(flags)
            .with_product(
                Product::new(ProductId::from("A"), "A", 1000, release, due).unwrap(),
            )
            .build()
            .unwrap();

        let (outcome, stats) = run_search(&problem);
        assert_eq!(outcome, SearchOutcome::Infeasible);
        assert_eq!(stats.nodes_explored(), 0);
    }

    /// Two lines with different efficiencies: the optimal schedule uses
    /// both lines in parallel rather than serializing on the fast one.
    #[test]
    fn test_parallel_lines_beat_serial() {
        let problem = ProblemBuilder::new(date())
            .with_stage(Stage::new(sid(1), "Pick & Place", 10))
            .unwrap()
            .with_line(
                Line::new(LineId::from("SMT-1"), "one")
                    .with_capability(sid(1), 1.0)
                    .unwrap(),
            )
            .with_line(
                Line::new(LineId::from("SMT-2"), "two")
                    .with_capability(sid(1), 1.0)
                    .unwrap(),
            )
            .with_product(product("A", 100, 30))
            .with_product(product("B", 100, 30))
            .build()
            .unwrap();

        let (outcome, _) = run_search(&problem);
        match outcome {
            SearchOutcome::Optimal(sol) => {
                // Default lead time 1.0 min/unit: each product takes 100
                // minutes; in parallel the makespan stays 100.
                assert_eq!(sol.objective, 100);
            }
            other => panic!("expected optimal, got {other}"),
        }
    }

    /// Identical seeds reproduce identical schedules.
    #[test]
    fn test_search_is_deterministic_per_seed() {
        let problem = ProblemBuilder::new(date())
            .with_stage(Stage::new(sid(1), "Pick & Place", 10))
            .unwrap()
            .with_line(
                Line::new(LineId::from("SMT-1"), "one")
                    .with_capability(sid(1), 1.0)
                    .unwrap(),
            )
            .with_line(
                Line::new(LineId::from("SMT-2"), "two")
                    .with_capability(sid(1), 1.0)
                    .unwrap(),
            )
            .with_product(product("A", 60, 30))
            .with_product(product("B", 80, 30))
            .with_product(product("C", 40, 30))
            .build()
            .unwrap();

        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();
        let config = SearchConfig {
            seed: 42,
            ..SearchConfig::default()
        };
        let (a, _) = BnbSearch::new(&model, config).run();
        let (b, _) = BnbSearch::new(&model, config).run();
        assert_eq!(a, b);
    }

    /// Zero-time budget without an incumbent reports exhaustion.
    #[test]
    fn test_zero_budget_reports_resources_exhausted() {
        let problem = ProblemBuilder::new(date())
            .with_stage(Stage::new(sid(1), "Pick & Place", 10))
            .unwrap()
            .with_line(
                Line::new(LineId::from("SMT-1"), "one")
                    .with_capability(sid(1), 1.0)
                    .unwrap(),
            )
            .with_product(product("A", 100, 30))
            .build()
            .unwrap();

        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();
        let config = SearchConfig {
            time_limit: Duration::ZERO,
            ..SearchConfig::default()
        };
        let (outcome, _) = BnbSearch::new(&model, config).run();
        assert_eq!(outcome, SearchOutcome::ResourcesExhausted);
    }
}
