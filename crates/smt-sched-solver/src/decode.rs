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

//! Turns a search solution back into dated task records and statistics.

use crate::model::{SolverModel, TaskIndex};
use crate::search::SearchSolution;
use chrono::NaiveDateTime;
use smt_sched_core::prelude::MinuteInterval;
use smt_sched_model::prelude::{
    CalendarError, CapacityAnalysis, ChangeoverStats, LineUtilization, MissedDeadline, Problem,
    StageLoad, TaskRecord,
};
use std::collections::HashMap;

/// The decoded, wall-clock view of one solution.
#[derive(Debug, Clone)]
pub struct DecodedSchedule {
    pub tasks: Vec<TaskRecord>,
    pub plan_start: Option<NaiveDateTime>,
    pub expected_completion: Option<NaiveDateTime>,
    pub line_utilizations: Vec<LineUtilization>,
    pub stage_loads: Vec<StageLoad>,
    pub changeover_stats: Vec<ChangeoverStats>,
    pub missed_deadlines: Vec<MissedDeadline>,
}

/// Reads solver placements back into the wall-clock domain.
///
/// The decoder is the only component that reaches back into the
/// calendar; everything it consumes from the search is integer minutes.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    problem: &'a Problem,
    model: &'a SolverModel,
}

impl<'a> Decoder<'a> {
    #[inline]
    pub fn new(problem: &'a Problem, model: &'a SolverModel) -> Self {
        Self { problem, model }
    }

    /// Emits task records and statistics for a complete solution.
    ///
    /// Fails only when a minute coordinate cannot be placed on the
    /// calendar within the walk guard, which callers surface as a fatal
    /// internal error.
    pub fn decode(&self, solution: &SearchSolution) -> Result<DecodedSchedule, CalendarError> {
        let calendar = self.problem.calendar();
        let reference = self.problem.reference_date();
        let naming = self.problem.flags().enable_stage_naming;

        // Previous task per (line, stage) track, for changeover labels.
        let mut track_order: HashMap<usize, Vec<TaskIndex>> = HashMap::new();
        for (i, placement) in solution.placements.iter().enumerate() {
            let task = self.model.task(TaskIndex::new(i));
            let track = self.model.track(placement.line, task.stage);
            track_order.entry(track).or_default().push(TaskIndex::new(i));
        }
        let mut previous_on_track: HashMap<usize, Option<TaskIndex>> = HashMap::new();
        for order in track_order.values_mut() {
            order.sort_by_key(|t| solution.placements[t.get()].start);
            debug_assert!(
                order.windows(2).all(|pair| {
                    let a = &solution.placements[pair[0].get()];
                    let b = &solution.placements[pair[1].get()];
                    !MinuteInterval::new(a.start, a.end)
                        .intersects(MinuteInterval::new(b.start, b.end))
                }),
                "search produced overlapping tasks on one track"
            );
            let mut prev: Option<TaskIndex> = None;
            for &t in order.iter() {
                previous_on_track.insert(t.get(), prev);
                prev = Some(t);
            }
        }

        let mut tasks = Vec::with_capacity(solution.placements.len());
        for (i, placement) in solution.placements.iter().enumerate() {
            let task = self.model.task(TaskIndex::new(i));
            let product_info = &self.model.products()[task.product];
            let product = self
                .problem
                .product(&product_info.id)
                .expect("solver model products come from the problem");
            let stage = self
                .problem
                .stages()
                .get(task.stage)
                .expect("solver model stages come from the problem");
            let line_id = self.model.line_id(placement.line);
            let line = self
                .problem
                .lines()
                .get(line_id)
                .expect("solver model lines come from the problem");

            let inter_stage = task.preds.iter().find(|l| l.with_line_transfer);
            let stage_transfer_minutes = inter_stage.map(|l| l.delay).unwrap_or(0);
            let line_transfer_minutes = inter_stage
                .map(|l| {
                    let pred_line = solution.placements[l.pred.get()].line;
                    self.model.line_transfer(pred_line, placement.line)
                })
                .unwrap_or(0);

            let previous_product_on_line = previous_on_track
                .get(&i)
                .copied()
                .flatten()
                .map(|prev| {
                    let prev_task = self.model.task(prev);
                    self.model.products()[prev_task.product].id.clone()
                });

            let start_at = calendar.minutes_to_datetime(
                smt_sched_core::prelude::MinutePoint::new(placement.start),
                reference,
                None,
            )?;
            let end_at = calendar.minutes_to_datetime(
                smt_sched_core::prelude::MinutePoint::new(placement.end),
                reference,
                None,
            )?;

            tasks.push(TaskRecord {
                product: product_info.id.clone(),
                display_name: product.display_name_at(stage, naming),
                stage: task.stage,
                stage_order: stage.order(),
                stage_name: stage.name().to_owned(),
                line: line_id.clone(),
                line_name: line.name().to_owned(),
                quantity: task.qty,
                start_minute: placement.start,
                end_minute: placement.end,
                start_at,
                end_at,
                processing_minutes: placement.end - placement.start,
                stage_transfer_minutes,
                line_transfer_minutes,
                previous_product_on_line,
                batch: task.batch,
                total_batches: task.total_batches,
            });
        }
        tasks.sort_by(|a, b| {
            (a.start_minute, &a.line, a.stage_order)
                .cmp(&(b.start_minute, &b.line, b.stage_order))
        });

        let plan_start = tasks.iter().map(|t| t.start_at).min();
        let expected_completion = tasks.iter().map(|t| t.end_at).max();

        let line_utilizations = self.line_utilizations(&tasks, plan_start, expected_completion);
        let stage_loads = self.stage_loads(&tasks, plan_start, expected_completion);
        let changeover_stats = self.changeover_stats(&tasks);
        let missed_deadlines = self.missed_deadlines(&tasks);

        Ok(DecodedSchedule {
            tasks,
            plan_start,
            expected_completion,
            line_utilizations,
            stage_loads,
            changeover_stats,
            missed_deadlines,
        })
    }

    /// Working minutes a line offers between two dates, inclusive.
    fn line_available_minutes(
        &self,
        line: &smt_sched_model::prelude::LineId,
        from: Option<NaiveDateTime>,
        until: Option<NaiveDateTime>,
    ) -> i64 {
        let (Some(from), Some(until)) = (from, until) else {
            return 0;
        };
        let calendar = self.problem.calendar();
        let mut day = from.date();
        let mut minutes = 0;
        while day <= until.date() {
            minutes += calendar.working_minutes_in_day(day, Some(line));
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        minutes
    }

    fn line_utilizations(
        &self,
        tasks: &[TaskRecord],
        from: Option<NaiveDateTime>,
        until: Option<NaiveDateTime>,
    ) -> Vec<LineUtilization> {
        self.model
            .lines()
            .iter()
            .map(|line_id| {
                let busy: i64 = tasks
                    .iter()
                    .filter(|t| &t.line == line_id)
                    .map(|t| t.processing_minutes + t.line_transfer_minutes)
                    .sum();
                let available = self.line_available_minutes(line_id, from, until);
                LineUtilization {
                    line: line_id.clone(),
                    busy_minutes: busy,
                    available_minutes: available,
                    utilization: if available > 0 {
                        busy as f64 / available as f64
                    } else {
                        0.0
                    },
                }
            })
            .collect()
    }

    fn stage_loads(
        &self,
        tasks: &[TaskRecord],
        from: Option<NaiveDateTime>,
        until: Option<NaiveDateTime>,
    ) -> Vec<StageLoad> {
        self.problem
            .stages()
            .iter_ordered()
            .map(|stage| {
                let required: i64 = tasks
                    .iter()
                    .filter(|t| t.stage == stage.id())
                    .map(|t| t.processing_minutes)
                    .sum();
                let available: i64 = self
                    .problem
                    .lines()
                    .iter_active_supporting(stage.id())
                    .map(|line| self.line_available_minutes(line.id(), from, until))
                    .sum();
                StageLoad {
                    stage: stage.id(),
                    stage_name: stage.name().to_owned(),
                    required_minutes: required,
                    available_minutes: available,
                    bottleneck: required > available,
                }
            })
            .collect()
    }

    /// Product switches per line, summed over its stage tracks.
    fn changeover_stats(&self, tasks: &[TaskRecord]) -> Vec<ChangeoverStats> {
        self.model
            .lines()
            .iter()
            .map(|line_id| {
                let changeovers = tasks
                    .iter()
                    .filter(|t| &t.line == line_id)
                    .filter(|t| {
                        t.previous_product_on_line
                            .as_ref()
                            .is_some_and(|prev| prev != &t.product)
                    })
                    .count() as u32;
                ChangeoverStats {
                    line: line_id.clone(),
                    changeovers,
                }
            })
            .collect()
    }

    /// Products whose last task ends after their due date, with the
    /// delay in working days.
    fn missed_deadlines(&self, tasks: &[TaskRecord]) -> Vec<MissedDeadline> {
        let calendar = self.problem.calendar();
        self.model
            .products()
            .iter()
            .filter_map(|product| {
                let finished_at = tasks
                    .iter()
                    .filter(|t| t.product == product.id)
                    .map(|t| t.end_at)
                    .max()?;
                if finished_at <= product.due {
                    return None;
                }
                Some(MissedDeadline {
                    product: product.id.clone(),
                    due: product.due,
                    finished_at,
                    working_days_late: calendar.working_days_between(
                        product.due.date(),
                        finished_at.date(),
                        None,
                    ),
                })
            })
            .collect()
    }
}

/// Per-product capacity floors, attached to infeasible results: the
/// minimal processing need against the working minutes between release
/// and due, and the feeder demand against the fleet maximum.
pub fn capacity_analyses(problem: &Problem, model: &SolverModel) -> Vec<CapacityAnalysis> {
    let fleet_max = problem.lines().max_feeder_slots();
    model
        .products()
        .iter()
        .enumerate()
        .map(|(index, product)| {
            let min_required: i64 = model
                .tasks()
                .iter()
                .filter(|t| t.product == index)
                .map(|t| t.min_processing())
                .sum();
            CapacityAnalysis {
                product: product.id.clone(),
                min_required_minutes: min_required,
                available_minutes: product.due_minute - product.release_minute,
                feeder_slots_required: product.feeder_slots,
                fleet_max_feeder_slots: fleet_max,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{BnbSearch, SearchConfig};
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

    fn solved(problem: &Problem) -> (SolverModel, SearchSolution) {
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(problem, &ordered).unwrap();
        let (outcome, _) = BnbSearch::new(&model, SearchConfig::default()).run();
        let solution = outcome.solution().cloned().expect("solvable test problem");
        (model, solution)
    }

    fn one_line_problem(products: Vec<Product>) -> Problem {
        let mut builder = ProblemBuilder::new(date())
            .with_stage(Stage::new(sid(1), "Pick & Place", 10))
            .unwrap()
            .with_stage(Stage::new(sid(2), "AOI", 20))
            .unwrap()
            .with_line(
                Line::new(LineId::from("SMT-1"), "Line one")
                    .with_capability(sid(1), 1.0)
                    .unwrap()
                    .with_capability(sid(2), 1.0)
                    .unwrap(),
            );
        for p in products {
            builder = builder.with_product(p);
        }
        builder.build().unwrap()
    }

    fn product(id: &str, qty: u32) -> Product {
        Product::new(
            ProductId::from(id),
            id,
            qty,
            date().and_hms_opt(8, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 27)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_produces_dated_tasks() {
        let problem = one_line_problem(vec![product("P", 100)]);
        let (model, solution) = solved(&problem);
        let decoded = Decoder::new(&problem, &model).decode(&solution).unwrap();

        assert_eq!(decoded.tasks.len(), 2);
        let first = &decoded.tasks[0];
        // Minute 0 is the default shift start on the reference date.
        assert_eq!(
            first.start_at,
            date().and_hms_opt(8, 0, 0).unwrap()
        );
        assert_eq!(first.processing_minutes, first.end_minute - first.start_minute);
        assert_eq!(decoded.plan_start, Some(first.start_at));
        assert!(decoded.expected_completion.is_some());
    }

    #[test]
    fn test_tasks_cross_the_lunch_break() {
        // 100 + 100 minutes from 08:00 with a 12:00-13:00 break: the
        // second task ends at 11:20, well before the break; stretch the
        // first product so the day boundary is exercised instead.
        let problem = one_line_problem(vec![product("P", 300)]);
        let (model, solution) = solved(&problem);
        let decoded = Decoder::new(&problem, &model).decode(&solution).unwrap();

        // 300 min from 08:00 skips 12:00-13:00: ends 14:00.
        let first = &decoded.tasks[0];
        assert_eq!(first.end_at, date().and_hms_opt(14, 0, 0).unwrap());
    }

    #[test]
    fn test_changeovers_counted_on_shared_line() {
        let problem = one_line_problem(vec![product("A", 50), product("B", 50)]);
        let (model, solution) = solved(&problem);
        let decoded = Decoder::new(&problem, &model).decode(&solution).unwrap();

        let stats = &decoded.changeover_stats;
        assert_eq!(stats.len(), 1);
        // Two products alternate at least once per stage track.
        assert!(stats[0].changeovers >= 1);

        // Labels agree with the counts.
        let labeled = decoded
            .tasks
            .iter()
            .filter(|t| {
                t.previous_product_on_line
                    .as_ref()
                    .is_some_and(|p| p != &t.product)
            })
            .count();
        assert_eq!(labeled as u32, stats[0].changeovers);
    }

    #[test]
    fn test_utilization_and_stage_loads() {
        let problem = one_line_problem(vec![product("P", 100)]);
        let (model, solution) = solved(&problem);
        let decoded = Decoder::new(&problem, &model).decode(&solution).unwrap();

        let util = &decoded.line_utilizations[0];
        assert_eq!(util.busy_minutes, 200);
        // One working day in span: 480 available.
        assert_eq!(util.available_minutes, 480);
        assert!((util.utilization - 200.0 / 480.0).abs() < 1e-9);

        assert_eq!(decoded.stage_loads.len(), 2);
        for load in &decoded.stage_loads {
            assert_eq!(load.required_minutes, 100);
            assert!(!load.bottleneck);
        }
    }

    #[test]
    fn test_missed_deadline_reported_with_working_day_delay() {
        // Due on the reference day, but 1000 units need 2000+ minutes.
        let tight = Product::new(
            ProductId::from("late"),
            "late",
            1000,
            date().and_hms_opt(8, 0, 0).unwrap(),
            date().and_hms_opt(17, 0, 0).unwrap(),
        )
        .unwrap();
        let problem = one_line_problem(vec![tight]);
        let (model, solution) = solved(&problem);
        let decoded = Decoder::new(&problem, &model).decode(&solution).unwrap();

        assert_eq!(decoded.missed_deadlines.len(), 1);
        let miss = &decoded.missed_deadlines[0];
        assert!(miss.finished_at > miss.due);
        assert!(miss.working_days_late >= 1);
    }

    #[test]
    fn test_capacity_analysis_floors() {
        let problem = one_line_problem(vec![product("P", 100)]);
        let ordered: Vec<&Product> = problem.products().iter().collect();
        let model = SolverModel::build(&problem, &ordered).unwrap();

        let analyses = capacity_analyses(&problem, &model);
        assert_eq!(analyses.len(), 1);
        // Two stages at 100 minutes each.
        assert_eq!(analyses[0].min_required_minutes, 200);
        assert!(analyses[0].available_minutes > 0);
        assert!(!analyses[0].is_over_time_budget());
    }
}
