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

use crate::common::LineId;
use crate::problem::err::{CalendarError, HolidayConfigError, ShiftConfigError};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rangemap::RangeSet;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Hard cap on any day-by-day calendar walk. Exceeding it means the
/// calendar cannot place the requested minutes and the conversion is
/// aborted as a fatal error.
pub const MAX_WALK_DAYS: u32 = 1000;

/// A daily shift: start, end, and an optional break window inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    start: NaiveTime,
    end: NaiveTime,
    break_window: Option<(NaiveTime, NaiveTime)>,
}

impl Shift {
    /// Creates a shift; `end` must lie after `start` (overnight shifts
    /// are not supported).
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ShiftConfigError> {
        if end <= start {
            return Err(ShiftConfigError::new(start, end));
        }
        Ok(Self {
            start,
            end,
            break_window: None,
        })
    }

    /// Adds a break; it must lie strictly inside the shift.
    pub fn with_break(
        mut self,
        break_start: NaiveTime,
        break_end: NaiveTime,
    ) -> Result<Self, ShiftConfigError> {
        if break_end <= break_start || break_start < self.start || break_end > self.end {
            return Err(ShiftConfigError::new(break_start, break_end));
        }
        self.break_window = Some((break_start, break_end));
        Ok(self)
    }

    #[inline]
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// The working windows of the shift: the whole span, or two pieces
    /// around the break.
    pub fn windows(&self) -> impl Iterator<Item = (NaiveTime, NaiveTime)> {
        let mut pieces: SmallVec<[(NaiveTime, NaiveTime); 2]> = SmallVec::new();
        match self.break_window {
            Some((bs, be)) => {
                if self.start < bs {
                    pieces.push((self.start, bs));
                }
                if be < self.end {
                    pieces.push((be, self.end));
                }
            }
            None => pieces.push((self.start, self.end)),
        }
        pieces.into_iter()
    }

    /// Working minutes of the shift (break excluded).
    #[inline]
    pub fn working_minutes(&self) -> i64 {
        self.windows()
            .map(|(s, e)| e.signed_duration_since(s).num_minutes())
            .sum()
    }
}

/// A holiday entry: whole-day or partial-day, global or line-scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holiday {
    date: NaiveDate,
    line: Option<LineId>,
    /// `None` for a whole-day holiday, otherwise the non-working window.
    window: Option<(NaiveTime, NaiveTime)>,
}

impl Holiday {
    #[inline]
    pub fn full_day(date: NaiveDate) -> Self {
        Self {
            date,
            line: None,
            window: None,
        }
    }

    pub fn partial(
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, HolidayConfigError> {
        if end <= start {
            return Err(HolidayConfigError::new(date, start, end));
        }
        Ok(Self {
            date,
            line: None,
            window: Some((start, end)),
        })
    }

    /// Restricts the holiday to one line.
    #[inline]
    pub fn for_line(mut self, line: LineId) -> Self {
        self.line = Some(line);
        self
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[inline]
    pub fn is_full_day(&self) -> bool {
        self.window.is_none()
    }

    #[inline]
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        self.window
    }

    /// `true` if the holiday affects the given line (global holidays
    /// affect every line).
    #[inline]
    pub fn applies_to(&self, line: Option<&LineId>) -> bool {
        match (&self.line, line) {
            (None, _) => true,
            (Some(own), Some(asked)) => own == asked,
            (Some(_), None) => false,
        }
    }
}

/// The working calendar: a bijection between wall-clock instants inside
/// working windows and the non-negative working-minute axis anchored at a
/// reference date.
///
/// Shift resolution precedence: per-line override, then per-weekday
/// override, then the default shift.
#[derive(Debug, Clone)]
pub struct WorkCalendar {
    working_days: HashSet<Weekday>,
    default_shift: Shift,
    weekday_shifts: HashMap<Weekday, Shift>,
    line_shifts: HashMap<LineId, Shift>,
    holidays: Vec<Holiday>,
}

impl WorkCalendar {
    /// Monday through Friday on the given default shift.
    #[inline]
    pub fn new(default_shift: Shift) -> Self {
        Self {
            working_days: [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ]
            .into_iter()
            .collect(),
            default_shift,
            weekday_shifts: HashMap::new(),
            line_shifts: HashMap::new(),
            holidays: Vec::new(),
        }
    }

    #[inline]
    pub fn with_working_days<I>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        self.working_days = days.into_iter().collect();
        self
    }

    #[inline]
    pub fn with_weekday_shift(mut self, day: Weekday, shift: Shift) -> Self {
        self.weekday_shifts.insert(day, shift);
        self
    }

    #[inline]
    pub fn with_line_shift(mut self, line: LineId, shift: Shift) -> Self {
        self.line_shifts.insert(line, shift);
        self
    }

    #[inline]
    pub fn with_holiday(mut self, holiday: Holiday) -> Self {
        self.holidays.push(holiday);
        self
    }

    #[inline]
    pub fn default_shift(&self) -> &Shift {
        &self.default_shift
    }

    /// The shift in effect on `date` for `line`.
    #[inline]
    pub fn shift_for(&self, date: NaiveDate, line: Option<&LineId>) -> &Shift {
        if let Some(line) = line {
            if let Some(shift) = self.line_shifts.get(line) {
                return shift;
            }
        }
        self.weekday_shifts
            .get(&date.weekday())
            .unwrap_or(&self.default_shift)
    }

    /// `true` iff `date` falls on a configured working weekday and no
    /// whole-day holiday (global or for `line`) covers it.
    pub fn is_working_day(&self, date: NaiveDate, line: Option<&LineId>) -> bool {
        if !self.working_days.contains(&date.weekday()) {
            return false;
        }
        !self
            .holidays
            .iter()
            .any(|h| h.date() == date && h.is_full_day() && h.applies_to(line))
    }

    /// The working windows of `date`: the shift windows minus any partial
    /// holidays. Empty on non-working days.
    pub fn day_windows(&self, date: NaiveDate, line: Option<&LineId>) -> RangeSet<NaiveTime> {
        let mut windows = RangeSet::new();
        if !self.is_working_day(date, line) {
            return windows;
        }
        for (start, end) in self.shift_for(date, line).windows() {
            windows.insert(start..end);
        }
        for holiday in &self.holidays {
            if holiday.date() != date || !holiday.applies_to(line) {
                continue;
            }
            if let Some((start, end)) = holiday.window() {
                windows.remove(start..end);
            }
        }
        windows
    }

    /// Working minutes available on `date`; 0 on non-working days.
    pub fn working_minutes_in_day(&self, date: NaiveDate, line: Option<&LineId>) -> i64 {
        self.day_windows(date, line)
            .iter()
            .map(|r| r.end.signed_duration_since(r.start).num_minutes())
            .sum()
    }

    /// Maps a wall-clock instant to its coordinate on the working-minute
    /// axis anchored at `reference`.
    ///
    /// Instants before the reference date map to 0; instants outside a
    /// working window map to the amount of working time elapsed before
    /// them on their day.
    pub fn datetime_to_minutes(
        &self,
        at: NaiveDateTime,
        reference: NaiveDate,
        line: Option<&LineId>,
    ) -> smt_sched_core::prelude::MinutePoint {
        use smt_sched_core::prelude::MinutePoint;

        if at.date() < reference {
            return MinutePoint::new(0);
        }

        let mut minutes: i64 = 0;
        let mut day = reference;
        while day < at.date() {
            minutes += self.working_minutes_in_day(day, line);
            day = day.succ_opt().expect("calendar date out of chrono range");
        }

        let time = at.time();
        for window in self.day_windows(at.date(), line).iter() {
            if time >= window.end {
                minutes += window.end.signed_duration_since(window.start).num_minutes();
            } else if time > window.start {
                minutes += time.signed_duration_since(window.start).num_minutes();
            }
        }

        MinutePoint::new(minutes)
    }

    /// The inverse of [`datetime_to_minutes`](Self::datetime_to_minutes):
    /// walks forward from `reference`, consuming each day's working
    /// minutes, and places the remainder inside that day's windows.
    ///
    /// Fails with [`CalendarError::HorizonExceeded`] when more than
    /// [`MAX_WALK_DAYS`] calendar days pass without consuming the
    /// requested minutes.
    pub fn minutes_to_datetime(
        &self,
        at: smt_sched_core::prelude::MinutePoint,
        reference: NaiveDate,
        line: Option<&LineId>,
    ) -> Result<NaiveDateTime, CalendarError> {
        let mut remaining = at.value().max(0);
        let mut day = reference;

        for _ in 0..=MAX_WALK_DAYS {
            let available = self.working_minutes_in_day(day, line);
            if remaining < available {
                for window in self.day_windows(day, line).iter() {
                    let len = window.end.signed_duration_since(window.start).num_minutes();
                    if remaining < len {
                        let time = window.start + Duration::minutes(remaining);
                        return Ok(day.and_time(time));
                    }
                    remaining -= len;
                }
                // remaining < available guarantees placement above.
                unreachable!("day windows shorter than their advertised working minutes");
            }
            remaining -= available;
            day = day.succ_opt().expect("calendar date out of chrono range");
        }

        Err(CalendarError::horizon_exceeded(reference, at.value()))
    }

    /// Advances `from` by `n` working days, skipping non-working days.
    pub fn add_working_days(
        &self,
        from: NaiveDate,
        n: u32,
        line: Option<&LineId>,
    ) -> Result<NaiveDate, CalendarError> {
        if n == 0 {
            return Ok(from);
        }
        let mut day = from;
        let mut counted = 0;
        for _ in 0..MAX_WALK_DAYS {
            day = day.succ_opt().expect("calendar date out of chrono range");
            if self.is_working_day(day, line) {
                counted += 1;
                if counted == n {
                    return Ok(day);
                }
            }
        }
        Err(CalendarError::horizon_exceeded(from, i64::from(n)))
    }

    /// Working days in the half-open date range `(after, until]`.
    pub fn working_days_between(
        &self,
        after: NaiveDate,
        until: NaiveDate,
        line: Option<&LineId>,
    ) -> u32 {
        if until <= after {
            return 0;
        }
        let mut day = after;
        let mut count = 0;
        while day < until {
            day = day.succ_opt().expect("calendar date out of chrono range");
            if self.is_working_day(day, line) {
                count += 1;
            }
        }
        count
    }
}

impl Default for WorkCalendar {
    /// Monday through Friday, 08:00–17:00 with a 12:00–13:00 break.
    fn default() -> Self {
        let shift = Shift::new(
            NaiveTime::from_hms_opt(8, 0, 0).expect("valid shift start"),
            NaiveTime::from_hms_opt(17, 0, 0).expect("valid shift end"),
        )
        .expect("default shift is well-formed")
        .with_break(
            NaiveTime::from_hms_opt(12, 0, 0).expect("valid break start"),
            NaiveTime::from_hms_opt(13, 0, 0).expect("valid break end"),
        )
        .expect("default break is well-formed");
        Self::new(shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smt_sched_core::prelude::MinutePoint;

    #[inline]
    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }
    #[inline]
    fn d(day: u32) -> NaiveDate {
        // June 2025: the 2nd is a Monday.
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }
    #[inline]
    fn lid(s: &str) -> LineId {
        LineId::from(s)
    }

    fn plain_calendar() -> WorkCalendar {
        // 08:00-16:00, no break: 480 minutes per working day.
        WorkCalendar::new(Shift::new(t(8, 0), t(16, 0)).unwrap())
    }

    #[test]
    fn test_shift_validation() {
        assert!(Shift::new(t(16, 0), t(8, 0)).is_err());
        assert!(Shift::new(t(8, 0), t(8, 0)).is_err());
        let s = Shift::new(t(8, 0), t(17, 0)).unwrap();
        assert!(s.with_break(t(7, 0), t(9, 0)).is_err());
        assert!(s.with_break(t(13, 0), t(12, 0)).is_err());

        let with_break = s.with_break(t(12, 0), t(13, 0)).unwrap();
        assert_eq!(with_break.working_minutes(), 480);
        let windows: Vec<_> = with_break.windows().collect();
        assert_eq!(windows, vec![(t(8, 0), t(12, 0)), (t(13, 0), t(17, 0))]);
    }

    #[test]
    fn test_working_day_rules() {
        let cal = plain_calendar().with_holiday(Holiday::full_day(d(4)));

        assert!(cal.is_working_day(d(2), None)); // Monday
        assert!(!cal.is_working_day(d(7), None)); // Saturday
        assert!(!cal.is_working_day(d(8), None)); // Sunday
        assert!(!cal.is_working_day(d(4), None)); // holiday
    }

    #[test]
    fn test_line_scoped_holiday() {
        let cal = plain_calendar().with_holiday(Holiday::full_day(d(3)).for_line(lid("SMT-2")));

        // Global view and other lines are unaffected.
        assert!(cal.is_working_day(d(3), None));
        assert!(cal.is_working_day(d(3), Some(&lid("SMT-1"))));
        assert!(!cal.is_working_day(d(3), Some(&lid("SMT-2"))));
    }

    #[test]
    fn test_partial_holiday_shrinks_day() {
        let cal = plain_calendar()
            .with_holiday(Holiday::partial(d(3), t(14, 0), t(16, 0)).unwrap());

        assert_eq!(cal.working_minutes_in_day(d(2), None), 480);
        assert_eq!(cal.working_minutes_in_day(d(3), None), 360);
        // Still a working day, just shorter.
        assert!(cal.is_working_day(d(3), None));
    }

    #[test]
    fn test_shift_resolution_precedence() {
        let cal = plain_calendar()
            .with_weekday_shift(Weekday::Fri, Shift::new(t(8, 0), t(12, 0)).unwrap())
            .with_line_shift(lid("NIGHT"), Shift::new(t(6, 0), t(10, 0)).unwrap());

        // Friday the 6th: weekday override.
        assert_eq!(cal.working_minutes_in_day(d(6), None), 240);
        // Line override beats the weekday override.
        assert_eq!(cal.working_minutes_in_day(d(6), Some(&lid("NIGHT"))), 240);
        assert_eq!(cal.shift_for(d(6), Some(&lid("NIGHT"))).start(), t(6, 0));
        // Plain Monday: default shift.
        assert_eq!(cal.working_minutes_in_day(d(2), None), 480);
    }

    #[test]
    fn test_datetime_to_minutes_accumulates_working_days() {
        let cal = plain_calendar();
        let reference = d(2); // Monday

        // Shift start of the reference day is minute 0.
        assert_eq!(
            cal.datetime_to_minutes(d(2).and_time(t(8, 0)), reference, None),
            MinutePoint::new(0)
        );
        // Mid-shift Monday.
        assert_eq!(
            cal.datetime_to_minutes(d(2).and_time(t(10, 30)), reference, None),
            MinutePoint::new(150)
        );
        // Tuesday shift start: one full Monday consumed.
        assert_eq!(
            cal.datetime_to_minutes(d(3).and_time(t(8, 0)), reference, None),
            MinutePoint::new(480)
        );
        // The weekend contributes nothing: Monday the 9th starts at 5*480.
        assert_eq!(
            cal.datetime_to_minutes(d(9).and_time(t(8, 0)), reference, None),
            MinutePoint::new(2400)
        );
        // Before the shift on a working day: nothing elapsed yet.
        assert_eq!(
            cal.datetime_to_minutes(d(3).and_time(t(6, 0)), reference, None),
            MinutePoint::new(480)
        );
        // After the shift: the whole day elapsed.
        assert_eq!(
            cal.datetime_to_minutes(d(3).and_time(t(20, 0)), reference, None),
            MinutePoint::new(960)
        );
    }

    #[test]
    fn test_minutes_to_datetime_walks_forward() {
        let cal = plain_calendar();
        let reference = d(2);

        assert_eq!(
            cal.minutes_to_datetime(MinutePoint::new(0), reference, None)
                .unwrap(),
            d(2).and_time(t(8, 0))
        );
        assert_eq!(
            cal.minutes_to_datetime(MinutePoint::new(150), reference, None)
                .unwrap(),
            d(2).and_time(t(10, 30))
        );
        // Exactly one day of work lands on the next working day's start.
        assert_eq!(
            cal.minutes_to_datetime(MinutePoint::new(480), reference, None)
                .unwrap(),
            d(3).and_time(t(8, 0))
        );
        // A full week of work skips the weekend.
        assert_eq!(
            cal.minutes_to_datetime(MinutePoint::new(2400), reference, None)
                .unwrap(),
            d(9).and_time(t(8, 0))
        );
    }

    #[test]
    fn test_round_trip_inside_working_windows() {
        let cal = WorkCalendar::default(); // break 12:00-13:00
        let reference = d(2);

        for instant in [
            d(2).and_time(t(8, 0)),
            d(2).and_time(t(11, 59)),
            d(2).and_time(t(13, 0)),
            d(3).and_time(t(16, 59)),
            d(9).and_time(t(9, 30)),
        ] {
            let minutes = cal.datetime_to_minutes(instant, reference, None);
            let back = cal.minutes_to_datetime(minutes, reference, None).unwrap();
            assert_eq!(back, instant, "round-trip failed for {instant}");
        }
    }

    #[test]
    fn test_break_is_not_working_time() {
        let cal = WorkCalendar::default();
        let reference = d(2);

        // 12:00 and 13:00 denote the same working-minute coordinate.
        let before = cal.datetime_to_minutes(d(2).and_time(t(12, 0)), reference, None);
        let after = cal.datetime_to_minutes(d(2).and_time(t(13, 0)), reference, None);
        assert_eq!(before, after);
        assert_eq!(before, MinutePoint::new(240));
    }

    #[test]
    fn test_minutes_to_datetime_horizon_guard() {
        // No working days at all: minutes can never be consumed.
        let cal = plain_calendar().with_working_days(std::iter::empty());
        let err = cal
            .minutes_to_datetime(MinutePoint::new(1), d(2), None)
            .unwrap_err();
        assert!(matches!(err, CalendarError::HorizonExceeded(_)));
    }

    #[test]
    fn test_add_working_days_skips_weekend() {
        let cal = plain_calendar();
        // Friday the 6th + 1 working day = Monday the 9th.
        assert_eq!(cal.add_working_days(d(6), 1, None).unwrap(), d(9));
        assert_eq!(cal.add_working_days(d(2), 0, None).unwrap(), d(2));
        assert_eq!(cal.add_working_days(d(2), 4, None).unwrap(), d(6));
    }

    #[test]
    fn test_working_days_between() {
        let cal = plain_calendar();
        // (Mon 2nd, Mon 9th]: Tue-Fri + Mon = 5 working days.
        assert_eq!(cal.working_days_between(d(2), d(9), None), 5);
        assert_eq!(cal.working_days_between(d(9), d(2), None), 0);
        assert_eq!(cal.working_days_between(d(6), d(8), None), 0); // weekend only
    }
}
