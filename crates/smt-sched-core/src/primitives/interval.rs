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

use num_traits::PrimInt;
use smallvec::SmallVec;
use std::cmp::{max, min};

/// A half-open interval `[start, end)` over an integer axis.
///
/// Tasks occupy `[start, end)` on the working-minute axis, so two tasks
/// that merely touch (`a.end == b.start`) do *not* overlap. All set
/// operations below follow that convention.
///
/// # Invariants
/// `start <= end`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval<T>
where
    T: PrimInt,
{
    start: T,
    end: T,
}

impl<T> Interval<T>
where
    T: PrimInt,
{
    /// Creates a new interval.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    #[inline]
    pub fn new(start: T, end: T) -> Self {
        assert!(
            start <= end,
            "Invalid interval: start must be less than or equal to end"
        );
        Self { start, end }
    }

    /// Creates a new interval, returning `None` if `start > end`.
    #[inline]
    pub fn try_new(start: T, end: T) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    #[inline]
    fn new_unchecked(start: T, end: T) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// The inclusive start bound.
    #[inline]
    pub const fn start(&self) -> T {
        self.start
    }

    /// The exclusive end bound.
    #[inline]
    pub const fn end(&self) -> T {
        self.end
    }

    /// The length of the interval (`end - start`).
    #[inline]
    pub fn len(&self) -> T {
        self.end - self.start
    }

    /// `true` if the interval is empty (`start == end`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `true` if the intervals share at least one point.
    ///
    /// Touching intervals (`a.end == b.start`) do not intersect.
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `true` if `value` lies in `[start, end)`.
    #[inline]
    pub fn contains_point(&self, value: T) -> bool {
        self.start <= value && value < self.end
    }

    /// `true` if `other` lies entirely within `self`.
    #[inline]
    pub fn contains_interval(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The overlapping part of two intervals, or `None` when disjoint.
    #[inline]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let new_start = max(self.start, other.start);
        let new_end = min(self.end, other.end);

        if new_start < new_end {
            Some(Self::new_unchecked(new_start, new_end))
        } else {
            None
        }
    }

    /// The single contiguous union, or `None` when a gap separates the two.
    #[inline]
    pub fn union(&self, other: Self) -> Option<Self> {
        let touches_or_overlaps =
            self.start <= other.end && other.start <= self.end;
        if touches_or_overlaps {
            Some(Self {
                start: min(self.start, other.start),
                end: max(self.end, other.end),
            })
        } else {
            None
        }
    }

    /// The set difference `self - other`.
    ///
    /// Yields zero pieces when `other` covers `self`, one when it clips a
    /// side or is disjoint, and two when it punches a hole.
    pub fn difference(&self, other: Self) -> SmallVec<[Self; 2]> {
        if !self.intersects(other) {
            return smallvec::smallvec![*self];
        }

        let mut result = SmallVec::new();
        if self.start < other.start {
            result.push(Self::new_unchecked(self.start, other.start));
        }
        if self.end > other.end {
            result.push(Self::new_unchecked(other.end, self.end));
        }
        result
    }

    /// The gap between two strictly disjoint intervals, or `None`.
    #[inline]
    pub fn gap(&self, other: Self) -> Option<Self> {
        if self.end < other.start {
            Some(Self::new_unchecked(self.end, other.start))
        } else if other.end < self.start {
            Some(Self::new_unchecked(other.end, self.start))
        } else {
            None
        }
    }
}

impl<T> Default for Interval<T>
where
    T: PrimInt,
{
    #[inline]
    fn default() -> Self {
        Self {
            start: T::zero(),
            end: T::zero(),
        }
    }
}

impl<T> std::fmt::Debug for Interval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interval")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish()
    }
}

impl<T> std::fmt::Display for Interval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl<T> From<std::ops::Range<T>> for Interval<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(range: std::ops::Range<T>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl<T> From<Interval<T>> for std::ops::Range<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(iv: Interval<T>) -> Self {
        iv.start..iv.end
    }
}
