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
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateStageError {
    id: StageId,
}

impl DuplicateStageError {
    pub fn new(id: StageId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> StageId {
        self.id
    }
}

impl std::fmt::Display for DuplicateStageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {} is declared more than once", self.id)
    }
}

impl std::error::Error for DuplicateStageError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateStageOrderError {
    id: StageId,
    order: u32,
}

impl DuplicateStageOrderError {
    pub fn new(id: StageId, order: u32) -> Self {
        Self { id, order }
    }

    pub fn id(&self) -> StageId {
        self.id
    }

    pub fn order(&self) -> u32 {
        self.order
    }
}

impl std::fmt::Display for DuplicateStageOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stage {} reuses presentation order {}",
            self.id, self.order
        )
    }
}

impl std::error::Error for DuplicateStageOrderError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StageCatalogError {
    DuplicateId(DuplicateStageError),
    DuplicateOrder(DuplicateStageOrderError),
}

impl std::fmt::Display for StageCatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageCatalogError::DuplicateId(e) => write!(f, "{}", e),
            StageCatalogError::DuplicateOrder(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StageCatalogError {}

impl From<DuplicateStageError> for StageCatalogError {
    fn from(err: DuplicateStageError) -> Self {
        StageCatalogError::DuplicateId(err)
    }
}

impl From<DuplicateStageOrderError> for StageCatalogError {
    fn from(err: DuplicateStageOrderError) -> Self {
        StageCatalogError::DuplicateOrder(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencyOutOfRangeError {
    value: f64,
}

impl EfficiencyOutOfRangeError {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for EfficiencyOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stage efficiency {} lies outside the allowed band [0.1, 1.5]",
            self.value
        )
    }
}

impl std::error::Error for EfficiencyOutOfRangeError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DueNotAfterReleaseError {
    product: ProductId,
    release: NaiveDateTime,
    due: NaiveDateTime,
}

impl DueNotAfterReleaseError {
    pub fn new(product: ProductId, release: NaiveDateTime, due: NaiveDateTime) -> Self {
        Self {
            product,
            release,
            due,
        }
    }

    pub fn product(&self) -> &ProductId {
        &self.product
    }
}

impl std::fmt::Display for DueNotAfterReleaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Product {} has due {} not after release {}",
            self.product, self.due, self.release
        )
    }
}

impl std::error::Error for DueNotAfterReleaseError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmptyRoutingError {
    product: ProductId,
}

impl EmptyRoutingError {
    pub fn new(product: ProductId) -> Self {
        Self { product }
    }

    pub fn product(&self) -> &ProductId {
        &self.product
    }
}

impl std::fmt::Display for EmptyRoutingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Routing for product {} has no steps", self.product)
    }
}

impl std::error::Error for EmptyRoutingError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonIncreasingSequenceError {
    product: ProductId,
    previous: u32,
    next: u32,
}

impl NonIncreasingSequenceError {
    pub fn new(product: ProductId, previous: u32, next: u32) -> Self {
        Self {
            product,
            previous,
            next,
        }
    }

    pub fn product(&self) -> &ProductId {
        &self.product
    }
}

impl std::fmt::Display for NonIncreasingSequenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Routing for product {} has sequence {} not strictly after {}",
            self.product, self.next, self.previous
        )
    }
}

impl std::error::Error for NonIncreasingSequenceError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutingError {
    Empty(EmptyRoutingError),
    NonIncreasingSequence(NonIncreasingSequenceError),
}

impl std::fmt::Display for RoutingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingError::Empty(e) => write!(f, "{}", e),
            RoutingError::NonIncreasingSequence(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RoutingError {}

impl From<EmptyRoutingError> for RoutingError {
    fn from(err: EmptyRoutingError) -> Self {
        RoutingError::Empty(err)
    }
}

impl From<NonIncreasingSequenceError> for RoutingError {
    fn from(err: NonIncreasingSequenceError) -> Self {
        RoutingError::NonIncreasingSequence(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftConfigError {
    start: NaiveTime,
    end: NaiveTime,
}

impl ShiftConfigError {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for ShiftConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Shift window {}..{} is empty or outside its shift",
            self.start, self.end
        )
    }
}

impl std::error::Error for ShiftConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HolidayConfigError {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl HolidayConfigError {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }
}

impl std::fmt::Display for HolidayConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Partial holiday on {} has empty window {}..{}",
            self.date, self.start, self.end
        )
    }
}

impl std::error::Error for HolidayConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HorizonExceededError {
    start: NaiveDate,
    minutes: i64,
}

impl HorizonExceededError {
    pub fn new(start: NaiveDate, minutes: i64) -> Self {
        Self { start, minutes }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }
}

impl std::fmt::Display for HorizonExceededError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Calendar walk from {} exceeded 1000 days with {} working minutes unconsumed",
            self.start, self.minutes
        )
    }
}

impl std::error::Error for HorizonExceededError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CalendarError {
    HorizonExceeded(HorizonExceededError),
}

impl CalendarError {
    #[inline]
    pub fn horizon_exceeded(start: NaiveDate, minutes: i64) -> Self {
        CalendarError::HorizonExceeded(HorizonExceededError::new(start, minutes))
    }
}

impl std::fmt::Display for CalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarError::HorizonExceeded(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CalendarError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownStageError {
    stage: StageId,
    context: String,
}

impl UnknownStageError {
    pub fn new(stage: StageId, context: impl Into<String>) -> Self {
        Self {
            stage,
            context: context.into(),
        }
    }

    pub fn stage(&self) -> StageId {
        self.stage
    }
}

impl std::fmt::Display for UnknownStageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} references unknown stage {}", self.context, self.stage)
    }
}

impl std::error::Error for UnknownStageError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownLineError {
    line: LineId,
    context: String,
}

impl UnknownLineError {
    pub fn new(line: LineId, context: impl Into<String>) -> Self {
        Self {
            line,
            context: context.into(),
        }
    }

    pub fn line(&self) -> &LineId {
        &self.line
    }
}

impl std::fmt::Display for UnknownLineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} references unknown line {}", self.context, self.line)
    }
}

impl std::error::Error for UnknownLineError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateProductError {
    id: ProductId,
}

impl DuplicateProductError {
    pub fn new(id: ProductId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }
}

impl std::fmt::Display for DuplicateProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Product {} is declared more than once", self.id)
    }
}

impl std::error::Error for DuplicateProductError {}

/// Referential errors raised while assembling a [`Problem`](crate::problem::prob::Problem).
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemBuildError {
    StageCatalog(StageCatalogError),
    Routing(RoutingError),
    UnknownStage(UnknownStageError),
    UnknownLine(UnknownLineError),
    DuplicateProduct(DuplicateProductError),
}

impl std::fmt::Display for ProblemBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemBuildError::StageCatalog(e) => write!(f, "{}", e),
            ProblemBuildError::Routing(e) => write!(f, "{}", e),
            ProblemBuildError::UnknownStage(e) => write!(f, "{}", e),
            ProblemBuildError::UnknownLine(e) => write!(f, "{}", e),
            ProblemBuildError::DuplicateProduct(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProblemBuildError {}

impl From<StageCatalogError> for ProblemBuildError {
    fn from(err: StageCatalogError) -> Self {
        ProblemBuildError::StageCatalog(err)
    }
}

impl From<RoutingError> for ProblemBuildError {
    fn from(err: RoutingError) -> Self {
        ProblemBuildError::Routing(err)
    }
}

impl From<UnknownStageError> for ProblemBuildError {
    fn from(err: UnknownStageError) -> Self {
        ProblemBuildError::UnknownStage(err)
    }
}

impl From<UnknownLineError> for ProblemBuildError {
    fn from(err: UnknownLineError) -> Self {
        ProblemBuildError::UnknownLine(err)
    }
}

impl From<DuplicateProductError> for ProblemBuildError {
    fn from(err: DuplicateProductError) -> Self {
        ProblemBuildError::DuplicateProduct(err)
    }
}
