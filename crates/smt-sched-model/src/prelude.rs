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

pub use crate::common::{Identifier, IdentifierMarkerName, LineId, ProductId, StageId};
pub use crate::problem::builder::ProblemBuilder;
pub use crate::problem::calendar::{Holiday, Shift, WorkCalendar, MAX_WALK_DAYS};
pub use crate::problem::err::{CalendarError, ProblemBuildError};
pub use crate::problem::flags::FeatureFlags;
pub use crate::problem::line::{Capability, Line, LineFleet};
pub use crate::problem::lot::{LotConfig, LotStrategy};
pub use crate::problem::prob::Problem;
pub use crate::problem::product::{PriorityClass, Product};
pub use crate::problem::routing::{RouteStep, Routing, RoutingCatalog};
pub use crate::problem::stage::{Stage, StageCatalog};
pub use crate::problem::transfer::{LineTransferMatrix, StageTransferMatrix};
pub use crate::solution::{
    CapacityAnalysis, ChangeoverStats, LineUtilization, MissedDeadline, ScheduleResult,
    ScheduleStatus, StageLoad, TaskRecord,
};
pub use crate::validation::{validate, ValidationReport};
