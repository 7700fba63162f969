//! Route feasibility checking, schedules and cost evaluation.

mod evaluator;

pub use evaluator::{RouteEvaluator, RouteSchedule};
