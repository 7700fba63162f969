//! Routing model: variables, dimensions, constraints and solutions.

mod assignment;
mod constraints;
mod dimension;
mod model;

pub use assignment::Assignment;
pub use constraints::{Disjunction, PairRole, Unit};
pub use dimension::{DimensionId, Interval, RoutingDimension};
pub use model::RoutingModel;
