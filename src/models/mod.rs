//! Domain model types for pickup-and-delivery problems.
//!
//! Provides the immutable instance data: locations with signed demands and
//! time windows, vehicles with capacities and depots, pickup/delivery pairs,
//! and [`ProblemData`] which ties them to a transit matrix.

mod location;
mod problem;
mod vehicle;

pub use location::{Location, TimeWindow};
pub use problem::{PickupDeliveryPair, ProblemData};
pub use vehicle::Vehicle;
