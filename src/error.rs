//! Configuration errors raised while building a routing model.
//!
//! Every variant is fatal at setup time: it is reported before the search
//! starts and never retried. Infeasibility, limits and cancellation are not
//! errors; they are reported through [`SolverStatus`](crate::search::SolverStatus).

use std::fmt;

/// An error in the problem data or in the way the model is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Per-vehicle start or end list does not have one entry per vehicle.
    VehicleCountMismatch {
        /// Number of vehicles declared.
        vehicles: usize,
        /// Length of the starts list.
        starts: usize,
        /// Length of the ends list.
        ends: usize,
    },
    /// A per-vehicle list does not have one entry per vehicle.
    CapacityCountMismatch {
        /// Number of vehicles.
        expected: usize,
        /// Number of capacities supplied.
        actual: usize,
    },
    /// The transit matrix is not square or its size differs from the location count.
    MatrixSizeMismatch {
        /// Expected side length.
        expected: usize,
        /// Actual data length.
        actual: usize,
    },
    /// A transit entry is negative.
    NegativeTransit {
        /// Origin location.
        from: usize,
        /// Destination location.
        to: usize,
        /// Offending value.
        value: i64,
    },
    /// A location or vehicle id differs from its position in the input list.
    IdMismatch {
        /// `"location"` or `"vehicle"`.
        what: &'static str,
        /// Position in the list.
        position: usize,
        /// Id found at that position.
        id: usize,
    },
    /// A location id is outside `0..num_locations`.
    LocationOutOfRange {
        /// Offending location id.
        location: usize,
        /// Number of locations.
        num_locations: usize,
    },
    /// A vehicle id is outside `0..num_vehicles`.
    VehicleOutOfRange {
        /// Offending vehicle id.
        vehicle: usize,
        /// Number of vehicles.
        num_vehicles: usize,
    },
    /// A routing index is outside the index space.
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of indices.
        num_indices: usize,
    },
    /// A vehicle capacity is negative.
    NegativeCapacity {
        /// Vehicle id.
        vehicle: usize,
        /// Offending capacity.
        capacity: i64,
    },
    /// A time window has `earliest > latest`.
    InvalidTimeWindow {
        /// Location id.
        location: usize,
        /// Earliest arrival.
        earliest: i64,
        /// Latest arrival.
        latest: i64,
    },
    /// A disjunction penalty is negative.
    NegativePenalty(i64),
    /// A slack or bound is negative.
    NegativeLimit {
        /// Which limit.
        what: &'static str,
        /// Offending value.
        value: i64,
    },
    /// A disjunction has no member.
    EmptyDisjunction,
    /// A vehicle start or end index was used where an interior index is required.
    NotInterior(usize),
    /// An index already belongs to another disjunction.
    DuplicateDisjunction(usize),
    /// A pair uses the same index twice or an index that is already paired.
    InvalidPair {
        /// Pickup index.
        pickup: usize,
        /// Delivery index.
        delivery: usize,
    },
    /// No dimension with the given name exists.
    UnknownDimension(String),
    /// A dimension with the given name is already registered.
    DuplicateDimension(String),
    /// A transit callback id was never registered.
    UnknownCallback(usize),
    /// A slack variable was requested for a vehicle end index.
    NoSlackAtEnd(usize),
    /// A cumul range is empty.
    EmptyRange {
        /// Routing index.
        index: usize,
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },
    /// No arc cost evaluator was set before closing the model.
    MissingArcCost,
    /// The model is closed and can no longer be modified.
    ModelClosed,
    /// The model must be closed before it can be searched.
    ModelNotClosed,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::VehicleCountMismatch {
                vehicles,
                starts,
                ends,
            } => write!(
                f,
                "expected {} vehicle starts and ends, got {} starts and {} ends",
                vehicles, starts, ends
            ),
            ModelError::CapacityCountMismatch { expected, actual } => write!(
                f,
                "expected {} vehicle capacities, got {}",
                expected, actual
            ),
            ModelError::MatrixSizeMismatch { expected, actual } => write!(
                f,
                "transit matrix must be {}x{}, got {} entries",
                expected, expected, actual
            ),
            ModelError::NegativeTransit { from, to, value } => {
                write!(f, "negative transit {} from {} to {}", value, from, to)
            }
            ModelError::IdMismatch { what, position, id } => {
                write!(f, "{} at position {} has id {}", what, position, id)
            }
            ModelError::LocationOutOfRange {
                location,
                num_locations,
            } => write!(
                f,
                "location {} out of range (num_locations = {})",
                location, num_locations
            ),
            ModelError::VehicleOutOfRange {
                vehicle,
                num_vehicles,
            } => write!(
                f,
                "vehicle {} out of range (num_vehicles = {})",
                vehicle, num_vehicles
            ),
            ModelError::IndexOutOfRange { index, num_indices } => write!(
                f,
                "index {} out of range (num_indices = {})",
                index, num_indices
            ),
            ModelError::NegativeCapacity { vehicle, capacity } => {
                write!(f, "vehicle {} has negative capacity {}", vehicle, capacity)
            }
            ModelError::InvalidTimeWindow {
                location,
                earliest,
                latest,
            } => write!(
                f,
                "location {} has an invalid time window [{}, {}]",
                location, earliest, latest
            ),
            ModelError::NegativePenalty(p) => write!(f, "negative disjunction penalty {}", p),
            ModelError::NegativeLimit { what, value } => {
                write!(f, "{} must be non-negative, got {}", what, value)
            }
            ModelError::EmptyDisjunction => write!(f, "disjunction has no member"),
            ModelError::NotInterior(index) => {
                write!(f, "index {} is a vehicle start or end", index)
            }
            ModelError::DuplicateDisjunction(index) => {
                write!(f, "index {} already belongs to a disjunction", index)
            }
            ModelError::InvalidPair { pickup, delivery } => write!(
                f,
                "invalid pickup/delivery pair ({}, {})",
                pickup, delivery
            ),
            ModelError::UnknownDimension(name) => write!(f, "unknown dimension '{}'", name),
            ModelError::DuplicateDimension(name) => {
                write!(f, "dimension '{}' already exists", name)
            }
            ModelError::UnknownCallback(id) => write!(f, "unknown transit callback {}", id),
            ModelError::NoSlackAtEnd(index) => {
                write!(f, "index {} is a vehicle end and carries no slack", index)
            }
            ModelError::EmptyRange { index, min, max } => {
                write!(f, "empty cumul range [{}, {}] at index {}", min, max, index)
            }
            ModelError::MissingArcCost => write!(f, "no arc cost evaluator was set"),
            ModelError::ModelClosed => write!(f, "the model is closed"),
            ModelError::ModelNotClosed => write!(f, "the model has not been closed"),
        }
    }
}

impl std::error::Error for ModelError {}
