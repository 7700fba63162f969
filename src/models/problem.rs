//! Problem instance data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Location, Vehicle};
use crate::distance::TransitMatrix;
use crate::error::ModelError;

/// A pickup location coupled with the delivery location it feeds.
///
/// Both are served by the same vehicle, the pickup first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickupDeliveryPair {
    /// Pickup location id.
    pub pickup: usize,
    /// Delivery location id.
    pub delivery: usize,
}

impl PickupDeliveryPair {
    /// Creates a pair.
    pub fn new(pickup: usize, delivery: usize) -> Self {
        Self { pickup, delivery }
    }
}

/// Immutable input of a pickup-and-delivery instance.
///
/// Locations and vehicles are identified by their position: `locations[k]`
/// must have id `k`, and so must `vehicles[k]`. Locations used as a vehicle
/// start or end are depots; every other location is a stop to serve.
///
/// # Examples
///
/// ```
/// use u_pdptw::distance::TransitMatrix;
/// use u_pdptw::models::{Location, ProblemData, TimeWindow, Vehicle};
///
/// let matrix = TransitMatrix::from_rows(vec![
///     vec![0, 4, 6],
///     vec![4, 0, 3],
///     vec![6, 3, 0],
/// ])
/// .unwrap();
/// let locations = vec![
///     Location::depot(0).with_time_window(TimeWindow::new(0, 5).unwrap()),
///     Location::new(1, 1),
///     Location::new(2, -1),
/// ];
/// let data = ProblemData::new(matrix, locations, vec![Vehicle::new(0, 10)])
///     .with_pair(1, 2)
///     .with_max_waiting(10);
/// assert!(data.validate().is_ok());
/// assert_eq!(data.pairs().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemData {
    matrix: TransitMatrix,
    locations: Vec<Location>,
    vehicles: Vec<Vehicle>,
    #[serde(default)]
    pairs: Vec<PickupDeliveryPair>,
    #[serde(default)]
    allowed_vehicles: BTreeMap<usize, Vec<usize>>,
    #[serde(default = "default_drop_penalty")]
    drop_penalty: Option<i64>,
    #[serde(default = "default_max_waiting")]
    max_waiting: i64,
    #[serde(default = "default_max_route_duration")]
    max_route_duration: i64,
}

fn default_drop_penalty() -> Option<i64> {
    Some(1000)
}

fn default_max_waiting() -> i64 {
    30
}

fn default_max_route_duration() -> i64 {
    360
}

impl ProblemData {
    /// Creates an instance with no pairs and no eligibility restriction.
    ///
    /// Stops may be dropped at a penalty of 1000; waiting is capped at 30
    /// per stop and routes must end by time 360.
    pub fn new(matrix: TransitMatrix, locations: Vec<Location>, vehicles: Vec<Vehicle>) -> Self {
        Self {
            matrix,
            locations,
            vehicles,
            pairs: Vec::new(),
            allowed_vehicles: BTreeMap::new(),
            drop_penalty: default_drop_penalty(),
            max_waiting: default_max_waiting(),
            max_route_duration: default_max_route_duration(),
        }
    }

    /// Adds a pickup/delivery pair.
    pub fn with_pair(mut self, pickup: usize, delivery: usize) -> Self {
        self.pairs.push(PickupDeliveryPair::new(pickup, delivery));
        self
    }

    /// Restricts which vehicles may serve `location`.
    ///
    /// An empty set, or one naming every vehicle, leaves it unrestricted.
    pub fn with_allowed_vehicles(mut self, location: usize, vehicles: Vec<usize>) -> Self {
        self.allowed_vehicles.insert(location, vehicles);
        self
    }

    /// Sets the penalty for leaving a stop unserved; `None` makes every stop
    /// mandatory.
    pub fn with_drop_penalty(mut self, penalty: Option<i64>) -> Self {
        self.drop_penalty = penalty;
        self
    }

    /// Sets the maximum waiting time at a stop.
    pub fn with_max_waiting(mut self, max_waiting: i64) -> Self {
        self.max_waiting = max_waiting;
        self
    }

    /// Sets the latest time any route may end.
    pub fn with_max_route_duration(mut self, duration: i64) -> Self {
        self.max_route_duration = duration;
        self
    }

    /// Travel times between locations.
    pub fn matrix(&self) -> &TransitMatrix {
        &self.matrix
    }

    /// All locations, depots included.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// All vehicles.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Pickup/delivery pairs.
    pub fn pairs(&self) -> &[PickupDeliveryPair] {
        &self.pairs
    }

    /// Eligibility sets by location.
    pub fn allowed_vehicles(&self) -> &BTreeMap<usize, Vec<usize>> {
        &self.allowed_vehicles
    }

    /// Penalty for an unserved stop, if stops are optional.
    pub fn drop_penalty(&self) -> Option<i64> {
        self.drop_penalty
    }

    /// Maximum waiting time at a stop.
    pub fn max_waiting(&self) -> i64 {
        self.max_waiting
    }

    /// Latest time any route may end.
    pub fn max_route_duration(&self) -> i64 {
        self.max_route_duration
    }

    /// Vehicle start locations, by vehicle.
    pub fn starts(&self) -> Vec<usize> {
        self.vehicles.iter().map(Vehicle::start).collect()
    }

    /// Vehicle end locations, by vehicle.
    pub fn ends(&self) -> Vec<usize> {
        self.vehicles.iter().map(Vehicle::end).collect()
    }

    /// Returns `true` if `location` is some vehicle's start or end.
    pub fn is_depot(&self, location: usize) -> bool {
        self.vehicles
            .iter()
            .any(|v| v.start() == location || v.end() == location)
    }

    /// Checks every configuration invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.locations.len();
        let num_vehicles = self.vehicles.len();

        if self.matrix.size() != n || self.matrix.num_entries() != n * n {
            return Err(ModelError::MatrixSizeMismatch {
                expected: n,
                actual: self.matrix.num_entries(),
            });
        }
        if let Some((from, to, value)) = self.matrix.first_negative() {
            return Err(ModelError::NegativeTransit { from, to, value });
        }

        for (position, loc) in self.locations.iter().enumerate() {
            if loc.id() != position {
                return Err(ModelError::IdMismatch {
                    what: "location",
                    position,
                    id: loc.id(),
                });
            }
            let tw = loc.time_window();
            if tw.earliest() > tw.latest() {
                return Err(ModelError::InvalidTimeWindow {
                    location: position,
                    earliest: tw.earliest(),
                    latest: tw.latest(),
                });
            }
        }

        for (position, v) in self.vehicles.iter().enumerate() {
            if v.id() != position {
                return Err(ModelError::IdMismatch {
                    what: "vehicle",
                    position,
                    id: v.id(),
                });
            }
            if v.capacity() < 0 {
                return Err(ModelError::NegativeCapacity {
                    vehicle: position,
                    capacity: v.capacity(),
                });
            }
            for location in [v.start(), v.end()] {
                self.check_location(location)?;
            }
        }

        let mut paired = vec![false; n];
        for pair in &self.pairs {
            self.check_location(pair.pickup)?;
            self.check_location(pair.delivery)?;
            let invalid = pair.pickup == pair.delivery
                || self.is_depot(pair.pickup)
                || self.is_depot(pair.delivery)
                || paired[pair.pickup]
                || paired[pair.delivery];
            if invalid {
                return Err(ModelError::InvalidPair {
                    pickup: pair.pickup,
                    delivery: pair.delivery,
                });
            }
            paired[pair.pickup] = true;
            paired[pair.delivery] = true;
        }

        for (&location, allowed) in &self.allowed_vehicles {
            self.check_location(location)?;
            if let Some(&vehicle) = allowed.iter().find(|&&v| v >= num_vehicles) {
                return Err(ModelError::VehicleOutOfRange {
                    vehicle,
                    num_vehicles,
                });
            }
        }

        if let Some(p) = self.drop_penalty.filter(|&p| p < 0) {
            return Err(ModelError::NegativePenalty(p));
        }
        if self.max_waiting < 0 {
            return Err(ModelError::NegativeLimit {
                what: "max_waiting",
                value: self.max_waiting,
            });
        }
        if self.max_route_duration < 0 {
            return Err(ModelError::NegativeLimit {
                what: "max_route_duration",
                value: self.max_route_duration,
            });
        }
        Ok(())
    }

    fn check_location(&self, location: usize) -> Result<(), ModelError> {
        if location >= self.locations.len() {
            return Err(ModelError::LocationOutOfRange {
                location,
                num_locations: self.locations.len(),
            });
        }
        Ok(())
    }
}
