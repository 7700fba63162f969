//! Vehicle type with capacity and depot parameters.

use serde::{Deserialize, Serialize};

/// A vehicle that serves one route from its start location to its end location.
///
/// # Examples
///
/// ```
/// use u_pdptw::models::Vehicle;
///
/// let v = Vehicle::new(0, 15);
/// assert_eq!(v.capacity(), 15);
/// assert_eq!(v.start(), 0);
///
/// let v = Vehicle::new(1, 10).with_start(3).with_end(4);
/// assert_eq!((v.start(), v.end()), (3, 4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    capacity: i64,
    start: usize,
    end: usize,
}

impl Vehicle {
    /// Creates a vehicle with the given ID and capacity, based at location 0.
    pub fn new(id: usize, capacity: i64) -> Self {
        Self {
            id,
            capacity,
            start: 0,
            end: 0,
        }
    }

    /// Sets both start and end to the same depot location.
    pub fn with_depot(mut self, depot: usize) -> Self {
        self.start = depot;
        self.end = depot;
        self
    }

    /// Sets the start location.
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Sets the end location.
    pub fn with_end(mut self, end: usize) -> Self {
        self.end = end;
        self
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Start location id.
    pub fn start(&self) -> usize {
        self.start
    }

    /// End location id.
    pub fn end(&self) -> usize {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = Vehicle::new(2, 15);
        assert_eq!(v.id(), 2);
        assert_eq!(v.capacity(), 15);
        assert_eq!(v.start(), 0);
        assert_eq!(v.end(), 0);
    }

    #[test]
    fn test_vehicle_with_depot() {
        let v = Vehicle::new(0, 5).with_depot(7);
        assert_eq!(v.start(), 7);
        assert_eq!(v.end(), 7);
    }
}
