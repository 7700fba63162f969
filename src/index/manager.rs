//! Location ⇄ routing index mapping.

use crate::error::ModelError;

/// Maps external location ids to internal routing indices and back.
///
/// Every location that is neither a vehicle start nor a vehicle end gets
/// exactly one index. Every vehicle additionally owns one start index and one
/// end index, even when several vehicles share the same depot location, so
/// start/end indices never collide.
///
/// Index layout: interior locations first (ascending location id), then one
/// start index per vehicle, then one end index per vehicle. Indices below
/// [`size`](Self::size) carry a successor; end indices do not.
///
/// # Examples
///
/// ```
/// use u_pdptw::index::IndexManager;
///
/// // 4 locations, 2 vehicles sharing depot 0
/// let m = IndexManager::new(4, 2, &[0, 0], &[0, 0]).unwrap();
/// assert_eq!(m.size(), 5);          // 3 interior + 2 starts
/// assert_eq!(m.num_indices(), 7);   // + 2 ends
/// assert_ne!(m.start(0), m.start(1));
/// assert_eq!(m.index_to_location(m.start(1)), 0);
/// assert_eq!(m.index_to_location(m.location_to_index(2).unwrap()), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexManager {
    num_locations: usize,
    num_vehicles: usize,
    num_interior: usize,
    index_to_location: Vec<usize>,
    location_to_index: Vec<Option<usize>>,
}

impl IndexManager {
    /// Builds the index space.
    ///
    /// Fails when `starts`/`ends` do not hold one entry per vehicle or
    /// reference a location outside `0..num_locations`.
    pub fn new(
        num_locations: usize,
        num_vehicles: usize,
        starts: &[usize],
        ends: &[usize],
    ) -> Result<Self, ModelError> {
        if starts.len() != num_vehicles || ends.len() != num_vehicles {
            return Err(ModelError::VehicleCountMismatch {
                vehicles: num_vehicles,
                starts: starts.len(),
                ends: ends.len(),
            });
        }
        if let Some(&bad) = starts
            .iter()
            .chain(ends.iter())
            .find(|&&l| l >= num_locations)
        {
            return Err(ModelError::LocationOutOfRange {
                location: bad,
                num_locations,
            });
        }

        let mut is_depot = vec![false; num_locations];
        for &l in starts.iter().chain(ends.iter()) {
            is_depot[l] = true;
        }

        let mut index_to_location = Vec::with_capacity(num_locations + 2 * num_vehicles);
        let mut location_to_index = vec![None; num_locations];
        for (loc, &depot) in is_depot.iter().enumerate() {
            if !depot {
                location_to_index[loc] = Some(index_to_location.len());
                index_to_location.push(loc);
            }
        }
        let num_interior = index_to_location.len();
        index_to_location.extend_from_slice(starts);
        index_to_location.extend_from_slice(ends);

        // Depot locations resolve to the first start using them, else the first end.
        for (v, &l) in starts.iter().enumerate() {
            if location_to_index[l].is_none() {
                location_to_index[l] = Some(num_interior + v);
            }
        }
        for (v, &l) in ends.iter().enumerate() {
            if location_to_index[l].is_none() {
                location_to_index[l] = Some(num_interior + num_vehicles + v);
            }
        }

        Ok(Self {
            num_locations,
            num_vehicles,
            num_interior,
            index_to_location,
            location_to_index,
        })
    }

    /// Number of locations.
    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Number of interior (non start/end) indices.
    pub fn num_interior(&self) -> usize {
        self.num_interior
    }

    /// Number of indices that carry a successor (interior + starts).
    pub fn size(&self) -> usize {
        self.num_interior + self.num_vehicles
    }

    /// Total number of indices (interior + starts + ends).
    pub fn num_indices(&self) -> usize {
        self.index_to_location.len()
    }

    /// Start index of `vehicle`.
    ///
    /// # Panics
    ///
    /// Panics if `vehicle >= num_vehicles`.
    pub fn start(&self, vehicle: usize) -> usize {
        assert!(vehicle < self.num_vehicles, "vehicle out of range");
        self.num_interior + vehicle
    }

    /// End index of `vehicle`.
    ///
    /// # Panics
    ///
    /// Panics if `vehicle >= num_vehicles`.
    pub fn end(&self, vehicle: usize) -> usize {
        assert!(vehicle < self.num_vehicles, "vehicle out of range");
        self.num_interior + self.num_vehicles + vehicle
    }

    /// Returns `true` if `index` is a vehicle start.
    pub fn is_start(&self, index: usize) -> bool {
        index >= self.num_interior && index < self.size()
    }

    /// Returns `true` if `index` is a vehicle end.
    pub fn is_end(&self, index: usize) -> bool {
        index >= self.size() && index < self.num_indices()
    }

    /// Vehicle owning a start or end index; `None` for interior indices.
    pub fn vehicle_of(&self, index: usize) -> Option<usize> {
        if self.is_start(index) {
            Some(index - self.num_interior)
        } else if self.is_end(index) {
            Some(index - self.size())
        } else {
            None
        }
    }

    /// Location id of a routing index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_indices`.
    pub fn index_to_location(&self, index: usize) -> usize {
        self.index_to_location[index]
    }

    /// Routing index of a location.
    ///
    /// Depot locations resolve to the start index of the first vehicle
    /// leaving from them (or the first end index if no vehicle starts there).
    /// Returns `None` for out-of-range locations.
    pub fn location_to_index(&self, location: usize) -> Option<usize> {
        self.location_to_index.get(location).copied().flatten()
    }

    /// Routing indices of all interior locations.
    pub fn interior_indices(&self) -> std::ops::Range<usize> {
        0..self.num_interior
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_depot() {
        let m = IndexManager::new(5, 3, &[0, 0, 0], &[0, 0, 0]).expect("valid");
        assert_eq!(m.num_interior(), 4);
        assert_eq!(m.size(), 7);
        assert_eq!(m.num_indices(), 10);
        let starts: Vec<usize> = (0..3).map(|v| m.start(v)).collect();
        let ends: Vec<usize> = (0..3).map(|v| m.end(v)).collect();
        assert_eq!(starts, vec![4, 5, 6]);
        assert_eq!(ends, vec![7, 8, 9]);
        for &i in starts.iter().chain(ends.iter()) {
            assert_eq!(m.index_to_location(i), 0);
        }
        assert_eq!(m.location_to_index(0), Some(4));
    }

    #[test]
    fn test_interior_roundtrip() {
        let m = IndexManager::new(6, 1, &[2], &[4]).expect("valid");
        for loc in [0, 1, 3, 5] {
            let idx = m.location_to_index(loc).expect("interior");
            assert!(idx < m.num_interior());
            assert_eq!(m.index_to_location(idx), loc);
        }
        assert_eq!(m.location_to_index(2), Some(m.start(0)));
        assert_eq!(m.location_to_index(4), Some(m.end(0)));
        assert_eq!(m.location_to_index(6), None);
    }

    #[test]
    fn test_vehicle_specific_depots() {
        let m = IndexManager::new(4, 2, &[0, 1], &[0, 1]).expect("valid");
        assert_eq!(m.num_interior(), 2);
        assert_eq!(m.index_to_location(m.start(1)), 1);
        assert_eq!(m.vehicle_of(m.end(1)), Some(1));
        assert_eq!(m.vehicle_of(0), None);
        assert!(m.is_start(m.start(0)));
        assert!(m.is_end(m.end(0)));
        assert!(!m.is_end(m.start(1)));
    }

    #[test]
    fn test_length_mismatch() {
        let err = IndexManager::new(4, 2, &[0], &[0, 0]).unwrap_err();
        assert_eq!(
            err,
            ModelError::VehicleCountMismatch {
                vehicles: 2,
                starts: 1,
                ends: 2
            }
        );
    }

    #[test]
    fn test_depot_out_of_range() {
        assert!(matches!(
            IndexManager::new(3, 1, &[3], &[0]),
            Err(ModelError::LocationOutOfRange { location: 3, .. })
        ));
    }
}
