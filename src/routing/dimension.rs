//! Cumulative dimensions and integer intervals.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A closed integer interval `[min, max]`.
///
/// Used both as a variable domain during propagation and as the realized
/// bounds reported for a cumul or slack variable.
///
/// # Examples
///
/// ```
/// use u_pdptw::routing::Interval;
///
/// let a = Interval::new(0, 10);
/// let b = Interval::new(5, 20);
/// assert_eq!(a.intersect(b), Interval::new(5, 10));
/// assert!(Interval::new(3, 2).is_empty());
/// assert!(Interval::point(4).is_fixed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound (inclusive).
    pub min: i64,
    /// Upper bound (inclusive).
    pub max: i64,
}

impl Interval {
    /// Creates an interval; `min > max` yields an empty interval.
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// The single-value interval `[value, value]`.
    pub fn point(value: i64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Returns `true` if no value satisfies the interval.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns `true` if the interval holds exactly one value.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Returns `true` if `value` lies within the interval.
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Intersection with another interval.
    pub fn intersect(&self, other: Interval) -> Interval {
        Interval {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }
}

/// Identifier of a dimension inside its [`RoutingModel`](super::RoutingModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DimensionId(pub(crate) usize);

impl DimensionId {
    /// Position of the dimension in registration order.
    pub fn get(&self) -> usize {
        self.0
    }
}

/// A resource accumulated along each route.
///
/// For consecutive indices `i → j` on a route:
///
/// ```text
/// cumul(j) = cumul(i) + transit(i, j) + slack(i),   0 <= slack(i) <= slack_max
/// ```
///
/// Every cumul is additionally bounded by its per-index range and by
/// `[0, capacity(vehicle)]` of the serving vehicle.
#[derive(Debug, Clone)]
pub struct RoutingDimension {
    id: DimensionId,
    name: String,
    transit_callback: usize,
    slack_max: i64,
    vehicle_capacities: Vec<i64>,
    fix_start_cumul_to_zero: bool,
    cumul_ranges: Vec<Interval>,
    slack_in_assignment: Vec<bool>,
    size: usize,
}

impl RoutingDimension {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: DimensionId,
        name: String,
        transit_callback: usize,
        slack_max: i64,
        vehicle_capacities: Vec<i64>,
        fix_start_cumul_to_zero: bool,
        num_indices: usize,
        size: usize,
    ) -> Self {
        let horizon = vehicle_capacities.iter().copied().max().unwrap_or(0);
        Self {
            id,
            name,
            transit_callback,
            slack_max,
            vehicle_capacities,
            fix_start_cumul_to_zero,
            cumul_ranges: vec![Interval::new(0, horizon); num_indices],
            slack_in_assignment: vec![false; num_indices],
            size,
        }
    }

    /// Dimension identifier.
    pub fn id(&self) -> DimensionId {
        self.id
    }

    /// Dimension name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the transit callback driving this dimension.
    pub fn transit_callback(&self) -> usize {
        self.transit_callback
    }

    /// Maximum slack between two consecutive indices.
    pub fn slack_max(&self) -> i64 {
        self.slack_max
    }

    /// Capacity (cumul upper bound) of `vehicle`.
    pub fn vehicle_capacity(&self, vehicle: usize) -> i64 {
        self.vehicle_capacities[vehicle]
    }

    /// Returns `true` if every vehicle's start cumul is forced to zero.
    pub fn fix_start_cumul_to_zero(&self) -> bool {
        self.fix_start_cumul_to_zero
    }

    /// Current range of the cumul variable at `index`.
    pub fn cumul_range(&self, index: usize) -> Interval {
        self.cumul_ranges[index]
    }

    /// Restricts the cumul variable at `index` to `[min, max]`.
    ///
    /// The new range is intersected with the current one; an empty result
    /// is a configuration error.
    pub fn set_cumul_range(&mut self, index: usize, min: i64, max: i64) -> Result<(), ModelError> {
        let current = self.cumul_ranges.get(index).copied().ok_or(
            ModelError::IndexOutOfRange {
                index,
                num_indices: self.cumul_ranges.len(),
            },
        )?;
        let range = current.intersect(Interval::new(min, max));
        if range.is_empty() {
            return Err(ModelError::EmptyRange { index, min, max });
        }
        self.cumul_ranges[index] = range;
        Ok(())
    }

    /// Restricts the cumul variable at `index` to `[min, max]`, accepting an
    /// empty result.
    ///
    /// An index whose range is empty cannot appear on any feasible route.
    /// Returns `false` in that case.
    pub fn restrict_cumul_range(
        &mut self,
        index: usize,
        min: i64,
        max: i64,
    ) -> Result<bool, ModelError> {
        let current = self.cumul_ranges.get(index).copied().ok_or(
            ModelError::IndexOutOfRange {
                index,
                num_indices: self.cumul_ranges.len(),
            },
        )?;
        let range = current.intersect(Interval::new(min, max));
        self.cumul_ranges[index] = range;
        Ok(!range.is_empty())
    }

    /// Keeps the slack variable of `index` in solution assignments.
    ///
    /// Vehicle end indices have no slack variable.
    pub fn add_slack_to_assignment(&mut self, index: usize) -> Result<(), ModelError> {
        if index >= self.slack_in_assignment.len() {
            return Err(ModelError::IndexOutOfRange {
                index,
                num_indices: self.slack_in_assignment.len(),
            });
        }
        if index >= self.size {
            return Err(ModelError::NoSlackAtEnd(index));
        }
        self.slack_in_assignment[index] = true;
        Ok(())
    }

    /// Returns `true` if the slack of `index` is kept in assignments.
    pub fn has_slack_in_assignment(&self, index: usize) -> bool {
        self.slack_in_assignment[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimension() -> RoutingDimension {
        // 2 interior + 1 start + 1 end
        RoutingDimension::new(
            DimensionId(0),
            "Time".to_string(),
            0,
            30,
            vec![360],
            false,
            4,
            3,
        )
    }

    #[test]
    fn test_interval_ops() {
        assert!(Interval::new(0, 5).contains(5));
        assert!(!Interval::new(0, 5).contains(6));
        assert!(Interval::new(1, 3).intersect(Interval::new(4, 6)).is_empty());
    }

    #[test]
    fn test_default_range_is_horizon() {
        let d = dimension();
        assert_eq!(d.cumul_range(0), Interval::new(0, 360));
        assert_eq!(d.vehicle_capacity(0), 360);
    }

    #[test]
    fn test_set_cumul_range_intersects() {
        let mut d = dimension();
        d.set_cumul_range(1, 7, 12).expect("valid");
        assert_eq!(d.cumul_range(1), Interval::new(7, 12));
        d.set_cumul_range(1, 10, 500).expect("valid");
        assert_eq!(d.cumul_range(1), Interval::new(10, 12));
        assert!(matches!(
            d.set_cumul_range(1, 13, 20),
            Err(ModelError::EmptyRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_restrict_accepts_empty_range() {
        let mut d = dimension();
        assert_eq!(d.restrict_cumul_range(0, 4, 8), Ok(true));
        assert_eq!(d.cumul_range(0), Interval::new(4, 8));
        assert_eq!(d.restrict_cumul_range(1, 400, 500), Ok(false));
        assert!(d.cumul_range(1).is_empty());
        assert!(matches!(
            d.restrict_cumul_range(9, 0, 1),
            Err(ModelError::IndexOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_no_slack_at_end() {
        let mut d = dimension();
        d.add_slack_to_assignment(2).expect("start has slack");
        assert!(d.has_slack_in_assignment(2));
        assert_eq!(d.add_slack_to_assignment(3), Err(ModelError::NoSlackAtEnd(3)));
    }
}
