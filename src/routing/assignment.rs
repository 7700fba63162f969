//! Complete solutions of a routing model.

use super::dimension::{DimensionId, Interval};

/// A complete, feasible solution of a [`RoutingModel`](super::RoutingModel).
///
/// Every start index is the head of a path of `next` pointers ending at the
/// matching end index. Interior indices that are not visited point to
/// themselves. End indices also point to themselves since they carry no
/// successor.
///
/// Cumul values are reported as the bounds that remain after propagation
/// and finalization; slack values only for indices that requested them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    next: Vec<usize>,
    vehicle: Vec<Option<usize>>,
    starts: Vec<usize>,
    ends: Vec<usize>,
    cumuls: Vec<Vec<Interval>>,
    slacks: Vec<Vec<Option<Interval>>>,
    objective: i64,
}

impl Assignment {
    pub(crate) fn new(
        next: Vec<usize>,
        vehicle: Vec<Option<usize>>,
        starts: Vec<usize>,
        ends: Vec<usize>,
        cumuls: Vec<Vec<Interval>>,
        slacks: Vec<Vec<Option<Interval>>>,
        objective: i64,
    ) -> Self {
        Self {
            next,
            vehicle,
            starts,
            ends,
            cumuls,
            slacks,
            objective,
        }
    }

    /// Successor of `index`.
    pub fn next(&self, index: usize) -> usize {
        self.next[index]
    }

    /// Vehicle serving `index`, or `None` if the index is not visited.
    pub fn vehicle(&self, index: usize) -> Option<usize> {
        self.vehicle[index]
    }

    /// Returns `true` if `index` lies on some vehicle's path.
    pub fn is_performed(&self, index: usize) -> bool {
        self.vehicle[index].is_some()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.starts.len()
    }

    /// Indices visited by `vehicle`, from its start to its end inclusive.
    pub fn path(&self, vehicle: usize) -> Vec<usize> {
        let end = self.ends[vehicle];
        let mut path = vec![self.starts[vehicle]];
        let mut current = self.starts[vehicle];
        while current != end {
            current = self.next[current];
            path.push(current);
        }
        path
    }

    /// Returns `true` if `vehicle` goes straight from its start to its end.
    pub fn is_vehicle_used(&self, vehicle: usize) -> bool {
        self.next[self.starts[vehicle]] != self.ends[vehicle]
    }

    /// Cumul bounds of `index` in `dimension`.
    pub fn cumul(&self, dimension: DimensionId, index: usize) -> Interval {
        self.cumuls[dimension.get()][index]
    }

    /// Slack bounds of `index` in `dimension`, if kept in the assignment.
    pub fn slack(&self, dimension: DimensionId, index: usize) -> Option<Interval> {
        self.slacks[dimension.get()][index]
    }

    /// Total objective: arc costs of used vehicles plus penalties of
    /// unvisited disjunctions.
    pub fn objective(&self) -> i64 {
        self.objective
    }
}
