//! Route records from a solved assignment.

use serde::Serialize;

use crate::error::ModelError;
use crate::routing::{Assignment, DimensionId, Interval, RoutingModel};

/// One visited node of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    /// Location id.
    pub location: usize,
    /// Arrival time bounds.
    pub time: Interval,
    /// Waiting time bounds; `None` at route ends and where no slack is kept.
    pub slack: Option<Interval>,
    /// Load on board when arriving.
    pub load: i64,
}

/// The schedule of one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    /// Vehicle id.
    pub vehicle: usize,
    /// Start node followed by every visited location, in order.
    pub visits: Vec<NodeRecord>,
    /// The route's end node.
    pub end: NodeRecord,
}

impl RouteRecord {
    /// Returns `true` if the vehicle visits no location besides its depots.
    pub fn is_empty(&self) -> bool {
        self.visits.len() <= 1
    }

    /// Earliest arrival at the end of the route.
    pub fn time(&self) -> i64 {
        self.end.time.min
    }

    /// Load when reaching the end of the route.
    pub fn load(&self) -> i64 {
        self.end.load
    }
}

/// Everything the reporting layer needs from a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionReport {
    /// One record per vehicle.
    pub routes: Vec<RouteRecord>,
    /// Unvisited locations, ascending.
    pub dropped: Vec<usize>,
    /// Sum of the earliest end times over all vehicles.
    pub total_time: i64,
    /// Sum of the end loads over all vehicles.
    pub total_load: i64,
    /// Objective of the assignment.
    pub objective: i64,
}

/// Reads route records out of an [`Assignment`].
///
/// Extraction only reads the assignment, so running it twice on the same
/// assignment gives identical records.
///
/// # Examples
///
/// ```
/// use u_pdptw::extract::SolutionExtractor;
/// use u_pdptw::index::IndexManager;
/// use u_pdptw::routing::RoutingModel;
///
/// let manager = IndexManager::new(2, 1, &[0], &[0]).unwrap();
/// let mut model = RoutingModel::new(manager.clone());
/// let m = manager.clone();
/// let travel = model.register_transit_callback(move |i, j| {
///     if m.index_to_location(i) == m.index_to_location(j) { 0 } else { 3 }
/// });
/// let load = model.register_unary_transit_callback(|_| 0);
/// model.set_arc_cost_evaluator_of_all_vehicles(travel).unwrap();
/// model.add_dimension(travel, 0, 100, false, "Time").unwrap();
/// model.add_dimension(load, 0, 10, true, "Capacity").unwrap();
/// model.close().unwrap();
///
/// let extractor = SolutionExtractor::new(&model).unwrap();
/// assert!(extractor.dropped_from_routes(&[vec![0]]).is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolutionExtractor<'a> {
    model: &'a RoutingModel,
    time: DimensionId,
    load: DimensionId,
}

impl<'a> SolutionExtractor<'a> {
    /// Extractor reading the `"Time"` and `"Capacity"` dimensions.
    pub fn new(model: &'a RoutingModel) -> Result<Self, ModelError> {
        Self::with_dimensions(model, "Time", "Capacity")
    }

    /// Extractor reading arbitrary time and load dimensions.
    pub fn with_dimensions(
        model: &'a RoutingModel,
        time: &str,
        load: &str,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            model,
            time: model.dimension_or_err(time)?.id(),
            load: model.dimension_or_err(load)?.id(),
        })
    }

    /// Per-vehicle records, from each start through each end.
    pub fn routes(&self, assignment: &Assignment) -> Vec<RouteRecord> {
        (0..assignment.num_vehicles())
            .map(|v| {
                let mut visits: Vec<NodeRecord> = assignment
                    .path(v)
                    .into_iter()
                    .map(|i| self.node(assignment, i))
                    .collect();
                // a path always holds at least the start and the end
                let mut end = visits
                    .pop()
                    .unwrap_or_else(|| self.node(assignment, self.model.end(v)));
                end.slack = None;
                RouteRecord {
                    vehicle: v,
                    visits,
                    end,
                }
            })
            .collect()
    }

    /// Locations whose index is its own successor, ascending.
    pub fn dropped(&self, assignment: &Assignment) -> Vec<usize> {
        let manager = self.model.manager();
        manager
            .interior_indices()
            .filter(|&i| assignment.next(i) == i)
            .map(|i| manager.index_to_location(i))
            .collect()
    }

    /// Locations missing from a set of live routes, ascending.
    ///
    /// Lets observers inspect a solution before materializing an
    /// [`Assignment`].
    pub fn dropped_from_routes(&self, routes: &[Vec<usize>]) -> Vec<usize> {
        let manager = self.model.manager();
        let mut visited = vec![false; self.model.num_indices()];
        for &i in routes.iter().flatten() {
            visited[i] = true;
        }
        manager
            .interior_indices()
            .filter(|&i| !visited[i])
            .map(|i| manager.index_to_location(i))
            .collect()
    }

    /// Routes, dropped locations and totals.
    pub fn report(&self, assignment: &Assignment) -> SolutionReport {
        let routes = self.routes(assignment);
        let total_time = routes.iter().map(RouteRecord::time).sum();
        let total_load = routes.iter().map(RouteRecord::load).sum();
        SolutionReport {
            dropped: self.dropped(assignment),
            routes,
            total_time,
            total_load,
            objective: assignment.objective(),
        }
    }

    fn node(&self, assignment: &Assignment, index: usize) -> NodeRecord {
        NodeRecord {
            location: self.model.manager().index_to_location(index),
            time: assignment.cumul(self.time, index),
            slack: assignment.slack(self.time, index),
            load: assignment.cumul(self.load, index).min,
        }
    }
}
