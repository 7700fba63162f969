//! End-to-end solve: model setup, search and extraction.
//!
//! [`build_model`] turns [`ProblemData`] into a closed [`RoutingModel`]:
//!
//! 1. travel-time transit, also used as the arc cost
//! 2. one singleton disjunction per stop when stops may be dropped
//! 3. the `"Time"` dimension (waiting up to `max_waiting`, routes ending by
//!    `max_route_duration`, free start time)
//! 4. the `"Capacity"` dimension (signed demand of the departed location,
//!    per-vehicle capacity, empty at the start)
//! 5. time windows on stops and vehicle starts, with their slack kept; a
//!    stop whose window misses the route horizon is kept in the model but
//!    can never be served, while such a start window is an error
//! 6. start and end times minimized by the finalizer
//! 7. pickup/delivery pairs with the pickup no later than the delivery
//! 8. vehicle eligibility
//!
//! [`CpdptwSolver`] then runs the search with a [`SolutionTracker`] attached
//! and extracts the best solution into a [`SolveReport`].

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ModelError;
use crate::extract::{RouteRecord, SolutionExtractor};
use crate::index::IndexManager;
use crate::models::{Location, ProblemData, Vehicle};
use crate::routing::RoutingModel;
use crate::search::{
    CancellationToken, SearchEngine, SearchParameters, SolutionTracker, SolverStatus,
};

/// Name of the time dimension.
pub const TIME: &str = "Time";
/// Name of the load dimension.
pub const CAPACITY: &str = "Capacity";

/// Objective values kept by the tracker unless configured otherwise.
const DEFAULT_MAX_TRACKED_SOLUTIONS: usize = 15;

/// Builds and closes the routing model of an instance.
pub fn build_model(data: &ProblemData) -> Result<RoutingModel, ModelError> {
    data.validate()?;
    let num_vehicles = data.vehicles().len();
    let manager = IndexManager::new(
        data.locations().len(),
        num_vehicles,
        &data.starts(),
        &data.ends(),
    )?;
    let mut model = RoutingModel::new(manager.clone());

    let matrix = data.matrix().clone();
    let m = manager.clone();
    let travel = model.register_transit_callback(move |i, j| {
        matrix.get(m.index_to_location(i), m.index_to_location(j))
    });
    model.set_arc_cost_evaluator_of_all_vehicles(travel)?;

    if let Some(penalty) = data.drop_penalty() {
        for i in manager.interior_indices() {
            model.add_disjunction(&[i], penalty)?;
        }
    }

    model.add_dimension(
        travel,
        data.max_waiting(),
        data.max_route_duration(),
        false,
        TIME,
    )?;

    let demands: Vec<i64> = data.locations().iter().map(Location::demand).collect();
    let m = manager.clone();
    let load = model.register_unary_transit_callback(move |i| demands[m.index_to_location(i)]);
    let capacities = data.vehicles().iter().map(Vehicle::capacity).collect();
    model.add_dimension_with_vehicle_capacity(load, 0, capacities, true, CAPACITY)?;

    let time = model.dimension_mut(TIME)?;
    for i in manager.interior_indices() {
        let location = manager.index_to_location(i);
        let tw = data.locations()[location].time_window();
        if !time.restrict_cumul_range(i, tw.earliest(), tw.latest())? {
            debug!(location, "time window outside the route horizon; stop unservable");
        }
        time.add_slack_to_assignment(i)?;
    }
    for (v, vehicle) in data.vehicles().iter().enumerate() {
        let start = manager.start(v);
        let tw = data.locations()[vehicle.start()].time_window();
        time.set_cumul_range(start, tw.earliest(), tw.latest())?;
        time.add_slack_to_assignment(start)?;
    }

    for v in 0..num_vehicles {
        model.add_variable_minimized_by_finalizer(TIME, manager.start(v))?;
        model.add_variable_minimized_by_finalizer(TIME, manager.end(v))?;
    }

    for pair in data.pairs() {
        let invalid = ModelError::InvalidPair {
            pickup: pair.pickup,
            delivery: pair.delivery,
        };
        let pickup = manager
            .location_to_index(pair.pickup)
            .ok_or_else(|| invalid.clone())?;
        let delivery = manager.location_to_index(pair.delivery).ok_or(invalid)?;
        model.add_pickup_and_delivery(pickup, delivery)?;
        model.add_cumul_less_or_equal(TIME, pickup, delivery)?;
    }

    for (&location, allowed) in data.allowed_vehicles() {
        if data.is_depot(location) {
            debug!(location, "eligibility on a depot ignored");
            continue;
        }
        if let Some(index) = manager.location_to_index(location) {
            model.set_allowed_vehicles_for_index(allowed, index)?;
        }
    }

    model.close()?;
    Ok(model)
}

/// Outcome of [`CpdptwSolver::solve`], ready for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveReport {
    /// How the search ended.
    pub status: SolverStatus,
    /// One record per vehicle; empty when no solution was found.
    pub routes: Vec<RouteRecord>,
    /// Unserved locations, ascending.
    pub dropped: Vec<usize>,
    /// Sum of the earliest end times over all vehicles.
    pub total_time: i64,
    /// Sum of the end loads over all vehicles.
    pub total_load: i64,
    /// Objective of the returned solution.
    pub objective: Option<i64>,
    /// Strictly decreasing objective values seen during the search.
    pub objective_trace: Vec<i64>,
    /// Total search time.
    pub wall_time: Duration,
}

impl SolveReport {
    /// Returns `true` if the report carries routes.
    pub fn has_solution(&self) -> bool {
        self.objective.is_some()
    }
}

/// Pickup-and-delivery solver over one instance.
///
/// # Examples
///
/// ```
/// use u_pdptw::distance::TransitMatrix;
/// use u_pdptw::models::{Location, ProblemData, Vehicle};
/// use u_pdptw::search::SearchParameters;
/// use u_pdptw::solver::CpdptwSolver;
///
/// let matrix = TransitMatrix::from_rows(vec![
///     vec![0, 2, 4],
///     vec![2, 0, 2],
///     vec![4, 2, 0],
/// ])
/// .unwrap();
/// let locations = vec![Location::depot(0), Location::new(1, 1), Location::new(2, -1)];
/// let data = ProblemData::new(matrix, locations, vec![Vehicle::new(0, 1)]).with_pair(1, 2);
///
/// let solver = CpdptwSolver::new(&data).unwrap();
/// let report = solver.solve(&SearchParameters::default()).unwrap();
/// assert!(report.dropped.is_empty());
/// let stops: Vec<usize> = report.routes[0].visits.iter().map(|n| n.location).collect();
/// assert_eq!(stops, vec![0, 1, 2]);
/// ```
#[derive(Debug)]
pub struct CpdptwSolver {
    model: RoutingModel,
    max_tracked_solutions: usize,
}

impl CpdptwSolver {
    /// Validates `data` and builds its model.
    pub fn new(data: &ProblemData) -> Result<Self, ModelError> {
        let model = build_model(data)?;
        debug!(
            indices = model.num_indices(),
            vehicles = model.num_vehicles(),
            "model built"
        );
        Ok(Self {
            model,
            max_tracked_solutions: DEFAULT_MAX_TRACKED_SOLUTIONS,
        })
    }

    /// Finishes the search once this many improving objectives were seen.
    pub fn with_max_tracked_solutions(mut self, max: usize) -> Self {
        self.max_tracked_solutions = max;
        self
    }

    /// The closed routing model.
    pub fn model(&self) -> &RoutingModel {
        &self.model
    }

    /// Solves without external cancellation.
    pub fn solve(&self, params: &SearchParameters) -> Result<SolveReport, ModelError> {
        self.solve_with(params, CancellationToken::new())
    }

    /// Solves, stopping early once `token` is cancelled.
    pub fn solve_with(
        &self,
        params: &SearchParameters,
        token: CancellationToken,
    ) -> Result<SolveReport, ModelError> {
        let extractor = SolutionExtractor::new(&self.model)?;
        let mut tracker = SolutionTracker::new(self.max_tracked_solutions);
        let outcome = {
            let mut engine = SearchEngine::new(&self.model, params)?.with_cancellation(token);
            engine.add_callback(&mut tracker);
            engine.run()
        };

        let mut report = SolveReport {
            status: outcome.status,
            routes: Vec::new(),
            dropped: Vec::new(),
            total_time: 0,
            total_load: 0,
            objective: outcome.objective,
            objective_trace: tracker.into_trace(),
            wall_time: outcome.wall_time,
        };
        if let Some(assignment) = &outcome.assignment {
            let extracted = extractor.report(assignment);
            report.routes = extracted.routes;
            report.dropped = extracted.dropped;
            report.total_time = extracted.total_time;
            report.total_load = extracted.total_load;
        }
        info!(
            status = ?report.status,
            dropped = report.dropped.len(),
            total_time = report.total_time,
            "solve finished"
        );
        Ok(report)
    }
}

/// Builds the model of `data` and solves it.
pub fn solve(data: &ProblemData, params: &SearchParameters) -> Result<SolveReport, ModelError> {
    CpdptwSolver::new(data)?.solve(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::TransitMatrix;
    use crate::models::TimeWindow;
    use crate::search::FirstSolutionStrategy;

    /// Depot 0 plus three stops at distance 2 from each other.
    fn data() -> ProblemData {
        let matrix = TransitMatrix::from_rows(vec![
            vec![0, 2, 2, 2],
            vec![2, 0, 2, 2],
            vec![2, 2, 0, 2],
            vec![2, 2, 2, 0],
        ])
        .expect("square");
        let locations = vec![
            Location::depot(0).with_time_window(TimeWindow::new(0, 5).expect("valid")),
            Location::new(1, 1),
            Location::new(2, -1),
            Location::new(3, 0),
        ];
        ProblemData::new(matrix, locations, vec![Vehicle::new(0, 2), Vehicle::new(1, 2)])
            .with_pair(1, 2)
    }

    #[test]
    fn test_build_model_layout() {
        let model = build_model(&data()).expect("valid");
        assert!(model.is_closed());
        assert_eq!(model.disjunctions().len(), 3);
        assert_eq!(model.finalizer_vars().len(), 4);
        let time = model.dimension(TIME).expect("time");
        assert_eq!(time.slack_max(), 30);
        assert_eq!(time.cumul_range(model.start(1)).max, 5);
        let capacity = model.dimension(CAPACITY).expect("capacity");
        assert!(capacity.fix_start_cumul_to_zero());
        assert!(model.pair_role(0).is_some());
    }

    #[test]
    fn test_build_model_rejects_bad_data() {
        let bad = data().with_pair(3, 9);
        assert!(matches!(
            build_model(&bad),
            Err(ModelError::LocationOutOfRange { location: 9, .. })
        ));
    }

    #[test]
    fn test_window_past_horizon_is_unservable() {
        let late = TimeWindow::new(400, 500).expect("valid");
        let mut locations = data().locations().to_vec();
        locations[3] = Location::new(3, 0).with_time_window(late);
        let late_data =
            ProblemData::new(data().matrix().clone(), locations, data().vehicles().to_vec());
        let model = build_model(&late_data).expect("window is valid input");
        let index = model.manager().location_to_index(3).expect("interior");
        assert!(model.dimension(TIME).expect("time").cumul_range(index).is_empty());
        let eval = crate::evaluation::RouteEvaluator::new(&model);
        assert!(!eval.is_feasible(0, &[index]));
    }

    #[test]
    fn test_start_window_past_horizon_is_an_error() {
        let late = TimeWindow::new(400, 500).expect("valid");
        let mut locations = data().locations().to_vec();
        locations[0] = Location::depot(0).with_time_window(late);
        let late_data =
            ProblemData::new(data().matrix().clone(), locations, data().vehicles().to_vec());
        assert!(matches!(
            build_model(&late_data),
            Err(ModelError::EmptyRange { min: 400, max: 500, .. })
        ));
    }

    #[test]
    fn test_eligibility_restricts_vehicle() {
        let data = data().with_allowed_vehicles(3, vec![1]);
        let model = build_model(&data).expect("valid");
        let index = model.manager().location_to_index(3).expect("interior");
        assert!(!model.is_vehicle_allowed(0, index));
        assert!(model.is_vehicle_allowed(1, index));
        let report = CpdptwSolver::new(&data)
            .expect("valid")
            .solve(&SearchParameters::default())
            .expect("closed");
        let serving: Vec<usize> = report
            .routes
            .iter()
            .filter(|r| r.visits.iter().any(|n| n.location == 3))
            .map(|r| r.vehicle)
            .collect();
        assert_eq!(serving, vec![1]);
    }

    #[test]
    fn test_solve_serves_everything() {
        let report = solve(&data(), &SearchParameters::default()).expect("valid");
        assert_eq!(report.status, SolverStatus::OptimalWithinLimit);
        assert!(report.dropped.is_empty());
        assert_eq!(report.objective, Some(8));
        assert_eq!(report.objective_trace.last().copied(), report.objective);
        assert_eq!(report.routes.len(), 2);
        assert_eq!(report.total_load, 0);
    }

    #[test]
    fn test_mandatory_unreachable_is_infeasible() {
        let mut rows = vec![vec![0, 50, 2, 2]; 4];
        for (k, row) in rows.iter_mut().enumerate() {
            row[k] = 0;
        }
        let matrix = TransitMatrix::from_rows(rows).expect("square");
        let locations = vec![
            Location::depot(0),
            Location::new(1, 0).with_time_window(TimeWindow::new(0, 10).expect("valid")),
            Location::new(2, 0),
            Location::new(3, 0),
        ];
        let data = ProblemData::new(matrix, locations, vec![Vehicle::new(0, 1)])
            .with_drop_penalty(None);
        let report = solve(&data, &SearchParameters::default()).expect("valid");
        assert_eq!(report.status, SolverStatus::Infeasible);
        assert!(!report.has_solution());
        assert!(report.routes.is_empty());
    }

    #[test]
    fn test_path_cheapest_arc_strategy() {
        let params = SearchParameters::default()
            .with_first_solution_strategy(FirstSolutionStrategy::PathCheapestArc);
        let report = solve(&data(), &params).expect("valid");
        assert!(report.has_solution());
        assert!(report.dropped.is_empty());
    }
}
