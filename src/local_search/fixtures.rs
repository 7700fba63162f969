//! Small closed models shared by the operator tests.

use super::plan::{ArcPenalties, Move, MoveContext, MoveOperator, RoutePlan};
use crate::evaluation::RouteEvaluator;
use crate::index::IndexManager;
use crate::routing::RoutingModel;

/// Locations 0..=4 on a line, shared depot 0, travel = distance.
///
/// Interior location `l` has routing index `l - 1`. Time allows up to 10
/// waiting per stop within a horizon of 100. Each location in `optional`
/// may be dropped at a penalty of 100.
pub(crate) fn line_model(vehicles: usize, optional: &[usize]) -> RoutingModel {
    line_model_with_pairs(vehicles, optional, &[])
}

/// Like [`line_model`] with pickup/delivery pairs given as locations.
pub(crate) fn line_model_with_pairs(
    vehicles: usize,
    optional: &[usize],
    pairs: &[(usize, usize)],
) -> RoutingModel {
    let depots = vec![0; vehicles];
    let manager = IndexManager::new(5, vehicles, &depots, &depots).expect("valid");
    let mut model = RoutingModel::new(manager.clone());
    let m = manager.clone();
    let cb = model.register_transit_callback(move |i, j| {
        (m.index_to_location(i) as i64 - m.index_to_location(j) as i64).abs()
    });
    model
        .set_arc_cost_evaluator_of_all_vehicles(cb)
        .expect("valid");
    model.add_dimension(cb, 10, 100, false, "Time").expect("valid");
    for &loc in optional {
        let i = manager.location_to_index(loc).expect("interior");
        model.add_disjunction(&[i], 100).expect("valid");
    }
    for &(p, d) in pairs {
        let p = manager.location_to_index(p).expect("interior");
        let d = manager.location_to_index(d).expect("interior");
        model.add_pickup_and_delivery(p, d).expect("valid");
        model.add_cumul_less_or_equal("Time", p, d).expect("valid");
    }
    model.close().expect("closes");
    model
}

/// First improving move of `op` from `routes`, without GLS penalties.
pub(crate) fn first_move(
    model: &RoutingModel,
    routes: Vec<Vec<usize>>,
    op: &dyn MoveOperator,
) -> Option<Move> {
    let eval = RouteEvaluator::new(model);
    let plan = RoutePlan::new(&eval, routes);
    let penalties = ArcPenalties::new(model.num_indices());
    let ctx = MoveContext {
        eval,
        plan: &plan,
        penalties: &penalties,
        stop: &|| false,
    };
    op.find_improving(&ctx)
}
