//! Path cheapest arc construction.
//!
//! # Algorithm
//!
//! Vehicles are filled one after another. Each route is extended from its
//! last node by the cheapest arc to a node that keeps the route completable:
//! a candidate is accepted only if the route extended by it, followed by
//! every delivery still owed (and its own delivery, for a pickup), is
//! feasible. Ties go to the lowest location. When no arc fits, the owed
//! deliveries close the route and the next vehicle starts.
//!
//! Units left over after the last vehicle are placed by cheapest insertion.
//! A `stop` request closes the current route with its owed deliveries and
//! leaves every unit not yet placed to that final step, which places none.
//!
//! # Complexity
//!
//! O(n² × n) per vehicle: n extensions, each scanning n candidates with an
//! O(n) feasibility check.

use super::cheapest_insertion::insert_all;
use crate::evaluation::RouteEvaluator;
use crate::routing::{PairRole, Unit};

/// Builds initial routes by extending each vehicle's path along its
/// cheapest feasible arcs.
///
/// Returns one route per vehicle, or `None` if a mandatory location cannot
/// be served, including when `stop` fired before it was placed.
///
/// # Examples
///
/// ```
/// use u_pdptw::constructive::path_cheapest_arc;
/// use u_pdptw::evaluation::RouteEvaluator;
/// use u_pdptw::index::IndexManager;
/// use u_pdptw::routing::RoutingModel;
///
/// let manager = IndexManager::new(4, 1, &[0], &[0]).unwrap();
/// let mut model = RoutingModel::new(manager.clone());
/// let m = manager.clone();
/// let cb = model.register_transit_callback(move |i, j| {
///     (m.index_to_location(i) as i64 - m.index_to_location(j) as i64).abs()
/// });
/// model.set_arc_cost_evaluator_of_all_vehicles(cb).unwrap();
/// model.close().unwrap();
///
/// let eval = RouteEvaluator::new(&model);
/// let routes = path_cheapest_arc(&eval, &|| false).unwrap();
/// let locations: Vec<usize> = routes[0].iter().map(|&i| manager.index_to_location(i)).collect();
/// assert_eq!(locations, vec![1, 2, 3]);
/// ```
pub fn path_cheapest_arc(
    eval: &RouteEvaluator<'_>,
    stop: &dyn Fn() -> bool,
) -> Option<Vec<Vec<usize>>> {
    let model = eval.model();
    let n = model.num_indices();
    let mut placed = vec![false; n];
    let mut routes = vec![Vec::new(); model.num_vehicles()];
    // a grouped disjunction admits one visited member
    let group_taken = |i: usize, placed: &[bool]| {
        model.disjunction_of(i).is_some_and(|d| {
            model.disjunctions()[d]
                .indices()
                .iter()
                .any(|&j| j != i && placed[j])
        })
    };

    for (v, route) in routes.iter_mut().enumerate() {
        let mut owed: Vec<usize> = Vec::new();
        let mut stopped = false;
        loop {
            if stop() {
                stopped = true;
                break;
            }
            let last = route.last().copied().unwrap_or_else(|| model.start(v));

            let mut candidates: Vec<usize> = model
                .manager()
                .interior_indices()
                .filter(|&i| {
                    if owed.contains(&i) {
                        return true;
                    }
                    !placed[i]
                        && !matches!(model.pair_role(i), Some(PairRole::Delivery { .. }))
                        && !group_taken(i, &placed)
                })
                .collect();
            candidates.sort_by_key(|&i| (model.arc_cost(last, i), i));

            let chosen = candidates.into_iter().find(|&x| {
                let mut trial = route.clone();
                trial.push(x);
                if let Some(PairRole::Pickup { delivery }) = model.pair_role(x) {
                    trial.push(delivery);
                }
                trial.extend(owed.iter().copied().filter(|&d| d != x));
                eval.is_feasible(v, &trial)
            });

            match chosen {
                Some(x) => {
                    route.push(x);
                    placed[x] = true;
                    owed.retain(|&d| d != x);
                    if let Some(PairRole::Pickup { delivery }) = model.pair_role(x) {
                        owed.insert(0, delivery);
                    }
                }
                None => break,
            }
        }
        for d in owed {
            route.push(d);
            placed[d] = true;
        }
        if stopped {
            break;
        }
    }

    let pending: Vec<Unit> = model
        .units()
        .iter()
        .copied()
        .filter(|u| !placed[u.head()])
        .collect();
    insert_all(eval, &mut routes, pending, stop)?;
    Some(routes)
}
