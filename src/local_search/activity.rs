//! Operators that change which units are visited.
//!
//! [`InsertUnperformed`] tries to visit a dropped unit at its cheapest
//! feasible place; the move pays off when the saved disjunction penalty
//! exceeds the added travel. [`DropUnit`] removes a visited optional unit
//! when its travel costs more than its penalty. Pairs are inserted and
//! dropped as a whole.

use super::plan::{Move, MoveContext, MoveOperator, RouteChange};
use crate::constructive::best_insertion;

/// Visits a currently dropped unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertUnperformed;

impl MoveOperator for InsertUnperformed {
    fn name(&self) -> &'static str {
        "insert_unperformed"
    }

    fn find_improving(&self, ctx: &MoveContext<'_, '_>) -> Option<Move> {
        for &unit in ctx.model().units() {
            if ctx.plan.route_of(unit.head()).is_some() {
                continue;
            }
            if (ctx.stop)() {
                return None;
            }
            let Some(gain) = ctx.activation_gain(unit) else {
                continue;
            };
            let Some(ins) = best_insertion(&ctx.eval, ctx.plan.routes(), unit, None) else {
                continue;
            };
            let change = RouteChange {
                vehicle: ins.vehicle,
                route: ins.route,
            };
            if let Some(mv) = ctx.evaluate(vec![change], -gain) {
                return Some(mv);
            }
        }
        None
    }
}

/// Stops visiting an optional unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropUnit;

impl MoveOperator for DropUnit {
    fn name(&self) -> &'static str {
        "drop_unit"
    }

    fn find_improving(&self, ctx: &MoveContext<'_, '_>) -> Option<Move> {
        let model = ctx.model();
        for &unit in model.units() {
            let Some(v) = ctx.plan.route_of(unit.head()) else {
                continue;
            };
            if !model.is_droppable(unit) {
                continue;
            }
            if (ctx.stop)() {
                return None;
            }
            let members = unit.indices();
            let route: Vec<usize> = ctx
                .plan
                .route(v)
                .iter()
                .copied()
                .filter(|i| !members.contains(i))
                .collect();
            let change = RouteChange { vehicle: v, route };
            if let Some(mv) = ctx.evaluate(vec![change], ctx.drop_cost(unit)) {
                return Some(mv);
            }
        }
        None
    }
}
