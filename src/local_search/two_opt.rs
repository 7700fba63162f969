//! Intra-route 2-opt.
//!
//! # Algorithm
//!
//! For each pair of positions `i < j` in a route, reverse the segment
//! `[i..=j]`. On a symmetric matrix the arc cost change is:
//!
//! ```text
//! delta = c(r[i-1], r[j]) + c(r[i], r[j+1]) - c(r[i-1], r[i]) - c(r[j], r[j+1])
//! ```
//!
//! Costs may be asymmetric, so candidates are re-costed in full. The first
//! reversal that lowers the augmented cost and keeps the route feasible is
//! returned. Reversals that put a delivery before its pickup are rejected by
//! the feasibility check.
//!
//! # Complexity
//!
//! O(n²) candidates per route, each evaluated in O(n).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::plan::{Move, MoveContext, MoveOperator, RouteChange};

/// Segment reversal within one route.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOpt;

impl MoveOperator for TwoOpt {
    fn name(&self) -> &'static str {
        "two_opt"
    }

    fn find_improving(&self, ctx: &MoveContext<'_, '_>) -> Option<Move> {
        for (v, route) in ctx.plan.routes().iter().enumerate() {
            let n = route.len();
            for i in 0..n.saturating_sub(1) {
                if (ctx.stop)() {
                    return None;
                }
                for j in i + 1..n {
                    let mut candidate = route.clone();
                    candidate[i..=j].reverse();
                    let change = RouteChange {
                        vehicle: v,
                        route: candidate,
                    };
                    if let Some(mv) = ctx.evaluate(vec![change], 0) {
                        return Some(mv);
                    }
                }
            }
        }
        None
    }
}
