//! Intra-route Or-opt segment relocation.
//!
//! # Algorithm
//!
//! Moves a segment of 2 or 3 consecutive stops to another position of the
//! same route, preserving the segment's orientation. Single stops are left
//! to [`Relocate`](super::Relocate). Segments are tried shortest first, then
//! by start position, then by target position.
//!
//! # Complexity
//!
//! O(n²) candidates per route and segment length, each evaluated in O(n).
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::plan::{Move, MoveContext, MoveOperator, RouteChange};

/// Relocation of short segments within a route.
#[derive(Debug, Clone, Copy)]
pub struct OrOpt {
    min_len: usize,
    max_len: usize,
}

impl Default for OrOpt {
    fn default() -> Self {
        Self {
            min_len: 2,
            max_len: 3,
        }
    }
}

impl OrOpt {
    /// Restricts segment lengths to `min_len..=max_len`.
    ///
    /// Returns `None` if `min_len` is zero or exceeds `max_len`.
    pub fn new(min_len: usize, max_len: usize) -> Option<Self> {
        if min_len == 0 || min_len > max_len {
            return None;
        }
        Some(Self { min_len, max_len })
    }
}

/// Moves `route[from..from + len]` so that it starts at `to` in the route
/// without the segment.
fn move_segment(route: &[usize], from: usize, len: usize, to: usize) -> Vec<usize> {
    let segment = &route[from..from + len];
    let mut rest: Vec<usize> = Vec::with_capacity(route.len());
    rest.extend_from_slice(&route[..from]);
    rest.extend_from_slice(&route[from + len..]);
    let mut out = Vec::with_capacity(route.len());
    out.extend_from_slice(&rest[..to]);
    out.extend_from_slice(segment);
    out.extend_from_slice(&rest[to..]);
    out
}

impl MoveOperator for OrOpt {
    fn name(&self) -> &'static str {
        "or_opt"
    }

    fn find_improving(&self, ctx: &MoveContext<'_, '_>) -> Option<Move> {
        for (v, route) in ctx.plan.routes().iter().enumerate() {
            let n = route.len();
            for len in self.min_len..=self.max_len.min(n.saturating_sub(1)) {
                for from in 0..=n - len {
                    if (ctx.stop)() {
                        return None;
                    }
                    for to in 0..=n - len {
                        if to == from {
                            continue;
                        }
                        let change = RouteChange {
                            vehicle: v,
                            route: move_segment(route, from, len, to),
                        };
                        if let Some(mv) = ctx.evaluate(vec![change], 0) {
                            return Some(mv);
                        }
                    }
                }
            }
        }
        None
    }
}
