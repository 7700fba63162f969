//! Local search over routing plans.
//!
//! - [`RoutePlan`] — Working routes with cached costs and disjunction activity
//! - [`TwoOpt`] — Intra-route segment reversal
//! - [`OrOpt`] — Intra-route relocation of 2–3 stop segments
//! - [`Relocate`] / [`PairRelocate`] — Move a stop, or a pickup/delivery pair, anywhere
//! - [`Exchange`] — Swap two stops
//! - [`CrossExchange`] — Swap route tails (2-opt*)
//! - [`InsertUnperformed`] / [`DropUnit`] — Change which optional units are visited
//!
//! Operators implement [`MoveOperator`] and return the first improving
//! feasible [`Move`] in a fixed enumeration order, so a search is
//! reproducible for a given model.

mod activity;
mod exchange;
#[cfg(test)]
pub(crate) mod fixtures;
mod or_opt;
mod plan;
mod relocate;
mod two_opt;

pub use activity::{DropUnit, InsertUnperformed};
pub use exchange::{CrossExchange, Exchange};
pub use or_opt::OrOpt;
pub use plan::{ArcPenalties, Move, MoveContext, MoveOperator, RouteChange, RoutePlan};
pub use relocate::{PairRelocate, Relocate};
pub use two_opt::TwoOpt;

/// The default operator sequence, in the order they are tried.
pub fn default_operators() -> Vec<Box<dyn MoveOperator>> {
    vec![
        Box::new(TwoOpt),
        Box::new(OrOpt::default()),
        Box::new(Relocate),
        Box::new(PairRelocate),
        Box::new(Exchange),
        Box::new(CrossExchange),
        Box::new(InsertUnperformed),
        Box::new(DropUnit),
    ]
}
