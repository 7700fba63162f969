//! Constructive heuristics for building initial routes.
//!
//! - [`cheapest_insertion`] — Parallel cheapest insertion, pairs inserted as one unit
//! - [`path_cheapest_arc`] — Per-vehicle path extension along cheapest feasible arcs
//!
//! Both return one route per vehicle (interior routing indices only) and
//! leave unreachable optional locations unplaced.

mod cheapest_insertion;
mod path_cheapest_arc;

pub(crate) use cheapest_insertion::{best_insertion, insert_unit};
pub use cheapest_insertion::cheapest_insertion;
pub use path_cheapest_arc::path_cheapest_arc;
