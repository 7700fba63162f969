//! Routing index space.
//!
//! Maps location ids to per-occurrence routing indices and owns the notion
//! of per-vehicle start and end indices.

mod manager;

pub use manager::IndexManager;
