//! Travel time matrices.
//!
//! Provides a dense, possibly asymmetric transit matrix for routing problems.

mod matrix;

pub use matrix::TransitMatrix;
