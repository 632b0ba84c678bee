//! Analysis modules.
//!
//! Aggregation over businesses and review-level helpers for rendering.

pub mod aggregator;
pub mod reviews;

pub use aggregator::*;
pub use reviews::*;
