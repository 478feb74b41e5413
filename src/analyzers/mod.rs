//! Score aggregation over time-ordered question records.
//!
//! This module turns an ordered series into a cumulative average, rolling
//! averages under a selectable window policy, and the report that bundles
//! them for output.

pub mod cumulative;
pub mod report;
pub mod rolling;
pub mod types;
pub mod utility;
