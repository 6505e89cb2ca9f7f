// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Turn benchmark measurements into the leaderboard's speedup graphs.
//!
//! The pipeline is a single pass:
//!  - [speedup](crate::speedup) pairs baseline and candidate records of the
//!    same configuration, operation and message size and groups the resulting
//!    points by (configuration, operation);
//!  - [chart](crate::chart) draws one thumbnail per group;
//!  - [report](crate::report) lays the thumbnails out in a
//!    [table](crate::table) with one row per configuration and one column per
//!    operation.
//!
//! Everything that is not fatal (a message size measured by only one library,
//! a requested cell without data) is collected as a
//! [Warning](crate::speedup::Warning) and logged, so that one missing
//! combination does not block publishing the rest of the leaderboard.

pub mod chart;
pub mod config;
pub mod report;
pub mod speedup;
pub mod table;
