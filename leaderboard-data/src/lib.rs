// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Benchmark data for the leaderboard.
//!
//! Results are collected by running `nccl-tests` once with the baseline
//! library and once with the candidate library, and keeping each log under a
//! data directory laid out as:
//!
//! ```text
//! data/<configuration>/<collective>-<place>/<library>.txt
//! ```
//!
//! for example `data/1xNDv4/Allreduce-inplace/msccl.txt`.
//!
//! The [loader](crate::loader::Loader) walks this tree, parses every log with
//! the [nccl_log](crate::nccl_log) parser and returns a flat list of
//! [MeasurementRecord](crate::types::MeasurementRecord)s. Any malformed log
//! aborts the load with a
//! [DataFormat](crate::error::LeaderboardError::DataFormat) error so that a
//! report is never built from partially understood input.
//!
//! ```rust
//! use std::path::Path;
//!
//! use leaderboard_data::nccl_log::NcclLog;
//!
//! let log = NcclLog::from_string(
//!     Path::new("nccl.txt"),
//!     "#       size         count      type   redop    root     time   algbw   busbw #wrong     time   algbw   busbw #wrong
//!         1024           256     float     sum      -1    75.18    0.01    0.03      0    78.30    0.01    0.02      0
//! ",
//! )
//! .expect("log should parse");
//! assert_eq!(log.rows()[0].size, 1024);
//! ```

pub mod error;
pub mod loader;
pub mod nccl_log;
pub mod types;
