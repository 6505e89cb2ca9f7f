// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Benchmark driver for the leaderboard.
//!
//! For every MSCCL algorithm file selected from a directory the driver runs
//! the matching `nccl-tests` binary twice through `mpirun`: once with the
//! baseline NCCL library and once with the candidate algorithm loaded through
//! `MSCCL_XML_FILES`. Each run's output is kept next to the results and the
//! timings of every accepted run are appended to a tab separated
//! `results.txt`.
//!
//! The driver's command line is split in two (see
//! [command_line](crate::command_line)): its own options come first, then the
//! `mpirun` command and everything needed to launch `nccl-tests`.
//!
//! In [Test](crate::runner::RunMode::Test) mode no process is started; canned
//! algorithm and `nccl-tests` outputs are used instead, which allows the whole
//! flow to be exercised on a machine without GPUs.

pub mod algo;
pub mod canned;
pub mod command_line;
pub mod filter;
pub mod results;
pub mod runner;
pub mod sweep;
