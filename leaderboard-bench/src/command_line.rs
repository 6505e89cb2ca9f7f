// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Split the driver's command line.
//!
//! ```text
//! bench <bench options> <mpirun> <mpirun arguments> [<launcher.sh>] <nccl-tests/build> <nccl-tests arguments>
//! ```
//!
//! The split is positional rather than left to the option parser because many
//! `mpirun` options (such as `-hostfile`) would otherwise be mistaken for the
//! driver's own short options.

use std::path::{MAIN_SEPARATOR, PathBuf};

use leaderboard_data::error::{LeaderboardError, LeaderboardResult};

const MPIRUN_SUFFIX: &str = "mpirun";
const LAUNCHER_SUFFIX: &str = "launcher.sh";
const NP_OPTION: &str = "-np";
const ENV_OPTION: &str = "-x";

/// Environment variable used to hand the algorithm to the MSCCL runtime.
pub const MSCCL_XML_FILES: &str = "MSCCL_XML_FILES";

fn nccl_tests_suffix() -> String {
    format!("nccl-tests{MAIN_SEPARATOR}build")
}

/// Index of the `mpirun` command. The program name is never considered.
#[must_use]
pub fn find_mpirun(args: &[String]) -> Option<usize> {
    args.iter()
        .skip(1)
        .position(|arg| arg.ends_with(MPIRUN_SUFFIX))
        .map(|i| i + 1)
}

/// Everything needed to launch `nccl-tests` through `mpirun`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchCommand {
    mpirun: String,
    np: Option<u32>,
    mpirun_args: Vec<String>,
    launcher: Option<PathBuf>,
    nccl_tests: PathBuf,
    nccl_tests_args: Vec<String>,
}

impl LaunchCommand {
    /// Parse the arguments starting at the `mpirun` command.
    ///
    /// Any `-np` is removed from the `mpirun` arguments since the number of
    /// processes comes from each algorithm.
    pub fn parse(args: &[String]) -> LeaderboardResult<Self> {
        let Some((mpirun, rest)) = args.split_first() else {
            return Err(LeaderboardError::Bench(
                "mpirun command not found in arguments".to_string(),
            ));
        };
        if !mpirun.ends_with(MPIRUN_SUFFIX) {
            return Err(LeaderboardError::Bench(format!(
                "{mpirun} must be the mpirun command"
            )));
        }

        let nccl_tests_suffix = nccl_tests_suffix();
        let mut np = None;
        let mut mpirun_args = Vec::new();
        let mut remaining = rest.iter().peekable();
        while let Some(arg) = remaining.next_if(|arg| {
            !arg.ends_with(&nccl_tests_suffix) && !arg.ends_with(LAUNCHER_SUFFIX)
        }) {
            if arg == NP_OPTION {
                let Some(value) = remaining.next() else {
                    return Err(LeaderboardError::Bench(format!(
                        "{NP_OPTION} requires a value"
                    )));
                };
                let parsed = value.parse::<u32>().map_err(|_| {
                    LeaderboardError::Bench(format!("{NP_OPTION} value '{value}' is not a number"))
                })?;
                np = Some(parsed);
                continue;
            }
            if arg == ENV_OPTION
                && remaining
                    .peek()
                    .is_some_and(|env| env.starts_with(&format!("{MSCCL_XML_FILES}=")))
            {
                return Err(LeaderboardError::Bench(format!(
                    "{MSCCL_XML_FILES} must not be set on the mpirun command line, \
                     the algorithms are taken from --directory"
                )));
            }
            mpirun_args.push(arg.clone());
        }

        let launcher = remaining
            .next_if(|arg| arg.ends_with(LAUNCHER_SUFFIX))
            .map(PathBuf::from);

        let Some(nccl_tests) = remaining.next_if(|arg| arg.ends_with(&nccl_tests_suffix)) else {
            return Err(LeaderboardError::Bench(format!(
                "{nccl_tests_suffix} not found in command line arguments"
            )));
        };

        Ok(Self {
            mpirun: mpirun.clone(),
            np,
            mpirun_args,
            launcher,
            nccl_tests: PathBuf::from(nccl_tests),
            nccl_tests_args: remaining.cloned().collect(),
        })
    }

    #[must_use]
    pub fn mpirun(&self) -> &str {
        &self.mpirun
    }

    /// The `-np` given on the command line, if any.
    #[must_use]
    pub fn np(&self) -> Option<u32> {
        self.np
    }

    #[must_use]
    pub fn mpirun_args(&self) -> &[String] {
        &self.mpirun_args
    }

    #[must_use]
    pub fn launcher(&self) -> Option<&PathBuf> {
        self.launcher.as_ref()
    }

    /// The `nccl-tests/build` directory.
    #[must_use]
    pub fn nccl_tests(&self) -> &PathBuf {
        &self.nccl_tests
    }

    #[must_use]
    pub fn nccl_tests_args(&self) -> &[String] {
        &self.nccl_tests_args
    }
}
