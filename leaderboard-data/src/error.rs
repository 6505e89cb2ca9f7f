// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Errors shared by the leaderboard crates.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[macro_export]
/// Build a [DataFormat](crate::error::LeaderboardError::DataFormat) error
/// result from a path, an optional line number and a format string.
macro_rules! data_format_error {
    ($path:expr, $line:expr, $($arg:tt)+) => {
        Err($crate::error::LeaderboardError::DataFormat {
            path: $path.to_path_buf(),
            line: $line,
            message: format!($($arg)+),
        })
    };
}

/// Any error that stops the leaderboard tools.
///
/// Recoverable problems (such as a message size measured by only one library)
/// are not errors; they are reported as warnings by the report generator.
#[derive(Debug)]
pub enum LeaderboardError {
    /// A measurement file is malformed or misses a required field.
    DataFormat {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    /// Reading an input or writing an output failed.
    Io { path: PathBuf, source: io::Error },

    /// The chart backend failed to draw or save an image.
    Render(String),

    /// The configuration could not be extracted or is invalid.
    Config(String),

    /// The benchmark driver was invoked incorrectly.
    Bench(String),
}

impl LeaderboardError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LeaderboardError::DataFormat {
                path,
                line: Some(line),
                message,
            } => write!(f, "Data format error: {}:{line}: {message}", path.display()),
            LeaderboardError::DataFormat {
                path,
                line: None,
                message,
            } => write!(f, "Data format error: {}: {message}", path.display()),
            LeaderboardError::Io { path, source } => {
                write!(f, "I/O error: {}: {source}", path.display())
            }
            LeaderboardError::Render(msg) => write!(f, "Render error: {msg}"),
            LeaderboardError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LeaderboardError::Bench(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl Error for LeaderboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LeaderboardError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type LeaderboardResult<T> = Result<T, LeaderboardError>;
