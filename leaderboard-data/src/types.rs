// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::fmt;
use std::str::FromStr;

/// Which side of the comparison a measurement belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Library {
    Baseline,
    Candidate,
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Library::Baseline => write!(f, "baseline"),
            Library::Candidate => write!(f, "candidate"),
        }
    }
}

/// Whether a collective writes its result over its input buffer.
///
/// `nccl-tests` times both variants on every row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Place {
    InPlace,
    OutOfPlace,
}

impl FromStr for Place {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inplace" => Ok(Place::InPlace),
            "outofplace" => Ok(Place::OutOfPlace),
            _ => Err(format!("Unknown place '{s}'")),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Place::InPlace => write!(f, "inplace"),
            Place::OutOfPlace => write!(f, "outofplace"),
        }
    }
}

/// A collective operation, optionally qualified by its place.
///
/// Written as `Allreduce` or `Allreduce-inplace`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operation {
    collective: String,
    place: Option<Place>,
}

impl Operation {
    #[must_use]
    pub fn new(collective: &str, place: Option<Place>) -> Self {
        Self {
            collective: collective.to_string(),
            place,
        }
    }

    #[must_use]
    pub fn collective(&self) -> &str {
        &self.collective
    }

    #[must_use]
    pub fn place(&self) -> Option<Place> {
        self.place
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (collective, place) = match s.rsplit_once('-') {
            Some((collective, place)) => (collective, Some(place.parse::<Place>()?)),
            None => (s, None),
        };
        if collective.is_empty() {
            return Err(format!("Missing collective name in '{s}'"));
        }
        Ok(Operation::new(collective, place))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.place {
            Some(place) => write!(f, "{}-{place}", self.collective),
            None => write!(f, "{}", self.collective),
        }
    }
}

/// One timing of one library for one message size.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementRecord {
    configuration: String,
    operation: Operation,
    library: Library,
    message_size: u64,
    time_us: f64,
}

impl MeasurementRecord {
    #[must_use]
    pub fn new(
        configuration: &str,
        operation: Operation,
        library: Library,
        message_size: u64,
        time_us: f64,
    ) -> Self {
        Self {
            configuration: configuration.to_string(),
            operation,
            library,
            message_size,
            time_us,
        }
    }

    #[must_use]
    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    #[must_use]
    pub fn library(&self) -> Library {
        self.library
    }

    /// Message size in bytes.
    #[must_use]
    pub fn message_size(&self) -> u64 {
        self.message_size
    }

    /// Time taken in microseconds.
    #[must_use]
    pub fn time_us(&self) -> f64 {
        self.time_us
    }
}
