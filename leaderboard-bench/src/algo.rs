// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! MSCCL algorithm files.
//!
//! Only the attributes of the root element are needed to drive a benchmark:
//!
//! ```xml
//! <algo name="Allgather(n=16)-..." nchannels="8" proto="Simple" ngpus="16" coll="allgather" inplace="1">
//!   <gpu id="0" ...>
//!   ...
//! </algo>
//! ```

use std::fmt::Display;
use std::path::Path;

use leaderboard_data::data_format_error;
use leaderboard_data::error::{LeaderboardError, LeaderboardResult};
use leaderboard_data::types::Place;
use quick_xml::Reader;
use quick_xml::events::Event;

const ROOT_TAG: &str = "algo";

/// The root attributes of an MSCCL algorithm file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Algorithm {
    name: String,
    protocol: String,
    num_gpus: u32,
    collective: String,
    place: Place,
}

impl Algorithm {
    /// Parse the root `<algo>` element. `path` is only used to report errors.
    pub fn parse(path: &Path, content: &str) -> LeaderboardResult<Self> {
        let mut reader = Reader::from_str(content);
        let root = loop {
            match reader.read_event().map_err(|e| xml_error(path, e))? {
                Event::Start(tag) | Event::Empty(tag) => break tag,
                Event::Eof => return data_format_error!(path, None, "no XML root element found"),
                _ => {}
            }
        };

        let tag = String::from_utf8_lossy(root.name().as_ref()).into_owned();
        if tag != ROOT_TAG {
            return data_format_error!(path, None, "root element is <{tag}>, expected <{ROOT_TAG}>");
        }

        let mut attrs = Vec::new();
        for attr in root.attributes() {
            let attr = attr.map_err(|e| xml_error(path, e))?;
            let value = attr.unescape_value().map_err(|e| xml_error(path, e))?;
            attrs.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value.into_owned(),
            ));
        }
        let attr = |key: &str| attribute(path, &attrs, key);

        let ngpus = attr("ngpus")?;
        let Ok(num_gpus) = ngpus.parse::<u32>() else {
            return data_format_error!(path, None, "ngpus '{ngpus}' is not a number");
        };
        let place = match attr("inplace")? {
            "1" => Place::InPlace,
            "0" => Place::OutOfPlace,
            other => return data_format_error!(path, None, "inplace '{other}' is not 0 or 1"),
        };

        Ok(Self {
            name: attr("name")?.to_string(),
            protocol: attr("proto")?.to_string(),
            num_gpus,
            collective: attr("coll")?.to_string(),
            place,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    #[must_use]
    pub fn num_gpus(&self) -> u32 {
        self.num_gpus
    }

    /// The collective as written in the file, e.g. `allgather`.
    #[must_use]
    pub fn collective(&self) -> &str {
        &self.collective
    }

    /// The only place the algorithm implements.
    #[must_use]
    pub fn place(&self) -> Place {
        self.place
    }

    /// Name of the `nccl-tests` binary measuring this collective.
    pub fn perf_test(&self, path: &Path) -> LeaderboardResult<&'static str> {
        match self.collective.to_lowercase().as_str() {
            "allreduce" => Ok("all_reduce_perf"),
            "allgather" => Ok("all_gather_perf"),
            "alltoall" => Ok("all_to_all_perf"),
            _ => data_format_error!(path, None, "unexpected collective '{}'", self.collective),
        }
    }
}

fn attribute<'a>(path: &Path, attrs: &'a [(String, String)], key: &str) -> LeaderboardResult<&'a str> {
    match attrs.iter().find(|(k, _)| k == key) {
        Some((_, v)) => Ok(v.as_str()),
        None => data_format_error!(path, None, "missing attribute '{key}' on <{ROOT_TAG}>"),
    }
}

fn xml_error(path: &Path, err: impl Display) -> LeaderboardError {
    LeaderboardError::DataFormat {
        path: path.to_path_buf(),
        line: None,
        message: format!("invalid XML: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use leaderboard_data::error::LeaderboardError;

    use super::*;
    use crate::canned::ALGORITHM_XML;

    fn parse(content: &str) -> LeaderboardResult<Algorithm> {
        Algorithm::parse(Path::new("algo.xml"), content)
    }

    #[test]
    fn canned_algorithm() {
        let algo = parse(ALGORITHM_XML).unwrap();
        assert!(algo.name().starts_with("Allgather(n=16)-DistributedRelayedSwitch"));
        assert_eq!(algo.protocol(), "Simple");
        assert_eq!(algo.num_gpus(), 16);
        assert_eq!(algo.collective(), "allgather");
        assert_eq!(algo.place(), Place::InPlace);
        assert_eq!(algo.perf_test(Path::new("algo.xml")).unwrap(), "all_gather_perf");
    }

    #[test]
    fn prolog_and_single_quotes() {
        let algo = parse(
            "<?xml version=\"1.0\"?>\n<!-- generated -->\n<algo name='a&amp;b' proto='LL' ngpus='8' coll='AllReduce' inplace='0'/>",
        )
        .unwrap();
        assert_eq!(algo.name(), "a&b");
        assert_eq!(algo.place(), Place::OutOfPlace);
        assert_eq!(algo.perf_test(Path::new("algo.xml")).unwrap(), "all_reduce_perf");
    }

    #[test]
    fn doctype_prolog() {
        let algo = parse(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE algo>\n<algo name=\"ring\" proto=\"LL128\" ngpus=\"4\" coll=\"alltoall\" inplace=\"0\"></algo>",
        )
        .unwrap();
        assert_eq!(algo.protocol(), "LL128");
        assert_eq!(algo.num_gpus(), 4);
    }

    #[test]
    fn gt_inside_attribute_value() {
        let algo = parse(
            "<algo name=\"ring(k>2)\" proto=\"Simple\" ngpus=\"8\" coll=\"allreduce\" inplace=\"1\">\n  <gpu id=\"0\"/>\n</algo>",
        )
        .unwrap();
        assert_eq!(algo.name(), "ring(k>2)");
        assert_eq!(algo.num_gpus(), 8);
        assert_eq!(algo.place(), Place::InPlace);
    }

    #[test]
    fn not_xml() {
        let err = parse("ignored in test mode").unwrap_err();
        assert!(err.to_string().contains("no XML root element found"));
    }

    #[test]
    fn wrong_root() {
        let err = parse("<gpu id=\"0\"></gpu>").unwrap_err();
        assert!(err.to_string().contains("expected <algo>"));
    }

    #[test]
    fn missing_attribute() {
        let err = parse("<algo name=\"x\" proto=\"Simple\" coll=\"allgather\" inplace=\"1\">")
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::DataFormat { .. }));
        assert!(err.to_string().contains("missing attribute 'ngpus'"));
    }

    #[test]
    fn unknown_collective() {
        let algo = parse(
            "<algo name=\"x\" proto=\"Simple\" ngpus=\"2\" coll=\"reducescatter\" inplace=\"1\">",
        )
        .unwrap();
        let err = algo.perf_test(Path::new("algo.xml")).unwrap_err();
        assert!(err.to_string().contains("unexpected collective 'reducescatter'"));
    }
}
