//! Definition for the [`Criterion`] type, implemented by an enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::RouterError;

/// The optimization objective of a single shortest-path query.
///
/// A criterion is never stored in the network; it is supplied per
/// query and selects the weight function (see
/// [`weight`](crate::utils::weight::weight)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Lowest total latency.
    #[default]
    Latency,
    /// Lowest total cost per megabyte.
    Cost,
    /// Widest links, by inverting bandwidth against a fixed ceiling.
    Bandwidth,
    /// Fixed blend of latency, cost and inverted bandwidth.
    Composite,
}

impl Criterion {
    /// Every criterion, in the order comparisons report them.
    pub const ALL: [Criterion; 4] = [
        Criterion::Latency,
        Criterion::Cost,
        Criterion::Bandwidth,
        Criterion::Composite,
    ];

    /// Returns the lowercase tag used on the command line and in file
    /// names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Latency => "latency",
            Criterion::Cost => "cost",
            Criterion::Bandwidth => "bandwidth",
            Criterion::Composite => "composite",
        }
    }

    /// Parses a tag, falling back to [`Criterion::Latency`] for anything
    /// unrecognized.
    ///
    /// Use [`str::parse`] for the strict variant that fails instead.
    pub fn lenient(tag: &str) -> Criterion {
        tag.parse().unwrap_or_else(|_| {
            warn!("Unknown criterion '{}', falling back to latency", tag);
            Criterion::Latency
        })
    }

    /// Maps the interactive menu choices `1`..`4` to a criterion.
    /// Anything else selects latency.
    pub fn from_menu_choice(choice: &str) -> Criterion {
        match choice.trim() {
            "1" => Criterion::Latency,
            "2" => Criterion::Cost,
            "3" => Criterion::Bandwidth,
            "4" => Criterion::Composite,
            _ => Criterion::Latency,
        }
    }

    /// Human readable name with the unit of the raw metric it is based
    /// on.
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::Latency => "Latency (ms)",
            Criterion::Cost => "Cost (per MB)",
            Criterion::Bandwidth => "Bandwidth (Mbps)",
            Criterion::Composite => "Composite",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latency" => Ok(Criterion::Latency),
            "cost" => Ok(Criterion::Cost),
            "bandwidth" => Ok(Criterion::Bandwidth),
            "composite" => Ok(Criterion::Composite),
            other => Err(RouterError::Configuration(format!(
                "unknown criterion '{other}' (expected latency, cost, bandwidth or composite)"
            ))),
        }
    }
}

#[cfg(test)]
mod criterion_tests {
    use super::*;

    #[test]
    fn test_strict_parse() {
        assert_eq!("cost".parse::<Criterion>().unwrap(), Criterion::Cost);
        assert_eq!(" Composite ".parse::<Criterion>().unwrap(), Criterion::Composite);
        assert!(matches!(
            "throughput".parse::<Criterion>(),
            Err(RouterError::Configuration(_))
        ));
    }

    #[test]
    fn test_lenient_falls_back_to_latency() {
        assert_eq!(Criterion::lenient("bandwidth"), Criterion::Bandwidth);
        assert_eq!(Criterion::lenient("hops"), Criterion::Latency);
        assert_eq!(Criterion::lenient(""), Criterion::Latency);
    }

    #[test]
    fn test_menu_choice() {
        assert_eq!(Criterion::from_menu_choice("2"), Criterion::Cost);
        assert_eq!(Criterion::from_menu_choice("4"), Criterion::Composite);
        assert_eq!(Criterion::from_menu_choice("9"), Criterion::Latency);
    }

    #[test]
    fn test_display_matches_tag() {
        for criterion in Criterion::ALL {
            assert_eq!(criterion.to_string().parse::<Criterion>().unwrap(), criterion);
        }
    }
}
