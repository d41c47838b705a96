//! Definition of the [`Connection`] and [`EdgeRecord`] types.
//!
//! A backbone link is loaded once as an undirected [`EdgeRecord`] and
//! stored as two directed [`Connection`]s carrying the same
//! [`LinkMetrics`].

use std::fmt;

use serde::Serialize;

use super::error::{Result, RouterError};
use crate::utils::weight::BANDWIDTH_CEILING;

/// Raw per-link measurements.
///
/// The fields are private so a value can only be obtained through
/// [`LinkMetrics::new`], which guarantees finite values, non-negative
/// latency and cost, and a bandwidth in `(0, BANDWIDTH_CEILING]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkMetrics {
    latency_ms: f64,
    cost_per_mb: f64,
    bandwidth_mbps: f64,
}

/// Which rule a set of raw metrics broke.
enum Violation {
    Field(&'static str, f64),
    AboveCeiling(f64),
}

impl LinkMetrics {
    /// Validates and wraps raw link metrics.
    ///
    /// # Errors
    /// [`RouterError::Configuration`] if any value is out of range.
    pub fn new(latency_ms: f64, cost_per_mb: f64, bandwidth_mbps: f64) -> Result<Self> {
        Self::check(latency_ms, cost_per_mb, bandwidth_mbps).map_err(|violation| match violation {
            Violation::Field(field, value) => {
                RouterError::Configuration(format!("invalid {field} value {value}"))
            }
            Violation::AboveCeiling(value) => RouterError::Configuration(format!(
                "bandwidth {value} Mbps exceeds the {BANDWIDTH_CEILING} Mbps ceiling"
            )),
        })
    }

    fn check(
        latency_ms: f64,
        cost_per_mb: f64,
        bandwidth_mbps: f64,
    ) -> std::result::Result<Self, Violation> {
        if !latency_ms.is_finite() || latency_ms < 0.0 {
            return Err(Violation::Field("latency_ms", latency_ms));
        }
        if !cost_per_mb.is_finite() || cost_per_mb < 0.0 {
            return Err(Violation::Field("cost_per_mb", cost_per_mb));
        }
        if !bandwidth_mbps.is_finite() || bandwidth_mbps <= 0.0 {
            return Err(Violation::Field("bandwidth_mbps", bandwidth_mbps));
        }
        // Above the ceiling the inverted bandwidth weight turns negative.
        if bandwidth_mbps > BANDWIDTH_CEILING {
            return Err(Violation::AboveCeiling(bandwidth_mbps));
        }
        Ok(LinkMetrics {
            latency_ms,
            cost_per_mb,
            bandwidth_mbps,
        })
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_ms
    }

    pub fn cost_per_mb(&self) -> f64 {
        self.cost_per_mb
    }

    pub fn bandwidth_mbps(&self) -> f64 {
        self.bandwidth_mbps
    }
}

impl fmt::Display for LinkMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} ms, {:.4}/MB, {:.0} Mbps",
            self.latency_ms, self.cost_per_mb, self.bandwidth_mbps
        )
    }
}

/// A directed connection from the city that owns it to `destination`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    /// The city this connection leads to.
    pub destination: String,

    /// Raw metrics, shared with the reverse connection.
    pub metrics: LinkMetrics,
}

/// One undirected link between two cities, as read from the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub origin: String,
    pub destination: String,
    pub metrics: LinkMetrics,
}

impl EdgeRecord {
    /// Creates a record from already parsed values.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        latency_ms: f64,
        cost_per_mb: f64,
        bandwidth_mbps: f64,
    ) -> Result<Self> {
        Ok(EdgeRecord {
            origin: origin.into(),
            destination: destination.into(),
            metrics: LinkMetrics::new(latency_ms, cost_per_mb, bandwidth_mbps)?,
        })
    }

    /// Parses one input row of
    /// `origin,destination,latency_ms,cost_per_mb,bandwidth_mbps`.
    ///
    /// Fields beyond the fifth are ignored. City names are trimmed.
    ///
    /// # Arguments
    /// * `line` - The 1-based line number, used in error messages.
    /// * `fields` - The raw fields of the row.
    ///
    /// # Errors
    /// * [`RouterError::IncompleteRecord`] with fewer than 5 fields.
    /// * [`RouterError::MalformedRecord`] if a numeric field does not
    ///   parse, or is negative, zero bandwidth or not finite.
    /// * [`RouterError::Configuration`] if the bandwidth exceeds
    ///   [`BANDWIDTH_CEILING`].
    pub fn from_fields<S: AsRef<str>>(line: u64, fields: &[S]) -> Result<Self> {
        if fields.len() < 5 {
            return Err(RouterError::IncompleteRecord {
                line,
                found: fields.len(),
            });
        }

        let number = |index: usize, field: &'static str| -> Result<f64> {
            let raw = fields[index].as_ref().trim();
            raw.parse::<f64>()
                .map_err(|_| RouterError::MalformedRecord {
                    line,
                    field,
                    value: raw.to_string(),
                })
        };
        let latency_ms = number(2, "latency_ms")?;
        let cost_per_mb = number(3, "cost_per_mb")?;
        let bandwidth_mbps = number(4, "bandwidth_mbps")?;

        let metrics = LinkMetrics::check(latency_ms, cost_per_mb, bandwidth_mbps).map_err(
            |violation| match violation {
                Violation::Field(field, value) => RouterError::MalformedRecord {
                    line,
                    field,
                    value: value.to_string(),
                },
                Violation::AboveCeiling(value) => RouterError::Configuration(format!(
                    "line {line}: bandwidth {value} Mbps exceeds the {BANDWIDTH_CEILING} Mbps ceiling"
                )),
            },
        )?;

        Ok(EdgeRecord {
            origin: fields[0].as_ref().trim().to_string(),
            destination: fields[1].as_ref().trim().to_string(),
            metrics,
        })
    }
}
