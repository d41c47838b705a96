//! Reads a network from CSV rows of
//! `origin,destination,latency_ms,cost_per_mb,bandwidth_mbps`.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{
    connection::EdgeRecord,
    error::{Result, RouterError},
    network::Network,
};

/// How the first row of an input file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// The first row is a header when its latency column is not a
    /// number.
    #[default]
    Auto,
    /// The first row is always a header.
    Present,
    /// Every row is data.
    Absent,
}

impl FromStr for HeaderPolicy {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(HeaderPolicy::Auto),
            "present" => Ok(HeaderPolicy::Present),
            "absent" => Ok(HeaderPolicy::Absent),
            other => Err(RouterError::Configuration(format!(
                "unknown header policy '{other}' (expected auto, present or absent)"
            ))),
        }
    }
}

/// Returns true if `row` looks like a header under `policy`.
fn is_header(row: &csv::StringRecord, policy: HeaderPolicy) -> bool {
    match policy {
        HeaderPolicy::Present => true,
        HeaderPolicy::Absent => false,
        HeaderPolicy::Auto => row
            .get(2)
            .map_or(false, |latency| latency.trim().parse::<f64>().is_err()),
    }
}

/// Parses every row of `reader` into edge records.
///
/// Blank lines, including lines of only whitespace or empty fields, are
/// skipped; the header check applies to the first non-blank row.
/// Parsing stops at the first bad row, so a caller never sees a partial
/// record list.
///
/// # Errors
/// [`RouterError::IncompleteRecord`], [`RouterError::MalformedRecord`]
/// or [`RouterError::Configuration`] for the first offending row, and
/// [`RouterError::Csv`] for unreadable input.
pub fn read_records<R: Read>(reader: R, policy: HeaderPolicy) -> Result<Vec<EdgeRecord>> {
    let mut rows = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut first_row = true;
    for (index, row) in rows.records().enumerate() {
        let row = row?;
        let line = row
            .position()
            .map_or(index as u64 + 1, |position| position.line());

        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if std::mem::take(&mut first_row) && is_header(&row, policy) {
            debug!("Skipping header row: {:?}", row);
            continue;
        }
        let fields: Vec<&str> = row.iter().collect();
        records.push(EdgeRecord::from_fields(line, &fields)?);
    }
    Ok(records)
}

/// Loads a network from the CSV file at `path`.
///
/// # Errors
/// [`RouterError::InputNotFound`] if the file does not exist, plus every
/// error of [`read_records`]. Nothing is loaded when any row fails.
pub fn load_network(path: &Path, policy: HeaderPolicy) -> Result<Network> {
    info!("Loading network from {}", path.display());
    let file = File::open(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => RouterError::InputNotFound(path.to_path_buf()),
        _ => RouterError::Io(err),
    })?;
    let records = read_records(file, policy)?;
    Ok(Network::load(records))
}

#[cfg(test)]
mod loader_tests {
    use super::*;
    use std::io::Write;

    const WITH_HEADER: &str = "\
origin,destination,latency_ms,cost_per_mb,bandwidth_mbps
Lima,Cusco,12,0.02,400
Lima,Arequipa,9,0.03,600
";

    #[test]
    fn test_auto_skips_header() {
        let records = read_records(WITH_HEADER.as_bytes(), HeaderPolicy::Auto).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].origin, "Lima");
        assert_eq!(records[1].destination, "Arequipa");
    }

    #[test]
    fn test_auto_keeps_first_data_row() {
        let input = "Lima,Cusco,12,0.02,400\nCusco,Puno,7,0.01,300\n";
        let records = read_records(input.as_bytes(), HeaderPolicy::Auto).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_auto_keeps_numeric_city_names() {
        let input = "101,202,12,0.02,400\n";
        let records = read_records(input.as_bytes(), HeaderPolicy::Auto).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].origin, "101");
    }

    #[test]
    fn test_explicit_policies() {
        let input = "Lima,Cusco,12,0.02,400\n";
        assert!(read_records(input.as_bytes(), HeaderPolicy::Present)
            .unwrap()
            .is_empty());
        assert!(matches!(
            read_records(WITH_HEADER.as_bytes(), HeaderPolicy::Absent),
            Err(RouterError::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_bad_row_aborts_the_load() {
        let input = "Lima,Cusco,12,0.02,400\nCusco,Puno,7,0.01\n";
        assert!(matches!(
            read_records(input.as_bytes(), HeaderPolicy::Auto),
            Err(RouterError::IncompleteRecord { line: 2, found: 4 })
        ));

        let input = "Lima,Cusco,12,0.02,400\nCusco,Puno,7,cheap,300\n";
        assert!(matches!(
            read_records(input.as_bytes(), HeaderPolicy::Auto),
            Err(RouterError::MalformedRecord { line: 2, field: "cost_per_mb", .. })
        ));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let input = "Lima,Cusco,12,0.02,400\n\nCusco,Puno,7,0.01,300\n";
        let records = read_records(input.as_bytes(), HeaderPolicy::Auto).unwrap();
        assert_eq!(records.len(), 2);

        let input = "Lima,Cusco,12,0.02,400\n   \n , ,\nCusco,Puno,7,0.01,300\n  \n";
        let records = read_records(input.as_bytes(), HeaderPolicy::Auto).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].destination, "Puno");
    }

    #[test]
    fn test_header_after_leading_blank_lines() {
        let input = format!("\n  \n{WITH_HEADER}");
        let records = read_records(input.as_bytes(), HeaderPolicy::Auto).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].origin, "Lima");
    }

    #[test]
    fn test_load_network_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(WITH_HEADER.as_bytes()).unwrap();

        let network = load_network(file.path(), HeaderPolicy::Auto).unwrap();
        assert_eq!(network.cities(), &["Arequipa", "Cusco", "Lima"]);
        assert_eq!(network.connection_count(), 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        assert!(matches!(
            load_network(&path, HeaderPolicy::Auto),
            Err(RouterError::InputNotFound(missing)) if missing == path
        ));
    }

    #[test]
    fn test_header_policy_parse() {
        assert_eq!("Present".parse::<HeaderPolicy>().unwrap(), HeaderPolicy::Present);
        assert!("maybe".parse::<HeaderPolicy>().is_err());
    }
}
