//! CSV batch lookups.
//!
//! Input lines are `shape_class,size`; an optional `shape_class,size` header
//! on the first non-blank line is skipped. Output lines are
//! `shape_class,size,status,...` where status is `tabulated` or `interpolated`
//! followed by `name=value` fields, or `error` followed by the error message.

use std::io::{self, Write};
use std::path::Path;

use crate::error::LookupError;
use crate::table::{HeadwallDimensionTable, LookupRequest, LookupResult};

/// A request paired with its lookup outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord {
    pub request: LookupRequest,
    pub outcome: Result<LookupResult, LookupError>,
}

pub fn read_requests_csv<P: AsRef<Path>>(path: P) -> io::Result<Vec<LookupRequest>> {
    let lines = crate::io::read_lines(path)?;
    let mut requests = Vec::new();
    let mut first_row = true;
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() != 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: expected shape_class,size", idx + 1),
            ));
        }
        let header = first_row && parts[1].trim().eq_ignore_ascii_case("size");
        first_row = false;
        if header {
            continue;
        }
        let shape_class = parts[0].trim();
        if shape_class.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: missing shape class", idx + 1),
            ));
        }
        let size: f64 = parts[1].trim().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: {}", idx + 1, e),
            )
        })?;
        requests.push(LookupRequest::new(shape_class, size));
    }
    Ok(requests)
}

/// Looks up every request; failures are recorded rather than aborting the batch.
pub fn run_batch(table: &HeadwallDimensionTable, requests: &[LookupRequest]) -> Vec<BatchRecord> {
    requests
        .iter()
        .map(|request| {
            let outcome = table.lookup_request(request);
            if let Err(e) = &outcome {
                log::warn!("{}@{}: {}", request.shape_class, request.size, e);
            }
            BatchRecord {
                request: request.clone(),
                outcome,
            }
        })
        .collect()
}

pub fn write_results_csv<P: AsRef<Path>>(path: P, records: &[BatchRecord]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    for record in records {
        write!(file, "{},{}", record.request.shape_class, record.request.size)?;
        match &record.outcome {
            Ok(result) => {
                let status = if result.interpolated {
                    "interpolated"
                } else {
                    "tabulated"
                };
                write!(file, ",{status}")?;
                for (name, value) in &result.dimensions {
                    write!(file, ",{name}={value}")?;
                }
                writeln!(file)?;
            }
            Err(e) => writeln!(file, ",error,{}", e.to_string().replace(',', ";"))?,
        }
    }
    Ok(())
}
