//! File input and output helpers for tables and batch lookups.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

pub mod batch;
pub mod table_json;

pub use batch::{read_requests_csv, run_batch, write_results_csv, BatchRecord};
pub use table_json::{parse_table_json, read_table_json, table_to_json, write_table_json};

/// Reads a file to string.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Reads a file and returns its lines.
pub fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    Ok(read_to_string(path)?.lines().map(str::to_string).collect())
}

/// Writes a string to a file, replacing any existing contents.
pub fn write_string<P: AsRef<Path>>(path: P, contents: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())
}
