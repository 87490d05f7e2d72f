//! JSON form of a [`HeadwallDimensionTable`].
//!
//! Each shape class is written either as a list of rows, kept in the order
//! given, or as the legacy nested mapping whose size keys are numeric strings:
//!
//! ```json
//! {
//!   "A": { "10.5": { "L": 12.75 }, "12.0": { "L": 14.0 } },
//!   "B": [ { "size": 12.0, "dimensions": { "L": 16.0 } } ]
//! }
//! ```
//!
//! String keys are parsed once here; the loaded table only holds numbers.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::TableError;
use crate::table::{DimensionRow, DimensionTable, HeadwallDimensionTable};

/// JSON object entries in document order, repeated keys included.
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

fn keyed_rows(
    shape_class: &str,
    keyed: Vec<(String, BTreeMap<String, f64>)>,
) -> Result<Vec<DimensionRow>, TableError> {
    let mut rows = keyed
        .into_iter()
        .map(|(key, dimensions)| {
            let size = key.trim().parse::<f64>().map_err(|e| {
                TableError::malformed(shape_class, format!("size key {key:?}: {e}"))
            })?;
            Ok(DimensionRow { size, dimensions })
        })
        .collect::<Result<Vec<_>, TableError>>()?;
    // Keys arrive in document order; repeated keys stay adjacent after the
    // sort and are rejected by the strictly-increasing check.
    rows.sort_by(|a, b| a.size.total_cmp(&b.size));
    Ok(rows)
}

fn class_rows(shape_class: &str, raw: &RawValue) -> Result<Vec<DimensionRow>, TableError> {
    let text = raw.get().trim_start();
    let invalid = |e: serde_json::Error| TableError::malformed(shape_class, e.to_string());
    if text.starts_with('[') {
        serde_json::from_str::<Vec<DimensionRow>>(text).map_err(invalid)
    } else if text.starts_with('{') {
        let keyed: Entries<BTreeMap<String, f64>> = serde_json::from_str(text).map_err(invalid)?;
        keyed_rows(shape_class, keyed.0)
    } else {
        Err(TableError::malformed(
            shape_class,
            "expected a list of rows or an object keyed by size",
        ))
    }
}

/// Parses and validates a table from JSON text.
pub fn parse_table_json(json: &str) -> Result<HeadwallDimensionTable, TableError> {
    let source: Entries<Box<RawValue>> = serde_json::from_str(json)?;
    let mut tables = Vec::with_capacity(source.0.len());
    for (shape_class, raw) in source.0 {
        let rows = class_rows(&shape_class, &raw)?;
        tables.push(DimensionTable::new(shape_class, rows)?);
    }
    HeadwallDimensionTable::new(tables)
}

/// Reads and validates a table from a JSON file.
pub fn read_table_json<P: AsRef<Path>>(path: P) -> Result<HeadwallDimensionTable, TableError> {
    let path = path.as_ref();
    log::info!("reading headwall table from {}", path.display());
    let contents = crate::io::read_to_string(path)?;
    parse_table_json(&contents)
}

/// Serializes a table using the row-list form for every class.
pub fn table_to_json(table: &HeadwallDimensionTable) -> Result<String, TableError> {
    let out: BTreeMap<&str, &[DimensionRow]> = table
        .classes()
        .map(|t| (t.shape_class(), t.rows()))
        .collect();
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn write_table_json<P: AsRef<Path>>(
    path: P,
    table: &HeadwallDimensionTable,
) -> Result<(), TableError> {
    let json = table_to_json(table)?;
    crate::io::write_string(path, &json)?;
    Ok(())
}
