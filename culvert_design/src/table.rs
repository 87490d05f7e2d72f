//! Headwall dimension tables.
//!
//! A [`HeadwallDimensionTable`] maps a culvert shape class to an ordered list of
//! rows, each row giving the headwall dimensions for one tabulated size. Lookups
//! return tabulated rows verbatim and interpolate linearly between adjacent rows.
//! Sizes outside the tabulated range are rejected rather than extrapolated.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{LookupError, TableError};

/// Two sizes closer than this are treated as the same tabulated key.
pub const SIZE_TOLERANCE: f64 = 1e-9;

const EMBEDDED_JSON: &str = include_str!("../data/headwall_dimensions.json");

static EMBEDDED: OnceCell<HeadwallDimensionTable> = OnceCell::new();

/// One tabulated row: a size key and the named dimensions at that size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRow {
    pub size: f64,
    pub dimensions: BTreeMap<String, f64>,
}

impl DimensionRow {
    pub fn new<I, S>(size: f64, dimensions: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            size,
            dimensions: dimensions
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

/// Dimension rows for a single shape class, sorted by strictly increasing size.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionTable {
    shape_class: String,
    rows: Vec<DimensionRow>,
}

enum Position {
    Exact(usize),
    /// Index of the upper bracketing row; the lower one is `index - 1`.
    Between(usize),
}

impl DimensionTable {
    /// Builds a table, checking that keys are finite and strictly increasing
    /// and that every row has the same dimension names.
    pub fn new(shape_class: impl Into<String>, rows: Vec<DimensionRow>) -> Result<Self, TableError> {
        let shape_class = shape_class.into();
        let first = rows
            .first()
            .ok_or_else(|| TableError::malformed(&shape_class, "no rows"))?;
        if first.dimensions.is_empty() {
            return Err(TableError::malformed(
                &shape_class,
                format!("row at size {} has no dimensions", first.size),
            ));
        }

        for row in &rows {
            if !row.size.is_finite() {
                return Err(TableError::malformed(
                    &shape_class,
                    format!("size key {} is not finite", row.size),
                ));
            }
            if let Some((name, value)) = row.dimensions.iter().find(|(_, v)| !v.is_finite()) {
                return Err(TableError::malformed(
                    &shape_class,
                    format!("dimension {name} at size {} is not finite ({value})", row.size),
                ));
            }
            if !row.dimensions.keys().eq(first.dimensions.keys()) {
                return Err(TableError::malformed(
                    &shape_class,
                    format!(
                        "row at size {} has dimensions {:?}, expected {:?}",
                        row.size,
                        row.dimensions.keys().collect::<Vec<_>>(),
                        first.dimensions.keys().collect::<Vec<_>>()
                    ),
                ));
            }
        }

        for pair in rows.windows(2) {
            if pair[1].size - pair[0].size <= SIZE_TOLERANCE {
                return Err(TableError::malformed(
                    &shape_class,
                    format!(
                        "size keys must be strictly increasing ({} followed by {})",
                        pair[0].size, pair[1].size
                    ),
                ));
            }
        }

        Ok(Self { shape_class, rows })
    }

    pub fn shape_class(&self) -> &str {
        &self.shape_class
    }

    pub fn rows(&self) -> &[DimensionRow] {
        &self.rows
    }

    pub fn min_size(&self) -> f64 {
        self.rows[0].size
    }

    pub fn max_size(&self) -> f64 {
        self.rows[self.rows.len() - 1].size
    }

    /// Dimension names shared by every row, in sorted order.
    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.rows[0].dimensions.keys().map(String::as_str)
    }

    pub fn has_dimension(&self, name: &str) -> bool {
        self.rows[0].dimensions.contains_key(name)
    }

    /// Returns the dimensions at `size`, interpolating between the two
    /// bracketing rows when `size` is not a tabulated key.
    pub fn lookup(&self, size: f64) -> Result<LookupResult, LookupError> {
        let position = self.locate(size)?;
        let result = match position {
            Position::Exact(index) => LookupResult {
                dimensions: self.rows[index].dimensions.clone(),
                interpolated: false,
            },
            Position::Between(index) => {
                let lo = &self.rows[index - 1];
                let hi = &self.rows[index];
                let t = (size - lo.size) / (hi.size - lo.size);
                let mut dimensions = BTreeMap::new();
                for (name, lo_value) in &lo.dimensions {
                    let hi_value = hi.dimensions.get(name).ok_or_else(|| {
                        LookupError::MissingDimension {
                            shape_class: self.shape_class.clone(),
                            size: hi.size,
                            name: name.clone(),
                        }
                    })?;
                    dimensions.insert(name.clone(), lo_value + t * (hi_value - lo_value));
                }
                LookupResult {
                    dimensions,
                    interpolated: true,
                }
            }
        };
        log::trace!(
            "lookup {}@{}: interpolated={} {:?}",
            self.shape_class,
            size,
            result.interpolated,
            result.dimensions
        );
        Ok(result)
    }

    fn locate(&self, size: f64) -> Result<Position, LookupError> {
        let (min, max) = (self.min_size(), self.max_size());
        if !size.is_finite() || size < min - SIZE_TOLERANCE || size > max + SIZE_TOLERANCE {
            return Err(LookupError::OutOfRange {
                shape_class: self.shape_class.clone(),
                size,
                min,
                max,
            });
        }

        let index = self.rows.partition_point(|row| row.size < size);
        if index < self.rows.len() && (self.rows[index].size - size).abs() <= SIZE_TOLERANCE {
            return Ok(Position::Exact(index));
        }
        if index > 0 && (size - self.rows[index - 1].size).abs() <= SIZE_TOLERANCE {
            return Ok(Position::Exact(index - 1));
        }
        // In range and not within tolerance of either end, so 0 < index < len.
        Ok(Position::Between(index))
    }
}

/// Query value passed across the library boundary by front ends.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub shape_class: String,
    pub size: f64,
}

impl LookupRequest {
    pub fn new(shape_class: impl Into<String>, size: f64) -> Self {
        Self {
            shape_class: shape_class.into(),
            size,
        }
    }
}

/// Dimensions returned by a lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResult {
    pub dimensions: BTreeMap<String, f64>,
    /// True when computed between two rows rather than read from one.
    pub interpolated: bool,
}

impl LookupResult {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.dimensions.get(name).copied()
    }
}

/// Immutable set of per-class dimension tables.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadwallDimensionTable {
    classes: BTreeMap<String, DimensionTable>,
}

impl HeadwallDimensionTable {
    pub fn new<I>(tables: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = DimensionTable>,
    {
        let mut classes = BTreeMap::new();
        for table in tables {
            let name = table.shape_class.clone();
            if classes.insert(name.clone(), table).is_some() {
                return Err(TableError::DuplicateClass(name));
            }
        }
        if classes.is_empty() {
            return Err(TableError::Empty);
        }
        log::debug!(
            "loaded headwall table: {} classes, {} rows",
            classes.len(),
            classes.values().map(|t: &DimensionTable| t.rows.len()).sum::<usize>()
        );
        Ok(Self { classes })
    }

    /// The bundled reference dataset, parsed on first use.
    pub fn embedded() -> Result<&'static Self, TableError> {
        EMBEDDED.get_or_try_init(|| Self::from_json_str(EMBEDDED_JSON))
    }

    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        crate::io::table_json::parse_table_json(json)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        crate::io::table_json::read_table_json(path)
    }

    /// Serializes the table in the row-list JSON form.
    pub fn to_json_string(&self) -> Result<String, TableError> {
        crate::io::table_json::table_to_json(self)
    }

    pub fn lookup(&self, shape_class: &str, size: f64) -> Result<LookupResult, LookupError> {
        self.class(shape_class)
            .ok_or_else(|| LookupError::UnknownShapeClass(shape_class.to_string()))?
            .lookup(size)
    }

    pub fn lookup_request(&self, request: &LookupRequest) -> Result<LookupResult, LookupError> {
        self.lookup(&request.shape_class, request.size)
    }

    pub fn class(&self, shape_class: &str) -> Option<&DimensionTable> {
        self.classes.get(shape_class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &DimensionTable> {
        self.classes.values()
    }

    pub fn shape_classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Supported `(min, max)` size range for a shape class.
    pub fn range(&self, shape_class: &str) -> Result<(f64, f64), LookupError> {
        self.class(shape_class)
            .map(|t| (t.min_size(), t.max_size()))
            .ok_or_else(|| LookupError::UnknownShapeClass(shape_class.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_a() -> DimensionTable {
        DimensionTable::new(
            "A",
            vec![
                DimensionRow::new(10.5, [("L", 12.75), ("W", 3.0)]),
                DimensionRow::new(12.0, [("L", 14.0), ("W", 3.5)]),
                DimensionRow::new(15.0, [("L", 17.0), ("W", 4.5)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn locate_exact_and_between() {
        let t = class_a();
        assert!(matches!(t.locate(10.5), Ok(Position::Exact(0))));
        assert!(matches!(t.locate(15.0), Ok(Position::Exact(2))));
        assert!(matches!(t.locate(12.0 + 1e-12), Ok(Position::Exact(1))));
        assert!(matches!(t.locate(12.0 - 1e-12), Ok(Position::Exact(1))));
        assert!(matches!(t.locate(11.0), Ok(Position::Between(1))));
        assert!(matches!(t.locate(13.0), Ok(Position::Between(2))));
    }

    #[test]
    fn locate_rejects_nan() {
        assert!(matches!(t_err(f64::NAN), LookupError::OutOfRange { .. }));
        assert!(matches!(t_err(f64::INFINITY), LookupError::OutOfRange { .. }));
    }

    fn t_err(size: f64) -> LookupError {
        class_a().lookup(size).unwrap_err()
    }

    #[test]
    fn missing_dimension_is_reported() {
        // Bypass the validating constructor to simulate corrupted state.
        let t = DimensionTable {
            shape_class: "A".into(),
            rows: vec![
                DimensionRow::new(1.0, [("L", 1.0), ("W", 1.0)]),
                DimensionRow::new(2.0, [("L", 2.0)]),
            ],
        };
        let err = t.lookup(1.5).unwrap_err();
        assert!(err.is_internal());
        assert_eq!(
            err,
            LookupError::MissingDimension {
                shape_class: "A".into(),
                size: 2.0,
                name: "W".into()
            }
        );
    }

    #[test]
    fn embedded_table_loads() {
        let _ = env_logger::builder().is_test(true).try_init();
        let table = HeadwallDimensionTable::embedded().unwrap();
        assert_eq!(table.shape_classes().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(table.range("A").unwrap(), (10.5, 48.0));
        let json = table.to_json_string().unwrap();
        assert_eq!(&HeadwallDimensionTable::from_json_str(&json).unwrap(), table);
    }
}
