use thiserror::Error;

/// Failures raised while building a [`HeadwallDimensionTable`](crate::table::HeadwallDimensionTable).
///
/// All of these are fatal: a table that fails to load is never usable.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("malformed table for shape class {shape_class:?}: {reason}")]
    Malformed { shape_class: String, reason: String },

    #[error("shape class {0:?} is defined more than once")]
    DuplicateClass(String),

    #[error("table contains no shape classes")]
    Empty,

    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TableError {
    pub(crate) fn malformed(shape_class: &str, reason: impl Into<String>) -> Self {
        TableError::Malformed {
            shape_class: shape_class.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures returned by table queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("unknown shape class {0:?}")]
    UnknownShapeClass(String),

    #[error("size {size} is outside the supported range {min}..={max} for shape class {shape_class:?}")]
    OutOfRange {
        shape_class: String,
        size: f64,
        min: f64,
        max: f64,
    },

    #[error("shape class {shape_class:?} has no dimension named {name:?}")]
    UnknownDimension { shape_class: String, name: String },

    #[error("internal table fault: dimension {name:?} missing from shape class {shape_class:?} at size {size}")]
    MissingDimension {
        shape_class: String,
        size: f64,
        name: String,
    },
}

impl LookupError {
    /// True for faults in the loaded data rather than in the caller's input.
    pub fn is_internal(&self) -> bool {
        matches!(self, LookupError::MissingDimension { .. })
    }
}
