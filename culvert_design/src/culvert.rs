use crate::error::LookupError;
use crate::table::{HeadwallDimensionTable, LookupResult};

/// A culvert selection whose headwall is sized from a dimension table.
#[derive(Debug, Clone, PartialEq)]
pub struct CulvertDesign {
    pub shape_class: String,
    /// Diameter or span, in the table's units.
    pub diameter: f64,
}

impl CulvertDesign {
    pub fn new(shape_class: impl Into<String>, diameter: f64) -> Self {
        Self {
            shape_class: shape_class.into(),
            diameter,
        }
    }

    pub fn headwall(&self, table: &HeadwallDimensionTable) -> Result<LookupResult, LookupError> {
        table.lookup(&self.shape_class, self.diameter)
    }

    /// A single named headwall dimension.
    pub fn headwall_dimension(
        &self,
        table: &HeadwallDimensionTable,
        name: &str,
    ) -> Result<f64, LookupError> {
        let class = table
            .class(&self.shape_class)
            .ok_or_else(|| LookupError::UnknownShapeClass(self.shape_class.clone()))?;
        if !class.has_dimension(name) {
            return Err(LookupError::UnknownDimension {
                shape_class: self.shape_class.clone(),
                name: name.to_string(),
            });
        }
        let result = class.lookup(self.diameter)?;
        result.get(name).ok_or_else(|| LookupError::MissingDimension {
            shape_class: self.shape_class.clone(),
            size: self.diameter,
            name: name.to_string(),
        })
    }
}
