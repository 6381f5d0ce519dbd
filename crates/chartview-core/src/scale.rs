// File: crates/chartview-core/src/scale.rs
// Summary: Value-axis transform (linear / log10) with inverse.

use crate::config::AxisType;
use crate::error::ScaleError;

/// Maps raw values onto the value axis and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisScaler {
    kind: AxisType,
}

impl AxisScaler {
    pub fn new(kind: AxisType) -> Self {
        Self { kind }
    }

    pub fn linear() -> Self {
        Self::new(AxisType::Linear)
    }

    pub fn log10() -> Self {
        Self::new(AxisType::Logarithmic)
    }

    pub fn kind(&self) -> AxisType {
        self.kind
    }

    pub fn is_log(&self) -> bool {
        self.kind == AxisType::Logarithmic
    }

    /// Forward mapping. Never returns a non-finite value.
    #[inline]
    pub fn scale(&self, value: f64) -> Result<f64, ScaleError> {
        if !value.is_finite() {
            return Err(ScaleError::NonFinite { value });
        }
        match self.kind {
            AxisType::Linear => Ok(value),
            AxisType::Logarithmic => {
                if value <= 0.0 {
                    Err(ScaleError::NonPositiveLog { value })
                } else {
                    Ok(value.log10())
                }
            }
        }
    }

    /// Inverse mapping (`10^x` for log scale).
    #[inline]
    pub fn unscale(&self, value: f64) -> f64 {
        match self.kind {
            AxisType::Linear => value,
            AxisType::Logarithmic => 10f64.powf(value),
        }
    }
}

impl Default for AxisScaler {
    fn default() -> Self {
        Self::linear()
    }
}
