// File: crates/chartview-core/src/error.rs
// Summary: Error taxonomy: recoverable scale failures and fatal configuration errors.

/// A value the active axis function cannot map. Recovered locally by skipping the slot.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("logarithmic scale requires a positive value, got {value}")]
    NonPositiveLog { value: f64 },

    #[error("value {value} is not finite")]
    NonFinite { value: f64 },
}

/// Errors surfaced to the host. Configuration errors are fatal to view construction.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("required accessor binding `{accessor}` is not configured")]
    MissingBinding { accessor: &'static str },

    #[error("unknown axis type `{0}` (expected linear, logarithmic or log)")]
    UnknownAxisType(String),

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: String, reason: String },

    #[error("failed to read settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("renderer failed: {0}")]
    Render(String),
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
