//! Error taxonomy shared by every analytics component.
//!
//! Components surface a typed failure instead of a zero-filled fake result.
//! The only silent defaults are the ones each component documents explicitly
//! (e.g. missing SMA-50 → Neutral sentiment, missing fundamentals → zero
//! fair value).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// Too few rows for the requested computation.
    #[error("{operation} requires at least {required} rows, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    /// A required column or metric is absent from the input.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Input that would force a division by zero or an unsolvable system.
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),
}
