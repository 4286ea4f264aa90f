// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Error kinds surfaced by the conversion layer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A range operation was called with `min > max`.
    /// Bounds are widened to `i128` so every supported width fits.
    #[error("invalid range: min ({min}) must be less than or equal to max ({max})")]
    InvalidRange { min: i128, max: i128 },

    /// A fallible bit source ran dry part way through an operation.
    #[error("bit source exhausted after {draws} draws")]
    SourceExhausted { draws: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_message() {
        let err = Error::InvalidRange { min: 128, max: 127 };
        assert_eq!(
            err.to_string(),
            "invalid range: min (128) must be less than or equal to max (127)"
        );
    }

    #[test]
    fn test_kinds_are_distinct() {
        let range = Error::InvalidRange { min: 1, max: 0 };
        let exhausted = Error::SourceExhausted { draws: 0 };
        assert_ne!(range, exhausted);
        assert_eq!(exhausted.to_string(), "bit source exhausted after 0 draws");
    }
}
