use thiserror::Error;

use crate::detection::Rect;

/// Errors that cross the crate boundary. A tracker losing its target is not
/// part of this taxonomy; the lifecycle manager absorbs it by dropping the
/// track.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid camera configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("invalid detection {rect:?}, width and height must be positive")]
    InvalidDetection { rect: Rect },

    #[error("degenerate localization, {context} denominator is ~0")]
    NumericDegeneracy { context: &'static str },
}

impl Error {
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
