use crate::error::{ErrorSeverity, GameError};

/// Failures that abort map creation.
///
/// A broken map cannot be played, so none of these are recoverable: they
/// indicate either impossible parameters or a generation bug.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("map dimensions {width}x{height} are below the {min}x{min} minimum")]
    InvalidDimensions { width: u32, height: u32, min: u32 },

    #[error("cave floor still splits into {regions} regions after repair")]
    Disconnected { regions: usize },

    #[error("no cell for {what} after {attempts} attempts")]
    PlacementExhausted { what: &'static str, attempts: u32 },

    #[error("no floor cell free of wall neighbours for the ladder")]
    NoLadderSite,

    #[error("unknown map glyph {glyph:?} at column {column}, row {row}")]
    InvalidGlyph { glyph: char, column: usize, row: usize },
}

impl GameError for GenerationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => "GENERATION_INVALID_DIMENSIONS",
            Self::Disconnected { .. } => "GENERATION_DISCONNECTED",
            Self::PlacementExhausted { .. } => "GENERATION_PLACEMENT_EXHAUSTED",
            Self::NoLadderSite => "GENERATION_NO_LADDER_SITE",
            Self::InvalidGlyph { .. } => "GENERATION_INVALID_GLYPH",
        }
    }
}
