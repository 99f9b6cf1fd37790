//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Palette Errors
    // =========================================================================
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Palette mismatch: {channels} channels but {colors} colors")]
    PaletteMismatch { channels: usize, colors: usize },

    #[error("Duplicate channel: {0}")]
    DuplicateChannel(String),

    #[error("Palette has no channels")]
    EmptyPalette,

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    // =========================================================================
    // Publisher Errors
    // =========================================================================
    #[error("Property not registered: {0}")]
    PropertyNotRegistered(String),
}

impl DomainError {
    /// Get an error code string for replies and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownChannel(_) => "UNKNOWN_CHANNEL",
            Self::PaletteMismatch { .. } => "PALETTE_MISMATCH",
            Self::DuplicateChannel(_) => "DUPLICATE_CHANNEL",
            Self::EmptyPalette => "EMPTY_PALETTE",
            Self::InvalidColor(_) => "INVALID_COLOR",
            Self::PropertyNotRegistered(_) => "PROPERTY_NOT_REGISTERED",
        }
    }

    /// Check if this error comes from palette configuration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::PaletteMismatch { .. }
                | Self::DuplicateChannel(_)
                | Self::EmptyPalette
                | Self::InvalidColor(_)
        )
    }
}
