//! Display Decoding Error Types

use thiserror::Error;

/// Leading token of every error-state canonical string.
///
/// Decode failures are rendered into the canonical string so "no signal"
/// stays user-visible; the structured parser rejects strings carrying
/// this token and keeps the last valid snapshot instead.
pub const ERROR_TOKEN: &str = "Error";

/// Errors raised while decoding a display response.
///
/// The `Display` text doubles as the error-state canonical string, so
/// every message starts with [`ERROR_TOKEN`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No response from the link at all
    #[error("Error: com port is not connected")]
    NotConnected,

    /// Response did not start with the frame-start marker
    #[error("Error: communication with device failed")]
    CommunicationError,

    /// Response too short to hold a display frame
    #[error("Error: malformed display response")]
    Malformed,
}

/// Raised when a canonical string fails the structured re-parse.
///
/// Never escalated: the poll loop logs it and keeps the previously
/// published snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    /// The canonical string is an error state, not display content
    #[error("canonical string is an error state")]
    ErrorState,

    /// Fewer fields than led bits + rows + attributes
    #[error("expected at least {expected} fields, got {actual}")]
    MissingFields { expected: usize, actual: usize },

    /// Led segment holds fewer than 8 characters
    #[error("led segment is shorter than 8 bits")]
    ShortLedSegment,

    /// A text row came up short of the display width
    #[error("row {row} is shorter than {width} glyphs")]
    ShortRow { row: usize, width: usize },
}
