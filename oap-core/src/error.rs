//! Error types for imagefile decoding

/// Errors that can occur while decoding imagefile data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OapError {
    /// Data buffer is not exactly 4096 bytes
    BufferLength,
    /// Record header shorter than 16 bytes
    RecordHeaderLength,
    /// Unrecognized acquisition channel name
    UnknownChannel,
    /// Malformed range specification
    InvalidRange,
}

impl core::fmt::Display for OapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            OapError::BufferLength => "Data buffer is not 4096 bytes",
            OapError::RecordHeaderLength => "Record header shorter than 16 bytes",
            OapError::UnknownChannel => "Unrecognized acquisition channel",
            OapError::InvalidRange => "Malformed range specification",
        };
        write!(f, "{msg}")
    }
}

impl std::error::Error for OapError {}

/// Result type for imagefile decoding operations
pub type Result<T> = core::result::Result<T, OapError>;
