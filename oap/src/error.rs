//! Error types for imagefile access

use oap_core::OapError;

/// Errors raised by imagefile access and export
///
/// Per-particle problems never surface here; they are counted by the
/// decoder. An error from this crate means the whole invocation failed and
/// produced no partial results.
#[derive(Debug)]
pub enum ImagefileError {
    /// Underlying file could not be opened, mapped or written
    Io(std::io::Error),
    /// Malformed input handed to the decoder
    Decode(OapError),
}

impl core::fmt::Display for ImagefileError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ImagefileError::Io(err) => write!(f, "Imagefile I/O failed: {err}"),
            ImagefileError::Decode(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ImagefileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImagefileError::Io(err) => Some(err),
            ImagefileError::Decode(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImagefileError {
    fn from(err: std::io::Error) -> Self {
        ImagefileError::Io(err)
    }
}

impl From<OapError> for ImagefileError {
    fn from(err: OapError) -> Self {
        ImagefileError::Decode(err)
    }
}

/// Result type for imagefile operations
pub type Result<T> = std::result::Result<T, ImagefileError>;
