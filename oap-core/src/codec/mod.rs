//! Run-length codecs for compressed imagefile data buffers
//!
//! Each 4096-byte data buffer is self-contained. The grayscale channel
//! expands to a bit sequence (2 bits per diode), the monoscale channel to a
//! byte sequence (1 byte per 8 diodes). Both codecs run a counting pre-pass
//! over the same control-byte grammar to size the output exactly.

pub mod grayscale;
pub mod monoscale;
