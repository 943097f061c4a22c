//! Imagefile format constants and record header definitions
//!
//! Optical array probe imagefiles are a flat sequence of records, each a
//! 16-byte record header followed by a 4096-byte compressed data buffer.

use crate::error::{OapError, Result};

/// Size of one compressed data buffer in bytes
pub const BUFFER_BYTES: usize = 4096;

/// Size of the record header preceding each data buffer
pub const RECORD_HEADER_BYTES: usize = 16;

/// Size of one full record (header + data buffer)
pub const RECORD_BYTES: usize = RECORD_HEADER_BYTES + BUFFER_BYTES;

/// Width of the optical array in diodes, and thus of every image slice
pub const SLICE_WIDTH: usize = 64;

/// Bits per decoded grayscale slice (2 bits per diode)
pub const GRAY_SLICE_BITS: usize = 2 * SLICE_WIDTH;

/// Bytes per decoded monoscale slice (1 bit per diode)
pub const MONO_SLICE_BYTES: usize = SLICE_WIDTH / 8;

/// Monoscale boundary byte (alternating one and zero bits)
pub const MONO_BOUNDARY_BYTE: u8 = 0xAA;

/// Number of consecutive boundary bytes that mark the monoscale data start
pub const MONO_BOUNDARY_RUN: usize = 8;

/// Cell value recorded for monoscale shadow pixels
pub const MONO_SHADOW_LEVEL: u8 = 1;

/// Cell value marking a filled Poisson spot region
pub const POISSON_MARKER: u8 = 7;

/// First marker value assigned during connected-component counting
pub const CLUSTER_MARKER_BASE: u16 = 10;

/// Column the barycenter is moved to when centering a particle image
pub const CENTER_COLUMN: usize = 31;

/// Decoded 16-byte record header
///
/// Only the recording date is meaningful to the decoder; the remaining ten
/// bytes are ignored. The date words are stored low byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordHeader {
    /// Recording year
    pub year: u16,
    /// Recording month (1-12 in well-formed files)
    pub month: u16,
    /// Recording day of month
    pub day: u16,
}

impl RecordHeader {
    /// Size of the record header in bytes
    pub const SIZE: usize = RECORD_HEADER_BYTES;

    /// Parse a record header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(OapError::RecordHeaderLength);
        }
        Ok(Self {
            year: u16::from_le_bytes([bytes[0], bytes[1]]),
            month: u16::from_le_bytes([bytes[2], bytes[3]]),
            day: u16::from_le_bytes([bytes[4], bytes[5]]),
        })
    }
}

/// Acquisition channel of an imagefile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Three-level shadow intensity, 2 bits per diode
    Grayscale,
    /// Single-level shadow, 1 bit per diode
    Monoscale,
}

impl Channel {
    /// Parse a channel name
    ///
    /// Both the "gray" and "grey" spellings select the grayscale channel;
    /// longer forms such as "grayscale" or "monoscale" are accepted.
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.starts_with("gray") || lower.starts_with("grey") {
            Ok(Channel::Grayscale)
        } else if lower.starts_with("mono") {
            Ok(Channel::Monoscale)
        } else {
            Err(OapError::UnknownChannel)
        }
    }
}

impl core::str::FromStr for Channel {
    type Err = OapError;

    fn from_str(s: &str) -> Result<Self> {
        Channel::from_name(s)
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Channel::Grayscale => write!(f, "grayscale"),
            Channel::Monoscale => write!(f, "monoscale"),
        }
    }
}
