//! OAP Core - Optical Array Probe Imagefile Decoding
//!
//! This crate provides the decoding pipeline for binary imagefiles recorded
//! by optical-array cloud-particle probes: run-length codecs for the
//! grayscale and monoscale channels, particle header decoding with
//! integrity checks, image reconstruction, and the geometric analysis of
//! reconstructed particles.
//!
//! All operations here are pure and I/O free; file access and the per-file
//! scan driver live in the companion `oap` crate.
//!
//! ## Pipeline
//!
//! ```text
//! compressed buffer -> codec -> particle frames -> image -> filters -> analysis
//! ```
//!
//! A single buffer decode looks like this:
//!
//! ```rust
//! use oap_core::{decode_grayscale_buffer, BufferCounters, DecodeOptions};
//!
//! let buffer = vec![0u8; 4096];
//! let options = DecodeOptions::new().with_poisson_spots(true);
//! let mut counters = BufferCounters::new();
//! let mut records = Vec::new();
//!
//! decode_grayscale_buffer(&buffer, &options, &mut counters, &mut records)?;
//! assert_eq!(counters.particles, records.len() as u32);
//! # Ok::<(), oap_core::OapError>(())
//! ```

pub mod analysis;
pub mod buffer;
pub mod codec;
pub mod counters;
pub mod error;
pub mod filters;
pub mod format;
pub mod image;
pub mod options;
pub mod particle;
pub mod record;

pub use buffer::{decode_grayscale_buffer, decode_monoscale_buffer};
pub use counters::BufferCounters;
pub use error::{OapError, Result};
pub use filters::{parse_range_spec, RangeFilter};
pub use format::{Channel, RecordHeader, BUFFER_BYTES, RECORD_BYTES, RECORD_HEADER_BYTES};
pub use image::{ImageMetrics, ParticleImage};
pub use options::DecodeOptions;
pub use particle::ParticleHeader;
pub use record::{ParticleAnalysis, ParticleRecord};
