//! OAP - Optical Array Probe Imagefile Processing
//!
//! This library provides file access and driver logic on top of the
//! decoding primitives in `oap-core`: memory-mapped imagefile reading,
//! the per-file scan loop, and per-particle export.
//!
//! ## Architecture
//!
//! The workspace follows a clean decoding/I-O separation:
//!
//! - **oap-core**: pure codecs, particle framing, reconstruction and
//!   geometric analysis (no I/O)
//! - **oap**: concrete file handling, scanning and export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oap::{Channel, DecodeOptions, Imagefile, ScanOptions};
//!
//! fn example() -> oap::Result<()> {
//!     let imagefile = Imagefile::open("flight.oap")?;
//!
//!     let options = ScanOptions::new(Channel::Grayscale)
//!         .with_decode(DecodeOptions::new().with_poisson_spots(true));
//!     let outcome = imagefile.scan(&options)?;
//!
//!     println!("{}", outcome.summary);
//!     println!("Particles:\t{}", outcome.counters.particles);
//!     Ok(())
//! }
//! ```

// Re-export the decoding primitives alongside the file layer.
pub use oap_core::{
    decode_grayscale_buffer, decode_monoscale_buffer, parse_range_spec, BufferCounters, Channel,
    DecodeOptions, ImageMetrics, OapError, ParticleAnalysis, ParticleHeader, ParticleImage,
    ParticleRecord, RangeFilter, RecordHeader,
};

pub mod error;
pub mod export;
#[cfg(feature = "mmap")]
pub mod imagefile;
#[cfg(feature = "mmap")]
pub mod scan;

pub use error::{ImagefileError, Result};
pub use export::{export_binary, export_csv, MEASUREMENT_COLUMNS};
#[cfg(feature = "mmap")]
pub use imagefile::Imagefile;
#[cfg(feature = "mmap")]
pub use scan::{ScanOptions, ScanOutcome, ScanSummary};
