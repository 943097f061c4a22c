//! Per-file scan driver
//!
//! A scan walks every selected record of an imagefile, decodes its data
//! buffer on the configured channel and collects the accepted particles
//! together with the running counters.

use hashbrown::HashSet;
use oap_core::{
    decode_grayscale_buffer, decode_monoscale_buffer, BufferCounters, Channel, DecodeOptions,
    ParticleRecord, RecordHeader,
};

use crate::error::Result;
use crate::imagefile::Imagefile;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Configuration for scanning one imagefile
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Acquisition channel of the file
    pub channel: Channel,
    /// Decode configuration handed to every buffer
    pub decode: DecodeOptions,
    include_buffers: Option<HashSet<usize>>,
    exclude_buffers: HashSet<usize>,
}

impl ScanOptions {
    /// Create options for the given channel with default decoding
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            decode: DecodeOptions::default(),
            include_buffers: None,
            exclude_buffers: HashSet::new(),
        }
    }

    /// Replace the decode configuration
    pub fn with_decode(mut self, decode: DecodeOptions) -> Self {
        self.decode = decode;
        self
    }

    /// Restrict the scan to the given buffer indices
    ///
    /// Without such a restriction every buffer is scanned.
    pub fn include_buffers<I: IntoIterator<Item = usize>>(mut self, indices: I) -> Self {
        self.include_buffers = Some(indices.into_iter().collect());
        self
    }

    /// Skip the given buffer indices
    pub fn exclude_buffers<I: IntoIterator<Item = usize>>(mut self, indices: I) -> Self {
        self.exclude_buffers = indices.into_iter().collect();
        self
    }

    /// Whether the buffer at `index` takes part in the scan
    pub fn selects(&self, index: usize) -> bool {
        if self.exclude_buffers.contains(&index) {
            return false;
        }
        match &self.include_buffers {
            Some(included) => included.contains(&index),
            None => true,
        }
    }
}

/// Everything a finished scan hands back to the caller
#[derive(Debug)]
pub struct ScanOutcome {
    /// Accepted particles in file order
    pub records: Vec<ParticleRecord>,
    /// Final per-file counters
    pub counters: BufferCounters,
    /// File-level report data
    pub summary: ScanSummary,
}

/// File-level scan report
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanSummary {
    /// Recording date from the first record header
    pub date: Option<RecordHeader>,
    /// Total file size in bytes
    pub file_bytes: usize,
    /// Number of complete records in the file
    pub buffer_count: usize,
}

impl core::fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(date) = self.date {
            let month = (date.month as usize)
                .checked_sub(1)
                .and_then(|m| MONTH_NAMES.get(m));
            match month {
                Some(name) => writeln!(f, "Recorded on {} {}, {}", name, date.day, date.year)?,
                None => writeln!(f, "Recorded on {}-{}-{}", date.year, date.month, date.day)?,
            }
        }
        writeln!(f, "File Bytes:\t{}", self.file_bytes)?;
        write!(f, "File Buffer:\t{}", self.buffer_count)
    }
}

impl Imagefile {
    /// Scan all selected buffers and collect accepted particles
    ///
    /// Counters start from zero for every scan; structural problems inside
    /// single buffers are counted there, never raised.
    pub fn scan(&self, options: &ScanOptions) -> Result<ScanOutcome> {
        let mut counters = BufferCounters::new();
        let mut records = Vec::new();

        for index in 0..self.record_count() {
            if !options.selects(index) {
                continue;
            }
            let Some(data) = self.record_data(index) else {
                break;
            };
            match options.channel {
                Channel::Grayscale => {
                    decode_grayscale_buffer(data, &options.decode, &mut counters, &mut records)?
                }
                Channel::Monoscale => {
                    decode_monoscale_buffer(data, &options.decode, &mut counters, &mut records)?
                }
            }
        }

        Ok(ScanOutcome {
            records,
            counters,
            summary: ScanSummary {
                date: self.recording_date(),
                file_bytes: self.len_bytes(),
                buffer_count: self.record_count(),
            },
        })
    }
}
