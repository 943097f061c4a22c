//! Memory-mapped imagefile access
//!
//! An imagefile is a flat sequence of records, each a 16-byte record
//! header followed by a 4096-byte compressed data buffer. Files are mapped
//! read-only; a trailing partial record is ignored.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use oap_core::{RecordHeader, BUFFER_BYTES, RECORD_BYTES, RECORD_HEADER_BYTES};

use crate::error::Result;

/// Read-only handle to an imagefile
pub struct Imagefile {
    map: Mmap,
    path: PathBuf,
}

impl Imagefile {
    /// Open and map an imagefile
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let file = File::open(&path_buf)?;
        // SAFETY: the map is read-only and outlives every slice handed out.
        let map = unsafe { Mmap::map(&file)? };
        Ok(Self {
            map,
            path: path_buf,
        })
    }

    /// Path this imagefile was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total file size in bytes
    pub fn len_bytes(&self) -> usize {
        self.map.len()
    }

    /// Number of complete records in the file
    ///
    /// Bytes beyond the last complete record do not form a record and are
    /// ignored.
    pub fn record_count(&self) -> usize {
        self.map.len() / RECORD_BYTES
    }

    /// Decoded record header at the given record index
    pub fn record_header(&self, index: usize) -> Option<RecordHeader> {
        if index >= self.record_count() {
            return None;
        }
        let offset = index * RECORD_BYTES;
        RecordHeader::from_bytes(&self.map[offset..offset + RECORD_HEADER_BYTES]).ok()
    }

    /// Compressed data buffer of the record at the given index
    pub fn record_data(&self, index: usize) -> Option<&[u8]> {
        if index >= self.record_count() {
            return None;
        }
        let offset = index * RECORD_BYTES + RECORD_HEADER_BYTES;
        Some(&self.map[offset..offset + BUFFER_BYTES])
    }

    /// Recording date, taken from the first record header
    ///
    /// The date rarely changes within one flight, so the first record is
    /// representative for the whole file.
    pub fn recording_date(&self) -> Option<RecordHeader> {
        self.record_header(0)
    }
}
