//! Per-particle export to external files
//!
//! Accepted particles can be dumped one file per particle, either as a raw
//! binary image or as delimited text with a fixed measurement header. File
//! names combine the particle timestamp and counter so particles from one
//! flight never collide.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use oap_core::ParticleRecord;

use crate::error::Result;

/// Column names of the measurement header written to text exports
pub const MEASUREMENT_COLUMNS: [&str; 15] = [
    "SecOfDay", "Prtcl#", "N_y", "N_x", "MilliSec", "MicroSec", "NanoSec", "Min_idx", "Max_idx",
    "#pxl", "1pxl", "2pxl", "3pxl", "TAS", "N_Poisson",
];

/// Type tag prepended to binary exports: not yet classified
const BINARY_TYPE_TAG: u8 = b'u';

/// File name stem for one particle: `<second-of-day>_<particle-number>`
pub fn particle_file_stem(record: &ParticleRecord) -> String {
    format!("{}_{}", record.header.second_of_day(), record.header.number)
}

fn measurement_values(record: &ParticleRecord) -> [i64; 15] {
    [
        record.header.second_of_day() as i64,
        record.header.number as i64,
        record.height() as i64,
        record.width() as i64,
        record.header.millisecond as i64,
        record.header.microsecond as i64,
        record.header.nanosecond as i64,
        record.metrics.min_index as i64,
        record.metrics.max_index as i64,
        record.metrics.pixel_count as i64,
        record.metrics.level_counts[0] as i64,
        record.metrics.level_counts[1] as i64,
        record.metrics.level_counts[2] as i64,
        record.header.true_air_speed as i64,
        record.analysis.poisson_size as i64,
    ]
}

/// Write one particle as a raw binary image
///
/// The file starts with a one-byte type tag followed by the row-major cell
/// values; the height is recoverable from the file length.
pub fn export_binary<P: AsRef<Path>>(record: &ParticleRecord, directory: P) -> Result<PathBuf> {
    let mut path = directory.as_ref().to_path_buf();
    path.push(format!("{}.bin", particle_file_stem(record)));

    let mut file = File::create(&path)?;
    file.write_all(&[BINARY_TYPE_TAG])?;
    file.write_all(record.image.as_slice())?;
    Ok(path)
}

/// Write one particle as delimited text
///
/// Two header lines carry the measurement columns and their values,
/// followed by one line per image row. The Poisson spot column is only
/// written when spot detection ran.
pub fn export_csv<P: AsRef<Path>>(
    record: &ParticleRecord,
    directory: P,
    with_poisson: bool,
) -> Result<PathBuf> {
    let mut path = directory.as_ref().to_path_buf();
    path.push(format!("{}.csv", particle_file_stem(record)));

    let columns = if with_poisson {
        MEASUREMENT_COLUMNS.len()
    } else {
        MEASUREMENT_COLUMNS.len() - 1
    };

    let mut out = String::new();
    out.push_str(&MEASUREMENT_COLUMNS[..columns].join(","));
    out.push('\n');
    let values = measurement_values(record);
    let values: Vec<String> = values[..columns].iter().map(|v| v.to_string()).collect();
    out.push_str(&values.join(","));
    out.push('\n');

    for y in 0..record.image.height() {
        for x in 0..record.image.width() {
            if x > 0 {
                out.push(',');
            }
            out.push_str(&record.image.get(x, y).to_string());
        }
        out.push('\n');
    }

    let mut file = File::create(&path)?;
    file.write_all(out.as_bytes())?;
    Ok(path)
}
