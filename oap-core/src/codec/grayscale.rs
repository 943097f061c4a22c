//! Grayscale run-length bit codec
//!
//! Compressed grayscale data is a stream of control bytes. Tested in this
//! priority order, a control byte either repeats the last decoded 2-bit
//! pair or carries 6, 4 or 2 literal bits:
//!
//! - `0x80` set: repeat code, low 7 bits give the repeat count
//! - `0x40` set: 6 literal bits, most significant first
//! - `0x10` set: 4 literal bits, most significant first
//! - `0x04` set: 2 literal bits, most significant first
//! - otherwise: nothing is emitted
//!
//! Literal codes carry the repeat state forward: their low 2 bits become
//! the pair replayed by subsequent repeat codes.

/// Count the number of decompressed bits in a compressed grayscale buffer
///
/// Runs the same control-byte grammar as [`decode_bits`] without emitting
/// anything, so the decode pass can allocate its output exactly once.
pub fn count_bits(data: &[u8]) -> usize {
    let mut bits = 0;
    for &byte in data {
        if byte & 0x80 != 0 {
            bits += 2 * (byte & 0x7F) as usize;
        } else if byte & 0x40 != 0 {
            bits += 6;
        } else if byte & 0x10 != 0 {
            bits += 4;
        } else if byte & 0x04 != 0 {
            bits += 2;
        }
    }
    bits
}

/// Decompress a grayscale buffer into a sequence of bits
///
/// Each output element is a single bit with value 0 or 1, appended in
/// emission order.
pub fn decode_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = vec![0u8; count_bits(data)];
    let mut pos = 0;
    let mut last_pair = 0u8;

    for &byte in data {
        if byte & 0x80 != 0 {
            let repeats = (byte & 0x7F) as usize;
            for _ in 0..repeats {
                match last_pair {
                    3 => {
                        bits[pos] = 1;
                        bits[pos + 1] = 1;
                    }
                    2 => bits[pos] = 1,
                    1 => bits[pos + 1] = 1,
                    _ => {}
                }
                pos += 2;
            }
        } else if byte & 0x40 != 0 {
            for j in (0..6).rev() {
                if byte & (1 << j) != 0 {
                    bits[pos] = 1;
                }
                pos += 1;
            }
            last_pair = byte & 3;
        } else if byte & 0x10 != 0 {
            for j in (0..4).rev() {
                if byte & (1 << j) != 0 {
                    bits[pos] = 1;
                }
                pos += 1;
            }
            last_pair = byte & 3;
        } else if byte & 0x04 != 0 {
            for j in (0..2).rev() {
                if byte & (1 << j) != 0 {
                    bits[pos] = 1;
                }
                pos += 1;
            }
            last_pair = byte & 3;
        }
    }
    debug_assert_eq!(pos, bits.len());
    bits
}

/// Find the bit offset of the first particle in a decoded stream
///
/// Buffers rarely begin on a particle boundary. The first zero bit that
/// follows a run of at least 256 consecutive one bits marks the start of
/// the first particle frame. Returns `None` for buffers without particles,
/// which is common at the beginning and end of an imagefile.
pub fn find_particle_start(bits: &[u8]) -> Option<usize> {
    let mut ones = 0usize;
    for (i, &bit) in bits.iter().enumerate() {
        if ones >= 256 && bit == 0 {
            return Some(i);
        }
        if bit == 1 {
            ones += 1;
        } else {
            ones = 0;
        }
    }
    None
}
