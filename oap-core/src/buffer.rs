//! Per-buffer decoding pipeline
//!
//! One call decodes one self-contained 4096-byte data buffer: expand the
//! run-length data, locate the first particle boundary, then walk the
//! stream frame by frame. Each particle is validated, filtered,
//! reconstructed and analyzed; accepted particles are appended to the
//! caller's collection.
//!
//! Rejections are counted, never raised: a header bit error aborts the
//! remainder of the buffer after bumping the error counter, and a trailing
//! particle that would overrun the stream ends the buffer silently.

use crate::analysis::{cluster, principal, spot};
use crate::codec::{grayscale, monoscale};
use crate::counters::BufferCounters;
use crate::error::{OapError, Result};
use crate::format::{BUFFER_BYTES, GRAY_SLICE_BITS, MONO_SLICE_BYTES};
use crate::image::{reconstruct_grayscale, reconstruct_monoscale};
use crate::options::DecodeOptions;
use crate::particle;
use crate::record::{ParticleAnalysis, ParticleRecord};

/// Decode one compressed grayscale buffer
///
/// Accepted particles are pushed onto `records`; all outcomes are tallied
/// in `counters`. Returns an error only when `data` is not a full buffer.
pub fn decode_grayscale_buffer(
    data: &[u8],
    options: &DecodeOptions,
    counters: &mut BufferCounters,
    records: &mut Vec<ParticleRecord>,
) -> Result<()> {
    if data.len() != BUFFER_BYTES {
        return Err(OapError::BufferLength);
    }

    let mut bits = grayscale::decode_bits(data);
    let Some(start) = grayscale::find_particle_start(&bits) else {
        // Buffers without any particle are common at both ends of a file.
        return Ok(());
    };

    let slice_total = (bits.len() - start) / GRAY_SLICE_BITS;
    let mut i = 0usize;

    while i < slice_total {
        let frame = start + i * GRAY_SLICE_BITS;
        particle::swap_header_pairs(&mut bits, frame);
        let slice_count = particle::slice_count(&bits, frame);

        // A particle broken off at the end of the buffer has no trailer
        // and is expected, not anomalous.
        if (i + slice_count) * GRAY_SLICE_BITS + GRAY_SLICE_BITS + start >= bits.len() {
            return Ok(());
        }

        // A valid particle starts with 56 zero bits and ends with an
        // all-ones trailer slice. Anything else taints the whole buffer.
        if !particle::leading_zeros_ok(&bits, frame)
            || !particle::trailer_ok(&bits, start + (i + slice_count) * GRAY_SLICE_BITS)
        {
            counters.bit_errors += 1;
            return Ok(());
        }

        let header = particle::decode_grayscale_header(&bits, frame);
        i += 1;

        // The trailer slice is included in the header's slice count.
        let img_height = slice_count - 1;

        if !options.timeframes.accepts(header.second_of_day() as i64)
            || !options.heights.accepts(img_height as i64)
        {
            i += slice_count + 1;
            continue;
        }

        let body = start + i * GRAY_SLICE_BITS;
        let (mut image, metrics) = reconstruct_grayscale(&bits, body, img_height);

        let mut keep = true;
        if metrics.pixel_count == 0 {
            counters.zero_pixel += 1;
            keep = false;
        }
        let truncated = metrics.truncated();
        if truncated {
            counters.truncated += 1;
            if !options.include_truncated {
                keep = false;
            }
        }
        if !options.widths.accepts(metrics.particle_width() as i64) {
            keep = false;
        }
        if !keep {
            i += slice_count + 1;
            continue;
        }
        let Some((x_bary, y_bary)) = metrics.barycenter() else {
            i += slice_count + 1;
            continue;
        };

        let mut analysis = ParticleAnalysis {
            truncated,
            ..Default::default()
        };

        if options.poisson_spots
            && img_height >= 3
            && metrics.particle_width() >= 3
            && metrics.pixel_count >= 4
        {
            analysis.poisson_size = spot::detect_poisson_spot(
                &mut image,
                x_bary,
                y_bary,
                metrics.min_index,
                metrics.max_index,
            );
        }

        if options.principal_components {
            if let Some(fit) = principal::principal_components(&image) {
                analysis.hit_ratio = fit.hit_ratio;
                analysis.axis_ratio = fit.axis_ratio;
                analysis.alpha = fit.alpha;
            }
        }

        if options.cluster_count {
            analysis.cluster_count =
                cluster::cluster_count(&image, metrics.min_index, metrics.max_index);
        }

        if options.center_particle && !truncated {
            image.center_at(x_bary);
        }

        counters.particles += 1;
        records.push(ParticleRecord {
            header,
            image,
            metrics,
            analysis,
        });

        // Skip the image slices plus the second boundary slice; only one
        // of the two trailers is included in the slice count.
        i += slice_count + 1;
    }
    Ok(())
}

/// Decode one compressed monoscale buffer
///
/// Monoscale particles are reconstructed and filtered with the same
/// bookkeeping as grayscale ones but receive no geometric analysis.
pub fn decode_monoscale_buffer(
    data: &[u8],
    options: &DecodeOptions,
    counters: &mut BufferCounters,
    records: &mut Vec<ParticleRecord>,
) -> Result<()> {
    if data.len() != BUFFER_BYTES {
        return Err(OapError::BufferLength);
    }

    let bytes = monoscale::decode_bytes(data);
    let slice_total = bytes.len() / MONO_SLICE_BYTES;
    let mut i = 0usize;

    while i < slice_total {
        let offset = i * MONO_SLICE_BYTES;
        let mut slice = [0u8; MONO_SLICE_BYTES];
        slice.copy_from_slice(&bytes[offset..offset + MONO_SLICE_BYTES]);
        let header = particle::decode_monoscale_header(&slice);
        let slice_count = header.slice_count as usize;
        i += 1;

        let img_height = slice_count.saturating_sub(1);
        if i + img_height > slice_total {
            return Ok(());
        }

        if !options.timeframes.accepts(header.second_of_day() as i64)
            || !options.heights.accepts(img_height as i64)
        {
            i += slice_count;
            continue;
        }

        let (image, metrics) = reconstruct_monoscale(&bytes, i * MONO_SLICE_BYTES, img_height);

        let mut keep = true;
        if metrics.pixel_count == 0 {
            counters.zero_pixel += 1;
            keep = false;
        }
        let truncated = metrics.truncated();
        if truncated {
            counters.truncated += 1;
            if !options.include_truncated {
                keep = false;
            }
        }
        if !options.widths.accepts(metrics.particle_width() as i64) {
            keep = false;
        }

        if keep {
            counters.particles += 1;
            records.push(ParticleRecord {
                header,
                image,
                metrics,
                analysis: ParticleAnalysis {
                    truncated,
                    ..Default::default()
                },
            });
        }
        i += slice_count;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{MONO_BOUNDARY_BYTE, SLICE_WIDTH};
    use crate::image::tests::gray_slice;
    use crate::particle::tests::encode_grayscale_header;
    use crate::particle::ParticleHeader;

    /// Pack a decoded bit stream into 4-bit literal codes and pad the
    /// buffer to its full 4096 bytes with silent bytes.
    fn compress_gray(bits: &[u8]) -> Vec<u8> {
        assert_eq!(bits.len() % 4, 0);
        let mut data: Vec<u8> = bits
            .chunks(4)
            .map(|nibble| 0x10 | nibble[0] << 3 | nibble[1] << 2 | nibble[2] << 1 | nibble[3])
            .collect();
        assert!(data.len() <= BUFFER_BYTES);
        data.resize(BUFFER_BYTES, 0);
        data
    }

    fn test_header(slice_count: u16) -> ParticleHeader {
        ParticleHeader {
            true_air_speed: 110,
            number: 77,
            nanosecond: 2,
            microsecond: 350,
            millisecond: 512,
            second: 30,
            minute: 15,
            hour: 9,
            slice_count,
        }
    }

    /// Transmitted stream for one particle: header, body, trailer and the
    /// second boundary slice that is not part of the slice count.
    fn particle_stream(header: &ParticleHeader, body: &[Vec<u8>]) -> Vec<u8> {
        assert_eq!(body.len() + 1, header.slice_count as usize);
        let mut bits = encode_grayscale_header(header);
        for slice in body {
            bits.extend_from_slice(slice);
        }
        bits.extend(vec![1u8; 2 * GRAY_SLICE_BITS]);
        bits
    }

    fn sync_preamble() -> Vec<u8> {
        vec![1u8; 256]
    }

    #[test]
    fn test_single_particle_end_to_end() {
        let mut bits = sync_preamble();
        bits.extend(particle_stream(
            &test_header(2),
            &[gray_slice(&[(10, 2)])],
        ));
        let buffer = compress_gray(&bits);

        let options = DecodeOptions::new().with_poisson_spots(true);
        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &options, &mut counters, &mut records).unwrap();

        assert_eq!(counters.particles, 1);
        assert_eq!(counters.bit_errors, 0);
        assert_eq!(counters.zero_pixel, 0);
        assert_eq!(counters.truncated, 0);
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.header, test_header(2));
        assert_eq!(record.header.second_of_day(), 9 * 3600 + 15 * 60 + 30);
        assert_eq!(record.metrics.min_index, 10);
        assert_eq!(record.metrics.max_index, 10);
        assert_eq!(record.metrics.pixel_count, 1);
        assert_eq!(record.image.get(10, 0), 2);
        // Width 1 never meets the spot detection preconditions.
        assert_eq!(record.analysis.poisson_size, 0);
    }

    #[test]
    fn test_leading_bit_error_aborts_whole_buffer() {
        let mut bits = sync_preamble();
        let first = bits.len();
        bits.extend(particle_stream(
            &test_header(2),
            &[gray_slice(&[(10, 2)])],
        ));
        bits.extend(particle_stream(
            &test_header(2),
            &[gray_slice(&[(20, 1)])],
        ));
        // One stray bit in the leading zeros of the first header taints
        // the buffer; the intact second particle must not be decoded.
        bits[first + 5] = 1;
        let buffer = compress_gray(&bits);

        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &DecodeOptions::new(), &mut counters, &mut records)
            .unwrap();

        assert_eq!(counters.bit_errors, 1);
        assert_eq!(counters.particles, 0);
        assert!(records.is_empty());
    }

    #[test]
    fn test_two_particles_in_one_buffer() {
        let mut bits = sync_preamble();
        bits.extend(particle_stream(
            &test_header(2),
            &[gray_slice(&[(10, 2)])],
        ));
        bits.extend(particle_stream(
            &test_header(3),
            &[gray_slice(&[(20, 1)]), gray_slice(&[(21, 3)])],
        ));
        let buffer = compress_gray(&bits);

        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &DecodeOptions::new(), &mut counters, &mut records)
            .unwrap();

        assert_eq!(counters.particles, 2);
        assert_eq!(records[1].metrics.min_index, 20);
        assert_eq!(records[1].metrics.max_index, 21);
        assert_eq!(records[1].height(), 2);
    }

    #[test]
    fn test_missing_trailer_stops_buffer_silently() {
        // The slice count points past the end of the stream: expected for
        // the last particle of a buffer, not an error.
        let mut bits = sync_preamble();
        bits.extend(encode_grayscale_header(&test_header(40)));
        bits.extend(gray_slice(&[(10, 2)]));
        let buffer = compress_gray(&bits);

        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &DecodeOptions::new(), &mut counters, &mut records)
            .unwrap();

        assert_eq!(counters, BufferCounters::default());
        assert!(records.is_empty());
    }

    #[test]
    fn test_buffer_without_particles() {
        let buffer = vec![0u8; BUFFER_BYTES];
        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &DecodeOptions::new(), &mut counters, &mut records)
            .unwrap();
        assert_eq!(counters, BufferCounters::default());
        assert!(records.is_empty());
    }

    #[test]
    fn test_wrong_buffer_length_is_an_error() {
        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        let result =
            decode_grayscale_buffer(&[0u8; 100], &DecodeOptions::new(), &mut counters, &mut records);
        assert_eq!(result, Err(OapError::BufferLength));
    }

    #[test]
    fn test_zero_pixel_particle_is_rejected() {
        let mut bits = sync_preamble();
        bits.extend(particle_stream(&test_header(2), &[gray_slice(&[])]));
        let buffer = compress_gray(&bits);

        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &DecodeOptions::new(), &mut counters, &mut records)
            .unwrap();

        assert_eq!(counters.zero_pixel, 1);
        assert_eq!(counters.particles, 0);
        assert!(records.is_empty());
    }

    #[test]
    fn test_truncated_particle_rejection_and_inclusion() {
        let mut bits = sync_preamble();
        bits.extend(particle_stream(&test_header(2), &[gray_slice(&[(0, 3)])]));
        let buffer = compress_gray(&bits);

        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &DecodeOptions::new(), &mut counters, &mut records)
            .unwrap();
        assert_eq!(counters.truncated, 1);
        assert_eq!(counters.particles, 0);

        let options = DecodeOptions::new().with_truncated(true);
        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &options, &mut counters, &mut records).unwrap();
        assert_eq!(counters.truncated, 1);
        assert_eq!(counters.particles, 1);
        assert!(records[0].analysis.truncated);
    }

    #[test]
    fn test_timeframe_filter_skips_particle() {
        let mut bits = sync_preamble();
        bits.extend(particle_stream(
            &test_header(2),
            &[gray_slice(&[(10, 2)])],
        ));
        bits.extend(particle_stream(
            &test_header(3),
            &[gray_slice(&[(20, 1)]), gray_slice(&[(21, 3)])],
        ));
        let buffer = compress_gray(&bits);

        // The test timestamp is 09:15:30; a window elsewhere drops both.
        let options =
            DecodeOptions::new().with_timeframes([(0, 3600)].into_iter().collect());
        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &options, &mut counters, &mut records).unwrap();
        assert_eq!(counters.particles, 0);

        // A window around the timestamp keeps both again.
        let second = test_header(2).second_of_day() as i64;
        let options = DecodeOptions::new()
            .with_timeframes([(second, second)].into_iter().collect());
        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &options, &mut counters, &mut records).unwrap();
        assert_eq!(counters.particles, 2);
    }

    #[test]
    fn test_width_filter_skips_particle() {
        let mut bits = sync_preamble();
        bits.extend(particle_stream(
            &test_header(2),
            &[gray_slice(&[(10, 2)])],
        ));
        let buffer = compress_gray(&bits);

        let options = DecodeOptions::new().with_widths([(2, 64)].into_iter().collect());
        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &options, &mut counters, &mut records).unwrap();
        assert_eq!(counters.particles, 0);
    }

    #[test]
    fn test_enclosed_spot_detected_end_to_end() {
        // 7x7 solid block with a 3x3 hole: decodes to a spot of width 3.
        let mut body = Vec::new();
        for y in 0..7 {
            let mut levels = Vec::new();
            for x in 20..=26usize {
                let hole = (2..=4).contains(&y) && (22..=24).contains(&x);
                if !hole {
                    levels.push((x, 3u8));
                }
            }
            body.push(gray_slice(&levels));
        }

        let mut bits = sync_preamble();
        bits.extend(particle_stream(&test_header(8), &body));
        let buffer = compress_gray(&bits);

        let options = DecodeOptions::new().with_poisson_spots(true);
        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_grayscale_buffer(&buffer, &options, &mut counters, &mut records).unwrap();

        assert_eq!(counters.particles, 1);
        assert_eq!(records[0].analysis.poisson_size, 3);
    }

    #[test]
    fn test_monoscale_end_to_end() {
        // Boundary, then a 2-slice particle: header plus one image slice
        // with a single shadowed diode at column 10.
        let mut stream = Vec::new();
        let mut header = [0u8; MONO_SLICE_BYTES];
        header[0] = 42;
        header[6] = 9 << 3; // 09:00:00
        header[7] = 2 << 1;
        stream.extend_from_slice(&header);
        let mut body = [0xFFu8; MONO_SLICE_BYTES];
        body[1] = 0xFF ^ (1 << 5);
        stream.extend_from_slice(&body);

        let mut data = vec![0x07];
        data.extend(vec![MONO_BOUNDARY_BYTE; 8]);
        data.push((stream.len() - 1) as u8);
        data.extend_from_slice(&stream);
        data.resize(BUFFER_BYTES, 0x20);

        let mut counters = BufferCounters::new();
        let mut records = Vec::new();
        decode_monoscale_buffer(&data, &DecodeOptions::new(), &mut counters, &mut records)
            .unwrap();

        assert_eq!(counters.particles, 1);
        let record = &records[0];
        assert_eq!(record.header.number, 42);
        assert_eq!(record.header.second_of_day(), 9 * 3600);
        assert_eq!(record.metrics.pixel_count, 1);
        assert_eq!(record.metrics.min_index, 10);
        assert_eq!(record.image.get(10, 0), crate::format::MONO_SHADOW_LEVEL);
        assert!(record.image.height() == 1 && record.image.width() == SLICE_WIDTH);
    }
}
