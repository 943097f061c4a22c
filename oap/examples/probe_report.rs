//! Open an imagefile, scan it with every analysis enabled and print a
//! short report plus the first accepted particle image.

use oap::{Channel, DecodeOptions, Imagefile, ScanOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: probe_report <imagefile>")?;

    let imagefile = Imagefile::open(&path)?;
    println!("Opened {} ({} bytes)", path, imagefile.len_bytes());
    println!("Records: {}", imagefile.record_count());

    if let Some(date) = imagefile.recording_date() {
        println!("Recorded: {}-{:02}-{:02}", date.year, date.month, date.day);
    }

    let options = ScanOptions::new(Channel::Grayscale).with_decode(
        DecodeOptions::new()
            .with_poisson_spots(true)
            .with_principal_components(true)
            .with_cluster_count(true),
    );
    let outcome = imagefile.scan(&options)?;

    println!();
    println!("Particles:\t{}", outcome.counters.particles);
    println!("Biterrors:\t{}", outcome.counters.bit_errors);
    println!("No Pixels:\t{}", outcome.counters.zero_pixel);
    println!("Truncated:\t{}", outcome.counters.truncated);

    if let Some(record) = outcome.records.first() {
        println!();
        println!(
            "First particle: #{} at second {}, {}x{} diodes, {} clusters",
            record.header.number,
            record.header.second_of_day(),
            record.width(),
            record.height(),
            record.analysis.cluster_count,
        );
        print!("{}", record.image);
    }
    Ok(())
}
