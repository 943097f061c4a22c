#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use oap::{export_binary, export_csv, Channel, DecodeOptions, Imagefile, RangeFilter, ScanOptions};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(author, version, about = "Scan an optical array probe imagefile and report its particles")]
struct Cli {
    /// Imagefile to scan
    file: std::path::PathBuf,

    /// Acquisition channel: gray, grey or mono
    #[arg(long, default_value = "gray")]
    channel: Channel,

    /// Keep truncated particles
    #[arg(long)]
    truncated: bool,

    /// Center accepted particle images on the middle diode
    #[arg(long)]
    center: bool,

    /// Detect Poisson spots
    #[arg(long)]
    poisson: bool,

    /// Fit principal components and an ellipse
    #[arg(long)]
    principal: bool,

    /// Count connected particle clusters
    #[arg(long)]
    cluster: bool,

    /// Accepted time-of-day window in seconds, format min:max (repeatable)
    #[arg(long = "timeframe")]
    timeframes: Vec<String>,

    /// Accepted image height window in slices, format min:max (repeatable)
    #[arg(long = "height")]
    heights: Vec<String>,

    /// Accepted particle width window in diodes, format min:max (repeatable)
    #[arg(long = "width")]
    widths: Vec<String>,

    /// Load decode options from a JSON file instead of flags
    #[cfg(feature = "serde")]
    #[arg(long)]
    options: Option<std::path::PathBuf>,

    /// Export accepted particles into this directory
    #[arg(long)]
    export_dir: Option<std::path::PathBuf>,

    /// Export format: csv or bin
    #[arg(long, default_value = "csv")]
    export: String,
}

#[cfg(feature = "cli")]
fn parse_filter(specs: &[String]) -> Result<RangeFilter, Box<dyn std::error::Error>> {
    let mut filter = RangeFilter::new();
    for spec in specs {
        let (min, max) = oap::parse_range_spec(spec)?;
        filter.push(min, max);
    }
    Ok(filter)
}

#[cfg(feature = "cli")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let start_time = std::time::Instant::now();

    let mut decode = DecodeOptions::new()
        .with_truncated(cli.truncated)
        .with_centering(cli.center)
        .with_poisson_spots(cli.poisson)
        .with_principal_components(cli.principal)
        .with_cluster_count(cli.cluster)
        .with_timeframes(parse_filter(&cli.timeframes)?)
        .with_heights(parse_filter(&cli.heights)?)
        .with_widths(parse_filter(&cli.widths)?);

    #[cfg(feature = "serde")]
    if let Some(path) = &cli.options {
        let json = std::fs::read_to_string(path)?;
        decode = serde_json::from_str(&json)?;
    }

    let imagefile = Imagefile::open(&cli.file)?;
    let options = ScanOptions::new(cli.channel).with_decode(decode);
    let outcome = imagefile.scan(&options)?;

    println!("{}", outcome.summary);
    println!();
    println!("Particles:\t{}", outcome.counters.particles);
    println!("Biterrors:\t{}", outcome.counters.bit_errors);
    println!("No Pixels:\t{}", outcome.counters.zero_pixel);
    println!("Truncated:\t{}", outcome.counters.truncated);

    if let Some(directory) = &cli.export_dir {
        std::fs::create_dir_all(directory)?;
        for record in &outcome.records {
            if cli.export == "bin" {
                export_binary(record, directory)?;
            } else {
                export_csv(record, directory, cli.poisson)?;
            }
        }
        println!(
            "Exported {} particles to {}",
            outcome.records.len(),
            directory.display()
        );
    }

    println!("Runtime:\t{:.3} seconds", start_time.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This example requires the 'cli' feature: cargo run --features cli --example scan_imagefile");
}
