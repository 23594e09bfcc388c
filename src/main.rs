use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use photo_geolocate::exif_parser::read_metadata;
use photo_geolocate::geocoding::AzureMapsClient;
use photo_geolocate::pipeline;
use photo_geolocate::settings::Settings;

/// Print the GPS position stored in an image and the street address it points to
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image file to inspect
    image: PathBuf,
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log debug output to stderr
    #[arg(short, long, action)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "photo_geolocate=debug"
    } else {
        "warn"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // A .env file is optional
    dotenvy::dotenv().ok();
    init_tracing(args.verbose);

    if !args.image.is_file() {
        anyhow::bail!("Image not found: {}", args.image.display());
    }

    let settings = Settings::load(args.config.as_deref())?;
    let geocoder = AzureMapsClient::new(&settings)
        .context("Failed to set up the Azure Maps client")?;

    debug!("Reading metadata from {}", args.image.display());
    let exif = read_metadata(&args.image)?;

    let report = pipeline::locate(exif.as_ref(), &geocoder)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report.render(&mut out)?;
    out.flush()?;

    Ok(())
}
