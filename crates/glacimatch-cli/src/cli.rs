use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Glacimatch - join weather stations to their nearest glacier
#[derive(Parser, Debug)]
#[command(name = "glacimatch")]
#[command(about = "Join weather stations to their nearest glacier", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML config file (defaults to ./glacimatch.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match each station to its nearest glacier and export the table
    Match(MatchArgs),

    /// Report on an input file without running a match
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct MatchArgs {
    /// Station table: CSV with latitude and longitude columns
    #[arg(long)]
    pub stations: PathBuf,

    /// Glacier vector file (GeoJSON or Shapefile)
    #[arg(long)]
    pub glaciers: PathBuf,

    /// Path of the CSV file to write
    #[arg(long)]
    pub output: PathBuf,

    /// Attribute holding the glacier name
    #[arg(long)]
    pub name_field: Option<String>,

    /// EPSG code of the projected CRS used for distance computation
    #[arg(long)]
    pub epsg: Option<u32>,

    /// Discard matches farther than this many kilometers
    #[arg(long)]
    pub max_distance_km: Option<f64>,

    /// Number of result rows to preview
    #[arg(long)]
    pub preview: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// A station CSV or a glacier vector file
    pub path: PathBuf,

    /// Attribute expected to hold the glacier name
    #[arg(long)]
    pub name_field: Option<String>,
}
