#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the lawsuit tracker data tools.
//!
//! Run without arguments to shape `data/lawsuit_data.csv` into
//! `static/data/lawsuits.csv`. The `pages` subcommand turns a shaped file
//! into the site's page route manifest.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use lawsuit_tracker_cli_utils::IndicatifProgress;
use lawsuit_tracker_shape::suppress::{self, SuppressionRule};
use lawsuit_tracker_shape::{ShapeArgs, paths};

#[derive(Parser)]
#[command(
    name = "lawsuit_tracker_shape",
    about = "Lawsuit tracker data shaping tool",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    shape: ShapeOpts,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate raw lawsuits into state, county, and tract summaries
    /// (default)
    Shape(ShapeOpts),
    /// Write the page route manifest for a shaped summaries file
    Pages {
        /// Shaped summaries CSV
        #[arg(long, default_value_os_t = paths::lawsuits_csv_path())]
        input: PathBuf,
        /// Destination of the JSON route manifest
        #[arg(long, default_value_os_t = paths::pages_json_path())]
        output: PathBuf,
    },
}

#[derive(Args)]
struct ShapeOpts {
    /// Raw per-lawsuit CSV export
    #[arg(long, env = "LAWSUIT_TRACKER_INPUT", default_value_os_t = paths::lawsuit_data_path())]
    input: PathBuf,
    /// Destination of the summaries CSV
    #[arg(long, env = "LAWSUIT_TRACKER_OUTPUT", default_value_os_t = paths::lawsuits_csv_path())]
    output: PathBuf,
    /// Also write the summaries as structured JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
    /// Publish every region, including those withheld by default
    #[arg(long)]
    no_suppress: bool,
    /// Additionally withhold the region with this GEOID (repeatable)
    #[arg(long = "suppress-geoid", value_name = "GEOID")]
    suppress_geoids: Vec<String>,
}

impl ShapeOpts {
    fn into_args(self) -> ShapeArgs {
        let mut suppression = if self.no_suppress {
            Vec::new()
        } else {
            suppress::default_rules()
        };
        suppression.extend(self.suppress_geoids.into_iter().map(SuppressionRule::Geoid));

        ShapeArgs {
            input: self.input,
            output: self.output,
            json: self.json,
            suppression,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = lawsuit_tracker_cli_utils::init_logger();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command.unwrap_or(Commands::Shape(cli.shape)) {
        Commands::Shape(opts) => {
            let args = opts.into_args();
            let load = IndicatifProgress::rows_spinner(&multi, "Loading lawsuits");
            let levels = IndicatifProgress::steps_bar(&multi, "Aggregating");

            let report = lawsuit_tracker_shape::run(&args, Some(load), Some(levels)).await?;

            log::info!(
                "Shaped {} rows ({} dropped) into {} summaries, {} suppressed, in {:.1}s",
                report.rows_read,
                report.rows_dropped,
                report.summaries,
                report.suppressed,
                start.elapsed().as_secs_f64()
            );
        }
        Commands::Pages { input, output } => {
            let count = lawsuit_tracker_shape::write_pages(&input, &output).await?;
            log::info!("Wrote {count} page routes");
        }
    }

    Ok(())
}
