use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use floorplan::query::{BoothQuery, count_by_category, query_booths};
use floorplan::{Booth, CanvasSize, PickOptions, pick_booth};
use formats::PositionsOrigin;
use foundation::math::Vec2;
use tools::{LoadedBooths, load_booths, load_exhibit, parse_canvas_size, parse_category};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "boothmap", about = "Exhibition booth map tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the aggregated booth list as JSON.
    Booths {
        #[command(flatten)]
        source: SourceArgs,
        /// Only booths of this category letter.
        #[arg(long, value_parser = parse_category)]
        category: Option<char>,
        /// Print at most this many booths.
        #[arg(long)]
        limit: Option<usize>,
        /// Print booth counts per category instead of the list.
        #[arg(long)]
        summary: bool,
    },
    /// Print the booth under canvas point X Y, or null.
    #[command(allow_negative_numbers = true)]
    Pick {
        x: f64,
        y: f64,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = floorplan::DEFAULT_HIT_RADIUS)]
        radius: f64,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    #[arg(long, default_value = "public/booth-positions.json")]
    positions: PathBuf,
    /// Canvas size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_canvas_size, default_value = "600x500")]
    canvas: CanvasSize,
    /// JSON file with category and description tables.
    #[arg(long)]
    tables: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Booths {
            source,
            category,
            limit,
            summary,
        } => {
            let loaded = load(&source)?;
            let query = BoothQuery { category, limit };
            let booths: Vec<&Booth> = query_booths(&loaded.aggregation.booths, &query);
            if summary {
                let owned: Vec<Booth> = booths.into_iter().cloned().collect();
                return print_json(&count_by_category(&owned));
            }
            print_json(&booths)
        }
        Command::Pick {
            x,
            y,
            source,
            radius,
        } => {
            if !x.is_finite() || !y.is_finite() {
                return Err(format!("pick point must be finite, got ({x}, {y})"));
            }
            let loaded = load(&source)?;
            let hit = pick_booth(&loaded.aggregation.booths, Vec2::new(x, y), PickOptions { radius });
            print_json(&hit)
        }
    }
}

fn load(source: &SourceArgs) -> Result<LoadedBooths, String> {
    let exhibit = load_exhibit(source.tables.as_deref())?;
    let loaded = load_booths(&source.positions, &exhibit, source.canvas);

    if let PositionsOrigin::Fallback { reason } = &loaded.positions.origin {
        warn!(path = %source.positions.display(), %reason, "using built-in booth layout");
    }
    for skipped in &loaded.aggregation.skipped_points {
        warn!(
            code = %skipped.code,
            annotation = skipped.annotation,
            list = ?skipped.list,
            point = skipped.point,
            "skipping point: {}",
            skipped.error
        );
    }
    for skipped in &loaded.aggregation.skipped_annotations {
        debug!(annotation = skipped.annotation, reason = ?skipped.reason, "skipping annotation");
    }
    Ok(loaded)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("encode json: {e}"))?;
    println!("{text}");
    Ok(())
}
