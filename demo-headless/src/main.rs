mod profile;

use cirrus_core::{CellState, ClassificationRun, Grid, RunState};
use clap::Parser;
use profile::CurtainProfile;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Cirrus classification demo over a synthetic curtain
#[derive(Parser, Debug)]
#[command(name = "cirrus-demo")]
#[command(about = "Anvil / in-situ cirrus classification demo", long_about = None)]
struct Args {
    /// Curtain width in columns (along track)
    #[arg(long, default_value_t = 80)]
    width: usize,

    /// Curtain height in rows (altitude)
    #[arg(long, default_value_t = 40)]
    height: usize,

    /// Number of convective columns
    #[arg(short, long, default_value_t = 3)]
    cores: usize,

    /// RNG seed for the synthetic curtain
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Maximum iterations listed in the progress table
    #[arg(long, default_value_t = 20)]
    max_report_rows: usize,

    /// Write the classified grid as JSON to this path
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Only log warnings and skip the curtain rendering
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    println!("=== Cirrus Classification Demo ===\n");

    let profile = CurtainProfile {
        cores: args.cores,
        ..CurtainProfile::default()
    };
    let (width, height) = (args.width, args.height);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let initializer = move || profile.generate(width, height, &mut rng);

    let mut run = ClassificationRun::new(Box::new(initializer))?;
    info!("Seed {}, {} convective columns", args.seed, args.cores);

    let initial = run.stats();
    println!(
        "Curtain {}x{}: {} core, {} unclassified ice, {} clear\n",
        width, height, initial.convection_core, initial.unclassified_ice, initial.clear
    );

    println!("Iter | New anvil | Anvil | Unclassified | In-situ");
    println!("-----|-----------|-------|--------------|--------");

    run.start()?;
    while run.state() == RunState::Running {
        let outcome = run.step()?;
        if outcome.iteration <= args.max_report_rows {
            let stats = run.stats();
            let new_anvil = if outcome.changed {
                run.last_transitions().len()
            } else {
                0
            };
            println!(
                "{:4} | {:9} | {:5} | {:12} | {:7}",
                outcome.iteration, new_anvil, stats.anvil, stats.unclassified_ice, stats.in_situ
            );
        }
    }

    let stats = run.stats();
    println!("\n=== Classification Complete ===");
    println!("Iterations: {}", run.iteration());
    println!("{stats}");
    println!(
        "Anvil share of classified cirrus: {:.1}%",
        stats.anvil_fraction() * 100.0
    );
    println!(
        "Warm ice left unclassified: {:.1}% of curtain",
        stats.fraction(CellState::UnclassifiedIce) * 100.0
    );

    if !args.quiet {
        println!("\n{}", render(run.grid()));
        println!("Legend: # core  A anvil  i in-situ  ~ unclassified  . clear");
    }

    if let Some(path) = &args.dump {
        std::fs::write(path, serde_json::to_string_pretty(run.grid())?)?;
        info!("Wrote classified grid to {}", path.display());
    }

    Ok(())
}

/// One character per cell, top row first
fn render(grid: &Grid) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for row in grid.cells().chunks(grid.width()) {
        out.extend(row.iter().map(|cell| match cell.state() {
            CellState::Clear => '.',
            CellState::ConvectionCore => '#',
            CellState::UnclassifiedIce => '~',
            CellState::Anvil => 'A',
            CellState::InSitu => 'i',
        }));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_core::{Celsius, IceWaterContent};

    #[test]
    fn test_render_rows() {
        let grid = Grid::from_fn(3, 2, |p| {
            let state = if p == cirrus_core::Position::new(0, 1) {
                CellState::ConvectionCore
            } else {
                CellState::Clear
            };
            (state, Celsius::new(-50.0), IceWaterContent::new(10.0))
        })
        .unwrap();

        assert_eq!(render(&grid), "...\n#..\n");
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["cirrus-demo"]);
        assert_eq!((args.width, args.height), (80, 40));
        assert!(args.dump.is_none());
        assert!(!args.quiet);
    }
}
