use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use boid_cli::{run, Args};
use clap::Parser;

fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Boid simulation starting...");

    let mut output = args.output.as_deref().map(open_output).transpose()?;
    let summary = run(&args, output.as_deref_mut()).context("Simulation error")?;

    log::info!(
        "Finished {} ticks, wrote {} frames, moved goal {} times",
        summary.ticks,
        summary.frames_written,
        summary.goal_moves
    );

    Ok(())
}
