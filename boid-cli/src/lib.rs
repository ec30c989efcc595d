use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use boid_engine::{
    merge_settings, Boundary, InitialVelocity, RuleConfig, Vector2D, World, WorldBuilder,
};
use boid_shared::RuleSettings;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Velocity every boid starts with under `--fixed-velocity`
const FIXED_START_VELOCITY: Vector2D = Vector2D { x: 1.0, y: 2.0 };

/// Goal relocation interval of the clamping rule set
const DEFAULT_RETARGET_EVERY: u64 = 200;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Headless threaded boid simulation", long_about = None)]
pub struct Args {
    /// World width
    #[arg(long, default_value_t = 640.0)]
    pub width: f64,

    /// World height
    #[arg(long, default_value_t = 480.0)]
    pub height: f64,

    /// Number of boids (one worker thread each)
    #[arg(short = 'n', long, default_value_t = 700)]
    pub boids: usize,

    /// Ticks to run, 0 runs until the process is killed
    #[arg(short, long, default_value_t = 1000)]
    pub ticks: u64,

    /// Seed for initial placement and goal moves
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file with rule settings; missing fields keep the preset's values
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Use the averaging rule set instead of velocity clamping
    #[arg(long)]
    pub averaging: bool,

    /// Start every boid with velocity (1, 2) instead of near zero
    #[arg(long)]
    pub fixed_velocity: bool,

    /// Let boids leave the world instead of wrapping around
    #[arg(long)]
    pub unbounded: bool,

    /// Move the goal to a random point every N ticks, 0 disables the goal.
    /// Defaults to 200, or 0 under --averaging
    #[arg(long)]
    pub retarget_every: Option<u64>,

    /// Tick rate limit, 0 runs as fast as possible
    #[arg(long, default_value_t = 0)]
    pub tps: u32,

    /// Write frames as JSON lines to this file ('-' for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only write every Nth frame
    #[arg(long, default_value_t = 1)]
    pub frame_every: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Goal relocation interval; the averaging rule set runs without a goal
    /// unless one is asked for.
    pub fn retarget_interval(&self) -> u64 {
        match self.retarget_every {
            Some(every) => every,
            None if self.averaging => 0,
            None => DEFAULT_RETARGET_EVERY,
        }
    }
}

/// What a finished run did
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames_written: u64,
    pub goal_moves: u64,
}

/// Rule config from the preset flag plus the optional settings file.
pub fn load_rules(args: &Args) -> Result<RuleConfig> {
    let mut rules = if args.averaging {
        RuleConfig::averaging()
    } else {
        RuleConfig::default()
    };

    if let Some(path) = &args.settings {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings: RuleSettings = serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        merge_settings(&mut rules, &settings);
        log::info!("Loaded rule settings from {}", path.display());
    }

    Ok(rules)
}

pub fn build_world(args: &Args) -> Result<World> {
    let mut builder = WorldBuilder::new(args.width, args.height, args.boids)
        .rules(load_rules(args)?)
        .boundary(if args.unbounded {
            Boundary::Unbounded
        } else {
            Boundary::Toroidal
        });

    if args.fixed_velocity {
        builder = builder.initial_velocity(InitialVelocity::Fixed(FIXED_START_VELOCITY));
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    builder.build().context("Failed to start simulation")
}

/// Drives the world for `args.ticks` ticks, writing frames to `sink`.
pub fn run<W: Write + ?Sized>(args: &Args, mut sink: Option<&mut W>) -> Result<RunSummary> {
    let mut world = build_world(args)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let tick_interval = (args.tps > 0).then(|| Duration::from_secs_f64(1.0 / args.tps as f64));
    let frame_every = args.frame_every.max(1);
    let retarget_every = args.retarget_interval();

    let mut summary = RunSummary {
        ticks: 0,
        frames_written: 0,
        goal_moves: 0,
    };
    let mut ticks_since_report = 0u64;
    let mut last_report = Instant::now();

    log::info!(
        "Running {} boids on {}x{} for {} ticks",
        args.boids,
        args.width,
        args.height,
        if args.ticks == 0 {
            "unlimited".to_string()
        } else {
            args.ticks.to_string()
        }
    );

    while args.ticks == 0 || summary.ticks < args.ticks {
        let started = Instant::now();

        if retarget_every > 0 && summary.ticks % retarget_every == 0 {
            let goal = world.relocate_goal(&mut rng);
            summary.goal_moves += 1;
            log::debug!("Goal moved to ({:.1}, {:.1})", goal.x, goal.y);
        }

        let frame = world.advance().context("Simulation tick failed")?;
        summary.ticks += 1;

        if let Some(out) = sink.as_deref_mut() {
            if frame.tick() % frame_every == 0 {
                let line = frame.to_snapshot().to_json()?;
                writeln!(out, "{}", line).context("Failed to write frame")?;
                summary.frames_written += 1;
            }
        }

        ticks_since_report += 1;
        if last_report.elapsed().as_secs() >= 1 {
            let tps = ticks_since_report as f64 / last_report.elapsed().as_secs_f64();
            log::info!("tick {} ({:.1} ticks/s)", summary.ticks, tps);
            ticks_since_report = 0;
            last_report = Instant::now();
        }

        if let Some(interval) = tick_interval {
            if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
    }

    if let Some(out) = sink {
        out.flush().context("Failed to flush frames")?;
    }

    world.shutdown();
    Ok(summary)
}
