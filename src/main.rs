//! Trackside headless runner
//!
//! Feeds a recorded input script into the simulation, logs the pose as it
//! goes and prints a JSON summary when the run ends.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use trackside::consts::MAX_SUBSTEPS;
use trackside::sim::{ControlInput, SimPhase, SimulationState, TrackGeometry, step};
use trackside::{InputScript, SimConfig};

#[derive(Parser, Debug)]
#[command(name = "trackside", about = "Drive a car along a 2D track until it leaves the road")]
struct Args {
    /// Vehicle/screen config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Track description (JSON); the built-in track when omitted
    #[arg(long)]
    track: Option<PathBuf>,

    /// Input script (JSON); the car idles when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 600)]
    max_ticks: u64,

    /// Pace ticks at the configured tick rate
    #[arg(long)]
    realtime: bool,

    /// Log the pose every N ticks (0 = never)
    #[arg(long, default_value_t = 60)]
    trace_every: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    /// Script ran out or the tick limit was hit
    Finished,
    Terminated(trackside::sim::Collision),
}

#[derive(Debug, Serialize)]
struct RunSummary {
    ticks: u64,
    position: Vec2,
    heading: f32,
    speed: f32,
    outcome: Outcome,
}

/// Drives the simulation from a stream of inputs
struct Runner<I> {
    state: SimulationState,
    inputs: I,
    max_ticks: u64,
    trace_every: u64,
}

impl<I: Iterator<Item = ControlInput>> Runner<I> {
    /// Run one tick; false once the run is over
    fn advance(&mut self) -> bool {
        if self.state.tick >= self.max_ticks {
            return false;
        }
        let Some(input) = self.inputs.next() else {
            return false;
        };

        let verdict = step(&mut self.state, input);
        let v = &self.state.vehicle;
        if self.trace_every > 0 && self.state.tick % self.trace_every == 0 {
            log::info!(
                "tick {:>5} pos ({:7.2}, {:7.2}) heading {:6.2} speed {:5.2}",
                self.state.tick,
                v.pos.x,
                v.pos.y,
                v.heading,
                v.speed
            );
        }
        match verdict.collision() {
            Some(collision) => {
                log::warn!("Run ended at tick {}: {:?}", self.state.tick, collision);
                false
            }
            None => true,
        }
    }

    /// As fast as possible
    fn run(&mut self) {
        while self.advance() {}
    }

    /// Fixed-step accumulator paced by sleeping between frames
    fn run_realtime(&mut self, dt: f32) {
        let frame = Duration::from_secs_f32(dt);
        let mut accumulator = 0.0f32;
        let mut last = Instant::now();

        'frames: loop {
            let now = Instant::now();
            accumulator += now.duration_since(last).as_secs_f32().min(0.1);
            last = now;

            let mut substeps = 0;
            while accumulator >= dt && substeps < MAX_SUBSTEPS {
                if !self.advance() {
                    break 'frames;
                }
                accumulator -= dt;
                substeps += 1;
            }

            let elapsed = now.elapsed();
            if elapsed < frame {
                std::thread::sleep(frame - elapsed);
            }
        }
    }

    fn summary(&self) -> RunSummary {
        let v = &self.state.vehicle;
        RunSummary {
            ticks: self.state.tick,
            position: v.pos,
            heading: v.heading,
            speed: v.speed,
            outcome: match self.state.phase {
                SimPhase::Running => Outcome::Finished,
                SimPhase::Terminated(c) => Outcome::Terminated(c),
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    let track = match &args.track {
        Some(path) => TrackGeometry::load(path)
            .with_context(|| format!("loading track {}", path.display()))?,
        None => TrackGeometry::standard(),
    };
    let script = match &args.script {
        Some(path) => Some(
            InputScript::load(path)
                .with_context(|| format!("loading script {}", path.display()))?,
        ),
        None => None,
    };

    let state = SimulationState::new(&config, Arc::new(track));
    let inputs: Box<dyn Iterator<Item = ControlInput> + '_> = match &script {
        Some(script) => Box::new(script.inputs()),
        None => Box::new(std::iter::repeat(ControlInput::IDLE)),
    };

    log::info!(
        "Starting at ({}, {}), {} ticks max{}",
        config.start_pos.x,
        config.start_pos.y,
        args.max_ticks,
        if args.realtime { ", real time" } else { "" }
    );

    let mut runner = Runner {
        state,
        inputs,
        max_ticks: args.max_ticks,
        trace_every: args.trace_every,
    };
    if args.realtime {
        runner.run_realtime(config.tick_dt());
    } else {
        runner.run();
    }

    let summary = runner.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
