//! gearsound main entry point.
//!
//! Drives a single vehicle through a scripted scenario at a fixed step:
//! - **bevy_ecs** hosts the vehicle components and per-step systems
//! - **raylib** (feature `audio`) plays the engine cues on a background thread
//! - the engine state machine decides which cue plays when
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults if missing) and the scenario script
//! 2. Set up the ECS world, audio queues (and device unless `--mute`)
//! 3. Spawn the vehicle, register observers, build the schedule
//! 4. Step until the scenario ends or `max_frames` is reached
//! 5. Flush remaining audio commands and shut the audio thread down
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --scenario drive.json --mute
//! ```

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

use gearsound::components::enginestate::EngineStateMachine;
use gearsound::components::vehicletransform::VehicleTransform;
use gearsound::error::ConfigError;
use gearsound::game::{build_schedule, register_observers, spawn_vehicle};
use gearsound::resources::audio::{init_audio_messages, shutdown_audio};
use gearsound::resources::scenario::{Scenario, ScenarioPlayer};
use gearsound::resources::vehicleconfig::VehicleConfig;
use gearsound::resources::worldtime::WorldTime;
use gearsound::systems::time::update_world_time;

/// Frames run after the scenario ends so queued cues reach the device.
const DRAIN_FRAMES: u32 = 3;

/// Vehicle engine sound simulator
#[derive(Parser)]
#[command(version, about = "Drive a vehicle engine/gear state machine through a scripted scenario.")]
struct Cli {
    /// Vehicle configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON scenario script. Defaults to a built-in demo drive.
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,

    /// Do not open the audio device; log cues instead.
    #[arg(long)]
    mute: bool,

    /// Sleep one step between frames (real-time playback).
    #[arg(long)]
    realtime: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = VehicleConfig::with_path(cli.config.clone());
    if let Err(e) = config.load_from_file() {
        match e {
            ConfigError::Load(reason) => {
                warn!("Config not loaded ({}), using defaults", reason)
            }
            other => {
                error!("Invalid config {}: {}", cli.config.display(), other);
                std::process::exit(1);
            }
        }
    }

    let scenario = match &cli.scenario {
        Some(path) => match Scenario::load(path) {
            Ok(scenario) => scenario,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Scenario::demo(),
    };

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    start_audio(&mut world, cli.mute);
    world.insert_resource(ScenarioPlayer::new(scenario));
    register_observers(&mut world);

    let vehicle = match spawn_vehicle(&mut world, &config) {
        Ok(entity) => entity,
        Err(e) => {
            error!("Cannot spawn vehicle: {}", e);
            shutdown_audio(&mut world);
            std::process::exit(1);
        }
    };
    world.insert_resource(config.clone());

    let mut update = build_schedule();
    if let Err(e) = update.initialize(&mut world) {
        error!("Failed to initialize schedule: {}", e);
        shutdown_audio(&mut world);
        std::process::exit(1);
    }

    // --------------- Main loop ---------------
    let step = config.step_seconds;
    let mut drain = DRAIN_FRAMES;
    for _ in 0..config.max_frames {
        update_world_time(&mut world, step);
        update.run(&mut world);
        world.clear_trackers();

        if world.resource::<ScenarioPlayer>().is_finished() {
            if drain == 0 {
                break;
            }
            drain -= 1;
        }
        if cli.realtime {
            std::thread::sleep(std::time::Duration::from_secs_f32(step));
        }
    }

    if let (Some(engine), Some(transform)) = (
        world.get::<EngineStateMachine>(vehicle),
        world.get::<VehicleTransform>(vehicle),
    ) {
        info!(
            "After {} frames ({:.2}s): engine {:?} in gear {}, at ({:.2}, {:.2}) heading {:.1} deg",
            world.resource::<WorldTime>().frame_count,
            world.resource::<WorldTime>().elapsed,
            engine.state(),
            engine.current_gear(),
            transform.x,
            transform.z,
            transform.yaw_degrees
        );
    }

    shutdown_audio(&mut world);
}

#[cfg(feature = "audio")]
fn start_audio(world: &mut World, mute: bool) {
    if mute {
        init_audio_messages(world);
    } else {
        gearsound::resources::audio::setup_audio(world);
    }
}

#[cfg(not(feature = "audio"))]
fn start_audio(world: &mut World, mute: bool) {
    if !mute {
        info!("Built without the audio feature, cues are logged only");
    }
    init_audio_messages(world);
}
