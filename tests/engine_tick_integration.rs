//! Engine tick integration tests: scenario input, engine systems, audio
//! commands, feedback and movement running together in one schedule.

use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;

use gearsound::components::enginestate::{EngineState, EngineStateMachine};
use gearsound::components::enginevoice::EngineVoice;
use gearsound::components::gear::Gear;
use gearsound::components::soundbinding::SoundBinding;
use gearsound::components::vehiclecontrols::VehicleControls;
use gearsound::components::vehicletransform::VehicleTransform;
use gearsound::events::audio::{AudioCmd, AudioMessage};
use gearsound::events::engine::{
    CueFinishedEvent, EngineStartRejectedEvent, EngineStateChangedEvent,
};
use gearsound::game::{build_schedule, register_observers, spawn_vehicle};
use gearsound::resources::audio::init_audio_messages;
use gearsound::resources::scenario::{Scenario, ScenarioAction, ScenarioPlayer};
use gearsound::resources::vehicleconfig::VehicleConfig;
use gearsound::resources::worldtime::WorldTime;
use gearsound::systems::time::update_world_time;

const STEP: f32 = 0.1;
const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn binding() -> SoundBinding {
    SoundBinding::new()
        .with_loop(Gear::Neutral, "idle.ogg")
        .with_loop(Gear::First, "gear1.ogg")
        .with_loop(Gear::Second, "gear2.ogg")
        .with_loop(Gear::Reverse, "reverse.ogg")
        .with_start("start.wav")
        .with_stop("stop.wav")
}

fn config(gear: Gear, running: bool) -> VehicleConfig {
    let mut config = VehicleConfig::new();
    config.initial_gear = gear;
    config.engine_running = running;
    config.sounds = binding();
    config
}

/// World with one vehicle, the full schedule and a reader that collects every
/// [`AudioCmd`] written so far.
struct Sim {
    world: World,
    schedule: Schedule,
    cmds: SystemState<MessageReader<'static, 'static, AudioCmd>>,
    heard: Vec<AudioCmd>,
    vehicle: Entity,
}

impl Sim {
    fn new(config: &VehicleConfig, steps: Vec<ScenarioAction>) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        init_audio_messages(&mut world);
        world.insert_resource(ScenarioPlayer::new(Scenario { steps }));
        register_observers(&mut world);
        let cmds = SystemState::new(&mut world);
        let vehicle = spawn_vehicle(&mut world, config).unwrap();
        Sim {
            world,
            schedule: build_schedule(),
            cmds,
            heard: Vec::new(),
            vehicle,
        }
    }

    fn step(&mut self) {
        update_world_time(&mut self.world, STEP);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
        // messages only live for two updates
        self.collect_cmds();
    }

    fn collect_cmds(&mut self) {
        let mut reader = self.cmds.get_mut(&mut self.world);
        self.heard.extend(reader.read().cloned());
    }

    fn run(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step();
        }
    }

    fn drain_cmds(&mut self) -> Vec<AudioCmd> {
        self.collect_cmds();
        std::mem::take(&mut self.heard)
    }

    /// Playback commands only, skipping asset loads.
    fn drain_playback(&mut self) -> Vec<AudioCmd> {
        self.drain_cmds()
            .into_iter()
            .filter(|c| {
                !matches!(
                    c,
                    AudioCmd::LoadLoop { .. } | AudioCmd::LoadOneShot { .. }
                )
            })
            .collect()
    }

    fn voice_id(&self) -> u64 {
        self.vehicle.to_bits()
    }

    fn engine(&self) -> &EngineStateMachine {
        self.world.get::<EngineStateMachine>(self.vehicle).unwrap()
    }

    fn transform(&self) -> VehicleTransform {
        *self.world.get::<VehicleTransform>(self.vehicle).unwrap()
    }

    fn send_feedback(&mut self, msg: AudioMessage) {
        self.world.resource_mut::<Messages<AudioMessage>>().write(msg);
    }
}

fn one_shot(voice: u64, id: &str) -> AudioCmd {
    AudioCmd::PlayOneShot {
        voice,
        id: id.to_string(),
    }
}

fn set_loop(voice: u64, id: &str) -> AudioCmd {
    AudioCmd::SetLoop {
        voice,
        id: id.to_string(),
    }
}

// ==================== SPAWN ====================

#[test]
fn spawn_queues_each_distinct_cue_load_once() {
    let mut config = config(Gear::Neutral, false);
    config.sounds = binding().with_loop(Gear::Third, "gear2.ogg");
    let mut sim = Sim::new(&config, vec![]);

    let cmds = sim.drain_cmds();
    let loops: Vec<_> = cmds
        .iter()
        .filter_map(|c| match c {
            AudioCmd::LoadLoop { id, path } => {
                assert_eq!(id, path);
                Some(id.as_str())
            }
            _ => None,
        })
        .collect();
    let shots = cmds
        .iter()
        .filter(|c| matches!(c, AudioCmd::LoadOneShot { .. }))
        .count();

    assert_eq!(loops.len(), 4);
    assert_eq!(loops.iter().filter(|id| **id == "gear2.ogg").count(), 1);
    assert_eq!(shots, 2);
}

#[test]
fn spawn_rejects_blank_cue() {
    let mut world = World::new();
    init_audio_messages(&mut world);
    let mut config = config(Gear::Neutral, false);
    config.sounds = binding().with_stop("");
    assert!(spawn_vehicle(&mut world, &config).is_err());
}

// ==================== SCENARIOS ====================

#[test]
fn scenario_drive_emits_cues_in_order() {
    let steps = vec![
        ScenarioAction::Gear { gear: Gear::Neutral },
        ScenarioAction::Engine { on: true },
        ScenarioAction::Gear { gear: Gear::First },
        ScenarioAction::Gear { gear: Gear::Second },
        ScenarioAction::Engine { on: false },
    ];
    let mut sim = Sim::new(&config(Gear::Neutral, false), steps);
    let v = sim.voice_id();
    sim.drain_cmds();

    sim.run(6);

    assert_eq!(
        sim.drain_playback(),
        vec![
            one_shot(v, "start.wav"),
            set_loop(v, "idle.ogg"),
            set_loop(v, "gear1.ogg"),
            set_loop(v, "gear2.ogg"),
            AudioCmd::StopLoop { voice: v },
            one_shot(v, "stop.wav"),
        ]
    );
    assert!(!sim.engine().is_running());
    assert!(sim.world.resource::<ScenarioPlayer>().is_finished());
}

#[test]
fn scenario_start_in_gear_is_rejected_and_reverted() {
    let rejected = Arc::new(Mutex::new(Vec::new()));
    let sink = rejected.clone();

    let steps = vec![
        ScenarioAction::Gear { gear: Gear::First },
        ScenarioAction::Engine { on: true },
    ];
    let mut sim = Sim::new(&config(Gear::Neutral, false), steps);
    sim.world
        .add_observer(move |trigger: On<EngineStartRejectedEvent>| {
            sink.lock().unwrap().push(trigger.event().gear);
        });
    sim.world.flush();
    sim.drain_cmds();

    sim.run(3);

    assert!(sim.drain_playback().is_empty());
    assert!(!sim.engine().is_running());
    assert_eq!(*rejected.lock().unwrap(), vec![Gear::First]);
    let controls = sim.world.get::<VehicleControls>(sim.vehicle).unwrap();
    assert!(!controls.request.engine_on);
}

#[test]
fn state_change_events_follow_the_drive() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let steps = vec![
        ScenarioAction::Engine { on: true },
        ScenarioAction::Wait { frames: 2 },
        ScenarioAction::Gear { gear: Gear::First },
        ScenarioAction::Engine { on: false },
    ];
    let mut sim = Sim::new(&config(Gear::Neutral, false), steps);
    sim.world
        .add_observer(move |trigger: On<EngineStateChangedEvent>| {
            let e = trigger.event();
            sink.lock().unwrap().push((e.state, e.gear, e.shifted_from));
        });
    sim.world.flush();

    sim.run(8);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (EngineState::Running, Gear::Neutral, None),
            (EngineState::Running, Gear::First, Some(Gear::Neutral)),
            (EngineState::Stopped, Gear::First, None),
        ]
    );
}

#[test]
fn engine_created_running_syncs_loop_without_start_cue() {
    let mut sim = Sim::new(&config(Gear::First, true), vec![]);
    let v = sim.voice_id();
    sim.drain_cmds();

    sim.run(5);

    assert_eq!(sim.drain_playback(), vec![set_loop(v, "gear1.ogg")]);
    assert!(sim.engine().is_running());
}

// ==================== AUDIO FEEDBACK ====================

#[test]
fn loop_feedback_updates_voice() {
    let mut sim = Sim::new(
        &config(Gear::Neutral, false),
        vec![ScenarioAction::Engine { on: true }],
    );
    let v = sim.voice_id();
    sim.run(1);
    assert!(
        sim.world
            .get::<EngineVoice>(sim.vehicle)
            .unwrap()
            .is_loop_active("idle.ogg")
    );

    sim.send_feedback(AudioMessage::LoopStopped {
        voice: v,
        id: "idle.ogg".into(),
    });
    sim.run(1);

    let voice = sim.world.get::<EngineVoice>(sim.vehicle).unwrap();
    assert_eq!(voice.active.as_deref(), Some("idle.ogg"));
    assert!(!voice.playing);
}

#[test]
fn stale_loop_feedback_is_ignored() {
    let mut sim = Sim::new(&config(Gear::Neutral, true), vec![]);
    let v = sim.voice_id();
    sim.run(1);

    sim.send_feedback(AudioMessage::LoopStopped {
        voice: v,
        id: "gear1.ogg".into(),
    });
    sim.run(1);

    assert!(
        sim.world
            .get::<EngineVoice>(sim.vehicle)
            .unwrap()
            .is_loop_active("idle.ogg")
    );
}

#[test]
fn finished_one_shot_triggers_event() {
    let finished = Arc::new(Mutex::new(Vec::new()));
    let sink = finished.clone();

    let mut sim = Sim::new(&config(Gear::Neutral, false), vec![]);
    sim.world.add_observer(move |trigger: On<CueFinishedEvent>| {
        let e = trigger.event();
        sink.lock().unwrap().push((e.entity, e.cue.clone()));
    });
    sim.world.flush();
    let v = sim.voice_id();

    sim.send_feedback(AudioMessage::OneShotFinished {
        voice: v,
        id: "start.wav".into(),
    });
    sim.send_feedback(AudioMessage::OneShotFinished {
        voice: v.wrapping_add(1),
        id: "start.wav".into(),
    });
    sim.run(2);

    assert_eq!(
        *finished.lock().unwrap(),
        vec![(sim.vehicle, "start.wav".to_string())]
    );
}

// ==================== MOVEMENT ====================

#[test]
fn running_vehicle_moves_along_heading() {
    let mut sim = Sim::new(&config(Gear::First, true), vec![]);

    sim.run(10);

    let t = sim.transform();
    assert!(approx_eq(t.x, 0.0));
    assert!(approx_eq(t.z, 10.0 * STEP));
    assert!(approx_eq(sim.world.resource::<WorldTime>().elapsed, 10.0 * STEP));
}

#[test]
fn reverse_moves_backwards() {
    let mut sim = Sim::new(&config(Gear::Reverse, true), vec![]);

    sim.run(5);

    assert!(approx_eq(sim.transform().z, -5.0 * STEP));
}

#[test]
fn stopped_vehicle_does_not_move_or_turn() {
    let steps = vec![
        ScenarioAction::Gear { gear: Gear::Second },
        ScenarioAction::Steer { amount: 1.0 },
    ];
    let mut sim = Sim::new(&config(Gear::Neutral, false), steps);

    sim.run(10);

    assert_eq!(sim.transform(), VehicleTransform::default());
}

#[test]
fn neutral_turns_in_place() {
    let steps = vec![ScenarioAction::Steer { amount: 1.0 }];
    let mut config = config(Gear::Neutral, true);
    config.yaw_rate = 90.0;
    let mut sim = Sim::new(&config, steps);

    sim.run(2);

    let t = sim.transform();
    // the steer action lands in frame 1, before movement runs
    assert!(approx_eq(t.yaw_degrees, 2.0 * 90.0 * STEP));
    assert!(approx_eq(t.x, 0.0));
    assert!(approx_eq(t.z, 0.0));
}

#[test]
fn speed_scale_multiplies_gear_speed() {
    let mut config = config(Gear::Second, true);
    config.speed_scale = 3.0;
    let mut sim = Sim::new(&config, vec![]);

    sim.run(4);

    assert!(approx_eq(sim.transform().z, 2.0 * 3.0 * 4.0 * STEP));
}

// ==================== BUNDLED DEMO FILES ====================

#[test]
fn bundled_demo_drive_runs_to_completion() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
    let mut config = VehicleConfig::with_path(dir.join("config.ini"));
    config.load_from_file().unwrap();
    let scenario = Scenario::load(dir.join("drive.json")).unwrap();

    let mut sim = Sim::new(&config, scenario.steps);
    let v = sim.voice_id();
    sim.drain_cmds();
    for _ in 0..config.max_frames {
        sim.step();
        if sim.world.resource::<ScenarioPlayer>().is_finished() {
            break;
        }
    }

    let cmds = sim.drain_playback();
    assert!(sim.world.resource::<ScenarioPlayer>().is_finished());
    assert!(!sim.engine().is_running());
    assert_eq!(sim.engine().current_gear(), Gear::Reverse);
    // the first start attempt in first gear is refused silently
    assert_eq!(cmds.first(), Some(&one_shot(v, "assets/audio/engine_start.wav")));
    assert_eq!(
        cmds.last(),
        Some(&one_shot(v, "assets/audio/engine_stop.wav"))
    );
    let loops = cmds
        .iter()
        .filter(|c| matches!(c, AudioCmd::SetLoop { .. }))
        .count();
    // neutral, four upshifts, reverse
    assert_eq!(loops, 6);
}
