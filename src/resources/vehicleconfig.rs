//! Vehicle configuration resource.
//!
//! Holds the initial engine state, movement tuning, simulation step settings
//! and the sound binding, loaded from an INI file. Missing keys keep their
//! defaults; unknown sound slots and unparseable values are errors.
//!
//! # Configuration File Format
//!
//! ```ini
//! [vehicle]
//! initial_gear = neutral
//! engine_running = false
//! speed_scale = 1.0
//! yaw_rate = 45.0
//!
//! [simulation]
//! step_seconds = 0.016666
//! max_frames = 600
//!
//! [sounds]
//! neutral = assets/audio/engine_idle.ogg
//! first = assets/audio/engine_gear1.ogg
//! reverse = assets/audio/engine_reverse.ogg
//! start = assets/audio/engine_start.wav
//! stop = assets/audio/engine_stop.wav
//! ```
//!
//! Sound values are asset paths and double as cue ids. An empty value silences
//! the slot.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::drivetuning::DriveTuning;
use crate::components::enginestate::EngineStateMachine;
use crate::components::gear::Gear;
use crate::components::soundbinding::SoundBinding;
use crate::error::ConfigError;

/// Default safe values for startup
const DEFAULT_SPEED_SCALE: f32 = 1.0;
const DEFAULT_YAW_RATE: f32 = 45.0;
const DEFAULT_STEP_SECONDS: f32 = 1.0 / 60.0;
const DEFAULT_MAX_FRAMES: u32 = 600;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

const VEHICLE: &str = "vehicle";
const SIMULATION: &str = "simulation";
const SOUNDS: &str = "sounds";

/// Vehicle configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct VehicleConfig {
    /// Gear selected at spawn.
    pub initial_gear: Gear,
    /// Whether the engine is already running at spawn.
    pub engine_running: bool,
    /// Multiplier applied to gear speed units.
    pub speed_scale: f32,
    /// Degrees per second at full steering.
    pub yaw_rate: f32,
    /// Fixed simulation step in seconds.
    pub step_seconds: f32,
    /// Upper bound on frames for a headless run.
    pub max_frames: u32,
    /// Loop and one-shot cues.
    pub sounds: SoundBinding,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            initial_gear: Gear::Neutral,
            engine_running: false,
            speed_scale: DEFAULT_SPEED_SCALE,
            yaw_rate: DEFAULT_YAW_RATE,
            step_seconds: DEFAULT_STEP_SECONDS,
            max_frames: DEFAULT_MAX_FRAMES,
            sounds: default_sounds(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file at `config_path`.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(ConfigError::Load)?;
        self.apply(&config)?;
        info!(
            "Loaded config from {}: gear={}, running={}, step={}s, {} sound slots",
            self.config_path.display(),
            self.initial_gear,
            self.engine_running,
            self.step_seconds,
            self.sounds.slots().count()
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(ConfigError::Load)?;
        self.apply(&config)
    }

    /// Save configuration to the INI file. Creates the file if needed.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        self.to_ini()
            .write(&self.config_path)
            .map_err(|e| ConfigError::Load(format!("failed to write config file: {}", e)))?;
        info!("Saved config to {}", self.config_path.display());
        Ok(())
    }

    /// Render the configuration as INI text.
    pub fn to_ini_string(&self) -> String {
        self.to_ini().writes()
    }

    pub fn drive_tuning(&self) -> DriveTuning {
        DriveTuning {
            speed_scale: self.speed_scale,
            yaw_rate: self.yaw_rate,
        }
    }

    /// Build the vehicle's engine from the initial state and sound binding.
    pub fn build_engine(&self) -> Result<EngineStateMachine, ConfigError> {
        EngineStateMachine::create(self.initial_gear, self.engine_running, self.sounds.clone())
    }

    fn to_ini(&self) -> Ini {
        let mut config = Ini::new();

        // [vehicle] section
        config.set(VEHICLE, "initial_gear", Some(self.initial_gear.to_string()));
        config.set(VEHICLE, "engine_running", Some(self.engine_running.to_string()));
        config.set(VEHICLE, "speed_scale", Some(self.speed_scale.to_string()));
        config.set(VEHICLE, "yaw_rate", Some(self.yaw_rate.to_string()));

        // [simulation] section
        config.set(SIMULATION, "step_seconds", Some(self.step_seconds.to_string()));
        config.set(SIMULATION, "max_frames", Some(self.max_frames.to_string()));

        // [sounds] section; empty slots are written blank so they stay silent on reload
        for (slot, cue) in self.sounds.all_slots() {
            config.set(SOUNDS, slot, Some(cue.unwrap_or_default().to_string()));
        }
        config
    }

    fn apply(&mut self, config: &Ini) -> Result<(), ConfigError> {
        // [vehicle] section
        if let Some(gear) = config.get(VEHICLE, "initial_gear") {
            self.initial_gear = gear
                .parse()
                .map_err(|_| invalid(config, VEHICLE, "initial_gear"))?;
        }
        if let Some(running) = config
            .getbool(VEHICLE, "engine_running")
            .map_err(|_| invalid(config, VEHICLE, "engine_running"))?
        {
            self.engine_running = running;
        }
        if let Some(scale) = get_f32(config, VEHICLE, "speed_scale")? {
            self.speed_scale = scale;
        }
        if let Some(rate) = get_f32(config, VEHICLE, "yaw_rate")? {
            self.yaw_rate = rate;
        }

        // [simulation] section
        if let Some(step) = get_f32(config, SIMULATION, "step_seconds")? {
            if step <= 0.0 {
                return Err(invalid(config, SIMULATION, "step_seconds"));
            }
            self.step_seconds = step;
        }
        if let Some(frames) = config
            .getuint(SIMULATION, "max_frames")
            .map_err(|_| invalid(config, SIMULATION, "max_frames"))?
        {
            self.max_frames =
                u32::try_from(frames).map_err(|_| invalid(config, SIMULATION, "max_frames"))?;
        }

        // [sounds] section
        if let Some(slots) = config.get_map_ref().get(SOUNDS) {
            let mut sounds = self.sounds.clone();
            for (slot, value) in slots {
                let cue = value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string);
                sounds.set_slot(slot, cue)?;
            }
            sounds.validate()?;
            self.sounds = sounds;
        }

        Ok(())
    }
}

fn default_sounds() -> SoundBinding {
    SoundBinding::new()
        .with_loop(Gear::Neutral, "assets/audio/engine_idle.ogg")
        .with_loop(Gear::First, "assets/audio/engine_gear1.ogg")
        .with_loop(Gear::Second, "assets/audio/engine_gear2.ogg")
        .with_loop(Gear::Third, "assets/audio/engine_gear3.ogg")
        .with_loop(Gear::Fourth, "assets/audio/engine_gear4.ogg")
        .with_loop(Gear::Reverse, "assets/audio/engine_reverse.ogg")
        .with_start("assets/audio/engine_start.wav")
        .with_stop("assets/audio/engine_stop.wav")
}

fn get_f32(config: &Ini, section: &str, key: &str) -> Result<Option<f32>, ConfigError> {
    let value = config
        .getfloat(section, key)
        .map_err(|_| invalid(config, section, key))?;
    match value {
        Some(v) if !v.is_finite() => Err(invalid(config, section, key)),
        Some(v) => Ok(Some(v as f32)),
        None => Ok(None),
    }
}

fn invalid(config: &Ini, section: &str, key: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: config.get(section, key).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = VehicleConfig::new();
        assert_eq!(c.initial_gear, Gear::Neutral);
        assert!(!c.engine_running);
        assert_eq!(c.max_frames, DEFAULT_MAX_FRAMES);
        assert_eq!(c.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(c.sounds.validate().is_ok());
        assert!(c.sounds.loop_for(Gear::Neutral).is_some());
    }

    #[test]
    fn test_load_overrides_values() {
        let mut c = VehicleConfig::new();
        c.load_from_str(
            "[vehicle]\ninitial_gear = 2\nengine_running = true\nspeed_scale = 2.5\n\
             [simulation]\nstep_seconds = 0.1\nmax_frames = 30\n",
        )
        .unwrap();
        assert_eq!(c.initial_gear, Gear::Second);
        assert!(c.engine_running);
        assert_eq!(c.speed_scale, 2.5);
        assert_eq!(c.yaw_rate, DEFAULT_YAW_RATE);
        assert!((c.step_seconds - 0.1).abs() < 1e-6);
        assert_eq!(c.max_frames, 30);
    }

    #[test]
    fn test_sounds_section_overrides_and_silences_slots() {
        let mut c = VehicleConfig::new();
        c.load_from_str("[sounds]\nneutral = idle.ogg\nreverse =\nstop = off.wav\n")
            .unwrap();
        assert_eq!(c.sounds.loop_for(Gear::Neutral), Some("idle.ogg"));
        assert_eq!(c.sounds.loop_for(Gear::Reverse), None);
        assert_eq!(c.sounds.stop_cue(), Some("off.wav"));
        // untouched slots keep their defaults
        assert!(c.sounds.loop_for(Gear::First).is_some());
    }

    #[test]
    fn test_unknown_sound_slot_is_error() {
        let mut c = VehicleConfig::new();
        let err = c.load_from_str("[sounds]\nfifth = x.ogg\n").unwrap_err();
        assert_eq!(err, ConfigError::UnknownSoundSlot("fifth".into()));
    }

    #[test]
    fn test_invalid_gear_is_error() {
        let mut c = VehicleConfig::new();
        let err = c
            .load_from_str("[vehicle]\ninitial_gear = overdrive\n")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                section: "vehicle".into(),
                key: "initial_gear".into(),
                value: "overdrive".into(),
            }
        );
    }

    #[test]
    fn test_non_positive_step_is_error() {
        let mut c = VehicleConfig::new();
        assert!(matches!(
            c.load_from_str("[simulation]\nstep_seconds = 0\n"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let mut c = VehicleConfig::with_path("./definitely/not/here.ini");
        assert!(matches!(c.load_from_file(), Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_ini_text_reloads_to_same_values() {
        let mut original = VehicleConfig::new();
        original.initial_gear = Gear::Reverse;
        original.yaw_rate = 90.0;
        original.sounds = SoundBinding::new()
            .with_loop(Gear::Neutral, "idle.ogg")
            .with_start("start.wav");

        let mut reloaded = VehicleConfig::new();
        reloaded.load_from_str(&original.to_ini_string()).unwrap();
        assert_eq!(reloaded.initial_gear, Gear::Reverse);
        assert_eq!(reloaded.yaw_rate, 90.0);
        assert_eq!(reloaded.sounds, original.sounds);
    }

    #[test]
    fn test_silenced_slot_survives_save_and_reload() {
        let path = std::env::temp_dir().join(format!(
            "gearsound_silenced_slot_{}.ini",
            std::process::id()
        ));
        let mut saved = VehicleConfig::with_path(&path);
        saved.load_from_str("[sounds]\nreverse =\n").unwrap();
        assert_eq!(saved.sounds.loop_for(Gear::Reverse), None);
        saved.save_to_file().unwrap();

        let mut reloaded = VehicleConfig::with_path(&path);
        let result = reloaded.load_from_file();
        let _ = std::fs::remove_file(&path);
        result.unwrap();

        assert_eq!(reloaded.sounds.loop_for(Gear::Reverse), None);
        assert_eq!(reloaded.sounds, saved.sounds);
    }

    #[test]
    fn test_build_engine_uses_initial_state() {
        let mut c = VehicleConfig::new();
        c.initial_gear = Gear::Third;
        let engine = c.build_engine().unwrap();
        assert_eq!(engine.current_gear(), Gear::Third);
        assert!(!engine.is_running());
    }
}
