//! Engine/gear state machine with its audio-cue policy.
//!
//! [`EngineStateMachine`] owns a vehicle's engine state and selected gear,
//! validates every transition and decides which audio cue to trigger through a
//! [`SoundPlayer`]. It never blocks and never reads the clock; the host drives
//! it once per step.
//!
//! # Rules
//!
//! - The engine may only go `Stopped -> Running` while in [`Gear::Neutral`].
//!   Any other gear rejects the start with [`RejectedTransition`].
//! - Starting plays the `start` one-shot, then loops the neutral cue.
//! - Stopping halts the loop, then plays the `stop` one-shot.
//! - Shifting while running replaces the loop with the new gear's cue (or stops
//!   the loop when that gear has none). Shifting while stopped is silent.
//! - Setting a loop that is already active, playing and looping is a no-op
//!   ([`SoundPlayer::ensure_loop`]).
//!
//! # Driving it
//!
//! Hosts that already know when a discrete request happens call
//! [`request_engine_start`](EngineStateMachine::request_engine_start),
//! [`request_engine_stop`](EngineStateMachine::request_engine_stop) and
//! [`request_gear_change`](EngineStateMachine::request_gear_change) directly.
//! Polling hosts keep an [`EngineRequest`] (the toggle the user flips) and call
//! [`tick`](EngineStateMachine::tick) every step; edges are detected against the
//! machine's own state, which is always the previous step's result.
//!
//! ```ignore
//! let mut machine = EngineStateMachine::new(binding)?;
//! let mut request = EngineRequest::default();
//! request.engine_on = true;
//! let report = machine.tick(&mut request, &mut player);
//! assert_eq!(report.transition, Some(EngineState::Running));
//! ```

use bevy_ecs::prelude::Component;
use log::debug;

use crate::components::gear::Gear;
use crate::components::soundbinding::SoundBinding;
use crate::error::{ConfigError, RejectedTransition};
use crate::soundplayer::SoundPlayer;

/// Whether the engine is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    #[default]
    Stopped,
    Running,
}

/// Requested engine state, owned by whoever drives the vehicle.
///
/// [`EngineStateMachine::tick`] compares this against the machine and reverts
/// `engine_on` when a start is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineRequest {
    /// The "engine on" toggle.
    pub engine_on: bool,
    /// The selected gear.
    pub gear: Gear,
}

/// What a single [`EngineStateMachine::tick`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// `(from, to)` when the gear changed this step.
    pub shifted: Option<(Gear, Gear)>,
    /// New engine state when the engine started or stopped this step.
    pub transition: Option<EngineState>,
    /// Set when a start was requested outside of neutral.
    pub rejected: Option<RejectedTransition>,
}

impl TickReport {
    /// True when nothing changed and nothing was rejected.
    pub fn is_quiet(&self) -> bool {
        self.shifted.is_none() && self.transition.is_none() && self.rejected.is_none()
    }
}

/// Engine/gear state machine component.
///
/// Fields are private: every mutation goes through the request API so the
/// neutral-start invariant holds on all paths.
#[derive(Component, Debug, Clone)]
pub struct EngineStateMachine {
    state: EngineState,
    gear: Gear,
    binding: SoundBinding,
    /// Loop slot has not been brought in line with `state`/`gear` yet.
    pending_sync: bool,
}

impl EngineStateMachine {
    /// Stopped engine in neutral.
    pub fn new(binding: SoundBinding) -> Result<Self, ConfigError> {
        Self::create(Gear::Neutral, false, binding)
    }

    /// Build a machine with an explicit initial gear and engine state.
    ///
    /// Fails with [`ConfigError`] when `binding` is malformed. A machine created
    /// running starts its gear loop on the first [`tick`](Self::tick) or
    /// [`sync_audio`](Self::sync_audio); no start one-shot is played for it.
    pub fn create(
        initial_gear: Gear,
        initial_running: bool,
        binding: SoundBinding,
    ) -> Result<Self, ConfigError> {
        binding.validate()?;
        Ok(Self {
            state: if initial_running {
                EngineState::Running
            } else {
                EngineState::Stopped
            },
            gear: initial_gear,
            binding,
            pending_sync: initial_running,
        })
    }

    pub fn current_gear(&self) -> Gear {
        self.gear
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn binding(&self) -> &SoundBinding {
        &self.binding
    }

    /// Current request-shaped view of the machine (what a host toggle should
    /// read to be in sync).
    pub fn as_request(&self) -> EngineRequest {
        EngineRequest {
            engine_on: self.is_running(),
            gear: self.gear,
        }
    }

    /// Signed speed in units per second: the gear's speed while running,
    /// zero while stopped.
    pub fn speed_units(&self) -> f32 {
        if self.is_running() {
            self.gear.speed_units()
        } else {
            0.0
        }
    }

    /// Try to start the engine.
    ///
    /// Rejected unless the current gear is neutral; a rejected start emits no
    /// audio. Starting an engine that already runs is a no-op.
    pub fn request_engine_start<P: SoundPlayer + ?Sized>(
        &mut self,
        player: &mut P,
    ) -> Result<(), RejectedTransition> {
        if self.is_running() {
            return Ok(());
        }
        if self.gear != Gear::Neutral {
            debug!("engine start rejected in gear {}", self.gear);
            return Err(RejectedTransition { gear: self.gear });
        }
        self.state = EngineState::Running;
        self.pending_sync = false;
        debug!("engine started");
        if let Some(cue) = self.binding.start_cue() {
            player.play_one_shot(cue);
        }
        if let Some(cue) = self.binding.loop_for(self.gear) {
            player.ensure_loop(cue);
        }
        Ok(())
    }

    /// Stop the engine. Allowed in any gear; a no-op if already stopped.
    pub fn request_engine_stop<P: SoundPlayer + ?Sized>(&mut self, player: &mut P) {
        if !self.is_running() {
            return;
        }
        self.state = EngineState::Stopped;
        self.pending_sync = false;
        debug!("engine stopped in gear {}", self.gear);
        player.stop_loop();
        if let Some(cue) = self.binding.stop_cue() {
            player.play_one_shot(cue);
        }
    }

    /// Select `gear`. Always accepted.
    ///
    /// While running, a different gear swaps the loop. Returns `true` when the
    /// gear actually changed.
    pub fn request_gear_change<P: SoundPlayer + ?Sized>(
        &mut self,
        gear: Gear,
        player: &mut P,
    ) -> bool {
        if gear == self.gear {
            return false;
        }
        debug!("gear {} -> {}", self.gear, gear);
        self.gear = gear;
        if self.is_running() {
            self.apply_gear_loop(player);
        }
        true
    }

    /// Bring the loop slot in line with the current state, if still pending.
    ///
    /// Only machines created running need this; it is called by
    /// [`tick`](Self::tick) automatically.
    pub fn sync_audio<P: SoundPlayer + ?Sized>(&mut self, player: &mut P) {
        if !self.pending_sync {
            return;
        }
        self.pending_sync = false;
        if self.is_running() {
            if let Some(cue) = self.binding.loop_for(self.gear) {
                player.ensure_loop(cue);
            }
        }
    }

    /// Advance one step from a polled request.
    ///
    /// The requested gear is applied first as a plain state update. Then, in
    /// priority order: a rising `engine_on` edge starts the engine (reverting
    /// `request.engine_on` if rejected), a falling edge stops it, otherwise a
    /// gear change while running swaps the loop.
    pub fn tick<P: SoundPlayer + ?Sized>(
        &mut self,
        request: &mut EngineRequest,
        player: &mut P,
    ) -> TickReport {
        let rising = request.engine_on && !self.is_running();
        let falling = !request.engine_on && self.is_running();
        if falling {
            // the loop would be cut in this same step
            self.pending_sync = false;
        } else {
            self.sync_audio(player);
        }

        let mut report = TickReport::default();

        if request.gear != self.gear {
            report.shifted = Some((self.gear, request.gear));
            self.gear = request.gear;
        }

        if rising {
            match self.request_engine_start(player) {
                Ok(()) => report.transition = Some(EngineState::Running),
                Err(rejected) => {
                    request.engine_on = false;
                    report.rejected = Some(rejected);
                }
            }
        } else if falling {
            self.request_engine_stop(player);
            report.transition = Some(EngineState::Stopped);
        } else if report.shifted.is_some() && self.is_running() {
            self.apply_gear_loop(player);
        }

        report
    }

    fn apply_gear_loop<P: SoundPlayer + ?Sized>(&self, player: &mut P) {
        match self.binding.loop_for(self.gear) {
            Some(cue) => {
                player.ensure_loop(cue);
            }
            None => player.stop_loop(),
        }
    }
}
