//! Audio systems and the background audio thread.
//!
//! This module hosts the systems that bridge the ECS world with the audio
//! device, plus the device thread itself:
//! - [`audio_thread`] (feature `audio`) runs on its own OS thread, owns the
//!   Raylib audio device and processes
//!   [`AudioCmd`](crate::events::audio::AudioCmd) messages, emitting
//!   [`AudioMessage`](crate::events::audio::AudioMessage) feedback.
//! - [`poll_audio_messages`] non-blockingly drains the audio thread's feedback
//!   into the ECS message queue each frame.
//! - [`forward_audio_cmds`] sends ECS-written commands to the audio thread.
//! - [`log_audio_cmds`] stands in for the device when none is running.
//!
//! Loops are streamed `Music` and one-shots are fully decoded `Sound`s. Each
//! vehicle owns one loop slot (its voice); a stream shared by several voices is
//! only stopped once no voice uses it.
//!
//! See also: [`crate::events::audio`] and [`crate::resources::audio`].

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::Messages;
use bevy_ecs::{
    prelude::{MessageReader, MessageWriter, Res},
    system::ResMut,
};
use log::debug;

/// Drain any pending feedback from the audio thread and enqueue it into the
/// ECS [`Messages<AudioMessage>`] mailbox.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Advance the ECS message queue for [`AudioMessage`].
///
/// Run this after [`poll_audio_messages`] in your schedule.
pub fn update_bevy_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}

/// Forward ECS AudioCmd messages to the audio thread via the AudioBridge sender.
pub fn forward_audio_cmds(bridge: Res<AudioBridge>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // ignore send error on shutdown
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for AudioCmd so same-frame readers can observe writes.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Log AudioCmd messages instead of playing them (no audio device).
pub fn log_audio_cmds(mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        match cmd {
            AudioCmd::PlayOneShot { voice, id } => debug!("[mute] voice {} one-shot '{}'", voice, id),
            AudioCmd::SetLoop { voice, id } => debug!("[mute] voice {} loop '{}'", voice, id),
            AudioCmd::StopLoop { voice } => debug!("[mute] voice {} stop loop", voice),
            other => debug!("[mute] {:?}", other),
        }
    }
}

#[cfg(feature = "audio")]
pub use device::audio_thread;

#[cfg(feature = "audio")]
mod device {
    use crate::events::audio::{AudioCmd, AudioMessage};
    use crossbeam_channel::{Receiver, Sender};
    use log::{debug, error, info, warn};
    use raylib::core::audio::{Music, RaylibAudio, Sound};
    use rustc_hash::FxHashMap;
    use smallvec::SmallVec;

    /// Entry point of the dedicated audio thread.
    ///
    /// Responsibilities:
    /// - Initialize the Raylib audio device once for the life of the thread.
    /// - Own all `Music` and `Sound` handles, preventing use from other threads.
    /// - React to [`AudioCmd`] inputs to load cues and drive voices.
    /// - Emit [`AudioMessage`] feedback (loaded, loop started/stopped, one-shot
    ///   finished).
    /// - Pump music streams and restart loops that reached their end.
    ///
    /// The loop non-blockingly drains commands and sleeps briefly between
    /// iterations. It returns after [`AudioCmd::Shutdown`].
    pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_evt: Sender<AudioMessage>) {
        let audio = match RaylibAudio::init_audio_device() {
            Ok(device) => device,
            Err(e) => {
                error!("[audio] failed to initialize audio device: {}", e);
                return;
            }
        };

        info!(
            "[audio] thread starting (id={:?})",
            std::thread::current().id()
        );

        let mut musics: FxHashMap<String, Music> = FxHashMap::default();
        let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
        // voice -> loop cue id
        let mut voices: FxHashMap<u64, String> = FxHashMap::default();
        let mut fx_playing: Vec<(u64, String)> = Vec::new();

        'run: loop {
            // 1) Drain commands
            for cmd in rx_cmd.try_iter() {
                match cmd {
                    AudioCmd::LoadLoop { id, path } => {
                        if musics.contains_key(&id) {
                            let _ = tx_evt.send(AudioMessage::Loaded { id });
                            continue;
                        }
                        match audio.new_music(&path) {
                            Ok(music) => {
                                debug!("[audio] loop loaded id='{}' path='{}'", id, path);
                                musics.insert(id.clone(), music);
                                let _ = tx_evt.send(AudioMessage::Loaded { id });
                            }
                            Err(e) => {
                                warn!("[audio] load failed id='{}' path='{}' error='{}'", id, path, e);
                                let _ = tx_evt.send(AudioMessage::LoadFailed {
                                    id,
                                    error: e.to_string(),
                                });
                            }
                        }
                    }
                    AudioCmd::LoadOneShot { id, path } => {
                        if sounds.contains_key(&id) {
                            let _ = tx_evt.send(AudioMessage::Loaded { id });
                            continue;
                        }
                        match audio.new_sound(&path) {
                            Ok(sound) => {
                                debug!("[audio] one-shot loaded id='{}' path='{}'", id, path);
                                sounds.insert(id.clone(), sound);
                                let _ = tx_evt.send(AudioMessage::Loaded { id });
                            }
                            Err(e) => {
                                warn!("[audio] load failed id='{}' path='{}' error='{}'", id, path, e);
                                let _ = tx_evt.send(AudioMessage::LoadFailed {
                                    id,
                                    error: e.to_string(),
                                });
                            }
                        }
                    }
                    AudioCmd::PlayOneShot { voice, id } => {
                        if let Some(sound) = sounds.get(&id) {
                            debug!("[audio] voice {} one-shot '{}'", voice, id);
                            sound.play();
                            fx_playing.push((voice, id));
                        } else {
                            warn!("[audio] one-shot '{}' not loaded", id);
                        }
                    }
                    AudioCmd::SetLoop { voice, id } => {
                        if let Some(previous) = voices.remove(&voice) {
                            release_loop(&musics, &voices, &previous, &id);
                        }
                        if let Some(music) = musics.get(&id) {
                            debug!("[audio] voice {} loop '{}'", voice, id);
                            music.seek_stream(0.0);
                            music.play_stream();
                            voices.insert(voice, id.clone());
                            let _ = tx_evt.send(AudioMessage::LoopStarted { voice, id });
                        } else {
                            warn!("[audio] loop '{}' not loaded", id);
                            let _ = tx_evt.send(AudioMessage::LoopFailed { voice, id });
                        }
                    }
                    AudioCmd::StopLoop { voice } => {
                        if let Some(id) = voices.remove(&voice) {
                            debug!("[audio] voice {} stop loop '{}'", voice, id);
                            release_loop(&musics, &voices, &id, "");
                            let _ = tx_evt.send(AudioMessage::LoopStopped { voice, id });
                        }
                    }
                    AudioCmd::UnloadAll => {
                        info!("[audio] unload all");
                        voices.clear();
                        fx_playing.clear();
                        musics.clear();
                        sounds.clear();
                        let _ = tx_evt.send(AudioMessage::UnloadedAll);
                    }
                    AudioCmd::Shutdown => {
                        info!("[audio] shutdown requested");
                        break 'run;
                    }
                }
            }

            // 2) Pump streams; a looped stream that ran out starts over.
            let mut restart: SmallVec<[&str; 4]> = SmallVec::new();
            for id in voices.values() {
                if restart.contains(&id.as_str()) {
                    continue;
                }
                if let Some(music) = musics.get(id) {
                    if music.is_stream_playing() {
                        music.update_stream();
                    } else if music.get_time_played() >= music.get_time_length() - 0.01 {
                        restart.push(id.as_str());
                    }
                }
            }
            for id in restart {
                if let Some(music) = musics.get(id) {
                    music.seek_stream(0.0);
                    music.play_stream();
                }
            }

            // 3) One-shot end detection: report each finished sound once.
            fx_playing.retain(|(voice, id)| {
                let still_playing = sounds.get(id).map(|s| s.is_playing()).unwrap_or(false);
                if !still_playing {
                    debug!("[audio] voice {} one-shot '{}' finished", voice, id);
                    let _ = tx_evt.send(AudioMessage::OneShotFinished {
                        voice: *voice,
                        id: id.clone(),
                    });
                }
                still_playing
            });

            std::thread::sleep(std::time::Duration::from_millis(10));
        } // 'run

        voices.clear();
        musics.clear();
        sounds.clear();
        info!(
            "[audio] thread exiting (id={:?})",
            std::thread::current().id()
        );
        // musics and sounds drop before `audio`, satisfying lifetimes
    }

    /// Stop `id`'s stream unless another voice still loops it or it is the
    /// stream about to be restarted (`next`).
    fn release_loop(
        musics: &FxHashMap<String, Music>,
        voices: &FxHashMap<u64, String>,
        id: &str,
        next: &str,
    ) {
        if id == next || voices.values().any(|v| v == id) {
            return;
        }
        if let Some(music) = musics.get(id) {
            music.stop_stream();
        }
    }
}
