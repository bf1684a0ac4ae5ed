//! ECS resources that bridge the main thread with the background audio thread.
//!
//! Use [`init_audio_messages`] to register the `Messages<AudioCmd>` and
//! `Messages<AudioMessage>` queues (always needed, even without a device).
//! With the `audio` feature, [`setup_audio`] additionally spawns the audio
//! thread and inserts the [`AudioBridge`]; call [`shutdown_audio`] during
//! teardown to stop the thread and free audio resources.

use crate::events::audio::{AudioCmd, AudioMessage};
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};

/// Shared bridge between the ECS world and the audio thread.
///
/// Systems send commands via [`AudioBridge::tx_cmd`] and poll feedback via
/// [`AudioBridge::rx_msg`].
#[derive(Resource)]
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (ECS -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> ECS).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Register the audio message queues.
pub fn init_audio_messages(world: &mut World) {
    world.init_resource::<Messages<AudioMessage>>();
    world.init_resource::<Messages<AudioCmd>>();
}

/// Spawn the audio thread and register bridge resources.
///
/// This function:
/// - Creates command/feedback channels.
/// - Spawns the background thread running
///   [`audio_thread`](crate::systems::audio::audio_thread).
/// - Inserts [`AudioBridge`] and the message queues.
#[cfg(feature = "audio")]
pub fn setup_audio(world: &mut World) {
    use crate::systems::audio::audio_thread;
    use crossbeam_channel::unbounded;

    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));

    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    init_audio_messages(world);
}

/// Gracefully request shutdown of the audio thread and join it.
///
/// If the bridge resource exists, sends [`AudioCmd::Shutdown`], waits for the
/// thread to exit, and removes the resource from the world.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
        let _ = bridge.handle.join();
    }
}
