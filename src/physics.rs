use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use crate::input::Action;
use crate::state::{FrameSnapshot, SimState};

/// Channels connecting the main (render) thread to the physics thread.
pub struct PhysicsChannels {
    pub action_tx: mpsc::Sender<Action>,
    pub snap_rx: mpsc::Receiver<FrameSnapshot>,
    pub snap_return_tx: mpsc::Sender<FrameSnapshot>,
}

/// Spawn the physics thread. It owns `sim` and is the only writer of the
/// element store; edits arrive as `Action`s and are applied between ticks.
/// One snapshot is published per tick, so the bounded channel paces the
/// simulation to the display.
pub fn spawn_physics_thread(
    sim: SimState,
    running: Arc<AtomicBool>,
) -> (PhysicsChannels, std::thread::JoinHandle<()>) {
    let (action_tx, action_rx) = mpsc::channel::<Action>();
    let (snap_tx, snap_rx) = mpsc::sync_channel::<FrameSnapshot>(1);
    let (snap_return_tx, snap_return_rx) = mpsc::channel::<FrameSnapshot>();

    let handle = std::thread::spawn(move || {
        let mut sim = sim;
        let particle_count = sim.particles.len();
        let mut snap_buf = FrameSnapshot::new_empty(particle_count);

        while running.load(Ordering::SeqCst) {
            while let Ok(action) = action_rx.try_recv() {
                sim.apply(&action);
            }
            if let Some(outcome) = sim.step() {
                log::trace!(
                    "tick {}: {} live, {} reseeded",
                    sim.tick,
                    sim.particles.live_count(),
                    outcome.placed
                );
            }
            sim.snapshot_into(&mut snap_buf);
            if snap_tx.send(snap_buf).is_err() {
                break;
            }
            snap_buf = snap_return_rx
                .try_recv()
                .unwrap_or_else(|_| FrameSnapshot::new_empty(particle_count));
        }
        log::debug!("physics thread stopped at tick {}", sim.tick);
    });

    let channels = PhysicsChannels {
        action_tx,
        snap_rx,
        snap_return_tx,
    };
    (channels, handle)
}
