//! Starbugs - arcade space shooter
//!
//! The player ship slides along the bottom row, fires upward and has to
//! shoot down waves of descending bugs before one of them rams it.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state, frame step, wave spawner, timers)
//! - `game`: Run lifecycle and the presentation seam
//! - `input`: Raw host input to movement intents
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and asset loading belong to the host; it receives a
//! [`sim::Snapshot`] every frame and never touches simulation state.

pub mod game;
pub mod input;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{GameController, Presenter};
pub use input::{InputAdapter, InputIntent};
pub use tuning::{Tuning, TuningError, TuningPreset};

/// Frame timing constants
pub mod consts {
    /// Nominal frame duration (~60 Hz) that per-tick tuning values are written against
    pub const NOMINAL_DT: f32 = 0.016;
    /// Frame deltas above this are a stall (tab in background, debugger) and
    /// get replaced by `NOMINAL_DT` so entities do not teleport on resume
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Undrained events kept by a running game; older ones are dropped first
    pub const MAX_PENDING_EVENTS: usize = 1024;
}

/// Replace unusable frame deltas with the nominal frame duration
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 && dt <= consts::MAX_FRAME_DT {
        dt
    } else {
        consts::NOMINAL_DT
    }
}
