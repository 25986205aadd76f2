//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order, newest-first where documented)
//! - Clock advanced only by the frame step
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod step;

pub use autopilot::AutoPilot;
pub use collision::{first_hit, player_struck, within_radius};
pub use schedule::{Scheduler, TaskKind, TaskToken};
pub use spawner::{sample_spaced_positions, spawn_wave, wave_size};
pub use state::{
    Bullet, Enemy, EntityView, GameEvent, GamePhase, GameState, PLAYER_ID, Player, Snapshot,
};
pub use step::{StepOutcome, step};
