//! Wave spawner
//!
//! Each wave drops 1-3 enemies on the spawn row at random x positions,
//! spread apart on a best-effort basis.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Spawn one wave into a running state. Returns the number of enemies added.
pub fn spawn_wave<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> usize {
    if !state.is_running() {
        return 0;
    }

    let count = wave_size(&state.tuning, rng);
    let half_width = state.tuning.spawn_half_width;
    let xs = sample_spaced_positions(
        rng,
        count,
        -half_width,
        half_width,
        state.tuning.min_spacing,
        state.tuning.max_spacing_attempts,
    );

    let y = state.tuning.enemy_spawn_y;
    for &x in &xs {
        state.spawn_enemy(Vec2::new(x, y));
    }
    state.waves_spawned += 1;
    state.events.push(GameEvent::WaveSpawned { count });

    log::debug!(
        "Wave {} at t={:.2}: {} enemies at x={:?}",
        state.waves_spawned,
        state.now,
        count,
        xs
    );
    count
}

/// Number of enemies for the next wave.
///
/// Drawn uniformly from `wave_min..=wave_max`, capped by how many
/// `min_spacing` slots fit across the spawn range.
pub fn wave_size<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> usize {
    let drawn = rng.random_range(tuning.wave_min..=tuning.wave_max) as usize;
    let slots = ((2.0 * tuning.spawn_half_width) / tuning.min_spacing).floor() as usize;
    drawn.min(slots.max(1))
}

/// Draw `count` x positions from `[lo, hi)`.
///
/// Each candidate is redrawn until it is at least `min_spacing` from every
/// position already accepted, or `max_attempts` draws have been made, in
/// which case the last draw is accepted anyway.
pub fn sample_spaced_positions<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    lo: f32,
    hi: f32,
    min_spacing: f32,
    max_attempts: u32,
) -> Vec<f32> {
    let mut accepted: Vec<f32> = Vec::with_capacity(count);

    for _ in 0..count {
        let mut attempts = 0;
        let x = loop {
            let candidate = rng.random_range(lo..hi);
            attempts += 1;
            let crowded = accepted.iter().any(|&x| (x - candidate).abs() < min_spacing);
            if !crowded || attempts >= max_attempts {
                break candidate;
            }
        };
        accepted.push(x);
    }

    accepted
}
