//! Frame step
//!
//! One call advances the run by one host frame. Stages run in a fixed order
//! and each later stage sees the removals of the earlier ones:
//!
//! 1. apply movement intent (and fire)
//! 2. advance bullets, purge off-screen and expired ones
//! 3. advance enemies, purge escaped ones, check for a rammed ship
//! 4. resolve bullet/enemy hits

use rand::Rng;

use super::collision::{first_hit, player_struck};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::NOMINAL_DT;
use crate::input::InputIntent;
use crate::sanitize_dt;

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing was simulated (run not active)
    Idle,
    /// Run continues
    Continue,
    /// An enemy reached the ship this step
    GameOver,
}

/// Advance a running state by `dt` seconds.
///
/// `dt` is sanitized first (see [`sanitize_dt`]); per-tick distances from
/// the tuning are scaled by `dt / NOMINAL_DT`. `rng` supplies muzzle jitter.
pub fn step<R: Rng + ?Sized>(
    state: &mut GameState,
    input: &InputIntent,
    dt: f32,
    rng: &mut R,
) -> StepOutcome {
    if state.phase != GamePhase::Running {
        return StepOutcome::Idle;
    }

    let dt = sanitize_dt(dt);
    let scale = dt / NOMINAL_DT;
    state.time_ticks += 1;
    state.now += dt as f64;

    apply_intent(state, input, scale, rng);
    advance_bullets(state, scale);

    if advance_enemies(state, scale) {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        return StepOutcome::GameOver;
    }

    resolve_hits(state);
    StepOutcome::Continue
}

/// Move the ship and fire
fn apply_intent<R: Rng + ?Sized>(
    state: &mut GameState,
    input: &InputIntent,
    scale: f32,
    rng: &mut R,
) {
    if let Some(x) = input.absolute_x.filter(|x| x.is_finite()) {
        state.set_player_x(x);
    }

    let travel = state.tuning.player_step * scale;
    let mut x = state.player.pos.x;
    if input.move_left {
        x -= travel;
    }
    if input.move_right {
        x += travel;
    }
    state.set_player_x(x);

    if input.fire {
        let jitter = state.tuning.bullet_jitter;
        let offset = if jitter > 0.0 {
            rng.random_range(-jitter..jitter)
        } else {
            0.0
        };
        state.spawn_bullet(offset);
    }
}

/// Raise bullets, dropping those past the ceiling or older than the
/// fail-safe lifetime. Either condition alone removes a bullet.
fn advance_bullets(state: &mut GameState, scale: f32) {
    let rise = state.tuning.bullet_step * scale;
    let ceiling = state.tuning.bullet_ceiling;
    let max_age = state.tuning.bullet_max_age as f64;
    let now = state.now;
    let events = &mut state.events;

    state.bullets.retain_mut(|bullet| {
        bullet.pos.y += rise;
        if bullet.pos.y > ceiling {
            events.push(GameEvent::BulletOffscreen { bullet: bullet.id });
            return false;
        }
        if bullet.age(now) > max_age {
            log::trace!("Bullet {} expired at y={:.2}", bullet.id, bullet.pos.y);
            events.push(GameEvent::BulletExpired { bullet: bullet.id });
            return false;
        }
        true
    });
}

/// Lower enemies and drop the ones that escaped. Returns true if any of
/// the remaining enemies is touching the ship.
fn advance_enemies(state: &mut GameState, scale: f32) -> bool {
    let fall = state.tuning.enemy_step * scale;
    let floor = state.tuning.enemy_floor;
    let events = &mut state.events;

    state.enemies.retain_mut(|enemy| {
        enemy.pos.y -= fall;
        if enemy.pos.y < floor {
            events.push(GameEvent::EnemyEscaped { enemy: enemy.id });
            return false;
        }
        true
    });

    player_struck(
        state.player.pos,
        &state.enemies,
        state.tuning.player_hit_radius,
    )
}

/// Pair bullets with enemies.
///
/// Bullets are scanned newest first, and for each bullet the newest enemy in
/// range is taken. A bullet destroys at most one enemy and an enemy absorbs
/// at most one bullet; each pair scores one point.
fn resolve_hits(state: &mut GameState) {
    let radius = state.tuning.hit_radius;

    let mut bi = state.bullets.len();
    while bi > 0 {
        bi -= 1;
        let bullet = state.bullets[bi];
        if let Some(ei) = first_hit(bullet.pos, &state.enemies, radius) {
            let enemy = state.enemies.remove(ei);
            state.bullets.remove(bi);
            state.score += 1;
            state.events.push(GameEvent::EnemyDestroyed {
                enemy: enemy.id,
                bullet: bullet.id,
            });
        }
    }
}
