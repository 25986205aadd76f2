//! Collision tests
//!
//! Every entity is treated as a point and two entities touch when their
//! Euclidean distance is strictly below a radius.

use glam::Vec2;

use super::state::Enemy;

/// True if `a` and `b` are closer than `radius`
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Find the enemy a bullet at `pos` hits.
///
/// Enemies are scanned newest first and the first one within `radius`
/// wins, so when a bullet overlaps several enemies the most recently
/// spawned one is destroyed.
pub fn first_hit(pos: Vec2, enemies: &[Enemy], radius: f32) -> Option<usize> {
    enemies
        .iter()
        .enumerate()
        .rev()
        .find(|(_, enemy)| within_radius(pos, enemy.pos, radius))
        .map(|(index, _)| index)
}

/// True if any enemy is within `radius` of the player
pub fn player_struck(player: Vec2, enemies: &[Enemy], radius: f32) -> bool {
    enemies.iter().any(|e| within_radius(player, e.pos, radius))
}
