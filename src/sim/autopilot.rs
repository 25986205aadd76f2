//! Demo pilot
//!
//! Plays the game for attract mode and the headless runner: chase the
//! lowest enemy, shoot when lined up, drift back to the middle when the
//! sky is clear.

use super::state::GameState;
use crate::input::InputIntent;

/// Horizontal slack before the pilot starts steering
const STEER_DEADZONE: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct AutoPilot {
    /// Steps between shots
    pub fire_interval: u32,
    cooldown: u32,
}

impl Default for AutoPilot {
    fn default() -> Self {
        Self::new(8)
    }
}

impl AutoPilot {
    pub fn new(fire_interval: u32) -> Self {
        Self {
            fire_interval: fire_interval.max(1),
            cooldown: 0,
        }
    }

    /// Decide the input for the next step
    pub fn intent(&mut self, state: &GameState) -> InputIntent {
        self.cooldown = self.cooldown.saturating_sub(1);

        // Most urgent target: the enemy closest to the bottom
        let target = state
            .enemies
            .iter()
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let ship_x = state.player.pos.x;
        let aim_x = target.map_or(0.0, |e| e.pos.x);
        let dx = aim_x - ship_x;

        let mut intent = InputIntent {
            move_left: dx < -STEER_DEADZONE,
            move_right: dx > STEER_DEADZONE,
            ..Default::default()
        };

        let lined_up = target.is_some() && dx.abs() < state.tuning.hit_radius;
        if lined_up && self.cooldown == 0 {
            intent.fire = true;
            self.cooldown = self.fire_interval;
        }
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn running() -> GameState {
        let mut state = GameState::new(Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_steers_toward_lowest_enemy() {
        let mut state = running();
        state.spawn_enemy(Vec2::new(-6.0, 10.0));
        state.spawn_enemy(Vec2::new(4.0, 2.0));
        let intent = AutoPilot::default().intent(&state);
        assert!(intent.move_right && !intent.move_left);
        assert!(!intent.fire);
    }

    #[test]
    fn test_fires_when_lined_up_with_cooldown() {
        let mut state = running();
        state.spawn_enemy(Vec2::new(0.2, 5.0));
        let mut pilot = AutoPilot::new(3);

        assert!(pilot.intent(&state).fire);
        assert!(!pilot.intent(&state).fire);
        assert!(!pilot.intent(&state).fire);
        assert!(pilot.intent(&state).fire);
    }

    #[test]
    fn test_returns_to_centre_when_clear() {
        let mut state = running();
        state.set_player_x(-5.0);
        let intent = AutoPilot::default().intent(&state);
        assert!(intent.move_right);
        assert!(!intent.fire);
    }
}
