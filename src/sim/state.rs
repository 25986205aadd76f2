//! Game state and core simulation types
//!
//! Everything a frame step reads or writes lives in [`GameState`]. The
//! playfield is the z = 0 plane, so positions are 2D.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Run phase
///
/// `Idle -> Running -> GameOver -> Idle`. Only `Running` is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run in progress (before the first start or after a reset)
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by an enemy reaching the ship
    GameOver,
}

/// The player ship. Single hit ends the run, so there is no health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
}

/// A player projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Simulation time the bullet was fired at
    pub spawn_time: f64,
}

impl Bullet {
    /// Seconds since the bullet was fired
    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.spawn_time
    }
}

/// A descending enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
}

/// Things that happened during a step, for hosts that want sound or effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { run: u32 },
    BulletFired { bullet: u32 },
    /// Bullet left through the top of the playfield
    BulletOffscreen { bullet: u32 },
    /// Bullet removed by the lifetime fail-safe
    BulletExpired { bullet: u32 },
    WaveSpawned { count: usize },
    EnemyDestroyed { enemy: u32, bullet: u32 },
    EnemyEscaped { enemy: u32 },
    GameOver { score: u64 },
}

/// Id and position of one entity, as handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// Read-only view of a frame for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: EntityView,
    pub bullets: Vec<EntityView>,
    pub enemies: Vec<EntityView>,
    pub score: u64,
    pub running: bool,
    /// Simulation clock in seconds
    pub now: f64,
}

/// Entity id reserved for the player in snapshots
pub const PLAYER_ID: u32 = 0;

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Enemies shot down this run
    pub score: u64,
    /// Simulation clock (seconds since run start)
    pub now: f64,
    /// Steps simulated this run
    pub time_ticks: u64,
    /// Waves spawned this run
    pub waves_spawned: u32,
    pub player: Player,
    /// Live bullets, oldest first
    pub bullets: Vec<Bullet>,
    /// Live enemies, oldest first
    pub enemies: Vec<Enemy>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle state with the player centred
    pub fn new(tuning: Tuning) -> Self {
        let player = Player {
            pos: Vec2::new(0.0, tuning.player_y),
        };
        Self {
            tuning,
            phase: GamePhase::Idle,
            score: 0,
            now: 0.0,
            time_ticks: 0,
            waves_spawned: 0,
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            events: Vec::new(),
            next_id: PLAYER_ID + 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Put the state back to the start of a run: clock and score zeroed,
    /// no entities, player centred. Phase is left to the caller.
    pub fn reset(&mut self) {
        self.score = 0;
        self.now = 0.0;
        self.time_ticks = 0;
        self.waves_spawned = 0;
        self.player.pos = Vec2::new(0.0, self.tuning.player_y);
        self.clear_entities();
        self.events.clear();
    }

    /// Drop every bullet and enemy
    pub fn clear_entities(&mut self) {
        self.bullets.clear();
        self.enemies.clear();
    }

    /// Move the player to `x`, clamped to the lane
    pub fn set_player_x(&mut self, x: f32) {
        let bound = self.tuning.player_bound;
        self.player.pos.x = x.clamp(-bound, bound);
    }

    /// Fire a bullet from the ship with the given horizontal jitter
    pub fn spawn_bullet(&mut self, jitter: f32) -> u32 {
        let id = self.next_entity_id();
        let pos = self.player.pos + Vec2::new(jitter, self.tuning.bullet_spawn_offset);
        self.bullets.push(Bullet {
            id,
            pos,
            spawn_time: self.now,
        });
        self.events.push(GameEvent::BulletFired { bullet: id });
        id
    }

    pub fn spawn_enemy(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy { id, pos });
        id
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop the oldest events so at most `max` remain
    pub fn trim_events(&mut self, max: usize) {
        if self.events.len() > max {
            let excess = self.events.len() - max;
            self.events.drain(..excess);
        }
    }

    /// Build the presentation view of this state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: EntityView {
                id: PLAYER_ID,
                x: self.player.pos.x,
                y: self.player.pos.y,
            },
            bullets: self
                .bullets
                .iter()
                .map(|b| EntityView {
                    id: b.id,
                    x: b.pos.x,
                    y: b.pos.y,
                })
                .collect(),
            enemies: self
                .enemies
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    x: e.pos.x,
                    y: e.pos.y,
                })
                .collect(),
            score: self.score,
            running: self.is_running(),
            now: self.now,
        }
    }
}
