//! Run lifecycle
//!
//! [`GameController`] owns the simulation state, the seeded RNG and the two
//! timers that drive a run, and hands a [`Snapshot`] to the presentation
//! layer after every frame. Starting or resetting a run always cancels the
//! previous run's timers before new ones are registered.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::MAX_PENDING_EVENTS;
use crate::input::InputIntent;
use crate::sim::{
    GameEvent, GamePhase, GameState, Scheduler, Snapshot, StepOutcome, TaskKind, TaskToken,
    spawn_wave, step,
};
use crate::tuning::{Tuning, TuningError};

/// Receives frame snapshots and run lifecycle notifications.
///
/// Implementations render; they never mutate simulation state.
pub trait Presenter {
    /// Called once per simulated frame
    fn present(&mut self, snapshot: &Snapshot);

    fn on_game_start(&mut self) {}

    fn on_game_over(&mut self, _score: u64) {}
}

/// Headless presenter
impl Presenter for () {
    fn present(&mut self, _snapshot: &Snapshot) {}
}

/// Owns one game and its timers
pub struct GameController<P: Presenter> {
    state: GameState,
    rng: Pcg32,
    seed: u64,
    scheduler: Scheduler,
    frame_task: Option<TaskToken>,
    wave_task: Option<TaskToken>,
    presenter: P,
    runs_started: u32,
}

impl<P: Presenter> GameController<P> {
    /// Create an idle controller. Fails if the tuning does not validate.
    pub fn new(tuning: Tuning, seed: u64, presenter: P) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(tuning),
            rng: Pcg32::seed_from_u64(seed),
            seed,
            scheduler: Scheduler::new(),
            frame_task: None,
            wave_task: None,
            presenter,
            runs_started: 0,
        })
    }

    /// Begin a fresh run, abandoning any run in progress
    pub fn start_game(&mut self) {
        self.teardown();
        self.state.reset();
        self.state.phase = GamePhase::Running;
        self.runs_started += 1;

        let period = self.state.tuning.wave_period as f64;
        self.frame_task = Some(self.scheduler.every_frame(TaskKind::Frame));
        self.wave_task = Some(self.scheduler.every(TaskKind::Wave, period, period));

        self.state.events.push(GameEvent::RunStarted {
            run: self.runs_started,
        });
        log::info!("Run {} started (seed {})", self.runs_started, self.seed);

        if self.state.tuning.spawn_on_start {
            spawn_wave(&mut self.state, &mut self.rng);
        }
        self.presenter.on_game_start();
    }

    /// Abandon the current run and return to idle
    pub fn reset(&mut self) {
        if self.state.phase != GamePhase::Idle {
            log::info!("Run {} reset at score {}", self.runs_started, self.state.score);
        }
        self.teardown();
        self.state.phase = GamePhase::Idle;
    }

    /// Advance one host frame.
    ///
    /// Does nothing unless this run's frame task is live. Wave timers are
    /// polled against the simulation clock after the step, so waves only
    /// ever spawn into a run that is still going.
    pub fn frame(&mut self, dt: f32, input: &InputIntent) -> StepOutcome {
        let live = self
            .frame_task
            .is_some_and(|token| self.scheduler.is_pending(token));
        if !live {
            return StepOutcome::Idle;
        }

        let outcome = step(&mut self.state, input, dt, &mut self.rng);
        self.state.trim_events(MAX_PENDING_EVENTS);
        match outcome {
            StepOutcome::Continue => {
                for (token, kind) in self.scheduler.poll(self.state.now) {
                    if kind == TaskKind::Wave && Some(token) == self.wave_task {
                        spawn_wave(&mut self.state, &mut self.rng);
                    }
                }
                self.presenter.present(&self.state.snapshot());
            }
            StepOutcome::GameOver => {
                let score = self.state.score;
                log::info!(
                    "Game over: score {} after {} ticks, {} waves",
                    score,
                    self.state.time_ticks,
                    self.state.waves_spawned
                );
                self.presenter.present(&self.state.snapshot());
                self.presenter.on_game_over(score);
                self.teardown();
            }
            StepOutcome::Idle => {}
        }
        outcome
    }

    /// Cancel this run's timers and drop its entities. Score is kept.
    fn teardown(&mut self) {
        for token in [self.frame_task.take(), self.wave_task.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(token);
        }
        self.state.clear_entities();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Token of the current run's wave timer, if a run is active
    pub fn wave_task(&self) -> Option<TaskToken> {
        self.wave_task
    }

    pub fn runs_started(&self) -> u32 {
        self.runs_started
    }

    /// Take the events recorded since the last drain. Only the newest
    /// [`MAX_PENDING_EVENTS`] are kept between drains.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOMINAL_DT;
    use crate::tuning::TuningPreset;
    use glam::Vec2;

    /// Records everything the controller tells the presentation layer
    #[derive(Default)]
    struct Recorder {
        frames: Vec<Snapshot>,
        starts: u32,
        game_overs: Vec<u64>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, snapshot: &Snapshot) {
            self.frames.push(snapshot.clone());
        }

        fn on_game_start(&mut self) {
            self.starts += 1;
        }

        fn on_game_over(&mut self, score: u64) {
            self.game_overs.push(score);
        }
    }

    fn controller(tuning: Tuning) -> GameController<Recorder> {
        GameController::new(tuning, 42, Recorder::default()).unwrap()
    }

    fn wave_count(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::WaveSpawned { .. }))
            .count()
    }

    /// Run frames until the simulation clock reaches `until`
    fn run_until<P: Presenter>(game: &mut GameController<P>, until: f64) {
        let idle = InputIntent::default();
        while game.state().now < until {
            if game.frame(NOMINAL_DT, &idle) != StepOutcome::Continue {
                break;
            }
        }
    }

    #[test]
    fn test_idle_until_started() {
        let mut game = controller(Tuning::default());
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.frame(NOMINAL_DT, &InputIntent::default()), StepOutcome::Idle);
        assert!(game.presenter().frames.is_empty());
        assert_eq!(game.scheduler().pending(), 0);
    }

    #[test]
    fn test_start_spawns_opening_wave() {
        let mut game = controller(Tuning::default());
        game.start_game();

        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.presenter().starts, 1);
        assert!(!game.state().enemies.is_empty());
        assert_eq!(game.scheduler().pending(), 2);

        let events = game.drain_events();
        assert_eq!(events[0], GameEvent::RunStarted { run: 1 });
        assert_eq!(wave_count(&events), 1);
    }

    #[test]
    fn test_mobile_waits_one_period_for_first_wave() {
        let mut game = controller(Tuning::from_preset(TuningPreset::Mobile));
        game.start_game();
        assert!(game.state().enemies.is_empty());

        run_until(&mut game, 4.9);
        assert_eq!(game.state().waves_spawned, 0);
        run_until(&mut game, 5.0 + NOMINAL_DT as f64);
        assert_eq!(game.state().waves_spawned, 1);
    }

    #[test]
    fn test_waves_follow_period() {
        let mut game = controller(Tuning::default());
        game.start_game();
        run_until(&mut game, 10.0 + NOMINAL_DT as f64);
        // Opening wave plus t=5 and t=10
        assert_eq!(game.state().waves_spawned, 3);
    }

    #[test]
    fn test_frames_presented() {
        let mut game = controller(Tuning::default());
        game.start_game();
        for _ in 0..10 {
            game.frame(NOMINAL_DT, &InputIntent::default());
        }
        let frames = &game.presenter().frames;
        assert_eq!(frames.len(), 10);
        assert!(frames.iter().all(|f| f.running));
        assert!(frames.windows(2).all(|w| w[1].now > w[0].now));
    }

    #[test]
    fn test_restart_cancels_stale_wave_timer() {
        let mut game = controller(Tuning::default());
        game.start_game();
        let old_wave = game.wave_task().unwrap();
        run_until(&mut game, 4.9);

        game.start_game();
        assert!(!game.scheduler().is_pending(old_wave));
        assert_ne!(game.wave_task(), Some(old_wave));
        assert_eq!(game.scheduler().pending(), 2);
        game.drain_events();

        // Where the old timer would have fired (t=5 of the old run), only
        // the new run's clock matters: nothing spawns before its own t=5.
        run_until(&mut game, 4.9);
        assert_eq!(wave_count(&game.drain_events()), 0);
        assert_eq!(game.state().waves_spawned, 1);

        run_until(&mut game, 5.0 + NOMINAL_DT as f64);
        assert_eq!(wave_count(&game.drain_events()), 1);
        assert_eq!(game.state().waves_spawned, 2);
    }

    #[test]
    fn test_restart_resets_score_and_entities() {
        let mut game = controller(Tuning::default());
        game.start_game();
        game.state.score = 5;
        game.state.set_player_x(4.0);

        game.start_game();
        assert_eq!(game.score(), 0);
        assert_eq!(game.state().player.pos.x, 0.0);
        assert_eq!(game.state().now, 0.0);
        assert_eq!(game.runs_started(), 2);
        assert_eq!(game.presenter().starts, 2);
    }

    #[test]
    fn test_game_over_tears_down() {
        let mut game = controller(Tuning::default());
        game.start_game();
        game.state.score = 3;
        game.state.spawn_enemy(Vec2::new(0.0, -9.5));

        let outcome = game.frame(NOMINAL_DT, &InputIntent::default());
        assert_eq!(outcome, StepOutcome::GameOver);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.presenter().game_overs, vec![3]);
        assert!(!game.presenter().frames.last().unwrap().running);

        // Timers gone, entities cleared, score kept for display
        assert_eq!(game.scheduler().pending(), 0);
        assert!(game.state().enemies.is_empty() && game.state().bullets.is_empty());
        assert_eq!(game.score(), 3);

        let frames_before = game.presenter().frames.len();
        assert_eq!(game.frame(NOMINAL_DT, &InputIntent::default()), StepOutcome::Idle);
        assert_eq!(game.presenter().frames.len(), frames_before);
    }

    #[test]
    fn test_replay_after_game_over() {
        let mut game = controller(Tuning::default());
        game.start_game();
        game.state.spawn_enemy(Vec2::new(0.0, -9.5));
        game.frame(NOMINAL_DT, &InputIntent::default());
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.start_game();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.frame(NOMINAL_DT, &InputIntent::default()), StepOutcome::Continue);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut game = controller(Tuning::default());
        game.start_game();
        game.reset();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.scheduler().pending(), 0);
        assert!(game.state().enemies.is_empty());
        assert_eq!(game.frame(NOMINAL_DT, &InputIntent::default()), StepOutcome::Idle);
    }

    #[test]
    fn test_shooting_scores() {
        let mut game = controller(Tuning {
            spawn_on_start: false,
            ..Tuning::default()
        });
        game.start_game();
        game.state.spawn_enemy(Vec2::new(0.0, 0.0));

        let fire = InputIntent {
            fire: true,
            ..Default::default()
        };
        game.frame(NOMINAL_DT, &fire);
        run_until(&mut game, 2.0);
        assert_eq!(game.score(), 1);
        assert!(game.state().enemies.is_empty());
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let inverted = Tuning {
            wave_min: 3,
            wave_max: 1,
            ..Tuning::default()
        };
        assert!(matches!(
            GameController::new(inverted, 1, ()),
            Err(TuningError::Invalid { field: "wave_max", .. })
        ));

        let no_lane = Tuning {
            spawn_half_width: 0.0,
            ..Tuning::default()
        };
        assert!(matches!(
            GameController::new(no_lane, 1, ()),
            Err(TuningError::Invalid { field: "spawn_half_width", .. })
        ));
    }

    #[test]
    fn test_undrained_events_stay_bounded() {
        let mut game = GameController::new(Tuning::default(), 3, ()).unwrap();
        game.start_game();
        let fire = InputIntent {
            fire: true,
            ..Default::default()
        };
        for i in 0..20_000 {
            let input = if i % 4 == 0 { fire } else { InputIntent::default() };
            if game.frame(NOMINAL_DT, &input) != StepOutcome::Continue {
                game.start_game();
            }
            assert!(game.state().events.len() <= MAX_PENDING_EVENTS);
        }
        // Newest events survive the cap
        assert!(!game.drain_events().is_empty());
        assert!(game.state().events.is_empty());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameController::new(Tuning::default(), 7, ()).unwrap();
        let mut b = GameController::new(Tuning::default(), 7, ()).unwrap();
        a.start_game();
        b.start_game();
        let fire = InputIntent {
            fire: true,
            ..Default::default()
        };
        for i in 0..600 {
            let input = if i % 20 == 0 { fire } else { InputIntent::default() };
            a.frame(NOMINAL_DT, &input);
            b.frame(NOMINAL_DT, &input);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
