//! Starbugs entry point
//!
//! The browser build is driven from JavaScript through `starbugs::web`.
//! Natively this runs a headless session with the demo pilot at the
//! controls, which is handy for balancing tuning files.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;

    use starbugs::consts::NOMINAL_DT;
    use starbugs::sim::{AutoPilot, GameEvent, Snapshot, StepOutcome};
    use starbugs::{GameController, Presenter, Tuning, TuningPreset};

    #[derive(Parser)]
    #[command(name = "starbugs", about = "Run a headless Starbugs session with the demo pilot")]
    pub struct Cli {
        /// Simulated seconds to run for
        #[arg(short, long, default_value = "60")]
        seconds: f64,
        /// Host frame rate to simulate
        #[arg(long, default_value = "60")]
        fps: f32,
        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Tuning preset: web, mobile or classic
        #[arg(short, long, default_value = "web")]
        preset: TuningPreset,
        /// JSON file overriding tuning values (takes precedence over --preset)
        #[arg(short, long)]
        tuning: Option<PathBuf>,
        /// Start a new run after each game over until time runs out
        #[arg(long)]
        restart: bool,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
        /// Enable debug logging
        #[arg(short, long)]
        verbose: bool,
    }

    /// Counts frames and remembers the last one
    #[derive(Default)]
    struct SessionLog {
        frames: u64,
        last: Option<Snapshot>,
        scores: Vec<u64>,
    }

    impl Presenter for SessionLog {
        fn present(&mut self, snapshot: &Snapshot) {
            self.frames += 1;
            self.last = Some(snapshot.clone());
        }

        fn on_game_start(&mut self) {
            log::info!("Game start");
        }

        fn on_game_over(&mut self, score: u64) {
            log::info!("Game over - score {}", score);
            self.scores.push(score);
        }
    }

    fn load_tuning(cli: &Cli) -> anyhow::Result<Tuning> {
        match &cli.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading tuning file {}", path.display()))?;
                Tuning::from_json(&json)
                    .with_context(|| format!("loading tuning file {}", path.display()))
            }
            None => Ok(Tuning::from_preset(cli.preset)),
        }
    }

    pub fn run(cli: Cli) -> anyhow::Result<()> {
        let default_level = if cli.verbose { "debug" } else { "info" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .init();

        let tuning = load_tuning(&cli)?;
        let dt = if cli.fps > 0.0 { 1.0 / cli.fps } else { NOMINAL_DT };
        log::info!(
            "Starbugs (native) seed={} preset={} dt={:.4}s for {}s",
            cli.seed,
            cli.preset,
            dt,
            cli.seconds
        );

        let mut game = GameController::new(tuning, cli.seed, SessionLog::default())
            .context("invalid tuning")?;
        let mut pilot = AutoPilot::default();
        let mut elapsed = 0.0f64;
        let mut kills = 0u64;
        let mut escapes = 0u64;

        game.start_game();
        while elapsed < cli.seconds {
            let intent = pilot.intent(game.state());
            let outcome = game.frame(dt, &intent);
            elapsed += starbugs::sanitize_dt(dt) as f64;

            for event in game.drain_events() {
                match event {
                    GameEvent::EnemyDestroyed { .. } => kills += 1,
                    GameEvent::EnemyEscaped { .. } => escapes += 1,
                    _ => {}
                }
            }

            if outcome == StepOutcome::GameOver {
                if !cli.restart {
                    break;
                }
                game.start_game();
            }
        }

        let session = game.presenter();
        println!("Runs:      {}", game.runs_started());
        println!("Frames:    {}", session.frames);
        println!("Kills:     {}", kills);
        println!("Escaped:   {}", escapes);
        println!("Game overs: {:?}", session.scores);
        println!("Score:     {}", game.score());

        if cli.json {
            let snapshot = session.last.clone().unwrap_or_else(|| game.snapshot());
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    headless::run(headless::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is starbugs::web::wasm_start, this is just to satisfy the compiler
}
