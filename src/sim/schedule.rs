//! Cancellable timers on the simulation clock
//!
//! A run is driven by two cooperative sources on one thread: the per-frame
//! callback and the lower-frequency wave timer. Both are registered here and
//! identified by a [`TaskToken`]. Tokens are never reused, so a token held
//! over from an earlier run cannot match anything scheduled later.

/// Handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

/// What a task drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Frame step, once per host frame
    Frame,
    /// Wave spawner
    Wave,
}

#[derive(Debug, Clone, Copy)]
enum Cadence {
    EveryFrame,
    Every { period: f64, next_due: f64 },
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    token: TaskToken,
    kind: TaskKind,
    cadence: Cadence,
}

/// Registry of live timers
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
    next_token: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, kind: TaskKind, cadence: Cadence) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.tasks.push(ScheduledTask {
            token,
            kind,
            cadence,
        });
        token
    }

    /// Register a task that runs on every host frame
    pub fn every_frame(&mut self, kind: TaskKind) -> TaskToken {
        self.issue(kind, Cadence::EveryFrame)
    }

    /// Register a repeating task first due at `first_due`, then every `period`.
    /// A non-positive period fires once.
    pub fn every(&mut self, kind: TaskKind, period: f64, first_due: f64) -> TaskToken {
        let period = if period > 0.0 { period } else { f64::INFINITY };
        self.issue(
            kind,
            Cadence::Every {
                period,
                next_due: first_due,
            },
        )
    }

    /// Cancel a task. Returns false if it was not pending.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.token != token);
        let cancelled = self.tasks.len() != before;
        if cancelled {
            log::debug!("Cancelled task {:?}", token);
        }
        cancelled
    }

    /// Cancel everything. Returns how many tasks were pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.tasks.iter().any(|t| t.token == token)
    }

    /// Number of live tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Collect every interval firing due at or before `now`, oldest first.
    ///
    /// A task that fell several periods behind fires once per missed period.
    /// Frame tasks are never returned; the host frame drives them.
    pub fn poll(&mut self, now: f64) -> Vec<(TaskToken, TaskKind)> {
        let mut due: Vec<(f64, TaskToken, TaskKind)> = Vec::new();

        for task in &mut self.tasks {
            if let Cadence::Every { period, next_due } = &mut task.cadence {
                while *next_due <= now {
                    due.push((*next_due, task.token, task.kind));
                    *next_due += *period;
                }
            }
        }

        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, token, kind)| (token, kind)).collect()
    }
}
