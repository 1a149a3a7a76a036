//! Single-owner cube session.
//!
//! One tokio task owns the [`CubeState`] and the [`SpatialLayerEngine`];
//! everything else talks to it through a [`SessionHandle`].
//!
//! ```text
//!  SessionHandle ──mpsc──▶ ┌───────────────────────────┐
//!       ▲                  │ owner task                │
//!       └──── oneshot ──── │  1. CubeState::apply_move │
//!                          │  2. engine.submit         │
//!  subscribe() ◀─broadcast─│  3. tick until idle       │
//!                          └───────────────────────────┘
//! ```
//!
//! The logical move always lands before its rotation is queued, so the grid
//! the engine recolors from is never behind the geometry.
//!
//! While a [`SessionCommand::SolveAndApply`] is solving or its moves are
//! still animating, commands that change the cube are held and run in
//! arrival order once playback settles.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cube_core::{
    ApplyReport, CubeError, CubeSnapshot, CubeState, Move, ScrambleConfig, SolveCoordinator,
    SolveProgress, Solution,
};
use cube_spatial::{AnimationConfig, PieceView, SpatialLayerEngine};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Capacity of the command channel.
const COMMAND_CAPACITY: usize = 64;

/// Capacity of the event broadcast channel.
const EVENT_CAPACITY: usize = 100;

/// Shortest tick period; `tokio::time::interval` rejects zero.
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Result type for session requests.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors returned through a [`SessionHandle`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The owner task has stopped.
    #[error("Cube session is closed")]
    Closed,

    /// The cube rejected the request.
    #[error(transparent)]
    Cube(#[from] CubeError),
}

/// Requests handled by the owner task.
#[derive(Debug)]
pub enum SessionCommand {
    /// Apply one move.
    Apply {
        /// Move to apply.
        mv: Move,
        /// Snapshot after the logical move.
        reply: oneshot::Sender<CubeSnapshot>,
    },
    /// Apply a whitespace-separated sequence, skipping bad tokens.
    ApplySequence {
        /// Notation text.
        text: String,
        /// Applied and ignored tokens.
        reply: oneshot::Sender<ApplyReport>,
    },
    /// Replace the cube with a fresh scramble.
    Scramble {
        /// Length and seed.
        config: ScrambleConfig,
        /// The scramble applied.
        reply: oneshot::Sender<Vec<Move>>,
    },
    /// Return to solved.
    Reset {
        /// Acknowledgement.
        reply: oneshot::Sender<()>,
    },
    /// Overwrite stickers from a facelet string.
    LoadFacelets {
        /// 54-character facelet string.
        facelets: String,
        /// Decode outcome.
        reply: oneshot::Sender<Result<(), CubeError>>,
    },
    /// Read the current state.
    Snapshot {
        /// Logical and geometric state.
        reply: oneshot::Sender<SessionSnapshot>,
    },
    /// Ask the attached solver for a solution. Nothing is applied.
    Solve {
        /// Solver outcome.
        reply: oneshot::Sender<Result<Solution, CubeError>>,
    },
    /// Solve, then play the solution through the normal move path.
    SolveAndApply {
        /// Solver outcome; moves are applied when this is `Ok`.
        reply: oneshot::Sender<Result<Solution, CubeError>>,
    },
    /// Undo the last move.
    Undo {
        /// The move undone, if history was non-empty.
        reply: oneshot::Sender<Option<Move>>,
    },
    /// Resolve once no animation is running or queued.
    WaitIdle {
        /// Fired when idle.
        reply: oneshot::Sender<()>,
    },
    /// Stop the owner task.
    Shutdown,
}

impl SessionCommand {
    /// Whether this command changes the cube.
    const fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Apply { .. }
                | Self::ApplySequence { .. }
                | Self::Scramble { .. }
                | Self::Reset { .. }
                | Self::LoadFacelets { .. }
                | Self::SolveAndApply { .. }
                | Self::Undo { .. }
        )
    }
}

/// Notifications fanned out to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The logical cube changed.
    Changed {
        /// Monotonic change counter.
        revision: u64,
    },
    /// A layer animation finished.
    MoveAnimated {
        /// The move that landed.
        mv: Move,
    },
    /// Solver progress.
    SolveProgress(SolveProgress),
}

/// Logical and geometric state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Sticker state and history.
    pub cube: CubeSnapshot,
    /// Renderer views of the 26 pieces.
    pub pieces: Vec<PieceView>,
    /// Whether the engine has nothing in flight.
    pub idle: bool,
}

/// Cloneable handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> SessionResult<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Apply one move.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn apply(&self, mv: Move) -> SessionResult<CubeSnapshot> {
        self.request(|reply| SessionCommand::Apply { mv, reply }).await
    }

    /// Apply a notation sequence leniently.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn apply_sequence(&self, text: &str) -> SessionResult<ApplyReport> {
        let text = text.to_string();
        self.request(|reply| SessionCommand::ApplySequence { text, reply })
            .await
    }

    /// Scramble the cube.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn scramble(&self, config: ScrambleConfig) -> SessionResult<Vec<Move>> {
        self.request(|reply| SessionCommand::Scramble { config, reply })
            .await
    }

    /// Reset to solved.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn reset(&self) -> SessionResult<()> {
        self.request(|reply| SessionCommand::Reset { reply }).await
    }

    /// Overwrite stickers from a facelet string.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Cube`] wrapping the decode failure, or
    /// [`SessionError::Closed`].
    pub async fn load_facelets(&self, facelets: &str) -> SessionResult<()> {
        let facelets = facelets.to_string();
        self.request(|reply| SessionCommand::LoadFacelets { facelets, reply })
            .await??;
        Ok(())
    }

    /// Current state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn snapshot(&self) -> SessionResult<SessionSnapshot> {
        self.request(|reply| SessionCommand::Snapshot { reply }).await
    }

    /// Ask the solver for a solution.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Cube`] with the solver contract error, or
    /// [`SessionError::Closed`].
    pub async fn solve(&self) -> SessionResult<Solution> {
        Ok(self.request(|reply| SessionCommand::Solve { reply }).await??)
    }

    /// Solve and apply the solution, extending the history.
    ///
    /// Resolves once the moves are applied logically; use
    /// [`wait_idle`](Self::wait_idle) to wait for them to animate.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Cube`] with the solver contract error, or
    /// [`SessionError::Closed`].
    pub async fn solve_and_apply(&self) -> SessionResult<Solution> {
        Ok(self
            .request(|reply| SessionCommand::SolveAndApply { reply })
            .await??)
    }

    /// Undo the last move.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn undo(&self) -> SessionResult<Option<Move>> {
        self.request(|reply| SessionCommand::Undo { reply }).await
    }

    /// Wait for all animations to finish.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn wait_idle(&self) -> SessionResult<()> {
        self.request(|reply| SessionCommand::WaitIdle { reply }).await
    }

    /// Stop the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if it had already stopped.
    pub async fn shutdown(&self) -> SessionResult<()> {
        self.commands
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

/// Where a solve-and-apply request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Idle,
    Solving,
    Playing,
}

/// A finished solve-and-apply solve, handed back to the owner.
struct SolveOutcome {
    result: Result<Solution, CubeError>,
    reply: oneshot::Sender<Result<Solution, CubeError>>,
}

struct SessionOwner {
    state: CubeState,
    engine: SpatialLayerEngine,
    coordinator: Arc<SolveCoordinator>,
    events: broadcast::Sender<SessionEvent>,
    idle_waiters: Vec<oneshot::Sender<()>>,
    last_frame: Instant,
    playback: Playback,
    held: VecDeque<SessionCommand>,
    outcomes: mpsc::UnboundedSender<SolveOutcome>,
}

/// Start a session task.
#[must_use]
pub fn spawn_session(
    animation: AnimationConfig,
    coordinator: Arc<SolveCoordinator>,
) -> (SessionHandle, JoinHandle<()>) {
    let (commands, rx) = mpsc::channel(COMMAND_CAPACITY);
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    let (outcomes, outcome_rx) = mpsc::unbounded_channel();

    let mut state = CubeState::new();
    let notify = events.clone();
    let revision = AtomicU64::new(0);
    state.set_on_change(move || {
        let revision = revision.fetch_add(1, Ordering::Relaxed) + 1;
        // No subscribers is fine.
        let _ = notify.send(SessionEvent::Changed { revision });
    });

    let owner = SessionOwner {
        state,
        engine: SpatialLayerEngine::new(animation),
        coordinator,
        events: events.clone(),
        idle_waiters: Vec::new(),
        last_frame: Instant::now(),
        playback: Playback::Idle,
        held: VecDeque::new(),
        outcomes,
    };
    let task = tokio::spawn(owner.run(rx, outcome_rx));
    (SessionHandle { commands, events }, task)
}

impl SessionOwner {
    async fn run(
        mut self,
        mut rx: mpsc::Receiver<SessionCommand>,
        mut outcomes: mpsc::UnboundedReceiver<SolveOutcome>,
    ) {
        tracing::info!("Cube session started");
        let period = self.engine.config().frame_interval.max(MIN_FRAME_INTERVAL);
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.dispatch(cmd) {
                        break;
                    }
                }
                Some(outcome) = outcomes.recv() => self.play_solution(outcome),
                _ = ticker.tick(), if !self.engine.is_idle() => self.frame(),
            }
            if !self.resume_held() {
                break;
            }
            self.release_idle_waiters();
        }

        tracing::info!("Cube session stopped");
    }

    /// Holds cube-changing commands while a solution is in flight.
    fn dispatch(&mut self, cmd: SessionCommand) -> bool {
        if self.playback != Playback::Idle && cmd.mutates() {
            tracing::debug!("Holding {cmd:?} until solution playback ends");
            self.held.push_back(cmd);
            return true;
        }
        self.handle(cmd)
    }

    /// Returns `false` if a held command was a shutdown.
    fn resume_held(&mut self) -> bool {
        if self.playback == Playback::Playing && self.engine.is_idle() {
            tracing::debug!("Solution playback finished");
            self.playback = Playback::Idle;
        }
        while self.playback == Playback::Idle {
            let Some(cmd) = self.held.pop_front() else {
                break;
            };
            if !self.handle(cmd) {
                return false;
            }
        }
        true
    }

    /// Returns `false` on shutdown.
    fn handle(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Apply { mv, reply } => {
                self.apply(mv);
                let _ = reply.send(self.state.snapshot());
            }
            SessionCommand::ApplySequence { text, reply } => {
                let (moves, ignored) = cube_core::notation::parse_sequence_lenient(&text);
                for &mv in &moves {
                    self.apply(mv);
                }
                let _ = reply.send(ApplyReport {
                    applied: moves,
                    ignored: ignored.into_iter().map(str::to_string).collect(),
                });
            }
            SessionCommand::Scramble { config, reply } => {
                // Land anything still animating so the scramble turns apply
                // on top of the current geometry.
                for mv in self.engine.finish(self.state.grid()) {
                    let _ = self.events.send(SessionEvent::MoveAnimated { mv });
                }
                let sequence = self.state.scramble(&config);
                for mv in &sequence {
                    self.engine.rotate_layer(mv.face, mv.turn);
                }
                self.engine.recolor(self.state.grid());
                let _ = reply.send(sequence);
            }
            SessionCommand::Reset { reply } => {
                self.state.reset();
                self.engine.reset(self.state.grid());
                let _ = reply.send(());
            }
            SessionCommand::LoadFacelets { facelets, reply } => {
                let result = self.state.load_facelets(&facelets).map_err(CubeError::from);
                if result.is_ok() {
                    self.engine.recolor(self.state.grid());
                }
                let _ = reply.send(result);
            }
            SessionCommand::Snapshot { reply } => {
                let _ = reply.send(SessionSnapshot {
                    cube: self.state.snapshot(),
                    pieces: self.engine.views(),
                    idle: self.engine.is_idle(),
                });
            }
            SessionCommand::Solve { reply } => self.spawn_solve(move |result| {
                let _ = reply.send(result);
            }),
            SessionCommand::SolveAndApply { reply } => {
                self.playback = Playback::Solving;
                let outcomes = self.outcomes.clone();
                self.spawn_solve(move |result| {
                    // The owner only goes away on shutdown.
                    let _ = outcomes.send(SolveOutcome { result, reply });
                });
            }
            SessionCommand::Undo { reply } => {
                let undone = self.state.undo();
                if let Some(mv) = undone {
                    self.start_animation(mv.inverse());
                }
                let _ = reply.send(undone);
            }
            SessionCommand::WaitIdle { reply } => self.idle_waiters.push(reply),
            SessionCommand::Shutdown => return false,
        }
        true
    }

    fn apply(&mut self, mv: Move) {
        self.state.apply_move(mv);
        self.start_animation(mv);
    }

    fn start_animation(&mut self, mv: Move) {
        if self.engine.is_idle() {
            self.last_frame = Instant::now();
        }
        self.engine.submit(mv);
        if self.engine.config().duration.is_zero() {
            self.frame();
        }
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        for mv in self.engine.advance(dt, self.state.grid()) {
            let _ = self.events.send(SessionEvent::MoveAnimated { mv });
        }
    }

    fn release_idle_waiters(&mut self) {
        if self.engine.is_idle() {
            for waiter in self.idle_waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }

    /// Solve the current grid off the owner task and pass the result to `finish`.
    fn spawn_solve<F>(&self, finish: F)
    where
        F: FnOnce(Result<Solution, CubeError>) + Send + 'static,
    {
        let grid = *self.state.grid();
        let coordinator = Arc::clone(&self.coordinator);
        let events = self.events.clone();
        tokio::spawn(async move {
            let sink = move |progress: SolveProgress| {
                let _ = events.send(SessionEvent::SolveProgress(progress));
            };
            let result = coordinator.solve(grid, &sink).await;
            if let Err(ref e) = result {
                tracing::warn!("Solve failed: {e}");
            }
            finish(result);
        });
    }

    fn play_solution(&mut self, outcome: SolveOutcome) {
        let SolveOutcome { result, reply } = outcome;
        match &result {
            Ok(solution) => {
                tracing::info!("Playing {} solution moves", solution.moves.len());
                for &mv in &solution.moves {
                    self.apply(mv);
                }
                self.playback = Playback::Playing;
            }
            Err(_) => self.playback = Playback::Idle,
        }
        let _ = reply.send(result);
    }
}
