//! # Solver Contract
//!
//! The search algorithm lives outside this crate. A [`Solver`] receives a
//! facelet snapshot and eventually returns move tokens that should bring that
//! snapshot to the solved configuration.
//!
//! [`SolveCoordinator`] wraps a solver with the behaviour hosts rely on:
//!
//! ```text
//! solve(grid)
//!   ├─ another solve in flight ────▶ Err(SolverBusy)
//!   ├─ already solved ─────────────▶ Ok(empty solution), solver not called
//!   ├─ no solver attached ─────────▶ Err(SolverUnavailable)
//!   └─ preparing → analyzing → [solver: solving] → complete
//!        tokens parsed leniently, then replayed on a scratch grid
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CubeError, CubeResult};
use crate::facelet;
use crate::grid::StickerGrid;
use crate::moves;
use crate::notation::Move;

/// Milestones reported while solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStage {
    /// Snapshotting the cube.
    Preparing,
    /// Handing the snapshot to the solver.
    Analyzing,
    /// The solver is searching.
    Solving,
    /// A solution is ready.
    Complete,
}

impl SolveStage {
    /// Nominal completion fraction for this stage.
    #[must_use]
    pub const fn fraction(self) -> f32 {
        match self {
            Self::Preparing => 0.1,
            Self::Analyzing => 0.3,
            Self::Solving => 0.5,
            Self::Complete => 1.0,
        }
    }

    /// Default human-readable message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing cube state",
            Self::Analyzing => "Analyzing cube state",
            Self::Solving => "Computing solution",
            Self::Complete => "Solution ready",
        }
    }
}

/// A progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveProgress {
    /// Current stage.
    pub stage: SolveStage,
    /// Message for display.
    pub message: String,
    /// Fraction in `0.0..=1.0`.
    pub fraction: f32,
}

impl SolveProgress {
    /// Progress record with the stage's default message and fraction.
    #[must_use]
    pub fn at(stage: SolveStage) -> Self {
        Self {
            stage,
            message: stage.message().to_string(),
            fraction: stage.fraction(),
        }
    }
}

/// Receives progress records. Closures work directly.
pub trait ProgressSink: Send + Sync {
    /// Called at each milestone.
    fn report(&self, progress: SolveProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(SolveProgress) + Send + Sync,
{
    fn report(&self, progress: SolveProgress) {
        self(progress);
    }
}

/// Sink that drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: SolveProgress) {}
}

/// External solving collaborator.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Solve the cube described by a 54-character facelet string.
    ///
    /// # Errors
    ///
    /// Implementations return [`CubeError::SolverFailed`] when no solution
    /// can be produced.
    async fn solve(&self, facelets: &str, progress: &dyn ProgressSink) -> CubeResult<Vec<String>>;
}

/// Result of a coordinated solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Parsed moves, in application order.
    pub moves: Vec<Move>,
    /// Tokens from the solver that failed validation.
    pub ignored: Vec<String>,
    /// Whether replaying `moves` on the input actually solves it.
    pub verified: bool,
}

impl Solution {
    fn empty() -> Self {
        Self {
            moves: Vec::new(),
            ignored: Vec::new(),
            verified: true,
        }
    }
}

/// Enforces the solver contract around an optional [`Solver`].
///
/// Each solve takes a fresh ticket and holds the lock while `active` equals
/// that ticket. Zero means idle.
#[derive(Default)]
pub struct SolveCoordinator {
    solver: Option<Arc<dyn Solver>>,
    active: AtomicU64,
    tickets: AtomicU64,
}

/// Releases the lock on drop, unless it was cancelled and retaken since.
struct BusyGuard<'a> {
    active: &'a AtomicU64,
    ticket: u64,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let _ = self
            .active
            .compare_exchange(self.ticket, 0, Ordering::AcqRel, Ordering::Acquire);
    }
}

impl SolveCoordinator {
    /// Coordinator with no solver attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinator backed by `solver`.
    #[must_use]
    pub fn with_solver(solver: Arc<dyn Solver>) -> Self {
        Self {
            solver: Some(solver),
            ..Self::default()
        }
    }

    /// Attach or replace the solver.
    pub fn set_solver(&mut self, solver: Arc<dyn Solver>) {
        self.solver = Some(solver);
    }

    /// Whether a solver is attached.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.solver.is_some()
    }

    /// Whether a solve is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::Acquire) != 0
    }

    /// Clear the busy flag so a new solve may start. The abandoned solve
    /// still runs to completion but no longer holds the lock.
    pub fn cancel(&self) {
        self.active.store(0, Ordering::Release);
    }

    fn try_lock(&self) -> Option<BusyGuard<'_>> {
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed) + 1;
        self.active
            .compare_exchange(0, ticket, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                active: &self.active,
                ticket,
            })
    }

    /// Solve `grid`.
    ///
    /// # Errors
    ///
    /// - [`CubeError::SolverBusy`] if another solve is in flight, checked first
    /// - [`CubeError::SolverUnavailable`] if no solver is attached
    /// - whatever the solver itself returns
    pub async fn solve(
        &self,
        grid: StickerGrid,
        progress: &dyn ProgressSink,
    ) -> CubeResult<Solution> {
        if self.is_busy() {
            return Err(CubeError::SolverBusy);
        }

        if grid.is_solved() {
            return Ok(Solution::empty());
        }

        let Some(solver) = self.solver.as_ref() else {
            return Err(CubeError::SolverUnavailable(
                "no solver attached".to_string(),
            ));
        };

        let Some(_guard) = self.try_lock() else {
            return Err(CubeError::SolverBusy);
        };

        progress.report(SolveProgress::at(SolveStage::Preparing));
        let facelets = facelet::encode(&grid);
        tracing::info!("Solving cube from facelets {facelets}");

        progress.report(SolveProgress::at(SolveStage::Analyzing));
        let tokens = solver.solve(&facelets, progress).await?;

        let mut solution = Solution {
            moves: Vec::with_capacity(tokens.len()),
            ignored: Vec::new(),
            verified: false,
        };
        for token in tokens {
            if let Some(mv) = Move::parse(&token) {
                solution.moves.push(mv);
            } else {
                tracing::warn!("Solver returned invalid token {token:?}");
                solution.ignored.push(token);
            }
        }

        let mut scratch = grid;
        for &mv in &solution.moves {
            moves::permute(&mut scratch, mv);
        }
        solution.verified = scratch.is_solved();
        if !solution.verified {
            tracing::warn!("Solution does not solve the cube");
        }

        progress.report(SolveProgress {
            message: format!("Solution ready ({} moves)", solution.moves.len()),
            ..SolveProgress::at(SolveStage::Complete)
        });
        Ok(solution)
    }
}

impl std::fmt::Debug for SolveCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolveCoordinator")
            .field("available", &self.is_available())
            .field("busy", &self.is_busy())
            .finish()
    }
}
