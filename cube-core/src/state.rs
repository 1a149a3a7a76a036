//! Logical cube state management.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{Color, Face};
use crate::error::{CubeError, CubeResult, FormatError};
use crate::facelet;
use crate::grid::StickerGrid;
use crate::moves;
use crate::notation::{self, Move};
use crate::scramble::ScrambleConfig;

/// Callback invoked after every externally visible mutation.
///
/// It receives no payload; observers re-read the state they care about.
pub type OnChangeCallback = Box<dyn Fn() + Send + Sync>;

/// Outcome of applying a batch of move tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Moves that were applied, in order.
    pub applied: Vec<Move>,
    /// Tokens that failed validation and were skipped.
    pub ignored: Vec<String>,
}

impl ApplyReport {
    /// Number of skipped tokens.
    #[must_use]
    pub fn ignored_count(&self) -> usize {
        self.ignored.len()
    }
}

/// Serializable view of a cube for hosts and solvers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeSnapshot {
    /// 54-character facelet string.
    pub facelets: String,
    /// Whether every face is monochrome.
    pub solved: bool,
    /// Move history.
    pub history: Vec<Move>,
}

impl CubeSnapshot {
    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CubeResult<String> {
        serde_json::to_string(self).map_err(CubeError::Serialization)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CubeResult<Self> {
        serde_json::from_str(json).map_err(CubeError::Serialization)
    }
}

/// The authoritative sticker model plus its move history.
///
/// All mutation goes through validated moves, [`CubeState::reset`],
/// [`CubeState::scramble`] or [`CubeState::load_facelets`], so the grid
/// is a valid 54-sticker assignment at every step.
pub struct CubeState {
    grid: StickerGrid,
    history: Vec<Move>,
    on_change: Option<OnChangeCallback>,
}

impl CubeState {
    /// A solved cube with empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: StickerGrid::solved(),
            history: Vec::new(),
            on_change: None,
        }
    }

    /// Install the change observer, replacing any previous one.
    pub fn set_on_change<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(callback));
    }

    /// Remove the change observer.
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    fn notify(&self) {
        if let Some(ref callback) = self.on_change {
            callback();
        }
    }

    /// Return to the home-solved assignment and clear history.
    pub fn reset(&mut self) {
        self.grid = StickerGrid::solved();
        self.history.clear();
        tracing::info!("Cube reset");
        self.notify();
    }

    /// Apply one validated move.
    pub fn apply_move(&mut self, mv: Move) {
        moves::permute(&mut self.grid, mv);
        self.history.push(mv);
        tracing::debug!(mv = %mv, history_len = self.history.len(), "Applied move");
        self.notify();
    }

    /// Apply one move given as text.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::InvalidMoveToken`] if the token fails validation.
    /// The state is left untouched and no notification fires.
    pub fn apply_token(&mut self, token: &str) -> CubeResult<Move> {
        let Some(mv) = Move::parse(token) else {
            tracing::warn!("Attempted to apply invalid move: {token:?}");
            return Err(CubeError::InvalidMoveToken(token.to_string()));
        };
        self.apply_move(mv);
        Ok(mv)
    }

    /// Apply moves in order, one notification per move.
    pub fn apply_moves(&mut self, moves: &[Move]) {
        for &mv in moves {
            self.apply_move(mv);
        }
    }

    /// Apply tokens in order, skipping the invalid ones.
    ///
    /// Not atomic: every valid token before and after a bad one is applied.
    pub fn apply_tokens<'a, I>(&mut self, tokens: I) -> ApplyReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = ApplyReport::default();
        for token in tokens {
            match self.apply_token(token) {
                Ok(mv) => report.applied.push(mv),
                Err(_) => report.ignored.push(token.to_string()),
            }
        }
        report
    }

    /// Apply a whitespace-separated move sequence, skipping bad tokens.
    pub fn apply_notation(&mut self, text: &str) -> ApplyReport {
        self.apply_tokens(text.split_whitespace())
    }

    /// Undo the last history entry by applying its inverse.
    ///
    /// Both entries are dropped from history. Returns the undone move.
    pub fn undo(&mut self) -> Option<Move> {
        let last = self.history.pop()?;
        moves::permute(&mut self.grid, last.inverse());
        tracing::debug!(mv = %last, "Undid move");
        self.notify();
        Some(last)
    }

    /// Generate a scramble of `length` moves and apply it.
    ///
    /// History is replaced by exactly the scramble.
    pub fn generate_scramble(&mut self, length: usize) -> Vec<Move> {
        self.scramble(&ScrambleConfig::with_length(length))
    }

    /// Generate a scramble from `config` and apply it.
    ///
    /// The grid is updated move by move, history is replaced by the
    /// scramble, and a single notification fires at the end.
    pub fn scramble(&mut self, config: &ScrambleConfig) -> Vec<Move> {
        let sequence = config.generate();
        for &mv in &sequence {
            moves::permute(&mut self.grid, mv);
        }
        self.history.clone_from(&sequence);
        tracing::info!(
            "Generated and applied scramble: {}",
            notation::to_notation(&sequence)
        );
        self.notify();
        sequence
    }

    /// Overwrite the grid from a facelet string. History is kept.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] for malformed input; the state is unchanged.
    pub fn load_facelets(&mut self, facelets: &str) -> Result<(), FormatError> {
        match facelet::decode(facelets) {
            Ok(grid) => {
                self.grid = grid;
                tracing::debug!("Loaded facelets {facelets}");
                self.notify();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected facelet string: {e}");
                Err(e)
            }
        }
    }

    /// Whether every face is monochrome, regardless of which color.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.grid.is_solved()
    }

    /// Sticker color at a face/row/column.
    #[must_use]
    pub fn color(&self, face: Face, row: usize, col: usize) -> Color {
        self.grid.color(face, row, col)
    }

    /// The sticker grid.
    #[must_use]
    pub fn grid(&self) -> &StickerGrid {
        &self.grid
    }

    /// Applied moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Current facelet string.
    #[must_use]
    pub fn facelets(&self) -> String {
        facelet::encode(&self.grid)
    }

    /// Snapshot for serialization.
    #[must_use]
    pub fn snapshot(&self) -> CubeSnapshot {
        CubeSnapshot {
            facelets: self.facelets(),
            solved: self.is_solved(),
            history: self.history.clone(),
        }
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubeState")
            .field("facelets", &self.facelets())
            .field("history", &self.history)
            .field("has_observer", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}
