//! Text and JSON output.

use cube_core::notation::format_sequence;
use cube_core::{CubeError, CubeSnapshot, Face, Move, StickerGrid};
use serde::Serialize;

/// Unfolded cube net, one letter per sticker.
///
/// ```text
///        U U U
///        U U U
///        U U U
/// L L L  F F F  R R R  B B B
/// L L L  F F F  R R R  B B B
/// L L L  F F F  R R R  B B B
///        D D D
///        D D D
///        D D D
/// ```
#[must_use]
pub fn net(grid: &StickerGrid) -> String {
    let row = |face: Face, r: usize| -> String {
        grid.face(face)[r]
            .iter()
            .map(|c| c.letter().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let pad = " ".repeat(7);

    let mut lines = Vec::with_capacity(9);
    for r in 0..3 {
        lines.push(format!("{pad}{}", row(Face::U, r)));
    }
    for r in 0..3 {
        lines.push(
            [Face::L, Face::F, Face::R, Face::B]
                .iter()
                .map(|&f| row(f, r))
                .collect::<Vec<_>>()
                .join("  "),
        );
    }
    for r in 0..3 {
        lines.push(format!("{pad}{}", row(Face::D, r)));
    }
    lines.join("\n")
}

/// Result of a command that ends with a cube state.
#[derive(Debug, Clone, Serialize)]
pub struct CubeReport {
    /// Final state.
    #[serde(flatten)]
    pub cube: CubeSnapshot,
    /// Tokens skipped while parsing input.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
}

impl CubeReport {
    /// Multi-line human-readable report with the net.
    ///
    /// # Errors
    ///
    /// Returns [`CubeError::Format`] if the snapshot's facelets are corrupt.
    pub fn to_text(&self) -> Result<String, CubeError> {
        let grid = cube_core::decode(&self.cube.facelets)?;
        let history = if self.cube.history.is_empty() {
            "(none)".to_string()
        } else {
            format_sequence(&self.cube.history)
        };
        let mut out = format!(
            "{}\n\nfacelets: {}\nsolved:   {}\nhistory:  {}",
            net(&grid),
            self.cube.facelets,
            if self.cube.solved { "yes" } else { "no" },
            history
        );
        if !self.ignored.is_empty() {
            out.push_str(&format!("\nignored:  {}", self.ignored.join(", ")));
        }
        Ok(out)
    }
}

/// Result of inverting a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InverseReport {
    /// The inverse, in application order.
    pub moves: Vec<Move>,
    /// Tokens skipped while parsing input.
    pub ignored: Vec<String>,
}

impl InverseReport {
    /// Notation line, plus a note on skipped tokens.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = cube_core::notation::to_notation(&self.moves);
        if !self.ignored.is_empty() {
            out.push_str(&format!("\n(ignored: {})", self.ignored.join(", ")));
        }
        out
    }
}
