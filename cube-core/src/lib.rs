//! # Saorsa Cube Core
//!
//! Logical model of a 3×3×3 twisty puzzle: the 54-sticker grid, move
//! notation, the facelet wire format and the solver contract.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 cube-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Move Notation   │  Facelet Codec           │
//! │  - validate      │  - encode (URFDLB)       │
//! │  - parse/format  │  - decode (strict)       │
//! │  - invert        │                          │
//! ├─────────────────────────────────────────────┤
//! │  Cube State      │  Solver Contract         │
//! │  - move tables   │  - async Solver trait    │
//! │  - history       │  - busy/unavailable      │
//! │  - scramble      │  - progress milestones   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Geometry is deliberately absent here; `cube-spatial` projects this
//! state onto 26 pieces in 3D.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod error;
pub mod facelet;
pub mod grid;
pub mod moves;
pub mod notation;
pub mod scramble;
pub mod solver;
pub mod state;

pub use color::{Color, Face};
pub use error::{CubeError, CubeResult, FormatError};
pub use facelet::{decode, encode, FACELET_LEN, SOLVED_FACELETS};
pub use grid::{Cell, StickerGrid, STICKER_COUNT};
pub use notation::{Move, Turn};
pub use scramble::{ScrambleConfig, DEFAULT_SCRAMBLE_LENGTH};
pub use solver::{
    NoProgress, ProgressSink, SolveCoordinator, SolveProgress, SolveStage, Solution, Solver,
};
pub use state::{ApplyReport, CubeSnapshot, CubeState, OnChangeCallback};

/// Cube core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
