//! # Saorsa Cube Spatial
//!
//! The geometric half of the cube: 26 pieces on an integer lattice, layer
//! turns as exact rotations, and reverse lookup from piece geometry back to
//! the logical sticker grid.
//!
//! ## Data Flow
//!
//! ```text
//!   CubeState (cube-core)              SpatialLayerEngine
//!  ┌────────────────────┐   grid    ┌──────────────────────────┐
//!  │ apply_move(mv)     │ ────────▶ │ submit(mv)               │
//!  │ 54-sticker grid    │           │ advance(dt, grid)        │
//!  └────────────────────┘           │   select → rotate →      │
//!                                   │   recolor (lookup)       │
//!                                   │ views() → PieceView[26]  │
//!                                   └──────────────────────────┘
//! ```
//!
//! The logical model is always updated first. The engine may lag behind it
//! while animations run but never gets ahead.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod engine;
pub mod error;
pub mod math;
pub mod piece;
pub mod projection;

pub use animation::AnimationConfig;
pub use engine::{
    layer_selector, transition, EngineEvent, EngineState, GeometryMismatch, MismatchKind,
    RecolorReport, SpatialLayerEngine,
};
pub use error::{SpatialError, SpatialResult};
pub use math::{Axis, IVec3, Mat3, Mat4, Rotation, Vec3};
pub use piece::{Paint, Piece, PieceId, PieceKind, PieceView, LOCAL_FACES, PIECE_COUNT};
pub use projection::{descriptor, lookup, FaceDescriptor, Lookup, DIRECTION_THRESHOLD};
