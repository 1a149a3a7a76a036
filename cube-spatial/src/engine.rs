//! # Spatial Layer Engine
//!
//! Owns the 26 [`Piece`]s, turns layers, and repaints stickers from the
//! logical [`StickerGrid`].
//!
//! ## Lifecycle of a queued move
//!
//! ```text
//!          submit(mv)                    advance(dt, grid)
//!              │
//!              ▼
//!   ┌──────┐ Dequeue ┌───────────┐ LayerSelected ┌──────────┐
//!   │ Idle │────────▶│ Selecting │──────────────▶│ Rotating │◀─┐ Progress(p < 1)
//!   └──────┘         └───────────┘               └──────────┘──┘
//!      ▲                                              │ Progress(1.0)
//!      │ Recolored          ┌────────────┐            │
//!      └────────────────────│ Recoloring │◀───────────┘
//!                           └────────────┘
//! ```
//!
//! The layer is selected when its animation starts, never cached across
//! moves. The discrete turn lands atomically at the end of the animation and
//! is followed immediately by a recolor, so pieces are never observed in a
//! half-updated state. Colors are never authored here: every recolor reads
//! them back from the grid through [`crate::projection::lookup`].

use std::collections::VecDeque;
use std::time::Duration;

use cube_core::{Face, Move, StickerGrid, Turn};
use tracing::{debug, warn};

use crate::animation::{layer_frame, AnimationConfig};
use crate::error::{SpatialError, SpatialResult};
use crate::math::{IVec3, Mat4, Rotation, Vec3};
use crate::piece::{solved_pieces, Paint, Piece, PieceId, PieceView, PIECE_COUNT};
use crate::projection::{descriptor, lookup, Lookup, RawCell};

/// Engine phase.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    /// Nothing in flight.
    Idle,
    /// A move was dequeued and its layer is being chosen.
    Selecting(Move),
    /// A layer is animating.
    Rotating {
        /// Move being animated.
        mv: Move,
        /// Pieces in the turning layer.
        layer: Vec<PieceId>,
        /// Animation progress in `0.0..=1.0`.
        progress: f32,
    },
    /// The turn has landed and stickers are being repainted.
    Recoloring(Move),
}

impl EngineState {
    /// The move currently being processed, if any.
    #[must_use]
    pub fn current_move(&self) -> Option<Move> {
        match self {
            Self::Idle => None,
            Self::Selecting(mv) | Self::Recoloring(mv) | Self::Rotating { mv, .. } => Some(*mv),
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Next move taken from the queue.
    Dequeue(Move),
    /// Layer membership computed.
    LayerSelected(Vec<PieceId>),
    /// Animation progressed to this fraction.
    Progress(f32),
    /// Recolor finished.
    Recolored,
}

/// Pure transition function. `None` for events that make no sense in the
/// current state.
#[must_use]
pub fn transition(state: &EngineState, event: EngineEvent) -> Option<EngineState> {
    match (state, event) {
        (EngineState::Idle, EngineEvent::Dequeue(mv)) => Some(EngineState::Selecting(mv)),
        (EngineState::Selecting(mv), EngineEvent::LayerSelected(layer)) => {
            Some(EngineState::Rotating {
                mv: *mv,
                layer,
                progress: 0.0,
            })
        }
        (EngineState::Rotating { mv, layer, .. }, EngineEvent::Progress(p)) => {
            if p >= 1.0 {
                Some(EngineState::Recoloring(*mv))
            } else {
                Some(EngineState::Rotating {
                    mv: *mv,
                    layer: layer.clone(),
                    progress: p.max(0.0),
                })
            }
        }
        (EngineState::Recoloring(_), EngineEvent::Recolored) => Some(EngineState::Idle),
        _ => None,
    }
}

/// Predicate selecting the pieces currently in `face`'s outer layer.
#[must_use]
pub fn layer_selector(face: Face) -> impl Fn(&Piece) -> bool {
    let normal = descriptor(face).normal;
    move |piece| piece.position().dot(&normal) == 1
}

/// Exact rotation performed by turning `face` by `turn`.
#[must_use]
pub fn layer_rotation(face: Face, turn: Turn) -> Rotation {
    // Clockwise seen from outside is clockwise about the outward normal,
    // i.e. negative under the right-hand rule.
    Rotation::about(descriptor(face).normal, -turn.signed_quarter_turns())
}

/// Why one sticker could not be mapped cleanly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MismatchKind {
    /// Direction was too far from every face normal; painted hidden.
    Unaligned {
        /// Closest face.
        nearest: Face,
        /// Dot product with its normal.
        dot: f32,
    },
    /// Position fell outside the grid; painted from the clamped cell.
    Clamped(RawCell),
}

/// A sticker whose geometry disagreed with the face layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryMismatch {
    /// Offending piece.
    pub piece: PieceId,
    /// Local face index on that piece.
    pub local_face: usize,
    /// What went wrong.
    pub kind: MismatchKind,
}

/// Summary of one recolor pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecolorReport {
    /// Stickers painted with a color.
    pub painted: usize,
    /// Stickers that could not be mapped cleanly.
    pub mismatches: Vec<GeometryMismatch>,
}

impl RecolorReport {
    /// Whether every sticker mapped cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// The geometric half of the cube.
#[derive(Debug, Clone)]
pub struct SpatialLayerEngine {
    pieces: Vec<Piece>,
    state: EngineState,
    queue: VecDeque<Move>,
    config: AnimationConfig,
    elapsed: Duration,
    last_report: RecolorReport,
}

impl Default for SpatialLayerEngine {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl SpatialLayerEngine {
    /// Solved engine, painted from a solved grid.
    #[must_use]
    pub fn new(config: AnimationConfig) -> Self {
        let mut engine = Self {
            pieces: solved_pieces(),
            state: EngineState::Idle,
            queue: VecDeque::new(),
            config,
            elapsed: Duration::ZERO,
            last_report: RecolorReport::default(),
        };
        engine.recolor(&StickerGrid::solved());
        engine
    }

    /// All pieces, in id order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Look up a piece by id.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(usize::from(id.0))
    }

    /// The piece currently occupying `position`.
    #[must_use]
    pub fn piece_at(&self, position: IVec3) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.position() == position)
    }

    /// Current phase.
    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Animation settings.
    #[must_use]
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Report from the most recent recolor.
    #[must_use]
    pub fn last_report(&self) -> &RecolorReport {
        &self.last_report
    }

    /// Nothing animating and nothing queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == EngineState::Idle && self.queue.is_empty()
    }

    /// Moves waiting behind the one in flight, in order.
    pub fn pending(&self) -> impl Iterator<Item = &Move> {
        self.queue.iter()
    }

    /// Number of moves waiting.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Ids of the pieces in `face`'s layer right now.
    #[must_use]
    pub fn select_layer(&self, face: Face) -> Vec<PieceId> {
        let selector = layer_selector(face);
        self.pieces
            .iter()
            .filter(|p| selector(*p))
            .map(Piece::id)
            .collect()
    }

    /// Turn `face`'s layer immediately, without animation or recolor.
    /// Returns the number of pieces moved (9 on a consistent cube).
    pub fn rotate_layer(&mut self, face: Face, turn: Turn) -> usize {
        let op = layer_rotation(face, turn);
        let selector = layer_selector(face);
        let mut moved = 0;
        for piece in self.pieces.iter_mut().filter(|p| selector(&**p)) {
            piece.turn(&op);
            moved += 1;
        }
        if moved == 9 {
            debug!("Rotated layer {face}{}", turn.suffix());
        } else {
            warn!("Layer {face} selected {moved} pieces, expected 9");
        }
        moved
    }

    /// Turn and repaint in one step.
    pub fn apply_move(&mut self, mv: Move, grid: &StickerGrid) -> RecolorReport {
        self.rotate_layer(mv.face, mv.turn);
        self.recolor(grid)
    }

    /// Repaint every sticker from `grid`.
    pub fn recolor(&mut self, grid: &StickerGrid) -> RecolorReport {
        self.recolor_posed(grid, |piece, index| {
            (
                piece.position().as_vec3(),
                piece.world_direction(index).as_vec3(),
            )
        })
    }

    /// Repaint with sticker geometry supplied by `pose`, which maps a piece
    /// and local face to a world position and outward direction.
    fn recolor_posed<F>(&mut self, grid: &StickerGrid, pose: F) -> RecolorReport
    where
        F: Fn(&Piece, usize) -> (Vec3, Vec3),
    {
        let mut report = RecolorReport::default();

        for piece in &mut self.pieces {
            for index in 0..6 {
                if !piece.has_sticker(index) {
                    piece.set_paint(index, Paint::Hidden);
                    continue;
                }
                let (position, direction) = pose(piece, index);
                let paint = match lookup(position, direction) {
                    Lookup::Hit(cell) => Paint::Sticker(grid.at(cell)),
                    Lookup::Clamped { cell, raw } => {
                        report.mismatches.push(GeometryMismatch {
                            piece: piece.id(),
                            local_face: index,
                            kind: MismatchKind::Clamped(raw),
                        });
                        Paint::Sticker(grid.at(cell))
                    }
                    Lookup::Unaligned { nearest, dot } => {
                        report.mismatches.push(GeometryMismatch {
                            piece: piece.id(),
                            local_face: index,
                            kind: MismatchKind::Unaligned { nearest, dot },
                        });
                        Paint::Hidden
                    }
                };
                if matches!(paint, Paint::Sticker(_)) {
                    report.painted += 1;
                }
                piece.set_paint(index, paint);
            }
        }

        for mismatch in &report.mismatches {
            debug!("Geometry mismatch: {mismatch:?}");
        }
        self.last_report = report.clone();
        report
    }

    /// Queue a move for animation.
    pub fn submit(&mut self, mv: Move) {
        debug!("Queued {mv} ({} pending)", self.queue.len() + 1);
        self.queue.push_back(mv);
    }

    /// Queue a sequence of moves.
    pub fn submit_all(&mut self, moves: &[Move]) {
        for &mv in moves {
            self.submit(mv);
        }
    }

    /// Parse and queue one notation token.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::Core`] if the token is malformed.
    pub fn submit_token(&mut self, token: &str) -> SpatialResult<Move> {
        let mv: Move = token.parse()?;
        self.submit(mv);
        Ok(mv)
    }

    /// Discard queued moves that have not started. The move in flight, if
    /// any, still completes.
    pub fn drop_pending(&mut self) -> Vec<Move> {
        let dropped: Vec<Move> = self.queue.drain(..).collect();
        if !dropped.is_empty() {
            debug!("Dropped {} pending moves", dropped.len());
        }
        dropped
    }

    /// Advance animations by `dt`, repainting from `grid` whenever a turn
    /// lands. Leftover time after a turn completes flows into the next
    /// queued move. Returns the moves completed during this call.
    pub fn advance(&mut self, dt: Duration, grid: &StickerGrid) -> Vec<Move> {
        let mut budget = dt;
        let mut completed = Vec::new();

        loop {
            let event = match &self.state {
                EngineState::Idle => match self.queue.pop_front() {
                    Some(mv) => {
                        self.elapsed = Duration::ZERO;
                        EngineEvent::Dequeue(mv)
                    }
                    None => break,
                },
                EngineState::Selecting(mv) => EngineEvent::LayerSelected(self.select_layer(mv.face)),
                EngineState::Rotating { .. } => {
                    let remaining = self.config.duration.saturating_sub(self.elapsed);
                    if budget.is_zero() && !remaining.is_zero() {
                        break;
                    }
                    let step = budget.min(remaining);
                    self.elapsed += step;
                    budget -= step;
                    EngineEvent::Progress(self.config.progress(self.elapsed))
                }
                EngineState::Recoloring(mv) => {
                    let mv = *mv;
                    self.apply_move(mv, grid);
                    completed.push(mv);
                    EngineEvent::Recolored
                }
            };

            let Some(next) = transition(&self.state, event) else {
                warn!("Invalid engine transition from {:?}", self.state);
                break;
            };
            self.state = next;
        }

        completed
    }

    /// Run until idle, however long the queued animations take.
    pub fn finish(&mut self, grid: &StickerGrid) -> Vec<Move> {
        let total = self
            .config
            .duration
            .saturating_mul(u32::try_from(self.queue.len() + 1).unwrap_or(u32::MAX));
        self.advance(total, grid)
    }

    /// Put every piece back home, clear the queue, repaint from `grid`.
    pub fn reset(&mut self, grid: &StickerGrid) {
        for piece in &mut self.pieces {
            piece.reset();
        }
        self.queue.clear();
        self.state = EngineState::Idle;
        self.elapsed = Duration::ZERO;
        self.recolor(grid);
        debug!("Spatial engine reset");
    }

    /// Render views, including the in-flight layer rotation.
    #[must_use]
    pub fn views(&self) -> Vec<PieceView> {
        let spacing = self.config.piece_spacing;
        let animating = match &self.state {
            EngineState::Rotating {
                mv,
                layer,
                progress,
            } => Some((
                Mat4::from_rotation_translation(&layer_frame(*mv, *progress), Vec3::zero()),
                layer,
            )),
            _ => None,
        };

        self.pieces
            .iter()
            .map(|piece| {
                let base = piece.transform(spacing);
                let transform = match &animating {
                    Some((frame, layer)) if layer.contains(&piece.id()) => frame.mul(&base),
                    _ => base,
                };
                PieceView {
                    id: piece.id(),
                    transform,
                    faces: piece.paints(),
                }
            })
            .collect()
    }

    /// Check that poses still describe a cube: every cell occupied once and
    /// every sticker pointing out of its piece's cell.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::Desync`] describing the first violation.
    pub fn verify(&self) -> SpatialResult<()> {
        if self.pieces.len() != PIECE_COUNT {
            return Err(SpatialError::Desync(format!(
                "{} pieces, expected {PIECE_COUNT}",
                self.pieces.len()
            )));
        }
        let mut seen = std::collections::HashSet::with_capacity(PIECE_COUNT);
        for piece in &self.pieces {
            let pos = piece.position();
            if pos == IVec3::zero() || !seen.insert(pos) {
                return Err(SpatialError::Desync(format!(
                    "piece {} at occupied or interior cell {pos}",
                    piece.id().0
                )));
            }
            if pos.nonzero_count() != piece.home().nonzero_count() {
                return Err(SpatialError::Desync(format!(
                    "piece {} changed kind at {pos}",
                    piece.id().0
                )));
            }
            for index in piece.sticker_faces() {
                if pos.dot(&piece.world_direction(index)) != 1 {
                    return Err(SpatialError::Desync(format!(
                        "piece {} sticker {index} points inward at {pos}",
                        piece.id().0
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cube_core::notation::parse_sequence;
    use cube_core::{moves, Color, CubeState};

    fn instant() -> SpatialLayerEngine {
        SpatialLayerEngine::new(AnimationConfig::instant())
    }

    fn mv(token: &str) -> Move {
        Move::parse(token).expect("valid token")
    }

    // ===========================================
    // State Machine
    // ===========================================

    #[test]
    fn test_transition_happy_path() {
        let m = mv("R");
        let s = transition(&EngineState::Idle, EngineEvent::Dequeue(m)).unwrap();
        assert_eq!(s, EngineState::Selecting(m));
        let s = transition(&s, EngineEvent::LayerSelected(vec![PieceId(1)])).unwrap();
        assert!(matches!(s, EngineState::Rotating { progress, .. } if progress.abs() < 1e-6));
        let s = transition(&s, EngineEvent::Progress(0.5)).unwrap();
        assert!(matches!(s, EngineState::Rotating { progress, .. } if (progress - 0.5).abs() < 1e-6));
        let s = transition(&s, EngineEvent::Progress(1.0)).unwrap();
        assert_eq!(s, EngineState::Recoloring(m));
        let s = transition(&s, EngineEvent::Recolored).unwrap();
        assert_eq!(s, EngineState::Idle);
    }

    #[test]
    fn test_transition_rejects_out_of_order_events() {
        assert!(transition(&EngineState::Idle, EngineEvent::Recolored).is_none());
        assert!(transition(&EngineState::Idle, EngineEvent::Progress(0.3)).is_none());
        let selecting = EngineState::Selecting(mv("U"));
        assert!(transition(&selecting, EngineEvent::Dequeue(mv("F"))).is_none());
    }

    // ===========================================
    // Layer Rotation
    // ===========================================

    #[test]
    fn test_every_layer_has_nine_pieces() {
        let engine = instant();
        for face in Face::ALL {
            assert_eq!(engine.select_layer(face).len(), 9, "{face}");
        }
    }

    #[test]
    fn test_r_turn_moves_front_corner_to_back() {
        let mut engine = instant();
        let corner = engine.piece_at(IVec3::new(1, 1, 1)).unwrap().id();
        let up_face_before = engine.piece_at(IVec3::new(1, 1, -1)).unwrap().id();

        assert_eq!(engine.rotate_layer(Face::R, Turn::Clockwise), 9);

        assert_eq!(engine.piece(corner).unwrap().position(), IVec3::new(1, 1, -1));
        assert_eq!(
            engine.piece(up_face_before).unwrap().position(),
            IVec3::new(1, -1, -1)
        );
        engine.verify().unwrap();
    }

    #[test]
    fn test_layer_is_recomputed_after_each_turn() {
        let mut engine = instant();
        let before = engine.select_layer(Face::U);
        engine.rotate_layer(Face::R, Turn::Clockwise);
        let after = engine.select_layer(Face::U);
        assert_eq!(after.len(), 9);
        assert_ne!(before, after);
    }

    #[test]
    fn test_four_turns_restore_poses() {
        let mut engine = instant();
        for face in Face::ALL {
            for _ in 0..4 {
                engine.rotate_layer(face, Turn::Clockwise);
            }
        }
        for piece in engine.pieces() {
            assert_eq!(piece.position(), piece.home());
            assert_eq!(piece.rotation(), Rotation::identity());
        }
    }

    // ===========================================
    // Recolor
    // ===========================================

    #[test]
    fn test_solved_paint() {
        let engine = instant();
        assert!(engine.last_report().is_clean());
        assert_eq!(engine.last_report().painted, 54);
        for piece in engine.pieces() {
            for (index, paint) in piece.paints().iter().enumerate() {
                if piece.has_sticker(index) {
                    let dir = piece.world_direction(index);
                    let face = Face::ALL
                        .into_iter()
                        .find(|&f| descriptor(f).normal == dir)
                        .unwrap();
                    assert_eq!(*paint, Paint::Sticker(Color::home(face)));
                } else {
                    assert_eq!(*paint, Paint::Hidden);
                }
            }
        }
    }

    #[test]
    fn test_recolor_tracks_logical_turn() {
        let mut state = CubeState::new();
        let mut engine = instant();
        for m in parse_sequence("R U F' D2 L B'") {
            state.apply_move(m);
            let report = engine.apply_move(m, state.grid());
            assert!(report.is_clean());
            assert_eq!(report.painted, 54);
        }
        engine.verify().unwrap();

        // Every painted sticker reads back the grid at its cell.
        for piece in engine.pieces() {
            for index in piece.sticker_faces() {
                let Lookup::Hit(cell) = lookup(
                    piece.position().as_vec3(),
                    piece.world_direction(index).as_vec3(),
                ) else {
                    panic!("sticker off grid");
                };
                assert_eq!(piece.paints()[index], Paint::Sticker(state.grid().at(cell)));
            }
        }
    }

    #[test]
    fn test_recolor_follows_grid_not_geometry() {
        let mut engine = instant();
        let mut grid = StickerGrid::solved();
        moves::permute(&mut grid, mv("F"));
        // Geometry untouched, grid turned: painting still reads the grid.
        let report = engine.recolor(&grid);
        assert!(report.is_clean());
        let ufr = engine.piece_at(IVec3::new(1, 1, 1)).unwrap();
        assert_eq!(ufr.paints()[2], Paint::Sticker(grid.color(Face::U, 2, 2)));
    }

    #[test]
    fn test_recolor_reports_skewed_stickers() {
        let mut engine = instant();
        let grid = StickerGrid::solved();
        let ufr = engine.piece_at(IVec3::new(1, 1, 1)).unwrap();
        let ufr_id = ufr.id();
        let index_toward = |dir: IVec3| {
            ufr.sticker_faces()
                .find(|&i| ufr.world_direction(i) == dir)
                .unwrap()
        };
        let up_index = index_toward(IVec3::new(0, 1, 0));
        let right_index = index_toward(IVec3::new(1, 0, 0));

        // Tilt the U sticker off its face; push the R sticker past the top edge.
        let report = engine.recolor_posed(&grid, |piece, index| {
            let position = piece.position().as_vec3();
            let direction = piece.world_direction(index).as_vec3();
            if piece.id() != ufr_id {
                (position, direction)
            } else if index == up_index {
                (position, Vec3::new(0.6, 0.75, 0.0))
            } else if index == right_index {
                (Vec3::new(1.0, 2.0, 1.0), direction)
            } else {
                (position, direction)
            }
        });

        assert_eq!(report.painted, 53);
        assert_eq!(report.mismatches.len(), 2);
        assert_eq!(engine.last_report(), &report);

        let unaligned = report
            .mismatches
            .iter()
            .find(|m| m.local_face == up_index)
            .unwrap();
        assert_eq!(unaligned.piece, ufr_id);
        assert!(matches!(
            unaligned.kind,
            MismatchKind::Unaligned { nearest: Face::U, dot } if dot < 0.8
        ));

        let clamped = report
            .mismatches
            .iter()
            .find(|m| m.local_face == right_index)
            .unwrap();
        assert_eq!(clamped.piece, ufr_id);
        assert!(matches!(clamped.kind, MismatchKind::Clamped(raw) if !raw.in_range()));

        let ufr = engine.piece(ufr_id).unwrap();
        assert_eq!(ufr.paints()[up_index], Paint::Hidden);
        assert_eq!(ufr.paints()[right_index], Paint::Sticker(Color::home(Face::R)));
    }

    // ===========================================
    // Queue and Animation
    // ===========================================

    #[test]
    fn test_queue_is_fifo() {
        let mut engine = instant();
        let seq = parse_sequence("R U R' U'");
        engine.submit_all(&seq);
        assert_eq!(engine.pending_len(), 4);
        let done = engine.advance(Duration::ZERO, &StickerGrid::solved());
        assert_eq!(done, seq);
        assert!(engine.is_idle());
    }

    #[test]
    fn test_animation_spans_frames() {
        let mut engine = SpatialLayerEngine::new(AnimationConfig::default());
        let mut state = CubeState::new();
        state.apply_move(mv("U"));
        engine.submit(mv("U"));

        assert!(engine.advance(Duration::from_millis(100), state.grid()).is_empty());
        assert!(matches!(
            engine.state(),
            EngineState::Rotating { progress, .. } if (progress - 0.5).abs() < 1e-3
        ));
        // Pieces have not moved yet; only the views are rotated.
        assert_eq!(
            engine.piece_at(IVec3::new(1, 1, 1)).unwrap().home(),
            IVec3::new(1, 1, 1)
        );

        let done = engine.advance(Duration::from_millis(100), state.grid());
        assert_eq!(done, vec![mv("U")]);
        assert!(engine.is_idle());
        assert!(engine.last_report().is_clean());
    }

    #[test]
    fn test_leftover_time_flows_into_next_move() {
        let mut engine = SpatialLayerEngine::new(AnimationConfig::default());
        engine.submit_all(&parse_sequence("R L"));
        let done = engine.advance(Duration::from_millis(300), &StickerGrid::solved());
        assert_eq!(done, vec![mv("R")]);
        assert!(matches!(
            engine.state(),
            EngineState::Rotating { mv: m, progress, .. } if *m == mv("L") && (progress - 0.5).abs() < 1e-3
        ));
    }

    #[test]
    fn test_drop_pending_keeps_in_flight_move() {
        let mut engine = SpatialLayerEngine::new(AnimationConfig::default());
        let grid = StickerGrid::solved();
        engine.submit_all(&parse_sequence("R U F"));
        engine.advance(Duration::from_millis(10), &grid);

        let dropped = engine.drop_pending();
        assert_eq!(dropped, parse_sequence("U F"));
        assert_eq!(engine.state().current_move(), Some(mv("R")));

        let done = engine.finish(&grid);
        assert_eq!(done, vec![mv("R")]);
        assert!(engine.is_idle());
    }

    #[test]
    fn test_submit_token_rejects_garbage() {
        let mut engine = instant();
        assert!(matches!(
            engine.submit_token("R3"),
            Err(SpatialError::Core(_))
        ));
        assert_eq!(engine.submit_token("B2").unwrap(), mv("B2"));
        assert_eq!(engine.pending_len(), 1);
    }

    #[test]
    fn test_views_rotate_only_the_animating_layer() {
        let mut engine = SpatialLayerEngine::new(AnimationConfig::default());
        engine.submit(mv("R"));
        engine.advance(Duration::from_millis(100), &StickerGrid::solved());

        let spacing = engine.config().piece_spacing;
        let views = engine.views();
        assert_eq!(views.len(), PIECE_COUNT);

        let moving = engine.piece_at(IVec3::new(1, 1, 1)).unwrap().id();
        let still = engine.piece_at(IVec3::new(-1, 1, 1)).unwrap().id();
        let view = |id: PieceId| views.iter().find(|v| v.id == id).unwrap();

        // Halfway through R the up-front-right corner is straight above the R center.
        let c = view(moving).center();
        assert!((c.x - spacing).abs() < 1e-4);
        assert!((c.y - spacing * std::f32::consts::SQRT_2).abs() < 1e-4);
        assert!(c.z.abs() < 1e-4);

        let s = view(still).center();
        assert!((s.x + spacing).abs() < 1e-4);
        assert!((s.z - spacing).abs() < 1e-4);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut engine = instant();
        let mut state = CubeState::new();
        for m in parse_sequence("R U2 F'") {
            state.apply_move(m);
            engine.apply_move(m, state.grid());
        }
        engine.submit(mv("L"));
        state.reset();
        engine.reset(state.grid());

        assert!(engine.is_idle());
        for piece in engine.pieces() {
            assert_eq!(piece.position(), piece.home());
        }
        assert!(engine.last_report().is_clean());
    }
}
