//! Pieces: the 26 visible blocks of the cube.
//!
//! Every piece carries a rigid pose (lattice position plus an exact
//! [`Rotation`]) and six local faces. A local face bears a sticker exactly
//! when it pointed outward in the solved configuration; the rest stay
//! [`Paint::Hidden`] forever.

use cube_core::Color;
use serde::{Deserialize, Serialize};

use crate::math::{IVec3, Mat4, Rotation, Vec3};

/// Local face directions in material order: +X, -X, +Y, -Y, +Z, -Z.
pub const LOCAL_FACES: [IVec3; 6] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

/// Number of pieces (the hidden core is not modelled).
pub const PIECE_COUNT: usize = 26;

/// RGB shown on faces without a sticker.
pub const HIDDEN_RGB: u32 = 0x30_30_30;

/// Stable piece identifier, assigned once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

/// Piece kind by sticker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    /// One sticker, never leaves its cell.
    Center,
    /// Two stickers.
    Edge,
    /// Three stickers.
    Corner,
}

/// What a local face shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    /// A sticker of this color.
    Sticker(Color),
    /// Unstickered plastic.
    Hidden,
}

impl Paint {
    /// RGB for rendering.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Sticker(color) => color.rgb(),
            Self::Hidden => HIDDEN_RGB,
        }
    }

    /// The sticker color, if any.
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            Self::Sticker(color) => Some(color),
            Self::Hidden => None,
        }
    }
}

/// One physical piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    home: IVec3,
    position: IVec3,
    rotation: Rotation,
    paints: [Paint; 6],
}

impl Piece {
    /// A piece resting at `home` in the solved orientation.
    #[must_use]
    pub fn new(id: PieceId, home: IVec3) -> Self {
        Self {
            id,
            home,
            position: home,
            rotation: Rotation::identity(),
            paints: [Paint::Hidden; 6],
        }
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    /// Lattice cell occupied when solved.
    #[must_use]
    pub const fn home(&self) -> IVec3 {
        self.home
    }

    /// Current lattice cell.
    #[must_use]
    pub const fn position(&self) -> IVec3 {
        self.position
    }

    /// Current orientation relative to the solved pose.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Current paint of each local face, in [`LOCAL_FACES`] order.
    #[must_use]
    pub const fn paints(&self) -> [Paint; 6] {
        self.paints
    }

    /// Kind, from the number of outward faces at home.
    #[must_use]
    pub fn kind(&self) -> PieceKind {
        match self.home.nonzero_count() {
            1 => PieceKind::Center,
            2 => PieceKind::Edge,
            _ => PieceKind::Corner,
        }
    }

    /// Whether local face `index` carries a sticker.
    #[must_use]
    pub fn has_sticker(&self, index: usize) -> bool {
        LOCAL_FACES
            .get(index)
            .is_some_and(|dir| self.home.dot(dir) == 1)
    }

    /// Indices of the sticker-bearing local faces.
    pub fn sticker_faces(&self) -> impl Iterator<Item = usize> + '_ {
        (0..LOCAL_FACES.len()).filter(|&i| self.has_sticker(i))
    }

    /// World direction of local face `index` under the current rotation.
    #[must_use]
    pub fn world_direction(&self, index: usize) -> IVec3 {
        self.rotation.apply(LOCAL_FACES[index % LOCAL_FACES.len()])
    }

    /// Apply a rigid rotation about the cube center to position and
    /// orientation together.
    pub fn turn(&mut self, op: &Rotation) {
        self.position = op.apply(self.position);
        self.rotation = op.compose(&self.rotation);
    }

    /// Return to the home cell and solved orientation.
    pub fn reset(&mut self) {
        self.position = self.home;
        self.rotation = Rotation::identity();
    }

    pub(crate) fn set_paint(&mut self, index: usize, paint: Paint) {
        if let Some(slot) = self.paints.get_mut(index) {
            *slot = paint;
        }
    }

    /// Render transform with lattice cells `spacing` apart.
    #[must_use]
    pub fn transform(&self, spacing: f32) -> Mat4 {
        Mat4::from_rotation_translation(
            &self.rotation.to_mat3(),
            self.position.as_vec3().scale(spacing),
        )
    }
}

/// The 26 pieces in their solved poses, ids assigned in x, y, z order.
#[must_use]
pub fn solved_pieces() -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(PIECE_COUNT);
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                let home = IVec3::new(x, y, z);
                if home == IVec3::zero() {
                    continue;
                }
                #[allow(clippy::cast_possible_truncation)]
                let id = PieceId(pieces.len() as u8);
                pieces.push(Piece::new(id, home));
            }
        }
    }
    pieces
}

/// What a renderer needs to draw one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceView {
    /// Piece identifier.
    pub id: PieceId,
    /// World transform, including any in-flight layer animation.
    pub transform: Mat4,
    /// Paint per local face in [`LOCAL_FACES`] order.
    pub faces: [Paint; 6],
}

impl PieceView {
    /// World-space center of the piece.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.transform.translation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solved_pieces_counts() {
        let pieces = solved_pieces();
        assert_eq!(pieces.len(), PIECE_COUNT);
        let count = |kind| pieces.iter().filter(|p| p.kind() == kind).count();
        assert_eq!(count(PieceKind::Center), 6);
        assert_eq!(count(PieceKind::Edge), 12);
        assert_eq!(count(PieceKind::Corner), 8);
        let stickers: usize = pieces.iter().map(|p| p.sticker_faces().count()).sum();
        assert_eq!(stickers, 54);
    }

    #[test]
    fn test_ids_are_unique_and_dense() {
        let pieces = solved_pieces();
        for (i, piece) in pieces.iter().enumerate() {
            assert_eq!(usize::from(piece.id().0), i);
        }
    }

    #[test]
    fn test_corner_sticker_faces() {
        let corner = Piece::new(PieceId(0), IVec3::new(1, 1, 1));
        let faces: Vec<usize> = corner.sticker_faces().collect();
        assert_eq!(faces, vec![0, 2, 4]);
        assert!(!corner.has_sticker(1));
        assert!(!corner.has_sticker(9));
    }

    #[test]
    fn test_turn_moves_position_and_stickers_together() {
        let mut corner = Piece::new(PieceId(0), IVec3::new(1, 1, 1));
        let r_clockwise = Rotation::about(IVec3::new(1, 0, 0), -1);
        corner.turn(&r_clockwise);

        assert_eq!(corner.position(), IVec3::new(1, 1, -1));
        // The sticker that faced up now faces back.
        assert_eq!(corner.world_direction(2), IVec3::new(0, 0, -1));
        // The sticker that faced front now faces up.
        assert_eq!(corner.world_direction(4), IVec3::new(0, 1, 0));
        // Every sticker still points out of the piece's cell.
        for i in corner.sticker_faces() {
            assert_eq!(corner.position().dot(&corner.world_direction(i)), 1);
        }

        corner.reset();
        assert_eq!(corner.position(), corner.home());
        assert_eq!(corner.rotation(), Rotation::identity());
    }

    #[test]
    fn test_paint_rgb() {
        assert_eq!(Paint::Hidden.rgb(), HIDDEN_RGB);
        assert_eq!(Paint::Sticker(Color::Front).rgb(), Color::Front.rgb());
        assert_eq!(Paint::Hidden.color(), None);
    }

    #[test]
    fn test_transform_uses_spacing() {
        let piece = Piece::new(PieceId(3), IVec3::new(-1, 0, 1));
        let center = piece.transform(1.05).translation();
        assert!((center.x + 1.05).abs() < 1e-5);
        assert!(center.y.abs() < 1e-5);
        assert!((center.z - 1.05).abs() < 1e-5);
    }
}
