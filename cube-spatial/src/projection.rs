//! Reverse sticker lookup: world geometry → logical cell.
//!
//! Each face of the logical grid is laid out on the cube surface by a
//! [`FaceDescriptor`]. Row and column indices grow along fixed world
//! directions:
//!
//! ```text
//!  face  normal   row grows   col grows
//!  ────  ──────   ─────────   ─────────
//!   U     +Y        +Z          +X
//!   R     +X        -Y          -Z
//!   F     +Z        -Y          +X
//!   D     -Y        -Z          +X
//!   L     -X        -Y          +Z
//!   B     -Z        -Y          -X
//! ```
//!
//! Seen from outside, row 0 is the top edge and column 0 the left edge; for
//! U the top edge borders B, for D it borders F. Positions are in lattice
//! units (`-1..=1` per axis).

use cube_core::{Cell, Face};
use serde::{Deserialize, Serialize};

use crate::math::{Axis, IVec3, Vec3};

/// Minimum dot product between a sticker direction and a face normal for the
/// sticker to count as facing that way.
pub const DIRECTION_THRESHOLD: f32 = 0.8;

/// How a logical face is laid out in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceDescriptor {
    /// Logical face.
    pub face: Face,
    /// Outward unit normal.
    pub normal: IVec3,
    /// World axis along which the row index changes.
    pub row_axis: Axis,
    /// `+1` if rows grow with the axis, `-1` otherwise.
    pub row_sign: i32,
    /// World axis along which the column index changes.
    pub col_axis: Axis,
    /// `+1` if columns grow with the axis, `-1` otherwise.
    pub col_sign: i32,
}

/// Layout of every face, indexed by [`Face::index`].
pub static FACE_DESCRIPTORS: [FaceDescriptor; 6] = [
    FaceDescriptor {
        face: Face::U,
        normal: IVec3::new(0, 1, 0),
        row_axis: Axis::Z,
        row_sign: 1,
        col_axis: Axis::X,
        col_sign: 1,
    },
    FaceDescriptor {
        face: Face::R,
        normal: IVec3::new(1, 0, 0),
        row_axis: Axis::Y,
        row_sign: -1,
        col_axis: Axis::Z,
        col_sign: -1,
    },
    FaceDescriptor {
        face: Face::F,
        normal: IVec3::new(0, 0, 1),
        row_axis: Axis::Y,
        row_sign: -1,
        col_axis: Axis::X,
        col_sign: 1,
    },
    FaceDescriptor {
        face: Face::D,
        normal: IVec3::new(0, -1, 0),
        row_axis: Axis::Z,
        row_sign: -1,
        col_axis: Axis::X,
        col_sign: 1,
    },
    FaceDescriptor {
        face: Face::L,
        normal: IVec3::new(-1, 0, 0),
        row_axis: Axis::Y,
        row_sign: -1,
        col_axis: Axis::Z,
        col_sign: 1,
    },
    FaceDescriptor {
        face: Face::B,
        normal: IVec3::new(0, 0, -1),
        row_axis: Axis::Y,
        row_sign: -1,
        col_axis: Axis::X,
        col_sign: -1,
    },
];

/// Descriptor for `face`.
#[must_use]
pub fn descriptor(face: Face) -> &'static FaceDescriptor {
    &FACE_DESCRIPTORS[face.index()]
}

/// Raw (unclamped) grid coordinates of a position on a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCell {
    /// Row before clamping.
    pub row: i32,
    /// Column before clamping.
    pub col: i32,
}

impl RawCell {
    /// Whether both coordinates are already in `0..=2`.
    #[must_use]
    pub const fn in_range(&self) -> bool {
        self.row >= 0 && self.row <= 2 && self.col >= 0 && self.col <= 2
    }
}

impl FaceDescriptor {
    /// Project a lattice-unit position onto this face's grid.
    #[must_use]
    pub fn raw_cell(&self, position: Vec3) -> RawCell {
        RawCell {
            row: axis_index(position, self.row_axis, self.row_sign),
            col: axis_index(position, self.col_axis, self.col_sign),
        }
    }

    /// Lattice cell of the piece that carries sticker `(row, col)`.
    #[must_use]
    pub fn lattice_position(&self, row: usize, col: usize) -> IVec3 {
        let offset = |index: usize, sign: i32| {
            let index = i32::try_from(index.min(2)).unwrap_or(2);
            (index - 1) * sign
        };
        let mut v = [self.normal.x, self.normal.y, self.normal.z];
        v[axis_slot(self.row_axis)] += offset(row, self.row_sign);
        v[axis_slot(self.col_axis)] += offset(col, self.col_sign);
        IVec3::new(v[0], v[1], v[2])
    }
}

const fn axis_slot(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn axis_index(position: Vec3, axis: Axis, sign: i32) -> i32 {
    let along = position.component(axis) * sign as f32;
    along.round() as i32 + 1
}

/// Best-matching face for a world direction and its dot product with that
/// face's normal.
#[must_use]
pub fn classify_direction(direction: Vec3) -> (Face, f32) {
    let dir = direction.normalize();
    let mut best = (Face::U, f32::NEG_INFINITY);
    for desc in &FACE_DESCRIPTORS {
        let dot = dir.dot(&desc.normal.as_vec3());
        if dot > best.1 {
            best = (desc.face, dot);
        }
    }
    best
}

/// Outcome of looking up one sticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    /// Direction and position map cleanly onto a cell.
    Hit(Cell),
    /// The position fell outside the grid and was clamped onto `cell`.
    Clamped {
        /// Cell after clamping.
        cell: Cell,
        /// Coordinates before clamping.
        raw: RawCell,
    },
    /// No face normal is close enough to the direction.
    Unaligned {
        /// Closest face.
        nearest: Face,
        /// Dot product with that face's normal.
        dot: f32,
    },
}

/// Find the logical cell a sticker at `position` facing `direction` shows.
#[must_use]
pub fn lookup(position: Vec3, direction: Vec3) -> Lookup {
    let (face, dot) = classify_direction(direction);
    if dot <= DIRECTION_THRESHOLD {
        return Lookup::Unaligned { nearest: face, dot };
    }

    let raw = descriptor(face).raw_cell(position);
    let clamp = |v: i32| usize::try_from(v.clamp(0, 2)).unwrap_or(0);
    let cell = Cell::new(face, clamp(raw.row), clamp(raw.col));
    if raw.in_range() {
        Lookup::Hit(cell)
    } else {
        Lookup::Clamped { cell, raw }
    }
}
