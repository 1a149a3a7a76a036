//! The 54-sticker color grid.

use serde::{Deserialize, Serialize};

use crate::color::{Color, Face};

/// Number of stickers on the cube.
pub const STICKER_COUNT: usize = 54;

/// Position of a single sticker: a face and a cell in its 3×3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Face the sticker sits on.
    pub face: Face,
    /// Row, 0..=2, top to bottom in the face's canonical orientation.
    pub row: usize,
    /// Column, 0..=2, left to right in the face's canonical orientation.
    pub col: usize,
}

impl Cell {
    /// Create a cell. Indices must be in `0..3`.
    #[must_use]
    pub const fn new(face: Face, row: usize, col: usize) -> Self {
        debug_assert!(row < 3 && col < 3);
        Self { face, row, col }
    }

    /// Position of this sticker in a facelet string (0..54).
    #[must_use]
    pub const fn facelet_index(self) -> usize {
        self.face.index() * 9 + self.row * 3 + self.col
    }

    /// Inverse of [`Cell::facelet_index`]. Returns `None` past 53.
    #[must_use]
    pub const fn from_facelet_index(index: usize) -> Option<Self> {
        if index >= STICKER_COUNT {
            return None;
        }
        let face = Face::ALL[index / 9];
        Some(Self::new(face, (index % 9) / 3, index % 3))
    }
}

/// Six faces, each a 3×3 grid of [`Color`].
///
/// Always holds exactly 54 valid colors; there is no "unset" sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StickerGrid {
    faces: [[[Color; 3]; 3]; 6],
}

impl StickerGrid {
    /// The home-solved grid: every face carries its own color.
    #[must_use]
    pub fn solved() -> Self {
        let mut faces = [[[Color::Up; 3]; 3]; 6];
        for face in Face::ALL {
            faces[face.index()] = [[Color::home(face); 3]; 3];
        }
        Self { faces }
    }

    /// Color at a face/row/column.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is not in `0..3`.
    #[must_use]
    pub fn color(&self, face: Face, row: usize, col: usize) -> Color {
        self.faces[face.index()][row][col]
    }

    /// Color of a cell.
    #[must_use]
    pub fn at(&self, cell: Cell) -> Color {
        self.color(cell.face, cell.row, cell.col)
    }

    /// Overwrite one sticker.
    pub fn set(&mut self, cell: Cell, color: Color) {
        self.faces[cell.face.index()][cell.row][cell.col] = color;
    }

    /// The 3×3 grid of one face.
    #[must_use]
    pub fn face(&self, face: Face) -> &[[Color; 3]; 3] {
        &self.faces[face.index()]
    }

    /// Sticker at a facelet-string position.
    pub(crate) fn facelet(&self, index: usize) -> Color {
        self.faces[index / 9][(index % 9) / 3][index % 3]
    }

    pub(crate) fn set_facelet(&mut self, index: usize, color: Color) {
        self.faces[index / 9][(index % 9) / 3][index % 3] = color;
    }

    /// Whether every face is monochrome.
    ///
    /// Which color sits on which face is not checked: a consistently
    /// relabeled grid also counts as solved. See [`StickerGrid::is_home_solved`]
    /// for the strict variant.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.faces.iter().all(|face| {
            let first = face[0][0];
            face.iter().flatten().all(|&c| c == first)
        })
    }

    /// Whether the grid equals the home-solved assignment exactly.
    #[must_use]
    pub fn is_home_solved(&self) -> bool {
        *self == Self::solved()
    }

    /// Iterate `(cell, color)` over all 54 stickers in facelet order.
    pub fn stickers(&self) -> impl Iterator<Item = (Cell, Color)> + '_ {
        (0..STICKER_COUNT).filter_map(move |i| {
            Cell::from_facelet_index(i).map(|cell| (cell, self.facelet(i)))
        })
    }
}

impl Default for StickerGrid {
    fn default() -> Self {
        Self::solved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solved_grid_is_solved() {
        let grid = StickerGrid::solved();
        assert!(grid.is_solved());
        assert!(grid.is_home_solved());
        for face in Face::ALL {
            for row in 0..3 {
                for col in 0..3 {
                    assert_eq!(grid.color(face, row, col), Color::home(face));
                }
            }
        }
    }

    #[test]
    fn test_single_sticker_change_breaks_solved() {
        let mut grid = StickerGrid::solved();
        grid.set(Cell::new(Face::F, 1, 2), Color::Back);
        assert!(!grid.is_solved());
        assert!(!grid.is_home_solved());
    }

    #[test]
    fn test_relabeled_grid_reads_as_solved() {
        // Swap the colors of U and D wholesale.
        let mut grid = StickerGrid::solved();
        for row in 0..3 {
            for col in 0..3 {
                grid.set(Cell::new(Face::U, row, col), Color::Down);
                grid.set(Cell::new(Face::D, row, col), Color::Up);
            }
        }
        assert!(grid.is_solved());
        assert!(!grid.is_home_solved());
    }

    #[test]
    fn test_cell_index_round_trip() {
        for i in 0..STICKER_COUNT {
            let cell = Cell::from_facelet_index(i).expect("in range");
            assert_eq!(cell.facelet_index(), i);
        }
        assert!(Cell::from_facelet_index(STICKER_COUNT).is_none());
    }

    #[test]
    fn test_stickers_yields_all_54() {
        let grid = StickerGrid::solved();
        assert_eq!(grid.stickers().count(), STICKER_COUNT);
        assert_eq!(
            grid.stickers().filter(|(_, c)| *c == Color::Right).count(),
            9
        );
    }
}
