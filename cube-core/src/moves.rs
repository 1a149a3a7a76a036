//! Sticker permutation tables for face turns.
//!
//! Each clockwise quarter turn is five 4-cycles over facelet indices
//! (see [`crate::facelet`] for the numbering): two on the turned face's
//! own perimeter (corners, then edges) and three strips across the four
//! neighbouring faces. In a cycle `[a, b, c, d]` the sticker at `a` moves
//! to `b`, `b` to `c`, `c` to `d` and `d` back to `a`.

use crate::color::Face;
use crate::grid::StickerGrid;
use crate::notation::Move;

type Cycle = [usize; 4];

/// Clockwise quarter-turn cycles, indexed by [`Face::index`].
const QUARTER_TURN_CYCLES: [[Cycle; 5]; 6] = [
    // U
    [
        [0, 2, 8, 6],
        [1, 5, 7, 3],
        [9, 18, 36, 45],
        [10, 19, 37, 46],
        [11, 20, 38, 47],
    ],
    // R
    [
        [9, 11, 17, 15],
        [10, 14, 16, 12],
        [2, 51, 29, 20],
        [5, 48, 32, 23],
        [8, 45, 35, 26],
    ],
    // F
    [
        [18, 20, 26, 24],
        [19, 23, 25, 21],
        [6, 9, 29, 44],
        [7, 12, 28, 41],
        [8, 15, 27, 38],
    ],
    // D
    [
        [27, 29, 35, 33],
        [28, 32, 34, 30],
        [15, 51, 42, 24],
        [16, 52, 43, 25],
        [17, 53, 44, 26],
    ],
    // L
    [
        [36, 38, 44, 42],
        [37, 41, 43, 39],
        [0, 18, 27, 53],
        [3, 21, 30, 50],
        [6, 24, 33, 47],
    ],
    // B
    [
        [45, 47, 53, 51],
        [46, 50, 52, 48],
        [0, 42, 35, 11],
        [1, 39, 34, 14],
        [2, 36, 33, 17],
    ],
];

fn quarter_turn(grid: &mut StickerGrid, face: Face) {
    for cycle in &QUARTER_TURN_CYCLES[face.index()] {
        let last = grid.facelet(cycle[3]);
        grid.set_facelet(cycle[3], grid.facelet(cycle[2]));
        grid.set_facelet(cycle[2], grid.facelet(cycle[1]));
        grid.set_facelet(cycle[1], grid.facelet(cycle[0]));
        grid.set_facelet(cycle[0], last);
    }
}

/// Permute the stickers of `grid` for one move.
///
/// Half turns and counter-clockwise turns are two and three clockwise
/// quarter turns respectively.
pub fn permute(grid: &mut StickerGrid, mv: Move) {
    for _ in 0..mv.turn.quarter_turns() {
        quarter_turn(grid, mv.face);
    }
}
