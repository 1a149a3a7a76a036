//! # Facelet Codec
//!
//! Conversion between [`StickerGrid`] and the 54-character facelet string
//! exchanged with solvers.
//!
//! ```text
//!              ┌──┬──┬──┐
//!              │U1│U2│U3│
//!              │U4│U5│U6│
//!              │U7│U8│U9│
//!     ┌──┬──┬──┼──┼──┼──┼──┬──┬──┬──┬──┬──┐
//!     │L1│L2│L3│F1│F2│F3│R1│R2│R3│B1│B2│B3│
//!     │L4│L5│L6│F4│F5│F6│R4│R5│R6│B4│B5│B6│
//!     │L7│L8│L9│F7│F8│F9│R7│R8│R9│B7│B8│B9│
//!     └──┴──┴──┼──┼──┼──┼──┴──┴──┴──┴──┴──┘
//!              │D1│D2│D3│
//!              │D4│D5│D6│
//!              │D7│D8│D9│
//!              └──┴──┴──┘
//!
//! string = U1..U9 R1..R9 F1..F9 D1..D9 L1..L9 B1..B9
//! ```

use crate::color::{Color, Face};
use crate::error::FormatError;
use crate::grid::{Cell, StickerGrid, STICKER_COUNT};

/// Length of a facelet string.
pub const FACELET_LEN: usize = STICKER_COUNT;

/// Facelet string of the home-solved cube.
pub const SOLVED_FACELETS: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

/// Block order of the wire format.
pub const FACELET_ORDER: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

/// Serialize a grid. Always returns exactly 54 characters.
#[must_use]
pub fn encode(grid: &StickerGrid) -> String {
    let mut out = String::with_capacity(FACELET_LEN);
    for face in FACELET_ORDER {
        for row in grid.face(face) {
            out.extend(row.iter().map(|c| c.letter()));
        }
    }
    out
}

/// Parse a facelet string.
///
/// # Errors
///
/// Returns [`FormatError::WrongLength`] unless the input has exactly 54
/// characters, and [`FormatError::InvalidCharacter`] for the first character
/// outside `URFDLB`. Nothing is substituted.
pub fn decode(facelets: &str) -> Result<StickerGrid, FormatError> {
    let len = facelets.chars().count();
    if len != FACELET_LEN {
        return Err(FormatError::WrongLength { len });
    }

    let mut grid = StickerGrid::solved();
    let mut chars = facelets.chars().enumerate();
    for face in FACELET_ORDER {
        for row in 0..3 {
            for col in 0..3 {
                let Some((index, ch)) = chars.next() else {
                    return Err(FormatError::WrongLength { len });
                };
                let color =
                    Color::from_letter(ch).ok_or(FormatError::InvalidCharacter { ch, index })?;
                grid.set(Cell::new(face, row, col), color);
            }
        }
    }
    Ok(grid)
}
