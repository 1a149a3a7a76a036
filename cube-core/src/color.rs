//! Face identities and sticker colors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six faces of the cube.
///
/// Discriminants follow the facelet block order (`U`, `R`, `F`, `D`, `L`, `B`),
/// so `face as usize * 9` is the offset of the face's block in a facelet string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    /// Up.
    #[serde(rename = "U")]
    U = 0,
    /// Right.
    #[serde(rename = "R")]
    R = 1,
    /// Front.
    #[serde(rename = "F")]
    F = 2,
    /// Down.
    #[serde(rename = "D")]
    D = 3,
    /// Left.
    #[serde(rename = "L")]
    L = 4,
    /// Back.
    #[serde(rename = "B")]
    B = 5,
}

impl Face {
    /// All faces in facelet block order.
    pub const ALL: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

    /// Index of this face in [`Face::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Notation letter for this face.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::U => 'U',
            Self::R => 'R',
            Self::F => 'F',
            Self::D => 'D',
            Self::L => 'L',
            Self::B => 'B',
        }
    }

    /// Parse a notation letter. Case-sensitive.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'U' => Some(Self::U),
            'R' => Some(Self::R),
            'F' => Some(Self::F),
            'D' => Some(Self::D),
            'L' => Some(Self::L),
            'B' => Some(Self::B),
            _ => None,
        }
    }

    /// The face on the other side of the cube.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::U => Self::D,
            Self::R => Self::L,
            Self::F => Self::B,
            Self::D => Self::U,
            Self::L => Self::R,
            Self::B => Self::F,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A sticker color. There is exactly one color per face identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Color of the Up face when solved.
    Up,
    /// Color of the Right face when solved.
    Right,
    /// Color of the Front face when solved.
    Front,
    /// Color of the Down face when solved.
    Down,
    /// Color of the Left face when solved.
    Left,
    /// Color of the Back face when solved.
    Back,
}

impl Color {
    /// The color a face carries in the home-solved assignment.
    #[must_use]
    pub const fn home(face: Face) -> Self {
        match face {
            Face::U => Self::Up,
            Face::R => Self::Right,
            Face::F => Self::Front,
            Face::D => Self::Down,
            Face::L => Self::Left,
            Face::B => Self::Back,
        }
    }

    /// The face whose home color this is.
    #[must_use]
    pub const fn face(self) -> Face {
        match self {
            Self::Up => Face::U,
            Self::Right => Face::R,
            Self::Front => Face::F,
            Self::Down => Face::D,
            Self::Left => Face::L,
            Self::Back => Face::B,
        }
    }

    /// Facelet letter used on the wire (`U`, `R`, `F`, `D`, `L`, `B`).
    #[must_use]
    pub const fn letter(self) -> char {
        self.face().letter()
    }

    /// Decode a facelet letter.
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match Face::from_letter(letter) {
            Some(face) => Some(Self::home(face)),
            None => None,
        }
    }

    /// Reference display palette as `0xRRGGBB`.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Up => 0x00FF_FFFF,    // white
            Self::Down => 0x00FF_FF00,  // yellow
            Self::Front => 0x0000_FF00, // green
            Self::Back => 0x0000_00FF,  // blue
            Self::Left => 0x00FF_A500,  // orange
            Self::Right => 0x00FF_0000, // red
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_letters_round_trip() {
        for face in Face::ALL {
            assert_eq!(Face::from_letter(face.letter()), Some(face));
        }
        assert_eq!(Face::from_letter('u'), None);
        assert_eq!(Face::from_letter('X'), None);
    }

    #[test]
    fn test_face_index_matches_block_order() {
        for (i, face) in Face::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn test_opposite_is_involution() {
        for face in Face::ALL {
            assert_ne!(face.opposite(), face);
            assert_eq!(face.opposite().opposite(), face);
        }
    }

    #[test]
    fn test_home_color_maps_back_to_face() {
        for face in Face::ALL {
            assert_eq!(Color::home(face).face(), face);
            assert_eq!(Color::home(face).letter(), face.letter());
        }
    }

    #[test]
    fn test_palette_is_distinct() {
        let mut seen: Vec<u32> = Face::ALL.iter().map(|f| Color::home(*f).rgb()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Face::R).unwrap(), "\"R\"");
        assert_eq!(serde_json::to_string(&Color::Front).unwrap(), "\"front\"");
    }
}
