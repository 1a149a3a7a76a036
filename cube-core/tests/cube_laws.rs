//! Cube Law Integration Tests
//!
//! Algebraic properties of the logical model:
//! - Sequence followed by its inverse is the identity
//! - Facelet encode/decode idempotence
//! - Quarter/half-turn orders
//! - Known commutator order and solved-check behaviour

use cube_core::notation::{invert_sequence, parse_sequence};
use cube_core::{
    decode, encode, CubeState, Face, FormatError, Move, ScrambleConfig, Turn, SOLVED_FACELETS,
};
use proptest::prelude::*;

fn arb_move() -> impl Strategy<Value = Move> {
    (0usize..6, 0usize..3).prop_map(|(f, t)| Move::new(Face::ALL[f], Turn::ALL[t]))
}

fn arb_sequence() -> impl Strategy<Value = Vec<Move>> {
    prop::collection::vec(arb_move(), 0..40)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_sequence_then_inverse_restores_grid(
        prefix in arb_sequence(),
        seq in arb_sequence()
    ) {
        let mut state = CubeState::new();
        state.apply_moves(&prefix);
        let before = *state.grid();

        state.apply_moves(&seq);
        state.apply_moves(&invert_sequence(&seq));

        prop_assert_eq!(*state.grid(), before);
    }

    #[test]
    fn prop_facelet_round_trip_is_idempotent(seq in arb_sequence()) {
        let mut state = CubeState::new();
        state.apply_moves(&seq);
        let encoded = encode(state.grid());

        prop_assert_eq!(encoded.len(), 54);
        let decoded = decode(&encoded).expect("encoder output always decodes");
        prop_assert_eq!(encode(&decoded), encoded);
    }

    #[test]
    fn prop_invert_is_involution(mv in arb_move()) {
        prop_assert_eq!(mv.inverse().inverse(), mv);
    }

    #[test]
    fn prop_color_counts_are_preserved(seq in arb_sequence()) {
        let mut state = CubeState::new();
        state.apply_moves(&seq);
        let facelets = state.facelets();
        for letter in ['U', 'R', 'F', 'D', 'L', 'B'] {
            prop_assert_eq!(facelets.chars().filter(|&c| c == letter).count(), 9);
        }
    }

    #[test]
    fn prop_centers_never_move(seq in arb_sequence()) {
        let mut state = CubeState::new();
        state.apply_moves(&seq);
        for face in Face::ALL {
            prop_assert_eq!(state.color(face, 1, 1).face(), face);
        }
    }

    #[test]
    fn prop_scramble_never_repeats_face(seed in any::<u64>()) {
        let mut state = CubeState::new();
        let seq = state.scramble(&ScrambleConfig::default().seeded(seed));
        prop_assert_eq!(seq.len(), 20);
        for pair in seq.windows(2) {
            prop_assert_ne!(pair[0].face, pair[1].face);
        }
    }
}

// ============================================================================
// Turn Orders
// ============================================================================

#[test]
fn test_face_turn_orders() {
    for face in Face::ALL {
        let x = Move::new(face, Turn::Clockwise);
        let x2 = Move::new(face, Turn::Half);
        let xp = Move::new(face, Turn::CounterClockwise);

        let mut state = CubeState::new();
        state.apply_moves(&[x, x, x, x]);
        assert!(state.grid().is_home_solved(), "{face} x4");

        state.apply_moves(&[x2, x2]);
        assert!(state.grid().is_home_solved(), "{face}2 x2");

        state.apply_moves(&[x, xp]);
        assert!(state.grid().is_home_solved(), "{face} {face}'");

        state.apply_moves(&[x, x]);
        let mut half = CubeState::new();
        half.apply_move(x2);
        assert_eq!(state.grid(), half.grid(), "{face} {face} == {face}2");
    }
}

#[test]
fn test_single_quarter_turn_is_not_solved() {
    for face in Face::ALL {
        for turn in Turn::ALL {
            let mut state = CubeState::new();
            state.apply_move(Move::new(face, turn));
            assert!(!state.is_solved(), "{face}{} reads solved", turn.suffix());
        }
    }
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[test]
fn test_sexy_move_has_order_six() {
    let sexy = parse_sequence("R U R' U'");
    let mut state = CubeState::new();
    for i in 1..=6 {
        state.apply_moves(&sexy);
        if i < 6 {
            assert!(!state.is_solved(), "solved after {i} repetitions");
        }
    }
    assert!(state.is_solved());
    assert_eq!(state.facelets(), SOLVED_FACELETS);
}

#[test]
fn test_reset_encodes_to_solved_string() {
    let mut state = CubeState::new();
    state.apply_notation("F B2 L'");
    state.reset();
    assert_eq!(
        encode(state.grid()),
        "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB"
    );
    assert!(state.is_solved());
}

#[test]
fn test_decode_failures() {
    let short = "U".repeat(53);
    assert!(matches!(
        decode(&short),
        Err(FormatError::WrongLength { len: 53 })
    ));

    let mut with_x = SOLVED_FACELETS.to_string();
    with_x.replace_range(0..1, "X");
    assert!(matches!(
        decode(&with_x),
        Err(FormatError::InvalidCharacter { ch: 'X', .. })
    ));
}

#[test]
fn test_lenient_sequence_application() {
    let mut state = CubeState::new();
    let report = state.apply_notation("R U nope R' U'");
    assert_eq!(report.applied.len(), 4);
    assert_eq!(report.ignored_count(), 1);

    let mut reference = CubeState::new();
    reference.apply_moves(&parse_sequence("R U R' U'"));
    assert_eq!(state.grid(), reference.grid());
}

#[test]
fn test_scramble_then_inverse_solves() {
    let mut state = CubeState::new();
    let scramble = state.scramble(&ScrambleConfig::default().seeded(2024));
    assert!(!state.is_solved());
    state.apply_moves(&invert_sequence(&scramble));
    assert!(state.grid().is_home_solved());
}
