//! Engine tests - the CPU placement search over a real board

use tetris_duel::core::{Board, Piece};
use tetris_duel::engine::{find_destination, Destination, ScoreWeights};
use tetris_duel::types::{PieceKind, BOARD_COLS, BOARD_ROWS, START_COL, START_ROW};

/// Steer a piece to the chosen destination and lock it, the way a player
/// following the CPU's intents eventually would
fn replay(board: &mut Board, piece: &mut Piece, destination: Destination) {
    while piece.rotation() != destination.rotation {
        piece.rotate_cw();
    }
    piece.set_col(destination.column);
    piece.set_row(START_ROW);
    loop {
        piece.increase_row();
        if !board.has_bounds(piece) || board.collides(piece) {
            piece.decrease_row();
            break;
        }
    }
    board.add_piece(piece).expect("destination must be placeable");
}

#[test]
fn test_search_terminates_for_every_kind_on_an_empty_board() {
    let weights = ScoreWeights::default();
    for kind in PieceKind::ALL {
        let mut board = Board::new();
        let mut piece = Piece::new(kind, START_COL, START_ROW);
        let destination = find_destination(&mut board, &mut piece, &weights)
            .unwrap()
            .unwrap_or_else(|| panic!("no destination for {kind:?} on an empty board"));
        assert!(destination.rotation < 4);
        assert!((0..BOARD_COLS).contains(&destination.column));
    }
}

#[test]
fn test_search_restores_board_and_piece() {
    let mut board = Board::new();
    board
        .add_piece(&Piece::new(PieceKind::O, 3, BOARD_ROWS - 2))
        .unwrap();
    let snapshot = board.clone();

    let mut piece = Piece::new(PieceKind::T, START_COL, START_ROW);
    let anchor = (piece.col(), piece.row(), piece.rotation());

    find_destination(&mut board, &mut piece, &ScoreWeights::default()).unwrap();

    assert_eq!(board, snapshot);
    assert_eq!((piece.col(), piece.row(), piece.rotation()), anchor);
}

#[test]
fn test_destinations_are_placeable() {
    let weights = ScoreWeights::default();
    let mut board = Board::new();

    // drop eight pieces in a row; every chosen destination must replay
    // cleanly onto the board the search saw
    let kinds = [
        PieceKind::T,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::L,
        PieceKind::J,
        PieceKind::I,
        PieceKind::O,
    ];
    for kind in kinds {
        let mut piece = Piece::new(kind, START_COL, START_ROW);
        let Some(destination) = find_destination(&mut board, &mut piece, &weights).unwrap() else {
            break;
        };
        replay(&mut board, &mut piece, destination);
        if board.mark_completed_row() {
            board.clear_completed_rows();
            board.drop_blocks();
            board.set_complete(false);
        }
    }

    assert!(board.aggregate_height() > 0);
}

#[test]
fn test_square_completes_a_double_well() {
    let mut board = Board::new();
    let id = Piece::new(PieceKind::I, 0, 0).id();
    for row in [BOARD_ROWS - 2, BOARD_ROWS - 1] {
        for col in 0..BOARD_COLS - 2 {
            board.set(
                col,
                row,
                Some(tetris_duel::core::BlockCell {
                    id,
                    kind: PieceKind::I,
                }),
            );
        }
    }

    let mut piece = Piece::new(PieceKind::O, START_COL, START_ROW);
    let destination = find_destination(&mut board, &mut piece, &ScoreWeights::default())
        .unwrap()
        .expect("the well is reachable");

    replay(&mut board, &mut piece, destination);
    assert_eq!(board.completed_row_count(), 2);
}

#[test]
fn test_weights_change_the_choice() {
    // a single-column crater at column 0
    let mut board = Board::new();
    let id = Piece::new(PieceKind::I, 0, 0).id();
    for col in 1..BOARD_COLS {
        board.set(
            col,
            BOARD_ROWS - 1,
            Some(tetris_duel::core::BlockCell {
                id,
                kind: PieceKind::I,
            }),
        );
    }

    let mut piece = Piece::new(PieceKind::O, START_COL, START_ROW);

    // hole-averse weights keep the square out of positions that cover the
    // crater
    let careful = ScoreWeights {
        height: 0.0,
        lines: 0.0,
        holes: -1.0,
        bumpiness: 0.0,
    };
    let destination = find_destination(&mut board, &mut piece, &careful)
        .unwrap()
        .expect("flat placements exist");
    let mut scratch = board.clone();
    replay(&mut scratch, &mut piece, destination);
    assert_eq!(scratch.hole_count(), 0, "the crater must not be roofed");

    // all-zero weights score every placement the same, so the scan order
    // decides: rotations are tried starting from 1, and every rotation of
    // the square fits at the spawn row, so the first candidate is rotation 1
    // hugging the west wall
    let indifferent = ScoreWeights {
        height: 0.0,
        lines: 0.0,
        holes: 0.0,
        bumpiness: 0.0,
    };
    let mut fresh = Piece::new(PieceKind::O, START_COL, START_ROW);
    let first = find_destination(&mut board, &mut fresh, &indifferent)
        .unwrap()
        .expect("flat placements exist");
    assert_eq!(first, Destination { rotation: 1, column: 0 });
}
