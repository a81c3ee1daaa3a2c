/// Board evaluation and CPU move selection.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::state::{Board, Mark};

/// Chance the CPU ignores minimax and plays a random empty cell.
pub const RANDOM_MOVE_CHANCE: f64 = 0.30;

/// Rows, columns, diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Win(Mark, [usize; 3]),
    Draw,
}

/// `None` while the game is still open.
pub fn check_winner(board: &Board) -> Option<Outcome> {
    for line in WIN_LINES {
        let [a, b, c] = line;
        if board[a] != Mark::Empty && board[a] == board[b] && board[b] == board[c] {
            return Some(Outcome::Win(board[a], line));
        }
    }
    if board.iter().all(|m| *m != Mark::Empty) {
        return Some(Outcome::Draw);
    }
    None
}

/// Score a terminal board from the CPU's side. Faster wins score higher,
/// slower losses score less badly.
pub fn evaluate(board: &Board, depth: i32) -> Option<i32> {
    match check_winner(board)? {
        Outcome::Win(Mark::Cpu, _) => Some(10 - depth),
        Outcome::Win(_, _) => Some(depth - 10),
        Outcome::Draw => Some(0),
    }
}

pub fn empty_cells(board: &Board) -> Vec<usize> {
    (0..board.len()).filter(|&i| board[i] == Mark::Empty).collect()
}

/// Exhaustive search. Each trial move is undone before the next, so the
/// board is unchanged on return.
pub fn minimax(board: &mut Board, maximizing: bool, depth: i32) -> i32 {
    if let Some(score) = evaluate(board, depth) {
        return score;
    }
    let (mark, mut best) = if maximizing {
        (Mark::Cpu, i32::MIN)
    } else {
        (Mark::Player, i32::MAX)
    };
    for i in 0..board.len() {
        if board[i] != Mark::Empty {
            continue;
        }
        board[i] = mark;
        let score = minimax(board, !maximizing, depth + 1);
        board[i] = Mark::Empty;
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    best
}

/// The first empty cell, in index order, with the highest minimax score.
pub fn best_move(board: &Board) -> Option<usize> {
    let mut scratch = *board;
    let mut best: Option<(usize, i32)> = None;
    for i in 0..scratch.len() {
        if scratch[i] != Mark::Empty {
            continue;
        }
        scratch[i] = Mark::Cpu;
        let score = minimax(&mut scratch, false, 0);
        scratch[i] = Mark::Empty;
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}

/// Mostly perfect play, with a random move thrown in now and then.
pub fn cpu_move(board: &Board, rng: &mut impl Rng) -> Option<usize> {
    if rng.random::<f64>() < RANDOM_MOVE_CHANCE {
        if let Some(&cell) = empty_cells(board).choose(rng) {
            return Some(cell);
        }
    }
    best_move(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const E: Mark = Mark::Empty;
    const X: Mark = Mark::Player;
    const O: Mark = Mark::Cpu;

    #[test]
    fn winner_and_draw() {
        assert_eq!(check_winner(&[E; 9]), None);
        let b = [X, X, X, O, O, E, E, E, E];
        assert_eq!(check_winner(&b), Some(Outcome::Win(X, [0, 1, 2])));
        let b = [O, X, E, E, O, X, E, E, O];
        assert_eq!(check_winner(&b), Some(Outcome::Win(O, [0, 4, 8])));
        let b = [X, O, X, X, O, O, O, X, X];
        assert_eq!(check_winner(&b), Some(Outcome::Draw));
    }

    #[test]
    fn faster_wins_score_higher() {
        let b = [O, O, O, X, X, E, E, E, E];
        assert!(evaluate(&b, 1) > evaluate(&b, 3));
        let lost = [X, X, X, O, O, E, E, E, E];
        assert!(evaluate(&lost, 3) > evaluate(&lost, 1));
        assert_eq!(evaluate(&[E; 9], 0), None);
    }

    #[test]
    fn takes_the_win() {
        let b = [O, O, E, X, X, E, X, E, E];
        assert_eq!(best_move(&b), Some(2));
    }

    #[test]
    fn blocks_the_threat() {
        let b = [X, X, E, E, O, E, E, E, E];
        assert_eq!(best_move(&b), Some(2));
    }

    #[test]
    fn answers_the_fork_with_an_edge() {
        // Either corner loses to a fork; an edge forces X to block.
        let mut b = [X, E, E, E, O, E, E, E, X];
        let mv = best_move(&b);
        assert_eq!(mv, Some(1));
        if let Some(i) = mv {
            b[i] = O;
        }
        assert!(minimax(&mut b, false, 0) >= 0);
    }

    #[test]
    fn minimax_restores_board() {
        let mut b = [X, E, E, E, O, E, E, E, E];
        let before = b;
        minimax(&mut b, true, 0);
        assert_eq!(b, before);
    }

    #[test]
    fn full_board_has_no_move() {
        let b = [X, O, X, X, O, O, O, X, X];
        assert_eq!(best_move(&b), None);
        assert_eq!(cpu_move(&b, &mut SmallRng::seed_from_u64(1)), None);
    }

    /// Every player line against minimax: the CPU never loses.
    fn never_loses(board: &mut Board, player_to_move: bool) {
        match check_winner(board) {
            Some(Outcome::Win(winner, _)) => {
                assert_ne!(winner, X, "player won on {:?}", board);
                return;
            }
            Some(Outcome::Draw) => return,
            None => {}
        }
        if player_to_move {
            for i in empty_cells(board) {
                board[i] = X;
                never_loses(board, false);
                board[i] = E;
            }
        } else if let Some(i) = best_move(board) {
            board[i] = O;
            never_loses(board, true);
            board[i] = E;
        }
    }

    #[test]
    fn minimax_never_loses_a_game() {
        never_loses(&mut [E; 9], true);
    }

    #[test]
    fn random_moves_stay_legal() {
        let mut rng = SmallRng::seed_from_u64(3);
        let b = [X, O, E, X, E, O, E, X, E];
        for _ in 0..200 {
            let Some(i) = cpu_move(&b, &mut rng) else {
                panic!("no move on an open board");
            };
            assert_eq!(b[i], E);
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn board() -> impl Strategy<Value = Board> {
        proptest::array::uniform9(prop_oneof![
            Just(Mark::Empty),
            Just(Mark::Player),
            Just(Mark::Cpu)
        ])
    }

    proptest! {
        #[test]
        fn prop_minimax_leaves_board_untouched(b in board(), max in any::<bool>()) {
            let mut scratch = b;
            minimax(&mut scratch, max, 0);
            prop_assert_eq!(scratch, b);
        }

        #[test]
        fn prop_best_move_is_empty(b in board()) {
            match best_move(&b) {
                Some(i) => prop_assert_eq!(b[i], Mark::Empty),
                None => prop_assert!(b.iter().all(|m| *m != Mark::Empty)),
            }
        }
    }
}
