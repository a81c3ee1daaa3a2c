/// Turn flow: moves, CPU thinking delay, round and match transitions.

use rand::Rng;

use crate::input::Key;
use crate::time::Timer;

use super::ai::{self, Outcome};
use super::state::{
    Mark, Phase, TicTacToeState, ROUND_PAUSE_MS, THINK_MIN_MS, THINK_SPREAD_MS, WIN_ROUNDS,
};

pub fn start_round(state: &mut TicTacToeState) {
    state.board = [Mark::Empty; 9];
    state.cursor = 4;
    state.turn = Mark::Player;
    state.phase = Phase::Playing;
    state.message = format!("ROUND {}  -  YOUR TURN (X)", state.round);
}

/// Move the cursor on the 3x3 grid. Returns false for keys that aren't
/// directions.
pub fn move_cursor(state: &mut TicTacToeState, key: Key) -> bool {
    let (row, col) = (state.cursor / 3, state.cursor % 3);
    if key.is_up() {
        if row > 0 {
            state.cursor -= 3;
        }
    } else if key.is_down() {
        if row < 2 {
            state.cursor += 3;
        }
    } else if key.is_left() {
        if col > 0 {
            state.cursor -= 1;
        }
    } else if key.is_right() {
        if col < 2 {
            state.cursor += 1;
        }
    } else {
        return false;
    }
    true
}

/// Place the current side's mark. Returns the outcome when the move ends
/// the round; occupied cells and moves outside play are ignored.
pub fn place(state: &mut TicTacToeState, cell: usize, rng: &mut impl Rng) -> Option<Outcome> {
    if state.phase != Phase::Playing || state.board.get(cell) != Some(&Mark::Empty) {
        return None;
    }
    state.board[cell] = state.turn;

    if let Some(outcome) = ai::check_winner(&state.board) {
        end_round(state, outcome);
        return Some(outcome);
    }

    if state.turn == Mark::Player {
        state.turn = Mark::Cpu;
        state.message = "CPU IS THINKING...".to_string();
        let delay = THINK_MIN_MS + rng.random::<f64>() * THINK_SPREAD_MS;
        state.cpu_timer = Some(Timer::once(delay));
    } else {
        state.turn = Mark::Player;
        state.message = "YOUR TURN (X)".to_string();
    }
    None
}

fn end_round(state: &mut TicTacToeState, outcome: Outcome) {
    state.cpu_timer = None;
    state.phase = Phase::RoundEnd;
    match outcome {
        Outcome::Win(Mark::Player, _) => {
            state.message = "** YOU WIN THIS ROUND! **".to_string();
            state.player_wins += 1;
        }
        Outcome::Win(_, _) => {
            state.message = "** CPU WINS THIS ROUND! **".to_string();
            state.cpu_wins += 1;
        }
        Outcome::Draw => state.message = "** IT'S A DRAW! **".to_string(),
    }
    state.round_timer = Some(Timer::once(ROUND_PAUSE_MS));
}

/// Advance blink, CPU and round timers. Returns the outcome if the CPU's
/// move ended the round.
pub fn tick(state: &mut TicTacToeState, elapsed_ms: f64, rng: &mut impl Rng) -> Option<Outcome> {
    if let Some(blink) = state.blink_timer.as_mut() {
        if blink.advance(elapsed_ms) % 2 == 1 {
            state.blink_on = !state.blink_on;
        }
    }

    let round_over = state
        .round_timer
        .as_mut()
        .is_some_and(|t| t.advance(elapsed_ms) > 0);
    if round_over {
        state.round_timer = None;
        if state.match_decided() {
            state.phase = Phase::MatchEnd;
            state.message = if state.player_wins >= WIN_ROUNDS {
                "=== YOU WIN THE MATCH! ===".to_string()
            } else {
                "=== CPU WINS THE MATCH! ===".to_string()
            };
        } else {
            state.round += 1;
            start_round(state);
        }
        return None;
    }

    let cpu_ready = state
        .cpu_timer
        .as_mut()
        .is_some_and(|t| t.advance(elapsed_ms) > 0);
    if cpu_ready {
        state.cpu_timer = None;
        if let Some(cell) = ai::cpu_move(&state.board, rng) {
            return place(state, cell, rng);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    fn playing() -> TicTacToeState {
        let mut s = TicTacToeState::new();
        start_round(&mut s);
        s
    }

    #[test]
    fn cursor_stays_on_board() {
        let mut s = playing();
        assert!(move_cursor(&mut s, Key::Up));
        assert_eq!(s.cursor, 1);
        move_cursor(&mut s, Key::Up);
        assert_eq!(s.cursor, 1);
        move_cursor(&mut s, Key::Char('a'));
        move_cursor(&mut s, Key::Left);
        assert_eq!(s.cursor, 0);
        for _ in 0..5 {
            move_cursor(&mut s, Key::Down);
            move_cursor(&mut s, Key::Char('d'));
        }
        assert_eq!(s.cursor, 8);
        assert!(!move_cursor(&mut s, Key::Enter));
    }

    #[test]
    fn player_move_hands_turn_to_cpu() {
        let mut s = playing();
        assert_eq!(place(&mut s, 4, &mut rng()), None);
        assert_eq!(s.board[4], Mark::Player);
        assert_eq!(s.turn, Mark::Cpu);
        assert_eq!(s.message, "CPU IS THINKING...");
        assert!(s.cpu_timer.is_some());
    }

    #[test]
    fn occupied_cell_is_ignored() {
        let mut s = playing();
        s.board[0] = Mark::Cpu;
        place(&mut s, 0, &mut rng());
        assert_eq!(s.board[0], Mark::Cpu);
        assert_eq!(s.turn, Mark::Player);
    }

    #[test]
    fn cpu_thinks_before_moving() {
        let mut s = playing();
        let mut r = rng();
        place(&mut s, 0, &mut r);
        tick(&mut s, 399.0, &mut r);
        assert_eq!(s.turn, Mark::Cpu);
        tick(&mut s, 401.0, &mut r);
        assert_eq!(s.turn, Mark::Player);
        assert_eq!(s.board.iter().filter(|m| **m == Mark::Cpu).count(), 1);
        assert_eq!(s.message, "YOUR TURN (X)");
    }

    #[test]
    fn round_win_then_next_round() {
        let mut s = playing();
        s.board = [
            Mark::Player, Mark::Player, Mark::Empty,
            Mark::Cpu, Mark::Cpu, Mark::Empty,
            Mark::Empty, Mark::Empty, Mark::Empty,
        ];
        let out = place(&mut s, 2, &mut rng());
        assert_eq!(out, Some(Outcome::Win(Mark::Player, [0, 1, 2])));
        assert_eq!(s.phase, Phase::RoundEnd);
        assert_eq!(s.player_wins, 1);

        tick(&mut s, 1799.0, &mut rng());
        assert_eq!(s.phase, Phase::RoundEnd);
        tick(&mut s, 1.0, &mut rng());
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.round, 2);
        assert_eq!(s.board, [Mark::Empty; 9]);
    }

    #[test]
    fn third_win_ends_match() {
        let mut s = playing();
        s.cpu_wins = 2;
        s.turn = Mark::Cpu;
        s.board = [
            Mark::Cpu, Mark::Cpu, Mark::Empty,
            Mark::Player, Mark::Player, Mark::Empty,
            Mark::Player, Mark::Empty, Mark::Empty,
        ];
        place(&mut s, 2, &mut rng());
        assert!(s.match_decided());
        tick(&mut s, 1800.0, &mut rng());
        assert_eq!(s.phase, Phase::MatchEnd);
        assert_eq!(s.message, "=== CPU WINS THE MATCH! ===");
    }

    #[test]
    fn draw_scores_nobody() {
        let mut s = playing();
        s.board = [
            Mark::Player, Mark::Cpu, Mark::Player,
            Mark::Player, Mark::Cpu, Mark::Cpu,
            Mark::Cpu, Mark::Player, Mark::Empty,
        ];
        assert_eq!(place(&mut s, 8, &mut rng()), Some(Outcome::Draw));
        assert_eq!((s.player_wins, s.cpu_wins), (0, 0));
        assert_eq!(s.message, "** IT'S A DRAW! **");
    }

    #[test]
    fn cursor_blinks() {
        let mut s = TicTacToeState::new();
        tick(&mut s, 400.0, &mut rng());
        assert!(!s.blink_on);
        tick(&mut s, 800.0, &mut rng());
        assert!(!s.blink_on);
        tick(&mut s, 400.0, &mut rng());
        assert!(s.blink_on);
    }
}
