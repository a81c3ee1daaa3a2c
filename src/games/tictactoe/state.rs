/// Tic-Tac-Toe match state.

use crate::time::Timer;

pub const ARENA_W: i32 = 70;
pub const ARENA_H: i32 = 30;
/// Round wins needed to take the match.
pub const WIN_ROUNDS: u32 = 3;

pub const BLINK_MS: f64 = 400.0;
pub const ROUND_PAUSE_MS: f64 = 1800.0;
pub const THINK_MIN_MS: f64 = 400.0;
pub const THINK_SPREAD_MS: f64 = 400.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Empty,
    Player,
    Cpu,
}

/// Row-major, top-left first.
pub type Board = [Mark; 9];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Intro,
    Playing,
    RoundEnd,
    MatchEnd,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TicTacToeState {
    pub board: Board,
    pub cursor: usize,
    /// `Mark::Player` or `Mark::Cpu`.
    pub turn: Mark,
    pub phase: Phase,
    pub round: u32,
    pub player_wins: u32,
    pub cpu_wins: u32,
    /// Status line under the board.
    pub message: String,
    pub blink_on: bool,
    pub blink_timer: Option<Timer>,
    /// Fires when the CPU has finished "thinking".
    pub cpu_timer: Option<Timer>,
    pub round_timer: Option<Timer>,
    pub running: bool,
}

impl TicTacToeState {
    pub fn new() -> Self {
        Self {
            board: [Mark::Empty; 9],
            cursor: 4,
            turn: Mark::Player,
            phase: Phase::Intro,
            round: 1,
            player_wins: 0,
            cpu_wins: 0,
            message: String::new(),
            blink_on: true,
            blink_timer: Some(Timer::every(BLINK_MS)),
            cpu_timer: None,
            round_timer: None,
            running: true,
        }
    }

    pub fn match_decided(&self) -> bool {
        self.player_wins >= WIN_ROUNDS || self.cpu_wins >= WIN_ROUNDS
    }
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}
