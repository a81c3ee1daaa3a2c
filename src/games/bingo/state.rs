/// Bingo round and match state.

use crate::time::Timer;

pub const ARENA_W: i32 = 70;
pub const ARENA_H: i32 = 30;
pub const CARD_SIZE: usize = 5;
pub const BALL_COUNT: u8 = 75;
/// Round wins needed to take the match.
pub const WIN_ROUNDS: u32 = 3;

pub const MANUAL_CALL_MS: f64 = 3500.0;
pub const AUTO_CALL_MS: f64 = 1500.0;
/// Pause before the match-end screen.
pub const MATCH_END_DELAY_MS: f64 = 2000.0;
/// Pause before the next round.
pub const NEXT_ROUND_DELAY_MS: f64 = 2500.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// 0 for the free centre.
    pub num: u8,
    pub marked: bool,
    pub free: bool,
}

pub type Card = [[Cell; CARD_SIZE]; CARD_SIZE];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The player marks called numbers by hand.
    Manual,
    /// Both cards mark themselves.
    Auto,
}

impl Mode {
    pub fn call_interval(self) -> f64 {
        match self {
            Mode::Manual => MANUAL_CALL_MS,
            Mode::Auto => AUTO_CALL_MS,
        }
    }

    pub fn toggle(self) -> Mode {
        match self {
            Mode::Manual => Mode::Auto,
            Mode::Auto => Mode::Manual,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    ModeSelect,
    Playing,
    RoundEnd,
    MatchEnd,
}

/// Who called bingo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Cpu,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BingoState {
    pub phase: Phase,
    pub mode: Mode,
    /// Highlighted option on the mode screen.
    pub mode_cursor: Mode,
    pub player_card: Card,
    pub cpu_card: Card,
    /// Remaining balls; the next call comes off the end.
    pub pool: Vec<u8>,
    pub called: Vec<u8>,
    pub current_call: Option<u8>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub round: u32,
    pub match_over: bool,
    pub call_timer: Option<Timer>,
    pub round_timer: Option<Timer>,
    pub running: bool,
}

impl BingoState {
    pub fn new() -> Self {
        Self {
            phase: Phase::ModeSelect,
            mode: Mode::Manual,
            mode_cursor: Mode::Manual,
            player_card: Card::default(),
            cpu_card: Card::default(),
            pool: Vec::new(),
            called: Vec::new(),
            current_call: None,
            cursor_row: 0,
            cursor_col: 0,
            round: 1,
            match_over: false,
            call_timer: None,
            round_timer: None,
            running: true,
        }
    }
}

impl Default for BingoState {
    fn default() -> Self {
        Self::new()
    }
}
