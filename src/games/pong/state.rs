/// Pong game state.

use crate::store::Team;
use crate::time::{FixedStep, Timer};

pub const ARENA_W: i32 = 70;
pub const ARENA_H: i32 = 30;
pub const PADDLE_H: i32 = 6;
/// Rows above and below the paddle center.
pub const PADDLE_HALF: i32 = PADDLE_H / 2;
pub const WIN_SCORE: u32 = 7;

/// Physics step (ms).
pub const STEP_MS: f64 = 16.0;
/// Longest frame fed to the physics accumulator.
pub const MAX_FRAME_MS: f64 = 100.0;
/// Cells per ms per unit of speed.
pub const SPEED_SCALE: f64 = 0.06;

pub const COUNTDOWN_FROM: u32 = 3;
pub const COUNTDOWN_MS: f64 = 800.0;
pub const POINT_PAUSE_MS: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Speeds for one difficulty preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Speeds {
    pub ball: f64,
    pub player: f64,
    pub ai: f64,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub fn speeds(self) -> Speeds {
        match self {
            Difficulty::Easy => Speeds { ball: 0.30, player: 0.40, ai: 0.16 },
            Difficulty::Medium => Speeds { ball: 0.40, player: 0.48, ai: 0.22 },
            Difficulty::Hard => Speeds { ball: 0.52, player: 0.52, ai: 0.28 },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "[1]  EASY    -  Chill rally",
            Difficulty::Medium => "[2]  MEDIUM  -  Classic",
            Difficulty::Hard => "[3]  HARD    -  Lightning",
        }
    }

    pub fn from_number(n: u32) -> Option<Difficulty> {
        match n {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Previous preset, wrapping from Easy to Hard.
    pub fn prev(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }

    pub fn next(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Choosing a preset before the match.
    Difficulty,
    Countdown,
    Playing,
    /// Short pause after a point.
    Point,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PongState {
    pub difficulty: Difficulty,
    /// Speeds fixed when the match starts.
    pub speeds: Speeds,
    pub phase: Phase,
    pub countdown: u32,
    pub paused: bool,
    /// Paddle centers.
    pub player_y: f64,
    pub ai_y: f64,
    pub ball: Ball,
    /// Paddle hits in the current rally.
    pub hits: u32,
    pub last_scorer: Option<Team>,
    pub step: FixedStep,
    pub countdown_timer: Option<Timer>,
    pub point_timer: Option<Timer>,
    pub running: bool,
}

impl PongState {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            speeds: difficulty.speeds(),
            phase: Phase::Difficulty,
            countdown: COUNTDOWN_FROM,
            paused: false,
            player_y: (ARENA_H / 2) as f64,
            ai_y: (ARENA_H / 2) as f64,
            ball: Ball {
                x: ARENA_W as f64 / 2.0,
                y: ARENA_H as f64 / 2.0,
                dx: 1.0,
                dy: 0.0,
            },
            hits: 0,
            last_scorer: None,
            step: FixedStep::new(STEP_MS),
            countdown_timer: None,
            point_timer: None,
            running: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state() {
        let s = PongState::new(Difficulty::Medium);
        assert_eq!(s.phase, Phase::Difficulty);
        assert_eq!(s.player_y, 15.0);
        assert_eq!(s.ai_y, 15.0);
        assert!(s.running);
        assert!(s.countdown_timer.is_none());
    }

    #[test]
    fn difficulty_cycles_both_ways() {
        for d in Difficulty::all() {
            assert_eq!(d.next().prev(), d);
        }
        assert_eq!(Difficulty::Easy.prev(), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
    }

    #[test]
    fn presets_get_faster() {
        let [e, m, h] = Difficulty::all().map(Difficulty::speeds);
        assert!(e.ball < m.ball && m.ball < h.ball);
        assert!(e.ai < m.ai && m.ai < h.ai);
    }
}
