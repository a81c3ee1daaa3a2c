/// Snake game state.

use std::collections::VecDeque;

use crate::time::Timer;

pub const ARENA_W: i32 = 70;
pub const ARENA_H: i32 = 30;
pub const START_LEN: i32 = 3;

pub const INITIAL_MOVE_MS: f64 = 130.0;
pub const MIN_MOVE_MS: f64 = 55.0;
/// Move interval shaved off per food.
pub const SPEEDUP_MS: f64 = 2.0;
pub const FOOD_ATTEMPTS: u32 = 1000;

pub const COUNTDOWN_FROM: u32 = 3;
pub const COUNTDOWN_MS: f64 = 700.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Intro,
    Countdown,
    Playing,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SnakeState {
    pub phase: Phase,
    pub countdown: u32,
    pub paused: bool,
    /// Head first.
    pub body: VecDeque<Pos>,
    pub dir: Dir,
    /// Applied on the next move.
    pub next_dir: Dir,
    pub food: Pos,
    pub score: u32,
    pub best_score: u32,
    /// Current move interval (ms).
    pub move_ms: f64,
    pub move_timer: Option<Timer>,
    pub countdown_timer: Option<Timer>,
    pub running: bool,
}

impl SnakeState {
    /// Centered, three segments, heading right. Food is placed by the caller.
    pub fn new(best_score: u32) -> Self {
        let (cx, cy) = (ARENA_W / 2, ARENA_H / 2);
        Self {
            phase: Phase::Intro,
            countdown: COUNTDOWN_FROM,
            paused: false,
            body: (0..START_LEN).map(|i| Pos { x: cx - i, y: cy }).collect(),
            dir: Dir::Right,
            next_dir: Dir::Right,
            food: Pos { x: 1, y: 1 },
            score: 0,
            best_score,
            move_ms: INITIAL_MOVE_MS,
            move_timer: None,
            countdown_timer: None,
            running: true,
        }
    }

    pub fn head(&self) -> Pos {
        self.body.front().copied().unwrap_or(Pos {
            x: ARENA_W / 2,
            y: ARENA_H / 2,
        })
    }
}
