/// Space Invaders game state.

use crate::time::{FixedStep, Timer};

pub const ARENA_W: i32 = 70;
pub const ARENA_H: i32 = 30;

/// Sprites and points by swarm row, top to bottom.
pub const ALIEN_SPRITES: [&str; 4] = ["{O}", "<H>", "[M]", "/V\\"];
pub const ALIEN_POINTS: [u32; 4] = [10, 20, 30, 40];
pub const ALIEN_ROWS: usize = 4;
pub const ALIEN_COLS: usize = 8;
pub const ALIEN_SPACING: i32 = 5;
pub const ALIEN_START_COL: i32 = 8;
/// Every sprite in the game is three cells wide.
pub const SPRITE_W: i32 = 3;

pub const PLAYER_SPRITE: &str = "/A\\";
pub const PLAYER_ROW: i32 = 27;
pub const START_LIVES: u32 = 3;

pub const STEP_MS: f64 = 16.0;
/// Longest frame fed to the step accumulator.
pub const MAX_FRAME_MS: f64 = 50.0;
/// Ship speed in cells per ms.
pub const SHIP_SPEED: f64 = 0.35 * 0.06;
/// Rows per step.
pub const PLAYER_BULLET_SPEED: f64 = 0.5;
pub const ENEMY_BULLET_SPEED: f64 = 0.3;
pub const MAX_ENEMY_BULLETS: usize = 3;
/// Chance per swarm tick that a frontier alien fires.
pub const FIRE_CHANCE: f64 = 0.03;

pub const COUNTDOWN_FROM: u32 = 3;
pub const COUNTDOWN_MS: f64 = 700.0;
pub const WAVE_CLEAR_MS: f64 = 2000.0;
pub const INVINCIBLE_MS: f64 = 1500.0;
/// Ship blink half-period while invincible.
pub const BLINK_MS: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Intro,
    Countdown,
    Playing,
    WaveClear,
    GameOver,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    /// Swarm row, indexes `ALIEN_SPRITES` and `ALIEN_POINTS`.
    pub kind: usize,
    pub base_x: i32,
    pub base_y: i32,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InvadersState {
    pub phase: Phase,
    pub countdown: u32,
    pub paused: bool,

    pub player_x: f64,
    pub lives: u32,
    pub score: u32,
    /// Best score on record, raised when this session beats it.
    pub best_score: u32,
    pub wave: u32,
    /// One player bullet at a time.
    pub bullet: Option<Bullet>,
    pub enemy_bullets: Vec<Bullet>,

    /// Row-major, `ALIEN_ROWS` x `ALIEN_COLS`.
    pub aliens: Vec<Alien>,
    pub dir: i32,
    pub offset_x: i32,
    pub offset_y: i32,
    /// Swarm tick interval at the start of the wave (ms).
    pub base_interval: f64,
    /// Current interval, shrinking as aliens die.
    pub interval: f64,
    /// Game time since the last swarm tick.
    pub swarm_elapsed: f64,

    /// Time since the last hit while invincible.
    pub invincible_for: Option<f64>,

    pub step: FixedStep,
    pub countdown_timer: Option<Timer>,
    pub wave_timer: Option<Timer>,
    pub running: bool,
}

impl InvadersState {
    pub fn new(best_score: u32) -> Self {
        Self {
            phase: Phase::Intro,
            countdown: COUNTDOWN_FROM,
            paused: false,
            player_x: (ARENA_W / 2) as f64,
            lives: START_LIVES,
            score: 0,
            best_score,
            wave: 1,
            bullet: None,
            enemy_bullets: Vec::new(),
            aliens: Vec::new(),
            dir: 1,
            offset_x: 0,
            offset_y: 0,
            base_interval: 600.0,
            interval: 600.0,
            swarm_elapsed: 0.0,
            invincible_for: None,
            step: FixedStep::new(STEP_MS),
            countdown_timer: None,
            wave_timer: None,
            running: true,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.aliens.iter().filter(|a| a.alive).count()
    }

    /// Screen position of an alien's left cell.
    pub fn alien_pos(&self, alien: &Alien) -> (i32, i32) {
        (alien.base_x + self.offset_x, alien.base_y + self.offset_y)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_for.is_some()
    }
}
