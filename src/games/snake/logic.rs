/// Snake movement, food and phase flow.

use rand::Rng;

use crate::time::Timer;

use super::state::{
    Dir, Phase, Pos, SnakeState, ARENA_H, ARENA_W, COUNTDOWN_FROM, COUNTDOWN_MS, FOOD_ATTEMPTS,
    MIN_MOVE_MS, SPEEDUP_MS,
};

/// Random inner cell off the body. After too many misses the last try stands.
pub fn spawn_food(state: &mut SnakeState, rng: &mut impl Rng) {
    for _ in 0..FOOD_ATTEMPTS {
        state.food = Pos {
            x: rng.random_range(1..ARENA_W - 1),
            y: rng.random_range(1..ARENA_H - 1),
        };
        if !state.body.contains(&state.food) {
            return;
        }
    }
}

pub fn start_countdown(state: &mut SnakeState) {
    state.phase = Phase::Countdown;
    state.countdown = COUNTDOWN_FROM;
    state.countdown_timer = Some(Timer::every(COUNTDOWN_MS));
}

pub fn tick_countdown(state: &mut SnakeState, elapsed_ms: f64) {
    let Some(timer) = state.countdown_timer.as_mut() else {
        return;
    };
    for _ in 0..timer.advance(elapsed_ms) {
        state.countdown = state.countdown.saturating_sub(1);
        if state.countdown == 0 {
            state.countdown_timer = None;
            state.phase = Phase::Playing;
            schedule_move(state);
            break;
        }
    }
}

fn schedule_move(state: &mut SnakeState) {
    state.move_timer = Some(Timer::once(state.move_ms));
}

/// Buffer a turn. Turning back onto the neck is refused.
pub fn steer(state: &mut SnakeState, dir: Dir) -> bool {
    if state.phase != Phase::Playing || dir == state.dir.opposite() {
        return false;
    }
    state.next_dir = dir;
    true
}

pub fn toggle_pause(state: &mut SnakeState) {
    if state.phase != Phase::Playing {
        return;
    }
    state.paused = !state.paused;
    if state.paused {
        state.move_timer = None;
    } else {
        schedule_move(state);
    }
}

/// Whether a move ended the game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    Moved,
    Ate,
    Crashed,
}

/// One move: turn, then wall and body checks, then eat or drop the tail.
pub fn step(state: &mut SnakeState, rng: &mut impl Rng) -> MoveOutcome {
    state.dir = state.next_dir;
    let (dx, dy) = state.dir.delta();
    let head = state.head();
    let next = Pos {
        x: head.x + dx,
        y: head.y + dy,
    };

    let hits_wall = next.x <= 0 || next.x >= ARENA_W - 1 || next.y <= 0 || next.y >= ARENA_H - 1;
    if hits_wall || state.body.contains(&next) {
        state.phase = Phase::GameOver;
        state.move_timer = None;
        return MoveOutcome::Crashed;
    }

    state.body.push_front(next);
    if next == state.food {
        state.score += 1;
        state.move_ms = (state.move_ms - SPEEDUP_MS).max(MIN_MOVE_MS);
        spawn_food(state, rng);
        MoveOutcome::Ate
    } else {
        state.body.pop_back();
        MoveOutcome::Moved
    }
}

/// Advance the move timer. Returns true when the snake crashed this tick.
pub fn tick_moves(state: &mut SnakeState, elapsed_ms: f64, rng: &mut impl Rng) -> bool {
    if state.phase != Phase::Playing || state.paused {
        return false;
    }
    let due = state
        .move_timer
        .as_mut()
        .is_some_and(|t| t.advance(elapsed_ms) > 0);
    if !due {
        return false;
    }
    if step(state, rng) == MoveOutcome::Crashed {
        return true;
    }
    schedule_move(state);
    false
}
