/// Space Invaders simulation: pure functions over `InvadersState`.

use rand::Rng;

use crate::grid::to_cell;
use crate::time::Timer;

use super::state::{
    Alien, Bullet, InvadersState, Phase, ALIEN_COLS, ALIEN_POINTS, ALIEN_ROWS, ALIEN_SPACING,
    ALIEN_START_COL, ARENA_H, ARENA_W, COUNTDOWN_FROM, COUNTDOWN_MS, ENEMY_BULLET_SPEED,
    FIRE_CHANCE, INVINCIBLE_MS, MAX_ENEMY_BULLETS, MAX_FRAME_MS, PLAYER_BULLET_SPEED, PLAYER_ROW,
    SHIP_SPEED, SPRITE_W, WAVE_CLEAR_MS,
};

/// Held ship controls for one step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShipInput {
    pub left: bool,
    pub right: bool,
}

/// Events the caller has to act on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    WaveCleared,
    GameOver,
}

/// Swarm tick interval for `wave` after `killed` aliens died this wave.
/// Never below 100ms.
pub fn swarm_interval(wave: u32, killed: usize) -> f64 {
    let base = (600.0 - 30.0 * wave.saturating_sub(1) as f64).max(300.0);
    (base - 15.0 * killed as f64).max(100.0)
}

/// Spawn a fresh swarm. Later waves start lower (up to five rows) and faster.
pub fn start_wave(state: &mut InvadersState) {
    let start_row = 3 + state.wave.saturating_sub(1).min(5) as i32;
    state.aliens = (0..ALIEN_ROWS)
        .flat_map(|r| {
            (0..ALIEN_COLS).map(move |c| Alien {
                kind: r,
                base_x: ALIEN_START_COL + c as i32 * ALIEN_SPACING,
                base_y: start_row + r as i32 * 2,
                alive: true,
            })
        })
        .collect();
    state.dir = 1;
    state.offset_x = 0;
    state.offset_y = 0;
    state.bullet = None;
    state.enemy_bullets.clear();
    state.base_interval = swarm_interval(state.wave, 0);
    state.interval = state.base_interval;
    state.swarm_elapsed = 0.0;
}

pub fn start_countdown(state: &mut InvadersState) {
    state.phase = Phase::Countdown;
    state.countdown = COUNTDOWN_FROM;
    state.countdown_timer = Some(Timer::every(COUNTDOWN_MS));
}

pub fn tick_countdown(state: &mut InvadersState, elapsed_ms: f64) {
    let Some(timer) = state.countdown_timer.as_mut() else {
        return;
    };
    for _ in 0..timer.advance(elapsed_ms) {
        state.countdown = state.countdown.saturating_sub(1);
        if state.countdown == 0 {
            state.countdown_timer = None;
            state.phase = Phase::Playing;
            state.step.reset();
            state.swarm_elapsed = 0.0;
            break;
        }
    }
}

/// After the wave-clear pause, set up the next wave.
pub fn tick_wave_clear(state: &mut InvadersState, elapsed_ms: f64) {
    let fired = state.wave_timer.as_mut().map_or(0, |t| t.advance(elapsed_ms));
    if fired > 0 {
        state.wave_timer = None;
        state.wave += 1;
        start_wave(state);
        start_countdown(state);
    }
}

pub fn fire(state: &mut InvadersState) {
    if state.phase != Phase::Playing || state.paused || state.bullet.is_some() {
        return;
    }
    state.bullet = Some(Bullet {
        x: to_cell(state.player_x) as f64,
        y: (PLAYER_ROW - 1) as f64,
    });
}

pub fn toggle_pause(state: &mut InvadersState) {
    if state.phase != Phase::Playing {
        return;
    }
    state.paused = !state.paused;
    if !state.paused {
        state.step.reset();
    }
}

/// Shift the swarm one column, or reverse and drop one row when any living
/// alien's next position would touch a side border. Frontier aliens may
/// then fire.
pub fn swarm_tick(state: &mut InvadersState, rng: &mut impl Rng) {
    let next = state.offset_x + state.dir;
    let must_reverse = state.aliens.iter().filter(|a| a.alive).any(|a| {
        let x = a.base_x + next;
        x <= 1 || x + SPRITE_W - 1 >= ARENA_W - 1
    });
    if must_reverse {
        state.dir = -state.dir;
        state.offset_y += 1;
    } else {
        state.offset_x = next;
    }

    if state.enemy_bullets.len() >= MAX_ENEMY_BULLETS {
        return;
    }
    for shooter in frontier(state) {
        if state.enemy_bullets.len() >= MAX_ENEMY_BULLETS {
            break;
        }
        if rng.random::<f64>() < FIRE_CHANCE {
            let (x, y) = state.alien_pos(&state.aliens[shooter]);
            state.enemy_bullets.push(Bullet {
                x: (x + 1) as f64,
                y: (y + 1) as f64,
            });
        }
    }
}

/// Index of the lowest living alien in each column.
pub fn frontier(state: &InvadersState) -> Vec<usize> {
    (0..ALIEN_COLS)
        .filter_map(|c| {
            (0..ALIEN_ROWS)
                .rev()
                .map(|r| r * ALIEN_COLS + c)
                .find(|&i| state.aliens.get(i).is_some_and(|a| a.alive))
        })
        .collect()
}

fn kill_alien_under_bullet(state: &mut InvadersState) {
    let Some(bullet) = &state.bullet else {
        return;
    };
    let (bx, by) = (to_cell(bullet.x), to_cell(bullet.y));
    let (ox, oy) = (state.offset_x, state.offset_y);
    let hit = state.aliens.iter().position(|a| {
        let (ax, ay) = (a.base_x + ox, a.base_y + oy);
        a.alive && by == ay && bx >= ax && bx < ax + SPRITE_W
    });
    if let Some(i) = hit {
        state.aliens[i].alive = false;
        state.score += ALIEN_POINTS[state.aliens[i].kind];
        state.bullet = None;
        let killed = state.aliens.len() - state.alive_count();
        state.interval = swarm_interval(state.wave, killed);
    }
}

/// Returns true when an enemy bullet struck the ship.
fn enemy_bullet_hits_ship(state: &mut InvadersState) -> bool {
    if state.is_invincible() {
        return false;
    }
    let px = to_cell(state.player_x);
    let hit = state.enemy_bullets.iter().rposition(|b| {
        let x = to_cell(b.x);
        to_cell(b.y) == PLAYER_ROW && x >= px - 1 && x <= px + 1
    });
    match hit {
        Some(i) => {
            state.enemy_bullets.remove(i);
            true
        }
        None => false,
    }
}

fn game_over(state: &mut InvadersState) -> Option<StepOutcome> {
    state.phase = Phase::GameOver;
    Some(StepOutcome::GameOver)
}

/// One fixed step of play: ship, player bullet, swarm (when due), enemy
/// bullets, collisions, then the end-of-wave checks.
pub fn step(
    state: &mut InvadersState,
    input: ShipInput,
    dt: f64,
    rng: &mut impl Rng,
) -> Option<StepOutcome> {
    if input.left {
        state.player_x -= SHIP_SPEED * dt;
    }
    if input.right {
        state.player_x += SHIP_SPEED * dt;
    }
    state.player_x = state.player_x.clamp(2.0, (ARENA_W - 3) as f64);

    if let Some(b) = state.bullet.as_mut() {
        b.y -= PLAYER_BULLET_SPEED;
        if b.y < 1.0 {
            state.bullet = None;
        }
    }

    state.swarm_elapsed += dt;
    if state.swarm_elapsed >= state.interval {
        state.swarm_elapsed = 0.0;
        swarm_tick(state, rng);
    }

    for b in state.enemy_bullets.iter_mut() {
        b.y += ENEMY_BULLET_SPEED;
    }
    state.enemy_bullets.retain(|b| b.y < (ARENA_H - 1) as f64);

    if let Some(t) = state.invincible_for.as_mut() {
        *t += dt;
        if *t >= INVINCIBLE_MS {
            state.invincible_for = None;
        }
    }

    kill_alien_under_bullet(state);
    if enemy_bullet_hits_ship(state) {
        state.lives = state.lives.saturating_sub(1);
        if state.lives == 0 {
            return game_over(state);
        }
        state.invincible_for = Some(0.0);
    }

    let oy = state.offset_y;
    if state
        .aliens
        .iter()
        .any(|a| a.alive && a.base_y + oy >= PLAYER_ROW)
    {
        return game_over(state);
    }

    if state.alive_count() == 0 {
        state.phase = Phase::WaveClear;
        state.bullet = None;
        state.enemy_bullets.clear();
        state.wave_timer = Some(Timer::once(WAVE_CLEAR_MS));
        return Some(StepOutcome::WaveCleared);
    }
    None
}

/// Run as many fixed steps as the frame allows. Stops at the first outcome.
pub fn advance(
    state: &mut InvadersState,
    elapsed_ms: f64,
    input: ShipInput,
    rng: &mut impl Rng,
) -> Option<StepOutcome> {
    if state.phase != Phase::Playing || state.paused {
        return None;
    }
    state.step.feed(elapsed_ms.min(MAX_FRAME_MS));
    let dt = state.step.step_ms();
    while state.step.next_step() {
        if let Some(outcome) = step(state, input, dt, rng) {
            return Some(outcome);
        }
    }
    None
}

/// Whether the ship is drawn this frame; it blinks while invincible.
pub fn ship_visible(state: &InvadersState) -> bool {
    match state.invincible_for {
        Some(t) => (t / super::state::BLINK_MS).floor() as i64 % 2 == 0,
        None => true,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_interval_never_below_floor(wave in 1u32..1000, killed in 0usize..=32) {
            prop_assert!(swarm_interval(wave, killed) >= 100.0);
        }

        #[test]
        fn prop_interval_shrinks_with_kills(wave in 1u32..40, killed in 0usize..32) {
            prop_assert!(swarm_interval(wave, killed + 1) <= swarm_interval(wave, killed));
        }
    }
}
