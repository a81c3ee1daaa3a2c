/// Pong physics and match flow: pure functions, fully testable.

use rand::Rng;

use crate::store::{LiveScore, Team};
use crate::time::Timer;

use super::state::{
    Phase, PongState, ARENA_H, ARENA_W, COUNTDOWN_FROM, COUNTDOWN_MS, MAX_FRAME_MS, PADDLE_HALF,
    POINT_PAUSE_MS, SPEED_SCALE, WIN_SCORE,
};

/// Held paddle controls for one physics step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PaddleInput {
    pub up: bool,
    pub down: bool,
}

/// Rally speed boost: 5% per paddle hit, capped at 1.6x.
pub fn speed_multiplier(hits: u32) -> f64 {
    (1.0 + hits as f64 * 0.05).min(1.6)
}

/// Ball distance covered in `dt` ms at the current rally speed.
pub fn ball_speed(state: &PongState, dt: f64) -> f64 {
    state.speeds.ball * dt * SPEED_SCALE * speed_multiplier(state.hits)
}

fn clamp_paddle(y: f64) -> f64 {
    let half = PADDLE_HALF as f64;
    y.clamp(half + 1.0, ARENA_H as f64 - half - 2.0)
}

/// Serve from the center in a random direction.
pub fn reset_ball(state: &mut PongState, rng: &mut impl Rng) {
    state.ball.x = ARENA_W as f64 / 2.0;
    state.ball.y = ARENA_H as f64 / 2.0;
    state.ball.dx = if rng.random::<f64>() > 0.5 { 1.0 } else { -1.0 };
    state.ball.dy = (rng.random::<f64>() - 0.5) * 1.2;
    state.hits = 0;
}

/// Lock in the chosen preset and start the first countdown.
pub fn start_match(state: &mut PongState) {
    state.speeds = state.difficulty.speeds();
    start_countdown(state);
}

pub fn start_countdown(state: &mut PongState) {
    state.phase = Phase::Countdown;
    state.countdown = COUNTDOWN_FROM;
    state.countdown_timer = Some(Timer::every(COUNTDOWN_MS));
}

/// Run the serve countdown; enters `Playing` when it reaches zero.
pub fn tick_countdown(state: &mut PongState, elapsed_ms: f64) {
    let Some(timer) = state.countdown_timer.as_mut() else {
        return;
    };
    for _ in 0..timer.advance(elapsed_ms) {
        state.countdown = state.countdown.saturating_sub(1);
        if state.countdown == 0 {
            state.countdown_timer = None;
            state.phase = Phase::Playing;
            state.step.reset();
            break;
        }
    }
}

/// Wait out the pause after a point, then serve again.
pub fn tick_point_pause(state: &mut PongState, elapsed_ms: f64) {
    let fired = state
        .point_timer
        .as_mut()
        .map_or(0, |t| t.advance(elapsed_ms));
    if fired > 0 {
        state.point_timer = None;
        start_countdown(state);
    }
}

pub fn update_player(state: &mut PongState, input: PaddleInput, dt: f64) {
    let step = state.speeds.player * dt * SPEED_SCALE;
    if input.up {
        state.player_y -= step;
    }
    if input.down {
        state.player_y += step;
    }
    state.player_y = clamp_paddle(state.player_y);
}

/// The AI only tracks the ball once it is heading its way past 30% of the
/// arena; otherwise it drifts back to center at half speed.
pub fn update_ai(state: &mut PongState, dt: f64) {
    let ai = state.speeds.ai;
    if state.ball.dx > 0.0 && state.ball.x > ARENA_W as f64 * 0.3 {
        let diff = state.ball.y - state.ai_y;
        if diff.abs() > 1.5 {
            state.ai_y += diff.signum() * ai * dt * SPEED_SCALE;
        }
    } else {
        let center_diff = ARENA_H as f64 / 2.0 - state.ai_y;
        if center_diff.abs() > 2.0 {
            state.ai_y += center_diff.signum() * ai * dt * SPEED_SCALE / 2.0;
        }
    }
    state.ai_y = clamp_paddle(state.ai_y);
}

/// Vertical deflection from where the ball met the paddle.
fn deflection(ball_y: f64, paddle_y: f64) -> f64 {
    ((ball_y - paddle_y) / PADDLE_HALF as f64 * 0.8).clamp(-1.2, 1.2)
}

/// Ball overlaps a paddle centered on `paddle_y` (rounded to its cell).
fn meets_paddle(ball_y: f64, paddle_y: f64) -> bool {
    let py = paddle_y.round();
    let reach = PADDLE_HALF as f64 + 0.5;
    ball_y >= py - reach && ball_y <= py + reach
}

/// Move the ball one step. Returns the side that scored, if any.
pub fn update_ball(state: &mut PongState, dt: f64) -> Option<Team> {
    let speed = ball_speed(state, dt);
    let ball = &mut state.ball;
    ball.x += ball.dx * speed;
    ball.y += ball.dy * speed;

    if ball.y <= 1.0 {
        ball.y = 1.0;
        ball.dy = ball.dy.abs();
    }
    let floor = (ARENA_H - 2) as f64;
    if ball.y >= floor {
        ball.y = floor;
        ball.dy = -ball.dy.abs();
    }

    if ball.dx < 0.0 && (2.0..=3.5).contains(&ball.x) && meets_paddle(ball.y, state.player_y) {
        ball.x = 3.5;
        ball.dx = ball.dx.abs();
        ball.dy = deflection(ball.y, state.player_y);
        state.hits += 1;
    }

    let w = ARENA_W as f64;
    if ball.dx > 0.0 && (w - 4.5..=w - 3.0).contains(&ball.x) && meets_paddle(ball.y, state.ai_y) {
        ball.x = w - 4.5;
        ball.dx = -ball.dx.abs();
        ball.dy = deflection(ball.y, state.ai_y);
        state.hits += 1;
    }

    if ball.x <= 0.0 {
        Some(Team::B)
    } else if ball.x >= w - 1.0 {
        Some(Team::A)
    } else {
        None
    }
}

/// Feed frame time into the accumulator and run whole physics steps in
/// order player, AI, ball. Stops at the first point scored; the leftover
/// time is discarded when play resumes.
pub fn advance_physics(state: &mut PongState, elapsed_ms: f64, input: PaddleInput) -> Option<Team> {
    if state.phase != Phase::Playing || state.paused {
        return None;
    }
    state.step.feed(elapsed_ms.min(MAX_FRAME_MS));
    let dt = state.step.step_ms();
    while state.step.next_step() {
        update_player(state, input, dt);
        update_ai(state, dt);
        if let Some(team) = update_ball(state, dt) {
            return Some(team);
        }
    }
    None
}

/// What the live score means after a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointOutcome {
    NextServe,
    MatchOver,
}

/// Move to the point pause or end the match, given the score after the
/// point was counted.
pub fn after_point(
    state: &mut PongState,
    scorer: Team,
    score: LiveScore,
    rng: &mut impl Rng,
) -> PointOutcome {
    state.last_scorer = Some(scorer);
    if score.a >= WIN_SCORE || score.b >= WIN_SCORE {
        state.phase = Phase::GameOver;
        return PointOutcome::MatchOver;
    }
    state.phase = Phase::Point;
    reset_ball(state, rng);
    state.point_timer = Some(Timer::once(POINT_PAUSE_MS));
    PointOutcome::NextServe
}

pub fn toggle_pause(state: &mut PongState) {
    if state.phase != Phase::Playing {
        return;
    }
    state.paused = !state.paused;
    if !state.paused {
        state.step.reset();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::games::pong::state::Difficulty;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_speed_non_decreasing_and_capped(hits in 0u32..200) {
            let m = speed_multiplier(hits);
            prop_assert!(m >= 1.0 && m <= 1.6);
            prop_assert!(speed_multiplier(hits + 1) >= m);
        }

        #[test]
        fn prop_same_deltas_same_states(
            deltas in prop::collection::vec(0.0f64..80.0, 1..60),
            ups in prop::collection::vec(any::<bool>(), 60),
        ) {
            let mut a = PongState::new(Difficulty::Hard);
            start_match(&mut a);
            a.phase = Phase::Playing;
            a.countdown_timer = None;
            let mut b = a.clone();
            for (i, dt) in deltas.iter().enumerate() {
                let input = PaddleInput { up: ups[i], down: !ups[i] };
                let sa = advance_physics(&mut a, *dt, input);
                let sb = advance_physics(&mut b, *dt, input);
                prop_assert_eq!(sa, sb);
                prop_assert_eq!(&a, &b);
                if sa.is_some() {
                    break;
                }
            }
        }
    }
}
