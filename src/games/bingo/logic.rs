/// Cards, the call pool and round flow.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::input::Key;
use crate::store::LiveScore;
use crate::time::Timer;

use super::state::{
    BingoState, Card, Cell, Mode, Phase, Side, BALL_COUNT, CARD_SIZE, MATCH_END_DELAY_MS,
    NEXT_ROUND_DELAY_MS, WIN_ROUNDS,
};

/// Column letter and inclusive number band.
pub const BANDS: [(char, u8, u8); CARD_SIZE] = [
    ('B', 1, 15),
    ('I', 16, 30),
    ('N', 31, 45),
    ('G', 46, 60),
    ('O', 61, 75),
];

pub fn letter_for(num: u8) -> char {
    BANDS
        .iter()
        .find(|(_, lo, hi)| (*lo..=*hi).contains(&num))
        .map_or('?', |(letter, _, _)| *letter)
}

/// Five distinct numbers per column from that column's band, with a free,
/// pre-marked centre.
pub fn generate_card(rng: &mut impl Rng) -> Card {
    let mut card = Card::default();
    for (col, (_, lo, hi)) in BANDS.iter().enumerate() {
        let mut band: Vec<u8> = (*lo..=*hi).collect();
        band.shuffle(rng);
        for (row, num) in band.into_iter().take(CARD_SIZE).enumerate() {
            card[row][col] = Cell {
                num,
                marked: false,
                free: false,
            };
        }
    }
    card[2][2] = Cell {
        num: 0,
        marked: true,
        free: true,
    };
    card
}

pub fn shuffled_pool(rng: &mut impl Rng) -> Vec<u8> {
    let mut pool: Vec<u8> = (1..=BALL_COUNT).collect();
    pool.shuffle(rng);
    pool
}

/// Any complete row, column or diagonal.
pub fn has_bingo(card: &Card) -> bool {
    let all = |f: &dyn Fn(usize) -> (usize, usize)| {
        (0..CARD_SIZE).all(|i| {
            let (r, c) = f(i);
            card[r][c].marked
        })
    };
    (0..CARD_SIZE).any(|r| all(&|c| (r, c)))
        || (0..CARD_SIZE).any(|c| all(&|r| (r, c)))
        || all(&|d| (d, d))
        || all(&|d| (d, CARD_SIZE - 1 - d))
}

/// Mark `num` if it's on the card. Returns whether it was.
pub fn mark_number(card: &mut Card, num: u8) -> bool {
    for cell in card.iter_mut().flatten() {
        if !cell.free && cell.num == num {
            cell.marked = true;
            return true;
        }
    }
    false
}

pub fn start_round(state: &mut BingoState, rng: &mut impl Rng) {
    state.player_card = generate_card(rng);
    state.cpu_card = generate_card(rng);
    state.pool = shuffled_pool(rng);
    state.called.clear();
    state.current_call = None;
    state.cursor_row = 0;
    state.cursor_col = 0;
    state.phase = Phase::Playing;
    state.call_timer = Some(Timer::every(state.mode.call_interval()));
}

pub fn choose_mode(state: &mut BingoState, mode: Mode, rng: &mut impl Rng) {
    state.mode = mode;
    start_round(state, rng);
}

fn round_won(state: &mut BingoState, winner: Side) -> Option<Side> {
    state.call_timer = None;
    state.phase = Phase::RoundEnd;
    Some(winner)
}

/// Draw the next ball. The CPU card always marks; the player's only in
/// auto mode. The player wins a simultaneous bingo.
pub fn call_next(state: &mut BingoState) -> Option<Side> {
    let num = state.pool.pop()?;
    state.current_call = Some(num);
    state.called.push(num);

    mark_number(&mut state.cpu_card, num);
    if state.mode == Mode::Auto {
        mark_number(&mut state.player_card, num);
    }

    if has_bingo(&state.player_card) {
        round_won(state, Side::Player)
    } else if has_bingo(&state.cpu_card) {
        round_won(state, Side::Cpu)
    } else {
        None
    }
}

/// Mark the cell under the cursor, if its number has been called.
pub fn try_mark(state: &mut BingoState) -> Option<Side> {
    if state.mode != Mode::Manual || state.phase != Phase::Playing {
        return None;
    }
    let cell = &mut state.player_card[state.cursor_row][state.cursor_col];
    if cell.marked || cell.free || !state.called.contains(&cell.num) {
        return None;
    }
    cell.marked = true;
    if has_bingo(&state.player_card) {
        return round_won(state, Side::Player);
    }
    None
}

pub fn move_cursor(state: &mut BingoState, key: Key) -> bool {
    let last = CARD_SIZE - 1;
    if key.is_up() {
        state.cursor_row = state.cursor_row.saturating_sub(1);
    } else if key.is_down() {
        state.cursor_row = (state.cursor_row + 1).min(last);
    } else if key.is_left() {
        state.cursor_col = state.cursor_col.saturating_sub(1);
    } else if key.is_right() {
        state.cursor_col = (state.cursor_col + 1).min(last);
    } else {
        return false;
    }
    true
}

/// After a round win has been scored, queue the next round or the match end.
/// Returns true when the match is over.
pub fn schedule_after_round(state: &mut BingoState, score: LiveScore) -> bool {
    state.match_over = score.a >= WIN_ROUNDS || score.b >= WIN_ROUNDS;
    let delay = if state.match_over {
        MATCH_END_DELAY_MS
    } else {
        NEXT_ROUND_DELAY_MS
    };
    state.round_timer = Some(Timer::once(delay));
    state.match_over
}

/// Run the call and round timers. Returns the winner if a call ended the round.
pub fn tick(state: &mut BingoState, elapsed_ms: f64, rng: &mut impl Rng) -> Option<Side> {
    let next_round = state
        .round_timer
        .as_mut()
        .is_some_and(|t| t.advance(elapsed_ms) > 0);
    if next_round {
        state.round_timer = None;
        if state.match_over {
            state.phase = Phase::MatchEnd;
        } else {
            state.round += 1;
            start_round(state, rng);
        }
        return None;
    }

    let calls = state.call_timer.as_mut().map_or(0, |t| t.advance(elapsed_ms));
    for _ in 0..calls {
        if state.phase != Phase::Playing {
            break;
        }
        if let Some(winner) = call_next(state) {
            return Some(winner);
        }
    }
    None
}
