/// Pong rendering into the shared character grid.

use crate::grid::{to_cell, GridBuffer};
use crate::store::{LiveScore, Team};

use super::state::{Difficulty, Phase, PongState, ARENA_H, ARENA_W, PADDLE_HALF, WIN_SCORE};

/// Names longer than this are cut in the score line.
const SHORT_NAME: usize = 8;

fn short(name: &str) -> String {
    name.chars().take(SHORT_NAME).collect()
}

pub fn render(state: &PongState, g: &mut GridBuffer, name: &str, score: LiveScore) {
    g.clear();
    if state.phase == Phase::Difficulty {
        render_difficulty(state.difficulty, g);
        return;
    }

    g.borders();
    let mid_row = ARENA_H / 2;

    if matches!(state.phase, Phase::Playing | Phase::Countdown | Phase::Point) {
        render_field(state, g);
    }

    if state.phase == Phase::GameOver {
        g.border_text(" A S C I I   P O N G ", 0);
    } else {
        g.border_text(
            &format!(" {} {:02} - {:02} CPU ", short(name), score.a, score.b),
            0,
        );
    }
    g.border_text(" W/S: MOVE   P: PAUSE   ESC: MENU ", ARENA_H - 1);

    match state.phase {
        Phase::Countdown => {
            g.text_inner("GET READY", mid_row - 2, None);
            g.text_inner(&state.countdown.to_string(), mid_row, None);
        }
        Phase::Point => {
            let scorer = match state.last_scorer {
                Some(Team::A) => name,
                _ => "CPU",
            };
            g.text_inner(&format!("{scorer} SCORES!"), mid_row, None);
        }
        Phase::Playing if state.paused => {
            g.text_inner("P  A  U  S  E  D", mid_row - 1, None);
            hint(g, mid_row + 1, "[P]", " RESUME");
        }
        Phase::GameOver => {
            let winner = if score.a >= WIN_SCORE {
                format!("{name} WINS!")
            } else {
                "CPU WINS!".to_string()
            };
            g.text_inner("====================", mid_row - 3, None);
            g.text_inner(&winner, mid_row - 1, None);
            g.text_inner("====================", mid_row + 1, None);
            g.text_inner(
                &format!("FINAL: {name} {:02} - {:02} CPU", score.a, score.b),
                mid_row + 3,
                None,
            );
            hint(g, mid_row + 5, "[ENTER]", " REPLAY");
        }
        _ => {}
    }
}

/// Centered "[KEY] ACTION" line with the key in green.
fn hint(g: &mut GridBuffer, row: i32, key: &str, action: &str) {
    let len = (key.len() + action.len()) as i32;
    let col = (ARENA_W - len).div_euclid(2);
    g.text_green(key, row, Some(col));
    g.text_inner(action, row, Some(col + key.len() as i32));
}

fn render_difficulty(selected: Difficulty, g: &mut GridBuffer) {
    let mid_row = ARENA_H / 2;
    g.text("A S C I I   P O N G", mid_row - 7, None);
    g.text("============================", mid_row - 5, None);
    g.text("SELECT DIFFICULTY", mid_row - 3, None);

    for (i, d) in Difficulty::all().into_iter().enumerate() {
        let row = mid_row - 1 + i as i32;
        let arrow = if d == selected { ">> " } else { "   " };
        let line = format!("{arrow}{}", d.label());
        g.text(&line, row, None);
        if d == selected {
            let col = (ARENA_W - line.len() as i32).div_euclid(2);
            g.set_green(row, col, '>');
            g.set_green(row, col + 1, '>');
        }
    }

    g.text("============================", mid_row + 3, None);
    let line = "ARROWS/WASD:SELECT  ENTER:PLAY";
    let col = (ARENA_W - line.len() as i32).div_euclid(2);
    g.text("ARROWS/WASD:SELECT  ", mid_row + 5, Some(col));
    g.text_green("ENTER", mid_row + 5, Some(col + 20));
    g.text(":PLAY", mid_row + 5, Some(col + 25));
}

fn render_field(state: &PongState, g: &mut GridBuffer) {
    let mid = ARENA_W / 2;
    for r in (2..ARENA_H - 1).step_by(2) {
        g.set(r, mid, '|');
    }

    for (center, cols) in [
        (to_cell(state.player_y), [2, 3]),
        (to_cell(state.ai_y), [ARENA_W - 4, ARENA_W - 3]),
    ] {
        for r in center - PADDLE_HALF..=center + PADDLE_HALF {
            if r > 0 && r < ARENA_H - 1 {
                for c in cols {
                    g.set(r, c, '#');
                }
            }
        }
    }

    // Hidden during the countdown.
    if state.phase != Phase::Countdown {
        let bx = to_cell(state.ball.x);
        let by = to_cell(state.ball.y);
        if bx > 0 && bx < ARENA_W - 1 && by > 0 && by < ARENA_H - 1 {
            g.set_green(by, bx, 'O');
        }
    }
}
