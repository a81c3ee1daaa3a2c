/// Snake rendering.

use crate::grid::GridBuffer;

use super::state::{Phase, SnakeState, ARENA_H, ARENA_W};

pub fn render(state: &SnakeState, g: &mut GridBuffer, name: &str) {
    g.clear();
    let mid_row = ARENA_H / 2;

    if state.phase == Phase::Intro {
        g.text("S N A K E", mid_row - 6, None);
        g.text("============================", mid_row - 4, None);
        g.text("ARROWS/WASD:STEER", mid_row - 2, None);
        let col = (ARENA_W - "EAT * TO GROW".len() as i32).div_euclid(2);
        g.text("EAT ", mid_row, Some(col));
        g.set_green(mid_row, col + 4, '*');
        g.text(" TO GROW", mid_row, Some(col + 5));
        g.text("AVOID WALLS AND YOUR TAIL", mid_row + 2, None);
        g.text("============================", mid_row + 4, None);
        let col = (ARENA_W - "PRESS ENTER TO START".len() as i32).div_euclid(2);
        g.text("PRESS ", mid_row + 7, Some(col));
        g.text_green("ENTER", mid_row + 7, Some(col + 6));
        g.text(" TO START", mid_row + 7, Some(col + 11));
        return;
    }

    g.borders();
    if state.phase == Phase::GameOver {
        g.border_text(" S N A K E ", 0);
    } else {
        g.border_text(
            &format!(
                " {name}: {}  BEST: {}  LEN: {} ",
                state.score,
                state.best_score,
                state.body.len()
            ),
            0,
        );
    }
    g.border_text(" WASD: STEER   P: PAUSE   ESC: MENU ", ARENA_H - 1);

    g.set_green(state.food.y, state.food.x, '*');
    // Tail first so the head wins on overlap.
    for (i, seg) in state.body.iter().enumerate().rev() {
        g.set(seg.y, seg.x, if i == 0 { '@' } else { '#' });
    }

    match state.phase {
        Phase::Countdown => {
            g.text_inner("GET READY!", mid_row - 1, None);
            g.text_inner(&state.countdown.to_string(), mid_row + 1, None);
        }
        Phase::Playing if state.paused => {
            g.text_inner("P  A  U  S  E  D", mid_row - 1, None);
            let col = (ARENA_W - "[P] RESUME".len() as i32).div_euclid(2);
            g.text_green("[P]", mid_row + 1, Some(col));
            g.text_inner(" RESUME", mid_row + 1, Some(col + 3));
        }
        Phase::GameOver => {
            g.text_inner("====================", mid_row - 3, None);
            g.text_inner("G A M E   O V E R", mid_row - 1, None);
            g.text_inner("====================", mid_row + 1, None);
            g.text_inner(
                &format!("SCORE: {}  LENGTH: {}", state.score, state.body.len()),
                mid_row + 3,
                None,
            );
            if state.score > 0 && state.score >= state.best_score {
                g.text_inner("** NEW BEST! **", mid_row + 5, None);
            }
            let col = (ARENA_W - "[ENTER] REPLAY".len() as i32).div_euclid(2);
            g.text_green("[ENTER]", mid_row + 7, Some(col));
            g.text_inner(" REPLAY", mid_row + 7, Some(col + 7));
        }
        _ => {}
    }
}
