/// Bingo rendering: mode select, both cards side by side, call banner.

use crate::grid::GridBuffer;
use crate::store::LiveScore;

use super::logic::letter_for;
use super::state::{BingoState, Cell, Mode, Phase, ARENA_H, ARENA_W, CARD_SIZE, WIN_ROUNDS};

const TITLE: &str = " B  I  N  G  O ";
const PLAYER_COL: i32 = 10;
const CPU_COL: i32 = 39;
const CARD_TOP: i32 = 11;
const HEADER: &str = "  B   I   N   G   O";
const RULE: &str = "+---+---+---+---+---+";

pub fn render(state: &BingoState, g: &mut GridBuffer, name: &str, score: LiveScore) {
    g.clear();
    g.borders();
    if state.phase == Phase::ModeSelect {
        render_mode_select(state.mode_cursor, g);
        return;
    }

    let short: String = name.chars().take(8).collect();
    if state.phase == Phase::MatchEnd {
        g.border_text(TITLE, 0);
    } else {
        g.border_text(
            &format!(
                " R{}  {}-{}  First to {WIN_ROUNDS} ",
                state.round, score.a, score.b
            ),
            0,
        );
    }

    match state.current_call {
        Some(num) => {
            let ball = format!("[ {}-{num} ]", letter_for(num));
            let line = format!("CALLED:  {ball}");
            g.text_inner(&line, 3, None);
            let col = (ARENA_W - line.len() as i32).div_euclid(2);
            g.text_green(&ball, 3, Some(col + "CALLED:  ".len() as i32));
        }
        None => g.text_inner("WAITING FOR FIRST CALL...", 3, None),
    }
    for c in 1..ARENA_W - 1 {
        g.set(6, c, '-');
    }

    let manual = state.mode == Mode::Manual;
    g.text_inner(&short, 8, Some(PLAYER_COL));
    g.text_inner("CPU", 8, Some(CPU_COL));
    for (col, card, is_cpu) in [
        (PLAYER_COL, &state.player_card, false),
        (CPU_COL, &state.cpu_card, true),
    ] {
        g.text_inner(HEADER, 10, Some(col));
        for (r, row) in card.iter().enumerate() {
            let top = CARD_TOP + r as i32 * 2;
            g.text_inner(RULE, top, Some(col));
            let mut line = String::from("|");
            for (c, cell) in row.iter().enumerate() {
                let cursor = !is_cpu && manual && (r, c) == (state.cursor_row, state.cursor_col);
                line.push_str(&cell_text(cell, is_cpu, cursor));
                line.push('|');
            }
            g.text_inner(&line, top + 1, Some(col));
        }
        g.text_inner(RULE, CARD_TOP + CARD_SIZE as i32 * 2, Some(col));
    }

    if manual && state.phase == Phase::Playing {
        let row = CARD_TOP + state.cursor_row as i32 * 2 + 1;
        let col = PLAYER_COL + 1 + state.cursor_col as i32 * 4;
        g.set_green(row, col, '>');
        g.border_text(
            " ARROWS/WASD: MOVE   ENTER: MARK   ESC: MENU ",
            ARENA_H - 1,
        );
    } else {
        g.border_text(" ESC: MENU ", ARENA_H - 1);
    }

    match state.phase {
        Phase::RoundEnd => {
            g.text_inner("* * *  B I N G O !  * * *", 23, None);
            g.text_inner("NEXT ROUND STARTING...", 25, None);
        }
        Phase::MatchEnd => {
            let winner = if score.a > score.b {
                format!("{short} WINS!")
            } else {
                "CPU WINS!".to_string()
            };
            g.text_inner("====================", 22, None);
            g.text_inner(&winner, 23, None);
            g.text_inner("====================", 24, None);
            g.text_inner(
                &format!("FINAL: {short} {}  -  {} CPU", score.a, score.b),
                25,
                None,
            );
            let col = (ARENA_W - "[ENTER] MENU".len() as i32).div_euclid(2);
            g.text_green("[ENTER]", 26, Some(col));
            g.text_inner(" MENU", 26, Some(col + 7));
        }
        _ => {}
    }
}

/// Three characters: `*` free, `X` marked, `.` hidden CPU number, else the number.
fn cell_text(cell: &Cell, is_cpu: bool, cursor: bool) -> String {
    if cell.free {
        " * ".to_string()
    } else if cell.marked {
        " X ".to_string()
    } else if is_cpu {
        " . ".to_string()
    } else {
        format!("{}{:>2}", if cursor { '>' } else { ' ' }, cell.num)
    }
}

fn render_mode_select(selected: Mode, g: &mut GridBuffer) {
    g.border_text(TITLE, 0);
    let mid_row = ARENA_H / 2;
    g.text_inner("SELECT GAME MODE", mid_row - 4, None);

    for (mode, label, blurb, row) in [
        (Mode::Manual, "[1]  MANUAL MARK", "You find & mark called numbers", mid_row - 2),
        (Mode::Auto, "[2]  AUTO MARK", "Pure luck speed race", mid_row + 1),
    ] {
        let arrow = if mode == selected { ">> " } else { "   " };
        let line = format!("{arrow}{label}");
        g.text_inner(&line, row, None);
        if mode == selected {
            let col = (ARENA_W - line.len() as i32).div_euclid(2);
            g.set_green(row, col, '>');
            g.set_green(row, col + 1, '>');
        }
        g.text_inner(blurb, row + 1, None);
    }

    g.text_inner("============================", mid_row + 4, None);
    let col = (ARENA_W - "ARROWS/WASD:SELECT  ENTER:PLAY".len() as i32).div_euclid(2);
    g.text_inner("ARROWS/WASD:SELECT  ", mid_row + 6, Some(col));
    g.text_green("ENTER", mid_row + 6, Some(col + 20));
    g.text_inner(":PLAY", mid_row + 6, Some(col + 25));
}
