/// Tic-Tac-Toe rendering with 5x5 marks.

use crate::grid::GridBuffer;
use crate::store::LiveScore;

use super::ai::{self, Outcome};
use super::state::{Mark, Phase, TicTacToeState, ARENA_H, ARENA_W, WIN_ROUNDS};

const BIG_X: [&str; 5] = ["\\   /", " \\ / ", "  X  ", " / \\ ", "/   \\"];
const BIG_O: [&str; 5] = [" --- ", "/   \\", "|   |", "\\   /", " --- "];

const CELL_W: i32 = 7;
const CELL_H: i32 = 5;
const BOARD_W: i32 = CELL_W * 3 + 2;
const BOARD_H: i32 = CELL_H * 3 + 2;
const BOARD_TOP: i32 = 3;
const BOARD_LEFT: i32 = (ARENA_W - BOARD_W) / 2;

/// Top-left corner of a cell's box.
fn cell_origin(index: usize) -> (i32, i32) {
    let (r, c) = ((index / 3) as i32, (index % 3) as i32);
    (BOARD_TOP + r * (CELL_H + 1), BOARD_LEFT + c * (CELL_W + 1))
}

pub fn render(state: &TicTacToeState, g: &mut GridBuffer, score: LiveScore) {
    g.clear();
    if state.phase == Phase::Intro {
        render_intro(state, g);
        return;
    }

    g.borders();
    if state.phase == Phase::MatchEnd {
        g.border_text(" T I C   T A C   T O E ", 0);
    } else {
        g.border_text(
            &format!(
                " R{}  {}-{}  First to {WIN_ROUNDS} ",
                state.round, score.a, score.b
            ),
            0,
        );
    }
    g.border_text(" WASD: MOVE   ENTER: PLACE   ESC: MENU ", ARENA_H - 1);

    render_board(state, g);

    let below = BOARD_TOP + BOARD_H + 1;
    g.text_inner(&state.message, below, None);
    if state.phase == Phase::MatchEnd {
        g.text_inner(
            &format!("FINAL: YOU {} - {} CPU", state.player_wins, state.cpu_wins),
            below + 1,
            None,
        );
        let col = (ARENA_W - "[ENTER] MENU".len() as i32).div_euclid(2);
        g.text_green("[ENTER]", below + 2, Some(col));
        g.text_inner(" MENU", below + 2, Some(col + 7));
    }
}

fn render_intro(state: &TicTacToeState, g: &mut GridBuffer) {
    let mid_row = ARENA_H / 2;
    g.text("===  T I C   T A C   T O E  ===", mid_row - 7, None);
    g.text("YOU (X)  vs  CPU (O)", mid_row - 5, None);
    g.text(
        &format!("FIRST TO {WIN_ROUNDS} WINS THE MATCH"),
        mid_row - 4,
        None,
    );
    g.text("============================", mid_row - 2, None);
    g.text("ARROWS/WASD:MOVE  ENTER:PLACE", mid_row + 1, None);
    if state.blink_on {
        let col = (ARENA_W - "PRESS ENTER TO START".len() as i32).div_euclid(2);
        g.text("PRESS ", mid_row + 4, Some(col));
        g.text_green("ENTER", mid_row + 4, Some(col + 6));
        g.text(" TO START", mid_row + 4, Some(col + 11));
    }
}

fn render_board(state: &TicTacToeState, g: &mut GridBuffer) {
    for (i, mark) in state.board.iter().enumerate() {
        let (top, left) = cell_origin(i);
        match mark {
            Mark::Player => g.sprite(&BIG_X, top, left + 1),
            Mark::Cpu => g.sprite(&BIG_O, top, left + 1),
            Mark::Empty => {}
        }
    }

    for sep in 0..2 {
        let row = BOARD_TOP + (sep + 1) * CELL_H + sep;
        for x in BOARD_LEFT..BOARD_LEFT + BOARD_W {
            g.set(row, x, '-');
        }
    }
    for sep in 0..2 {
        let col = BOARD_LEFT + (sep + 1) * CELL_W + sep;
        for y in BOARD_TOP..BOARD_TOP + BOARD_H {
            let ch = if g.get(y, col) == '-' { '+' } else { '|' };
            g.set(y, col, ch);
        }
    }

    if state.phase == Phase::Playing && state.turn == Mark::Player && state.blink_on {
        let (top, left) = cell_origin(state.cursor);
        for row in [top, top + CELL_H - 1] {
            g.set_green(row, left, '[');
            g.set_green(row, left + CELL_W - 1, ']');
        }
    }

    if matches!(state.phase, Phase::RoundEnd | Phase::MatchEnd) {
        if let Some(Outcome::Win(_, line)) = ai::check_winner(&state.board) {
            for i in line {
                let (top, left) = cell_origin(i);
                for (r, c) in [
                    (top, left),
                    (top, left + CELL_W - 1),
                    (top + CELL_H - 1, left),
                    (top + CELL_H - 1, left + CELL_W - 1),
                ] {
                    g.set(r, c, '*');
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::logic;

    fn grid() -> GridBuffer {
        GridBuffer::new(ARENA_W as u16, ARENA_H as u16)
    }

    fn rows(g: &GridBuffer) -> Vec<String> {
        g.to_plain_string().lines().map(str::to_string).collect()
    }

    #[test]
    fn intro_blinks_prompt() {
        let mut g = grid();
        let mut s = TicTacToeState::new();
        render(&s, &mut g, LiveScore::default());
        assert!(g.to_plain_string().contains("PRESS ENTER TO START"));
        s.blink_on = false;
        render(&s, &mut g, LiveScore::default());
        assert!(!g.to_plain_string().contains("PRESS ENTER TO START"));
    }

    #[test]
    fn board_grid_and_marks() {
        let mut g = grid();
        let mut s = TicTacToeState::new();
        logic::start_round(&mut s);
        s.board[0] = Mark::Player;
        s.board[4] = Mark::Cpu;
        render(&s, &mut g, LiveScore { a: 1, b: 0 });
        let text = rows(&g);
        assert!(text[0].contains(" R1  1-0  First to 3 "));
        // separators cross at '+'
        assert_eq!(g.get(8, BOARD_LEFT + 7), '+');
        assert_eq!(g.get(3, BOARD_LEFT + 7), '|');
        assert_eq!(g.get(8, BOARD_LEFT), '-');
        // X centre in cell 0, O ring in cell 4
        assert_eq!(g.get(5, BOARD_LEFT + 3), 'X');
        assert_eq!(g.get(11, BOARD_LEFT + 8 + 1), '|');
        assert!(text[BOARD_TOP as usize + BOARD_H as usize + 1].contains("ROUND 1"));
    }

    #[test]
    fn cursor_brackets_are_green() {
        let mut g = grid();
        let mut s = TicTacToeState::new();
        logic::start_round(&mut s);
        render(&s, &mut g, LiveScore::default());
        let (top, left) = cell_origin(4);
        assert_eq!(g.get(top, left), '[');
        assert!(g.is_highlighted(top, left));
        assert_eq!(g.get(top + 4, left + 6), ']');
    }

    #[test]
    fn winning_line_starred() {
        let mut g = grid();
        let mut s = TicTacToeState::new();
        s.phase = Phase::RoundEnd;
        s.board = [
            Mark::Cpu, Mark::Player, Mark::Player,
            Mark::Empty, Mark::Cpu, Mark::Player,
            Mark::Empty, Mark::Empty, Mark::Cpu,
        ];
        render(&s, &mut g, LiveScore::default());
        let (top, left) = cell_origin(8);
        assert_eq!(g.get(top, left), '*');
        let (top, left) = cell_origin(1);
        assert_ne!(g.get(top, left), '*');
    }

    #[test]
    fn match_end_offers_menu() {
        let mut g = grid();
        let mut s = TicTacToeState::new();
        s.phase = Phase::MatchEnd;
        s.player_wins = 3;
        s.cpu_wins = 1;
        render(&s, &mut g, LiveScore { a: 3, b: 1 });
        let text = g.to_plain_string();
        assert!(text.contains("T I C   T A C   T O E"));
        assert!(text.contains("FINAL: YOU 3 - 1 CPU"));
        assert!(text.contains("[ENTER] MENU"));
    }
}
