/// Space Invaders rendering.

use crate::grid::{to_cell, GridBuffer};

use super::logic::ship_visible;
use super::state::{
    InvadersState, Phase, ALIEN_SPRITES, ARENA_H, ARENA_W, PLAYER_ROW, PLAYER_SPRITE,
};

const TITLE: &str = " S P A C E   I N V A D E R S ";

pub fn render(state: &InvadersState, g: &mut GridBuffer, name: &str) {
    g.clear();
    g.borders();
    let mid_row = ARENA_H / 2;

    if state.phase == Phase::Intro {
        g.border_text(TITLE, 0);
        g.text_inner("ARROWS/WASD:MOVE  SPACE:FIRE", mid_row - 1, None);
        g.text_inner("============================", mid_row + 1, None);
        let col = (ARENA_W - "PRESS ENTER TO START".len() as i32).div_euclid(2);
        g.text_inner("PRESS ", mid_row + 4, Some(col));
        g.text_green("ENTER", mid_row + 4, Some(col + 6));
        g.text_inner(" TO START", mid_row + 4, Some(col + 11));
        return;
    }

    if state.phase == Phase::GameOver {
        g.border_text(TITLE, 0);
    } else {
        g.border_text(
            &format!(
                " {name}: {}  BEST: {}  LIVES: {}  W{} ",
                state.score, state.best_score, state.lives, state.wave
            ),
            0,
        );
    }

    if matches!(
        state.phase,
        Phase::Playing | Phase::Countdown | Phase::WaveClear
    ) {
        render_field(state, g);
    }

    g.border_text(" WASD  SPACE: FIRE  P: PAUSE  ESC: MENU ", ARENA_H - 1);

    match state.phase {
        Phase::Countdown => {
            g.text_inner(&format!("WAVE {}", state.wave), mid_row - 2, None);
            g.text_inner("GET READY!", mid_row, None);
            g.text_inner(&state.countdown.to_string(), mid_row + 2, None);
        }
        Phase::Playing if state.paused => {
            g.text_inner("P  A  U  S  E  D", mid_row - 1, None);
            hint(g, mid_row + 1, "[P]", " RESUME");
        }
        Phase::WaveClear => {
            g.text_inner("========================", mid_row - 1, None);
            g.text_inner(
                &format!("W A V E  {}  C L E A R !", state.wave),
                mid_row,
                None,
            );
            g.text_inner("========================", mid_row + 1, None);
            g.text_inner("NEXT WAVE INCOMING...", mid_row + 3, None);
        }
        Phase::GameOver => {
            g.text_inner("====================", mid_row - 3, None);
            g.text_inner("G A M E   O V E R", mid_row - 1, None);
            g.text_inner("====================", mid_row + 1, None);
            g.text_inner(
                &format!("SCORE: {}  WAVES: {}", state.score, state.wave),
                mid_row + 3,
                None,
            );
            if state.score > 0 && state.score >= state.best_score {
                g.text_inner("** NEW BEST! **", mid_row + 5, None);
            } else {
                g.text_inner(&format!("BEST: {}", state.best_score), mid_row + 5, None);
            }
            hint(g, mid_row + 7, "[ENTER]", " REPLAY");
        }
        _ => {}
    }
}

fn hint(g: &mut GridBuffer, row: i32, key: &str, action: &str) {
    let col = (ARENA_W - (key.len() + action.len()) as i32).div_euclid(2);
    g.text_green(key, row, Some(col));
    g.text_inner(action, row, Some(col + key.len() as i32));
}

fn render_field(state: &InvadersState, g: &mut GridBuffer) {
    for alien in state.aliens.iter().filter(|a| a.alive) {
        let (ax, ay) = state.alien_pos(alien);
        if ay <= 0 || ay >= ARENA_H - 1 {
            continue;
        }
        for (i, ch) in ALIEN_SPRITES[alien.kind].chars().enumerate() {
            let x = ax + i as i32;
            if x > 0 && x < ARENA_W - 1 {
                g.set(ay, x, ch);
            }
        }
    }

    if ship_visible(state) {
        let px = to_cell(state.player_x);
        for (i, ch) in PLAYER_SPRITE.chars().enumerate() {
            g.set(PLAYER_ROW, px - 1 + i as i32, ch);
        }
    }

    if let Some(b) = &state.bullet {
        g.set_green(to_cell(b.y), to_cell(b.x), '^');
    }
    for b in &state.enemy_bullets {
        g.set(to_cell(b.y), to_cell(b.x), 'v');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::invaders::logic;
    use crate::games::invaders::state::Bullet;

    fn grid() -> GridBuffer {
        GridBuffer::new(ARENA_W as u16, ARENA_H as u16)
    }

    fn playing() -> InvadersState {
        let mut s = InvadersState::new(120);
        logic::start_wave(&mut s);
        s.phase = Phase::Playing;
        s
    }

    #[test]
    fn intro_screen() {
        let mut g = grid();
        render(&InvadersState::new(0), &mut g, "ACE");
        let text = g.to_plain_string();
        assert!(text.contains("S P A C E   I N V A D E R S"));
        assert!(text.contains("PRESS ENTER TO START"));
        assert!(!text.contains("/A\\"));
    }

    #[test]
    fn status_line_and_field() {
        let mut g = grid();
        let mut s = playing();
        s.score = 90;
        s.bullet = Some(Bullet { x: 20.0, y: 12.4 });
        s.enemy_bullets.push(Bullet { x: 30.0, y: 20.6 });
        render(&s, &mut g, "ACE");
        let rows: Vec<String> = g.to_plain_string().lines().map(str::to_string).collect();
        assert!(rows[0].contains(" ACE: 90  BEST: 120  LIVES: 3  W1 "));
        assert!(rows[3].contains("{O}  {O}"));
        assert!(rows[9].contains("/V\\"));
        assert_eq!(&rows[27][34..37], "/A\\");
        assert_eq!(g.get(12, 20), '^');
        assert!(g.is_highlighted(12, 20));
        assert_eq!(g.get(21, 30), 'v');
    }

    #[test]
    fn ship_hidden_on_blink() {
        let mut g = grid();
        let mut s = playing();
        s.invincible_for = Some(120.0);
        render(&s, &mut g, "ACE");
        assert!(!g.to_plain_string().contains("/A\\"));
    }

    #[test]
    fn game_over_shows_best() {
        let mut g = grid();
        let mut s = playing();
        s.phase = Phase::GameOver;
        s.score = 50;
        render(&s, &mut g, "ACE");
        let text = g.to_plain_string();
        assert!(text.contains("G A M E   O V E R"));
        assert!(text.contains("BEST: 120"));

        s.score = 120;
        render(&s, &mut g, "ACE");
        assert!(g.to_plain_string().contains("** NEW BEST! **"));
    }

    #[test]
    fn countdown_overlay() {
        let mut g = grid();
        let mut s = playing();
        logic::start_countdown(&mut s);
        render(&s, &mut g, "ACE");
        let text = g.to_plain_string();
        assert!(text.contains("WAVE 1"));
        assert!(text.contains("GET READY!"));
    }
}
