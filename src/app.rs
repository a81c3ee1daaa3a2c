//! Screen router: the main menu plus whichever game is running.
//!
//! The shell forwards every key event and every animation frame here. Only
//! one game exists at a time; switching screens cleans up the old one before
//! the new one is built, so no timer outlives its screen.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::games::{create_game, Flow, Game, GameChoice};
use crate::grid::GridBuffer;
use crate::input::{InputEvent, Key};
use crate::store::ArcadeStore;
use crate::time::FrameClock;

pub const SCREEN_W: u16 = 70;
pub const SCREEN_H: u16 = 30;

/// Inner width of the menu box.
const MENU_W: usize = 44;

enum Screen {
    Menu,
    Playing {
        choice: GameChoice,
        game: Box<dyn Game>,
    },
}

pub struct App {
    store: ArcadeStore,
    clock: FrameClock,
    rng: SmallRng,
    screen: Screen,
    menu_cursor: usize,
    menu_grid: GridBuffer,
}

impl App {
    pub fn new(store: ArcadeStore, seed: u64) -> Self {
        Self {
            store,
            clock: FrameClock::new(),
            rng: SmallRng::seed_from_u64(seed),
            screen: Screen::Menu,
            menu_cursor: 0,
            menu_grid: GridBuffer::new(SCREEN_W, SCREEN_H),
        }
    }

    /// The running game, or None on the menu.
    pub fn current(&self) -> Option<GameChoice> {
        match &self.screen {
            Screen::Menu => None,
            Screen::Playing { choice, .. } => Some(*choice),
        }
    }

    /// Tear down the current screen and show `target` (None: the menu).
    pub fn show_screen(&mut self, target: Option<GameChoice>) {
        if let Screen::Playing { game, .. } = &mut self.screen {
            game.cleanup();
        }
        self.screen = match target {
            None => Screen::Menu,
            Some(choice) => {
                let seed = self.rng.random();
                Screen::Playing {
                    choice,
                    game: create_game(choice, &mut self.store, seed),
                }
            }
        };
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        let flow = match &mut self.screen {
            Screen::Menu => {
                if let InputEvent::KeyDown(key) = event {
                    self.menu_key(key);
                }
                return;
            }
            Screen::Playing { choice, game } => {
                let back = matches!(event, InputEvent::KeyDown(Key::Esc | Key::Char('q')));
                if back && choice.global_esc() {
                    Flow::ExitToMenu
                } else {
                    game.handle_input(&event, &mut self.store)
                }
            }
        };
        if flow == Flow::ExitToMenu {
            self.show_screen(None);
        }
    }

    fn menu_key(&mut self, key: Key) {
        let items = GameChoice::all();
        if let Some(d) = key.digit() {
            if let Some(choice) = items.get(d as usize - 1) {
                self.menu_cursor = d as usize - 1;
                self.show_screen(Some(*choice));
            }
            return;
        }
        if key.is_up() {
            self.menu_cursor = (self.menu_cursor + items.len() - 1) % items.len();
        } else if key.is_down() {
            self.menu_cursor = (self.menu_cursor + 1) % items.len();
        } else if key.is_confirm() {
            self.show_screen(Some(items[self.menu_cursor]));
        }
    }

    /// One animation frame at wall-clock `now_ms`.
    pub fn frame(&mut self, now_ms: f64) {
        let elapsed = self.clock.update(now_ms);
        if let Screen::Playing { game, .. } = &mut self.screen {
            game.tick(elapsed, &mut self.store);
        }
    }

    pub fn render(&mut self) -> &GridBuffer {
        match &mut self.screen {
            Screen::Menu => {
                render_menu(&mut self.menu_grid, self.menu_cursor);
                &self.menu_grid
            }
            Screen::Playing { game, .. } => game.render(&self.store),
        }
    }
}

fn boxed(inner: &str) -> String {
    format!("|{inner:^MENU_W$}|")
}

fn rule(fill: char, label: &str) -> String {
    let lead = 3;
    let tail = MENU_W.saturating_sub(lead + label.chars().count());
    format!(
        "|{}{label}{}|",
        fill.to_string().repeat(lead),
        fill.to_string().repeat(tail)
    )
}

/// One row of the menu box.
enum MenuRow {
    Plain(String),
    Item(usize),
}

fn menu_rows() -> Vec<MenuRow> {
    let edge = |fill: char| MenuRow::Plain(format!("+{}+", fill.to_string().repeat(MENU_W)));
    let blank = || MenuRow::Plain(boxed(""));
    let games = GameChoice::all().len() - 1;

    let mut rows = vec![
        edge('='),
        blank(),
        MenuRow::Plain(boxed("R E T R O   A R C A D E")),
        MenuRow::Plain(boxed("T E R M I N A L")),
        blank(),
        MenuRow::Plain(rule('=', "[ G A M E S ]")),
        blank(),
    ];
    rows.extend((0..games).map(MenuRow::Item));
    rows.extend([blank(), MenuRow::Plain(rule('-', "[ T O O L S ]")), blank()]);
    rows.push(MenuRow::Item(games));
    rows.extend([
        blank(),
        edge('-'),
        MenuRow::Plain(boxed("ARROWS browse   ENTER play   1-6 jump")),
        edge('='),
    ]);
    rows
}

fn render_menu(g: &mut GridBuffer, cursor: usize) {
    g.clear();
    let left = (g.width() - (MENU_W as i32 + 2)).div_euclid(2);
    let items = GameChoice::all();

    for (row, entry) in (2..).zip(menu_rows()) {
        match entry {
            MenuRow::Plain(s) => g.text(&s, row, Some(left)),
            MenuRow::Item(i) => {
                g.text(&boxed(""), row, Some(left));
                let label = format!("[{}]  {}", i + 1, items[i].title());
                let col = left + 6;
                if i == cursor {
                    g.text_green(">>", row, Some(col - 3));
                    g.text_green(&label, row, Some(col));
                } else {
                    g.text(&label, row, Some(col));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(k: Key) -> InputEvent {
        InputEvent::KeyDown(k)
    }

    fn app() -> App {
        App::new(ArcadeStore::in_memory(), 3)
    }

    #[test]
    fn menu_lists_every_screen() {
        let mut a = app();
        let text = a.render().to_plain_string();
        assert!(text.contains("R E T R O   A R C A D E"));
        assert!(text.contains("[1]  ASCII PONG"));
        assert!(text.contains("[5]  SPACE INVADERS"));
        assert!(text.contains("[6]  SCORE BOARD"));
        assert!(text.contains("[ T O O L S ]"));
    }

    #[test]
    fn cursor_wraps_and_highlights() {
        let mut a = app();
        a.handle_input(down(Key::Up));
        assert_eq!(a.menu_cursor, 5);
        a.handle_input(down(Key::Down));
        assert_eq!(a.menu_cursor, 0);
        a.handle_input(down(Key::Char('s')));
        assert_eq!(a.menu_cursor, 1);
        let g = a.render();
        let row = (0..g.height())
            .find(|r| {
                (0..g.width())
                    .map(|c| g.get(*r, c))
                    .collect::<String>()
                    .contains("TIC TAC TOE")
            })
            .unwrap();
        let col = (0..g.width()).find(|c| g.get(row, *c) == '[').unwrap();
        assert!(g.is_highlighted(row, col));
    }

    #[test]
    fn enter_launches_and_esc_returns() {
        let mut a = app();
        a.handle_input(down(Key::Down));
        a.handle_input(down(Key::Enter));
        assert_eq!(a.current(), Some(GameChoice::TicTacToe));
        a.handle_input(down(Key::Esc));
        assert_eq!(a.current(), None);
        a.handle_input(down(Key::Char(' ')));
        assert_eq!(a.current(), Some(GameChoice::TicTacToe));
        a.handle_input(down(Key::Char('q')));
        assert_eq!(a.current(), None);
    }

    #[test]
    fn digits_jump_straight_in() {
        let mut a = app();
        a.handle_input(down(Key::Char('4')));
        assert_eq!(a.current(), Some(GameChoice::Snake));
        a.show_screen(None);
        a.handle_input(down(Key::Char('9')));
        assert_eq!(a.current(), None);
    }

    #[test]
    fn esc_on_menu_is_ignored() {
        let mut a = app();
        a.handle_input(down(Key::Esc));
        a.handle_input(down(Key::Char('q')));
        assert_eq!(a.current(), None);
    }

    #[test]
    fn scoreboard_keeps_q_and_exits_on_esc() {
        let mut a = app();
        a.handle_input(down(Key::Char('6')));
        assert_eq!(a.current(), Some(GameChoice::Scores));
        a.handle_input(down(Key::Char('q')));
        assert_eq!(a.current(), Some(GameChoice::Scores));
        a.handle_input(down(Key::Esc));
        assert_eq!(a.current(), None);
    }

    #[test]
    fn frames_drive_the_running_game() {
        let mut a = app();
        a.handle_input(down(Key::Char('4')));
        a.handle_input(down(Key::Enter));
        a.frame(0.0);
        for i in 1..=40 {
            a.frame(i as f64 * 100.0);
        }
        let text = a.render().to_plain_string();
        assert!(text.contains("BEST:"));
        assert!(!text.contains("GET READY!"));
    }
}
