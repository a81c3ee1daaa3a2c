/// Game trait and game selection logic.

pub mod bingo;
pub mod invaders;
pub mod pong;
pub mod scores;
pub mod snake;
pub mod tictactoe;

use crate::grid::GridBuffer;
use crate::input::InputEvent;
use crate::store::ArcadeStore;

/// What the router should do after a screen handled an event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flow {
    /// The screen had no use for the event.
    Ignored,
    Handled,
    /// The screen asked to go back to the menu.
    ExitToMenu,
}

/// Trait that all screens behind the menu implement.
///
/// A game owns its state, timers and grid for one session. The router calls
/// `cleanup` before dropping it; after that `tick` must be a no-op.
pub trait Game {
    fn handle_input(&mut self, event: &InputEvent, store: &mut ArcadeStore) -> Flow;

    /// Advance by `elapsed_ms` of wall time (already clamped by the frame clock).
    fn tick(&mut self, elapsed_ms: f64, store: &mut ArcadeStore);

    /// Draw the current frame into the game's grid and return it.
    fn render(&mut self, store: &ArcadeStore) -> &GridBuffer;

    /// Cancel every timer and stop the session.
    fn cleanup(&mut self);
}

/// Which screen the player picked from the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameChoice {
    Pong,
    TicTacToe,
    Bingo,
    Snake,
    Invaders,
    Scores,
}

impl GameChoice {
    pub fn all() -> [GameChoice; 6] {
        [
            GameChoice::Pong,
            GameChoice::TicTacToe,
            GameChoice::Bingo,
            GameChoice::Snake,
            GameChoice::Invaders,
            GameChoice::Scores,
        ]
    }

    /// Menu label.
    pub fn title(self) -> &'static str {
        match self {
            GameChoice::Pong => "ASCII PONG",
            GameChoice::TicTacToe => "TIC TAC TOE",
            GameChoice::Bingo => "B I N G O",
            GameChoice::Snake => "S N A K E",
            GameChoice::Invaders => "SPACE INVADERS",
            GameChoice::Scores => "SCORE BOARD",
        }
    }

    /// Whether Esc/Q returns to the menu before the screen sees the key.
    /// The scoreboard uses Q itself and handles Esc on its own.
    pub fn global_esc(self) -> bool {
        !matches!(self, GameChoice::Scores)
    }
}

/// Create a game instance from a choice.
pub fn create_game(choice: GameChoice, store: &mut ArcadeStore, seed: u64) -> Box<dyn Game> {
    match choice {
        GameChoice::Pong => Box::new(pong::PongGame::new(
            store,
            seed,
            pong::state::Difficulty::Medium,
        )),
        GameChoice::TicTacToe => Box::new(tictactoe::TicTacToeGame::new(store, seed)),
        GameChoice::Bingo => Box::new(bingo::BingoGame::new(store, seed)),
        GameChoice::Snake => Box::new(snake::SnakeGame::new(store, seed)),
        GameChoice::Invaders => Box::new(invaders::InvadersGame::new(store, seed)),
        GameChoice::Scores => Box::new(scores::ScoresScreen::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[test]
    fn every_choice_builds_and_renders() {
        let mut store = ArcadeStore::in_memory();
        for choice in GameChoice::all() {
            let mut game = create_game(choice, &mut store, 9);
            let grid = game.render(&store);
            assert!(grid.width() > 0 && grid.height() > 0, "{:?}", choice);
        }
    }

    #[test]
    fn cleanup_stops_every_game() {
        let mut store = ArcadeStore::in_memory();
        for choice in GameChoice::all() {
            let mut game = create_game(choice, &mut store, 9);
            game.handle_input(&InputEvent::KeyDown(Key::Enter), &mut store);
            game.tick(100.0, &mut store);
            game.cleanup();
            let before = game.render(&store).to_plain_string();
            for _ in 0..50 {
                game.tick(500.0, &mut store);
            }
            let after = game.render(&store).to_plain_string();
            assert_eq!(before, after, "{:?} kept running after cleanup", choice);
        }
    }

    #[test]
    fn only_scoreboard_keeps_q() {
        assert!(!GameChoice::Scores.global_esc());
        assert!(GameChoice::Pong.global_esc());
        assert!(GameChoice::Invaders.global_esc());
    }
}
