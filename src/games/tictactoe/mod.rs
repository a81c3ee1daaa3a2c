/// Tic-Tac-Toe: player (X) against a minimax CPU (O), first to three rounds.

pub mod ai;
pub mod logic;
pub mod render;
pub mod state;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::games::{Flow, Game};
use crate::grid::GridBuffer;
use crate::input::{InputEvent, Key};
use crate::store::{ArcadeStore, Team, VersusGame};

use ai::Outcome;
use state::{Mark, Phase, TicTacToeState, ARENA_H, ARENA_W};

pub struct TicTacToeGame {
    pub state: TicTacToeState,
    rng: SmallRng,
    grid: GridBuffer,
}

impl TicTacToeGame {
    pub fn new(store: &mut ArcadeStore, seed: u64) -> Self {
        store.reset_all_scores();
        Self {
            state: TicTacToeState::new(),
            rng: SmallRng::seed_from_u64(seed),
            grid: GridBuffer::new(ARENA_W as u16, ARENA_H as u16),
        }
    }

    fn score_round(&self, outcome: Outcome, store: &mut ArcadeStore) {
        match outcome {
            Outcome::Win(Mark::Player, _) => store.increment_score(Team::A),
            Outcome::Win(_, _) => store.increment_score(Team::B),
            Outcome::Draw => return,
        }
        if self.state.match_decided() {
            store.record_match_result(VersusGame::TicTacToe);
        }
    }

    fn handle_key(&mut self, key: Key, store: &mut ArcadeStore) -> Flow {
        match self.state.phase {
            Phase::Intro if key.is_confirm() => {
                logic::start_round(&mut self.state);
                Flow::Handled
            }
            Phase::MatchEnd if key == Key::Enter => Flow::ExitToMenu,
            Phase::Playing if self.state.turn == Mark::Player => {
                if key.is_confirm() {
                    let cursor = self.state.cursor;
                    if let Some(outcome) = logic::place(&mut self.state, cursor, &mut self.rng) {
                        self.score_round(outcome, store);
                    }
                    Flow::Handled
                } else if logic::move_cursor(&mut self.state, key) {
                    Flow::Handled
                } else {
                    Flow::Ignored
                }
            }
            _ => Flow::Ignored,
        }
    }
}

impl Game for TicTacToeGame {
    fn handle_input(&mut self, event: &InputEvent, store: &mut ArcadeStore) -> Flow {
        match *event {
            InputEvent::KeyDown(key) => self.handle_key(key, store),
            InputEvent::KeyUp(_) => Flow::Ignored,
        }
    }

    fn tick(&mut self, elapsed_ms: f64, store: &mut ArcadeStore) {
        if !self.state.running {
            return;
        }
        if let Some(outcome) = logic::tick(&mut self.state, elapsed_ms, &mut self.rng) {
            self.score_round(outcome, store);
        }
    }

    fn render(&mut self, store: &ArcadeStore) -> &GridBuffer {
        render::render(&self.state, &mut self.grid, store.live_score());
        &self.grid
    }

    fn cleanup(&mut self) {
        self.state.running = false;
        self.state.blink_timer = None;
        self.state.cpu_timer = None;
        self.state.round_timer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: Key) -> InputEvent {
        InputEvent::KeyDown(k)
    }

    #[test]
    fn plays_a_whole_match() {
        let mut store = ArcadeStore::in_memory();
        let mut game = TicTacToeGame::new(&mut store, 21);
        game.handle_input(&key(Key::Enter), &mut store);
        assert_eq!(game.state.phase, Phase::Playing);

        // Always place on the first free cell; the match still has to end.
        for _ in 0..10_000 {
            if game.state.phase == Phase::MatchEnd {
                break;
            }
            if game.state.phase == Phase::Playing && game.state.turn == Mark::Player {
                if let Some(free) = game.state.board.iter().position(|m| *m == Mark::Empty) {
                    game.state.cursor = free;
                    game.handle_input(&key(Key::Enter), &mut store);
                }
            }
            game.tick(100.0, &mut store);
        }
        assert_eq!(game.state.phase, Phase::MatchEnd);
        let score = store.live_score();
        assert_eq!(score.a, game.state.player_wins);
        assert_eq!(score.b, game.state.cpu_wins);
        let ttt = &store.load_profile().ttt;
        assert_eq!(ttt.player_wins + ttt.cpu_wins, 1);

        assert_eq!(
            game.handle_input(&key(Key::Enter), &mut store),
            Flow::ExitToMenu
        );
    }

    #[test]
    fn keys_ignored_during_cpu_turn() {
        let mut store = ArcadeStore::in_memory();
        let mut game = TicTacToeGame::new(&mut store, 2);
        game.handle_input(&key(Key::Char(' ')), &mut store);
        game.handle_input(&key(Key::Enter), &mut store);
        assert_eq!(game.state.turn, Mark::Cpu);
        let cursor = game.state.cursor;
        assert_eq!(
            game.handle_input(&key(Key::Right), &mut store),
            Flow::Ignored
        );
        assert_eq!(game.state.cursor, cursor);
    }

    #[test]
    fn cleanup_stops_the_cpu() {
        let mut store = ArcadeStore::in_memory();
        let mut game = TicTacToeGame::new(&mut store, 2);
        game.handle_input(&key(Key::Enter), &mut store);
        game.handle_input(&key(Key::Enter), &mut store);
        game.cleanup();
        game.tick(5000.0, &mut store);
        assert_eq!(game.state.turn, Mark::Cpu);
        assert_eq!(game.state.board.iter().filter(|m| **m != Mark::Empty).count(), 1);
    }
}
