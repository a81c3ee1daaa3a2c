/// ASCII Pong: player vs CPU, first to seven.

pub mod logic;
pub mod render;
pub mod state;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::games::{Flow, Game};
use crate::grid::GridBuffer;
use crate::input::{HeldKeys, InputEvent, Key};
use crate::store::{ArcadeStore, VersusGame};

use logic::{PaddleInput, PointOutcome};
use state::{Difficulty, Phase, PongState, ARENA_H, ARENA_W};

pub struct PongGame {
    pub state: PongState,
    held: HeldKeys,
    rng: SmallRng,
    grid: GridBuffer,
}

impl PongGame {
    /// A new match always starts from 0 - 0.
    pub fn new(store: &mut ArcadeStore, seed: u64, difficulty: Difficulty) -> Self {
        store.reset_all_scores();
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = PongState::new(difficulty);
        logic::reset_ball(&mut state, &mut rng);
        Self {
            state,
            held: HeldKeys::new(),
            rng,
            grid: GridBuffer::new(ARENA_W as u16, ARENA_H as u16),
        }
    }

    fn paddle_input(&self) -> PaddleInput {
        PaddleInput {
            up: self.held.any(Key::is_up),
            down: self.held.any(Key::is_down),
        }
    }

    fn replay(&mut self, store: &mut ArcadeStore) {
        self.cleanup();
        let seed = self.rng.random();
        let difficulty = self.state.difficulty;
        *self = PongGame::new(store, seed, difficulty);
    }

    fn handle_key(&mut self, key: Key, store: &mut ArcadeStore) -> Flow {
        let phase = self.state.phase;
        if key == Key::Char('p') && phase == Phase::Playing {
            logic::toggle_pause(&mut self.state);
            return Flow::Handled;
        }
        match phase {
            Phase::Difficulty => {
                let state = &mut self.state;
                if key.is_up() {
                    state.difficulty = state.difficulty.prev();
                } else if key.is_down() {
                    state.difficulty = state.difficulty.next();
                } else if key.is_confirm() {
                    logic::start_match(state);
                } else if let Some(d) = key.digit().and_then(Difficulty::from_number) {
                    state.difficulty = d;
                    logic::start_match(state);
                } else {
                    return Flow::Ignored;
                }
                Flow::Handled
            }
            Phase::GameOver if key == Key::Enter => {
                self.replay(store);
                Flow::Handled
            }
            _ => Flow::Ignored,
        }
    }
}

impl Game for PongGame {
    fn handle_input(&mut self, event: &InputEvent, store: &mut ArcadeStore) -> Flow {
        self.held.apply(event);
        match *event {
            InputEvent::KeyDown(key) => self.handle_key(key, store),
            InputEvent::KeyUp(_) => Flow::Handled,
        }
    }

    fn tick(&mut self, elapsed_ms: f64, store: &mut ArcadeStore) {
        if !self.state.running {
            return;
        }
        let input = self.paddle_input();
        let scored = logic::advance_physics(&mut self.state, elapsed_ms, input);
        if let Some(scorer) = scored {
            store.increment_score(scorer);
            let outcome =
                logic::after_point(&mut self.state, scorer, store.live_score(), &mut self.rng);
            if outcome == PointOutcome::MatchOver {
                store.record_match_result(VersusGame::Pong);
            }
        }
        logic::tick_countdown(&mut self.state, elapsed_ms);
        // A pause started this frame counts from the next one.
        if scored.is_none() {
            logic::tick_point_pause(&mut self.state, elapsed_ms);
        }
    }

    fn render(&mut self, store: &ArcadeStore) -> &GridBuffer {
        render::render(
            &self.state,
            &mut self.grid,
            store.player_name(),
            store.live_score(),
        );
        &self.grid
    }

    fn cleanup(&mut self) {
        self.state.running = false;
        self.state.countdown_timer = None;
        self.state.point_timer = None;
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Team;

    fn key(k: Key) -> InputEvent {
        InputEvent::KeyDown(k)
    }

    fn start_playing(game: &mut PongGame, store: &mut ArcadeStore) {
        game.handle_input(&key(Key::Char('2')), store);
        for _ in 0..3 {
            game.tick(800.0, store);
        }
        assert_eq!(game.state.phase, Phase::Playing);
    }

    #[test]
    fn entering_resets_live_score() {
        let mut store = ArcadeStore::in_memory();
        store.increment_score(Team::A);
        let _game = PongGame::new(&mut store, 1, Difficulty::Medium);
        assert_eq!(store.live_score().a, 0);
    }

    #[test]
    fn difficulty_menu_keys() {
        let mut store = ArcadeStore::in_memory();
        let mut game = PongGame::new(&mut store, 1, Difficulty::Medium);
        game.handle_input(&key(Key::Up), &mut store);
        assert_eq!(game.state.difficulty, Difficulty::Easy);
        game.handle_input(&key(Key::Up), &mut store);
        assert_eq!(game.state.difficulty, Difficulty::Hard);
        assert_eq!(
            game.handle_input(&key(Key::Char('x')), &mut store),
            Flow::Ignored
        );
        game.handle_input(&key(Key::Enter), &mut store);
        assert_eq!(game.state.phase, Phase::Countdown);
        assert_eq!(game.state.speeds, Difficulty::Hard.speeds());
    }

    #[test]
    fn held_keys_move_paddle() {
        let mut store = ArcadeStore::in_memory();
        let mut game = PongGame::new(&mut store, 1, Difficulty::Medium);
        start_playing(&mut game, &mut store);
        let y = game.state.player_y;
        game.handle_input(&key(Key::Char('w')), &mut store);
        game.tick(32.0, &mut store);
        assert!(game.state.player_y < y);
        let y = game.state.player_y;
        game.handle_input(&InputEvent::KeyUp(Key::Char('w')), &mut store);
        game.tick(32.0, &mut store);
        assert_eq!(game.state.player_y, y);
    }

    #[test]
    fn identical_inputs_give_identical_sessions() {
        let deltas = [16.7, 3.0, 40.0, 16.6, 99.0, 0.5, 250.0, 16.0, 33.3, 8.0];
        let run = || {
            let mut store = ArcadeStore::in_memory();
            let mut game = PongGame::new(&mut store, 42, Difficulty::Hard);
            start_playing(&mut game, &mut store);
            let mut trace = Vec::new();
            for i in 0..400 {
                if i % 37 == 0 {
                    game.handle_input(&key(Key::Down), &mut store);
                }
                if i % 37 == 12 {
                    game.handle_input(&InputEvent::KeyUp(Key::Down), &mut store);
                }
                game.tick(deltas[i % deltas.len()], &mut store);
                trace.push((game.state.clone(), store.live_score()));
            }
            trace
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn full_match_records_result() {
        let mut store = ArcadeStore::in_memory();
        let mut game = PongGame::new(&mut store, 7, Difficulty::Easy);
        start_playing(&mut game, &mut store);
        // Nobody touches the keys; the match still runs to seven.
        for _ in 0..200_000 {
            game.tick(16.0, &mut store);
            if game.state.phase == Phase::GameOver {
                break;
            }
        }
        assert_eq!(game.state.phase, Phase::GameOver);
        let score = store.live_score();
        assert!(score.a == 7 || score.b == 7);
        let pong = &store.load_profile().pong;
        assert_eq!(pong.player_wins + pong.cpu_wins, 1);
    }

    #[test]
    fn point_pause_lasts_its_full_length() {
        let mut store = ArcadeStore::in_memory();
        let mut game = PongGame::new(&mut store, 5, Difficulty::Easy);
        start_playing(&mut game, &mut store);
        for _ in 0..10_000 {
            game.tick(40.0, &mut store);
            if game.state.phase != Phase::Playing {
                break;
            }
        }
        assert_eq!(game.state.phase, Phase::Point);
        game.tick(990.0, &mut store);
        assert_eq!(game.state.phase, Phase::Point);
        game.tick(10.0, &mut store);
        assert_eq!(game.state.phase, Phase::Countdown);
    }

    #[test]
    fn cleanup_stops_ticks() {
        let mut store = ArcadeStore::in_memory();
        let mut game = PongGame::new(&mut store, 1, Difficulty::Medium);
        start_playing(&mut game, &mut store);
        game.cleanup();
        let before = game.state.clone();
        game.tick(100.0, &mut store);
        assert_eq!(game.state, before);
        assert!(game.state.countdown_timer.is_none());
    }

    #[test]
    fn enter_after_game_over_replays() {
        let mut store = ArcadeStore::in_memory();
        let mut game = PongGame::new(&mut store, 1, Difficulty::Hard);
        game.state.phase = Phase::GameOver;
        store.increment_score(Team::B);
        game.handle_input(&key(Key::Enter), &mut store);
        assert_eq!(game.state.phase, Phase::Difficulty);
        assert_eq!(game.state.difficulty, Difficulty::Hard);
        assert!(game.state.running);
        assert_eq!(store.live_score().b, 0);
    }
}
