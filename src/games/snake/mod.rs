/// Snake: eat, grow, speed up, avoid the walls and your own tail.

pub mod logic;
pub mod render;
pub mod state;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::games::{Flow, Game};
use crate::grid::GridBuffer;
use crate::input::{InputEvent, Key};
use crate::store::{ArcadeStore, SoloGame};

use state::{Dir, Phase, SnakeState, ARENA_H, ARENA_W};

pub struct SnakeGame {
    pub state: SnakeState,
    rng: SmallRng,
    grid: GridBuffer,
}

impl SnakeGame {
    pub fn new(store: &ArcadeStore, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut state = SnakeState::new(store.load_profile().snake.best_score);
        logic::spawn_food(&mut state, &mut rng);
        Self {
            state,
            rng,
            grid: GridBuffer::new(ARENA_W as u16, ARENA_H as u16),
        }
    }

    fn handle_key(&mut self, key: Key, store: &ArcadeStore) -> Flow {
        let state = &mut self.state;
        match state.phase {
            Phase::Intro if key.is_confirm() => {
                logic::start_countdown(state);
                Flow::Handled
            }
            Phase::Playing if key == Key::Char('p') => {
                logic::toggle_pause(state);
                Flow::Handled
            }
            Phase::Playing => {
                let dir = if key.is_up() {
                    Dir::Up
                } else if key.is_down() {
                    Dir::Down
                } else if key.is_left() {
                    Dir::Left
                } else if key.is_right() {
                    Dir::Right
                } else {
                    return Flow::Ignored;
                };
                logic::steer(state, dir);
                Flow::Handled
            }
            Phase::GameOver if key == Key::Enter => {
                self.cleanup();
                let seed = self.rng.random();
                *self = SnakeGame::new(store, seed);
                Flow::Handled
            }
            _ => Flow::Ignored,
        }
    }
}

impl Game for SnakeGame {
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
        if logic::tick_moves(&mut self.state, elapsed_ms, &mut self.rng)
            && store.record_solo_result(SoloGame::Snake, self.state.score)
        {
            self.state.best_score = self.state.score;
        }
        logic::tick_countdown(&mut self.state, elapsed_ms);
    }

    fn render(&mut self, store: &ArcadeStore) -> &GridBuffer {
        render::render(&self.state, &mut self.grid, store.player_name());
        &self.grid
    }

    fn cleanup(&mut self) {
        self.state.running = false;
        self.state.move_timer = None;
        self.state.countdown_timer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: Key) -> InputEvent {
        InputEvent::KeyDown(k)
    }

    fn start(game: &mut SnakeGame, store: &mut ArcadeStore) {
        game.handle_input(&key(Key::Enter), store);
        game.tick(2100.0, store);
        assert_eq!(game.state.phase, Phase::Playing);
    }

    #[test]
    fn runs_into_the_wall_and_records() {
        let mut store = ArcadeStore::in_memory();
        let mut game = SnakeGame::new(&store, 4);
        start(&mut game, &mut store);
        game.state.food = state::Pos { x: 1, y: 28 };
        for _ in 0..100 {
            game.tick(130.0, &mut store);
        }
        assert_eq!(game.state.phase, Phase::GameOver);
        assert_eq!(game.state.head().x, 68);
        let snake = &store.load_profile().snake;
        assert_eq!(snake.games_played, 1);
        assert_eq!(snake.last_score, 0);
    }

    #[test]
    fn arrow_keys_steer() {
        let mut store = ArcadeStore::in_memory();
        let mut game = SnakeGame::new(&store, 4);
        start(&mut game, &mut store);
        game.handle_input(&key(Key::Char('s')), &mut store);
        assert_eq!(game.state.next_dir, Dir::Down);
        game.handle_input(&key(Key::Up), &mut store);
        assert_eq!(game.state.next_dir, Dir::Up);
        assert_eq!(
            game.handle_input(&key(Key::Char('z')), &mut store),
            Flow::Ignored
        );
    }

    #[test]
    fn replay_after_game_over() {
        let mut store = ArcadeStore::in_memory();
        store.record_solo_result(SoloGame::Snake, 9);
        let mut game = SnakeGame::new(&store, 4);
        game.state.phase = Phase::GameOver;
        game.state.score = 3;
        game.handle_input(&key(Key::Enter), &mut store);
        assert_eq!(game.state.phase, Phase::Intro);
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.best_score, 9);
    }
}
