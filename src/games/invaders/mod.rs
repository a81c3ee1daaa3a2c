/// Space Invaders: endless waves, three lives, best score kept per profile.

pub mod logic;
pub mod render;
pub mod state;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::games::{Flow, Game};
use crate::grid::GridBuffer;
use crate::input::{HeldKeys, InputEvent, Key};
use crate::store::{ArcadeStore, SoloGame};

use logic::{ShipInput, StepOutcome};
use state::{InvadersState, Phase, ARENA_H, ARENA_W};

pub struct InvadersGame {
    pub state: InvadersState,
    held: HeldKeys,
    rng: SmallRng,
    grid: GridBuffer,
}

impl InvadersGame {
    pub fn new(store: &ArcadeStore, seed: u64) -> Self {
        let best = store.load_profile().invaders.best_score;
        Self {
            state: InvadersState::new(best),
            held: HeldKeys::new(),
            rng: SmallRng::seed_from_u64(seed),
            grid: GridBuffer::new(ARENA_W as u16, ARENA_H as u16),
        }
    }

    fn ship_input(&self) -> ShipInput {
        ShipInput {
            left: self.held.any(Key::is_left),
            right: self.held.any(Key::is_right),
        }
    }

    fn handle_key(&mut self, key: Key, store: &ArcadeStore) -> Flow {
        match self.state.phase {
            Phase::Intro if key.is_confirm() => {
                logic::start_wave(&mut self.state);
                logic::start_countdown(&mut self.state);
                Flow::Handled
            }
            Phase::Playing if key == Key::Char('p') => {
                logic::toggle_pause(&mut self.state);
                Flow::Handled
            }
            Phase::Playing if key == Key::Char(' ') => {
                logic::fire(&mut self.state);
                Flow::Handled
            }
            Phase::GameOver if key == Key::Enter => {
                self.cleanup();
                let seed = self.rng.random();
                *self = InvadersGame::new(store, seed);
                Flow::Handled
            }
            _ => Flow::Ignored,
        }
    }
}

impl Game for InvadersGame {
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
        let input = self.ship_input();
        let outcome = logic::advance(&mut self.state, elapsed_ms, input, &mut self.rng);
        if outcome == Some(StepOutcome::GameOver)
            && store.record_solo_result(SoloGame::Invaders, self.state.score)
        {
            self.state.best_score = self.state.score;
        }
        logic::tick_countdown(&mut self.state, elapsed_ms);
        // A pause started this frame counts from the next one.
        if outcome != Some(StepOutcome::WaveCleared) {
            logic::tick_wave_clear(&mut self.state, elapsed_ms);
        }
    }

    fn render(&mut self, store: &ArcadeStore) -> &GridBuffer {
        render::render(&self.state, &mut self.grid, store.player_name());
        &self.grid
    }

    fn cleanup(&mut self) {
        self.state.running = false;
        self.state.countdown_timer = None;
        self.state.wave_timer = None;
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: Key) -> InputEvent {
        InputEvent::KeyDown(k)
    }

    fn start(game: &mut InvadersGame, store: &mut ArcadeStore) {
        game.handle_input(&key(Key::Enter), store);
        assert_eq!(game.state.phase, Phase::Countdown);
        for _ in 0..3 {
            game.tick(700.0, store);
        }
        assert_eq!(game.state.phase, Phase::Playing);
    }

    #[test]
    fn loads_best_score() {
        let mut store = ArcadeStore::in_memory();
        store.record_solo_result(SoloGame::Invaders, 340);
        let game = InvadersGame::new(&store, 1);
        assert_eq!(game.state.best_score, 340);
        assert_eq!(game.state.phase, Phase::Intro);
    }

    #[test]
    fn held_keys_steer_ship() {
        let mut store = ArcadeStore::in_memory();
        let mut game = InvadersGame::new(&store, 1);
        start(&mut game, &mut store);
        game.handle_input(&key(Key::Char('d')), &mut store);
        game.tick(48.0, &mut store);
        assert!(game.state.player_x > 35.0);
        game.handle_input(&InputEvent::KeyUp(Key::Char('d')), &mut store);
        let x = game.state.player_x;
        game.tick(48.0, &mut store);
        assert_eq!(game.state.player_x, x);
    }

    #[test]
    fn space_fires_only_while_playing() {
        let mut store = ArcadeStore::in_memory();
        let mut game = InvadersGame::new(&store, 1);
        game.handle_input(&key(Key::Char(' ')), &mut store);
        assert_eq!(game.state.phase, Phase::Countdown);
        assert!(game.state.bullet.is_none());
        for _ in 0..3 {
            game.tick(700.0, &mut store);
        }
        game.handle_input(&key(Key::Char(' ')), &mut store);
        assert!(game.state.bullet.is_some());
    }

    #[test]
    fn pause_freezes_play() {
        let mut store = ArcadeStore::in_memory();
        let mut game = InvadersGame::new(&store, 1);
        start(&mut game, &mut store);
        game.handle_input(&key(Key::Char('p')), &mut store);
        let before = game.state.clone();
        game.tick(50.0, &mut store);
        assert_eq!(game.state, before);
        game.handle_input(&key(Key::Char('p')), &mut store);
        assert!(!game.state.paused);
    }

    #[test]
    fn game_over_records_and_replays() {
        let mut store = ArcadeStore::in_memory();
        let mut game = InvadersGame::new(&store, 1);
        start(&mut game, &mut store);
        game.state.score = 70;
        game.state.offset_y = 20;
        game.tick(16.0, &mut store);
        assert_eq!(game.state.phase, Phase::GameOver);
        assert_eq!(game.state.best_score, 70);
        let stats = &store.load_profile().invaders;
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.best_score, 70);

        game.handle_input(&key(Key::Enter), &mut store);
        assert_eq!(game.state.phase, Phase::Intro);
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.best_score, 70);
    }

    #[test]
    fn wave_clear_pause_lasts_its_full_length() {
        let mut store = ArcadeStore::in_memory();
        let mut game = InvadersGame::new(&store, 1);
        start(&mut game, &mut store);
        for alien in game.state.aliens.iter_mut() {
            alien.alive = false;
        }
        game.tick(48.0, &mut store);
        assert_eq!(game.state.phase, Phase::WaveClear);
        game.tick(1990.0, &mut store);
        assert_eq!(game.state.phase, Phase::WaveClear);
        game.tick(10.0, &mut store);
        assert_eq!(game.state.phase, Phase::Countdown);
        assert_eq!(game.state.wave, 2);
    }

    #[test]
    fn cleanup_cancels_timers() {
        let mut store = ArcadeStore::in_memory();
        let mut game = InvadersGame::new(&store, 1);
        game.handle_input(&key(Key::Enter), &mut store);
        game.cleanup();
        game.tick(5000.0, &mut store);
        assert_eq!(game.state.phase, Phase::Countdown);
        assert!(game.state.countdown_timer.is_none());
    }
}
