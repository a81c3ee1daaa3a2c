/// 75-ball Bingo against the CPU, first to three rounds.

pub mod logic;
pub mod render;
pub mod state;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::games::{Flow, Game};
use crate::grid::GridBuffer;
use crate::input::{InputEvent, Key};
use crate::store::{ArcadeStore, Team, VersusGame};

use state::{BingoState, Mode, Phase, Side, ARENA_H, ARENA_W};

pub struct BingoGame {
    pub state: BingoState,
    rng: SmallRng,
    grid: GridBuffer,
}

impl BingoGame {
    pub fn new(store: &mut ArcadeStore, seed: u64) -> Self {
        store.reset_all_scores();
        Self {
            state: BingoState::new(),
            rng: SmallRng::seed_from_u64(seed),
            grid: GridBuffer::new(ARENA_W as u16, ARENA_H as u16),
        }
    }

    fn score_round(&mut self, winner: Side, store: &mut ArcadeStore) {
        store.increment_score(match winner {
            Side::Player => Team::A,
            Side::Cpu => Team::B,
        });
        if logic::schedule_after_round(&mut self.state, store.live_score()) {
            store.record_match_result(VersusGame::Bingo);
        }
    }

    fn handle_key(&mut self, key: Key, store: &mut ArcadeStore) -> Flow {
        let state = &mut self.state;
        match state.phase {
            Phase::ModeSelect => {
                if key.is_up() || key.is_down() {
                    state.mode_cursor = state.mode_cursor.toggle();
                } else if key.is_confirm() {
                    let mode = state.mode_cursor;
                    logic::choose_mode(state, mode, &mut self.rng);
                } else if key == Key::Char('1') {
                    logic::choose_mode(state, Mode::Manual, &mut self.rng);
                } else if key == Key::Char('2') {
                    logic::choose_mode(state, Mode::Auto, &mut self.rng);
                } else {
                    return Flow::Ignored;
                }
                Flow::Handled
            }
            Phase::MatchEnd if key == Key::Enter => Flow::ExitToMenu,
            Phase::Playing if state.mode == Mode::Manual => {
                if key.is_confirm() {
                    if let Some(winner) = logic::try_mark(state) {
                        self.score_round(winner, store);
                    }
                    Flow::Handled
                } else if logic::move_cursor(state, key) {
                    Flow::Handled
                } else {
                    Flow::Ignored
                }
            }
            _ => Flow::Ignored,
        }
    }
}

impl Game for BingoGame {
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
        if let Some(winner) = logic::tick(&mut self.state, elapsed_ms, &mut self.rng) {
            self.score_round(winner, store);
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
        self.state.call_timer = None;
        self.state.round_timer = None;
    }
}
