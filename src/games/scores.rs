/// Scoreboard: live score controls, per-game records and player name entry.

use crate::games::{Flow, Game};
use crate::grid::GridBuffer;
use crate::input::{InputEvent, Key};
use crate::store::{
    ArcadeStore, LiveScore, SoloGame, SoloStats, Team, VersusGame, VersusStats, Winner,
};

pub const ARENA_W: i32 = 70;
pub const ARENA_H: i32 = 30;
pub const MAX_NAME_LEN: usize = 12;
/// Points shown in the history strip.
pub const HISTORY_SHOWN: usize = 40;
/// Game titles are padded to this width on the record lines.
const TITLE_W: usize = 16;

#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    View,
    /// Typing a new name into the buffer.
    NameEntry(String),
}

pub struct ScoresScreen {
    pub mode: Mode,
    pub team: Team,
    grid: GridBuffer,
}

impl ScoresScreen {
    pub fn new() -> Self {
        Self {
            mode: Mode::View,
            team: Team::A,
            grid: GridBuffer::new(ARENA_W as u16, ARENA_H as u16),
        }
    }

    fn handle_name_key(&mut self, key: Key, store: &mut ArcadeStore) {
        let Mode::NameEntry(buffer) = &mut self.mode else {
            return;
        };
        match key {
            Key::Enter => {
                let name = buffer.trim().to_uppercase();
                if !name.is_empty() {
                    store.set_player_name(&name);
                }
                self.mode = Mode::View;
            }
            Key::Esc => self.mode = Mode::View,
            Key::Backspace => {
                buffer.pop();
            }
            Key::Char(c) if buffer.chars().count() < MAX_NAME_LEN => {
                buffer.extend(c.to_uppercase());
            }
            _ => {}
        }
    }

    fn handle_view_key(&mut self, key: Key, store: &mut ArcadeStore) -> Flow {
        match key {
            Key::Esc => return Flow::ExitToMenu,
            k if k.is_left() => self.team = Team::A,
            k if k.is_right() => self.team = Team::B,
            k if k.is_up() => store.increment_score(self.team),
            k if k.is_down() => store.decrement_score(self.team),
            Key::Char('q') => store.reset_score(self.team),
            Key::Char('r') => store.reset_profile(),
            Key::Char('n') => self.mode = Mode::NameEntry(String::new()),
            _ => return Flow::Ignored,
        }
        Flow::Handled
    }
}

impl Default for ScoresScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for ScoresScreen {
    fn handle_input(&mut self, event: &InputEvent, store: &mut ArcadeStore) -> Flow {
        let InputEvent::KeyDown(key) = *event else {
            return Flow::Ignored;
        };
        if matches!(self.mode, Mode::NameEntry(_)) {
            self.handle_name_key(key, store);
            return Flow::Handled;
        }
        self.handle_view_key(key, store)
    }

    fn tick(&mut self, _elapsed_ms: f64, _store: &mut ArcadeStore) {}

    fn render(&mut self, store: &ArcadeStore) -> &GridBuffer {
        render(&self.mode, self.team, &mut self.grid, store);
        &self.grid
    }

    fn cleanup(&mut self) {
        self.mode = Mode::View;
    }
}

/// `---===[ TITLE ]===---` across the inner width.
fn section_header(g: &mut GridBuffer, row: i32, title: &str) {
    let label = format!("[ {title} ]");
    let len = label.len() as i32;
    let start = (ARENA_W - len).div_euclid(2);
    for c in 1..ARENA_W - 1 {
        let ch = if (start - 3..start).contains(&c) || (start + len..start + len + 3).contains(&c) {
            '='
        } else {
            '-'
        };
        g.set(row, c, ch);
    }
    g.text(&label, row, Some(start));
}

fn pad_title(title: &str) -> String {
    format!("{title:<TITLE_W$}")
}

fn versus_line(title: &str, stats: &VersusStats, name: &str) -> String {
    let last = match &stats.last_match {
        Some(m) => {
            let winner = match m.winner {
                Winner::Player => format!("{name} WINS"),
                Winner::Cpu => "CPU WINS".to_string(),
            };
            format!("LAST: {}-{} {winner}", m.player_score, m.cpu_score)
        }
        None => "NO MATCHES YET".to_string(),
    };
    format!(
        "{}W {}-{} L    {last}",
        pad_title(title),
        stats.player_wins,
        stats.cpu_wins
    )
}

fn solo_line(title: &str, stats: &SoloStats) -> String {
    let last = if stats.games_played > 0 {
        stats.last_score.to_string()
    } else {
        "---".to_string()
    };
    format!(
        "{}PLAYED: {}  BEST: {}  LAST: {last}",
        pad_title(title),
        stats.games_played,
        stats.best_score
    )
}

/// Most recent points, `#` for the player and `.` for the CPU.
fn history_strip(history: &[Team]) -> String {
    let start = history.len().saturating_sub(HISTORY_SHOWN);
    history[start..]
        .iter()
        .map(|t| if *t == Team::A { '#' } else { '.' })
        .collect()
}

/// How often the lead passed from one team to the other. Ties keep the
/// previous leader.
fn lead_changes(history: &[Team]) -> u32 {
    let mut diff = 0i64;
    let mut leader = None;
    let mut changes = 0;
    for team in history {
        diff += if *team == Team::A { 1 } else { -1 };
        let now = match diff {
            d if d > 0 => Some(Team::A),
            d if d < 0 => Some(Team::B),
            _ => continue,
        };
        if leader.is_some() && leader != now {
            changes += 1;
        }
        leader = now;
    }
    changes
}

fn render_live_score(g: &mut GridBuffer, team: Team, name: &str, score: LiveScore) {
    let line = match team {
        Team::A => format!(">> {name}  {:02}  -  {:02}  CPU", score.a, score.b),
        Team::B => format!("   {name}  {:02}  -  {:02}  CPU <<", score.a, score.b),
    };
    g.text(&line, 6, None);
    let col = (ARENA_W - line.chars().count() as i32).div_euclid(2);
    match team {
        Team::A => {
            g.set_green(6, col, '>');
            g.set_green(6, col + 1, '>');
        }
        Team::B => {
            let end = col + line.chars().count() as i32;
            g.set_green(6, end - 2, '<');
            g.set_green(6, end - 1, '<');
        }
    }
    g.text("W/S: +/-    Q: RESET    R: RESET ALL", 8, None);
}

pub fn render(mode: &Mode, team: Team, g: &mut GridBuffer, store: &ArcadeStore) {
    g.clear();
    g.borders();
    g.border_text(" S C O R E B O A R D ", 0);

    let profile = store.load_profile();
    let short: String = profile.player_name.chars().take(8).collect();

    section_header(g, 3, "L I V E   S C O R E");
    match mode {
        Mode::NameEntry(buffer) => {
            g.text(&format!("ENTER NAME: {buffer}_"), 6, None);
            g.text("TYPE NAME, ENTER TO SAVE, ESC TO CANCEL", 8, None);
        }
        Mode::View => {
            render_live_score(g, team, &short, store.live_score());
            let history = store.score_history();
            g.text(
                &format!(
                    "TOTAL: {}   LEAD CHANGES: {}",
                    history.len(),
                    lead_changes(history)
                ),
                7,
                None,
            );
        }
    }
    let history = store.score_history();
    if !history.is_empty() {
        g.text(&history_strip(history), 9, None);
    }

    section_header(g, 11, "V S   G A M E S");
    for (row, title, game) in [
        (14, "PONG", VersusGame::Pong),
        (16, "TIC TAC TOE", VersusGame::TicTacToe),
        (18, "BINGO", VersusGame::Bingo),
    ] {
        g.text(&versus_line(title, profile.versus(game), &short), row, Some(3));
    }

    section_header(g, 21, "S O L O   G A M E S");
    for (row, title, game) in [
        (24, "SNAKE", SoloGame::Snake),
        (26, "SPACE INVADERS", SoloGame::Invaders),
    ] {
        g.text(&solo_line(title, profile.solo(game)), row, Some(3));
    }

    g.border_text(" [N] NAME   [R] RESET   [ESC] BACK ", ARENA_H - 1);
}
