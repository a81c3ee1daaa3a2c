//! Persistent arcade store: live two-team score, player profile and
//! per-game records.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current profile format version, written with every save.
//!   Bump it when fields are added.
//! - Profiles written before versioning existed carry no version and count
//!   as 0. Every version so far is still loaded.
//!
//! Live scores are capped at `MAX_SCORE`; a stored score above it is treated
//! as corrupt.
//!
//! Loading never fails. Every field is read on its own and falls back to its
//! default when missing or of the wrong type, so one bad value never costs
//! the rest of the profile.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SAVE_VERSION: u32 = 1;
/// Highest live score a team can hold.
pub const MAX_SCORE: u32 = 9999;

const SCORES_KEY: &str = "scoreKeeper";
const PROFILE_KEY: &str = "arcadeData";
const HISTORY_KEY: &str = "keeperHistory";
/// Scores from the old stand-alone score keeper, merged once and removed.
const LEGACY_SCORES_KEY: &str = "keeperScores";

pub const DEFAULT_PLAYER_NAME: &str = "PLAYER";

#[cfg(target_arch = "wasm32")]
fn log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn log(_msg: &str) {}

#[cfg(target_arch = "wasm32")]
fn warn(msg: &str) {
    web_sys::console::warn_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(_msg: &str) {}

/// Key-value backend behind the store.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns false when the backend refused the write.
    fn set(&mut self, key: &str, value: &str) -> bool;
    fn remove(&mut self, key: &str);
}

/// In-memory backend for tests and for hosts without localStorage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.items.insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Browser localStorage. WASM only.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        match self.inner.set_item(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn(&format!("arcade: failed to write {key} to localStorage: {e:?}"));
                false
            }
        }
    }

    fn remove(&mut self, key: &str) {
        let _ = self.inner.remove_item(key);
    }
}

/// Score side. `A` is the player, `B` the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    A,
    B,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveScore {
    pub a: u32,
    pub b: u32,
}

impl LiveScore {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::A => self.a,
            Team::B => self.b,
        }
    }

    fn get_mut(&mut self, team: Team) -> &mut u32 {
        match team {
            Team::A => &mut self.a,
            Team::B => &mut self.b,
        }
    }
}

/// Who took a versus match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Cpu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub player_score: u32,
    pub cpu_score: u32,
    pub winner: Winner,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersusStats {
    pub player_wins: u32,
    pub cpu_wins: u32,
    pub last_match: Option<MatchSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoloStats {
    pub best_score: u32,
    pub games_played: u32,
    pub last_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersusGame {
    Pong,
    TicTacToe,
    Bingo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoloGame {
    Snake,
    Invaders,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub version: u32,
    pub player_name: String,
    pub pong: VersusStats,
    pub ttt: VersusStats,
    pub bingo: VersusStats,
    pub snake: SoloStats,
    pub invaders: SoloStats,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            pong: VersusStats::default(),
            ttt: VersusStats::default(),
            bingo: VersusStats::default(),
            snake: SoloStats::default(),
            invaders: SoloStats::default(),
        }
    }
}

impl Profile {
    pub fn versus(&self, game: VersusGame) -> &VersusStats {
        match game {
            VersusGame::Pong => &self.pong,
            VersusGame::TicTacToe => &self.ttt,
            VersusGame::Bingo => &self.bingo,
        }
    }

    fn versus_mut(&mut self, game: VersusGame) -> &mut VersusStats {
        match game {
            VersusGame::Pong => &mut self.pong,
            VersusGame::TicTacToe => &mut self.ttt,
            VersusGame::Bingo => &mut self.bingo,
        }
    }

    pub fn solo(&self, game: SoloGame) -> &SoloStats {
        match game {
            SoloGame::Snake => &self.snake,
            SoloGame::Invaders => &self.invaders,
        }
    }

    fn solo_mut(&mut self, game: SoloGame) -> &mut SoloStats {
        match game {
            SoloGame::Snake => &mut self.snake,
            SoloGame::Invaders => &mut self.invaders,
        }
    }

    /// Read a stored profile, taking every field that parses and defaulting
    /// the rest.
    fn from_value(v: &Value) -> Profile {
        let player_name = match v.get("playerName").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_PLAYER_NAME.to_string(),
        };
        Profile {
            version: SAVE_VERSION,
            player_name,
            pong: versus_from_value(v.get("pong")),
            ttt: versus_from_value(v.get("ttt")),
            bingo: versus_from_value(v.get("bingo")),
            snake: solo_from_value(v.get("snake")),
            invaders: solo_from_value(v.get("invaders")),
        }
    }
}

fn count(v: Option<&Value>, field: &str) -> u32 {
    v.and_then(|v| v.get(field))
        .and_then(Value::as_u64)
        .map_or(0, |n| n.min(u32::MAX as u64) as u32)
}

fn versus_from_value(v: Option<&Value>) -> VersusStats {
    VersusStats {
        player_wins: count(v, "playerWins"),
        cpu_wins: count(v, "cpuWins"),
        last_match: v
            .and_then(|v| v.get("lastMatch"))
            .and_then(|m| serde_json::from_value(m.clone()).ok()),
    }
}

fn solo_from_value(v: Option<&Value>) -> SoloStats {
    SoloStats {
        best_score: count(v, "bestScore"),
        games_played: count(v, "gamesPlayed"),
        last_score: count(v, "lastScore"),
    }
}

/// None for unreadable JSON or a score above `MAX_SCORE`.
fn parse_scores(json: &str) -> Option<LiveScore> {
    let v: Value = serde_json::from_str(json).ok()?;
    let field = |k: &str| {
        let n = v.get(k).and_then(Value::as_u64).unwrap_or(0);
        u32::try_from(n).ok().filter(|n| *n <= MAX_SCORE)
    };
    Some(LiveScore {
        a: field("a")?,
        b: field("b")?,
    })
}

/// History whose per-team counts disagree with `score` is rebuilt from it:
/// all of A's points, then all of B's.
fn reconcile_history(saved: Option<Vec<Team>>, score: LiveScore) -> (Vec<Team>, bool) {
    if let Some(h) = saved {
        let a = h.iter().filter(|t| **t == Team::A).count();
        let b = h.len() - a;
        if a == score.a as usize && b == score.b as usize {
            return (h, false);
        }
    }
    let mut rebuilt = vec![Team::A; score.a as usize];
    rebuilt.extend(std::iter::repeat(Team::B).take(score.b as usize));
    (rebuilt, true)
}

pub struct ArcadeStore {
    storage: Box<dyn Storage>,
    scores: LiveScore,
    profile: Profile,
    history: Vec<Team>,
}

impl ArcadeStore {
    /// Open the store over `storage`: load the live score (merging legacy
    /// score-keeper data), the score history and the profile.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let mut store = Self {
            storage,
            scores: LiveScore::default(),
            profile: Profile::default(),
            history: Vec::new(),
        };
        store.load_scores();
        store.load_history();
        store.profile = store.read_profile();
        store
    }

    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStorage::new()))
    }

    /// localStorage when the browser provides one, memory otherwise.
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        match LocalStorage::open() {
            Some(ls) => Self::open(Box::new(ls)),
            None => {
                warn("arcade: localStorage unavailable, progress will not be kept");
                Self::in_memory()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn browser() -> Self {
        Self::in_memory()
    }

    fn load_scores(&mut self) {
        if let Some(json) = self.storage.get(SCORES_KEY) {
            match parse_scores(&json) {
                Some(s) => self.scores = s,
                None => warn("arcade: corrupt live score ignored"),
            }
        }

        if let Some(json) = self.storage.get(LEGACY_SCORES_KEY) {
            match parse_scores(&json) {
                Some(legacy) if self.scores == LiveScore::default() => {
                    log("arcade: merged legacy score keeper data");
                    self.scores = legacy;
                }
                Some(_) => log("arcade: legacy score keeper data dropped, live score present"),
                None => warn("arcade: corrupt legacy score keeper data dropped"),
            }
            self.storage.remove(LEGACY_SCORES_KEY);
            self.save_scores();
        }
    }

    fn save_scores(&mut self) {
        match serde_json::to_string(&self.scores) {
            Ok(json) => {
                self.storage.set(SCORES_KEY, &json);
            }
            Err(e) => warn(&format!("arcade: failed to serialize score: {e}")),
        }
    }

    // ── Live score ──────────────────────────────────────────────

    pub fn live_score(&self) -> LiveScore {
        self.scores
    }

    /// Add one point. A score at `MAX_SCORE` stays there.
    pub fn increment_score(&mut self, team: Team) {
        let s = self.scores.get_mut(team);
        if *s >= MAX_SCORE {
            return;
        }
        *s += 1;
        self.save_scores();
        self.history.push(team);
        self.save_history();
    }

    /// Remove one point. A score already at zero stays there.
    pub fn decrement_score(&mut self, team: Team) {
        let s = self.scores.get_mut(team);
        if *s == 0 {
            return;
        }
        *s -= 1;
        self.save_scores();
        if let Some(i) = self.history.iter().rposition(|t| *t == team) {
            self.history.remove(i);
        }
        self.save_history();
    }

    pub fn reset_score(&mut self, team: Team) {
        *self.scores.get_mut(team) = 0;
        self.save_scores();
        self.history.retain(|t| *t != team);
        self.save_history();
    }

    pub fn reset_all_scores(&mut self) {
        self.scores = LiveScore::default();
        self.save_scores();
        self.history.clear();
        self.save_history();
    }

    // ── Score history ───────────────────────────────────────────

    fn load_history(&mut self) {
        let saved = self
            .storage
            .get(HISTORY_KEY)
            .and_then(|json| serde_json::from_str::<Vec<Team>>(&json).ok());
        let (history, rebuilt) = reconcile_history(saved, self.scores);
        self.history = history;
        if rebuilt {
            self.save_history();
        }
    }

    fn save_history(&mut self) {
        match serde_json::to_string(&self.history) {
            Ok(json) => {
                self.storage.set(HISTORY_KEY, &json);
            }
            Err(e) => warn(&format!("arcade: failed to serialize history: {e}")),
        }
    }

    /// Order in which points were scored. Always agrees with the live score.
    pub fn score_history(&self) -> &[Team] {
        &self.history
    }

    // ── Profile ─────────────────────────────────────────────────

    /// The cached profile, read once when the store was opened.
    pub fn load_profile(&self) -> &Profile {
        &self.profile
    }

    fn read_profile(&mut self) -> Profile {
        let Some(json) = self.storage.get(PROFILE_KEY) else {
            return Profile::default();
        };
        let value: Value = match serde_json::from_str(&json) {
            Ok(v) => v,
            Err(e) => {
                warn(&format!("arcade: profile unreadable, starting fresh: {e}"));
                return Profile::default();
            }
        };
        let version = count(Some(&value), "version");
        if version < SAVE_VERSION {
            log(&format!(
                "arcade: migrating profile (saved={version}, current={SAVE_VERSION})"
            ));
        }
        Profile::from_value(&value)
    }

    pub fn save_profile(&mut self, profile: Profile) {
        match serde_json::to_string(&profile) {
            Ok(json) => {
                self.storage.set(PROFILE_KEY, &json);
            }
            Err(e) => warn(&format!("arcade: failed to serialize profile: {e}")),
        }
        self.profile = profile;
    }

    fn update_profile(&mut self, f: impl FnOnce(&mut Profile)) {
        let mut profile = self.profile.clone();
        f(&mut profile);
        self.save_profile(profile);
    }

    /// Record a finished versus match from the current live score.
    /// A tie goes to the CPU.
    pub fn record_match_result(&mut self, game: VersusGame) {
        let score = self.scores;
        let winner = if score.a > score.b {
            Winner::Player
        } else {
            Winner::Cpu
        };
        self.update_profile(|p| {
            let stats = p.versus_mut(game);
            stats.last_match = Some(MatchSummary {
                player_score: score.a,
                cpu_score: score.b,
                winner,
            });
            match winner {
                Winner::Player => stats.player_wins += 1,
                Winner::Cpu => stats.cpu_wins += 1,
            }
        });
    }

    /// Record a finished solo run. Returns true on a new best score.
    pub fn record_solo_result(&mut self, game: SoloGame, score: u32) -> bool {
        let mut new_best = false;
        self.update_profile(|p| {
            let stats = p.solo_mut(game);
            stats.games_played += 1;
            stats.last_score = score;
            if score > stats.best_score {
                stats.best_score = score;
                new_best = true;
            }
        });
        new_best
    }

    pub fn player_name(&self) -> &str {
        &self.profile.player_name
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.update_profile(|p| p.player_name = name.to_string());
    }

    /// Wipe all stats and the player name.
    pub fn reset_profile(&mut self) {
        self.profile = Profile::default();
        self.storage.remove(PROFILE_KEY);
    }
}
