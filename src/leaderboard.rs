//! Leaderboard boundary
//!
//! The simulation only ever hands a final score and a player name across
//! this boundary. Store calls never run inside a tick: every operation is
//! fire-and-forget and results come back through a polled inbox of
//! `StoreUpdate`s that only touch UI-observed state. Failures are reported
//! to the status channel and otherwise swallowed.

use serde::{Deserialize, Serialize};

/// Entries kept/fetched per board
pub const MAX_ENTRIES: usize = 10;
/// Player names are capped at 16 characters
pub const MAX_NAME_LEN: usize = 16;
/// Stored scores are clamped into `[0, MAX_SCORE]`
pub const MAX_SCORE: u32 = 9999;

/// Truncate a player name to the storable length (whitespace-trimmed)
pub fn clamp_name(name: &str) -> String {
    name.trim().chars().take(MAX_NAME_LEN).collect()
}

/// Clamp a score into the storable range
pub fn clamp_score(score: u32) -> u32 {
    score.min(MAX_SCORE)
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: &str, score: u32) -> Self {
        Self {
            name: clamp_name(name),
            score: clamp_score(score),
        }
    }
}

/// Top-N board ordered by score descending
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    pub entries: Vec<ScoreEntry>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Would this score make the board?
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert an entry keeping descending order; returns the 1-indexed rank
    /// achieved, or `None` if the score did not qualify.
    pub fn add(&mut self, entry: ScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn top(&self) -> &[ScoreEntry] {
        &self.entries
    }
}

/// Asynchronous results delivered to the UI between frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUpdate {
    /// Fresh top-N listing
    Top(Vec<ScoreEntry>),
    /// Global play counter after an increment
    Plays(u64),
    /// A submit completed
    Submitted,
    /// A store call failed; the game carries on with local state only
    Failed(String),
}

/// The remote score store as the core consumes it. Implementations must
/// never block the simulation: calls enqueue work, `poll` drains whatever
/// has resolved since the last frame.
pub trait ScoreStore {
    /// Append one entry (server assigns the timestamp)
    fn submit(&mut self, entry: ScoreEntry);
    /// Ask for the current top-N, descending
    fn request_top(&mut self);
    /// Bump the global play counter
    fn increment_plays(&mut self);
    /// Drain resolved results
    fn poll(&mut self) -> Vec<StoreUpdate>;
}

/// In-process store used on native builds, in tests, and as the fallback
/// when no remote endpoint is configured. Resolves every call by the next
/// poll.
#[derive(Debug, Default)]
pub struct LocalScoreStore {
    board: Board,
    plays: u64,
    inbox: Vec<StoreUpdate>,
}

impl LocalScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for LocalScoreStore {
    fn submit(&mut self, entry: ScoreEntry) {
        self.board.add(entry);
        self.inbox.push(StoreUpdate::Submitted);
    }

    fn request_top(&mut self) {
        self.inbox
            .push(StoreUpdate::Top(self.board.top().to_vec()));
    }

    fn increment_plays(&mut self) {
        self.plays += 1;
        self.inbox.push(StoreUpdate::Plays(self.plays));
    }

    fn poll(&mut self) -> Vec<StoreUpdate> {
        std::mem::take(&mut self.inbox)
    }
}

/// Browser store speaking JSON to a small HTTP endpoint via `fetch`.
/// Requests run on the microtask queue through `spawn_local`; the frame
/// loop only ever sees the inbox.
#[cfg(target_arch = "wasm32")]
pub mod remote {
    use super::{ScoreEntry, ScoreStore, StoreUpdate};
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    type Inbox = Rc<RefCell<Vec<StoreUpdate>>>;

    pub struct RemoteScoreStore {
        base_url: String,
        inbox: Inbox,
    }

    impl RemoteScoreStore {
        pub fn new(base_url: &str) -> Self {
            Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                inbox: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn spawn(&self, method: &'static str, path: &str, body: Option<String>, kind: Kind) {
            let url = format!("{}/{}", self.base_url, path);
            let inbox = self.inbox.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_json(method, &url, body).await {
                    Ok(text) => deliver(&inbox, kind, &text),
                    Err(err) => {
                        log::warn!("leaderboard {method} {url} failed: {err}");
                        inbox.borrow_mut().push(StoreUpdate::Failed(err));
                    }
                }
            });
        }
    }

    #[derive(Clone, Copy)]
    enum Kind {
        Top,
        Plays,
        Submit,
    }

    fn deliver(inbox: &Inbox, kind: Kind, text: &str) {
        let update = match kind {
            Kind::Submit => StoreUpdate::Submitted,
            Kind::Top => match serde_json::from_str::<Vec<ScoreEntry>>(text) {
                Ok(mut entries) => {
                    entries.truncate(super::MAX_ENTRIES);
                    StoreUpdate::Top(entries)
                }
                Err(e) => StoreUpdate::Failed(format!("bad top-N payload: {e}")),
            },
            Kind::Plays => match text.trim().parse::<u64>() {
                Ok(n) => StoreUpdate::Plays(n),
                Err(e) => StoreUpdate::Failed(format!("bad play counter: {e}")),
            },
        };
        inbox.borrow_mut().push(update);
    }

    async fn fetch_json(
        method: &'static str,
        url: &str,
        body: Option<String>,
    ) -> Result<String, String> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = body {
            opts.set_body(&wasm_bindgen::JsValue::from_str(&body));
        }

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|_| "bad request".to_string())?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|_| "bad headers".to_string())?;

        let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
        let resp = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|_| "network error".to_string())?;
        let resp: Response = resp.dyn_into().map_err(|_| "bad response".to_string())?;
        if !resp.ok() {
            return Err(format!("http {}", resp.status()));
        }
        let text = JsFuture::from(resp.text().map_err(|_| "no body".to_string())?)
            .await
            .map_err(|_| "body read failed".to_string())?;
        text.as_string().ok_or_else(|| "non-text body".to_string())
    }

    impl ScoreStore for RemoteScoreStore {
        fn submit(&mut self, entry: ScoreEntry) {
            match serde_json::to_string(&entry) {
                Ok(body) => self.spawn("POST", "scores", Some(body), Kind::Submit),
                Err(e) => log::warn!("could not encode score entry: {e}"),
            }
        }

        fn request_top(&mut self) {
            self.spawn("GET", "scores/top", None, Kind::Top);
        }

        fn increment_plays(&mut self) {
            self.spawn("POST", "plays", None, Kind::Plays);
        }

        fn poll(&mut self) -> Vec<StoreUpdate> {
            std::mem::take(&mut self.inbox.borrow_mut())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_clamp_is_sixteen_chars() {
        assert_eq!(clamp_name("  whiskers  "), "whiskers");
        assert_eq!(clamp_name("abcdefghijklmnopqrstuvwx").len(), 16);
        assert_eq!(clamp_name(""), "");
    }

    #[test]
    fn score_clamp_range() {
        assert_eq!(clamp_score(0), 0);
        assert_eq!(clamp_score(9999), 9999);
        assert_eq!(clamp_score(123_456), 9999);
    }

    #[test]
    fn board_orders_descending_and_truncates() {
        let mut board = Board::new();
        for score in [5, 30, 12, 1, 99, 7, 45, 3, 60, 22, 18, 9] {
            board.add(ScoreEntry::new("p", score));
        }
        assert_eq!(board.top().len(), MAX_ENTRIES);
        for pair in board.top().windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(board.top()[0].score, 99);
    }

    #[test]
    fn zero_scores_never_qualify() {
        let mut board = Board::new();
        assert_eq!(board.add(ScoreEntry::new("p", 0)), None);
        assert!(board.top().is_empty());
    }

    #[test]
    fn rank_reported_one_indexed() {
        let mut board = Board::new();
        assert_eq!(board.add(ScoreEntry::new("a", 10)), Some(1));
        assert_eq!(board.add(ScoreEntry::new("b", 20)), Some(1));
        assert_eq!(board.add(ScoreEntry::new("c", 15)), Some(2));
    }

    #[test]
    fn local_store_resolves_by_next_poll() {
        let mut store = LocalScoreStore::new();
        store.increment_plays();
        store.submit(ScoreEntry::new("mew", 12));
        store.request_top();

        let updates = store.poll();
        assert_eq!(updates[0], StoreUpdate::Plays(1));
        assert_eq!(updates[1], StoreUpdate::Submitted);
        assert_eq!(
            updates[2],
            StoreUpdate::Top(vec![ScoreEntry::new("mew", 12)])
        );
        assert!(store.poll().is_empty());
    }
}
