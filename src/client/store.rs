use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use crate::auth::dto::AuthResponse;
use crate::history::emotion::Emotion;
use crate::history::repo::MoodEntry;

/// Fixed keys of the persisted client state, all JSON-serialized.
pub const AUTH_KEY: &str = "moodify_auth";
pub const GUEST_KEY: &str = "guestMoodHistory";
pub const USER_KEY: &str = "moodHistory";

/// Lives in the session-scoped store only: it must vanish with the browser
/// session so the guest log is reset on the next visit.
pub const SESSION_FLAG: &str = "guestSessionActive";

/// Client-side cap on both the guest log and the cached user history.
pub const LOCAL_CAP: usize = 10;

/// One pre-authentication mood observation, pending association with an
/// account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestEntry {
    pub emotion: Emotion,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl GuestEntry {
    pub fn now(emotion: Emotion) -> Self {
        Self {
            emotion,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Key-value storage the session state lives in — the localStorage analog.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-memory store used by tests and headless embeddings.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// The single owner of persisted client state. Sign-in/sign-out are the only
/// writers of the session payload; everything else reads through here.
///
/// Two stores with different lifetimes back it: `store` is the persistent
/// one (the localStorage analog), `session` is scoped to one browser
/// session (the sessionStorage analog) and holds only the session-active
/// flag.
#[derive(Debug)]
pub struct LocalState<P: SessionStore, E: SessionStore = P> {
    store: P,
    session: E,
}

impl<P: SessionStore, E: SessionStore> LocalState<P, E> {
    pub fn new(store: P, session: E) -> Self {
        Self { store, session }
    }

    pub fn into_parts(self) -> (P, E) {
        (self.store, self.session)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable client state");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.store.set(key, raw),
            Err(e) => warn!(key, error = %e, "failed to serialize client state"),
        }
    }

    // --- session payload ---

    pub fn save_session(&mut self, session: &AuthResponse) {
        self.write_json(AUTH_KEY, session);
    }

    pub fn load_session(&self) -> Option<AuthResponse> {
        self.read_json(AUTH_KEY)
    }

    pub fn clear_session(&mut self) {
        self.store.remove(AUTH_KEY);
    }

    // --- guest history ---

    /// A fresh browser session starts with an empty guest log; within the
    /// same session the log survives reloads. The flag lives in the
    /// session-scoped store, so a restart drops it and the next init clears
    /// the (persistent) guest log.
    pub fn init_guest_session(&mut self) {
        if self.session.get(SESSION_FLAG).is_none() {
            self.store.remove(GUEST_KEY);
            self.session.set(SESSION_FLAG, "true".into());
        }
    }

    pub fn guest_history(&self) -> Vec<GuestEntry> {
        self.read_json(GUEST_KEY).unwrap_or_default()
    }

    /// Append to the guest log, keeping only the newest `LOCAL_CAP` entries.
    pub fn push_guest(&mut self, entry: GuestEntry) -> Vec<GuestEntry> {
        let mut entries = self.guest_history();
        entries.push(entry);
        if entries.len() > LOCAL_CAP {
            entries.drain(..entries.len() - LOCAL_CAP);
        }
        self.write_json(GUEST_KEY, &entries);
        entries
    }

    pub fn clear_guest_history(&mut self) {
        self.store.remove(GUEST_KEY);
    }

    // --- authenticated-user history cache ---

    pub fn set_user_history(&mut self, entries: &[MoodEntry]) {
        let capped: Vec<&MoodEntry> = entries.iter().take(LOCAL_CAP).collect();
        self.write_json(USER_KEY, &capped);
    }

    pub fn user_history(&self) -> Vec<MoodEntry> {
        self.read_json(USER_KEY).unwrap_or_default()
    }

    pub fn clear_user_history(&mut self) {
        self.store.remove(USER_KEY);
    }
}
