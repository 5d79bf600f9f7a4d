use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::history::emotion::Emotion;
use crate::history::repo::MoodEntry;

/// Request body for a single append. `emotion` stays optional so an absent
/// field surfaces as a ValidationError rather than a deserialization reject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendEntryRequest {
    #[serde(default)]
    pub emotion: Option<Emotion>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
}

/// One element of a bulk import. Entries missing an emotion are filtered
/// out, never batch-failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEntry {
    #[serde(default)]
    pub emotion: Option<Emotion>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub entries: Vec<ImportEntry>,
}

impl ImportRequest {
    /// Keep only entries that carry an emotion. Partial success is the
    /// contract: one bad entry never fails the batch.
    pub fn well_formed(self) -> Vec<(Emotion, Option<OffsetDateTime>)> {
        self.entries
            .into_iter()
            .filter_map(|e| e.emotion.map(|emotion| (emotion, e.timestamp)))
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub inserted: Vec<MoodEntry>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

pub const MAX_LIMIT: i64 = 50;

impl HistoryQuery {
    /// Effective page size: default 10, clamped to 1..=50.
    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_to_ten() {
        let q: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.effective_limit(), 10);
    }

    #[test]
    fn limit_is_clamped_to_fifty() {
        let q: HistoryQuery = serde_json::from_str(r#"{"limit": 500}"#).unwrap();
        assert_eq!(q.effective_limit(), 50);
        let q: HistoryQuery = serde_json::from_str(r#"{"limit": 0}"#).unwrap();
        assert_eq!(q.effective_limit(), 1);
        let q: HistoryQuery = serde_json::from_str(r#"{"limit": -3}"#).unwrap();
        assert_eq!(q.effective_limit(), 1);
    }

    #[test]
    fn append_request_tolerates_missing_fields() {
        let r: AppendEntryRequest = serde_json::from_str("{}").unwrap();
        assert!(r.emotion.is_none());
        assert!(r.timestamp.is_none());

        let r: AppendEntryRequest =
            serde_json::from_str(r#"{"emotion":"happy","timestamp":"2026-08-28T12:00:00Z"}"#)
                .unwrap();
        assert_eq!(r.emotion, Some(Emotion::Happy));
        assert!(r.timestamp.is_some());
    }

    #[test]
    fn import_request_defaults_to_empty_batch() {
        let r: ImportRequest = serde_json::from_str("{}").unwrap();
        assert!(r.entries.is_empty());
    }

    #[test]
    fn malformed_import_entries_are_dropped_not_fatal() {
        let r: ImportRequest = serde_json::from_str(
            r#"{"entries":[
                {"emotion":"happy","timestamp":"2026-08-28T10:00:00Z"},
                {"timestamp":"2026-08-28T10:01:00Z"},
                {"emotion":"sad"}
            ]}"#,
        )
        .unwrap();
        let kept = r.well_formed();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].0, Emotion::Happy);
        assert!(kept[0].1.is_some());
        assert_eq!(kept[1].0, Emotion::Sad);
        assert!(kept[1].1.is_none());
    }
}
