use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::history::emotion::Emotion;
use crate::history::RETENTION_CAP;

/// One timestamped emotion observation tied to a user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub emotion: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MoodEntry {
    /// Newest-first page of a user's history. An unknown user yields an
    /// empty vec, not an error.
    pub async fn list_recent(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> anyhow::Result<Vec<MoodEntry>> {
        let rows = sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT id, user_id, emotion, timestamp, created_at
            FROM mood_entries
            WHERE user_id = $1
            ORDER BY timestamp DESC, created_at DESC, id
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        emotion: Emotion,
        timestamp: Option<OffsetDateTime>,
    ) -> anyhow::Result<MoodEntry> {
        let entry = sqlx::query_as::<_, MoodEntry>(
            r#"
            INSERT INTO mood_entries (user_id, emotion, timestamp)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, emotion, timestamp, created_at
            "#,
        )
        .bind(user_id)
        .bind(emotion.as_str())
        .bind(timestamp.unwrap_or_else(OffsetDateTime::now_utc))
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    /// Bulk insert for the signup-time guest-history import. Entries arrive
    /// pre-filtered; timestamps default to now.
    pub async fn insert_many(
        db: &PgPool,
        user_id: Uuid,
        entries: &[(Emotion, Option<OffsetDateTime>)],
    ) -> anyhow::Result<Vec<MoodEntry>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let now = OffsetDateTime::now_utc();
        let emotions: Vec<&str> = entries.iter().map(|&(e, _)| e.as_str()).collect();
        let timestamps: Vec<OffsetDateTime> =
            entries.iter().map(|&(_, ts)| ts.unwrap_or(now)).collect();

        let rows = sqlx::query_as::<_, MoodEntry>(
            r#"
            INSERT INTO mood_entries (user_id, emotion, timestamp)
            SELECT $1, e.emotion, e.ts
            FROM UNNEST($2::text[], $3::timestamptz[]) AS e(emotion, ts)
            RETURNING id, user_id, emotion, timestamp, created_at
            "#,
        )
        .bind(user_id)
        .bind(&emotions)
        .bind(&timestamps)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Enforce the retention cap: keep the `RETENTION_CAP` newest entries by
    /// timestamp (insertion order as secondary key) and delete the rest.
    /// Runs after every mutation, append and import alike.
    pub async fn prune_to_cap(db: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM mood_entries
            WHERE user_id = $1
              AND id NOT IN (
                  SELECT id FROM mood_entries
                  WHERE user_id = $1
                  ORDER BY timestamp DESC, created_at DESC, id
                  LIMIT $2
              )
            "#,
        )
        .bind(user_id)
        .bind(RETENTION_CAP)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
