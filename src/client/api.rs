use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::dto::{AuthResponse, SigninRequest, SignupRequest};
use crate::client::store::GuestEntry;
use crate::history::dto::{AppendEntryRequest, ImportEntry, ImportRequest, ImportResponse};
use crate::history::repo::MoodEntry;

/// Auth Service as seen from the client.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, req: SignupRequest) -> anyhow::Result<AuthResponse>;
    async fn signin(&self, req: SigninRequest) -> anyhow::Result<AuthResponse>;
    async fn signin_admin(&self, req: SigninRequest) -> anyhow::Result<AuthResponse>;
}

/// History Service as seen from the client. All calls carry the session
/// token of the owning user.
#[async_trait]
pub trait HistoryApi: Send + Sync {
    async fn fetch(
        &self,
        token: &str,
        user_id: Uuid,
        limit: i64,
    ) -> anyhow::Result<Vec<MoodEntry>>;

    async fn append(
        &self,
        token: &str,
        user_id: Uuid,
        entry: &GuestEntry,
    ) -> anyhow::Result<MoodEntry>;

    async fn import(
        &self,
        token: &str,
        user_id: Uuid,
        entries: &[GuestEntry],
    ) -> anyhow::Result<Vec<MoodEntry>>;
}

/// HTTP client for the Moodify backend. Attempt-once, fixed timeout; a
/// failed request is surfaced to the caller, never retried here.
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Error responses carry `{"error": "..."}` (the 404 fallback uses
/// `"message"`). Extract that text so the embedding UI can show the
/// service's own words in form validation.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!(error_message(status, &body));
    }
    Ok(resp.json().await?)
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn signup(&self, req: SignupRequest) -> anyhow::Result<AuthResponse> {
        let resp = self
            .http
            .post(self.url("/api/auth/signup"))
            .json(&req)
            .send()
            .await?;
        decode(resp).await
    }

    async fn signin(&self, req: SigninRequest) -> anyhow::Result<AuthResponse> {
        let resp = self
            .http
            .post(self.url("/api/auth/signin"))
            .json(&req)
            .send()
            .await?;
        decode(resp).await
    }

    async fn signin_admin(&self, req: SigninRequest) -> anyhow::Result<AuthResponse> {
        let resp = self
            .http
            .post(self.url("/api/auth/signin/admin"))
            .json(&req)
            .send()
            .await?;
        decode(resp).await
    }
}

#[async_trait]
impl HistoryApi for HttpApi {
    async fn fetch(
        &self,
        token: &str,
        user_id: Uuid,
        limit: i64,
    ) -> anyhow::Result<Vec<MoodEntry>> {
        let resp = self
            .http
            .get(self.url(&format!("/api/history/{user_id}")))
            .query(&[("limit", limit)])
            .bearer_auth(token)
            .send()
            .await?;
        decode(resp).await
    }

    async fn append(
        &self,
        token: &str,
        user_id: Uuid,
        entry: &GuestEntry,
    ) -> anyhow::Result<MoodEntry> {
        let body = AppendEntryRequest {
            emotion: Some(entry.emotion),
            timestamp: Some(entry.timestamp),
        };
        let resp = self
            .http
            .post(self.url(&format!("/api/history/{user_id}")))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        decode(resp).await
    }

    async fn import(
        &self,
        token: &str,
        user_id: Uuid,
        entries: &[GuestEntry],
    ) -> anyhow::Result<Vec<MoodEntry>> {
        let body = ImportRequest {
            entries: entries
                .iter()
                .map(|e| ImportEntry {
                    emotion: Some(e.emotion),
                    timestamp: Some(e.timestamp),
                })
                .collect(),
        };
        let resp = self
            .http
            .post(self.url(&format!("/api/history/{user_id}/import")))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let body: ImportResponse = decode(resp).await?;
        Ok(body.inserted)
    }
}
