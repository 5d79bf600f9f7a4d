use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::auth::dto::{AuthResponse, SigninRequest, SignupRequest};
use crate::client::api::{AuthApi, HistoryApi};
use crate::client::store::{GuestEntry, LocalState, SessionStore};
use crate::history::emotion::Emotion;
use crate::inference::{EmotionReading, InferenceClient};

/// Reconciles local, pre-authentication state with the server at the moment
/// of sign-up or sign-in.
///
/// The split is deliberate: sign-up is the one-time chance to upload the
/// guest log; sign-in belongs to a returning user whose authoritative
/// history already lives server-side, so the local cache is replaced, not
/// merged.
pub struct SessionManager<P: SessionStore, E: SessionStore = P> {
    local: LocalState<P, E>,
    auth: Arc<dyn AuthApi>,
    history: Arc<dyn HistoryApi>,
    inference: Arc<dyn InferenceClient>,
}

impl<P: SessionStore, E: SessionStore> SessionManager<P, E> {
    /// `store` persists across browser sessions; `session` is scoped to one
    /// and carries only the guest-session flag.
    pub fn new(
        store: P,
        session: E,
        auth: Arc<dyn AuthApi>,
        history: Arc<dyn HistoryApi>,
        inference: Arc<dyn InferenceClient>,
    ) -> Self {
        Self {
            local: LocalState::new(store, session),
            auth,
            history,
            inference,
        }
    }

    pub fn local(&self) -> &LocalState<P, E> {
        &self.local
    }

    /// Call once at client startup, before any mood is tracked.
    pub fn start_guest_session(&mut self) {
        self.local.init_guest_session();
    }

    pub fn session(&self) -> Option<AuthResponse> {
        self.local.load_session()
    }

    /// Sign-up merges guest state upward: any non-empty guest log is
    /// imported into the new account, then cleared so a later sign-up in the
    /// same browser cannot import it twice.
    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> anyhow::Result<AuthResponse> {
        let session = self
            .auth
            .signup(SignupRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let guest = self.local.guest_history();
        if !guest.is_empty() {
            match self
                .history
                .import(&session.token, session.user.id, &guest)
                .await
            {
                Ok(inserted) => {
                    info!(count = inserted.len(), "guest history imported at signup");
                    self.local.clear_guest_history();
                }
                Err(e) => {
                    // The account exists either way; the guest log stays put
                    // for a manual retry.
                    warn!(error = %e, "guest history import failed");
                }
            }
        }

        self.local.save_session(&session);
        Ok(session)
    }

    /// Sign-in favors server state: the local cache is discarded and
    /// replaced with whatever the server returns.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> anyhow::Result<AuthResponse> {
        let session = self
            .auth
            .signin(SigninRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.replace_cache_from_server(&session).await;
        self.local.save_session(&session);
        Ok(session)
    }

    pub async fn sign_in_admin(
        &mut self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<AuthResponse> {
        let session = self
            .auth
            .signin_admin(SigninRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.replace_cache_from_server(&session).await;
        self.local.save_session(&session);
        Ok(session)
    }

    async fn replace_cache_from_server(&mut self, session: &AuthResponse) {
        self.local.clear_user_history();
        match self
            .history
            .fetch(&session.token, session.user.id, 10)
            .await
        {
            Ok(entries) => self.local.set_user_history(&entries),
            Err(e) => warn!(error = %e, "could not warm history cache at signin"),
        }
    }

    pub fn sign_out(&mut self) {
        self.local.clear_session();
        self.local.clear_user_history();
    }

    /// Record one observed mood. Authenticated sessions write server-side,
    /// falling back to the guest log when the request fails; guests write
    /// locally only.
    pub async fn track_mood(&mut self, emotion: Emotion) -> anyhow::Result<()> {
        let entry = GuestEntry::now(emotion);

        if let Some(session) = self.local.load_session() {
            match self
                .history
                .append(&session.token, session.user.id, &entry)
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) => {
                    warn!(error = %e, "server append failed, falling back to guest log");
                    self.local.push_guest(entry);
                    return Ok(());
                }
            }
        }

        self.local.push_guest(entry);
        Ok(())
    }

    /// Video path: collaborator classifies the clip, the result is tracked.
    pub async fn detect_from_video(&mut self, video: Bytes) -> anyhow::Result<EmotionReading> {
        let reading = self.inference.analyze_video(video).await?;
        self.track_mood(reading.emotion).await?;
        Ok(reading)
    }

    /// Questionnaire path: free-text answers in, tracked label out.
    pub async fn detect_from_answers(&mut self, answers: &str) -> anyhow::Result<Emotion> {
        let emotion = self.inference.classify_answers(answers).await?;
        self.track_mood(emotion).await?;
        Ok(emotion)
    }
}
