use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::InferenceConfig;
use crate::history::emotion::Emotion;

/// Classification result from the video-analysis collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionReading {
    pub emotion: Emotion,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
struct TextInferenceResponse {
    emotion: Emotion,
}

/// External emotion-inference collaborators. The models themselves are black
/// boxes; this trait is the request/response contract the client consumes.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Video-based detection: uploads the clip, gets a label + confidence.
    async fn analyze_video(&self, video: Bytes) -> anyhow::Result<EmotionReading>;

    /// Questionnaire-based detection: free-text answers in, a label from the
    /// fixed vocabulary out.
    async fn classify_answers(&self, answers: &str) -> anyhow::Result<Emotion>;
}

/// HTTP implementation. Every call carries an explicit timeout and is
/// attempt-once; retrying is left to a human pressing the button again.
pub struct HttpInferenceClient {
    http: reqwest::Client,
    video_url: String,
    text_url: String,
}

impl HttpInferenceClient {
    pub fn new(config: &InferenceConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            video_url: config.video_url.clone(),
            text_url: config.text_url.clone(),
        })
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    #[instrument(skip(self, video), fields(bytes = video.len()))]
    async fn analyze_video(&self, video: Bytes) -> anyhow::Result<EmotionReading> {
        let part = reqwest::multipart::Part::bytes(video.to_vec())
            .file_name("capture.mp4")
            .mime_str("video/mp4")?;
        let form = reqwest::multipart::Form::new().part("video", part);

        let resp = self
            .http
            .post(&self.video_url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let reading: EmotionReading = resp.json().await?;
        debug!(emotion = %reading.emotion, confidence = reading.confidence, "video analyzed");
        Ok(reading)
    }

    #[instrument(skip(self, answers))]
    async fn classify_answers(&self, answers: &str) -> anyhow::Result<Emotion> {
        let resp = self
            .http
            .post(&self.text_url)
            .json(&serde_json::json!({ "text": answers }))
            .send()
            .await?
            .error_for_status()?;

        let body: TextInferenceResponse = resp.json().await?;
        debug!(emotion = %body.emotion, "answers classified");
        Ok(body.emotion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_decodes_collaborator_payload() {
        let reading: EmotionReading =
            serde_json::from_str(r#"{"emotion":"happy","confidence":0.92}"#).unwrap();
        assert_eq!(reading.emotion, Emotion::Happy);
        assert!((reading.confidence - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn confidence_defaults_to_zero() {
        let reading: EmotionReading = serde_json::from_str(r#"{"emotion":"sad"}"#).unwrap();
        assert_eq!(reading.emotion, Emotion::Sad);
        assert_eq!(reading.confidence, 0.0);
    }

    #[test]
    fn unknown_label_is_rejected_at_the_boundary() {
        assert!(serde_json::from_str::<EmotionReading>(r#"{"emotion":"bored"}"#).is_err());
    }
}
