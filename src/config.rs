use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Endpoints of the external emotion-inference collaborators.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    pub video_url: String,
    pub text_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub inference: InferenceConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "moodify".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "moodify-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let inference = InferenceConfig {
            video_url: std::env::var("INFERENCE_VIDEO_URL")
                .unwrap_or_else(|_| "http://localhost:5000/analyze".into()),
            text_url: std::env::var("INFERENCE_TEXT_URL")
                .unwrap_or_else(|_| "http://localhost:5001/detect_emotion".into()),
            timeout_secs: std::env::var("INFERENCE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };
        Ok(Self {
            database_url,
            jwt,
            inference,
        })
    }
}
