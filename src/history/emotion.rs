use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed label set produced by the emotion-inference collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Neutral,
    Surprised,
    Stressed,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Neutral => "neutral",
            Emotion::Surprised => "surprised",
            Emotion::Stressed => "stressed",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "angry" => Ok(Emotion::Angry),
            "neutral" => Ok(Emotion::Neutral),
            "surprised" => Ok(Emotion::Surprised),
            "stressed" => Ok(Emotion::Stressed),
            other => anyhow::bail!("unknown emotion label: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_lowercase() {
        assert_eq!(serde_json::to_string(&Emotion::Happy).unwrap(), r#""happy""#);
        assert_eq!(
            serde_json::from_str::<Emotion>(r#""stressed""#).unwrap(),
            Emotion::Stressed
        );
    }

    #[test]
    fn parse_and_display_roundtrip() {
        for label in ["happy", "sad", "angry", "neutral", "surprised", "stressed"] {
            let e: Emotion = label.parse().unwrap();
            assert_eq!(e.to_string(), label);
        }
    }

    #[test]
    fn rejects_labels_outside_the_vocabulary() {
        assert!("ecstatic".parse::<Emotion>().is_err());
        assert!(serde_json::from_str::<Emotion>(r#""Happy""#).is_err());
    }
}
