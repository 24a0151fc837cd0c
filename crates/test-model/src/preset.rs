use banter_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// The outcome a scripted prompt resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    /// The provider replies with the given text.
    #[serde(rename = "text")]
    Text(String),
    /// The provider fails with the given error kind.
    #[serde(rename = "failure")]
    Failure(ErrorKind),
}

/// A scripted reply for one prompt.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// What the provider should resolve with.
    pub outcome: PresetOutcome,
}

impl PresetReply {
    /// Creates a preset that resolves with the given text.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            outcome: PresetOutcome::Text(text.into()),
        }
    }

    /// Creates a preset that fails with the given error kind.
    #[inline]
    pub fn failure(kind: ErrorKind) -> Self {
        Self {
            outcome: PresetOutcome::Failure(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let preset = PresetReply::text("I have left a message for you.");
        let serialized = serde_json::to_string(&preset).unwrap();
        let deserialized: PresetReply =
            serde_json::from_str(&serialized).unwrap();
        assert_eq!(preset, deserialized);

        let preset = PresetReply::failure(ErrorKind::RateLimitExceeded);
        let serialized = serde_json::to_string(&preset).unwrap();
        let deserialized: PresetReply =
            serde_json::from_str(&serialized).unwrap();
        assert_eq!(preset, deserialized);
    }
}
