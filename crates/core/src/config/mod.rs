use serde::{Deserialize, Serialize};

/// Top-level configuration structure for the status subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub panel: PanelConfig,
    pub message: MessageConfig,
}

impl StatusConfig {
    /// Parses a JSON configuration. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Glyph set and decoration used by the live panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Text centered on the animation line between the dancers.
    pub tagline: String,
    pub dancer_a: char,
    pub dancer_b: char,
    /// Cap placed on both ends of the progress bar.
    pub note: char,
    /// Replaces both dancers and both progress caps while paused.
    pub pause: char,
    pub filled: char,
    pub empty: char,
    /// Filler used to center the tagline and the title.
    pub pad: char,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            tagline: "chiptune upbeat".to_string(),
            dancer_a: '\u{2666}',
            dancer_b: '\u{2667}',
            note: '\u{266B}',
            pause: '-',
            filled: '\u{EE5F}',
            empty: '\u{EE0C}',
            pad: '~',
        }
    }
}

/// Configuration specific to the transient message slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Countdown assigned to every freshly posted message.
    pub initial_countdown: u32,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            initial_countdown: 300_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            StatusConfig::from_json(r#"{ "panel": { "tagline": "acid jungle" } }"#).unwrap();

        assert_eq!(config.panel.tagline, "acid jungle");
        assert_eq!(config.panel.pause, '-');
        assert_eq!(config.message.initial_countdown, 300_000);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(StatusConfig::from_json("{ panel").is_err());
    }
}
