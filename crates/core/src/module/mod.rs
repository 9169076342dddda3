//! Read-only views of the playback engine state consumed by the reports and
//! the live panel.
//!
//! All times are in milliseconds. Nothing here is mutated by this crate; the
//! serde derives exist so the command line driver can load a module
//! description from JSON.

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Result, StatusError};

/// Structural metadata of a loaded module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleInfo {
    /// Title exactly as stored in the module file, in whatever encoding the
    /// tracker used.
    #[serde(with = "raw_name")]
    pub name: Vec<u8>,
    pub instruments: Vec<Instrument>,
    pub samples: Vec<Sample>,
    pub comment: Option<String>,
    pub sequences: Vec<Sequence>,
}

impl ModuleInfo {
    /// Parses a JSON module description.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The title for logs and reports, with undecodable bytes replaced.
    pub fn display_name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Duration of the primary sequence, zero when the module declares none.
    pub fn duration(&self) -> u32 {
        self.sequences.first().map_or(0, |seq| seq.duration)
    }

    /// Resolves a zero-based sample id. Instruments may point past the end of
    /// the sample table, in which case `None` is returned.
    pub fn sample(&self, id: usize) -> Option<&Sample> {
        self.samples.get(id)
    }
}

/// Module titles are written as a JSON string when they decode as UTF-8 and
/// as an array of bytes otherwise. Both forms are accepted on input.
mod raw_name {
    use std::borrow::Cow;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum RawName<'a> {
        Text(Cow<'a, str>),
        Bytes(Cow<'a, [u8]>),
    }

    pub fn serialize<S: Serializer>(name: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(name) {
            Ok(text) => RawName::Text(Cow::Borrowed(text)),
            Err(_) => RawName::Bytes(Cow::Borrowed(name)),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(match RawName::deserialize(deserializer)? {
            RawName::Text(text) => text.into_owned().into_bytes(),
            RawName::Bytes(bytes) => bytes.into_owned(),
        })
    }
}

/// A playback path through the module's patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub duration: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instrument {
    pub name: String,
    pub volume: u32,
    /// Fade-out (release) rate.
    pub fade: u32,
    pub envelopes: Envelopes,
    pub subinstruments: Vec<SubInstrument>,
}

impl Instrument {
    /// Unused slots have neither a name nor any sub-instrument.
    pub fn is_unused(&self) -> bool {
        self.name.is_empty() && self.subinstruments.is_empty()
    }
}

/// Which of the instrument envelopes are switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelopes {
    pub amplitude: bool,
    pub filter: bool,
    pub pan: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubInstrument {
    /// Zero-based sample id, not guaranteed to exist.
    pub sample: usize,
    pub global_volume: u32,
    pub volume: u32,
    pub finetune: i32,
    pub transpose: i32,
    /// Raw pan value. Only the low byte is displayed.
    pub pan: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sample {
    pub name: String,
    pub length: u32,
    pub loop_start: u32,
    pub loop_end: u32,
    pub sixteen_bit: bool,
    pub loop_mode: LoopMode,
}

impl Sample {
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn loops(&self) -> bool {
        self.loop_mode != LoopMode::None
    }

    pub fn loops_bidirectional(&self) -> bool {
        self.loop_mode == LoopMode::Bidirectional
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    #[default]
    None,
    Forward,
    Bidirectional,
}

/// Per-refresh snapshot of the player position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInfo {
    pub row: u32,
    pub num_rows: u32,
    /// Frame within the current row. Redraws happen on frame zero.
    pub frame: u32,
    /// Elapsed playback time.
    pub time: u32,
    /// Virtual channels currently rendering.
    pub virt_used: u32,
}

/// Interactive control state owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Control {
    pub pause: bool,
}

/// Compatibility mode the engine was asked to emulate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerMode {
    #[default]
    Auto,
    Mod,
    Noisetracker,
    Protracker,
    S3m,
    St3,
    St3gus,
    Xm,
    Ft2,
    It,
    Itsmp,
}

impl PlayerMode {
    pub const ALL: [PlayerMode; 11] = [
        PlayerMode::Auto,
        PlayerMode::Mod,
        PlayerMode::Noisetracker,
        PlayerMode::Protracker,
        PlayerMode::S3m,
        PlayerMode::St3,
        PlayerMode::St3gus,
        PlayerMode::Xm,
        PlayerMode::Ft2,
        PlayerMode::It,
        PlayerMode::Itsmp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayerMode::Auto => "auto",
            PlayerMode::Mod => "mod",
            PlayerMode::Noisetracker => "noisetracker",
            PlayerMode::Protracker => "protracker",
            PlayerMode::S3m => "s3m",
            PlayerMode::St3 => "st3",
            PlayerMode::St3gus => "st3gus",
            PlayerMode::Xm => "xm",
            PlayerMode::Ft2 => "ft2",
            PlayerMode::It => "it",
            PlayerMode::Itsmp => "itsmp",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PlayerMode::Auto => "Autodetect mode (default)",
            PlayerMode::Mod => "Play as a generic MOD player",
            PlayerMode::Noisetracker => "Play using Noisetracker quirks",
            PlayerMode::Protracker => "Play using Protracker 1/2 quirks",
            PlayerMode::S3m => "Play as a generic S3M player",
            PlayerMode::St3 => "Play using ST3 bug emulation",
            PlayerMode::St3gus => "Play using ST3+GUS quirks",
            PlayerMode::Xm => "Play as a generic XM player",
            PlayerMode::Ft2 => "Play using FT2 bug emulation",
            PlayerMode::It => "Play using IT quirks",
            PlayerMode::Itsmp => "Play using IT sample mode quirks",
        }
    }
}

impl FromStr for PlayerMode {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self> {
        PlayerMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| StatusError::UnknownPlayerMode(s.to_string()))
    }
}

impl fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_partial_description() {
        let module = ModuleInfo::from_json(
            r#"{
                "name": "space debris",
                "samples": [{ "name": "bass", "length": 4096, "loop_mode": "bidirectional" }],
                "sequences": [{ "duration": 61499 }, { "duration": 1000 }]
            }"#,
        )
        .unwrap();

        assert_eq!(module.duration(), 61499);
        assert!(module.comment.is_none());
        let sample = module.sample(0).unwrap();
        assert!(sample.loops() && sample.loops_bidirectional());
        assert!(module.sample(1).is_none());
    }

    #[test]
    fn names_load_from_text_or_bytes() {
        let text = ModuleInfo::from_json(r#"{ "name": "dope" }"#).unwrap();
        assert_eq!(text.name, b"dope");

        let raw = ModuleInfo::from_json(r#"{ "name": [77, 233, 108, 111] }"#).unwrap();
        assert_eq!(raw.name, [77, 233, 108, 111]);
        assert_eq!(raw.display_name(), "M\u{FFFD}lo");

        let round_trip = serde_json::to_string(&raw).unwrap();
        assert_eq!(ModuleInfo::from_json(&round_trip).unwrap(), raw);
    }

    #[test]
    fn missing_sequence_has_zero_duration() {
        assert_eq!(ModuleInfo::default().duration(), 0);
    }

    #[test]
    fn parses_player_modes() {
        assert_eq!("ST3".parse::<PlayerMode>().unwrap(), PlayerMode::St3);
        assert_eq!("itsmp".parse::<PlayerMode>().unwrap(), PlayerMode::Itsmp);

        let err = "amiga".parse::<PlayerMode>().unwrap_err();
        assert!(matches!(err, StatusError::UnknownPlayerMode(name) if name == "amiga"));
    }
}
