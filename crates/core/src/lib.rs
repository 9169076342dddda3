//! Core library for the tracker status reporter.
//!
//! The crate formats read-only snapshots handed over by a playback engine:
//! a live "now playing" panel redrawn on every refresh, and static tables
//! describing a module's instruments, samples, comment and duration. It owns
//! no decoding or scheduling; callers drive every operation synchronously.

pub mod config;
pub mod error;
pub mod field;
pub mod message;
pub mod module;
pub mod panel;
pub mod report;
pub mod rows;

pub use config::{MessageConfig, PanelConfig, StatusConfig};
pub use error::{Result, StatusError};
pub use field::{encode_bounded_hex, HexField};
pub use message::{MessageBuffer, MESSAGE_CAPACITY};
pub use module::{
    Control, Envelopes, FrameInfo, Instrument, LoopMode, ModuleInfo, PlayerMode, Sample,
    Sequence, SubInstrument,
};
pub use panel::{LivePanel, PanelMode, StatusFields};
pub use report::{
    report_comment, report_duration, report_help, report_instruments,
    report_instruments_samples, report_module, report_samples,
};
