//! The "now playing" box redrawn in place on every refresh.
//!
//! ```text
//! ╔════════════════════════╗
//! ║♦ ~ chiptune upbeat ~~ ♧║
//! ║♦ ~~~ Space Debris ~~~ ♧║
//! ║♫ ▰▰▰▰▰▱▱▱▱▱▱▱▱▱▱▱▱▱▱▱ ♫║
//! ╚════════════════════════╝
//! ```
//!
//! Each redraw moves the cursor up over the previous box, clears it and
//! prints the five lines again, leaving the cursor on the bottom border.

use std::io::Write;

use crossterm::{cursor, queue, terminal};
use unicode_width::UnicodeWidthStr;

use crate::{
    config::PanelConfig,
    field::{encode_bounded_hex, HexField},
    module::{Control, FrameInfo, ModuleInfo},
    Result, StatusError,
};

/// Field the tagline and the title are centered in.
pub const TITLE_WIDTH: usize = 18;
/// Cells in the progress bar.
pub const PROGRESS_CELLS: u32 = 20;
/// Length of one animation tick in milliseconds.
pub const TICK_MS: u32 = 100;
/// Ticks between two dancer swaps.
pub const DANCER_PERIOD: u32 = 8;

const INNER_WIDTH: usize = TITLE_WIDTH + 6;
const CLEARED_LINES: u16 = 4;

/// Whether the animated glyphs are drawn or replaced by the pause glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    Active,
    Paused,
}

impl From<&Control> for PanelMode {
    fn from(control: &Control) -> Self {
        if control.pause {
            PanelMode::Paused
        } else {
            PanelMode::Active
        }
    }
}

/// Position counters encoded for extended layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFields {
    pub row: HexField,
    pub last_row: HexField,
    pub channels: HexField,
    pub max_channels: HexField,
}

/// Live panel renderer. Owns the running maximum of virtual channels seen
/// since the last [`LivePanel::reset`].
#[derive(Debug, Clone, Default)]
pub struct LivePanel {
    config: PanelConfig,
    max_channels: u32,
}

impl LivePanel {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            max_channels: 0,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Forgets the running channel maximum. Call at track boundaries.
    pub fn reset(&mut self) {
        self.max_channels = 0;
    }

    pub fn max_channels(&self) -> u32 {
        self.max_channels
    }

    /// Folds the frame's active channel count into the running maximum.
    pub fn observe(&mut self, frame: &FrameInfo) {
        if frame.virt_used > self.max_channels {
            tracing::debug!(
                previous = self.max_channels,
                current = frame.virt_used,
                "raising channel maximum"
            );
            self.max_channels = frame.virt_used;
        }
    }

    pub fn status_fields(&self, frame: &FrameInfo) -> StatusFields {
        StatusFields {
            row: encode_bounded_hex(frame.row),
            last_row: encode_bounded_hex(frame.num_rows.saturating_sub(1)),
            channels: encode_bounded_hex(frame.virt_used),
            max_channels: encode_bounded_hex(self.max_channels),
        }
    }

    /// Builds the five panel lines, top border first, without any terminal
    /// control sequences.
    pub fn compose(
        &self,
        module: &ModuleInfo,
        frame: &FrameInfo,
        control: &Control,
    ) -> Result<[String; 5]> {
        let fill = progress_cells(frame.time, module.duration())?;
        let config = &self.config;

        let (dancer_l, dancer_r, note) = match PanelMode::from(control) {
            PanelMode::Paused => (config.pause, config.pause, config.pause),
            PanelMode::Active if dancer_phase(frame.time) => {
                (config.dancer_a, config.dancer_b, config.note)
            }
            PanelMode::Active => (config.dancer_b, config.dancer_a, config.note),
        };

        let title = decode_title(&module.name);
        let border = "\u{2550}".repeat(INNER_WIDTH);
        let filled = config.filled.to_string().repeat(fill as usize);
        let empty = config
            .empty
            .to_string()
            .repeat((PROGRESS_CELLS - fill) as usize);

        Ok([
            format!("\u{2554}{border}\u{2557}"),
            self.centered_line(&config.tagline, dancer_l, dancer_r),
            self.centered_line(&title, dancer_l, dancer_r),
            format!("\u{2551}{note} {filled}{empty} {note}\u{2551}"),
            format!("\u{255A}{border}\u{255D}"),
        ])
    }

    /// Redraws the panel over the previous one and flushes `out`.
    ///
    /// Outside of `force`, only the first frame of a row triggers a redraw.
    /// Returns whether anything was written. Nothing is written when the
    /// frame cannot be composed.
    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        module: &ModuleInfo,
        frame: &FrameInfo,
        control: &Control,
        force: bool,
    ) -> Result<bool> {
        self.observe(frame);

        if !force && frame.frame != 0 {
            return Ok(false);
        }

        let fields = self.status_fields(frame);
        tracing::trace!(
            row = %fields.row,
            last_row = %fields.last_row,
            channels = %fields.channels,
            max_channels = %fields.max_channels,
            "redrawing panel"
        );

        let lines = self.compose(module, frame, control)?;

        let mut buf = Vec::new();
        for _ in 0..CLEARED_LINES {
            queue!(
                buf,
                cursor::MoveUp(1),
                terminal::Clear(terminal::ClearType::CurrentLine)
            )?;
        }
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            write!(buf, "\r{line}")?;
            if i != last {
                buf.push(b'\n');
            }
        }

        out.write_all(&buf)?;
        out.flush()?;
        Ok(true)
    }

    fn centered_line(&self, text: &str, dancer_l: char, dancer_r: char) -> String {
        let (left, right) = center(text.width(), TITLE_WIDTH);
        let pad = self.config.pad.to_string();
        format!(
            "\u{2551}{dancer_l} {} {text} {} {dancer_r}\u{2551}",
            pad.repeat(left),
            pad.repeat(right),
        )
    }
}

/// Left and right padding that center `width` columns in `field` columns.
/// An odd remainder goes to the right.
pub fn center(width: usize, field: usize) -> (usize, usize) {
    let spare = field.saturating_sub(width);
    let left = spare / 2;
    (left, spare - left)
}

/// Number of filled progress cells for `elapsed` out of `duration`.
///
/// Elapsed time past the end (looping modules) fills the whole bar.
pub fn progress_cells(elapsed: u32, duration: u32) -> Result<u32> {
    if duration == 0 {
        return Err(StatusError::ZeroDuration { elapsed });
    }

    let fill = u64::from(PROGRESS_CELLS) * u64::from(elapsed) / u64::from(duration);
    Ok(fill.min(u64::from(PROGRESS_CELLS)) as u32)
}

/// Decodes a raw module name for display, replacing invalid sequences and
/// keeping at most [`TITLE_WIDTH`] characters.
pub fn decode_title(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .take(TITLE_WIDTH)
        .collect()
}

fn dancer_phase(time: u32) -> bool {
    (time / TICK_MS / DANCER_PERIOD) % 2 == 0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn centering_fills_the_field(width in 0usize..=TITLE_WIDTH) {
            let (left, right) = center(width, TITLE_WIDTH);
            prop_assert_eq!(left + width + right, TITLE_WIDTH);
            prop_assert!(right == left || right == left + 1);
        }

        #[test]
        fn fill_never_exceeds_cells(elapsed in any::<u32>(), duration in 1u32..) {
            prop_assert!(progress_cells(elapsed, duration).unwrap() <= PROGRESS_CELLS);
        }
    }
}
