//! Static reports about a loaded module, written line by line to any
//! [`std::io::Write`] sink.

use std::io::Write;

use crate::{
    module::{ModuleInfo, PlayerMode},
    rows, Result,
};

const KEYS_SUMMARY: &str = "\
COMMAND KEYS SUMMARY
     Space      Pause/unpause
    q, Esc      Stop module and quit the player
    f, Right    Advance to next order
    b, Left     Return to previous order
    n, Up       Advance to next module
    p, Down     Return to previous module
      m         Display module information
      c         Display comment, if any
";

/// Formats a duration in milliseconds as `<m>min<ss>s`, rounded to the
/// nearest second.
pub fn report_duration(total_time: u32) -> String {
    let rounded = u64::from(total_time) + 500;
    format!("{}min{:02}s", rounded / 60_000, (rounded / 1000) % 60)
}

/// Writes the interactive key bindings.
pub fn report_help<W: Write>(out: &mut W) -> Result<()> {
    out.write_all(KEYS_SUMMARY.as_bytes())?;
    Ok(())
}

/// Writes the playback mode (when forced) and the primary sequence duration.
pub fn report_module<W: Write>(out: &mut W, module: &ModuleInfo, mode: PlayerMode) -> Result<()> {
    if mode != PlayerMode::Auto {
        write!(out, " [play as:{}]", mode.description())?;
    }
    writeln!(out, "Duration     : {}", report_duration(module.duration()))?;
    Ok(())
}

/// Writes the instrument-centric table.
pub fn report_instruments<W: Write>(out: &mut W, module: &ModuleInfo) -> Result<()> {
    writeln!(out, "Instruments:")?;
    writeln!(out, "{}", rows::INSTRUMENT_HEADER)?;
    for (i, ins) in module.instruments.iter().enumerate() {
        if let Some(text) = rows::instrument_rows(module, i, ins) {
            out.write_all(text.as_bytes())?;
        }
    }
    Ok(())
}

/// Writes the instrument table keyed by the samples each instrument plays.
pub fn report_instruments_samples<W: Write>(out: &mut W, module: &ModuleInfo) -> Result<()> {
    writeln!(out, "Instruments and samples:")?;
    writeln!(out, "{}", rows::INSTRUMENT_SAMPLE_HEADER)?;
    for (i, ins) in module.instruments.iter().enumerate() {
        if let Some(text) = rows::instrument_sample_rows(module, i, ins) {
            out.write_all(text.as_bytes())?;
        }
    }
    Ok(())
}

/// Writes every raw sample slot, referenced or not.
pub fn report_samples<W: Write>(out: &mut W, module: &ModuleInfo) -> Result<()> {
    writeln!(out, "Samples:")?;
    writeln!(out, "{}", rows::SAMPLE_HEADER)?;
    for (i, smp) in module.samples.iter().enumerate() {
        if let Some(text) = rows::sample_row(i, smp) {
            out.write_all(text.as_bytes())?;
        }
    }
    Ok(())
}

/// Writes the module comment quoted with `> `, followed by a blank line.
pub fn report_comment<W: Write>(out: &mut W, module: &ModuleInfo) -> Result<()> {
    let Some(comment) = module.comment.as_deref() else {
        writeln!(out, "No comment.")?;
        return Ok(());
    };

    // Embedded NULs terminate the text.
    let text = comment.split('\0').next().unwrap_or_default();
    for line in text.split_inclusive('\n') {
        write!(out, "> {line}")?;
    }
    out.write_all(b"\n\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{Instrument, Sample, Sequence, SubInstrument};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn with_comment(comment: Option<&str>) -> ModuleInfo {
        ModuleInfo {
            comment: comment.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn duration_rounds_to_nearest_second() {
        assert_eq!(report_duration(61499), "1min01s");
        assert_eq!(report_duration(59500), "1min00s");
        assert_eq!(report_duration(59499), "0min59s");
        assert_eq!(report_duration(0), "0min00s");
        assert_eq!(report_duration(3_599_600), "60min00s");
    }

    #[test]
    fn module_line_mentions_forced_mode() {
        let module = ModuleInfo {
            sequences: vec![Sequence { duration: 61499 }],
            ..Default::default()
        };

        let auto = render(|out| report_module(out, &module, PlayerMode::Auto));
        assert_eq!(auto, "Duration     : 1min01s\n");

        let forced = render(|out| report_module(out, &module, PlayerMode::Ft2));
        assert_eq!(
            forced,
            " [play as:Play using FT2 bug emulation]Duration     : 1min01s\n"
        );
    }

    #[test]
    fn missing_comment() {
        assert_eq!(
            render(|out| report_comment(out, &with_comment(None))),
            "No comment.\n"
        );
    }

    #[test]
    fn comment_lines_are_quoted() {
        let text = render(|out| report_comment(out, &with_comment(Some("hello\nworld"))));
        assert_eq!(text, "> hello\n> world\n\n");

        let text = render(|out| report_comment(out, &with_comment(Some("one\n\nthree\n"))));
        assert_eq!(text, "> one\n> \n> three\n\n\n");
    }

    #[test]
    fn comment_stops_at_nul() {
        let text = render(|out| report_comment(out, &with_comment(Some("kept\0dropped"))));
        assert_eq!(text, "> kept\n\n");

        let text = render(|out| report_comment(out, &with_comment(Some(""))));
        assert_eq!(text, "\n\n");
    }

    #[test]
    fn instrument_reports_skip_unused_slots() {
        let module = ModuleInfo {
            instruments: vec![
                Instrument::default(),
                Instrument {
                    name: "bass".to_string(),
                    subinstruments: vec![SubInstrument {
                        sample: 3,
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ],
            samples: vec![Sample {
                name: "bass".to_string(),
                length: 16,
                ..Default::default()
            }],
            ..Default::default()
        };

        let table = render(|out| report_instruments(out, &module));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Instruments:");
        assert_eq!(lines[1], rows::INSTRUMENT_HEADER);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("02 bass"));

        let table = render(|out| report_instruments_samples(out, &module));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("02 bass"));
        assert!(lines[2].ends_with("[  ] ----- ----- -----  --- ---- --- ---"));
    }

    #[test]
    fn sample_report_lists_unreferenced_slots() {
        let module = ModuleInfo {
            samples: vec![
                Sample {
                    name: "orphan".to_string(),
                    ..Default::default()
                },
                Sample::default(),
                Sample {
                    length: 0x40,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let table = render(|out| report_samples(out, &module));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("01 orphan"));
        assert!(lines[3].starts_with("03 "));
    }

    #[test]
    fn help_lists_pause_key() {
        let text = render(|out| report_help(out));
        assert!(text.starts_with("COMMAND KEYS SUMMARY\n"));
        assert!(text.contains("Pause/unpause"));
    }
}
