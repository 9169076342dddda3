//! Single table rows for the instrument and sample reports.
//!
//! The first sub-instrument row shares its line with the instrument header;
//! continuation rows are indented to sit under it. Every listed instrument
//! produces at least one sub-instrument row, falling back to a dash
//! placeholder, so columns stay aligned whatever the data looks like.

use std::fmt::Write as _;

use crate::module::{Instrument, ModuleInfo, Sample};

pub const INSTRUMENT_HEADER: &str =
    "   Instrument name                  Vl Fade Env Ns Sub  Gv Vl Fine Xpo Pan Sm";
pub const INSTRUMENT_SAMPLE_HEADER: &str =
    "   Instrument name                  Smp  Size  Loop  End    Vol Fine Xpo Pan";
pub const SAMPLE_HEADER: &str =
    "   Sample name                      Length Start  End    Flags";

const NAME_WIDTH: usize = 32;

/// Width of `"NN <name> "`, the indent of sample-centric continuation rows.
pub const INSTRUMENT_SAMPLE_INDENT: usize = 3 + NAME_WIDTH + 1;
/// Width of the instrument-centric header, the indent of its continuation rows.
pub const INSTRUMENT_INDENT: usize = INSTRUMENT_SAMPLE_INDENT + 15;

const INSTRUMENT_PLACEHOLDER: &str = "[  ] -- -- ---- --- --- --";
const INSTRUMENT_SAMPLE_PLACEHOLDER: &str = "[  ] ----- ----- -----  --- ---- --- ---";

/// Instrument-centric rows: envelopes, fade and per-sub-instrument volumes.
///
/// Returns `None` for unused slots. `index` is zero-based and displayed
/// one-based.
pub fn instrument_rows(module: &ModuleInfo, index: usize, ins: &Instrument) -> Option<String> {
    if ins.is_unused() {
        tracing::trace!(index, "skipping unused instrument slot");
        return None;
    }

    let mut out = String::new();
    let _ = write!(
        out,
        "{:02x} {:<w$.w$} {:02x} {:04x} {}{}{} {:02x} ",
        index + 1,
        ins.name,
        ins.volume,
        ins.fade,
        flag(ins.envelopes.amplitude, 'A'),
        flag(ins.envelopes.filter, 'F'),
        flag(ins.envelopes.pan, 'P'),
        ins.subinstruments.len(),
        w = NAME_WIDTH,
    );

    let mut has_sub = false;
    for (j, sub) in ins.subinstruments.iter().enumerate() {
        if j > 0 {
            let playable = module.sample(sub.sample).is_some_and(|smp| !smp.is_empty());
            if !playable {
                tracing::trace!(index, sub = j, sample = sub.sample, "skipping sub-instrument");
                continue;
            }
            out.push_str(&" ".repeat(INSTRUMENT_INDENT));
        }

        has_sub = true;
        let _ = writeln!(
            out,
            "[{:02x}] {:02x} {:02x} {:+04} {:+03} P{:02x} {:02x}",
            j + 1,
            sub.global_volume,
            sub.volume,
            sub.finetune,
            sub.transpose,
            sub.pan & 0xff,
            sub.sample,
        );
    }

    if !has_sub {
        out.push_str(INSTRUMENT_PLACEHOLDER);
        out.push('\n');
    }

    Some(out)
}

/// Sample-centric rows: the sample each sub-instrument plays, with its size,
/// loop points and flags.
///
/// A sub-instrument pointing at a missing sample never gets a row. Empty
/// samples are only dropped from continuation rows.
pub fn instrument_sample_rows(
    module: &ModuleInfo,
    index: usize,
    ins: &Instrument,
) -> Option<String> {
    if ins.is_unused() {
        tracing::trace!(index, "skipping unused instrument slot");
        return None;
    }

    let mut out = String::new();
    let _ = write!(out, "{:02x} {:<w$.w$} ", index + 1, ins.name, w = NAME_WIDTH);

    let mut has_sub = false;
    for (j, sub) in ins.subinstruments.iter().enumerate() {
        let Some(smp) = module.sample(sub.sample) else {
            tracing::debug!(index, sub = j, sample = sub.sample, "reference to missing sample");
            continue;
        };

        if j > 0 && smp.is_empty() {
            continue;
        }
        if has_sub {
            out.push_str(&" ".repeat(INSTRUMENT_SAMPLE_INDENT));
        }

        has_sub = true;
        let _ = writeln!(
            out,
            "[{:02x}] {:05x}{}{:05x} {:05x}{} V{:02x} {:+04} {:+03} P{:02x}",
            sub.sample + 1,
            smp.length,
            if smp.sixteen_bit { '+' } else { ' ' },
            smp.loop_start,
            smp.loop_end,
            loop_marker(smp),
            sub.volume,
            sub.finetune,
            sub.transpose,
            sub.pan & 0xff,
        );
    }

    if !has_sub {
        out.push_str(INSTRUMENT_SAMPLE_PLACEHOLDER);
        out.push('\n');
    }

    Some(out)
}

/// Raw sample slot row, `None` for slots with neither name nor data.
pub fn sample_row(index: usize, smp: &Sample) -> Option<String> {
    if smp.name.is_empty() && smp.is_empty() {
        return None;
    }

    Some(format!(
        "{:02x} {:<w$.w$} {:06x} {:06x} {:06x} {} {} {}\n",
        index + 1,
        smp.name,
        smp.length,
        smp.loop_start,
        smp.loop_end,
        if smp.sixteen_bit { "16" } else { "--" },
        if smp.loops() { "L" } else { "-" },
        if smp.loops_bidirectional() { "B" } else { "-" },
        w = NAME_WIDTH,
    ))
}

fn flag(on: bool, glyph: char) -> char {
    if on {
        glyph
    } else {
        '-'
    }
}

fn loop_marker(smp: &Sample) -> char {
    match (smp.loops(), smp.loops_bidirectional()) {
        (true, true) => 'B',
        (true, false) => 'L',
        _ => ' ',
    }
}
