//! Call-stack capture for emitted log events.

use std::backtrace::Backtrace;

/// Symbol prefixes of frames that belong to the capture path itself: the
/// backtrace machinery and this crate.
const INTERNAL_PREFIXES: &[&str] = &[
    "std::backtrace",
    "backtrace::",
    concat!(env!("CARGO_CRATE_NAME"), "::"),
];

/// Captures the current call stack, one frame per line.
///
/// Leading frames of the capture path (backtrace internals, the facility's
/// own frames) are dropped along with `extra_skip` further caller frames, so
/// the first line is the emitter's caller.
pub fn capture(extra_skip: usize) -> String {
    let raw = render_frames(&Backtrace::force_capture().to_string());
    let own = leading_internal_frames(&raw);
    trim_stack(&raw, own + extra_skip)
}

/// Number of leading frames that belong to the capture path.
fn leading_internal_frames(frames: &str) -> usize {
    frames
        .lines()
        .take_while(|frame| INTERNAL_PREFIXES.iter().any(|p| frame.starts_with(p)))
        .count()
}

/// Drops the first `skip` non-empty lines of `raw`.
///
/// When `raw` has no more than `skip` lines the text is returned unmodified.
pub fn trim_stack(raw: &str, skip: usize) -> String {
    let lines: Vec<&str> = raw
        .split(['\n', '\r'])
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() > skip {
        lines[skip..].join("\n")
    } else {
        raw.to_owned()
    }
}

/// Collapses `Backtrace` display output into one line per frame.
///
/// The std format puts the symbol on a numbered line (`  3: crate::f`) and the
/// source location on an indented `at file:line` line after it.
fn render_frames(backtrace: &str) -> String {
    let mut frames: Vec<String> = Vec::new();

    for line in backtrace.lines() {
        let trimmed = line.trim();
        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(last) = frames.last_mut() {
                last.push_str(" (");
                last.push_str(location);
                last.push(')');
            }
            continue;
        }
        let symbol = match trimmed.split_once(": ") {
            Some((index, symbol)) if index.chars().all(|c| c.is_ascii_digit()) => symbol,
            _ => continue,
        };
        frames.push(symbol.to_owned());
    }

    frames.join("\n")
}
