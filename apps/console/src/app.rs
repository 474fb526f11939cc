use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use astralis_console_log::{LogFacility, NullSink, TracingSink, WriterSink};
use astralis_hub_console_log::{ConsoleChange, ConsoleLogHub, ConsoleSession};
use astralis_protocol::constants::CONSOLE_CATEGORIES;
use astralis_protocol::{Counts, LogEntry, Severity};
use serde::Serialize;

use crate::config::{Config, OutputFormat, SinkKind};
use crate::script::Command;

/// Outcome of one replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub visible: usize,
    pub total: usize,
    pub counts: Counts,
    /// Id of the error entry that stopped the replay, if error pause fired.
    pub paused_at: Option<u64>,
}

/// Replay `commands` through a fresh facility and console, then write the
/// visible entries and a status line to `out`.
pub fn run(config: &Config, commands: &[Command], out: &mut impl Write) -> anyhow::Result<Report> {
    // -- Facility --
    let facility = build_facility(config);

    // -- Console --
    let mut hub = ConsoleLogHub::with_categories(
        CONSOLE_CATEGORIES
            .iter()
            .map(|c| c.to_string())
            .chain(config.categories.iter().map(|c| c.name.clone())),
    );
    let filter = config.filter.apply_to(hub.filter().clone());
    hub.set_filter(filter);
    hub.set_error_pause(config.filter.error_pause);

    let paused = Arc::new(AtomicBool::new(false));
    let paused_flag = Arc::clone(&paused);
    hub.set_on_change(Box::new(move |change| {
        if let ConsoleChange::ErrorPaused { .. } = change {
            paused_flag.store(true, Ordering::SeqCst);
        }
    }));

    let mut session = ConsoleSession::attach_hub(&facility, hub);

    // -- Replay --
    let mut paused_at = None;
    for command in commands {
        apply_command(&facility, &session, command);

        if paused.load(Ordering::SeqCst) {
            let id = session.hub().entries().last().map(|e| e.id);
            tracing::info!(id = ?id, "replay paused on error");
            paused_at = id;
            break;
        }
    }
    session.detach();

    // -- Report --
    let hub = session.hub();
    let visible = hub.visible_entries();
    let report = Report {
        visible: visible.len(),
        total: hub.len(),
        counts: hub.counts(),
        paused_at,
    };

    match config.output {
        OutputFormat::Text => write_text(out, &visible, &report)?,
        OutputFormat::Json => write_json(out, &visible, &report)?,
    }
    out.flush()?;

    Ok(report)
}

fn build_facility(config: &Config) -> LogFacility {
    let facility = LogFacility::new().with_config(config.facility_config());
    let facility = match config.sink {
        SinkKind::Tracing => facility.with_sink(TracingSink),
        SinkKind::Stderr => facility.with_sink(WriterSink::stderr()),
        SinkKind::None => facility.with_sink(NullSink),
    };

    for (name, color) in config.extra_categories() {
        if !facility.register_category(name, color) {
            tracing::warn!(category = name, "category already registered, keeping first color");
        }
    }
    facility
}

fn apply_command(facility: &LogFacility, session: &ConsoleSession, command: &Command) {
    match command {
        Command::Emit {
            severity,
            category: Some(category),
            message,
        } => facility.emit(category, message, *severity),
        Command::Emit {
            severity,
            category: None,
            message,
        } => match severity {
            Severity::Info => facility.log_general(message),
            Severity::Warning => facility.warn_general(message),
            Severity::Error => facility.error_general(message),
        },
        Command::Clear => session.hub().clear(),
        Command::Search(text) => session.hub().set_search_text(text),
        Command::SetCategory { category, enabled } => {
            session.hub().set_category_enabled(category, *enabled)
        }
        Command::SetSeverity { severity, enabled } => {
            session.hub().set_severity_enabled(*severity, *enabled)
        }
        Command::SetAllCategories(enabled) => session.hub().set_all_categories_enabled(*enabled),
    }
}

fn write_text(out: &mut impl Write, visible: &[&LogEntry], report: &Report) -> std::io::Result<()> {
    for entry in visible {
        writeln!(
            out,
            "{} [{}] {:<7} {}",
            entry.display_time(),
            entry.category,
            entry.severity.as_str().to_uppercase(),
            entry.display_message()
        )?;
    }
    writeln!(
        out,
        "{}/{} entries | info {} | warning {} | error {}",
        report.visible, report.total, report.counts.info, report.counts.warning, report.counts.error
    )?;
    if let Some(id) = report.paused_at {
        writeln!(out, "paused on error entry #{id}")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    id: u64,
    time: String,
    category: &'a str,
    severity: &'a str,
    message: String,
}

fn write_json(out: &mut impl Write, visible: &[&LogEntry], report: &Report) -> anyhow::Result<()> {
    for entry in visible {
        let row = JsonEntry {
            id: entry.id,
            time: entry.display_time(),
            category: &entry.category,
            severity: entry.severity.as_str(),
            message: entry.display_message(),
        };
        serde_json::to_writer(&mut *out, &row)?;
        writeln!(out)?;
    }
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
