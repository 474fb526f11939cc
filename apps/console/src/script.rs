//! Replay script parsing.
//!
//! One command per line:
//!
//! ```text
//! # comment
//! warning Physics Collision depth high
//! info - General message
//! !search collision
//! !hide Physics
//! !mute info
//! !all-categories off
//! !clear
//! ```

use astralis_protocol::Severity;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown severity: {value}")]
    UnknownSeverity { line: usize, value: String },

    #[error("line {line}: missing category")]
    MissingCategory { line: usize },

    #[error("line {line}: unknown directive: {value}")]
    UnknownDirective { line: usize, value: String },

    #[error("line {line}: directive {directive} needs an argument")]
    MissingArgument { line: usize, directive: String },

    #[error("line {line}: expected on or off, got {value}")]
    InvalidSwitch { line: usize, value: String },
}

/// A single replay step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Emit {
        severity: Severity,
        /// `None` for the `-` token: logged under the general category.
        category: Option<String>,
        message: String,
    },
    Clear,
    Search(String),
    SetCategory { category: String, enabled: bool },
    SetSeverity { severity: Severity, enabled: bool },
    SetAllCategories(bool),
}

/// Parse a whole script. Blank lines and `#` comments are skipped.
pub fn parse(source: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        if let Some(command) = parse_line(index + 1, raw)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Parse one line; `line` is 1-based and only used in errors.
pub fn parse_line(line: usize, raw: &str) -> Result<Option<Command>, ScriptError> {
    let text = raw.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    if let Some(directive) = text.strip_prefix('!') {
        return parse_directive(line, directive).map(Some);
    }

    let (level, rest) = split_word(text);
    let severity = parse_severity(line, level)?;

    let (category, message) = split_word(rest);
    if category.is_empty() {
        return Err(ScriptError::MissingCategory { line });
    }
    let category = (category != "-").then(|| category.to_owned());

    Ok(Some(Command::Emit {
        severity,
        category,
        message: message.to_owned(),
    }))
}

fn parse_directive(line: usize, text: &str) -> Result<Command, ScriptError> {
    let (name, arg) = split_word(text);

    let require = |arg: &str| {
        if arg.is_empty() {
            Err(ScriptError::MissingArgument {
                line,
                directive: name.to_owned(),
            })
        } else {
            Ok(arg.to_owned())
        }
    };

    match name {
        "clear" => Ok(Command::Clear),
        // An empty search is valid and clears the filter.
        "search" => Ok(Command::Search(arg.to_owned())),
        "hide" | "show" => Ok(Command::SetCategory {
            category: require(arg)?,
            enabled: name == "show",
        }),
        "mute" | "unmute" => {
            let level = require(arg)?;
            Ok(Command::SetSeverity {
                severity: parse_severity(line, &level)?,
                enabled: name == "unmute",
            })
        }
        "all-categories" => match arg {
            "on" => Ok(Command::SetAllCategories(true)),
            "off" => Ok(Command::SetAllCategories(false)),
            "" => Err(ScriptError::MissingArgument {
                line,
                directive: name.to_owned(),
            }),
            other => Err(ScriptError::InvalidSwitch {
                line,
                value: other.to_owned(),
            }),
        },
        other => Err(ScriptError::UnknownDirective {
            line,
            value: other.to_owned(),
        }),
    }
}

fn parse_severity(line: usize, value: &str) -> Result<Severity, ScriptError> {
    Severity::from_level(&value.to_lowercase()).ok_or_else(|| ScriptError::UnknownSeverity {
        line,
        value: value.to_owned(),
    })
}

/// Split off the first whitespace-delimited word.
fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}
