//! Line-oriented command scripts driving a [`GlobalEvents`] host.
//!
//! ```text
//! # comments and blank lines are skipped
//! trigger ws:incomingMessage | {"author": "Roman"} "second argument"
//! trigger chat -> 5
//! off chat
//! off-port chat -> 5
//! off-all-ports chat
//! ```

use relay_events::{EventSpec, Evented, GlobalEvents, NotifierError};
use serde_json::{Deserializer, Value};
use std::borrow::Cow;
use std::str::FromStr;
use tracing::debug;

/// Separates a trigger's spec from its JSON arguments.
pub const ARGS_SEPARATOR: char = '|';

#[relay_derive::relay_error]
pub enum ScriptError {
    #[error("Syntax error{}: {message}", format_context(context))]
    Syntax { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid JSON argument{}: {source}", format_context(context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Command failed{}: {source}", format_context(context))]
    Notifier { source: NotifierError, context: Option<Cow<'static, str>> },
}

/// One script instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Trigger { spec: EventSpec, args: Vec<Value> },
    Off(EventSpec),
    OffPort(EventSpec),
    OffAllPorts(EventSpec),
}

impl Command {
    /// Parses a single line. Blank lines and `#` comments yield `None`.
    ///
    /// # Errors
    /// Returns [`ScriptError::Syntax`] for unknown commands or a missing spec,
    /// and [`ScriptError::Json`] for malformed trigger arguments.
    pub fn parse_line(line: &str) -> Result<Option<Self>, ScriptError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let command = match keyword {
            "trigger" => {
                let (spec, args) = rest.split_once(ARGS_SEPARATOR).unwrap_or((rest, ""));
                Self::Trigger { spec: required_spec(keyword, spec)?, args: parse_args(args)? }
            },
            "off" => Self::Off(required_spec(keyword, rest)?),
            "off-port" => Self::OffPort(required_spec(keyword, rest)?),
            "off-all-ports" => Self::OffAllPorts(required_spec(keyword, rest)?),
            other => {
                return Err(ScriptError::Syntax {
                    message: format!("unknown command `{other}`").into(),
                    context: None,
                });
            },
        };
        Ok(Some(command))
    }

    /// Applies the command to `events`.
    ///
    /// # Errors
    /// Returns [`ScriptError::Notifier`] when a listener fails.
    pub fn apply(&self, events: &GlobalEvents) -> Result<(), ScriptError> {
        match self {
            Self::Trigger { spec, args } => {
                events.trigger(spec, args)?;
            },
            Self::Off(spec) => {
                events.off(spec, None)?;
            },
            Self::OffPort(spec) => {
                events.off_port(spec, None);
            },
            Self::OffAllPorts(spec) => {
                events.off_all_ports(spec);
            },
        }
        Ok(())
    }
}

fn required_spec(keyword: &str, raw: &str) -> Result<EventSpec, ScriptError> {
    if raw.trim().is_empty() {
        return Err(ScriptError::Syntax {
            message: format!("`{keyword}` needs an event").into(),
            context: None,
        });
    }
    Ok(EventSpec::parse(raw))
}

fn parse_args(raw: &str) -> Result<Vec<Value>, ScriptError> {
    Deserializer::from_str(raw)
        .into_iter::<Value>()
        .collect::<Result<Vec<_>, serde_json::Error>>()
        .context("trigger arguments")
}

/// A parsed script, keeping the source line of every command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    commands: Vec<(usize, Command)>,
}

impl Script {
    /// Parses a whole script.
    ///
    /// # Errors
    /// Returns the first line's error, with its 1-based line number as context.
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut commands = Vec::new();
        for (index, line) in source.lines().enumerate() {
            let number = index + 1;
            if let Some(command) =
                Command::parse_line(line).context(format!("line {number}"))?
            {
                commands.push((number, command));
            }
        }
        Ok(Self { commands })
    }

    #[must_use]
    pub fn commands(&self) -> &[(usize, Command)] {
        &self.commands
    }

    /// Runs every command in order, stopping at the first failure.
    ///
    /// # Errors
    /// Returns the failing command's error, with its line number as context.
    pub fn run(&self, events: &GlobalEvents) -> Result<(), ScriptError> {
        for (number, command) in &self.commands {
            debug!(line = number, ?command, "Running command");
            command.apply(events).context(format!("line {number}"))?;
        }
        Ok(())
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
