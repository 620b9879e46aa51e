//! Task specification model
//!
//! Mirrors the slice of the daemon's task schema this compiler populates:
//! the task kind tag and the command line for process-backed kinds. Explicit
//! tasks from the configuration may carry further daemon fields; those are
//! preserved verbatim through the flattened extra maps, so the kind and
//! command shape are checked at parse time while everything else passes
//! through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Command block of a short/long task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Argv of the supervised process
    pub line: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Command {
    pub fn new(line: Vec<String>) -> Self {
        Self {
            line,
            extra: Map::new(),
        }
    }
}

/// A task the daemon supervises
///
/// `empty` tasks carry no process and act as dependency/status markers.
/// `short` tasks run to completion, `long` tasks run indefinitely; what the
/// daemon does with them is its own concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskSpec {
    Empty {
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Short {
        command: Command,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Long {
        command: Command,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl TaskSpec {
    pub fn empty() -> Self {
        TaskSpec::Empty { extra: Map::new() }
    }

    pub fn short(line: Vec<String>) -> Self {
        TaskSpec::Short {
            command: Command::new(line),
            extra: Map::new(),
        }
    }

    pub fn long(line: Vec<String>) -> Self {
        TaskSpec::Long {
            command: Command::new(line),
            extra: Map::new(),
        }
    }

    /// Kind tag as it appears in the emitted JSON
    pub fn kind(&self) -> &'static str {
        match self {
            TaskSpec::Empty { .. } => "empty",
            TaskSpec::Short { .. } => "short",
            TaskSpec::Long { .. } => "long",
        }
    }

    /// Command block, present for short/long only
    pub fn command(&self) -> Option<&Command> {
        match self {
            TaskSpec::Empty { .. } => None,
            TaskSpec::Short { command, .. } | TaskSpec::Long { command, .. } => Some(command),
        }
    }
}
