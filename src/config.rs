//! Declarative build configuration
//!
//! The input to the compiler: explicit tasks, the two systemd unit-mapping
//! tables, an environment map for the daemon, and an optional nested table
//! carrying the same fields for the per-user level. Loaded from a single
//! JSON file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::BuildError;
use crate::task::TaskSpec;

/// Accept `null` where a whole table may be disabled, treating it as empty
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request to wrap an init-system unit in a control task
///
/// A `null` value in the table disables the entry entirely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ControlSystemd {
    /// Unit runs to completion (oneshot) rather than staying up
    #[serde(default)]
    pub oneshot: bool,
    /// Exit code the control command treats as success
    #[serde(default)]
    pub exit_code: Option<i32>,
}

/// Option set of one configuration level
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelConfig {
    /// Pass --debug to the daemon invocation
    #[serde(default)]
    pub debug: bool,

    /// Environment map handed to the daemon config; omitted from the
    /// emitted config when absent
    #[serde(default)]
    pub environment: Option<BTreeMap<String, String>>,

    /// Explicit task table, passed through to the task directory
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: BTreeMap<String, TaskSpec>,

    /// Unit name → control options; `null` disables the entry
    #[serde(default, deserialize_with = "null_as_default")]
    pub control_systemd: BTreeMap<String, Option<ControlSystemd>>,

    /// Unit name (with suffix) → enabled; `null` or `false` disables
    #[serde(default, deserialize_with = "null_as_default")]
    pub listen_systemd: BTreeMap<String, Option<bool>>,
}

/// Full configuration: system-level fields at the top, user level nested
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub system: LevelConfig,

    /// Per-user level; absent means only the system level is compiled
    #[serde(default)]
    pub user: Option<LevelConfig>,
}

/// True if `name` is accepted by the daemon as a task identifier
pub fn valid_task_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['.', ':', '@'])
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Config, BuildError> {
        let content = std::fs::read_to_string(path).map_err(|e| BuildError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| BuildError::ConfigParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), BuildError> {
        self.system.validate()?;
        if let Some(user) = &self.user {
            user.validate()?;
        }
        Ok(())
    }
}

impl LevelConfig {
    /// Check the identifiers the compiler cannot fix up itself: explicit
    /// task names must already satisfy the daemon's name rules, and unit
    /// names must be non-empty (mangling is total but meaningless on "").
    fn validate(&self) -> Result<(), BuildError> {
        for name in self.tasks.keys() {
            if !valid_task_name(name) {
                return Err(BuildError::InvalidTaskName(name.clone()));
            }
        }
        for unit in self.control_systemd.keys().chain(self.listen_systemd.keys()) {
            if unit.is_empty() {
                return Err(BuildError::InvalidUnitName(unit.clone()));
            }
        }
        Ok(())
    }
}
