//! Task set synthesis
//!
//! Builds one level's final task set from three sources: the explicit task
//! table, enabled listen mappings (passive marker tasks), and enabled
//! control mappings (tasks wrapping the external unit-control command).
//! Sources merge in that order; a name produced twice is a hard error
//! naming both origins, never a silent override.

use std::collections::BTreeMap;

use crate::config::{ControlSystemd, LevelConfig};
use crate::error::BuildError;
use crate::task::TaskSpec;

use super::mangle::mangle_unit_name;

/// Enabled entries of the listen table, in table order
pub fn enabled_listen_units(config: &LevelConfig) -> impl Iterator<Item = &str> {
    config
        .listen_systemd
        .iter()
        .filter(|(_, enabled)| matches!(enabled, Some(true)))
        .map(|(unit, _)| unit.as_str())
}

/// Enabled entries of the control table, in table order
pub fn enabled_control_units(
    config: &LevelConfig,
) -> impl Iterator<Item = (&str, &ControlSystemd)> {
    config
        .control_systemd
        .iter()
        .filter_map(|(unit, ctl)| ctl.as_ref().map(|c| (unit.as_str(), c)))
}

/// Where a task definition came from, for collision diagnostics
#[derive(Debug, Clone)]
enum TaskSource {
    Explicit,
    Listen(String),
    Control(String),
}

impl std::fmt::Display for TaskSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskSource::Explicit => write!(f, "the explicit task table"),
            TaskSource::Listen(unit) => write!(f, "listen mapping '{}'", unit),
            TaskSource::Control(unit) => write!(f, "control mapping '{}'", unit),
        }
    }
}

/// Command argv for a control task
fn control_command(control_bin: &str, ctl: &ControlSystemd) -> Vec<String> {
    let mut line = vec![control_bin.to_string()];
    if ctl.oneshot {
        line.push("--oneshot".to_string());
    }
    if let Some(code) = ctl.exit_code {
        line.push("--exit-code".to_string());
        line.push(code.to_string());
    }
    line
}

fn insert_unique(
    tasks: &mut BTreeMap<String, (TaskSpec, TaskSource)>,
    name: String,
    spec: TaskSpec,
    source: TaskSource,
) -> Result<(), BuildError> {
    if let Some((_, first)) = tasks.get(&name) {
        return Err(BuildError::TaskCollision {
            name,
            first: first.to_string(),
            second: source.to_string(),
        });
    }
    tasks.insert(name, (spec, source));
    Ok(())
}

/// Compute the final task set for one level
pub fn synthesize_tasks(
    config: &LevelConfig,
    control_bin: &str,
) -> Result<BTreeMap<String, TaskSpec>, BuildError> {
    let mut tasks: BTreeMap<String, (TaskSpec, TaskSource)> = BTreeMap::new();

    for (name, spec) in &config.tasks {
        insert_unique(&mut tasks, name.clone(), spec.clone(), TaskSource::Explicit)?;
    }

    for unit in enabled_listen_units(config) {
        insert_unique(
            &mut tasks,
            mangle_unit_name(unit),
            TaskSpec::empty(),
            TaskSource::Listen(unit.to_string()),
        )?;
    }

    for (unit, ctl) in enabled_control_units(config) {
        let line = control_command(control_bin, ctl);
        let spec = if ctl.oneshot {
            TaskSpec::short(line)
        } else {
            TaskSpec::long(line)
        };
        insert_unique(
            &mut tasks,
            mangle_unit_name(unit),
            spec,
            TaskSource::Control(unit.to_string()),
        )?;
    }

    log::debug!("synthesized {} tasks", tasks.len());
    Ok(tasks.into_iter().map(|(k, (spec, _))| (k, spec)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROL_BIN: &str = "/run/current-system/sw/bin/puteron-control-systemd";

    fn config(json: serde_json::Value) -> LevelConfig {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_filter_discards_disabled_and_absent() {
        let config = config(serde_json::json!({
            "listen_systemd": {"a.service": true, "b.service": false, "c.service": null},
            "control_systemd": {"d.service": {"oneshot": true}, "e.service": null},
        }));
        let listen: Vec<&str> = enabled_listen_units(&config).collect();
        assert_eq!(listen, vec!["a.service"]);
        let control: Vec<&str> = enabled_control_units(&config).map(|(u, _)| u).collect();
        assert_eq!(control, vec!["d.service"]);
    }

    #[test]
    fn test_empty_tables_yield_empty_task_set() {
        let tasks = synthesize_tasks(&LevelConfig::default(), CONTROL_BIN).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_listen_mapping_becomes_empty_task() {
        let config = config(serde_json::json!({
            "listen_systemd": {"db.service": true},
        }));
        let tasks = synthesize_tasks(&config, CONTROL_BIN).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks["systemd-db-service"].kind(), "empty");
    }

    #[test]
    fn test_control_oneshot_without_exit_code() {
        let config = config(serde_json::json!({
            "control_systemd": {"setup.service": {"oneshot": true}},
        }));
        let tasks = synthesize_tasks(&config, CONTROL_BIN).unwrap();
        let task = &tasks["systemd-setup-service"];
        assert_eq!(task.kind(), "short");
        let line = &task.command().unwrap().line;
        assert_eq!(line.last().unwrap(), "--oneshot");
        assert!(!line.iter().any(|a| a == "--exit-code"));
    }

    #[test]
    fn test_control_long_with_exit_code() {
        let config = config(serde_json::json!({
            "control_systemd": {"worker.service": {"oneshot": false, "exit_code": 7}},
        }));
        let tasks = synthesize_tasks(&config, CONTROL_BIN).unwrap();
        let task = &tasks["systemd-worker-service"];
        assert_eq!(task.kind(), "long");
        let line = &task.command().unwrap().line;
        assert!(!line.iter().any(|a| a == "--oneshot"));
        let pos = line.iter().position(|a| a == "--exit-code").unwrap();
        assert_eq!(line[pos + 1], "7");
    }

    #[test]
    fn test_control_long_without_flags() {
        let config = config(serde_json::json!({
            "control_systemd": {"worker.service": {"oneshot": false, "exit_code": null}},
        }));
        let tasks = synthesize_tasks(&config, CONTROL_BIN).unwrap();
        let task = &tasks["systemd-worker-service"];
        assert_eq!(task.kind(), "long");
        assert_eq!(task.command().unwrap().line, vec![CONTROL_BIN]);
    }

    #[test]
    fn test_explicit_tasks_pass_through() {
        let config = config(serde_json::json!({
            "tasks": {"web": {"type": "long", "command": {"line": ["/usr/bin/web"], "restart": "always"}}},
        }));
        let tasks = synthesize_tasks(&config, CONTROL_BIN).unwrap();
        assert_eq!(
            serde_json::to_value(&tasks["web"]).unwrap(),
            serde_json::json!({
                "type": "long",
                "command": {"line": ["/usr/bin/web"], "restart": "always"},
            })
        );
    }

    #[test]
    fn test_listen_control_collision_is_error() {
        // Same unit in both tables maps to one task name
        let config = config(serde_json::json!({
            "listen_systemd": {"db.service": true},
            "control_systemd": {"db.service": {"oneshot": false}},
        }));
        let err = synthesize_tasks(&config, CONTROL_BIN).unwrap_err();
        match err {
            BuildError::TaskCollision { name, first, second } => {
                assert_eq!(name, "systemd-db-service");
                assert!(first.contains("listen mapping 'db.service'"));
                assert!(second.contains("control mapping 'db.service'"));
            }
            other => panic!("expected TaskCollision, got {other:?}"),
        }
    }

    #[test]
    fn test_separator_collision_is_error() {
        // a.b.service and a@b.service differ only in separator choice and
        // mangle to the same name
        let config = config(serde_json::json!({
            "listen_systemd": {"a.b.service": true, "a@b.service": true},
        }));
        let err = synthesize_tasks(&config, CONTROL_BIN).unwrap_err();
        assert!(matches!(
            err,
            BuildError::TaskCollision { name, .. } if name == "systemd-a-b-service"
        ));
    }

    #[test]
    fn test_explicit_task_shadowing_synthesized_name_is_error() {
        let config = config(serde_json::json!({
            "tasks": {"systemd-db-service": {"type": "empty"}},
            "listen_systemd": {"db.service": true},
        }));
        let err = synthesize_tasks(&config, CONTROL_BIN).unwrap_err();
        match err {
            BuildError::TaskCollision { first, .. } => {
                assert!(first.contains("explicit task table"));
            }
            other => panic!("expected TaskCollision, got {other:?}"),
        }
    }
}
