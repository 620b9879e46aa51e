//! Lifecycle hook generation
//!
//! For every enabled listen mapping, produces the pair of commands the init
//! system runs when the unit starts and stops, flipping the matching marker
//! task on and off in the daemon. Units are partitioned purely by name
//! suffix into services, targets, and mounts; mounts additionally surface
//! the mount point decoded from the unit base name so the platform layer
//! can declare the mount unit it attaches the hooks to.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::LevelConfig;
use crate::error::BuildError;

use super::mangle::mangle_unit_name;
use super::synth::enabled_listen_units;

/// Hook pair for one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitHooks {
    /// Run when the unit has started
    pub on_start: String,
    /// Run when the unit stops
    pub on_stop: String,
    /// Mount point path, present for mount units only
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub mount_where: Option<String>,
}

/// Hook pairs for one level, keyed by unit base name per unit type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HookSet {
    pub service: BTreeMap<String, UnitHooks>,
    pub target: BTreeMap<String, UnitHooks>,
    pub mount: BTreeMap<String, UnitHooks>,
}

impl HookSet {
    pub fn is_empty(&self) -> bool {
        self.service.is_empty() && self.target.is_empty() && self.mount.is_empty()
    }

    pub fn len(&self) -> usize {
        self.service.len() + self.target.len() + self.mount.len()
    }
}

/// Decode a mount point path from a mount unit base name
///
/// Follows the systemd convention: `-` separates path components, `\-`
/// escapes a literal dash, and a bare `-` names the root filesystem
/// (e.g. "var-lib-docker" → "/var/lib/docker").
pub fn mount_point_from_base(base: &str) -> String {
    if base == "-" {
        return "/".to_string();
    }
    let mut result = String::from("/");
    let mut chars = base.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' {
            result.push('/');
        } else if c == '\\' && chars.peek() == Some(&'-') {
            chars.next();
            result.push('-');
        } else {
            result.push(c);
        }
    }
    result
}

/// Shell-quoted activation command, e.g. `puteron on systemd-db-service`
fn activation_command(puteron_bin: &str, verb: &str, task: &str) -> Result<String, BuildError> {
    shlex::try_join([puteron_bin, verb, task]).map_err(|_| BuildError::Quote(task.to_string()))
}

fn hooks_for_unit(puteron_bin: &str, unit: &str, mount_where: Option<String>) -> Result<UnitHooks, BuildError> {
    let task = mangle_unit_name(unit);
    Ok(UnitHooks {
        on_start: activation_command(puteron_bin, "on", &task)?,
        on_stop: activation_command(puteron_bin, "off", &task)?,
        mount_where,
    })
}

/// Generate the hook set for one level from its enabled listen mappings
pub fn generate_hooks(config: &LevelConfig, puteron_bin: &str) -> Result<HookSet, BuildError> {
    let mut hooks = HookSet::default();
    for unit in enabled_listen_units(config) {
        if let Some(base) = unit.strip_suffix(".service") {
            hooks
                .service
                .insert(base.to_string(), hooks_for_unit(puteron_bin, unit, None)?);
        } else if let Some(base) = unit.strip_suffix(".target") {
            hooks
                .target
                .insert(base.to_string(), hooks_for_unit(puteron_bin, unit, None)?);
        } else if let Some(base) = unit.strip_suffix(".mount") {
            let mount_where = Some(mount_point_from_base(base));
            hooks
                .mount
                .insert(base.to_string(), hooks_for_unit(puteron_bin, unit, mount_where)?);
        } else {
            log::warn!("listen unit {} has no hookable suffix, task only", unit);
        }
    }
    Ok(hooks)
}
