//! Compilation pipeline
//!
//! Pure transformation from one level's option set to its task set and hook
//! set. No I/O happens here; emission and validation live in [`crate::emit`].

mod hooks;
mod mangle;
mod synth;

pub use hooks::{generate_hooks, mount_point_from_base, HookSet, UnitHooks};
pub use mangle::mangle_unit_name;
pub use synth::{enabled_control_units, enabled_listen_units, synthesize_tasks};

use std::collections::BTreeMap;

use crate::config::LevelConfig;
use crate::error::BuildError;
use crate::level::Level;
use crate::task::TaskSpec;

/// Binaries referenced by generated commands
#[derive(Debug, Clone)]
pub struct Binaries {
    /// The daemon/activation binary (`<bin> on/off <task>`, `<bin> demon run`)
    pub puteron: String,
    /// The unit-control binary wrapped by control tasks
    pub control: String,
}

impl Default for Binaries {
    fn default() -> Self {
        Self {
            puteron: "puteron".to_string(),
            control: "puteron-control-systemd".to_string(),
        }
    }
}

/// Everything computed for one level, ready for emission
#[derive(Debug, Clone)]
pub struct CompiledLevel {
    pub level: Level,
    pub debug: bool,
    pub environment: Option<BTreeMap<String, String>>,
    pub tasks: BTreeMap<String, TaskSpec>,
    pub hooks: HookSet,
}

/// Compile one configuration level
pub fn compile_level(
    level: Level,
    config: &LevelConfig,
    bins: &Binaries,
) -> Result<CompiledLevel, BuildError> {
    let tasks = synthesize_tasks(config, &bins.control)?;
    let hooks = generate_hooks(config, &bins.puteron)?;
    log::info!(
        "compiled {} level: {} tasks, {} hooks",
        level,
        tasks.len(),
        hooks.len()
    );
    Ok(CompiledLevel {
        level,
        debug: config.debug,
        environment: config.environment.clone(),
        tasks,
        hooks,
    })
}
