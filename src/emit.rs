//! Artifact emission and validation
//!
//! Materializes a compiled level under the output directory:
//!
//! ```text
//! <out>/<level>/tasks/<name>.json   one spec file per task
//! <out>/<level>/puteron.json        daemon config (environment + task dirs)
//! <out>/<level>/hooks.json          lifecycle hooks + daemon launch entry
//! ```
//!
//! The task directory is wiped and rewritten on every run. The daemon config
//! is checked by running the daemon's own validator; a nonzero exit removes
//! the config file again and fails the build for that level.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use serde::Serialize;

use crate::compile::{CompiledLevel, HookSet};
use crate::error::BuildError;
use crate::level::Level;

/// Emitted daemon configuration file
#[derive(Serialize)]
struct DaemonConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<&'a BTreeMap<String, String>>,
    /// Ordered: the generated directory first, the mutable override
    /// directory second. The daemon applies precedence by position.
    task_dirs: Vec<String>,
}

/// Daemon launch entry of the hooks artifact
#[derive(Serialize)]
struct DaemonEntry {
    /// Command line launching the daemon against the emitted config
    run: String,
    /// Unit the daemon service attaches to at this level
    wanted_by: &'static str,
}

/// Emitted hooks file: unit hooks plus the daemon launch entry
#[derive(Serialize)]
struct HooksArtifact<'a> {
    daemon: DaemonEntry,
    #[serde(flatten)]
    hooks: &'a HookSet,
}

/// Paths of one level's emitted artifacts
#[derive(Debug, Clone)]
pub struct LevelArtifacts {
    pub level: Level,
    pub task_dir: PathBuf,
    pub daemon_config: PathBuf,
    pub hooks_file: PathBuf,
}

/// Writes and validates compiled levels under one output root
#[derive(Debug, Clone)]
pub struct Emitter {
    out_dir: PathBuf,
    puteron_bin: String,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), BuildError> {
    let mut buf = serde_json::to_vec_pretty(value)?;
    buf.push(b'\n');
    std::fs::write(path, buf)?;
    Ok(())
}

impl Emitter {
    pub fn new(out_dir: PathBuf, puteron_bin: String) -> Self {
        Self {
            out_dir,
            puteron_bin,
        }
    }

    /// Emit all artifacts for one compiled level
    pub fn emit(&self, compiled: &CompiledLevel) -> Result<LevelArtifacts, BuildError> {
        let level_dir = self.out_dir.join(compiled.level.dir_name());
        let task_dir = level_dir.join("tasks");

        // Fully regenerate the task directory so removed tasks disappear
        if task_dir.exists() {
            std::fs::remove_dir_all(&task_dir)?;
        }
        std::fs::create_dir_all(&task_dir)?;

        for (name, spec) in &compiled.tasks {
            write_json(&task_dir.join(format!("{}.json", name)), spec)?;
        }
        log::debug!(
            "wrote {} task specs to {}",
            compiled.tasks.len(),
            task_dir.display()
        );

        let daemon_config_path = level_dir.join("puteron.json");
        let daemon_config = DaemonConfig {
            environment: compiled.environment.as_ref(),
            task_dirs: vec![
                task_dir.display().to_string(),
                compiled.level.override_task_dir().display().to_string(),
            ],
        };
        write_json(&daemon_config_path, &daemon_config)?;

        if let Err(e) = self.validate(&daemon_config_path, compiled.debug) {
            // Never leave a config that failed validation looking ready
            if let Err(rm) = std::fs::remove_file(&daemon_config_path) {
                log::warn!(
                    "failed to remove rejected config {}: {}",
                    daemon_config_path.display(),
                    rm
                );
            }
            return Err(e);
        }

        let hooks_path = level_dir.join("hooks.json");
        write_json(
            &hooks_path,
            &HooksArtifact {
                daemon: DaemonEntry {
                    run: self.run_command(&daemon_config_path, compiled.debug)?,
                    wanted_by: compiled.level.attach_unit(),
                },
                hooks: &compiled.hooks,
            },
        )?;

        log::info!("emitted {} level under {}", compiled.level, level_dir.display());
        Ok(LevelArtifacts {
            level: compiled.level,
            task_dir,
            daemon_config: daemon_config_path,
            hooks_file: hooks_path,
        })
    }

    /// The command the platform layer uses to launch the daemon
    fn run_command(&self, config: &Path, debug: bool) -> Result<String, BuildError> {
        let config = config.display().to_string();
        let mut words = vec![self.puteron_bin.as_str(), "demon", "run", config.as_str()];
        if debug {
            words.push("--debug");
        }
        shlex::try_join(words).map_err(|_| BuildError::Quote(config.clone()))
    }

    /// Run the daemon's validator against an emitted config
    fn validate(&self, config: &Path, debug: bool) -> Result<(), BuildError> {
        let mut cmd = process::Command::new(&self.puteron_bin);
        cmd.arg("demon").arg("run").arg(config);
        if debug {
            cmd.arg("--debug");
        }
        cmd.arg("--validate");

        let output = cmd.output().map_err(|e| BuildError::Validate {
            path: config.to_path_buf(),
            reason: format!("failed to run {}: {}", self.puteron_bin, e),
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildError::Validate {
                path: config.to_path_buf(),
                reason: format!("{} ({})", output.status, stderr.trim()),
            });
        }
        Ok(())
    }
}
