//! Level driver
//!
//! Runs the compile pipeline once per configuration level. The system level
//! is always compiled; the user level only when the config carries a nested
//! `user` table. The two runs share nothing, and a failure in one level does
//! not stop the other.

use std::path::PathBuf;

use crate::compile::{compile_level, Binaries};
use crate::config::Config;
use crate::emit::{Emitter, LevelArtifacts};
use crate::error::BuildError;
use crate::level::Level;

/// Options for one build invocation
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub out_dir: PathBuf,
    pub bins: Binaries,
}

/// Per-level result of a build
#[derive(Debug)]
pub struct LevelOutcome {
    pub level: Level,
    pub result: Result<LevelArtifacts, BuildError>,
}

/// Compile and emit every level present in the configuration
pub fn run_build(config: &Config, opts: &BuildOptions) -> Vec<LevelOutcome> {
    let emitter = Emitter::new(opts.out_dir.clone(), opts.bins.puteron.clone());

    let mut levels = vec![(Level::System, &config.system)];
    if let Some(user) = &config.user {
        levels.push((Level::User, user));
    }

    levels
        .into_iter()
        .map(|(level, level_config)| {
            let result = compile_level(level, level_config, &opts.bins)
                .and_then(|compiled| emitter.emit(&compiled));
            if let Err(e) = &result {
                log::error!("{} level build failed: {}", level, e);
            }
            LevelOutcome { level, result }
        })
        .collect()
}
