//! taskbridge - declarative task configuration compiler for puteron
//!
//! Compiles a nested configuration describing managed tasks and their
//! relationship to systemd units into the artifacts the puteron daemon
//! consumes:
//! - a directory of per-task specification files
//! - the daemon configuration file (environment + ordered task dirs)
//! - lifecycle hooks binding systemd unit start/stop to task activation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   taskbridge                    │
//! ├──────────────┬───────────────┬─────────────────┤
//! │  Mangle +    │  Hook         │  Emit +         │
//! │  Synthesize  │  Generation   │  Validate       │
//! ├──────────────┴───────────────┴─────────────────┤
//! │        Level Driver (system / user)             │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs at configuration-build time; the daemon and the init
//! system only consume what this crate emits.

pub mod build;
pub mod compile;
pub mod config;
pub mod emit;
pub mod error;
pub mod level;
pub mod task;

pub use build::{run_build, BuildOptions, LevelOutcome};
pub use compile::{compile_level, Binaries, CompiledLevel};
pub use config::Config;
pub use error::BuildError;
pub use level::Level;
pub use task::TaskSpec;
