//! Configuration levels
//!
//! The compiler runs once for the system-wide configuration and once for the
//! per-user configuration. The two runs share nothing: each level has its own
//! task set, daemon config, hook set, and output directory.

use std::path::PathBuf;

/// Which configuration scope a pipeline run compiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    System,
    User,
}

impl Level {
    /// Subdirectory under the output root holding this level's artifacts
    pub fn dir_name(&self) -> &'static str {
        match self {
            Level::System => "system",
            Level::User => "user",
        }
    }

    /// The systemd unit the daemon service attaches to at this level
    pub fn attach_unit(&self) -> &'static str {
        match self {
            Level::System => "multi-user.target",
            Level::User => "default.target",
        }
    }

    /// Mutable task-override directory the daemon reads after the generated
    /// one. Fixed convention per level; the user path follows the XDG config
    /// dir of the machine running the build.
    pub fn override_task_dir(&self) -> PathBuf {
        match self {
            Level::System => PathBuf::from("/etc/puteron/tasks"),
            Level::User => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("~/.config"))
                .join("puteron/tasks"),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_units() {
        assert_eq!(Level::System.attach_unit(), "multi-user.target");
        assert_eq!(Level::User.attach_unit(), "default.target");
    }

    #[test]
    fn test_system_override_dir_is_etc() {
        assert_eq!(
            Level::System.override_task_dir(),
            PathBuf::from("/etc/puteron/tasks")
        );
    }

    #[test]
    fn test_user_override_dir_ends_with_convention() {
        let dir = Level::User.override_task_dir();
        assert!(dir.ends_with("puteron/tasks"));
    }
}
