//! taskbridge - compile declarative task configuration into puteron artifacts
//!
//! `build` emits the task directory, daemon config, and lifecycle hooks for
//! every configured level. `check` runs the compile pipeline without
//! touching disk, for inspecting what a config would produce.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use taskbridge::compile::{compile_level, Binaries};
use taskbridge::{run_build, BuildOptions, Config, Level};

#[derive(Parser)]
#[command(name = "taskbridge")]
#[command(about = "Compile declarative task configuration into puteron artifacts")]
struct Args {
    /// Path to the JSON configuration file
    #[arg(long, short = 'c', global = true, default_value = "taskbridge.json")]
    config: PathBuf,

    /// Activation/daemon binary referenced by generated commands
    #[arg(long, global = true, default_value = "puteron")]
    puteron_bin: String,

    /// Unit-control binary wrapped by control tasks
    #[arg(long, global = true, default_value = "puteron-control-systemd")]
    control_bin: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile and emit all artifacts
    Build {
        /// Output directory root
        #[arg(long, short = 'o', default_value = "out")]
        out: PathBuf,
    },

    /// Compile without emitting, print a summary
    Check,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let bins = Binaries {
        puteron: args.puteron_bin,
        control: args.control_bin,
    };

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("taskbridge: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Build { out } => {
            let outcomes = run_build(
                &config,
                &BuildOptions {
                    out_dir: out,
                    bins,
                },
            );

            let mut failed = false;
            for outcome in outcomes {
                match outcome.result {
                    Ok(artifacts) => {
                        println!(
                            "{}: {} -> {}",
                            outcome.level,
                            artifacts.task_dir.display(),
                            artifacts.daemon_config.display()
                        );
                    }
                    Err(e) => {
                        eprintln!("taskbridge: {} level: {}", outcome.level, e);
                        failed = true;
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
        }

        Command::Check => {
            let mut levels = vec![(Level::System, &config.system)];
            if let Some(user) = &config.user {
                levels.push((Level::User, user));
            }

            let mut failed = false;
            for (level, level_config) in levels {
                match compile_level(level, level_config, &bins) {
                    Ok(compiled) => {
                        println!("{}: {} tasks, {} hooks", level, compiled.tasks.len(), compiled.hooks.len());
                        for (name, spec) in &compiled.tasks {
                            println!("  {:<40} {}", name, spec.kind());
                        }
                    }
                    Err(e) => {
                        eprintln!("taskbridge: {} level: {}", level, e);
                        failed = true;
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
    }
}
