//! Operator CLI
//!
//! Housekeeping commands run by hand outside the API server.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use maintenance::purge::{DEFAULT_ARTIFACTS_DIR, DEFAULT_KEEP};
use maintenance::{PurgeCommand, PurgeError, PurgeOptions, PurgeReport, PurgeResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "manage")]
#[command(about = "Operator commands for the admin backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete the migration files of every module living in the base directory.
    /// Asks for confirmation at each directory level.
    FlushMigrations {
        #[arg(long, default_value = ".", help = "Directory holding the modules")]
        base_dir: PathBuf,

        #[arg(long = "module", help = "Only these module directories (repeatable)")]
        modules: Vec<PathBuf>,

        #[arg(
            long,
            default_value = DEFAULT_ARTIFACTS_DIR,
            help = "Artifacts directory inside each module"
        )]
        artifacts_dir: String,

        #[arg(long, default_value = DEFAULT_KEEP, help = "Initializer file left in place")]
        keep: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manage=info,maintenance=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match Cli::parse().command {
        Commands::FlushMigrations {
            base_dir,
            modules,
            artifacts_dir,
            keep,
        } => {
            let options = PurgeOptions {
                base_dir,
                modules,
                artifacts_dir,
                keep,
            };
            let command = PurgeCommand::new(io::stdin().lock(), io::stdout(), options);
            ExitCode::from(exit_status(command.run()))
        }
    }
}

/// Report the purge outcome and pick the process exit status
fn exit_status(result: PurgeResult<PurgeReport>) -> u8 {
    match result {
        Ok(report) => {
            println!("Deleted {} migration files.", report.deleted.len());
            0
        }
        Err(e @ PurgeError::Cancelled) => {
            eprintln!("\n{e}");
            e.exit_code()
        }
        Err(e) => {
            tracing::error!(error = %e, "Flushing migration files failed");
            e.exit_code()
        }
    }
}
