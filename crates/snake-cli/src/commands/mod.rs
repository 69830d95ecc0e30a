mod demo;
mod run;

use std::path::PathBuf;

use clap::Subcommand;
use snake_saga::{CommitOptions, Saga};
use tracing::info;

use crate::actions::DemoError;
use crate::error::{CliError, Result};
use crate::output::{PlainTextFormatter, ReportFormatter};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Commit the built-in toggle and counter actions
    Demo {
        /// Undo every action after they all applied
        #[arg(long)]
        force_rollback: bool,

        /// Append an action that always fails to apply
        #[arg(long)]
        fail: bool,
    },
    /// Commit the actions described by a TOML plan file
    Run {
        /// Path to the plan file
        plan: PathBuf,

        /// Undo every action after they all applied, overriding the plan
        #[arg(long)]
        force_rollback: bool,
    },
}

impl Commands {
    pub(crate) async fn execute(self) -> Result<()> {
        match self {
            Self::Demo {
                force_rollback,
                fail,
            } => demo::run(force_rollback, fail).await,
            Self::Run {
                plan,
                force_rollback,
            } => run::run(&plan, force_rollback).await,
        }
    }
}

/// Commit `saga`, print its actions and audit log, and surface any failure.
async fn commit_and_report(mut saga: Saga<DemoError>, options: CommitOptions) -> Result<()> {
    info!(actions = saga.len(), "running saga");

    let (result, audit_log) = saga.commit_with_audit(options).await;
    let outcome = result.map(|_| ());

    let formatter = PlainTextFormatter;
    let report = match &outcome {
        Ok(()) => formatter.format_success(saga.instances(), &audit_log),
        Err(_) => formatter.format_failure(saga.instances(), &audit_log),
    };
    print!("{report}");

    outcome.map_err(CliError::Saga)
}
