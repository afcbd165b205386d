//! `forewoman start [PROCESS]` — run the Procfile's processes in the foreground.

use anyhow::{Context, Result};
use clap::Args;

use forewoman_core::prepare;
use forewoman_supervisor::start_blocking;

use super::RunArgs;

/// Arguments for `forewoman start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Run only this process type.
    pub process: Option<String>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Print instance output without colors.
    #[arg(long)]
    pub no_color: bool,
}

impl StartArgs {
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir().context("could not determine current directory")?;
        let options = self.run.into_options(self.process);

        let plan = prepare(&options, &cwd).context("[forewoman] could not start processes")?;
        if plan.instances.is_empty() {
            tracing::warn!(path = %plan.manifest_path.display(), "no processes defined");
            return Ok(());
        }

        let summary = start_blocking(plan, !self.no_color).context("supervisor failed")?;
        tracing::info!(
            exited = summary.exits.len(),
            failed = summary.failed(),
            "all processes exited",
        );
        Ok(())
    }
}
