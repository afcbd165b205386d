//! `forewoman check` — show the planned instances without starting them.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use forewoman_core::{prepare, InstanceSpec, Plan};

use super::RunArgs;

/// Arguments for `forewoman check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Check only this process type.
    pub process: Option<String>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir().context("could not determine current directory")?;
        let options = self.run.into_options(self.process);

        let plan = prepare(&options, &cwd).context("[forewoman] check failed")?;
        if plan.instances.is_empty() {
            bail!("no processes defined in {}", plan.manifest_path.display());
        }

        if self.json {
            print_json(&plan)?;
        } else {
            print_table(&plan);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct PlanJson<'a> {
    procfile: &'a Path,
    directory: &'a Path,
    instances: &'a [InstanceSpec],
}

#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "instance")]
    instance: String,
    #[tabled(rename = "port")]
    port: u16,
    #[tabled(rename = "command")]
    command: String,
}

fn print_json(plan: &Plan) -> Result<()> {
    let payload = PlanJson {
        procfile: &plan.manifest_path,
        directory: &plan.working_dir,
        instances: &plan.instances,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize plan JSON")?
    );
    Ok(())
}

fn print_table(plan: &Plan) {
    println!(
        "{} {} ({} instances)",
        "valid procfile:".green().bold(),
        plan.manifest_path.display(),
        plan.instances.len(),
    );
    let rows: Vec<InstanceRow> = plan
        .instances
        .iter()
        .map(|spec| InstanceRow {
            instance: spec.name.to_string(),
            port: spec.port,
            command: spec.command.clone(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
