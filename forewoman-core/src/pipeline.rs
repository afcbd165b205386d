//! Shared planning entrypoint used by `start` and `check`.

use std::path::{Path, PathBuf};

use crate::concurrency::ConcurrencyMap;
use crate::error::PipelineError;
use crate::options::RunOptions;
use crate::types::InstanceSpec;
use crate::{env_file, manifest, planner};

/// A fully planned run, ready to hand to the supervisor.
#[derive(Debug, Clone)]
pub struct Plan {
    pub manifest_path: PathBuf,
    pub working_dir: PathBuf,
    pub instances: Vec<InstanceSpec>,
}

/// Load the manifest, read env files, and expand into instances.
///
/// Env files are read to completion before planning so every instance sees
/// the same variables. `cwd` anchors the default manifest path and working
/// directory.
pub fn prepare(options: &RunOptions, cwd: &Path) -> Result<Plan, PipelineError> {
    let manifest_path = options.manifest_path(cwd);
    let mut manifest = manifest::load(&manifest_path)?;
    planner::select(&mut manifest, options.process.as_deref())?;

    let mut base_env = planner::inherited_environment();
    base_env.extend(env_file::read_all(&options.env_files).variables());

    let concurrency = ConcurrencyMap::parse(options.concurrency.as_deref());
    let instances = planner::plan(&manifest, &concurrency, options.port, &base_env)?;

    Ok(Plan {
        manifest_path,
        working_dir: options.working_dir(cwd),
        instances,
    })
}
