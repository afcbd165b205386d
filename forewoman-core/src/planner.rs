//! Instance planning: manifest × concurrency → ordered [`InstanceSpec`]s.
//!
//! Ports are handed out from one counter across the whole flattened list,
//! so `[web×2, worker×1]` at base 5000 yields 5000, 5001, 5002.

use crate::concurrency::ConcurrencyMap;
use crate::error::PlanError;
use crate::types::{Environment, InstanceName, InstanceSpec, Manifest};

/// Environment variable overridden per instance.
pub const PORT_VAR: &str = "PORT";

/// Expand `manifest` into one spec per instance.
///
/// Process types are visited in manifest order and replicas in index order.
/// Every spec gets its own clone of `base_env` with `PORT` set to its port.
pub fn plan(
    manifest: &Manifest,
    concurrency: &ConcurrencyMap,
    base_port: u16,
    base_env: &Environment,
) -> Result<Vec<InstanceSpec>, PlanError> {
    let mut specs = Vec::new();
    let mut global_index: u32 = 0;

    for process in manifest.iter() {
        for local_index in 0..concurrency.count_for(&process.name.0) {
            let port = u16::try_from(u32::from(base_port) + global_index).map_err(|_| {
                PlanError::PortOverflow {
                    base: base_port,
                    instances: global_index as usize + 1,
                }
            })?;

            let mut environment = base_env.clone();
            environment.insert(PORT_VAR.to_string(), port.to_string());

            specs.push(InstanceSpec {
                name: InstanceName::new(&process.name, local_index),
                process: process.name.clone(),
                command: process.command.clone(),
                port,
                environment,
            });
            global_index += 1;
        }
    }

    Ok(specs)
}

/// Restrict `manifest` to a single process type, if one was requested.
pub fn select(manifest: &mut Manifest, process: Option<&str>) -> Result<(), PlanError> {
    let Some(name) = process else {
        return Ok(());
    };
    if manifest.get(name).is_none() {
        return Err(PlanError::UnknownProcess(name.to_string()));
    }
    manifest.retain_only(name);
    Ok(())
}

/// Snapshot of the supervisor's own environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
pub fn inherited_environment() -> Environment {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::debug!(variable = ?key, "skipping non UTF-8 environment variable");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
