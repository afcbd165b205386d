//! Error types for forewoman-core.

use std::path::PathBuf;

use thiserror::Error;

/// The manifest could not be loaded. Fatal to starting a run.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An environment file could not be read. The run continues without it.
#[derive(Debug, Error)]
#[error("failed to read environment file {path}: {source}")]
pub struct EnvFileError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors raised while expanding the manifest into instances.
#[derive(Debug, Error)]
pub enum PlanError {
    /// `base_port + index` no longer fits in a port number.
    #[error("port range exhausted: base port {base} cannot fit {instances} instances")]
    PortOverflow { base: u16, instances: usize },

    /// A single process type was requested that the manifest does not define.
    #[error("no process type named '{0}' in the manifest")]
    UnknownProcess(String),
}

/// Any failure that prevents a run from being planned.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}
