//! forewoman core library — Procfile parsing and instance planning.
//!
//! - [`manifest`] — Procfile text → ordered process types
//! - [`concurrency`] — `web=2,worker=1` → instance counts
//! - [`planner`] — process types → [`InstanceSpec`]s with ports and environment
//! - [`options`] — run configuration and directory resolution
//! - [`env_file`] — `.env` loading
//! - [`pipeline`] — all of the above in one call

pub mod concurrency;
pub mod env_file;
pub mod error;
pub mod manifest;
pub mod options;
pub mod pipeline;
pub mod planner;
pub mod types;

pub use concurrency::ConcurrencyMap;
pub use error::{EnvFileError, ManifestError, PipelineError, PlanError};
pub use options::RunOptions;
pub use pipeline::{prepare, Plan};
pub use types::{Environment, InstanceName, InstanceSpec, Manifest, ProcessName, ProcessType};
