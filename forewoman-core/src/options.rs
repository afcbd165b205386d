//! Run configuration, passed explicitly into planning and supervision.

use std::path::{Path, PathBuf};

/// Base port used when none is given.
pub const DEFAULT_PORT: u16 = 5000;

/// Manifest file name looked up in the current directory.
pub const DEFAULT_MANIFEST: &str = "Procfile";

/// Options for one `start` or `check` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Raw concurrency spec, e.g. `web=2,worker=1`.
    pub concurrency: Option<String>,
    /// Explicit manifest path.
    pub procfile: Option<PathBuf>,
    /// Explicit working directory for child processes.
    pub directory: Option<PathBuf>,
    pub port: u16,
    pub env_files: Vec<PathBuf>,
    /// Run only this process type.
    pub process: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: None,
            procfile: None,
            directory: None,
            port: DEFAULT_PORT,
            env_files: Vec::new(),
            process: None,
        }
    }
}

impl RunOptions {
    /// Explicit procfile, else `<cwd>/Procfile`.
    pub fn manifest_path(&self, cwd: &Path) -> PathBuf {
        match &self.procfile {
            Some(path) => path.clone(),
            None => cwd.join(DEFAULT_MANIFEST),
        }
    }

    /// Directory children run in: explicit directory, else the procfile's
    /// directory, else `cwd`.
    pub fn working_dir(&self, cwd: &Path) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }
        match self.procfile.as_deref().and_then(Path::parent) {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => cwd.to_path_buf(),
        }
    }
}

/// Split a comma separated path list, skipping empty entries.
pub fn split_paths(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
