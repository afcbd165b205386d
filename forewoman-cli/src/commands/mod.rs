pub mod check;
pub mod start;

use std::path::PathBuf;

use clap::Args;

use forewoman_core::options::{split_paths, RunOptions, DEFAULT_PORT};

/// Options shared by `start` and `check`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Number of each process type to run, as `process=num,process=num`.
    #[arg(long, short = 'c', value_name = "SPEC")]
    pub concurrency: Option<String>,

    /// Alternate Procfile to load; implies -d at the Procfile's directory.
    #[arg(long, short = 'f', value_name = "PATH")]
    pub procfile: Option<PathBuf>,

    /// Alternate application root. Defaults to the Procfile's directory.
    #[arg(long, short = 'd', value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Comma separated list of .env files to load.
    #[arg(long, short = 'e', value_name = "FILES")]
    pub env: Option<String>,

    /// Base port; instance N gets PORT = base + N.
    #[arg(long, short = 'p', default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl RunArgs {
    pub fn into_options(self, process: Option<String>) -> RunOptions {
        RunOptions {
            concurrency: self.concurrency,
            procfile: self.procfile,
            directory: self.directory,
            port: self.port,
            env_files: self.env.as_deref().map(split_paths).unwrap_or_default(),
            process,
        }
    }
}
