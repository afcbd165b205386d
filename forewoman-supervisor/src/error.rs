use thiserror::Error;

/// Error surface for spawning and supervising child processes.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("command for {instance} is empty")]
    EmptyCommand { instance: String },

    #[error("failed to spawn {instance} ({program}): {source}")]
    Spawn {
        instance: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("console write failed: {0}")]
    Console(#[source] std::io::Error),
}
