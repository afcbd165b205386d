//! Process supervision: spawn planned instances, multiplex their output,
//! report their exits.

mod error;
pub mod event;
pub mod multiplexer;
pub mod palette;
mod runtime;

pub use error::SupervisorError;
pub use event::{Event, InstanceExit, Stream, SPAWN_FAILURE_CODE};
pub use multiplexer::Multiplexer;
pub use palette::{color_for, PALETTE};
pub use runtime::{init_tracing, start_blocking, tokenize, RunSummary, RunningProcess, Supervisor};
