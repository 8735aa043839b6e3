pub mod error;
pub mod log;
pub mod signal_wait;
pub mod signaler;

pub use error::{Error, Result};
pub use log::{CompletionLog, MemoryLog, TracingLog};
pub use signal_wait::{Builder, SignalWait};
pub use signaler::Signaler;
