pub mod types;

mod traits;

pub use traits::ProcessExecutor;
pub use types::{ProcessInfo, ProcessOutcome, ProcessPriority, TIMED_OUT_EXIT_CODE};
