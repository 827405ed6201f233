mod io_pump;
pub mod process;

pub use process::TokioProcessExecutor;
