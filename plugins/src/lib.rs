//! Process execution backends for the ccbuild task adapter.
pub mod runner;

pub use runner::TokioProcessExecutor;
