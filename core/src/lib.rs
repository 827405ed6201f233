//! Core of the ccbuild MSBuild task adapter: task configuration, command
//! rendering, result mapping and the executor seam.
pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod runner;
pub mod task;
pub mod util;
