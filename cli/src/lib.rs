//! ccbuild-cli library - modules exposed for unit and integration tests.

pub mod commands;
pub mod error;
pub mod logging;
