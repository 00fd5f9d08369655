//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod benchmark;
pub mod portfolio;
