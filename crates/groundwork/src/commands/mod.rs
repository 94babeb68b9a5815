//! Command implementations
//!
//! This module contains implementations for all CLI subcommands.

pub mod clean;
pub mod rebuild;
pub mod setup;
pub mod status;
