//! Core library for the groundwork CLI
//!
//! This crate contains the staged setup orchestrator that bootstraps the
//! JFXGL development environment: configuration resolution, external tool
//! verification, directory mirroring, the stage pipeline, and logging.

pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod mirror;
pub mod orchestrator;
pub mod patch;
pub mod pipeline;
pub mod process;
pub mod stage;

/// Get the version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let version = version();
        assert!(!version.is_empty());
        assert!(version.contains('.'));
    }
}
