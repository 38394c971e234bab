//! Core roadmap functionality shared by the library and the CLI

pub mod config;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod preview;
pub mod progress;
pub mod roadmap;
pub mod status;

/// Returns the current version of the `semester-roadmap` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
