//! CLI command implementations.

pub mod common;
pub mod instance;
pub mod run;
pub mod spectrum;
pub mod version;
