//! Shared runtime plumbing for the HUMPBANK crates.

pub mod utils;

pub use utils::logging::LogFormat;
