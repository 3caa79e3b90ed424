//! File system helpers.

pub mod paths;

pub use paths::{ensure_dir, target_dir};
