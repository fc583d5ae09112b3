//! Utility functions and helpers.
//!
//! Common functionality used across multiple static site builder crates.

pub mod path;
pub mod size;

// Re-export commonly used utilities
pub use path::{normalize_path, real_path};
pub use size::parse_size;
