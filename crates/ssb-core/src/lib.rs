//! # ssb-core
//!
//! Core types and utilities shared across all static site builder crates.
//!
//! This crate provides:
//! - `Mode` for selecting development or production behaviour
//! - `SsbError` for unified error handling
//! - Path and size-value helpers used by the configuration engine
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Mode)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{SsbError, SsbResult};
pub use types::Mode;
