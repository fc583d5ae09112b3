//! Static site builder benchmarking suite
//!
//! Benchmarks for configuration assembly, deep merging and the parsers that
//! feed them.

pub mod common;

pub use common::*;
