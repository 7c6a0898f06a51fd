//! CLI command implementations
//!
//! Commands are organized by output:
//! - `common` - Shared utilities (event loading, window resolution)
//! - `insights` - Full insight report
//! - `stats` - Descriptive statistics per category
//! - `check` - Event file validation

pub mod check;
pub mod common;
pub mod insights;
pub mod stats;

// Re-export command functions for main.rs
pub use check::*;
pub use common::*;
pub use insights::*;
pub use stats::*;
