//! Common types shared by the resolver and the run controller.
//!
//! This module provides:
//! 1. **Configuration errors:** Everything the resolver and memory configurator can reject.
//! 2. **Simulation errors:** Kernel instantiation failures and run-state misuse.

/// Error types for configuration and run control.
pub mod error;

pub use error::{ConfigError, SimError};
