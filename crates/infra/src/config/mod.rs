//! Configuration loading and validation
//!
//! This module provides utilities for loading application configuration
//! from `.env` files, environment variables and config files, and for
//! reporting problems in a loaded configuration.

pub mod loader;
pub mod validate;

// Re-export commonly used items
pub use loader::{
    apply_overrides, load, load_from_env, load_from_file, load_from_lookup, load_or_default,
    probe_config_paths,
};
pub use validate::{validate, ConfigReport};
