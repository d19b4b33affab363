//! Configuration for the evaluation facade.
//!
//! Configurations come from defaults, the fluent [`EvalConfigBuilder`],
//! `.json`/`.toml` files, or `ACTION_EVAL_*` environment variables, and are
//! validated before use.

pub mod core;

pub use self::core::{ArtifactConfig, ConfigFormat, EvalConfig, EvalConfigBuilder};
