//! Core infrastructure: error types, shared data types, constants and
//! logging initialization.
//!
//! - [`types`]: type aliases and the dtype enumeration
//! - [`constants`]: defaults such as the IoU threshold grid
//! - [`error`]: the [`EvalError`] enum and [`Result`] alias

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{EvalError, Result};
pub use types::*;

use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

/// Initialize logging through `env_logger`.
///
/// Defaults `RUST_LOG` to `info` when it is unset. Safe to call more than
/// once; a logger installed by the host application is left untouched.
pub fn initialize_logging() {
    LOGGER_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "info");
        }
        if env_logger::try_init().is_ok() {
            log::debug!("action-eval {} logging initialized", ACTION_EVAL_VERSION);
        }
    });
}
