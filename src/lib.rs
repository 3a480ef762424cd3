//! linkq library root.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use cli::Commands;
pub use config::{load_settings, Settings};
pub use core::{Queue, QueueError};
pub use error::{Error, Result};
