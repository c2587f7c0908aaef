//! Feedscope Common - Shared types, configuration, and logging.
//!
//! This crate provides the pieces every Feedscope service needs:
//! - Unified error type with an HTTP status mapping
//! - Configuration loading with env overrides
//! - Logging initialization with noise filtering

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{Error, Result};
