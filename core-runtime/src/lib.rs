//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the song catalog service:
//! - Logging and tracing infrastructure
//! - Configuration management (environment variables and `.env` files)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other workspace crates
//! depend on. It establishes the logging conventions and the configuration
//! surface used by the HTTP service and its binaries.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
