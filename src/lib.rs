//! Workspace placeholder crate.
//!
//! This crate re-exports the individual workspace crates (`core-runtime`,
//! `core-library`, and optionally `core-service`) so that hosts can depend on
//! `songbook-workspace` and toggle the HTTP layer through the `server`
//! feature instead of wiring each crate individually.

pub use core_library as library;
pub use core_runtime as runtime;

#[cfg(feature = "server")]
pub use core_service as service;
