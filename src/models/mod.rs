//! Data models for the FPV builder backend.
//!
//! Field names serialize in camelCase to match the storefront client.

mod build;
mod component;
mod revision;

pub use build::*;
pub use component::*;
pub use revision::*;
