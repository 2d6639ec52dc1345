//! Configuration module
//!
//! YAML configuration with serde defaults for every section, plus environment
//! resolution for the provider credential.

pub mod types;
pub mod loader;

pub use types::*;
pub use loader::*;

#[cfg(test)]
mod tests;
