//! Filter module.
//!
//! Contains the filter registry, the active-filter selector and the built-in
//! filter implementations.

pub mod builtin;
pub mod registry;
pub mod selector;

pub use registry::{FilterRegistry, RegistryEntry};
pub use selector::FilterSelector;
