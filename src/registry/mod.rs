//! Context registry
//!
//! The registry provides:
//! - ContextRegistry: resolves context ids to SelectionContext records,
//!   creating them on first reference
//! - The "active set" of open scenes and the prefab being edited

mod registry;

pub use registry::ContextRegistry;
