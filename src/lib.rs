//! selnav - Selection Navigator
//!
//! Tracks the targets a user selects inside an editor host and re-surfaces
//! them as a bounded, deduplicated history. History is partitioned by
//! context (the project, an open scene, a prefab being edited) and items can
//! be pinned to keep them out of eviction.
//!
//! ## Host boundary
//!
//! Nothing here knows about a concrete editor. The host plugs in through the
//! traits in [`host`]:
//!
//! 1. **Resolvers** map context ids and targets to live objects on demand.
//! 2. **Selection host** reports the active target and accepts programmatic
//!    selection changes.
//! 3. **Preference store** persists history as a plain string.

pub mod config;
pub mod domain;
pub mod error;
pub mod history;
pub mod host;
pub mod navigation;
pub mod navigator;
pub mod registry;
pub mod store;

pub use domain::*;
pub use error::NavigatorError;
