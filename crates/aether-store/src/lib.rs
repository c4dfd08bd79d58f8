//! Theme record storage.
//!
//! This crate provides:
//! - The [`ThemeStore`] trait used by the theme cache
//! - An in-memory store for tests and ephemeral deployments
//! - A JSON file store that survives restarts

pub mod error;
pub mod json_file;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use json_file::{JsonFileThemeStore, STORE_FORMAT_VERSION};
pub use memory::MemoryThemeStore;
pub use store::ThemeStore;
