//! Editing support for ksec
//!
//! This crate provides the `key: value` text codec, the external editor and
//! fzf capabilities, backup files, and the edit workflow that ties them to a
//! secret store.

pub mod backup;
pub mod codec;
mod editor;
mod selector;
mod workflow;

pub use editor::{Editor, ExternalEditor, DEFAULT_EDITOR};
pub use selector::{FzfSelector, Selector};
pub use workflow::{EditOptions, EditOutcome, EditWorkflow};

// Re-export types used in our public API
pub use ksec_types::{Error, Result};
