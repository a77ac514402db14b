//! Domain models for FAQ management.
//!
//! This module contains the question tree, the in-memory forest that owns
//! it, and the configuration that shapes defaults.

mod config;
pub use config::Config;

mod error;
pub use error::{Error, ValidationError};

/// Search and status filtering.
pub mod filter;
pub use filter::TreeFilter;

/// Indented listing for parent pickers.
pub mod flatten;
pub use flatten::{FlatEntry, Flatten};

mod ids;
pub use ids::{BlankError, IssueType, QuestionId, Text};

/// Integrity checks for loaded forests.
pub mod integrity;
pub use integrity::Violation;

mod node;
pub use node::{FaqNode, NodeType, normalize_keywords};

mod patch;
pub use patch::{NewNode, NodePatch};

mod store;
pub use store::{Defaults, FaqStore};

pub mod walk;
