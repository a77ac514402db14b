//! Hierarchical FAQ management
//!
//! Questions and answers are organised into trees, one forest per workspace,
//! grouped by issue type. The forest is stored as a YAML file and can be
//! edited from the command line or over HTTP.

pub mod domain;
pub use domain::{
    Config, Error, FaqNode, FaqStore, FlatEntry, IssueType, NewNode, NodePatch, NodeType,
    QuestionId, TreeFilter, ValidationError, Violation,
};

/// Filesystem storage for the forest.
pub mod storage;
pub use storage::Workspace;

/// The REST interface.
pub mod server;
