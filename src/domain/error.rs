use thiserror::Error;

use crate::domain::{BlankError, IssueType, QuestionId};

/// Errors returned by [`FaqStore`](crate::FaqStore) operations.
///
/// Every operation validates before it mutates, so when one of these is
/// returned the forest is unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The input was rejected before anything was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No question with this id exists in the forest.
    #[error("question {0} not found")]
    NotFound(QuestionId),

    /// Only questions without sub-questions may be deleted.
    #[error(
        "cannot delete question {question_id}: it still has {children} child question(s); delete \
         the children first"
    )]
    HasChildren {
        /// The question that could not be deleted.
        question_id: QuestionId,
        /// How many children it still has.
        children: usize,
    },

    /// The requested parent is the question itself or one of its
    /// descendants.
    #[error("cannot move question {question_id} under {parent}: a question cannot be its own ancestor")]
    CircularReference {
        /// The question being moved.
        question_id: QuestionId,
        /// The rejected parent.
        parent: QuestionId,
    },
}

impl Error {
    /// A short, stable name for the kind of error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::HasChildren { .. } => "has_children",
            Self::CircularReference { .. } => "circular_reference",
        }
    }
}

/// Reasons an input can be rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace.
    #[error("validation failed: {0}")]
    Blank(#[from] BlankError),

    /// A root question needs an issue type.
    #[error("validation failed: 'issue_type' is required when creating a root question")]
    MissingIssueType,

    /// The referenced parent does not exist.
    #[error("validation failed: parent question {0} does not exist")]
    ParentNotFound(QuestionId),

    /// A child was given an issue type different from its parent's.
    #[error(
        "validation failed: issue type '{given}' conflicts with the parent's issue type \
         '{inherited}'"
    )]
    IssueTypeConflict {
        /// The issue type supplied with the request.
        given: IssueType,
        /// The parent's issue type, which children inherit.
        inherited: IssueType,
    },

    /// An update tried to change a field that is fixed at creation.
    #[error("validation failed: '{0}' cannot be changed after creation")]
    Immutable(&'static str),
}
