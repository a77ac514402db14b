//! Validated identifiers and text fields.
//!
//! Each type trims its input and refuses to hold a blank value.

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    str::FromStr,
};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, globally unique identifier of a question.
///
/// Identifiers are generated by the store when a question is created and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(NonEmptyString);

impl QuestionId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string()).expect("a UUID is never blank")
    }

    /// Wraps an existing identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BlankError`] if the string is empty or whitespace.
    pub fn new(s: String) -> Result<Self, BlankError> {
        NonEmptyString::new(s.trim().to_string())
            .map(Self)
            .map_err(|_| BlankError("question_id"))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for QuestionId {
    type Error = BlankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for QuestionId {
    type Error = BlankError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for QuestionId {
    type Err = BlankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> Self {
        id.0.as_str().to_owned()
    }
}

impl Hash for QuestionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Deref for QuestionId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The category a tree of questions belongs to, such as `order` or `payment`.
///
/// Issue types are normalised to lowercase with surrounding whitespace
/// removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueType(NonEmptyString);

impl IssueType {
    /// Creates a new issue type.
    ///
    /// # Errors
    ///
    /// Returns [`BlankError`] if the string is empty or whitespace.
    pub fn new(s: &str) -> Result<Self, BlankError> {
        NonEmptyString::new(s.trim().to_lowercase())
            .map(Self)
            .map_err(|_| BlankError("issue_type"))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for IssueType {
    type Error = BlankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl FromStr for IssueType {
    type Err = BlankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<IssueType> for String {
    fn from(issue_type: IssueType) -> Self {
        issue_type.0.as_str().to_owned()
    }
}

impl Deref for IssueType {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Question or answer text: never empty, never only whitespace.
///
/// Surrounding whitespace is trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Text(NonEmptyString);

impl Text {
    /// Creates a new text value.
    ///
    /// # Errors
    ///
    /// Returns [`BlankError`] if nothing remains after trimming.
    pub fn new(s: &str) -> Result<Self, BlankError> {
        NonEmptyString::new(s.trim().to_string())
            .map(Self)
            .map_err(|_| BlankError("text"))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Re-labels a blank error with the name of the field being set.
    pub(crate) fn for_field(s: &str, field: &'static str) -> Result<Self, BlankError> {
        Self::new(s).map_err(|_| BlankError(field))
    }
}

impl TryFrom<String> for Text {
    type Error = BlankError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Text> for String {
    fn from(text: Text) -> Self {
        text.0.as_str().to_owned()
    }
}

impl Deref for Text {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a required string field is empty or only whitespace.
///
/// Carries the name of the offending field.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("'{0}' must not be empty")]
pub struct BlankError(pub &'static str);

impl BlankError {
    /// The name of the field that was blank.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.0
    }
}
