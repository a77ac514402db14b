//! Inputs for creating and partially updating questions.

use serde::{Deserialize, Deserializer};

use crate::domain::QuestionId;

/// The fields needed to create a question.
///
/// A root question names its `issue_type`; a child names its
/// `parent_question_id` and inherits the parent's issue type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewNode {
    /// The question as shown to customers.
    pub question_text: String,
    /// The answer.
    pub answer_text: String,
    /// Required for roots; must match the parent's when given for a child.
    #[serde(default)]
    pub issue_type: Option<String>,
    /// The enclosing question, if this is not a root.
    #[serde(default)]
    pub parent_question_id: Option<QuestionId>,
    /// Optional free-text sub-category.
    #[serde(default)]
    pub sub_category: Option<String>,
    /// Defaults to one more than the highest sibling priority.
    #[serde(default)]
    pub priority: Option<i64>,
    /// Whether hand-off to human support is offered.
    #[serde(default)]
    pub escalation_allowed: bool,
    /// Defaults to the configured label when escalation is allowed.
    #[serde(default)]
    pub escalation_label: Option<String>,
    /// Search terms; normalised to lowercase.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Suggested follow-up questions.
    #[serde(default)]
    pub next_questions: Vec<QuestionId>,
    /// Defaults to `true`.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Defaults to the configured author.
    #[serde(default)]
    pub created_by: Option<String>,
}

impl NewNode {
    /// A root question in the given issue type.
    #[must_use]
    pub fn root(
        question_text: impl Into<String>,
        answer_text: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            answer_text: answer_text.into(),
            issue_type: Some(issue_type.into()),
            ..Self::default()
        }
    }

    /// A follow-up question under `parent`.
    #[must_use]
    pub fn child(
        question_text: impl Into<String>,
        answer_text: impl Into<String>,
        parent: QuestionId,
    ) -> Self {
        Self {
            question_text: question_text.into(),
            answer_text: answer_text.into(),
            parent_question_id: Some(parent),
            ..Self::default()
        }
    }

    /// Sets an explicit priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Adds a search keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }
}

/// A partial update to a question.
///
/// Fields left as `None` are untouched. The immutable fields are accepted so
/// that a client may echo them back, but an update is rejected if any of them
/// differs from the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodePatch {
    /// New question text.
    #[serde(default)]
    pub question_text: Option<String>,
    /// New answer text.
    #[serde(default)]
    pub answer_text: Option<String>,
    /// `Some(None)` clears the sub-category.
    #[serde(default, deserialize_with = "present")]
    pub sub_category: Option<Option<String>>,
    /// New priority; siblings are re-sorted.
    #[serde(default)]
    pub priority: Option<i64>,
    /// New active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// New escalation flag.
    #[serde(default)]
    pub escalation_allowed: Option<bool>,
    /// New escalation label.
    #[serde(default)]
    pub escalation_label: Option<String>,
    /// Replaces the keyword list.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// Replaces the suggested follow-ups.
    #[serde(default)]
    pub next_questions: Option<Vec<QuestionId>>,

    /// Immutable; must match when present.
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    /// Immutable through updates; use a move to reparent.
    #[serde(default, deserialize_with = "present")]
    pub parent_question_id: Option<Option<QuestionId>>,
    /// Immutable; must match when present.
    #[serde(default)]
    pub issue_type: Option<String>,
    /// Immutable; must match when present.
    #[serde(default)]
    pub created_by: Option<String>,
}

impl NodePatch {
    /// Sets the question text.
    #[must_use]
    pub fn question_text(mut self, text: impl Into<String>) -> Self {
        self.question_text = Some(text.into());
        self
    }

    /// Sets the answer text.
    #[must_use]
    pub fn answer_text(mut self, text: impl Into<String>) -> Self {
        self.answer_text = Some(text.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub const fn is_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    /// Replaces the keywords.
    #[must_use]
    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = Some(keywords);
        self
    }

    /// Whether applying this patch would change nothing but the version.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.question_text.is_none()
            && self.answer_text.is_none()
            && self.sub_category.is_none()
            && self.priority.is_none()
            && self.is_active.is_none()
            && self.escalation_allowed.is_none()
            && self.escalation_label.is_none()
            && self.keywords.is_none()
            && self.next_questions.is_none()
    }
}

/// Distinguishes a field set to `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
