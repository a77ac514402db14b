//! The question/answer record stored in the FAQ forest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{IssueType, QuestionId, Text};

/// Where a node sits in its tree.
///
/// The tag is derived from the node's linkage and is recomputed whenever
/// children are added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Top of a tree: no parent.
    Root,
    /// Has a parent and at least one child.
    Followup,
    /// Has a parent and no children.
    Leaf,
}

impl NodeType {
    /// Derives the tag from a node's linkage.
    #[must_use]
    pub const fn derive(has_parent: bool, has_children: bool) -> Self {
        match (has_parent, has_children) {
            (false, _) => Self::Root,
            (true, true) => Self::Followup,
            (true, false) => Self::Leaf,
        }
    }

    /// The lowercase name used on the wire and in the forest file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Followup => "followup",
            Self::Leaf => "leaf",
        }
    }
}

/// A single question with its answer and the sub-questions that follow it.
///
/// A node exclusively owns its `children`. Children are kept in display
/// order: ascending `priority`, ties in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqNode {
    /// Unique identifier, immutable after creation.
    pub question_id: QuestionId,
    /// The question as shown to customers.
    pub question_text: Text,
    /// The answer shown when the question is selected.
    pub answer_text: Text,
    /// Category of the tree this node belongs to.
    pub issue_type: IssueType,
    /// Optional free-text sub-category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    /// Position in the tree.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// The enclosing node; `None` only for roots.
    #[serde(default)]
    pub parent_question_id: Option<QuestionId>,
    /// Sub-questions, in display order.
    #[serde(default)]
    pub children: Vec<FaqNode>,
    /// Suggested follow-up questions. Informational only.
    #[serde(default)]
    pub next_questions: Vec<QuestionId>,
    /// Whether the customer may hand off to human support from here.
    #[serde(default)]
    pub escalation_allowed: bool,
    /// Label of the hand-off action.
    #[serde(default)]
    pub escalation_label: String,
    /// Sort key among siblings; lower sorts first.
    #[serde(default)]
    pub priority: i64,
    /// Lowercase search terms.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Inactive nodes are kept but hidden from some views.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Incremented on every successful update of this node.
    pub version: u64,
    /// Who created the node.
    pub created_by: String,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When `version` last changed.
    pub updated_at: DateTime<Utc>,
}

const fn default_active() -> bool {
    true
}

impl FaqNode {
    /// Whether this node is the top of a tree.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_question_id.is_none()
    }

    /// Recomputes the `type` tag of this node from its own linkage.
    ///
    /// Returns `true` if the tag changed.
    pub(crate) fn refresh_type(&mut self) -> bool {
        let derived = NodeType::derive(self.parent_question_id.is_some(), !self.children.is_empty());
        let changed = derived != self.node_type;
        self.node_type = derived;
        changed
    }

    /// Bumps `version` and `updated_at` after a successful mutation.
    pub(crate) fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match against the question, the answer,
    /// and any keyword.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        self.question_text.to_lowercase().contains(needle)
            || self.answer_text.to_lowercase().contains(needle)
            || self.keywords.iter().any(|k| k.to_lowercase().contains(needle))
    }

    /// Inserts a child at its display position, after any siblings with the
    /// same or lower priority.
    pub(crate) fn insert_child(&mut self, child: Self) {
        insert_sorted(&mut self.children, child);
    }

    /// Total number of nodes in this subtree, including this one.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }

    /// Sets `issue_type` on this node and every descendant.
    pub(crate) fn retag(&mut self, issue_type: &IssueType) {
        self.issue_type = issue_type.clone();
        for child in &mut self.children {
            child.retag(issue_type);
        }
    }
}

/// Inserts `node` into `siblings` after the last entry whose priority is not
/// greater than the node's.
pub(crate) fn insert_sorted(siblings: &mut Vec<FaqNode>, node: FaqNode) {
    let index = siblings.partition_point(|sibling| sibling.priority <= node.priority);
    siblings.insert(index, node);
}

/// Re-establishes display order after a priority change.
///
/// The sort is stable, so ties keep their existing relative order.
pub(crate) fn sort_siblings(siblings: &mut [FaqNode]) {
    siblings.sort_by_key(|node| node.priority);
}

/// Lowercases, trims, and de-duplicates keywords, dropping empty entries.
///
/// The first occurrence of each keyword wins.
#[must_use]
pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref().trim().to_lowercase();
        if !keyword.is_empty() && !normalized.contains(&keyword) {
            normalized.push(keyword);
        }
    }
    normalized
}
