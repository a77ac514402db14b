//! Search and status filtering of the forest.

use serde::Deserialize;

use crate::domain::{FaqNode, IssueType};

/// Criteria for [`FaqStore::get_tree`](crate::FaqStore::get_tree).
///
/// All criteria are optional; an empty filter returns the whole forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TreeFilter {
    /// Case-insensitive substring matched against question, answer, and
    /// keywords. Blank terms are ignored.
    #[serde(default, alias = "search")]
    pub search_term: Option<String>,
    /// Keep only nodes whose active flag equals this.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Keep only trees of this issue type.
    #[serde(default)]
    pub issue_type: Option<String>,
}

impl TreeFilter {
    /// Filters on a search term.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Self::default()
        }
    }

    /// Filters on the active flag.
    #[must_use]
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }
}

/// A filter with its inputs normalised once, ready to test nodes.
pub(crate) struct Matcher {
    needle: Option<String>,
    is_active: Option<bool>,
    issue_type: Option<IssueType>,
}

impl Matcher {
    pub(crate) fn new(filter: &TreeFilter) -> Self {
        let needle = filter
            .search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);
        let issue_type = filter
            .issue_type
            .as_deref()
            .and_then(|t| IssueType::new(t).ok());
        Self {
            needle,
            is_active: filter.is_active,
            issue_type,
        }
    }

    /// Whether the node itself satisfies the search and status criteria.
    fn matches(&self, node: &FaqNode) -> bool {
        self.is_active.is_none_or(|active| node.is_active == active)
            && self
                .needle
                .as_deref()
                .is_none_or(|needle| node.matches_search(needle))
    }

    /// Whether a whole tree is in scope.
    fn admits_tree(&self, root: &FaqNode) -> bool {
        self.issue_type
            .as_ref()
            .is_none_or(|issue_type| &root.issue_type == issue_type)
    }

    /// Filters a forest, keeping every path that leads to a match.
    pub(crate) fn prune_forest(&self, roots: &[FaqNode]) -> Vec<FaqNode> {
        roots
            .iter()
            .filter(|root| self.admits_tree(root))
            .filter_map(|root| self.prune(root))
            .collect()
    }

    /// Post-order prune: children are filtered first, then the node is kept
    /// if it matches or anything below it survived.
    fn prune(&self, node: &FaqNode) -> Option<FaqNode> {
        let children: Vec<FaqNode> = node
            .children
            .iter()
            .filter_map(|child| self.prune(child))
            .collect();

        if !children.is_empty() || self.matches(node) {
            let mut kept = node.clone_shallow();
            kept.children = children;
            Some(kept)
        } else {
            None
        }
    }
}

impl FaqNode {
    /// Clones everything except the children.
    fn clone_shallow(&self) -> Self {
        Self {
            question_id: self.question_id.clone(),
            question_text: self.question_text.clone(),
            answer_text: self.answer_text.clone(),
            issue_type: self.issue_type.clone(),
            sub_category: self.sub_category.clone(),
            node_type: self.node_type,
            parent_question_id: self.parent_question_id.clone(),
            children: Vec::new(),
            next_questions: self.next_questions.clone(),
            escalation_allowed: self.escalation_allowed,
            escalation_label: self.escalation_label.clone(),
            priority: self.priority,
            keywords: self.keywords.clone(),
            is_active: self.is_active,
            version: self.version,
            created_by: self.created_by.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
