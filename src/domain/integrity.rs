//! Integrity checks for forests that did not come from the store's own
//! operations, such as a hand-edited forest file.

use std::{collections::HashSet, fmt};

use crate::domain::{
    FaqNode, FaqStore, NodeType, QuestionId,
    node::sort_siblings,
    walk::Walk,
};

/// A broken invariant found in a forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two questions share an id.
    DuplicateId(QuestionId),
    /// A child's `parent_question_id` does not name the question it sits
    /// under (or a root names a parent).
    ParentMismatch {
        /// The offending question.
        question_id: QuestionId,
        /// The parent it records.
        recorded: Option<QuestionId>,
        /// The question it actually sits under.
        actual: Option<QuestionId>,
    },
    /// The stored `type` tag disagrees with the question's linkage.
    StaleType {
        /// The offending question.
        question_id: QuestionId,
        /// The stored tag.
        recorded: NodeType,
        /// The tag its linkage implies.
        expected: NodeType,
    },
    /// Children are not sorted by priority.
    Unsorted {
        /// The parent whose children are out of order, or `None` for the
        /// root list.
        parent: Option<QuestionId>,
    },
    /// A question sits under a parent of a different issue type.
    IssueTypeMismatch {
        /// The offending question.
        question_id: QuestionId,
    },
}

impl Violation {
    /// Whether [`FaqStore::repair`] can fix this without losing data.
    #[must_use]
    pub const fn is_repairable(&self) -> bool {
        !matches!(self, Self::DuplicateId(_))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate question id {id}"),
            Self::ParentMismatch {
                question_id,
                recorded,
                actual,
            } => write!(
                f,
                "question {question_id} records parent {} but sits under {}",
                display_parent(recorded.as_ref()),
                display_parent(actual.as_ref()),
            ),
            Self::StaleType {
                question_id,
                recorded,
                expected,
            } => write!(
                f,
                "question {question_id} is tagged '{}' but should be '{}'",
                recorded.as_str(),
                expected.as_str()
            ),
            Self::Unsorted { parent: Some(id) } => {
                write!(f, "children of question {id} are not sorted by priority")
            }
            Self::Unsorted { parent: None } => write!(f, "root questions are not sorted by priority"),
            Self::IssueTypeMismatch { question_id } => write!(
                f,
                "question {question_id} has a different issue type from its parent"
            ),
        }
    }
}

fn display_parent(parent: Option<&QuestionId>) -> String {
    parent.map_or_else(|| "none".to_string(), ToString::to_string)
}

impl FaqStore {
    /// Lists every broken invariant in the forest.
    ///
    /// A forest built only through the store's own operations has none.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        let mut seen = HashSet::new();
        for visit in Walk::new(self.roots()) {
            if !seen.insert(&visit.node.question_id) {
                violations.push(Violation::DuplicateId(visit.node.question_id.clone()));
            }
        }

        if !is_sorted(self.roots()) {
            violations.push(Violation::Unsorted { parent: None });
        }
        for root in self.roots() {
            check_node(root, None, &mut violations);
        }

        violations
    }

    /// Fixes every repairable violation: parent links, type tags, sibling
    /// order, and inherited issue types.
    ///
    /// Duplicate ids are left alone. Returns the number of violations that
    /// were fixed.
    pub fn repair(&mut self) -> usize {
        let before = self.violations().iter().filter(|v| v.is_repairable()).count();

        let roots = self.roots_mut();
        sort_siblings(roots);
        for root in roots.iter_mut() {
            repair_node(root, None);
        }

        let after = self.violations().iter().filter(|v| v.is_repairable()).count();
        before - after
    }
}

fn check_node(node: &FaqNode, parent: Option<&FaqNode>, violations: &mut Vec<Violation>) {
    let actual = parent.map(|p| &p.question_id);
    if node.parent_question_id.as_ref() != actual {
        violations.push(Violation::ParentMismatch {
            question_id: node.question_id.clone(),
            recorded: node.parent_question_id.clone(),
            actual: actual.cloned(),
        });
    }

    // The tag follows the node's position, not its recorded parent.
    let expected = NodeType::derive(parent.is_some(), !node.children.is_empty());
    if node.node_type != expected {
        violations.push(Violation::StaleType {
            question_id: node.question_id.clone(),
            recorded: node.node_type,
            expected,
        });
    }

    if parent.is_some_and(|p| p.issue_type != node.issue_type) {
        violations.push(Violation::IssueTypeMismatch {
            question_id: node.question_id.clone(),
        });
    }

    if !is_sorted(&node.children) {
        violations.push(Violation::Unsorted {
            parent: Some(node.question_id.clone()),
        });
    }

    for child in &node.children {
        check_node(child, Some(node), violations);
    }
}

fn repair_node(node: &mut FaqNode, parent: Option<&FaqNode>) {
    if let Some(parent) = parent {
        node.parent_question_id = Some(parent.question_id.clone());
        node.issue_type = parent.issue_type.clone();
    } else {
        node.parent_question_id = None;
    }
    node.refresh_type();
    sort_siblings(&mut node.children);

    // Children need a view of their parent while being mutated, so they are
    // taken out and put back.
    let mut children = std::mem::take(&mut node.children);
    for child in &mut children {
        repair_node(child, Some(&*node));
    }
    node.children = children;
}

fn is_sorted(siblings: &[FaqNode]) -> bool {
    siblings.windows(2).all(|pair| pair[0].priority <= pair[1].priority)
}
