//! The in-memory FAQ forest.
//!
//! The [`FaqStore`] knows nothing about files or HTTP. It owns every tree of
//! questions, grouped by issue type, and keeps the tree invariants:
//!
//! - every node's `type` tag matches its linkage
//! - children are sorted by priority, ties in insertion order
//! - a question with children cannot be deleted
//! - no question is its own ancestor
//!
//! Every operation validates first and mutates second, so a returned error
//! means nothing changed.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::domain::{
    Error, FaqNode, IssueType, NewNode, NodePatch, NodeType, QuestionId, Text, TreeFilter,
    ValidationError,
    filter::Matcher,
    flatten::Flatten,
    node::{insert_sorted, normalize_keywords, sort_siblings},
    walk::{self, Walk},
};

/// Values used when a create request leaves them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Recorded as `created_by`.
    pub author: String,
    /// Used as `escalation_label` when escalation is allowed.
    pub escalation_label: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            author: "admin".to_string(),
            escalation_label: "Contact support".to_string(),
        }
    }
}

/// An in-memory forest of FAQ trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaqStore {
    roots: Vec<FaqNode>,
    defaults: Defaults,
}

impl FaqStore {
    /// Creates an empty store that fills in the given defaults.
    #[must_use]
    pub const fn with_defaults(defaults: Defaults) -> Self {
        Self {
            roots: Vec::new(),
            defaults,
        }
    }

    /// Wraps an existing forest, such as one read from disk.
    ///
    /// The forest is taken as-is; check it with
    /// [`violations`](Self::violations) before relying on the invariants.
    #[must_use]
    pub const fn from_roots(roots: Vec<FaqNode>, defaults: Defaults) -> Self {
        Self { roots, defaults }
    }

    /// Consumes the store, returning its forest.
    #[must_use]
    pub fn into_roots(self) -> Vec<FaqNode> {
        self.roots
    }

    /// The root questions of every tree, in display order.
    #[must_use]
    pub fn roots(&self) -> &[FaqNode] {
        &self.roots
    }

    pub(crate) fn roots_mut(&mut self) -> &mut Vec<FaqNode> {
        &mut self.roots
    }

    /// The defaults applied to new questions.
    #[must_use]
    pub const fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Total number of questions in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.iter().map(FaqNode::subtree_len).sum()
    }

    /// Whether the forest holds no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order iterator over every question.
    pub fn iter(&self) -> impl Iterator<Item = &FaqNode> + '_ {
        Walk::new(&self.roots).map(|visit| visit.node)
    }

    /// Looks up a question by id.
    #[must_use]
    pub fn get(&self, question_id: &str) -> Option<&FaqNode> {
        self.iter()
            .find(|node| node.question_id.as_str() == question_id)
    }

    /// The distinct issue types that have at least one tree, sorted.
    #[must_use]
    pub fn issue_types(&self) -> Vec<&IssueType> {
        self.grouped().into_keys().collect()
    }

    /// Root questions keyed by issue type.
    #[must_use]
    pub fn grouped(&self) -> BTreeMap<&IssueType, Vec<&FaqNode>> {
        let mut groups: BTreeMap<&IssueType, Vec<&FaqNode>> = BTreeMap::new();
        for root in &self.roots {
            groups.entry(&root.issue_type).or_default().push(root);
        }
        groups
    }

    /// The chain of questions from the root down to `question_id`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such question exists.
    pub fn ancestors(&self, question_id: &QuestionId) -> Result<Vec<&FaqNode>, Error> {
        let path = self.locate(question_id)?;
        Ok((1..=path.len())
            .map(|depth| walk::node_at(&self.roots, &path[..depth]))
            .collect())
    }

    /// Returns a filtered copy of the forest.
    ///
    /// A question is kept if it matches or if anything below it matches, so
    /// the path from a root to every match stays intact. Siblings that do
    /// not lead to a match are dropped.
    #[must_use]
    #[instrument(level = "debug", skip(self))]
    pub fn get_tree(&self, filter: &TreeFilter) -> Vec<FaqNode> {
        Matcher::new(filter).prune_forest(&self.roots)
    }

    /// Flattened, indented listing of the forest.
    ///
    /// With `exclude`, the subtree rooted at that question is left out.
    #[must_use]
    pub fn flatten<'a>(&'a self, exclude: Option<&'a QuestionId>) -> Flatten<'a> {
        let walk = Walk::new(&self.roots);
        Flatten::new(match exclude {
            Some(id) => walk.skipping(id.as_str()),
            None => walk,
        })
    }

    /// Creates a question.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the question or answer is blank, a
    /// root has no issue type, the parent does not exist, or a child names an
    /// issue type other than its parent's.
    #[instrument(skip(self, input), fields(parent = ?input.parent_question_id))]
    pub fn create_node(&mut self, input: NewNode) -> Result<FaqNode, Error> {
        let question_text = Text::for_field(&input.question_text, "question_text")
            .map_err(ValidationError::from)?;
        let answer_text =
            Text::for_field(&input.answer_text, "answer_text").map_err(ValidationError::from)?;
        let given_issue_type = input
            .issue_type
            .as_deref()
            .map(IssueType::new)
            .transpose()
            .map_err(ValidationError::from)?;

        let (parent_path, issue_type) = match &input.parent_question_id {
            Some(parent_id) => {
                let path = walk::locate(&self.roots, parent_id)
                    .ok_or_else(|| ValidationError::ParentNotFound(parent_id.clone()))?;
                let inherited = walk::node_at(&self.roots, &path).issue_type.clone();
                if let Some(given) = given_issue_type {
                    if given != inherited {
                        return Err(ValidationError::IssueTypeConflict { given, inherited }.into());
                    }
                }
                (Some(path), inherited)
            }
            None => (
                None,
                given_issue_type.ok_or(ValidationError::MissingIssueType)?,
            ),
        };

        let priority = input.priority.unwrap_or_else(|| {
            let siblings: &[FaqNode] = match &parent_path {
                Some(path) => &walk::node_at(&self.roots, path).children,
                None => &self.roots,
            };
            next_priority(
                siblings
                    .iter()
                    .filter(|sibling| sibling.issue_type == issue_type),
            )
        });

        let escalation_label = match input.escalation_label {
            Some(label) if !label.trim().is_empty() => label.trim().to_string(),
            _ if input.escalation_allowed => self.defaults.escalation_label.clone(),
            _ => String::new(),
        };
        let created_by = input
            .created_by
            .map(|author| author.trim().to_string())
            .filter(|author| !author.is_empty())
            .unwrap_or_else(|| self.defaults.author.clone());

        let now = Utc::now();
        let node = FaqNode {
            question_id: QuestionId::generate(),
            question_text,
            answer_text,
            issue_type,
            sub_category: input.sub_category.and_then(non_blank),
            node_type: NodeType::derive(parent_path.is_some(), false),
            parent_question_id: input.parent_question_id,
            children: Vec::new(),
            next_questions: input.next_questions,
            escalation_allowed: input.escalation_allowed,
            escalation_label,
            priority,
            keywords: normalize_keywords(input.keywords),
            is_active: input.is_active.unwrap_or(true),
            version: 1,
            created_by,
            created_at: now,
            updated_at: now,
        };

        match parent_path {
            Some(path) => {
                let parent = walk::node_at_mut(&mut self.roots, &path);
                parent.insert_child(node.clone());
                if parent.refresh_type() {
                    debug!(parent = %parent.question_id, "parent is now a followup");
                }
            }
            None => insert_sorted(&mut self.roots, node.clone()),
        }

        debug!(question_id = %node.question_id, "created question");
        Ok(node)
    }

    /// Applies a partial update and bumps the version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the question does not exist, or
    /// [`Error::Validation`] if the patch blanks a text field or changes an
    /// immutable field.
    #[instrument(skip(self, patch))]
    pub fn update_node(
        &mut self,
        question_id: &QuestionId,
        patch: NodePatch,
    ) -> Result<FaqNode, Error> {
        let path = self.locate(question_id)?;
        let current = walk::node_at(&self.roots, &path);

        if patch.question_id.as_ref().is_some_and(|id| id != question_id) {
            return Err(ValidationError::Immutable("question_id").into());
        }
        if patch
            .parent_question_id
            .as_ref()
            .is_some_and(|parent| parent != &current.parent_question_id)
        {
            return Err(ValidationError::Immutable("parent_question_id").into());
        }
        if let Some(issue_type) = &patch.issue_type {
            if IssueType::new(issue_type).ok().as_ref() != Some(&current.issue_type) {
                return Err(ValidationError::Immutable("issue_type").into());
            }
        }
        if patch
            .created_by
            .as_deref()
            .is_some_and(|author| author.trim() != current.created_by)
        {
            return Err(ValidationError::Immutable("created_by").into());
        }

        let question_text = patch
            .question_text
            .as_deref()
            .map(|text| Text::for_field(text, "question_text"))
            .transpose()
            .map_err(ValidationError::from)?;
        let answer_text = patch
            .answer_text
            .as_deref()
            .map(|text| Text::for_field(text, "answer_text"))
            .transpose()
            .map_err(ValidationError::from)?;

        let priority_changed = patch
            .priority
            .is_some_and(|priority| priority != current.priority);

        let node = walk::node_at_mut(&mut self.roots, &path);
        if let Some(text) = question_text {
            node.question_text = text;
        }
        if let Some(text) = answer_text {
            node.answer_text = text;
        }
        if let Some(sub_category) = patch.sub_category {
            node.sub_category = sub_category.and_then(non_blank);
        }
        if let Some(priority) = patch.priority {
            node.priority = priority;
        }
        if let Some(is_active) = patch.is_active {
            node.is_active = is_active;
        }
        if let Some(escalation_allowed) = patch.escalation_allowed {
            node.escalation_allowed = escalation_allowed;
        }
        if let Some(label) = patch.escalation_label {
            node.escalation_label = label.trim().to_string();
        }
        if node.escalation_allowed && node.escalation_label.is_empty() {
            node.escalation_label.clone_from(&self.defaults.escalation_label);
        }
        if let Some(keywords) = patch.keywords {
            node.keywords = normalize_keywords(keywords);
        }
        if let Some(next_questions) = patch.next_questions {
            node.next_questions = next_questions;
        }
        node.touch();
        let updated = node.clone();

        if priority_changed {
            sort_siblings(walk::siblings_mut(&mut self.roots, &path));
        }

        debug!(version = updated.version, "updated question");
        Ok(updated)
    }

    /// Deletes a question that has no children.
    ///
    /// If it was the last child of its parent, the parent becomes a leaf
    /// (or stays a root).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the question does not exist, or
    /// [`Error::HasChildren`] if it still has sub-questions.
    #[instrument(skip(self))]
    pub fn delete_node(&mut self, question_id: &QuestionId) -> Result<FaqNode, Error> {
        let path = self.locate(question_id)?;
        let children = walk::node_at(&self.roots, &path).children.len();
        if children > 0 {
            return Err(Error::HasChildren {
                question_id: question_id.clone(),
                children,
            });
        }

        let (&index, parent_path) = path.split_last().expect("located paths are never empty");
        let removed = if parent_path.is_empty() {
            self.roots.remove(index)
        } else {
            let parent = walk::node_at_mut(&mut self.roots, parent_path);
            let removed = parent.children.remove(index);
            if parent.refresh_type() {
                debug!(parent = %parent.question_id, "parent is now a leaf");
            }
            removed
        };

        debug!("deleted question");
        Ok(removed)
    }

    /// Flips the active flag of one question and bumps its version.
    ///
    /// Parents and children are not affected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the question does not exist.
    #[instrument(skip(self))]
    pub fn toggle_status(&mut self, question_id: &QuestionId) -> Result<FaqNode, Error> {
        let path = self.locate(question_id)?;
        let node = walk::node_at_mut(&mut self.roots, &path);
        node.is_active = !node.is_active;
        node.touch();
        debug!(is_active = node.is_active, "toggled question");
        Ok(node.clone())
    }

    /// Moves a question, with its subtree, under a new parent, or makes it a
    /// root when `new_parent` is `None`.
    ///
    /// The moved subtree takes on the new parent's issue type and the moved
    /// question is placed after its new siblings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if either question does not exist, or
    /// [`Error::CircularReference`] if the new parent is the question itself
    /// or one of its descendants.
    #[instrument(skip(self))]
    pub fn move_node(
        &mut self,
        question_id: &QuestionId,
        new_parent: Option<&QuestionId>,
    ) -> Result<FaqNode, Error> {
        let path = self.locate(question_id)?;
        let current_parent = walk::node_at(&self.roots, &path)
            .parent_question_id
            .clone();

        if let Some(parent_id) = new_parent {
            let parent_path = self.locate(parent_id)?;
            if parent_path.starts_with(&path) {
                return Err(Error::CircularReference {
                    question_id: question_id.clone(),
                    parent: parent_id.clone(),
                });
            }
        }

        if current_parent.as_ref() == new_parent {
            debug!("question already has this parent");
            return Ok(walk::node_at(&self.roots, &path).clone());
        }

        // Detach. Indices of the new parent may shift, so it is located
        // again afterwards.
        let mut node = {
            let (&index, old_parent_path) =
                path.split_last().expect("located paths are never empty");
            if old_parent_path.is_empty() {
                self.roots.remove(index)
            } else {
                let old_parent = walk::node_at_mut(&mut self.roots, old_parent_path);
                let node = old_parent.children.remove(index);
                old_parent.refresh_type();
                node
            }
        };

        node.parent_question_id = new_parent.cloned();
        node.refresh_type();
        node.touch();

        match new_parent {
            Some(parent_id) => {
                let parent_path =
                    walk::locate(&self.roots, parent_id).expect("parent is outside the moved subtree");
                let parent = walk::node_at_mut(&mut self.roots, &parent_path);
                node.retag(&parent.issue_type.clone());
                node.priority = next_priority(parent.children.iter());
                let moved = node.clone();
                parent.insert_child(node);
                parent.refresh_type();
                Ok(moved)
            }
            None => {
                node.priority = next_priority(
                    self.roots
                        .iter()
                        .filter(|root| root.issue_type == node.issue_type),
                );
                let moved = node.clone();
                insert_sorted(&mut self.roots, node);
                Ok(moved)
            }
        }
    }

    fn locate(&self, question_id: &QuestionId) -> Result<walk::Path, Error> {
        walk::locate(&self.roots, question_id).ok_or_else(|| Error::NotFound(question_id.clone()))
    }
}

/// One more than the highest priority among `siblings`, or 1 if there are
/// none.
fn next_priority<'a>(siblings: impl Iterator<Item = &'a FaqNode>) -> i64 {
    siblings
        .map(|sibling| sibling.priority)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(store: &mut FaqStore, question: &str, issue_type: &str) -> FaqNode {
        store
            .create_node(NewNode::root(question, "An answer.", issue_type))
            .unwrap()
    }

    fn child(store: &mut FaqStore, question: &str, parent: &FaqNode) -> FaqNode {
        store
            .create_node(NewNode::child(question, "An answer.", parent.question_id.clone()))
            .unwrap()
    }

    /// Every structural invariant, checked over the whole forest.
    fn assert_invariants(store: &FaqStore) {
        assert!(store.violations().is_empty(), "{:?}", store.violations());
        let total = store.len();
        for node in store.iter() {
            let mut steps = 0;
            let mut cursor = node.parent_question_id.clone();
            while let Some(id) = cursor {
                steps += 1;
                assert!(steps <= total, "cycle above {}", node.question_id);
                cursor = store.get(&id).unwrap().parent_question_id.clone();
            }
        }
    }

    #[test]
    fn create_root() {
        let mut store = FaqStore::default();
        let node = store
            .create_node(
                NewNode::root("How do I track my order?", "From your account.", "order")
                    .with_priority(1),
            )
            .unwrap();

        assert_eq!(node.node_type, NodeType::Root);
        assert_eq!(node.version, 1);
        assert_eq!(node.priority, 1);
        assert!(node.is_active);
        assert_eq!(node.created_by, "admin");
        assert_eq!(store.get(&node.question_id), Some(&node));
        assert_invariants(&store);
    }

    #[test]
    fn child_flips_parent_to_followup() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "How do I track my order?", "order");
        let c = child(&mut store, "What if tracking shows no updates?", &r);
        let g = child(&mut store, "Still nothing after a week?", &c);

        assert_eq!(c.node_type, NodeType::Leaf);
        assert_eq!(c.issue_type.as_str(), "order");
        assert_eq!(store.get(&r.question_id).unwrap().node_type, NodeType::Root);
        assert_eq!(
            store.get(&c.question_id).unwrap().node_type,
            NodeType::Followup
        );
        assert_eq!(store.get(&g.question_id).unwrap().node_type, NodeType::Leaf);
        assert_invariants(&store);
    }

    #[test]
    fn creating_a_child_leaves_parent_version_alone() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        child(&mut store, "Child", &r);
        assert_eq!(store.get(&r.question_id).unwrap().version, 1);
    }

    #[test]
    fn default_priority_follows_siblings() {
        let mut store = FaqStore::default();
        let a = store
            .create_node(NewNode::root("A", "a", "order").with_priority(7))
            .unwrap();
        let b = root(&mut store, "B", "order");
        let other = root(&mut store, "C", "payment");
        let c1 = child(&mut store, "C1", &a);
        let c2 = child(&mut store, "C2", &a);

        assert_eq!(b.priority, 8);
        assert_eq!(other.priority, 1);
        assert_eq!(c1.priority, 1);
        assert_eq!(c2.priority, 2);
    }

    #[test]
    fn create_rejects_blank_text() {
        let mut store = FaqStore::default();
        let err = store
            .create_node(NewNode::root("   ", "answer", "order"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::Validation(ValidationError::Blank(crate::domain::BlankError(
                "question_text"
            )))
        );

        let err = store
            .create_node(NewNode::root("question", "", "order"))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::Blank(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn create_rejects_unknown_parent() {
        let mut store = FaqStore::default();
        let missing = QuestionId::generate();
        let err = store
            .create_node(NewNode::child("Q", "A", missing.clone()))
            .unwrap_err();
        assert_eq!(
            err,
            Error::Validation(ValidationError::ParentNotFound(missing))
        );
    }

    #[test]
    fn create_root_requires_issue_type() {
        let mut store = FaqStore::default();
        let input = NewNode {
            question_text: "Q".to_string(),
            answer_text: "A".to_string(),
            ..NewNode::default()
        };
        assert_eq!(
            store.create_node(input).unwrap_err(),
            Error::Validation(ValidationError::MissingIssueType)
        );
    }

    #[test]
    fn child_cannot_change_issue_type() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let mut input = NewNode::child("Q", "A", r.question_id.clone());
        input.issue_type = Some("payment".to_string());
        let err = store.create_node(input).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::IssueTypeConflict { .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn escalation_label_defaults_when_allowed() {
        let mut store = FaqStore::default();
        let mut input = NewNode::root("Q", "A", "order");
        input.escalation_allowed = true;
        let node = store.create_node(input).unwrap();
        assert_eq!(node.escalation_label, "Contact support");

        let plain = root(&mut store, "Q2", "order");
        assert_eq!(plain.escalation_label, "");
    }

    #[test]
    fn enabling_escalation_fills_in_default_label() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Q", "order");

        let patch = NodePatch {
            escalation_allowed: Some(true),
            ..NodePatch::default()
        };
        let updated = store.update_node(&r.question_id, patch).unwrap();
        assert!(updated.escalation_allowed);
        assert_eq!(updated.escalation_label, "Contact support");

        let patch = NodePatch {
            escalation_label: Some("Call us".to_string()),
            ..NodePatch::default()
        };
        let updated = store.update_node(&r.question_id, patch).unwrap();
        assert_eq!(updated.escalation_label, "Call us");
    }

    #[test]
    fn update_applies_patch_and_bumps_version_once() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let other = root(&mut store, "Other", "order");

        let updated = store
            .update_node(
                &r.question_id,
                NodePatch::default()
                    .answer_text("A better answer.")
                    .keywords(vec!["Delivery".to_string()]),
            )
            .unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.answer_text.as_str(), "A better answer.");
        assert_eq!(updated.keywords, ["delivery"]);
        assert_eq!(updated.question_text.as_str(), "Root");
        assert_eq!(store.get(&other.question_id).unwrap().version, 1);
    }

    #[test]
    fn update_rejects_immutable_changes() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");

        let cases = [
            (
                NodePatch {
                    question_id: Some(QuestionId::generate()),
                    ..NodePatch::default()
                },
                "question_id",
            ),
            (
                NodePatch {
                    parent_question_id: Some(Some(QuestionId::generate())),
                    ..NodePatch::default()
                },
                "parent_question_id",
            ),
            (
                NodePatch {
                    issue_type: Some("payment".to_string()),
                    ..NodePatch::default()
                },
                "issue_type",
            ),
            (
                NodePatch {
                    created_by: Some("someone else".to_string()),
                    ..NodePatch::default()
                },
                "created_by",
            ),
        ];

        for (patch, field) in cases {
            let err = store.update_node(&r.question_id, patch).unwrap_err();
            assert_eq!(err, Error::Validation(ValidationError::Immutable(field)));
        }
        assert_eq!(store.get(&r.question_id).unwrap(), &r);
    }

    #[test]
    fn update_accepts_unchanged_immutable_fields() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let patch = NodePatch {
            question_id: Some(r.question_id.clone()),
            parent_question_id: Some(None),
            issue_type: Some("ORDER".to_string()),
            created_by: Some("admin".to_string()),
            ..NodePatch::default()
        }
        .question_text("Renamed");

        let updated = store.update_node(&r.question_id, patch).unwrap();
        assert_eq!(updated.question_text.as_str(), "Renamed");
    }

    #[test]
    fn update_rejects_blank_text_without_mutating() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let err = store
            .update_node(
                &r.question_id,
                NodePatch::default().priority(9).answer_text(" "),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::Blank(_))));
        assert_eq!(store.get(&r.question_id).unwrap(), &r);
    }

    #[test]
    fn update_missing_is_not_found() {
        let mut store = FaqStore::default();
        let id = QuestionId::generate();
        assert_eq!(
            store.update_node(&id, NodePatch::default()).unwrap_err(),
            Error::NotFound(id)
        );
    }

    #[test]
    fn priority_change_resorts_siblings() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let first = child(&mut store, "First", &r);
        child(&mut store, "Second", &r);

        store
            .update_node(&first.question_id, NodePatch::default().priority(10))
            .unwrap();

        let order: Vec<_> = store.roots()[0]
            .children
            .iter()
            .map(|c| c.question_text.as_str())
            .collect();
        assert_eq!(order, ["Second", "First"]);
        assert_invariants(&store);
    }

    #[test]
    fn delete_with_children_fails_and_changes_nothing() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "How do I track my order?", "order");
        child(&mut store, "What if tracking shows no updates?", &r);
        let before = store.clone();

        let err = store.delete_node(&r.question_id).unwrap_err();
        assert_eq!(
            err,
            Error::HasChildren {
                question_id: r.question_id.clone(),
                children: 1
            }
        );
        assert!(err.to_string().contains("delete the children first"));
        assert_eq!(store, before);
    }

    #[test]
    fn deleting_last_child_makes_parent_a_leaf() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let c = child(&mut store, "Child", &r);
        let g = child(&mut store, "Grandchild", &c);

        store.delete_node(&g.question_id).unwrap();
        assert_eq!(store.get(&c.question_id).unwrap().node_type, NodeType::Leaf);
        assert_invariants(&store);
    }

    #[test]
    fn delete_child_then_root() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let c = child(&mut store, "Child", &r);

        store.delete_node(&c.question_id).unwrap();
        assert!(store.get(&r.question_id).unwrap().children.is_empty());
        store.delete_node(&r.question_id).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut store = FaqStore::default();
        let id = QuestionId::generate();
        assert_eq!(store.delete_node(&id).unwrap_err(), Error::NotFound(id));
    }

    #[test]
    fn toggle_twice_restores_flag_and_bumps_version_twice() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let c = child(&mut store, "Child", &r);

        let once = store.toggle_status(&r.question_id).unwrap();
        assert!(!once.is_active);
        assert_eq!(once.version, 2);
        assert!(store.get(&c.question_id).unwrap().is_active);

        let twice = store.toggle_status(&r.question_id).unwrap();
        assert!(twice.is_active);
        assert_eq!(twice.version, 3);
        assert_eq!(store.get(&c.question_id).unwrap().version, 1);
    }

    #[test]
    fn move_under_descendant_is_circular() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let c = child(&mut store, "Child", &r);
        let g = child(&mut store, "Grandchild", &c);
        let before = store.clone();

        for target in [&g, &c, &r] {
            let err = store
                .move_node(&r.question_id, Some(&target.question_id))
                .unwrap_err();
            assert!(matches!(err, Error::CircularReference { .. }));
        }
        assert_eq!(store, before);
    }

    #[test]
    fn move_reparents_and_recomputes_types() {
        let mut store = FaqStore::default();
        let order = root(&mut store, "Order", "order");
        let payment = root(&mut store, "Payment", "payment");
        let c = child(&mut store, "Child", &order);
        child(&mut store, "Grandchild", &c);

        let moved = store
            .move_node(&c.question_id, Some(&payment.question_id))
            .unwrap();

        assert_eq!(moved.parent_question_id, Some(payment.question_id.clone()));
        assert_eq!(moved.version, 2);
        assert_eq!(moved.issue_type.as_str(), "payment");
        assert!(moved.children.iter().all(|g| g.issue_type.as_str() == "payment"));
        assert!(store.get(&order.question_id).unwrap().children.is_empty());
        assert_invariants(&store);
    }

    #[test]
    fn move_to_root_and_back() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let c = child(&mut store, "Child", &r);

        let promoted = store.move_node(&c.question_id, None).unwrap();
        assert_eq!(promoted.node_type, NodeType::Root);
        assert_eq!(promoted.priority, 2);
        assert_eq!(store.roots().len(), 2);
        assert_invariants(&store);

        let demoted = store
            .move_node(&c.question_id, Some(&r.question_id))
            .unwrap();
        assert_eq!(demoted.node_type, NodeType::Leaf);
        assert_eq!(store.roots().len(), 1);
        assert_invariants(&store);
    }

    #[test]
    fn ancestors_run_from_root() {
        let mut store = FaqStore::default();
        let r = root(&mut store, "Root", "order");
        let c = child(&mut store, "Child", &r);
        let g = child(&mut store, "Grandchild", &c);

        let chain: Vec<_> = store
            .ancestors(&g.question_id)
            .unwrap()
            .into_iter()
            .map(|n| n.question_text.as_str())
            .collect();
        assert_eq!(chain, ["Root", "Child", "Grandchild"]);
    }

    #[test]
    fn grouped_by_issue_type() {
        let mut store = FaqStore::default();
        root(&mut store, "A", "order");
        root(&mut store, "B", "payment");
        root(&mut store, "C", "order");

        let groups = store.grouped();
        let issue_types = store.issue_types();
        let keys: Vec<_> = issue_types.iter().map(|t| t.as_str()).collect();
        assert_eq!(keys, ["order", "payment"]);
        assert_eq!(groups.values().map(Vec::len).collect::<Vec<_>>(), [2, 1]);
    }

    #[test]
    fn end_to_end_scenario() {
        let mut store = FaqStore::default();
        let r = store
            .create_node(
                NewNode::root("How do I track my order?", "From the orders page.", "order")
                    .with_priority(1),
            )
            .unwrap();
        assert_eq!((r.node_type, r.version), (NodeType::Root, 1));

        let c = store
            .create_node(NewNode::child(
                "What if tracking shows no updates?",
                "Allow 24 hours.",
                r.question_id.clone(),
            ))
            .unwrap();
        assert_eq!(c.node_type, NodeType::Leaf);

        let filtered = store.get_tree(&TreeFilter::search("tracking"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].children.len(), 1);

        assert!(matches!(
            store.delete_node(&r.question_id),
            Err(Error::HasChildren { .. })
        ));
        store.delete_node(&c.question_id).unwrap();
        store.delete_node(&r.question_id).unwrap();
        assert!(store.is_empty());
    }
}
