//! Depth-first traversal of the forest.
//!
//! Lookups, flattening, and integrity checks all go through [`Walk`];
//! mutations locate their target with [`locate`] and then borrow it mutably
//! by index path.

use crate::domain::FaqNode;

/// A node reached by a [`Walk`], with its depth (roots are level 0).
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// The node.
    pub node: &'a FaqNode,
    /// Depth below its root.
    pub level: usize,
}

/// Lazy pre-order iterator over every node of a forest.
///
/// Cloning a walk restarts nothing: the clone continues from the same point.
/// Start a new walk to go round again.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<Visit<'a>>,
    skip: Option<&'a str>,
}

impl<'a> Walk<'a> {
    /// Walks every tree in `roots`, in order.
    #[must_use]
    pub fn new(roots: &'a [FaqNode]) -> Self {
        Self {
            stack: roots
                .iter()
                .rev()
                .map(|node| Visit { node, level: 0 })
                .collect(),
            skip: None,
        }
    }

    /// Omits the subtree rooted at `question_id`, including that node.
    #[must_use]
    pub const fn skipping(mut self, question_id: &'a str) -> Self {
        self.skip = Some(question_id);
        self
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let visit = self.stack.pop()?;
            if self.skip == Some(visit.node.question_id.as_str()) {
                continue;
            }
            self.stack.extend(visit.node.children.iter().rev().map(|node| Visit {
                node,
                level: visit.level + 1,
            }));
            return Some(visit);
        }
    }
}

/// Index path from the root list down to a node.
///
/// `[2, 0]` is the first child of the third root.
pub(crate) type Path = Vec<usize>;

/// Finds the index path of the node with the given id.
pub(crate) fn locate(roots: &[FaqNode], question_id: &str) -> Option<Path> {
    for (index, node) in roots.iter().enumerate() {
        if node.question_id.as_str() == question_id {
            return Some(vec![index]);
        }
        if let Some(mut path) = locate(&node.children, question_id) {
            path.insert(0, index);
            return Some(path);
        }
    }
    None
}

/// Borrows the node at `path`.
///
/// # Panics
///
/// Panics if `path` is empty or does not lead to a node.
pub(crate) fn node_at<'a>(roots: &'a [FaqNode], path: &[usize]) -> &'a FaqNode {
    let (first, rest) = path.split_first().expect("path must not be empty");
    rest.iter()
        .fold(&roots[*first], |node, &index| &node.children[index])
}

/// Mutably borrows the node at `path`.
///
/// # Panics
///
/// Panics if `path` is empty or does not lead to a node.
pub(crate) fn node_at_mut<'a>(roots: &'a mut [FaqNode], path: &[usize]) -> &'a mut FaqNode {
    let (first, rest) = path.split_first().expect("path must not be empty");
    rest.iter()
        .fold(&mut roots[*first], |node, &index| &mut node.children[index])
}

/// Mutably borrows the list that holds the node at `path`: the root list for
/// a root, otherwise the parent's children.
pub(crate) fn siblings_mut<'a>(roots: &'a mut Vec<FaqNode>, path: &[usize]) -> &'a mut Vec<FaqNode> {
    match path.split_last() {
        Some((_, [])) | None => roots,
        Some((_, parent)) => &mut node_at_mut(roots, parent).children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FaqStore, NewNode};

    fn sample() -> (FaqStore, Vec<String>) {
        let mut store = FaqStore::default();
        let a = store.create_node(NewNode::root("A", "a", "order")).unwrap();
        let a1 = store
            .create_node(NewNode::child("A1", "a", a.question_id.clone()))
            .unwrap();
        let a1x = store
            .create_node(NewNode::child("A1x", "a", a1.question_id.clone()))
            .unwrap();
        let a2 = store
            .create_node(NewNode::child("A2", "a", a.question_id.clone()))
            .unwrap();
        let b = store.create_node(NewNode::root("B", "b", "payment")).unwrap();
        let ids = [a, a1, a1x, a2, b]
            .into_iter()
            .map(|n| n.question_id.to_string())
            .collect();
        (store, ids)
    }

    #[test]
    fn walk_is_pre_order_with_levels() {
        let (store, _) = sample();
        let visited: Vec<_> = Walk::new(store.roots())
            .map(|v| (v.node.question_text.as_str(), v.level))
            .collect();
        assert_eq!(
            visited,
            [("A", 0), ("A1", 1), ("A1x", 2), ("A2", 1), ("B", 0)]
        );
    }

    #[test]
    fn walk_skips_whole_subtree() {
        let (store, ids) = sample();
        let visited: Vec<_> = Walk::new(store.roots())
            .skipping(&ids[1])
            .map(|v| v.node.question_text.as_str())
            .collect();
        assert_eq!(visited, ["A", "A2", "B"]);
    }

    #[test]
    fn locate_returns_index_path() {
        let (store, ids) = sample();
        assert_eq!(locate(store.roots(), &ids[2]), Some(vec![0, 0, 0]));
        assert_eq!(locate(store.roots(), &ids[3]), Some(vec![0, 1]));
        assert_eq!(locate(store.roots(), &ids[4]), Some(vec![1]));
        assert_eq!(locate(store.roots(), "missing"), None);

        let path = locate(store.roots(), &ids[3]).unwrap();
        assert_eq!(node_at(store.roots(), &path).question_text.as_str(), "A2");
    }
}
