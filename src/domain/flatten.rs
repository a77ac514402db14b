//! Indented, flattened listing of the forest.
//!
//! Used by parent pickers: passing the id of the question being edited
//! leaves out its whole subtree, so a question cannot be offered as a parent
//! of itself.

use serde::Serialize;

use crate::domain::{
    QuestionId,
    walk::{Visit, Walk},
};

/// Number of characters of the question shown before truncating.
pub const DISPLAY_WIDTH: usize = 60;

const ELLIPSIS: &str = "...";

/// One line of a flattened forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatEntry {
    /// The question this line stands for.
    pub question_id: QuestionId,
    /// Indented, possibly truncated question text.
    pub display_text: String,
    /// Depth below the root.
    pub level: usize,
}

/// Lazy pre-order sequence of [`FlatEntry`] values.
///
/// Returned by [`FaqStore::flatten`](crate::FaqStore::flatten); call it again
/// to restart from the beginning.
#[derive(Debug, Clone)]
pub struct Flatten<'a> {
    walk: Walk<'a>,
}

impl<'a> Flatten<'a> {
    pub(crate) const fn new(walk: Walk<'a>) -> Self {
        Self { walk }
    }
}

impl Iterator for Flatten<'_> {
    type Item = FlatEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next().map(|Visit { node, level }| FlatEntry {
            question_id: node.question_id.clone(),
            display_text: display_text(&node.question_text, level),
            level,
        })
    }
}

/// Indents by two spaces per level and truncates to [`DISPLAY_WIDTH`]
/// characters.
#[must_use]
pub fn display_text(question: &str, level: usize) -> String {
    let indent = " ".repeat(level * 2);
    let mut chars = question.chars();
    let head: String = chars.by_ref().take(DISPLAY_WIDTH).collect();
    if chars.next().is_some() {
        format!("{indent}{head}{ELLIPSIS}")
    } else {
        format!("{indent}{head}")
    }
}
