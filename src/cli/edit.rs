use std::path::PathBuf;

use clap::Parser;
use faqtree::{NewNode, NodePatch, QuestionId, Workspace};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Create a new question")]
pub struct Create {
    /// The question text
    #[arg(long, short)]
    question: String,

    /// The answer text
    #[arg(long, short)]
    answer: String,

    /// The issue type of a new root question
    #[arg(long, short, required_unless_present = "parent")]
    issue_type: Option<String>,

    /// The question this one follows from; the issue type is inherited
    #[arg(long, short)]
    parent: Option<QuestionId>,

    /// Optional sub-category
    #[arg(long)]
    sub_category: Option<String>,

    /// Sort position among siblings (defaults to after the last sibling)
    #[arg(long, allow_negative_numbers = true)]
    priority: Option<i64>,

    /// Allow hand-off to human support from this question
    #[arg(long)]
    escalation: bool,

    /// Label of the hand-off action
    #[arg(long, requires = "escalation")]
    escalation_label: Option<String>,

    /// A search keyword (may be repeated)
    #[arg(long = "keyword", short)]
    keywords: Vec<String>,

    /// The author, if not the configured default
    #[arg(long)]
    created_by: Option<String>,
}

impl Create {
    fn into_new_node(self) -> NewNode {
        NewNode {
            question_text: self.question,
            answer_text: self.answer,
            issue_type: self.issue_type,
            parent_question_id: self.parent,
            sub_category: self.sub_category,
            priority: self.priority,
            escalation_allowed: self.escalation,
            escalation_label: self.escalation_label,
            keywords: self.keywords,
            created_by: self.created_by,
            ..NewNode::default()
        }
    }

    #[instrument(skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(root)?;
        let node = workspace.create_node(self.into_new_node())?;

        println!(
            "{}",
            format!("✅ Added {} question {}", node.node_type.as_str(), node.question_id).success()
        );
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Update fields of a question")]
pub struct Update {
    /// The id of the question to update
    question_id: QuestionId,

    /// New question text
    #[arg(long, short)]
    question: Option<String>,

    /// New answer text
    #[arg(long, short)]
    answer: Option<String>,

    /// New sub-category
    #[arg(long, conflicts_with = "clear_sub_category")]
    sub_category: Option<String>,

    /// Remove the sub-category
    #[arg(long)]
    clear_sub_category: bool,

    /// New sort position among siblings
    #[arg(long, allow_negative_numbers = true)]
    priority: Option<i64>,

    /// Set the active flag
    #[arg(long)]
    active: Option<bool>,

    /// Set whether hand-off to human support is allowed
    #[arg(long)]
    escalation: Option<bool>,

    /// New label of the hand-off action
    #[arg(long)]
    escalation_label: Option<String>,

    /// Replace the keywords (may be repeated)
    #[arg(long = "keyword", short)]
    keywords: Option<Vec<String>>,
}

impl Update {
    fn patch(&self) -> NodePatch {
        let sub_category = if self.clear_sub_category {
            Some(None)
        } else {
            self.sub_category.clone().map(Some)
        };
        NodePatch {
            question_text: self.question.clone(),
            answer_text: self.answer.clone(),
            sub_category,
            priority: self.priority,
            is_active: self.active,
            escalation_allowed: self.escalation,
            escalation_label: self.escalation_label.clone(),
            keywords: self.keywords.clone(),
            ..NodePatch::default()
        }
    }

    #[instrument(skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let patch = self.patch();
        if patch.is_empty() {
            anyhow::bail!("Nothing to update: pass at least one field to change");
        }

        let mut workspace = Workspace::open(root)?;
        let node = workspace.update_node(&self.question_id, patch)?;

        println!(
            "{}",
            format!("✅ Updated {} (version {})", node.question_id, node.version).success()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn root_needs_an_issue_type() {
        assert!(Create::try_parse_from(["create", "-q", "Q?", "-a", "A."]).is_err());
        assert!(Create::try_parse_from(["create", "-q", "Q?", "-a", "A.", "--parent", "q-1"]).is_ok());
    }

    #[test]
    fn create_flags_fill_the_request() {
        let create = Create::try_parse_from([
            "create",
            "--question",
            "How do refunds work?",
            "--answer",
            "Within 14 days.",
            "--issue-type",
            "billing",
            "--priority",
            "-1",
            "--escalation",
            "--keyword",
            "Refund",
            "--keyword",
            "money",
        ])
        .unwrap();
        let input = create.into_new_node();

        assert_eq!(input.issue_type.as_deref(), Some("billing"));
        assert_eq!(input.priority, Some(-1));
        assert!(input.escalation_allowed);
        assert_eq!(input.keywords, ["Refund", "money"]);
        assert!(input.parent_question_id.is_none());
    }

    #[test]
    fn update_clears_sub_category() {
        let update = Update::try_parse_from(["update", "q-1", "--clear-sub-category"]).unwrap();
        assert_eq!(update.patch().sub_category, Some(None));

        let update = Update::try_parse_from(["update", "q-1", "--sub-category", "cards"]).unwrap();
        assert_eq!(update.patch().sub_category, Some(Some("cards".to_string())));
    }

    #[test]
    fn update_without_fields_is_empty() {
        let update = Update::try_parse_from(["update", "q-1"]).unwrap();
        assert!(update.patch().is_empty());

        let update = Update::try_parse_from(["update", "q-1", "--active", "false"]).unwrap();
        assert_eq!(update.patch().is_active, Some(false));
    }
}
