use std::path::PathBuf;

use clap::Parser;
use faqtree::{FaqNode, FaqStore, QuestionId, TreeFilter, Workspace, domain::walk::Walk};
use tracing::instrument;

use super::terminal::{self, Colorize};

#[derive(Debug, Default, Parser)]
#[command(about = "Display the FAQ forest, optionally filtered")]
pub struct Tree {
    /// Keep questions whose question, answer, or keywords contain this text
    #[arg(long, short)]
    search: Option<String>,

    /// Only active questions
    #[arg(long, conflicts_with = "inactive")]
    active: bool,

    /// Only inactive questions
    #[arg(long)]
    inactive: bool,

    /// Only trees of this issue type
    #[arg(long)]
    issue_type: Option<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Tree {
    fn filter(&self) -> TreeFilter {
        let is_active = match (self.active, self.inactive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        TreeFilter {
            search_term: self.search.clone(),
            is_active,
            issue_type: self.issue_type.clone(),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        let forest = FaqStore::from_roots(
            workspace.store().get_tree(&self.filter()),
            workspace.store().defaults().clone(),
        );

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(forest.roots())?),
            OutputFormat::Pretty => print_forest(&forest),
        }
        Ok(())
    }
}

fn print_forest(forest: &FaqStore) {
    if forest.is_empty() {
        println!("{}", "No questions found".dim());
        return;
    }

    let width = terminal::terminal_width();
    for (issue_type, roots) in forest.grouped() {
        println!("\n{}", issue_type.as_str().to_uppercase().info());
        for root in roots {
            for visit in Walk::new(std::slice::from_ref(root)) {
                print_node(visit.node, visit.level, width);
            }
        }
    }
}

fn print_node(node: &FaqNode, level: usize, width: Option<usize>) {
    let line = terminal::clip(
        &format!(
            "{}{} {}",
            "  ".repeat(level + 1),
            node.question_text,
            node.question_id,
        ),
        width,
    );
    if node.is_active {
        println!("{line}");
    } else {
        println!("{}", format!("{line} (inactive)").dim());
    }
}

#[derive(Debug, Parser)]
#[command(about = "List every question as a flat, indented list")]
pub struct Flat {
    /// Leave out this question and everything below it
    #[arg(long)]
    exclude: Option<QuestionId>,
}

impl Flat {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        for entry in workspace.store().flatten(self.exclude.as_ref()) {
            println!("{}  {}", entry.question_id.as_str().dim(), entry.display_text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn flags_build_the_filter() {
        let tree =
            Tree::try_parse_from(["tree", "--search", "refund", "--inactive", "--issue-type", "Billing"])
                .unwrap();
        assert_eq!(
            tree.filter(),
            TreeFilter {
                search_term: Some("refund".to_string()),
                is_active: Some(false),
                issue_type: Some("Billing".to_string()),
            }
        );
    }

    #[test]
    fn no_flags_is_an_empty_filter() {
        let tree = Tree::try_parse_from(["tree"]).unwrap();
        assert_eq!(tree.filter(), TreeFilter::default());
    }

    #[test]
    fn active_and_inactive_conflict() {
        assert!(Tree::try_parse_from(["tree", "--active", "--inactive"]).is_err());
    }
}
