use std::path::PathBuf;

use clap::Parser;
use faqtree::{FaqNode, FaqStore, QuestionId, Workspace};
use tracing::instrument;

use super::{terminal::Colorize, tree::OutputFormat};

#[derive(Debug, Parser)]
#[command(about = "Display detailed information about a question")]
pub struct Show {
    /// The id of the question to display
    question_id: QuestionId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::open(root)?;
        let store = workspace.store();

        let Some(node) = store.get(&self.question_id) else {
            anyhow::bail!("Question {} not found", self.question_id);
        };

        match self.output {
            OutputFormat::Pretty => output_pretty(store, node)?,
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(node)?),
        }
        Ok(())
    }
}

fn output_pretty(store: &FaqStore, node: &FaqNode) -> anyhow::Result<()> {
    println!("# {}", node.question_text);
    println!("{}\n", node.answer_text);

    println!("{}", "Metadata".dim());
    println!("  Id:         {}", node.question_id);
    println!("  Issue type: {}", node.issue_type);
    if let Some(sub_category) = &node.sub_category {
        println!("  Category:   {sub_category}");
    }
    println!("  Type:       {}", node.node_type.as_str());
    println!("  Priority:   {}", node.priority);
    let status = if node.is_active {
        "active".success()
    } else {
        "inactive".warning()
    };
    println!("  Status:     {status}");
    println!("  Version:    {}", node.version);
    println!("  Created:    {} by {}", node.created_at, node.created_by);
    println!("  Updated:    {}", node.updated_at);

    if node.escalation_allowed {
        println!("\n{}", "Escalation".dim());
        println!("  {}", node.escalation_label);
    }

    if !node.keywords.is_empty() {
        println!("\n{}", "Keywords".dim());
        println!("  {}", node.keywords.join(", "));
    }

    let ancestors = store.ancestors(&node.question_id)?;
    if let Some((_, above)) = ancestors.split_last() {
        if !above.is_empty() {
            println!("\n{}", "Path".dim());
            for (depth, ancestor) in above.iter().enumerate() {
                println!(
                    "  {}{} {}",
                    "  ".repeat(depth),
                    ancestor.question_text,
                    ancestor.question_id.as_str().dim()
                );
            }
        }
    }

    if !node.children.is_empty() {
        println!("\n{}", "Children".dim());
        for child in &node.children {
            println!(
                "  • {} {}",
                child.question_text,
                child.question_id.as_str().dim()
            );
        }
    }

    if !node.next_questions.is_empty() {
        println!("\n{}", "Suggested next".dim());
        for next in &node.next_questions {
            match store.get(next) {
                Some(next_node) => println!("  • {} {}", next_node.question_text, next.as_str().dim()),
                None => println!("  • {}", format!("{next} (missing)").warning()),
            }
        }
    }

    Ok(())
}
