use std::path::PathBuf;

use clap::Parser;
use faqtree::{Violation, Workspace};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check the forest for broken parent links, type tags, and ordering")]
pub struct Validate {
    /// Attempt automatic repair of fixable issues
    #[arg(long)]
    fix: bool,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

impl Validate {
    #[instrument(skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut workspace = Workspace::open_unchecked(root)?;
        let violations = workspace.store().violations();

        if violations.is_empty() {
            if !self.quiet {
                println!(
                    "{}",
                    format!(
                        "✅ {} question(s) across {} issue type(s), no issues found",
                        workspace.store().len(),
                        workspace.store().issue_types().len()
                    )
                    .success()
                );
            }
            return Ok(());
        }

        if !self.quiet {
            print_violations(&violations);
        }

        if !self.fix {
            let repairable = violations.iter().filter(|v| v.is_repairable()).count();
            if repairable > 0 && !self.quiet {
                println!(
                    "\n{}",
                    format!("{repairable} issue(s) can be fixed with 'faq validate --fix'").dim()
                );
            }
            anyhow::bail!("{} issue(s) found", violations.len());
        }

        let fixed = workspace.repair()?;
        let remaining = workspace.store().violations();
        if !self.quiet {
            println!("\n{}", format!("✅ Fixed {fixed} issue(s)").success());
        }

        if remaining.is_empty() {
            Ok(())
        } else {
            if !self.quiet {
                println!("\n{}", "Needs manual attention".warning());
                print_violations(&remaining);
            }
            anyhow::bail!("{} issue(s) could not be fixed", remaining.len());
        }
    }
}

fn print_violations(violations: &[Violation]) {
    for violation in violations {
        let marker = if violation.is_repairable() {
            "•".to_string()
        } else {
            "⚠️".warning()
        };
        println!("  {marker} {violation}");
    }
}
