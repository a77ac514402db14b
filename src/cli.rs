use std::path::PathBuf;

mod edit;
mod serve;
mod show;
mod terminal;
mod tree;
mod validate;

use clap::ArgAction;
use edit::{Create, Update};
use faqtree::{QuestionId, Workspace};
use serve::Serve;
use show::Show;
use tracing::instrument;
use tree::{Flat, Tree};
use validate::Validate;

use self::terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the FAQ workspace
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Tree(Tree::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Initialize a new FAQ workspace
    Init,

    /// Show the FAQ forest (default)
    Tree(Tree),

    /// List every question with indented display text
    Flat(Flat),

    /// Show detailed information about a question
    Show(Show),

    /// Create a new question
    Create(Create),

    /// Update fields of a question
    Update(Update),

    /// Delete a question that has no children
    Delete(Delete),

    /// Flip a question between active and inactive
    Toggle(Toggle),

    /// Attach a question to a new parent, or make it a root
    Move(Move),

    /// Check the forest for broken structure
    Validate(Validate),

    /// Serve the forest over HTTP
    Serve(Serve),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init => Init::run(root)?,
            Self::Tree(command) => command.run(root)?,
            Self::Flat(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Create(command) => command.run(root)?,
            Self::Update(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::Toggle(command) => command.run(root)?,
            Self::Move(command) => command.run(root)?,
            Self::Validate(command) => command.run(root)?,
            Self::Serve(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::init(root)?;

        println!(
            "Initialized FAQ workspace in {}",
            workspace.root().display()
        );
        println!("  Created: .faq/config.toml");
        println!("  Created: faq.yaml");
        println!();
        println!("Next steps:");
        println!(
            "  faq create --issue-type billing --question \"How do refunds work?\" --answer \"...\""
        );

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The id of the question to delete
    question_id: QuestionId,
}

impl Delete {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(root)?;
        let removed = workspace.delete_node(&self.question_id)?;

        println!(
            "{}",
            format!("✅ Deleted {}: {}", removed.question_id, removed.question_text).success()
        );
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Toggle {
    /// The id of the question to toggle
    question_id: QuestionId,
}

impl Toggle {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(root)?;
        let node = workspace.toggle_status(&self.question_id)?;

        let status = if node.is_active {
            "active".success()
        } else {
            "inactive".warning()
        };
        println!("{} is now {status}", node.question_id);
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Move {
    /// The id of the question to move
    question_id: QuestionId,

    /// The new parent
    #[arg(long, short, required_unless_present = "detach")]
    parent: Option<QuestionId>,

    /// Make the question the root of its own tree
    #[arg(long, conflicts_with = "parent")]
    detach: bool,
}

impl Move {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut workspace = Workspace::open(root)?;
        let parent = if self.detach { None } else { self.parent.as_ref() };
        let node = workspace.move_node(&self.question_id, parent)?;

        match &node.parent_question_id {
            Some(parent) => println!(
                "{}",
                format!("✅ Moved {} under {parent}", node.question_id).success()
            ),
            None => println!(
                "{}",
                format!("✅ {} is now a root question", node.question_id).success()
            ),
        }
        Ok(())
    }
}
