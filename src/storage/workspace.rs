//! A filesystem backed FAQ forest
//!
//! The [`Workspace`] keeps the forest in `faq.yaml` at the workspace root and
//! its configuration in `.faq/config.toml`. It is a wrapper around the
//! filesystem agnostic [`FaqStore`]: every mutation is applied in memory and
//! then written back.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use nonempty::NonEmpty;
use tracing::instrument;

use crate::{
    domain::{
        Config, Error, FaqNode, FaqStore, NewNode, NodePatch, QuestionId, Violation,
    },
    storage::forest_file::{self, LoadError, SaveError},
};

/// Directory holding workspace metadata.
pub const META_DIR: &str = ".faq";

/// Name of the configuration file inside [`META_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Name of the forest file at the workspace root.
pub const FOREST_FILE: &str = "faq.yaml";

/// A filesystem backed FAQ forest.
#[derive(Debug)]
pub struct Workspace {
    /// The workspace root.
    root: PathBuf,
    config: Config,
    store: FaqStore,
}

impl Workspace {
    /// Creates a new workspace with a default configuration and an empty
    /// forest.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace is already initialised or the files
    /// cannot be written.
    #[instrument]
    pub fn init(root: PathBuf) -> Result<Self, InitError> {
        let meta = root.join(META_DIR);
        if meta.exists() {
            return Err(InitError::AlreadyInitialised(root));
        }
        fs::create_dir_all(&meta)?;

        let config = Config::default();
        config
            .save(&meta.join(CONFIG_FILE))
            .map_err(InitError::Config)?;

        let workspace = Self {
            store: FaqStore::with_defaults(config.defaults()),
            config,
            root,
        };
        if !workspace.forest_path().exists() {
            workspace.flush()?;
        }
        Ok(workspace)
    }

    /// Opens the workspace at `root`.
    ///
    /// When the configuration is `strict` (the default), a forest that breaks
    /// the tree invariants is refused.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest file cannot be read or parsed, or if
    /// it is inconsistent and the workspace is strict.
    #[instrument]
    pub fn open(root: PathBuf) -> Result<Self, OpenError> {
        let workspace = Self::open_unchecked(root)?;
        if workspace.config.strict {
            if let Some(violations) = NonEmpty::from_vec(workspace.store.violations()) {
                return Err(OpenError::Inconsistent {
                    path: workspace.forest_path(),
                    violations,
                });
            }
        }
        Ok(workspace)
    }

    /// Opens the workspace at `root` without checking the forest.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest file cannot be read or parsed.
    pub fn open_unchecked(root: PathBuf) -> Result<Self, LoadError> {
        let config = load_config(&root);
        let roots = forest_file::load(&root.join(FOREST_FILE))?;
        tracing::debug!("Loaded {} root question(s)", roots.len());
        Ok(Self {
            store: FaqStore::from_roots(roots, config.defaults()),
            config,
            root,
        })
    }

    /// The workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the forest file.
    #[must_use]
    pub fn forest_path(&self) -> PathBuf {
        self.root.join(FOREST_FILE)
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The in-memory forest.
    #[must_use]
    pub const fn store(&self) -> &FaqStore {
        &self.store
    }

    /// Creates a question and saves the forest.
    ///
    /// # Errors
    ///
    /// See [`FaqStore::create_node`]; also fails if the forest cannot be
    /// saved.
    pub fn create_node(&mut self, input: NewNode) -> Result<FaqNode, WorkspaceError> {
        self.mutate(|store| store.create_node(input))
    }

    /// Updates a question and saves the forest.
    ///
    /// # Errors
    ///
    /// See [`FaqStore::update_node`]; also fails if the forest cannot be
    /// saved.
    pub fn update_node(
        &mut self,
        question_id: &QuestionId,
        patch: NodePatch,
    ) -> Result<FaqNode, WorkspaceError> {
        self.mutate(|store| store.update_node(question_id, patch))
    }

    /// Deletes a childless question and saves the forest.
    ///
    /// # Errors
    ///
    /// See [`FaqStore::delete_node`]; also fails if the forest cannot be
    /// saved.
    pub fn delete_node(&mut self, question_id: &QuestionId) -> Result<FaqNode, WorkspaceError> {
        self.mutate(|store| store.delete_node(question_id))
    }

    /// Toggles a question's active flag and saves the forest.
    ///
    /// # Errors
    ///
    /// See [`FaqStore::toggle_status`]; also fails if the forest cannot be
    /// saved.
    pub fn toggle_status(&mut self, question_id: &QuestionId) -> Result<FaqNode, WorkspaceError> {
        self.mutate(|store| store.toggle_status(question_id))
    }

    /// Moves a question and saves the forest.
    ///
    /// # Errors
    ///
    /// See [`FaqStore::move_node`]; also fails if the forest cannot be
    /// saved.
    pub fn move_node(
        &mut self,
        question_id: &QuestionId,
        new_parent: Option<&QuestionId>,
    ) -> Result<FaqNode, WorkspaceError> {
        self.mutate(|store| store.move_node(question_id, new_parent))
    }

    /// Repairs the forest and saves it if anything changed.
    ///
    /// Returns the number of violations fixed.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest cannot be saved.
    pub fn repair(&mut self) -> Result<usize, SaveError> {
        let fixed = self.store.repair();
        if fixed > 0 {
            self.flush()?;
        }
        Ok(fixed)
    }

    /// Writes the forest to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest file cannot be written.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn flush(&self) -> Result<(), SaveError> {
        forest_file::save(&self.forest_path(), self.store.roots())
    }

    /// Applies `op` to the store and saves the result.
    ///
    /// If saving fails the in-memory forest is rolled back, so memory and
    /// disk never disagree.
    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut FaqStore) -> Result<T, Error>,
    ) -> Result<T, WorkspaceError> {
        let snapshot = self.store.clone();
        let value = op(&mut self.store)?;
        if let Err(e) = self.flush() {
            tracing::error!("Failed to save forest, rolling back: {e}");
            self.store = snapshot;
            return Err(e.into());
        }
        Ok(value)
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(META_DIR).join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Config::default();
    }
    Config::load(&path).unwrap_or_else(|e| {
        tracing::warn!("{e}; using defaults");
        Config::default()
    })
}

/// Errors that can occur when creating a workspace.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The workspace already has a metadata directory.
    #[error("workspace already initialised at {} (found existing {META_DIR} directory)", .0.display())]
    AlreadyInitialised(PathBuf),
    /// An I/O error occurred.
    #[error("failed to create workspace: {0}")]
    Io(#[from] io::Error),
    /// The configuration could not be written.
    #[error("failed to create workspace: {0}")]
    Config(String),
    /// The empty forest could not be written.
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Errors that can occur when opening a workspace.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// The forest file could not be read.
    Load(#[from] LoadError),
    /// The forest file breaks the tree invariants.
    Inconsistent {
        /// The forest file.
        path: PathBuf,
        /// Everything that is wrong with it.
        violations: NonEmpty<Violation>,
    },
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        match self {
            Self::Load(e) => write!(f, "{e}"),
            Self::Inconsistent { path, violations } => {
                write!(
                    f,
                    "{} is inconsistent ({} problem(s)): ",
                    path.display(),
                    violations.len()
                )?;
                let shown: Vec<String> = violations
                    .iter()
                    .take(MAX_DISPLAY)
                    .map(ToString::to_string)
                    .collect();
                write!(f, "{}", shown.join("; "))?;
                if violations.len() > MAX_DISPLAY {
                    write!(f, "; and {} more", violations.len() - MAX_DISPLAY)?;
                }
                write!(f, ". Run 'faq validate --fix' to repair")
            }
        }
    }
}

/// Errors from a mutation on a workspace.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] Error),
    /// The operation succeeded in memory but could not be saved, and was
    /// rolled back.
    #[error(transparent)]
    Save(#[from] SaveError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeType;

    #[test]
    fn init_creates_config_and_empty_forest() {
        let tmp = tempfile::tempdir().unwrap();
        let workspace = Workspace::init(tmp.path().to_path_buf()).unwrap();

        assert!(tmp.path().join(META_DIR).join(CONFIG_FILE).exists());
        assert!(workspace.forest_path().exists());
        assert!(workspace.store().is_empty());
    }

    #[test]
    fn init_twice_fails() {
        let tmp = tempfile::tempdir().unwrap();
        Workspace::init(tmp.path().to_path_buf()).unwrap();
        assert!(matches!(
            Workspace::init(tmp.path().to_path_buf()),
            Err(InitError::AlreadyInitialised(_))
        ));
    }

    #[test]
    fn open_without_init_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(tmp.path().to_path_buf()).unwrap();
        assert!(workspace.store().is_empty());
        assert_eq!(workspace.config(), &Config::default());
    }

    #[test]
    fn mutations_are_persisted() {
        let tmp = tempfile::tempdir().unwrap();
        let mut workspace = Workspace::init(tmp.path().to_path_buf()).unwrap();

        let root = workspace
            .create_node(NewNode::root("How do I track my order?", "Orders page.", "order"))
            .unwrap();
        let child = workspace
            .create_node(NewNode::child("No updates?", "Wait.", root.question_id.clone()))
            .unwrap();
        workspace.toggle_status(&child.question_id).unwrap();

        let reopened = Workspace::open(tmp.path().to_path_buf()).unwrap();
        assert_eq!(reopened.store().roots(), workspace.store().roots());
        let stored_root = reopened.store().get(&root.question_id).unwrap();
        assert_eq!(stored_root.node_type, NodeType::Root);
        assert!(!stored_root.children[0].is_active);
    }

    #[test]
    fn rejected_mutation_is_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let mut workspace = Workspace::init(tmp.path().to_path_buf()).unwrap();
        let missing = QuestionId::generate();

        let err = workspace.delete_node(&missing).unwrap_err();
        assert!(matches!(err, WorkspaceError::Store(Error::NotFound(_))));
    }

    #[test]
    fn strict_open_refuses_inconsistent_forest() {
        let tmp = tempfile::tempdir().unwrap();
        let mut workspace = Workspace::init(tmp.path().to_path_buf()).unwrap();
        let root = workspace
            .create_node(NewNode::root("Root", "a", "order"))
            .unwrap();
        workspace
            .create_node(NewNode::child("Child", "a", root.question_id))
            .unwrap();

        // Corrupt the root's tag on disk.
        let path = workspace.forest_path();
        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, content.replacen("type: root", "type: leaf", 1)).unwrap();

        let err = Workspace::open(tmp.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, OpenError::Inconsistent { .. }));
        assert!(err.to_string().contains("faq validate --fix"));

        let mut unchecked = Workspace::open_unchecked(tmp.path().to_path_buf()).unwrap();
        assert_eq!(unchecked.repair().unwrap(), 1);
        assert!(Workspace::open(tmp.path().to_path_buf()).is_ok());
    }

    #[test]
    fn config_defaults_apply_to_new_questions() {
        let tmp = tempfile::tempdir().unwrap();
        Workspace::init(tmp.path().to_path_buf()).unwrap();

        let config_path = tmp.path().join(META_DIR).join(CONFIG_FILE);
        let mut config = Config::load(&config_path).unwrap();
        config.set_default_author("support-team");
        config.save(&config_path).unwrap();

        let mut workspace = Workspace::open(tmp.path().to_path_buf()).unwrap();
        let node = workspace
            .create_node(NewNode::root("Q", "A", "order"))
            .unwrap();
        assert_eq!(node.created_by, "support-team");
    }
}
