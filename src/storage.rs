/// Reading and writing the forest file.
pub mod forest_file;
pub use forest_file::{LoadError, SaveError};

/// The filesystem backed workspace.
pub mod workspace;
pub use workspace::{InitError, OpenError, Workspace, WorkspaceError};
