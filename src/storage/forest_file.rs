//! The on-disk form of the forest.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::domain::FaqNode;

/// The forest file as written.
///
/// The `_version` tag allows the format to change without breaking old
/// files.
#[derive(Debug, Serialize)]
#[serde(tag = "_version")]
enum ForestFileRef<'a> {
    #[serde(rename = "1")]
    V1 { questions: &'a [FaqNode] },
}

/// The forest file as read.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum ForestFile {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        questions: Vec<FaqNode>,
    },
}

impl From<ForestFile> for Vec<FaqNode> {
    fn from(file: ForestFile) -> Self {
        match file {
            ForestFile::V1 { questions } => questions,
        }
    }
}

/// Reads a forest file. A missing file is an empty forest.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Vec<FaqNode>, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No forest file at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let forest: ForestFile = serde_yaml::from_reader(BufReader::new(file))?;
    Ok(forest.into())
}

/// Writes a forest file.
///
/// The forest is written to a sibling temporary file which then replaces the
/// target, so a crash never leaves a half-written file behind.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(path: &Path, questions: &[FaqNode]) -> Result<(), SaveError> {
    let tmp = path.with_extension("yaml.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_yaml::to_writer(&mut writer, &ForestFileRef::V1 { questions })?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Errors that can occur when reading the forest file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// An I/O error occurred.
    #[error("failed to read the forest file: {0}")]
    Io(#[from] io::Error),
    /// The YAML could not be parsed.
    #[error("failed to parse the forest file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors that can occur when writing the forest file.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// An I/O error occurred.
    #[error("failed to write the forest file: {0}")]
    Io(#[from] io::Error),
    /// The forest could not be serialized.
    #[error("failed to serialize the forest: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
