use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Defaults;

/// Configuration for an FAQ workspace.
///
/// Stored as TOML in `.faq/config.toml`. Every field has a default, so an
/// empty file (or no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Recorded as `created_by` when a create request names no author.
    default_author: String,

    /// Offered as the hand-off label when escalation is allowed and no label
    /// is given.
    default_escalation_label: String,

    /// Whether to refuse to open a forest file that breaks the tree
    /// invariants.
    ///
    /// When `false`, such a file is opened as-is and the problems are only
    /// reported by `faq validate`.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = Defaults::default();
        Self {
            default_author: defaults.author,
            default_escalation_label: defaults.escalation_label,
            strict: default_strict(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The author recorded on questions created without one.
    #[must_use]
    pub fn default_author(&self) -> &str {
        &self.default_author
    }

    /// The escalation label used when none is given.
    #[must_use]
    pub fn default_escalation_label(&self) -> &str {
        &self.default_escalation_label
    }

    /// Sets the default author. Blank values are ignored.
    ///
    /// Returns `true` if the value changed.
    pub fn set_default_author(&mut self, author: &str) -> bool {
        let author = author.trim();
        if author.is_empty() || author == self.default_author {
            false
        } else {
            author.clone_into(&mut self.default_author);
            true
        }
    }

    /// The store defaults this configuration implies.
    #[must_use]
    pub fn defaults(&self) -> Defaults {
        Defaults {
            author: self.default_author.clone(),
            escalation_label: self.default_escalation_label.clone(),
        }
    }
}

const fn default_strict() -> bool {
    true
}

fn default_author() -> String {
    Defaults::default().author
}

fn default_escalation_label() -> String {
    Defaults::default().escalation_label
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_author")]
        default_author: String,

        #[serde(default = "default_escalation_label")]
        default_escalation_label: String,

        #[serde(default = "default_strict")]
        strict: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                default_author,
                default_escalation_label,
                strict,
            } => Self {
                default_author,
                default_escalation_label,
                strict,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            default_author: config.default_author,
            default_escalation_label: config.default_escalation_label,
            strict: config.strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ndefault_author = \"support-team\"\ndefault_escalation_label = \"Chat with us\"\nstrict = false\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.default_author(), "support-team");
        assert_eq!(config.default_escalation_label(), "Chat with us");
        assert!(!config.strict);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nstrict = \"yes\"\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        assert!(config.set_default_author("ops"));
        assert!(!config.set_default_author("  "));
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
        assert_eq!(config.defaults().author, "ops");
    }
}
