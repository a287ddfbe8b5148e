//! core::types
//!
//! Value types for the generated file set.
//!
//! # Types
//!
//! - [`GeneratedFile`] - One generated file: relative path plus full content
//! - [`GeneratedProject`] - The complete generation result: files and a
//!   suggested repository name
//!
//! These types deserialize directly from the model's JSON output (camelCase
//! field names); structural validation happens in the generation client
//! before a [`GeneratedProject`] is handed to the caller.

use serde::{Deserialize, Serialize};

/// One file in a generated project.
///
/// The path is relative to the repository root (e.g. `src/main.py`); the
/// content is the complete UTF-8 text of the file. Values are immutable once
/// produced by the generation client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Relative path within the repository
    pub path: String,
    /// Full file content
    pub content: String,
}

impl GeneratedFile {
    /// Create a generated file from a path and content.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A complete generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProject {
    /// The generated file set
    pub files: Vec<GeneratedFile>,
    /// Kebab-case repository name suggested by the model
    pub suggested_repo_name: String,
}

/// Check whether a file set contains a README.
///
/// The match is case-insensitive on the whole path, so `README.md`,
/// `readme.md`, and `Readme.MD` all qualify, but `docs/README.md` does not.
pub fn has_readme(files: &[GeneratedFile]) -> bool {
    files.iter().any(|f| f.path.eq_ignore_ascii_case("readme.md"))
}
