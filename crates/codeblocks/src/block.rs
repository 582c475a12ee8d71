use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SaveError;

/// A fenced code block with a language tag and non-empty content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    language: String,
    content: String,
}

impl CodeBlock {
    /// Builds a block, returning `None` when either the tag or the content is empty.
    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Option<Self> {
        let language = language.into();
        let content = content.into();
        if language.is_empty() || content.is_empty() {
            return None;
        }
        Some(Self { language, content })
    }

    /// Language tag exactly as written after the opening fence.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Lines between the fences, line terminators included.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Pairs this block with the filename chosen by `filename`.
    pub fn to_source_code<F>(&self, filename: F) -> SourceCode
    where
        F: FnOnce(&CodeBlock) -> String,
    {
        SourceCode {
            filename: filename(self),
            language: self.language.clone(),
            content: self.content.clone(),
        }
    }
}

/// A code block that has been assigned an output filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCode {
    pub filename: String,
    pub language: String,
    pub content: String,
}

impl SourceCode {
    /// Writes the content to `directory/filename`, replacing any existing file.
    ///
    /// A failed write may leave an empty or truncated file behind.
    pub fn save(&self, directory: &Path) -> Result<PathBuf, SaveError> {
        tracing::info!(
            filename = %self.filename,
            directory = %directory.display(),
            "saving file"
        );

        let path = directory.join(&self.filename);
        fs::write(&path, &self.content).map_err(|source| SaveError {
            filename: self.filename.clone(),
            source,
        })?;
        Ok(path)
    }
}

impl fmt::Display for SourceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
