use crate::block::{CodeBlock, SourceCode};
use crate::extension;

pub const DEFAULT_PREFIX: &str = "sourcecode";

/// Inputs to the filename policy, typically supplied by the CLI layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamingConfig {
    /// Extension applied to every block instead of the one derived from its tag.
    pub extension_override: Option<String>,
    pub prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingConfig {
            extension_override: None,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl NamingConfig {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_extension_override(mut self, extension: impl Into<String>) -> Self {
        self.extension_override = Some(extension.into());
        self
    }

    fn extension_for(&self, block: Option<&CodeBlock>) -> String {
        match self.extension_override.as_deref() {
            Some(extension) if !extension.is_empty() => extension.to_string(),
            _ => extension::resolve(block.map(CodeBlock::language).unwrap_or_default()).to_string(),
        }
    }
}

/// Computes the output filename of `blocks[index]`.
///
/// A lone block is named `{prefix}.{ext}`; otherwise every block gets its
/// zero-based position, `{prefix}-{index}.{ext}`, which keeps names unique
/// within one run. The prefix and extension are used as given.
pub fn compute_filename(blocks: &[CodeBlock], index: usize, config: &NamingConfig) -> String {
    let extension = config.extension_for(blocks.get(index));
    if blocks.len() == 1 {
        format!("{}.{}", config.prefix, extension)
    } else {
        format!("{}-{}.{}", config.prefix, index, extension)
    }
}

/// Assigns a filename to every block. The full list must be known up front
/// because the naming shape depends on the total count.
pub fn plan(blocks: &[CodeBlock], config: &NamingConfig) -> Vec<SourceCode> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| block.to_source_code(|_| compute_filename(blocks, index, config)))
        .collect()
}
