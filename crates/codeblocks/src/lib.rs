//! Extracts fenced code blocks from a markdown document and writes each one to
//! its own source file, picking the file extension from the block's language tag.

mod block;
mod error;
mod extract;
mod naming;
mod pipeline;
mod state;

pub mod extension;

pub use block::{CodeBlock, SourceCode};
pub use error::{ExitCode, PipelineError, PipelineResult, SaveError};
pub use extension::{resolve, FALLBACK_EXTENSION};
pub use extract::{extract, extract_from_str};
pub use naming::{compute_filename, plan, NamingConfig, DEFAULT_PREFIX};
pub use pipeline::{run, write_blocks, FailurePolicy, Input, Report, RunOptions};
