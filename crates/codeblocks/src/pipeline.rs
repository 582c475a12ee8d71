use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::block::CodeBlock;
use crate::error::{PipelineError, PipelineResult};
use crate::extract::extract;
use crate::naming::{plan, NamingConfig};

/// Where the markdown document is read from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Input {
    #[default]
    Stdin,
    Path(PathBuf),
}

impl Input {
    /// `-` selects standard input.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path == Path::new("-") {
            Input::Stdin
        } else {
            Input::Path(path)
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::Path(path) => path.display().to_string(),
        }
    }

    pub fn read(&self) -> PipelineResult<Vec<u8>> {
        let result = match self {
            Input::Stdin => {
                let mut buffer = Vec::new();
                io::stdin().lock().read_to_end(&mut buffer).map(|_| buffer)
            }
            Input::Path(path) => fs::read(path),
        };

        result.map_err(|source| PipelineError::Read {
            input: self.describe(),
            source,
        })
    }
}

/// What to do once a block fails to write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the run on the first failed write.
    #[default]
    FailFast,
    /// Attempt every block and report all failures at the end.
    Continue,
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub input: Input,
    pub naming: NamingConfig,
    pub output_directory: PathBuf,
    pub failure_policy: FailurePolicy,
}

/// Files written by a successful run, in block order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub written: Vec<PathBuf>,
}

/// Reads the input, extracts its code blocks and writes one file per block.
pub fn run(options: &RunOptions) -> PipelineResult<Report> {
    let source = options.input.read()?;
    let blocks = extract(&source);
    tracing::debug!(
        input = %options.input.describe(),
        blocks = blocks.len(),
        "parsed markdown input"
    );
    write_blocks(
        &blocks,
        &options.naming,
        &options.output_directory,
        options.failure_policy,
    )
}

/// Names every block and saves it under `directory`, strictly in order.
pub fn write_blocks(
    blocks: &[CodeBlock],
    naming: &NamingConfig,
    directory: &Path,
    policy: FailurePolicy,
) -> PipelineResult<Report> {
    let mut report = Report::default();
    let mut failures = Vec::new();

    for source_code in plan(blocks, naming) {
        match source_code.save(directory) {
            Ok(path) => report.written.push(path),
            Err(err) => match policy {
                FailurePolicy::FailFast => return Err(err.into()),
                FailurePolicy::Continue => {
                    tracing::warn!(error = %err, "continuing after failed write");
                    failures.push(err);
                }
            },
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(PipelineError::Incomplete {
            written: report.written,
            failures,
        })
    }
}
