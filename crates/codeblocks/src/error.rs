use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Process exit codes reported by the command-line front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Read = 1,
    Write = 2,
    Config = 3,
}

/// A single block that could not be written.
#[derive(Debug, Error)]
#[error("failed to save {filename}: {source}")]
pub struct SaveError {
    pub filename: String,
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read {input}: {source}")]
    Read { input: String, source: io::Error },

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("{}", describe_failures(.failures))]
    Incomplete {
        written: Vec<PathBuf>,
        failures: Vec<SaveError>,
    },
}

impl PipelineError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Read { .. } => ExitCode::Read,
            Self::Save(_) | Self::Incomplete { .. } => ExitCode::Write,
        }
    }
}

fn describe_failures(failures: &[SaveError]) -> String {
    let details: Vec<String> = failures.iter().map(ToString::to_string).collect();
    format!(
        "{} file(s) could not be written: {}",
        failures.len(),
        details.join("; ")
    )
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_lists_every_failure() {
        let err = PipelineError::Incomplete {
            written: vec![PathBuf::from("sourcecode-0.go")],
            failures: vec![
                SaveError {
                    filename: "sourcecode-1.py".into(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                },
                SaveError {
                    filename: "sourcecode-2.js".into(),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "2 file(s) could not be written: failed to save sourcecode-1.py: denied; \
             failed to save sourcecode-2.js: disk full"
        );
        assert_eq!(err.exit_code(), ExitCode::Write);
    }
}
