//! Configuration loader for the codeblocks extractor.
//!
//! Settings are resolved from layered `.codeblocks.toml` files:
//! built-in defaults → home directory → working directory → override flag.
//! Later layers replace individual keys set by earlier ones. Command-line
//! flags and environment variables are applied on top by the CLI.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".codeblocks.toml";
pub const DEFAULT_FILENAME_PREFIX: &str = "sourcecode";

/// Settings resolved from defaults and on-disk configuration files.
#[derive(Clone, Debug)]
pub struct Settings {
    pub input: Option<PathBuf>,
    pub extension: Option<String>,
    pub filename_prefix: String,
    pub output_directory: Option<PathBuf>,
    pub keep_going: bool,
    pub sources: ConfigSources,
}

/// Provenance information for resolved settings.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// A single configuration layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
}

impl ConfigSource {
    fn default() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        ConfigSource {
            kind,
            path: Some(path),
        }
    }

    fn base_dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} at {}", self.kind, path.display()),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    Home,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "built-in defaults",
            ConfigSourceKind::Home => "home config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
    pub skip_home: bool,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }

    /// Uses `path` instead of the user's home directory.
    pub fn with_home_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(path.into());
        self
    }

    pub fn without_home(mut self) -> Self {
        self.skip_home = true;
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Settings {
    /// Loads every available layer and merges them by precedence.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let mut merged = PartialSettings::default();
        let mut layers = vec![ConfigSource::default()];

        let local_path = working_dir.join(CONFIG_FILE_NAME);
        let home_path = if options.skip_home {
            None
        } else {
            options
                .home_dir
                .or_else(dirs::home_dir)
                .map(|home| home.join(CONFIG_FILE_NAME))
        };

        let candidates = [
            (ConfigSourceKind::Home, home_path),
            (ConfigSourceKind::Local, Some(local_path.clone())),
            (ConfigSourceKind::Override, override_path.clone()),
        ];

        for (kind, path) in candidates {
            let Some(path) = path else { continue };
            if !path.exists() {
                continue;
            }
            // The same file is only applied once, at its highest precedence.
            let shadowed = match kind {
                ConfigSourceKind::Home => {
                    path == local_path || Some(&path) == override_path.as_ref()
                }
                ConfigSourceKind::Local => Some(&path) == override_path.as_ref(),
                _ => false,
            };
            if shadowed {
                continue;
            }

            let source = ConfigSource::for_file(kind, path.clone());
            tracing::info!(config = %source, "using config file");
            merged.merge(load_layer(&path, &source)?);
            layers.push(source);
        }

        Ok(merged.finalize(ConfigSources {
            working_directory: working_dir,
            layers,
        }))
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: &ConfigSource) -> Result<PartialSettings, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.into(),
        source: err,
    })?;
    let raw: RawSettings = toml::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.into(),
        source: err,
    })?;
    Ok(raw.into_partial(source))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSettings {
    input: Option<String>,
    extension: Option<String>,
    filename_prefix: Option<String>,
    output_directory: Option<String>,
    keep_going: Option<bool>,
}

impl RawSettings {
    fn into_partial(self, source: &ConfigSource) -> PartialSettings {
        let base_dir = source.base_dir();
        let resolve = |value: String| match base_dir {
            Some(base) => make_absolute(Path::new(&value), base),
            None => PathBuf::from(value),
        };

        PartialSettings {
            input: non_empty(self.input).map(&resolve),
            extension: non_empty(self.extension),
            filename_prefix: non_empty(self.filename_prefix),
            output_directory: non_empty(self.output_directory).map(&resolve),
            keep_going: self.keep_going,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[derive(Clone, Debug, Default)]
struct PartialSettings {
    input: Option<PathBuf>,
    extension: Option<String>,
    filename_prefix: Option<String>,
    output_directory: Option<PathBuf>,
    keep_going: Option<bool>,
}

impl PartialSettings {
    fn merge(&mut self, other: PartialSettings) {
        if other.input.is_some() {
            self.input = other.input;
        }
        if other.extension.is_some() {
            self.extension = other.extension;
        }
        if other.filename_prefix.is_some() {
            self.filename_prefix = other.filename_prefix;
        }
        if other.output_directory.is_some() {
            self.output_directory = other.output_directory;
        }
        if other.keep_going.is_some() {
            self.keep_going = other.keep_going;
        }
    }

    fn finalize(self, sources: ConfigSources) -> Settings {
        Settings {
            input: self.input,
            extension: self.extension,
            filename_prefix: self
                .filename_prefix
                .unwrap_or_else(|| DEFAULT_FILENAME_PREFIX.to_string()),
            output_directory: self.output_directory,
            keep_going: self.keep_going.unwrap_or(false),
            sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_layers_replace_only_the_keys_they_set() {
        let mut merged = PartialSettings {
            extension: Some("md".into()),
            filename_prefix: Some("home".into()),
            ..PartialSettings::default()
        };
        merged.merge(PartialSettings {
            filename_prefix: Some("local".into()),
            keep_going: Some(true),
            ..PartialSettings::default()
        });

        assert_eq!(merged.extension.as_deref(), Some("md"));
        assert_eq!(merged.filename_prefix.as_deref(), Some("local"));
        assert_eq!(merged.keep_going, Some(true));
    }

    #[test]
    fn empty_strings_count_as_unset() {
        let raw: RawSettings =
            toml::from_str("extension = \"\"\nfilename_prefix = \"\"\n").unwrap();
        let partial = raw.into_partial(&ConfigSource::default());

        assert!(partial.extension.is_none());
        assert!(partial.filename_prefix.is_none());
    }
}
