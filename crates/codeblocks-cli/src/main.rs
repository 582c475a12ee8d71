use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use codeblocks::{
    extract, plan, ExitCode, FailurePolicy, Input, NamingConfig, PipelineError, RunOptions,
};
use codeblocks_config::{ConfigError, LoadOptions, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codeblocks", version, about = "Extract fenced code blocks from markdown", long_about = None)]
struct Cli {
    /// Markdown file to read (defaults to stdin; '-' also reads stdin)
    #[arg(short, long, value_name = "FILE", env = "CODEBLOCKS_INPUT", allow_hyphen_values = true)]
    input: Option<PathBuf>,

    /// Extension for every written file (defaults to one derived from each block's language)
    #[arg(short, long, value_name = "EXT", env = "CODEBLOCKS_EXTENSION")]
    extension: Option<String>,

    /// Filename prefix (defaults to sourcecode)
    #[arg(short, long, value_name = "PREFIX", env = "CODEBLOCKS_FILENAME_PREFIX")]
    filename_prefix: Option<String>,

    /// Output directory (defaults to the current working directory)
    #[arg(short, long, value_name = "DIR", env = "CODEBLOCKS_OUTPUT_DIRECTORY")]
    output_directory: Option<PathBuf>,

    /// Config file (defaults to .codeblocks.toml in the working and home directories)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep writing remaining blocks after a write fails
    #[arg(long)]
    keep_going: bool,

    /// Print the filenames that would be written without writing them
    #[arg(long)]
    dry_run: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match run(&cli) {
        Ok(()) => std::process::ExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            eprintln!("error: {}", render_error(&err));
            std::process::ExitCode::from(exit_code_for(&err) as u8)
        }
    }
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut load_options = LoadOptions::default();
    if let Some(path) = &cli.config {
        load_options = load_options.with_override_path(path);
    }
    let settings = Settings::load(load_options)?;
    let options = build_options(cli, settings);

    if cli.dry_run {
        return print_plan(&options);
    }

    let report = codeblocks::run(&options)?;
    tracing::info!(
        files = report.written.len(),
        directory = %options.output_directory.display(),
        "extraction complete"
    );
    Ok(())
}

/// Flags and environment take precedence over config files.
fn build_options(cli: &Cli, settings: Settings) -> RunOptions {
    let input = non_empty_path(cli.input.clone())
        .or(settings.input)
        .map(Input::from_path)
        .unwrap_or_default();

    let mut naming = NamingConfig::default().with_prefix(
        non_empty(cli.filename_prefix.clone()).unwrap_or(settings.filename_prefix),
    );
    if let Some(extension) = non_empty(cli.extension.clone()).or(settings.extension) {
        naming = naming.with_extension_override(extension);
    }

    let output_directory = non_empty_path(cli.output_directory.clone())
        .or(settings.output_directory)
        .unwrap_or(settings.sources.working_directory);

    let failure_policy = if cli.keep_going || settings.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::FailFast
    };

    RunOptions {
        input,
        naming,
        output_directory,
        failure_policy,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|value| !value.as_os_str().is_empty())
}

fn print_plan(options: &RunOptions) -> Result<()> {
    let source = options.input.read()?;
    let blocks = extract(&source);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for source_code in plan(&blocks, &options.naming) {
        let path = options.output_directory.join(&source_code.filename);
        match writeln!(handle, "{}", path.display()) {
            Ok(_) => {}
            Err(err) if should_ignore_pipe_error(&err) => return Ok(()),
            Err(err) => return Err(err).context("failed to print plan"),
        }
    }

    match handle.flush() {
        Ok(_) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("failed to flush stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}

/// Joins the cause chain, skipping causes a message already ends with.
fn render_error(err: &anyhow::Error) -> String {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.ends_with(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if let Some(pipeline) = err.downcast_ref::<PipelineError>() {
        pipeline.exit_code()
    } else if err.downcast_ref::<ConfigError>().is_some() {
        ExitCode::Config
    } else {
        ExitCode::Write
    }
}
