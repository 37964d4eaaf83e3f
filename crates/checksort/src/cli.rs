//! Command-line interface for one-shot, check, and watch modes.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::info;

use crate::app::reorder::reorder;
use crate::domain::model::Caret;
use crate::infra::buffer::{FileBuffer, ReorderStatus, reorder_active};
use crate::infra::config::Config;
use crate::infra::policy::PolicyLookup;
use crate::infra::watch::watch_files;

#[derive(Parser)]
#[command(
    name = "checksort",
    version,
    about = "Reorder markdown checklist items by status and priority",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reorder files in place, or stdin to stdout when no file is given
    Run {
        files: Vec<PathBuf>,
        /// Caret position to remap, as LINE or LINE:COL (zero-based)
        #[arg(long)]
        caret: Option<String>,
    },
    /// Exit non-zero if any file would change
    Check { files: Vec<PathBuf> },
    /// Watch files and reorder them whenever they change
    Watch { files: Vec<PathBuf> },
    /// Generate shell completions
    Completions { shell: Shell },
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { files, caret } => {
            let config = Config::load()?;
            let caret = parse_caret(caret.as_deref())?;
            if files.is_empty() {
                run_stdin(caret, &config)
            } else {
                run_files(&files, caret, &config)
            }
        }
        Command::Check { files } => {
            let config = Config::load()?;
            check_files(&files, &config)
        }
        Command::Watch { files } => {
            if files.is_empty() {
                bail!("watch mode needs at least one file");
            }
            let config = Config::load()?;
            watch_files(&files, config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "checksort", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_stdin(caret: Caret, config: &Config) -> Result<ExitCode> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("failed to read stdin")?;

    let outcome = reorder(&text, caret, &config.rules);
    io::stdout()
        .write_all(outcome.text.as_bytes())
        .context("failed to write stdout")?;
    if outcome.changed {
        info!(
            caret_line = outcome.caret.line,
            caret_ch = outcome.caret.ch,
            "reordered stdin"
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn run_files(files: &[PathBuf], caret: Caret, config: &Config) -> Result<ExitCode> {
    let policy = PolicyLookup::from_config(&config.policy)?;
    for path in files {
        if !policy.allows(path) {
            info!(path = %path.display(), "skipped: disabled by policy");
            continue;
        }
        let mut buffer = FileBuffer::new(path).with_caret(caret);
        let status = reorder_active(Some(&mut buffer), &config.rules)
            .with_context(|| format!("failed to reorder {}", path.display()))?;
        match status {
            ReorderStatus::Changed => info!(path = %path.display(), "reordered"),
            ReorderStatus::Unchanged => info!(path = %path.display(), "already sorted"),
            ReorderStatus::NoActiveBuffer => {}
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn check_files(files: &[PathBuf], config: &Config) -> Result<ExitCode> {
    if files.is_empty() {
        bail!("check mode needs at least one file");
    }

    let mut dirty = false;
    for path in files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let outcome = reorder(&text, Caret::default(), &config.rules);
        if outcome.changed {
            println!("{}: would reorder", path.display());
            dirty = true;
        }
    }

    Ok(if dirty {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn parse_caret(raw: Option<&str>) -> Result<Caret> {
    let Some(raw) = raw else {
        return Ok(Caret::default());
    };

    let (line, ch) = match raw.split_once(':') {
        Some((line, ch)) => (line, ch),
        None => (raw, "0"),
    };
    let line = line
        .trim()
        .parse()
        .with_context(|| format!("invalid caret line in {raw:?}"))?;
    let ch = ch
        .trim()
        .parse()
        .with_context(|| format!("invalid caret column in {raw:?}"))?;
    Ok(Caret::new(line, ch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_defaults_to_origin() {
        assert_eq!(parse_caret(None).unwrap(), Caret::new(0, 0));
    }

    #[test]
    fn caret_parses_line_and_column() {
        assert_eq!(parse_caret(Some("3")).unwrap(), Caret::new(3, 0));
        assert_eq!(parse_caret(Some("3:7")).unwrap(), Caret::new(3, 7));
    }

    #[test]
    fn caret_rejects_garbage() {
        assert!(parse_caret(Some("a:b")).is_err());
    }
}
