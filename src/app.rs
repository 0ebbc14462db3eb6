use crate::config::{self, Config, ConfigError, Target};
use crate::diff;
use crate::rewriter::{RuleHit, StyleRewriter};
use crate::rules::RuleError;
use clap::Parser;
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "restyle", version)]
#[command(about = "Rewrite dashboard button classes to the black/gray theme")]
pub struct Cli {
    /// Show a diff for each target instead of writing it
    #[arg(long)]
    dry_run: bool,
    /// Rules and targets to use instead of the built-in set
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Print one JSON report instead of the notice lines
    #[arg(long)]
    json: bool,
    /// Print per-rule match counts to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Write,
    Preview,
}

#[derive(Debug, Serialize)]
pub struct TargetReport {
    pub label: String,
    pub path: PathBuf,
    pub changed: bool,
    pub written: bool,
    pub hits: Vec<RuleHit>,
    #[serde(skip)]
    pub diff: Option<String>,
}

pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;
    let mode = if cli.dry_run { Mode::Preview } else { Mode::Write };

    let reports = process_all(&cfg, mode, |target, report| {
        if !cli.json {
            announce(target, report, cli.verbose);
        }
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

/// Rewrites every target in order. The first failure stops the run; targets
/// already written stay written.
pub fn process_all(
    cfg: &Config,
    mode: Mode,
    mut on_done: impl FnMut(&Target, &TargetReport),
) -> Result<Vec<TargetReport>, AppError> {
    let rewriter = StyleRewriter::new(&cfg.rules)?;
    let mut reports = Vec::with_capacity(cfg.targets.len());
    for target in &cfg.targets {
        let report = process_target(&rewriter, target, mode)?;
        on_done(target, &report);
        reports.push(report);
    }
    Ok(reports)
}

pub fn process_target(
    rewriter: &StyleRewriter,
    target: &Target,
    mode: Mode,
) -> Result<TargetReport, AppError> {
    let raw = fs::read_to_string(&target.path).map_err(|source| AppError::Read {
        path: target.path.clone(),
        source,
    })?;

    let before = normalize_newlines(&raw);
    let rewrite = rewriter.rewrite(&before);
    let changed = rewrite.changed || matches!(before, Cow::Owned(_));

    let (written, diff) = match mode {
        Mode::Write => {
            fs::write(&target.path, &rewrite.output).map_err(|source| AppError::Write {
                path: target.path.clone(),
                source,
            })?;
            (true, None)
        }
        Mode::Preview if changed => (
            false,
            Some(diff::unified_diff(&target.label, &raw, &rewrite.output)),
        ),
        Mode::Preview => (false, None),
    };

    Ok(TargetReport {
        label: target.label.clone(),
        path: target.path.clone(),
        changed,
        written,
        hits: rewrite.hits,
        diff,
    })
}

/// Files are written back with `\n` line endings, whatever they were read with.
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn announce(target: &Target, report: &TargetReport, verbose: bool) {
    if report.written {
        println!("{}", target.notice);
    } else if let Some(diff) = &report.diff {
        print!("{diff}");
    } else {
        println!("{}: no changes", target.label);
    }

    if verbose {
        eprintln!("{} ({})", target.label, target.path.display());
        for hit in &report.hits {
            eprintln!("  {:<16} {:>3}  {}", hit.rule_id, hit.count, hit.rule_name);
        }
    }
}
