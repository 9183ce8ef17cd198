#![deny(missing_docs)]

//! # Batch Command
//!
//! Walks a directory tree, compiles every OpenAPI document found and writes
//! one `<stem>.ui.json` per document, mirroring the input layout.
//!
//! A document that fails does not stop the walk; failures are logged and
//! counted, and the command fails once at the end if any occurred.

use std::path::{Path, PathBuf};

use uigen_core::compile_ui_schema;
use walkdir::WalkDir;

use crate::compile::{render, write_output, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::source::Source;

/// File extensions treated as OpenAPI documents.
const DOCUMENT_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Arguments for the batch command.
#[derive(clap::Args, Debug, Clone)]
pub struct BatchArgs {
    /// Directory scanned recursively for OpenAPI documents.
    #[clap(long)]
    pub input_dir: PathBuf,

    /// Directory receiving the compiled UI schemas.
    #[clap(long)]
    pub output_dir: PathBuf,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Written UI schema files.
    pub compiled: Vec<PathBuf>,
    /// Input documents that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Executes the batch compilation.
pub fn execute(args: &BatchArgs) -> CliResult<BatchReport> {
    if !args.input_dir.is_dir() {
        return Err(CliError::General(format!(
            "Input directory not found: {:?}",
            args.input_dir
        )));
    }

    let mut report = BatchReport::default();
    for path in discover(&args.input_dir) {
        match compile_one(&path, &args.input_dir, &args.output_dir) {
            Ok(written) => {
                tracing::info!(input = %path.display(), output = %written.display(), "compiled");
                report.compiled.push(written);
            }
            Err(e) => {
                tracing::error!(input = %path.display(), error = %e, "compilation failed");
                report.failed.push((path, e.to_string()));
            }
        }
    }

    println!(
        "Compiled {} documents into {:?}",
        report.compiled.len(),
        args.output_dir
    );

    if !report.failed.is_empty() {
        return Err(CliError::General(format!(
            "{} of {} documents failed",
            report.failed.len(),
            report.failed.len() + report.compiled.len()
        )));
    }
    Ok(report)
}

/// Candidate documents under `root`, in a stable order.
fn discover(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
        })
        .collect()
}

fn compile_one(path: &Path, input_dir: &Path, output_dir: &Path) -> CliResult<PathBuf> {
    let document = Source::File(path.to_path_buf()).load()?;
    let ui = compile_ui_schema(&document)?;
    let rendered = render(&ui, OutputFormat::Json)?;

    let target = output_path(path, input_dir, output_dir);
    write_output(&target, &rendered)?;
    Ok(target)
}

/// `<output_dir>/<relative parent>/<stem>.ui.json`.
fn output_path(path: &Path, input_dir: &Path, output_dir: &Path) -> PathBuf {
    let relative = path.strip_prefix(input_dir).unwrap_or(path);
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut target = output_dir.to_path_buf();
    if let Some(parent) = relative.parent() {
        target.push(parent);
    }
    target.push(format!("{}.ui.json", stem));
    target
}
