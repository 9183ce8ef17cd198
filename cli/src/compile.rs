#![deny(missing_docs)]

//! # Compile Command
//!
//! Compiles one OpenAPI document into a UI schema and writes it as JSON or
//! YAML, to a file or to stdout.

use std::fs;
use std::path::{Path, PathBuf};

use uigen_core::{compile_ui_schema, UiSchema};

use crate::error::{CliError, CliResult};
use crate::source::Source;

/// Serialization of the emitted UI schema.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

impl OutputFormat {
    /// Format implied by an output path's extension; JSON unless it is `.yaml`/`.yml`.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => OutputFormat::Yaml,
            _ => OutputFormat::Json,
        }
    }
}

/// Arguments for the compile command.
#[derive(clap::Args, Debug, Clone)]
pub struct CompileArgs {
    /// Path to the OpenAPI document (.json, .yaml or .yml).
    #[clap(long, env = "UIGEN_INPUT")]
    pub input: Option<PathBuf>,

    /// URL of the OpenAPI document, fetched instead of reading `--input`.
    #[cfg(feature = "client")]
    #[clap(long)]
    pub url: Option<String>,

    /// Output path for the UI schema. If not provided, prints to stdout.
    #[clap(long, env = "UIGEN_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format. Defaults to the output file's extension, else JSON.
    #[clap(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl CompileArgs {
    fn source(&self) -> CliResult<Source> {
        #[cfg(feature = "client")]
        let url = self.url.as_deref();
        #[cfg(not(feature = "client"))]
        let url = None;
        Source::select(self.input.as_ref(), url)
    }

    fn resolved_format(&self) -> OutputFormat {
        self.format
            .or_else(|| self.output.as_deref().map(OutputFormat::for_path))
            .unwrap_or(OutputFormat::Json)
    }
}

/// Executes the compilation.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &CompileArgs) -> CliResult<()> {
    let source = args.source()?;

    // 1. Load
    let document = source.load()?;

    // 2. Compile
    let ui = compile_ui_schema(&document)?;

    // 3. Render
    let rendered = render(&ui, args.resolved_format())?;

    // 4. Write result
    match &args.output {
        Some(out_path) => {
            write_output(out_path, &rendered)?;
            println!(
                "UI schema with {} entities generated at {:?}",
                ui.entities.len(),
                out_path
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Serializes a UI schema in the requested format.
pub fn render(ui: &UiSchema, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(ui)
            .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e))),
        OutputFormat::Yaml => serde_yaml::to_string(ui)
            .map_err(|e| CliError::General(format!("YAML serialization failed: {}", e))),
    }
}

/// Writes `contents` to `path`, creating missing parent directories.
pub fn write_output(path: &Path, contents: &str) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TASKS_API: &str = r#"
openapi: 3.0.0
paths:
  /tasks:
    get:
      operationId: listTasks
      responses:
        '200':
          content:
            application/json:
              schema: { type: array, items: { $ref: '#/components/schemas/Task' } }
components:
  schemas:
    Task:
      type: object
      required: [title]
      properties:
        id: { type: integer, readOnly: true }
        title: { type: string }
"#;

    fn args(input: PathBuf, output: Option<PathBuf>, format: Option<OutputFormat>) -> CompileArgs {
        CompileArgs {
            input: Some(input),
            #[cfg(feature = "client")]
            url: None,
            output,
            format,
        }
    }

    #[test]
    fn test_compile_to_json_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("tasks.yaml");
        let output = dir.path().join("out/tasks.ui.json");
        fs::write(&input, TASKS_API).unwrap();

        execute(&args(input, Some(output.clone()), None)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["version"], 1);
        assert_eq!(written["entities"]["Task"]["primaryKey"], "id");
        assert_eq!(
            written["entities"]["Task"]["endpoints"]["list"]["operationId"],
            "listTasks"
        );
    }

    #[test]
    fn test_compile_to_yaml_by_extension() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("tasks.yaml");
        let output = dir.path().join("tasks.ui.yml");
        fs::write(&input, TASKS_API).unwrap();

        execute(&args(input, Some(output.clone()), None)).unwrap();

        let yaml = fs::read_to_string(&output).unwrap();
        assert!(yaml.contains("resourcePath: /tasks"));
        assert!(yaml.contains("version: 1"));
    }

    #[test]
    fn test_explicit_format_wins_over_extension() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("tasks.yaml");
        let output = dir.path().join("tasks.yaml.out");
        fs::write(&input, TASKS_API).unwrap();

        execute(&args(input, Some(output.clone()), Some(OutputFormat::Yaml))).unwrap();

        let yaml = fs::read_to_string(&output).unwrap();
        assert!(yaml.starts_with("version: 1"));
    }

    #[test]
    fn test_unsupported_version_propagates() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("swagger.yaml");
        fs::write(&input, "swagger: '2.0'\npaths: {}").unwrap();

        let err = execute(&args(input, None, None)).unwrap_err();
        assert!(matches!(
            err,
            CliError::App(uigen_core::AppError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(OutputFormat::for_path(Path::new("a.yaml")), OutputFormat::Yaml);
        assert_eq!(OutputFormat::for_path(Path::new("a.yml")), OutputFormat::Yaml);
        assert_eq!(OutputFormat::for_path(Path::new("a.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::for_path(Path::new("a")), OutputFormat::Json);
    }
}
