//! Command line front end: coerce | check
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;

use crate::coerce::{Coercer, Coercible};
use crate::diagnostics::{CollectingSink, Diagnostic, DiagnosticSink};
use crate::manifest::Manifest;
use crate::types::{
    BlockPredicate, BlockState, BlockStateProvider, HeightProvider, NoiseParameters,
    NumericProvider, VerticalAnchor,
};
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// coerce loosely written worldgen values, or check feature documents against a schema manifest
#[derive(Parser, Debug)]
#[command(name = "worldgen-codec", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// coerce every input document to one canonical kind and print its canonical form
    Coerce(CoerceOut),
    /// decode every input document through a manifest's feature schemas
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /features/0/config)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output becomes one input.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths, quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    NumericProvider,
    BlockState,
    BlockPredicate,
    HeightProvider,
    VerticalAnchor,
    NoiseParameters,
    BlockStateProvider,
}

#[derive(clap::Parser, Debug)]
struct CoerceOut {
    /// canonical kind to coerce into
    #[arg(long, short, value_enum)]
    kind: Kind,

    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    /// schema manifest (.json)
    #[arg(long, short)]
    manifest: PathBuf,

    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file for the re-encoded documents (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One input value and where it came from, e.g. `a.ndjson:3` or `a.json#1`.
#[derive(Debug, Clone)]
struct InputDocument {
    origin: String,
    value: Value,
}

/// Prints each diagnostic as a colored warning on stderr.
struct StderrSink<'a> {
    origin: &'a str,
}

impl DiagnosticSink for StderrSink<'_> {
    fn report(&self, diagnostic: Diagnostic) {
        eprintln!("{} {}: {diagnostic}", "warning:".yellow().bold(), self.origin.dimmed());
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<InputDocument>> {
        let sources = resolve_file_path_patterns(&self.input)?;
        let mut out = Vec::new();
        for source in sources {
            let origin = source
                .as_deref()
                .map(|path| path.to_string_lossy().to_string())
                .unwrap_or_else(|| "<stdin>".to_string());
            let text = match source.as_deref() {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read source file {origin}"))?,
                None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?,
            };
            if self.ndjson {
                for (index, line) in text.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.push(&mut out, format!("{origin}:{}", index + 1), line)?;
                }
            } else {
                self.push(&mut out, origin, &text)?;
            }
        }
        tracing::info!(documents = out.len(), "loaded inputs");
        Ok(out)
    }

    fn push(&self, out: &mut Vec<InputDocument>, origin: String, text: &str) -> Result<()> {
        let json_value = serde_json::from_str::<serde_json::Value>(text)
            .with_context(|| format!("failed to parse JSON ({origin})"))?;
        let json_value = match self.json_pointer.as_deref() {
            None => json_value,
            Some(pointer) => json_value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| anyhow!("JSON pointer `{pointer}` selects nothing in {origin}"))?,
        };
        let value = Value::from(json_value);
        match self.jq_expr.as_deref() {
            None => out.push(InputDocument { origin, value }),
            Some(jq_expr) => {
                let results = crate::jq_exec::run_jaq(jq_expr, &value)
                    .with_context(|| format!("failed to apply jq expression ({origin})"))?;
                for (index, value) in results.into_iter().enumerate() {
                    out.push(InputDocument {
                        origin: format!("{origin}#{index}"),
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Kind {
    fn coerce(self, value: &Value, cx: &Coercer<'_>) -> Value {
        fn canonical<T: Coercible>(value: &Value, cx: &Coercer<'_>) -> Value {
            cx.coerce_value::<T>(value).encode()
        }
        match self {
            Kind::NumericProvider => canonical::<NumericProvider>(value, cx),
            Kind::BlockState => canonical::<BlockState>(value, cx),
            Kind::BlockPredicate => canonical::<BlockPredicate>(value, cx),
            Kind::HeightProvider => canonical::<HeightProvider>(value, cx),
            Kind::VerticalAnchor => canonical::<VerticalAnchor>(value, cx),
            Kind::NoiseParameters => canonical::<NoiseParameters>(value, cx),
            Kind::BlockStateProvider => canonical::<BlockStateProvider>(value, cx),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Coerce(target) => {
                let documents = target.input_settings.load()?;
                let outputs: Vec<Value> = documents
                    .iter()
                    .map(|doc| {
                        let sink = StderrSink { origin: &doc.origin };
                        target.kind.coerce(&doc.value, &Coercer::new(&sink))
                    })
                    .collect();
                write_output(target.out.as_deref(), outputs)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Check(target) => {
                let manifest = Manifest::load(&target.manifest)?;
                let dispatch = manifest.dispatch()?;
                tracing::info!(
                    manifest = %target.manifest.display(),
                    features = dispatch.kinds().count(),
                    "loaded manifest"
                );
                let documents = target.input_settings.load()?;

                // decode in parallel, report in input order
                let results: Vec<(Result<Value>, Vec<Diagnostic>)> = documents
                    .par_iter()
                    .map(|doc| {
                        let sink = CollectingSink::new();
                        let result = dispatch
                            .decode_with(&doc.value, &sink)
                            .map_err(anyhow::Error::from)
                            .and_then(|tagged| Ok(dispatch.encode(&tagged)?));
                        (result, sink.take())
                    })
                    .collect();

                let mut outputs = Vec::new();
                let mut failures = 0usize;
                for (doc, (result, diagnostics)) in documents.iter().zip(results) {
                    let sink = StderrSink { origin: &doc.origin };
                    for diagnostic in diagnostics {
                        sink.report(diagnostic);
                    }
                    match result {
                        Ok(value) => outputs.push(value),
                        Err(error) => {
                            failures += 1;
                            eprintln!("{} {}: {error}", "error:".red().bold(), doc.origin.dimmed());
                        }
                    }
                }
                write_output(target.out.as_deref(), outputs)?;
                if failures > 0 {
                    eprintln!(
                        "{}",
                        format!("{failures} of {} documents failed", documents.len()).red()
                    );
                    return Ok(ExitCode::FAILURE);
                }
                eprintln!("{}", format!("{} documents ok", documents.len()).green());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// A single result is written bare, several as an array.
fn write_output(out: Option<&Path>, mut values: Vec<Value>) -> Result<()> {
    let value = if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    };
    let src = serde_json::to_string_pretty(&value)?;
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, &src).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => println!("{src}"),
    }
    Ok(())
}

/// `None` stands for stdin (`-`).
fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<Option<PathBuf>>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::new();
    let mut stdin_seen = false;

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            if stdin_seen {
                bail!("stdin (`-`) given more than once");
            }
            stdin_seen = true;
            out.push(None);
        } else if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(Some(entry?));
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(Some(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_names_are_kebab_case() {
        let cli = CommandLineInterface::try_parse_from([
            "worldgen-codec",
            "coerce",
            "--kind",
            "block-state-provider",
            "-i",
            "a.json",
        ])
        .unwrap();
        let Command::Coerce(target) = cli.cmd else {
            panic!("expected coerce");
        };
        assert_eq!(target.kind, Kind::BlockStateProvider);
    }

    #[test]
    fn coerce_prints_canonical_form() {
        let sink = CollectingSink::new();
        let cx = Coercer::new(&sink);
        let out = Kind::NumericProvider.coerce(&Value::from(json!({"value": 5})), &cx);
        assert_eq!(out.to_string(), "5");
        let out = Kind::BlockState.coerce(&Value::from("stone"), &cx);
        assert_eq!(out.to_string(), r#"{"Name":"minecraft:stone"}"#);
        assert!(sink.is_empty());
    }

    #[test]
    fn literal_paths_and_stdin_pass_through() {
        let paths = resolve_file_path_patterns(["a.json", "-"]).unwrap();
        assert_eq!(paths, vec![Some(PathBuf::from("a.json")), None]);
        assert!(resolve_file_path_patterns(["-", "-"]).is_err());
    }

    #[test]
    fn unmatched_glob_is_an_error() {
        assert!(resolve_file_path_patterns(["/nonexistent-dir-*/x.json"]).is_err());
    }
}
