//! Command-line interface for partscope.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{debug, warn};

use crate::analysis::{ExcludeMode, Recursion};
use crate::config::Config;
use crate::detect::Runner;
use crate::processor::{PartArgs, PartType, Processor, Registry};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Structural analysis and editing for Go source.
///
/// Locates named constructs (functions, methods, types, constants,
/// variables, imports, package clauses) with exact byte positions, replaces
/// them with re-validation, and checks documentation comments across a
/// directory tree.
#[derive(Parser)]
#[command(name = "partscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Locate a construct and print its position and text
    Find(FindArgs),
    /// Replace a construct and print or write the result
    Replace(ReplaceArgs),
    /// Check that a file parses
    Validate(ValidateArgs),
    /// Report missing documentation comments
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// List supported languages
    Languages,
}

/// Construct selection shared by find and replace.
#[derive(Args)]
pub struct TargetArgs {
    /// Source file
    pub file: PathBuf,

    /// Construct kind: func, type, const, var, import, package
    #[arg(short, long)]
    pub kind: PartType,

    /// Construct name; methods are receiver-qualified (`*Config.Validate`)
    #[arg(short, long)]
    pub name: String,

    /// Language (default: detected from the file extension)
    #[arg(short, long)]
    pub language: Option<String>,
}

/// Arguments for the find command.
#[derive(Args)]
pub struct FindArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the replace command.
#[derive(Args)]
pub struct ReplaceArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Read the replacement from a file
    #[arg(long = "with", value_name = "FILE", conflicts_with = "content")]
    pub with_file: Option<PathBuf>,

    /// Replacement text
    #[arg(long)]
    pub content: Option<String>,

    /// Write the result back to the source file instead of printing it
    #[arg(long)]
    pub write: bool,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Source file
    pub file: PathBuf,

    /// Language (default: detected from the file extension)
    #[arg(short, long)]
    pub language: Option<String>,
}

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// File or directory to check; a trailing `/...` forces recursion
    #[arg(default_value = ".")]
    pub path: String,

    /// Descend into sub-directories (the default)
    #[arg(short, long, conflicts_with = "no_recursive")]
    pub recursive: bool,

    /// Only check the top-level directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Directory or file name to skip (repeatable; globs allowed)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// How --exclude combines with the built-in list: defaults, append, replace
    #[arg(long)]
    pub exclude_mode: Option<ExcludeMode>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Language whose rules to apply
    #[arg(short, long, default_value = "go")]
    pub language: String,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

fn check_format(format: &str) -> bool {
    if format == "pretty" || format == "json" {
        return true;
    }
    eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", format);
    false
}

/// Pick a processor from an explicit language or the file extension.
pub fn select_processor(
    registry: &Registry,
    file: &Path,
    language: Option<&str>,
) -> anyhow::Result<Arc<dyn Processor>> {
    if let Some(language) = language {
        return Ok(registry.lookup(language)?);
    }

    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .with_context(|| format!("cannot detect language of {}; use --language", file.display()))?;

    for language in registry.list_languages() {
        let processor = registry.lookup(&language)?;
        let handles = processor
            .analyzer()
            .map(|a| a.handles_extension(ext))
            .unwrap_or_else(|| processor.language().eq_ignore_ascii_case(ext));
        if handles {
            debug!(language = %language, file = %file.display(), "detected language");
            return Ok(processor);
        }
    }
    Ok(registry.lookup(ext)?)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn part_args(target: &TargetArgs, processor: &dyn Processor, content: String) -> PartArgs {
    PartArgs::new(processor.language(), content, target.kind, &target.name)
        .with_file_path(target.file.to_string_lossy())
}

/// Run the find command.
pub fn run_find(args: &FindArgs, registry: &Registry) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }
    let target = &args.target;
    let processor = select_processor(registry, &target.file, target.language.as_deref())?;
    let content = read_source(&target.file)?;

    let info = processor.find_part(&part_args(target, processor.as_ref(), content))?;
    match args.format.as_str() {
        "json" => report::write_part_json(&info)?,
        _ => report::write_part_pretty(target.kind.as_str(), &target.name, &info),
    }

    if info.found {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the replace command.
pub fn run_replace(args: &ReplaceArgs, registry: &Registry) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }
    let target = &args.target;
    let new_content = match (&args.with_file, &args.content) {
        (Some(path), _) => read_source(path)?,
        (None, Some(text)) => text.clone(),
        (None, None) => bail!("replacement required: use --with FILE or --content TEXT"),
    };

    let processor = select_processor(registry, &target.file, target.language.as_deref())?;
    let content = read_source(&target.file)?;
    let part = part_args(target, processor.as_ref(), content).with_new_content(new_content);

    // A package hit spans only the name, so the keyword check does not apply.
    if target.kind != PartType::Package {
        processor.validate_content(&part)?;
    }
    let result = processor
        .replace_part(&part)
        .with_context(|| format!("cannot replace {} {:?}", target.kind, target.name))?;

    if args.write {
        fs::write(&target.file, &result)
            .with_context(|| format!("failed to write {}", target.file.display()))?;
    }

    match args.format.as_str() {
        "json" => {
            let value = serde_json::json!({
                "file": target.file.to_string_lossy(),
                "written": args.write,
                "content": result,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ if args.write => println!("Updated {}", target.file.display()),
        _ => print!("{}", result),
    }
    Ok(EXIT_SUCCESS)
}

/// Run the validate command.
pub fn run_validate(args: &ValidateArgs, registry: &Registry) -> anyhow::Result<i32> {
    let processor = select_processor(registry, &args.file, args.language.as_deref())?;
    let content = read_source(&args.file)?;

    match processor.validate_syntax(&content) {
        Ok(()) => {
            println!("{}: ok", args.file.display());
            Ok(EXIT_SUCCESS)
        }
        Err(e) if e.is_syntax() => {
            println!("{}: {}", args.file.display(), e);
            Ok(EXIT_FAILED)
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the check command.
pub fn run_check(args: &CheckArgs, registry: &Registry) -> anyhow::Result<i32> {
    if !check_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let config = Config::load(args.config.as_deref(), &cwd)?;

    let mut traverse = config.traverse_args();
    if args.recursive {
        traverse.recursion = Recursion::Recurse;
    } else if args.no_recursive {
        traverse.recursion = Recursion::NoRecurse;
    }
    if !args.exclude.is_empty() {
        traverse.exclude.extend(args.exclude.iter().cloned());
        if traverse.exclude_mode == ExcludeMode::Defaults {
            traverse.exclude_mode = ExcludeMode::Append;
        }
    }
    if let Some(mode) = args.exclude_mode {
        traverse.exclude_mode = mode;
    }

    let processor = registry.lookup(&args.language)?;
    let Some(analyzer) = processor.analyzer() else {
        bail!("no documentation rules for language {}", args.language);
    };

    let result = Runner::new(analyzer)
        .rules(config.rules)
        .run(&args.path, &traverse)?;

    for err in &result.parse_errors {
        warn!(path = %err.path, error = %err.message, "file skipped");
    }
    if result.files_scanned == 0 && result.is_partial() {
        eprintln!("Error: no file could be analysed");
        for err in &result.parse_errors {
            eprintln!("  {}: {}", err.path, err.message);
        }
        return Ok(EXIT_ERROR);
    }

    match args.format.as_str() {
        "json" => report::write_json(&args.path, &result)?,
        _ => report::write_pretty(&args.path, &result),
    }

    if result.has_exceptions() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the languages command.
pub fn run_languages(registry: &Registry) -> anyhow::Result<i32> {
    println!("Supported languages:");
    for language in registry.list_languages() {
        let processor = registry.lookup(&language)?;
        let kinds: Vec<&str> = processor
            .supported_part_types()
            .iter()
            .map(|p| p.as_str())
            .collect();
        println!("  {:<10} {}", language, kinds.join(", "));
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_find() {
        let cli = Cli::try_parse_from([
            "partscope", "-vv", "find", "main.go", "--kind", "method", "--name", "*T.Run",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Find(args) => {
                assert_eq!(args.target.kind, PartType::Func);
                assert_eq!(args.target.name, "*T.Run");
                assert_eq!(args.format, "pretty");
            }
            _ => panic!("expected find"),
        }
    }

    #[test]
    fn test_parse_check_flags() {
        let cli = Cli::try_parse_from([
            "partscope",
            "check",
            "./...",
            "--no-recursive",
            "-e",
            "gen",
            "--exclude-mode",
            "replace",
        ])
        .unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.path, "./...");
                assert!(args.no_recursive);
                assert_eq!(args.exclude, vec!["gen"]);
                assert_eq!(args.exclude_mode, Some(ExcludeMode::Replace));
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_replace_sources_conflict() {
        let result = Cli::try_parse_from([
            "partscope", "replace", "a.go", "-k", "func", "-n", "F", "--with", "b.go",
            "--content", "func F() {}",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_select_processor_by_extension() {
        let registry = Registry::with_defaults();
        let processor = select_processor(&registry, Path::new("x/main.GO"), None).unwrap();
        assert_eq!(processor.language(), "go");

        let err = select_processor(&registry, Path::new("main.rs"), None)
            .err()
            .unwrap();
        assert!(err.to_string().contains("supported: go"));
    }
}
