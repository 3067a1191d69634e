use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use codescope::core::resolver::normalize_path;
use codescope::formatters::{JsonFormatter, QueryReport, TextFormatter};
use codescope::parsers::tree::SyntaxTree;
use codescope::parsers::{ParserFactory, SourceLanguage};
use codescope::{
    query_at_offset, AnalyzerConfig, CacheMode, CodebaseAnalyzer, DependencyEdge,
    DependencyIndex, Position, ResolutionPolicy,
};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "codescope",
    version,
    about = "Find the code that depends on a TypeScript/JavaScript file or function"
)]
struct Cli {
    /// Workspace root to analyze (repeat for several roots)
    #[arg(short, long, value_name = "PATH", required = true)]
    input: Vec<PathBuf>,

    /// File whose dependents are reported; omit to print the whole index
    #[arg(value_name = "TARGET")]
    target: Option<PathBuf>,

    /// Only report calls to this imported function
    #[arg(short, long, value_name = "NAME", requires = "target", conflicts_with_all = ["offset", "at"])]
    function: Option<String>,

    /// Report dependents of the function enclosing this byte offset of TARGET
    #[arg(long, value_name = "BYTES", requires = "target", conflicts_with = "at")]
    offset: Option<usize>,

    /// Report dependents of the function enclosing LINE:COL (1-based) of TARGET
    #[arg(long, value_name = "LINE:COL", requires = "target", value_parser = parse_line_col)]
    at: Option<Position>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// What to do with relative imports that match no file
    #[arg(long, value_enum)]
    resolution: Option<ResolutionArg>,

    /// Comma-separated file extensions to analyze
    #[arg(long, value_name = "EXTS", value_delimiter = ',')]
    extensions: Option<Vec<String>>,

    /// Comma-separated directory names to skip
    #[arg(long, value_name = "DIRS", value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Persist parsed syntax here and reuse it for unchanged files
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum ResolutionArg {
    Strict,
    Lenient,
}

impl From<ResolutionArg> for ResolutionPolicy {
    fn from(arg: ResolutionArg) -> Self {
        match arg {
            ResolutionArg::Strict => ResolutionPolicy::Strict,
            ResolutionArg::Lenient => ResolutionPolicy::Lenient,
        }
    }
}

fn parse_line_col(raw: &str) -> std::result::Result<Position, String> {
    let (line, column) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got '{raw}'"))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line '{line}'"))?;
    let column: usize = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{column}'"))?;
    if line == 0 || column == 0 {
        return Err("LINE and COL are 1-based".to_string());
    }
    Ok(Position::new(line - 1, column - 1))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();
    let config = build_config(&cli)?;

    let target = cli.target.as_deref().map(resolve_target).transpose()?;
    if let Some(target) = &target {
        if SourceLanguage::from_path(target).is_none() {
            bail!(
                "codescope only supports JavaScript and TypeScript files: {}",
                target.display()
            );
        }
    }

    let analyzer = CodebaseAnalyzer::new(config);
    let index = analyzer.analyze(&cli.input)?;

    let base = cli.input.first().and_then(|root| root.canonicalize().ok());
    let rendered = match &target {
        Some(target) => render_query(&cli, target, &index, base.as_deref())?,
        None => render_index(&cli, &index, base.as_deref())?,
    };

    match &cli.output {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }

    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "analysis complete"
    );
    Ok(())
}

fn build_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::from_file(path)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(resolution) = cli.resolution {
        config.resolution = resolution.into();
    }
    if let Some(extensions) = &cli.extensions {
        config.include_extensions = extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
    }
    if let Some(exclude) = &cli.exclude {
        config.exclude_dirs = exclude
            .iter()
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty())
            .collect();
    }
    if let Some(dir) = &cli.cache_dir {
        config.cache = CacheMode::Disk { dir: dir.clone() };
    }
    config.validate()?;
    Ok(config)
}

/// Absolute, normalized form of the target, matching the index keys. A file
/// that no longer exists is still looked up by its lexical path.
fn resolve_target(target: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = target.canonicalize() {
        return Ok(canonical);
    }
    let absolute = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to read current directory")?
            .join(target)
    };
    Ok(normalize_path(&absolute))
}

fn render_query(
    cli: &Cli,
    target: &Path,
    index: &DependencyIndex,
    base: Option<&Path>,
) -> Result<String> {
    let cursor = cursor_offset(cli, target)?;

    let (function, dependencies): (Option<String>, Vec<&DependencyEdge>) =
        if let Some(name) = &cli.function {
            (Some(name.clone()), index.dependencies_on_function(target, name))
        } else if let Some((tree, offset)) = &cursor {
            let query = query_at_offset(index, tree, target, *offset);
            (query.function.map(|info| info.name), query.dependencies)
        } else {
            (None, index.get_dependencies(target).iter().collect())
        };

    let report = QueryReport::new(target, function.as_deref(), dependencies);
    match cli.format {
        OutputFormat::Text => {
            let mut formatter = TextFormatter::new();
            if let Some(base) = base {
                formatter = formatter.with_base(base);
            }
            formatter.format_report(&report)
        }
        OutputFormat::Json => Ok(JsonFormatter::new().format_report(&report)? + "\n"),
    }
}

fn render_index(cli: &Cli, index: &DependencyIndex, base: Option<&Path>) -> Result<String> {
    match cli.format {
        OutputFormat::Text => {
            let mut formatter = TextFormatter::new();
            if let Some(base) = base {
                formatter = formatter.with_base(base);
            }
            formatter.format_index(index)
        }
        OutputFormat::Json => Ok(JsonFormatter::new().format_index(index)? + "\n"),
    }
}

/// Parse the target and turn `--offset`/`--at` into a byte offset.
fn cursor_offset(cli: &Cli, target: &Path) -> Result<Option<(SyntaxTree, usize)>> {
    if cli.offset.is_none() && cli.at.is_none() {
        return Ok(None);
    }
    let tree = ParserFactory::new()
        .parser_for_path(target)?
        .parse_file(target)
        .with_context(|| format!("failed to parse {}", target.display()))?;

    let offset = match (cli.offset, cli.at) {
        (Some(offset), _) => offset,
        (None, Some(position)) => tree.offset_of(position).ok_or_else(|| {
            anyhow!(
                "{}:{} is outside {}",
                position.line + 1,
                position.character + 1,
                target.display()
            )
        })?,
        (None, None) => return Ok(None),
    };
    Ok(Some((tree, offset)))
}
