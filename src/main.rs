use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use intro_score::config::Config;
use intro_score::rubric::{load_rubric, resolve_criterion, validate_rubric, RubricTable};
use intro_score::scoring::{ScoringEngine, SemanticScorer};
use intro_score::{embedding, output};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum Format {
    /// Overall score, breakdown table and feedback
    #[default]
    Table,
    /// Full result as JSON
    Json,
    /// Tab-separated values for scripting
    Tsv,
}

#[derive(clap::Args, Debug, Default)]
struct ScoreArgs {
    /// Transcript file; `-` or omitted reads stdin (or the configured sample)
    transcript: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Also write the JSON report to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Omit the per-criterion feedback section
    #[arg(long)]
    no_feedback: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a transcript against the rubric (default if no subcommand)
    Score(ScoreArgs),
    /// Show the rubric, its resolved criteria and any problems
    Rubric,
    /// Create a config file (and optionally a starter rubric)
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "intro-score")]
#[command(about = "Score spoken self-introduction transcripts against a rubric", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/intro-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Rubric file, overriding the config
    #[arg(short, long, global = true)]
    rubric: Option<PathBuf>,

    /// Embedding model directory, overriding the config
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    intro_score::logging::init_tracing(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Score(ScoreArgs::default()));

    let code = match command {
        Commands::Init => run_init(cli.config),
        Commands::Rubric => match load_context(cli.config, cli.rubric, cli.model_dir) {
            Ok((_, rubric)) => show_rubric(&rubric),
            Err(code) => code,
        },
        Commands::Score(args) => match load_context(cli.config, cli.rubric, cli.model_dir) {
            Ok((config, rubric)) => run_score(&config, &rubric, args),
            Err(code) => code,
        },
    };
    std::process::exit(code);
}

fn run_init(config_path: Option<PathBuf>) -> i32 {
    match intro_score::config::run_init_wizard(config_path) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Init failed: {:#}", e);
            EXIT_FAILURE
        }
    }
}

/// Load config (with CLI overrides) and the rubric it points at. Errors are
/// reported here and turned into an exit code.
fn load_context(
    config_path: Option<PathBuf>,
    rubric: Option<PathBuf>,
    model_dir: Option<PathBuf>,
) -> Result<(Config, RubricTable), i32> {
    let config = match intro_score::config::load_config(config_path) {
        Ok(c) => c.with_overrides(rubric, model_dir),
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return Err(EXIT_CONFIG);
        }
    };

    match load_configured_rubric(&config) {
        Ok(r) => Ok((config, r)),
        Err(e) => {
            eprintln!("Rubric error: {:#}", e);
            Err(EXIT_CONFIG)
        }
    }
}

fn load_configured_rubric(config: &Config) -> Result<RubricTable> {
    let path = config.rubric.as_deref().context(
        "No rubric configured. Pass --rubric <file> or run `intro-score init`",
    )?;
    Ok(load_rubric(path)?)
}

fn show_rubric(rubric: &RubricTable) -> i32 {
    let use_colors = output::should_use_colors();

    println!("{}", output::format_rubric_table(rubric, use_colors));
    println!();

    let criteria: Vec<_> = rubric.rows().iter().map(resolve_criterion).collect();
    println!("{}", output::format_criteria(&criteria, use_colors));

    if let Err(problems) = validate_rubric(rubric) {
        eprintln!();
        eprintln!("Rubric problems:");
        for problem in problems {
            eprintln!("  - {}", problem);
        }
    }
    EXIT_SUCCESS
}

fn run_score(config: &Config, rubric: &RubricTable, args: ScoreArgs) -> i32 {
    let transcript = match read_transcript(args.transcript.as_deref(), config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Transcript error: {:#}", e);
            return EXIT_INPUT;
        }
    };

    if transcript.trim().is_empty() {
        eprintln!("Transcript is empty. Please paste a transcript first.");
        return EXIT_INPUT;
    }

    if let Err(problems) = validate_rubric(rubric) {
        for problem in problems {
            debug!("{}", problem);
        }
    }

    let semantic = SemanticScorer::from_init(embedding::initialize(config.model_dir.as_deref()));
    let engine = ScoringEngine::new(semantic);
    let result = engine.score(&transcript, rubric);

    let rendered = match args.format {
        Format::Table => Ok(output::format_report(
            &result,
            !args.no_feedback,
            output::should_use_colors(),
        )),
        Format::Json => output::format_json(&result),
        Format::Tsv => Ok(output::format_tsv(&result)),
    };

    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => {
            error!("{:#}", e);
            return EXIT_FAILURE;
        }
    }

    if let Some(path) = args.output {
        if let Err(e) = output::save_report(&path, &result) {
            eprintln!("Failed to save report: {:#}", e);
            return EXIT_FAILURE;
        }
        debug!(path = %path.display(), "saved report");
    }

    EXIT_SUCCESS
}

/// Transcript from a file, stdin, or the configured sample (when stdin is a
/// terminal and nothing was given).
fn read_transcript(path: Option<&Path>, config: &Config) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read transcript {}", p.display())),
        Some(_) => read_stdin(),
        None => {
            if std::io::stdin().is_terminal() {
                let sample = config.sample_transcript.as_deref().context(
                    "No transcript given. Pass a file, pipe text on stdin, or set sample_transcript",
                )?;
                std::fs::read_to_string(sample)
                    .with_context(|| format!("Failed to read sample transcript {}", sample.display()))
            } else {
                read_stdin()
            }
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read transcript from stdin")?;
    Ok(buf)
}
