mod assets;
mod logic;
mod play;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdin, stdout};
use std::path::PathBuf;
use std::time::Instant;

use assets::{FileLoader, load_rules};
use ecohk_game::GameEngine;
use logic::{GameplayStrategy, MAX_TURNS_PER_DAY, RunRecord, StrategyAggregate};
use play::PromptLoop;
use util::{clock_seed, parse_seeds, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Interactive game on the terminal
    Play,
    /// Automated runs of the built-in strategies
    Auto,
}

#[derive(Debug, Parser)]
#[command(name = "ecohk-cli", version)]
#[command(about = "Hong Kong Sustainability Challenge - play in the terminal or run automated strategies")]
struct Args {
    /// Play interactively or run the automated harness
    #[arg(long, value_enum, default_value_t = Mode::Play)]
    mode: Mode,

    /// Player name (play mode); asked for when absent
    #[arg(long)]
    name: Option<String>,

    /// Seed for the interactive game's facts and tips
    #[arg(long)]
    seed: Option<u64>,

    /// Seeds to run (comma-separated, auto mode)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Strategies to run (comma-separated or `all`, auto mode)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List the built-in strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Moves per day before the harness ends the day
    #[arg(long, default_value_t = MAX_TURNS_PER_DAY)]
    #[arg(value_parser = clap::value_parser!(u32).range(1..=1000))]
    turns_per_day: u32,

    /// Location and action table (JSON) replacing the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Facts and tips (JSON) replacing the built-in ones
    #[arg(long)]
    content: Option<PathBuf>,

    /// Energy and session rules (JSON)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Output report format (auto mode)
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    let engine = load_engine(&args)?;
    match args.mode {
        Mode::Play => run_play(&args, &engine),
        Mode::Auto => run_auto(&args, &engine),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_engine(args: &Args) -> Result<GameEngine> {
    for path in [&args.catalog, &args.content, &args.rules].into_iter().flatten() {
        if !path.is_file() {
            bail!("required data file {} does not exist", path.display());
        }
    }
    let rules = load_rules(args.rules.as_deref())?;
    let loader = FileLoader::new(args.catalog.clone(), args.content.clone());
    GameEngine::load(&loader, rules).context("failed to load game data")
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in GameplayStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:15} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn run_play(args: &Args, engine: &GameEngine) -> Result<()> {
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("interactive game seeded with {seed}");
    let mut prompt = PromptLoop::new(stdin().lock(), stdout().lock());
    prompt.run(engine, args.name.as_deref(), seed)?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🌏 Sustainability Challenge Harness".bright_cyan().bold());
    println!("{}", "===================================".cyan());
}

fn expand_strategies(strategies_arg: &str) -> Vec<GameplayStrategy> {
    let mut strategies = Vec::new();
    for token in split_csv(strategies_arg) {
        if token == "all" {
            strategies.extend(GameplayStrategy::ALL);
        } else if let Some(strategy) = GameplayStrategy::from_key(&token) {
            strategies.push(strategy);
        } else {
            eprintln!("⚠️  Unknown strategy: {}", token.yellow());
        }
    }
    let mut seen = Vec::with_capacity(strategies.len());
    strategies.retain(|s| {
        let fresh = !seen.contains(s);
        seen.push(*s);
        fresh
    });
    strategies
}

fn run_auto(args: &Args, engine: &GameEngine) -> Result<()> {
    if args.report == "console" || args.output.is_some() {
        announce_banner();
    }
    let start_time = Instant::now();
    let seeds = parse_seeds(&args.seeds)?;
    let strategies = expand_strategies(&args.strategies);
    let records = logic::run_matrix(engine, &strategies, &seeds, args.turns_per_day)?;
    let aggregates = logic::aggregate_runs(&records);
    write_reports(args, &records, &aggregates, start_time)
}

fn write_reports(
    args: &Args,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, records, aggregates)?,
        "markdown" => {
            if records.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Sustainability Challenge Automated Play\n\n_No runs executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, records, aggregates)?;
            }
        }
        _ => {
            if records.is_empty() {
                writeln!(&mut output_target, "No runs executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    records,
                    aggregates,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
