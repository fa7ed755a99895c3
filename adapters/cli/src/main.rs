#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates and prints hulkgen layouts.

mod layout_transfer;
mod text_backend;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hulkgen_core::{GeneratorConfig, StallPolicy};
use hulkgen_rendering::{render, RenderContext, RenderingBackend};
use hulkgen_system_generator::{GenerationReport, Generator, SeededRandom};
use hulkgen_world::{query, Grid};
use log::info;

use layout_transfer::GridLayoutSnapshot;
use text_backend::TextBackend;

/// Procedural room-and-corridor layout generator.
#[derive(Parser, Debug)]
#[command(name = "hulkgen", version, about, long_about = None)]
struct Args {
    /// Number of grid columns.
    #[arg(long, default_value_t = 32)]
    width: u32,

    /// Number of grid rows.
    #[arg(long, default_value_t = 32)]
    height: u32,

    /// Seed for the random source; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file holding generator settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of placement steps.
    #[arg(long, conflicts_with = "unbounded")]
    max_steps: Option<u32>,

    /// Removes the step ceiling entirely.
    #[arg(long)]
    unbounded: bool,

    /// Behaviour when a corridor step finds no valid candidate.
    #[arg(long, value_enum)]
    stall_policy: Option<StallPolicyArg>,

    /// Output produced once the layout is ready.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Presents an encoded layout string instead of generating one.
    #[arg(long, value_name = "LAYOUT")]
    import: Option<String>,

    /// Enables debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StallPolicyArg {
    Advance,
    Terminate,
}

impl From<StallPolicyArg> for StallPolicy {
    fn from(value: StallPolicyArg) -> Self {
        match value {
            StallPolicyArg::Advance => Self::Advance,
            StallPolicyArg::Terminate => Self::Terminate,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Board printout with `#` for filled cells.
    Text,
    /// Single-line layout transfer string.
    Layout,
    /// Outcome and counters of the run.
    Summary,
}

/// Entry point for the hulkgen command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(layout) = &args.import {
        let grid = GridLayoutSnapshot::decode(layout)
            .and_then(GridLayoutSnapshot::into_grid)
            .context("failed to import layout")?;
        info!(
            "imported {}x{} layout with {} filled cells",
            grid.width(),
            grid.height(),
            query::filled_count(&grid)
        );
        return emit(args.format, &grid, None);
    }

    let config = resolve_config(&args)?;
    let mut rng = match args.seed {
        Some(seed) => SeededRandom::new(seed),
        None => SeededRandom::from_entropy(),
    };
    eprintln!("seed: {}", rng.seed());

    let generator = Generator::new(args.width, args.height, config)
        .context("failed to create generator")?;
    let report = generator.run(&mut rng);

    emit(args.format, &report.grid, Some(&report))
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn resolve_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(limit) = args.max_steps {
        config.max_steps = Some(limit);
    }
    if args.unbounded {
        config.max_steps = None;
    }
    if let Some(policy) = args.stall_policy {
        config.stall_policy = policy.into();
    }

    Ok(config)
}

fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn emit(format: OutputFormat, grid: &Grid, report: Option<&GenerationReport>) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let frame = render(grid, &RenderContext::default());
            TextBackend::new(io::stdout().lock()).present(&frame)
        }
        OutputFormat::Layout => {
            let encoded = GridLayoutSnapshot::from_grid(grid)
                .encode()
                .context("failed to encode layout")?;
            println!("{encoded}");
            Ok(())
        }
        OutputFormat::Summary => {
            println!("size: {}x{}", grid.width(), grid.height());
            if let Some(report) = report {
                println!("outcome: {:?}", report.outcome);
                println!("steps: {}", report.steps);
                println!("rooms: {}", report.stats.rooms_placed);
                println!("corridors: {}", report.stats.corridors_placed);
                println!("skipped corridors: {}", report.stats.corridors_skipped);
            }
            println!("filled cells: {}", query::filled_count(grid));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(arguments: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("hulkgen").chain(arguments.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn defaults_match_the_reference_board() {
        let args = parse(&[]);
        assert_eq!((args.width, args.height), (32, 32));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(
            resolve_config(&args).expect("config resolves"),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn flags_override_the_default_config() {
        let args = parse(&["--max-steps", "12", "--stall-policy", "terminate"]);
        let config = resolve_config(&args).expect("config resolves");
        assert_eq!(config.max_steps, Some(12));
        assert_eq!(config.stall_policy, StallPolicy::Terminate);

        let config = resolve_config(&parse(&["--unbounded"])).expect("config resolves");
        assert_eq!(config.max_steps, None);
    }

    #[test]
    fn step_ceiling_and_unbounded_conflict() {
        let result = Args::try_parse_from(["hulkgen", "--max-steps", "5", "--unbounded"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_file_values_are_loaded_and_overridden() {
        let path = std::env::temp_dir().join(format!("hulkgen-config-{}.toml", std::process::id()));
        fs::write(
            &path,
            "corridor_length = 6\nstall_policy = \"terminate\"\nmax_steps = 50\n",
        )
        .expect("config written");

        let path_arg = path.display().to_string();
        let args = parse(&["--config", &path_arg, "--stall-policy", "advance"]);
        let config = resolve_config(&args).expect("config resolves");
        let _ = fs::remove_file(&path);

        assert_eq!(config.corridor_length, 6);
        assert_eq!(config.max_steps, Some(50));
        assert_eq!(config.stall_policy, StallPolicy::Advance);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args = parse(&["--config", "/nonexistent/hulkgen.toml"]);
        let error = resolve_config(&args).expect_err("missing file must fail");
        assert!(error.to_string().contains("failed to read config file"));
    }
}
