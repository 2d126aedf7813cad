#![deny(unsafe_code)]

//! Quiver CLI: run the strategy engine from the command line.

mod build_info;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use quiver_algorithms::SubstringInput;
use quiver_config::AppConfig;
use quiver_core::{
    Category, CatalogEntry, ComplexityClass, Engine, EngineBuilder, SelectorHint,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Quiver: pick the right algorithm for the input at hand.
#[derive(Parser)]
#[command(
    name = "quiver",
    version = build_info::VERSION,
    long_version = build_info::LONG_VERSION,
    about,
    long_about = None
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "quiver.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort integers with the best applicable strategy.
    Sort(SortArgs),

    /// Find the first index of a value.
    Search {
        /// Value to look for.
        #[arg(allow_negative_numbers = true)]
        target: i64,

        /// Values to search.
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,

        /// The values are in ascending order.
        #[arg(long)]
        sorted: bool,

        /// Use this strategy instead of selecting one.
        #[arg(long, value_name = "NAME")]
        force: Option<String>,
    },

    /// Find every occurrence of a pattern in a text.
    Find {
        pattern: String,
        text: String,

        /// Use this strategy instead of selecting one.
        #[arg(long, value_name = "NAME")]
        force: Option<String>,
    },

    /// List registered strategies.
    List {
        /// Print the catalog as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[derive(Args)]
struct SortArgs {
    /// Values to sort.
    #[arg(required = true, allow_negative_numbers = true)]
    values: Vec<i64>,

    /// Declared input size (defaults to the number of values).
    #[arg(long)]
    size: Option<u64>,

    /// The values are already sorted.
    #[arg(long)]
    sorted: bool,

    /// The values are mostly sorted.
    #[arg(long)]
    nearly_sorted: bool,

    #[arg(long)]
    prefer_stable: bool,

    #[arg(long)]
    prefer_in_place: bool,

    /// Allow running on the worker pool.
    #[arg(long)]
    prefer_parallel: bool,

    /// Auxiliary memory budget in bytes.
    #[arg(long, value_name = "BYTES")]
    memory_budget: Option<u64>,

    /// Worst acceptable time complexity, e.g. "O(n log n)".
    #[arg(long, value_name = "CLASS")]
    max_complexity: Option<String>,

    /// Use this strategy instead of selecting one.
    #[arg(long, value_name = "NAME")]
    force: Option<String>,

    /// Print the candidate ranking before sorting.
    #[arg(long)]
    explain: bool,
}

impl SortArgs {
    fn hint(&self) -> Result<SelectorHint> {
        let mut hint = SelectorHint::new();
        hint.size = self.size;
        if self.sorted {
            hint = hint.with_sorted(true);
        }
        if self.nearly_sorted {
            hint = hint.with_nearly_sorted(true);
        }
        if self.prefer_stable {
            hint = hint.prefer_stable();
        }
        if self.prefer_in_place {
            hint = hint.prefer_in_place();
        }
        if self.prefer_parallel {
            hint = hint.prefer_parallel();
        }
        if let Some(bytes) = self.memory_budget {
            hint = hint.with_memory_budget(bytes);
        }
        if let Some(class) = &self.max_complexity {
            let class: ComplexityClass = class
                .parse()
                .with_context(|| format!("invalid --max-complexity '{class}'"))?;
            hint = hint.with_max_complexity(class);
        }
        if let Some(name) = &self.force {
            hint = hint.force(name);
        }
        Ok(hint)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config).await?;

    // RUST_LOG wins, then -v, then the configured level.
    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        version = build_info::VERSION,
        git = build_info::GIT_HASH,
        profile = build_info::BUILD_PROFILE,
        "quiver starting"
    );

    match cli.command {
        Commands::Sort(args) => cmd_sort(&config, args).await?,
        Commands::Search {
            target,
            values,
            sorted,
            force,
        } => cmd_search(&config, target, values, sorted, force).await?,
        Commands::Find {
            pattern,
            text,
            force,
        } => cmd_find(&config, pattern, text, force).await?,
        Commands::List { json } => cmd_list(&config, json)?,
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

async fn cmd_sort(config: &AppConfig, args: SortArgs) -> Result<()> {
    let engine = build_engine(config)?;
    let hint = args.hint()?;

    if args.explain {
        let explanation = engine.explain::<Vec<i64>, Vec<i64>>(
            Category::Sorting,
            &args.values,
            &hint.or_size(args.values.len() as u64),
        )?;
        print!("{explanation}");
    }

    let result = engine.sort(args.values, &hint).await?;
    println!("{}", join(&result.output));
    let meta = &result.selected_strategy_metadata;
    info!(
        strategy = %result.selected_strategy_name,
        time = %meta.time_complexity,
        space = %meta.space_complexity,
        micros = result.execution_time_micros,
        mode = %result.mode,
        "Sorted"
    );
    Ok(())
}

async fn cmd_search(
    config: &AppConfig,
    target: i64,
    values: Vec<i64>,
    sorted: bool,
    force: Option<String>,
) -> Result<()> {
    let engine = build_engine(config)?;
    let mut hint = SelectorHint::new();
    if sorted {
        hint = hint.with_sorted(true);
    }
    if let Some(name) = force {
        hint = hint.force(name);
    }

    let result = engine.search(values, target, &hint).await?;
    match result.found_index {
        Some(index) => println!("{index}"),
        None => println!("not found"),
    }
    info!(
        strategy = %result.selected_strategy_name,
        micros = result.execution_time_micros,
        "Searched"
    );
    Ok(())
}

async fn cmd_find(
    config: &AppConfig,
    pattern: String,
    text: String,
    force: Option<String>,
) -> Result<()> {
    let engine = build_engine(config)?;
    let mut hint = SelectorHint::new().with_size(text.len() as u64);
    if let Some(name) = force {
        hint = hint.force(name);
    }

    let input = SubstringInput::new(text, pattern);
    let result = engine
        .execute::<SubstringInput, Vec<usize>>(Category::StringProcessing, input, &hint)
        .await?;
    if result.output.is_empty() {
        println!("no match");
    } else {
        println!("{}", join(&result.output));
    }
    info!(
        strategy = %result.strategy_name,
        micros = result.execution_time_micros(),
        "Found"
    );
    Ok(())
}

fn cmd_list(config: &AppConfig, json: bool) -> Result<()> {
    let engine = build_engine(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(engine.catalog())?);
    } else {
        print!("{}", render_catalog(engine.catalog()));
    }
    Ok(())
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        // Building the engine also checks ranker weights and the backend.
        build_engine(config)?;
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Engine with the standard catalog over `i64`, configured from `config`.
fn build_engine(config: &AppConfig) -> Result<Engine> {
    let mut builder = EngineBuilder::from_config(config)?;
    quiver_algorithms::register_standard_catalog::<i64>(&mut builder)?;
    Ok(builder.build())
}

fn render_catalog(entries: &[CatalogEntry]) -> String {
    let mut out = format!(
        "{:<22} {:<18} {:<11} {:<9} {}\n",
        "NAME", "CATEGORY", "TIME", "SPACE", "PROPERTIES"
    );
    for entry in entries {
        let meta = &entry.metadata;
        let mut properties = Vec::new();
        if meta.stable {
            properties.push("stable");
        }
        if meta.in_place {
            properties.push("in-place");
        }
        if entry.parallel_capable {
            properties.push("parallel");
        }
        out.push_str(&format!(
            "{:<22} {:<18} {:<11} {:<9} {}\n",
            meta.name,
            entry.category.to_string(),
            meta.time_complexity.as_str(),
            meta.space_complexity.as_str(),
            properties.join(", ")
        ));
    }
    out
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

async fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        AppConfig::load(path)
            .await
            .with_context(|| format!("failed to load '{}'", path.display()))
    } else {
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn sort_args(argv: &[&str]) -> SortArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Sort(args) => args,
            _ => panic!("expected sort"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sort_flags_become_hint() {
        let args = sort_args(&[
            "quiver",
            "sort",
            "3",
            "-1",
            "2",
            "--size",
            "10",
            "--nearly-sorted",
            "--prefer-stable",
            "--memory-budget",
            "256",
            "--max-complexity",
            "O(n log n)",
        ]);
        assert_eq!(args.values, vec![3, -1, 2]);

        let hint = args.hint().unwrap();
        assert_eq!(hint.size, Some(10));
        assert_eq!(hint.nearly_sorted, Some(true));
        assert_eq!(hint.sorted, None);
        assert_eq!(hint.prefer_stable, Some(true));
        assert_eq!(hint.prefer_in_place, None);
        assert_eq!(hint.memory_budget_bytes, Some(256));
        assert_eq!(hint.max_complexity, Some(ComplexityClass::Linearithmic));
    }

    #[test]
    fn test_bad_max_complexity_is_reported() {
        let args = sort_args(&["quiver", "sort", "1", "--max-complexity", "O(fast)"]);
        let err = args.hint().unwrap_err();
        assert!(err.to_string().contains("O(fast)"));
    }

    #[test]
    fn test_sort_requires_values() {
        assert!(Cli::try_parse_from(["quiver", "sort"]).is_err());
    }

    #[test]
    fn test_search_accepts_negative_target() {
        let cli = Cli::try_parse_from(["quiver", "search", "-4", "1", "-4", "--sorted"]).unwrap();
        match cli.command {
            Commands::Search {
                target,
                values,
                sorted,
                force,
            } => {
                assert_eq!(target, -4);
                assert_eq!(values, vec![1, -4]);
                assert!(sorted);
                assert_eq!(force, None);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_render_catalog_lists_standard_strategies() {
        let engine = build_engine(&AppConfig::default()).unwrap();
        let table = render_catalog(engine.catalog());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 10);
        assert!(lines[0].starts_with("NAME"));
        assert!(table.contains("parallel_merge_sort"));
        assert!(table.contains("stable, parallel"));
        assert!(table.contains("kmp_substring"));
    }

    #[test]
    fn test_catalog_serializes_to_json() {
        let engine = build_engine(&AppConfig::default()).unwrap();
        let json = serde_json::to_value(engine.catalog()).unwrap();
        assert_eq!(json[0]["metadata"]["name"], "insertion_sort");
        assert_eq!(json[0]["metadata"]["time_complexity"], "O(n²)");
        assert_eq!(json[0]["category"], "sorting");
    }

    #[tokio::test]
    async fn test_load_config_from_file_and_fallback() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("quiver.toml");
        tokio::fs::write(&path, "[worker]\nbackend = \"inline\"\n")
            .await
            .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.worker.backend, "inline");

        let missing = load_config(&dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(missing.worker.backend, "auto");
    }

    #[test]
    fn test_config_builder_round_trips_through_engine() {
        let config = quiver_test_utils::config::TestConfigBuilder::new()
            .ranker("favor-simple")
            .weight("O(n)", 0)
            .worker_backend("inline")
            .build();
        let engine = build_engine(&config).unwrap();
        assert_eq!(engine.ranker().rank(ComplexityClass::Linear), 0);
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&[1, 2, 3]), "1 2 3");
        assert_eq!(join::<u8>(&[]), "");
    }
}
