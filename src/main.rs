// codescope CLI - index a source tree and query it in one run
use anyhow::Result;
use clap::{Parser, Subcommand};

// Macro for conditional printing based on quiet flag
macro_rules! qprintln {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            println!($($arg)*);
        }
    };
}

use codescope::path_utils::normalize_path_relative;
use codescope::{
    init_logging_with_level, with_trace_id, IndexerConfig, SymbolIndexBuilder,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "codescope - symbol index and search for source trees",
    long_about = None,
    after_help = "The index lives in memory only; every invocation rescans ROOT.

EXAMPLES:
  codescope ./MyApp search UserProfile
  codescope ./MyApp search 'load' --limit 5 --json
  codescope ./MyApp similar Sources/Profile/ProfileView.swift
  codescope ./MyApp stats"
)]
struct Cli {
    /// Enable verbose logging (DEBUG level). Default is WARN level.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print results, no progress or summaries
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// TOML file overriding the indexer configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory to index
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank files by path, symbol and content matches for a keyword
    Search {
        query: String,
        /// Maximum number of results to return
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List files sharing language and symbol names with a given file
    Similar {
        path: PathBuf,
        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show file, size and symbol totals
    Stats,
}

fn display_path(path: &Path, root: &Path) -> String {
    normalize_path_relative(path, root)
}

async fn run(cli: Cli) -> Result<()> {
    let quiet = cli.quiet || cli.json;

    let config = match &cli.config {
        Some(path) => IndexerConfig::from_file(path)?,
        None => IndexerConfig::load()?,
    };
    let index = SymbolIndexBuilder::new().config(config).build()?;

    let summary = index.index_directory_with_summary(&cli.root).await?;
    let root = std::fs::canonicalize(&cli.root).unwrap_or_else(|_| cli.root.clone());
    qprintln!(
        quiet,
        "Indexed {} files ({} symbols) in {:?}, {} skipped, {} unreadable",
        summary.indexed,
        summary.symbols,
        summary.elapsed,
        summary.skipped,
        summary.failed
    );

    match cli.command {
        Commands::Search { query, limit } => {
            if query.is_empty() {
                println!("Empty search query provided. Please specify a search term.");
                return Ok(());
            }

            let hits = index.search(&query, limit).await?;
            let query_lower = query.to_lowercase();

            if cli.json {
                let results: Vec<_> = hits
                    .iter()
                    .map(|hit| {
                        serde_json::json!({
                            "path": hit.file.path,
                            "language": hit.file.language,
                            "score": hit.score,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }

            if hits.is_empty() {
                println!("No matches for '{query}'");
            }
            for hit in &hits {
                println!("{:>7.1}  {}", hit.score, display_path(&hit.file.path, &root));
                for symbol in hit
                    .file
                    .symbols
                    .iter()
                    .filter(|s| s.name.to_lowercase().contains(&query_lower))
                {
                    println!("           {}:{} {}", symbol.line, symbol.kind, symbol.name);
                }
            }
        }

        Commands::Similar { path, limit } => {
            let similar = index.find_similar_files(&path, limit).await?;

            if cli.json {
                let results: Vec<_> = similar
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "path": s.file.path,
                            "language": s.file.language,
                            "score": s.score,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }

            if similar.is_empty() {
                println!("No similar files for {}", path.display());
            }
            for entry in &similar {
                println!("{:>7.1}  {}", entry.score, display_path(&entry.file.path, &root));
            }
        }

        Commands::Stats => {
            let stats = index.get_statistics().await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            println!("Files:   {}", stats.total_files);
            println!("Bytes:   {}", stats.total_size);
            println!("Symbols: {}", stats.total_symbols);
            for (language, count) in &stats.language_counts {
                println!("  {language:<12} {count}");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Ignore error if already initialized
    let _ = init_logging_with_level(cli.verbose, cli.quiet);

    with_trace_id("codescope-cli", run(cli)).await
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
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["codescope", "./app", "search", "Profile", "-l", "3"])
            .expect("valid arguments");
        assert_eq!(cli.root, PathBuf::from("./app"));
        match cli.command {
            Commands::Search { query, limit } => {
                assert_eq!(query, "Profile");
                assert_eq!(limit, 3);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["codescope", "-v", "-q", ".", "stats"]).is_err());
    }
}
