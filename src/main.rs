//! git-lineage - rename-aware file history with trivial-commit reduction
//!
//! # Usage
//! ```bash
//! git-lineage log src/parser.rs                       # History across renames
//! git-lineage reduce src/parser.rs --filter MINOR     # Flag trivial commits
//! git-lineage snapshots src/parser.rs --out versions  # Write ver0, ver1, ...
//! git-lineage issues src/parser.rs --tracker github --target owner/repo
//! git-lineage serve --port 3001                       # HTTP API
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::Context;
use axum::Router;
use clap::{Args, Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_lineage::config::{self, ReduceOptions, TrackerConfig, TrackerKind};
use git_lineage::git::snapshot::{ExportMode, ExportOutcome, SnapshotSeries};
use git_lineage::models::{FileHistory, ReducedHistory};
use git_lineage::{AppError, GitRepository, export, issues, routes};

/// Rename-aware file history with trivial-commit density reduction
#[derive(Parser)]
#[command(name = "git-lineage", version)]
#[command(about = "Follow a file through renames and flag commits that changed nothing substantive", long_about = None)]
struct Cli {
    /// Path to the git repository (or any directory inside it)
    #[arg(short, long, global = true, default_value = ".", env = "GIT_LINEAGE_REPO")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the commits that touched a file under any of its names
    Log {
        /// File path relative to the repository root, as named at HEAD
        file: String,
    },
    /// Classify every commit of a file's history as substantive or trivial
    Reduce {
        file: String,
        #[command(flatten)]
        reduce: ReduceArgs,
        /// Only print substantive (or, with --filter, unfiltered) commits
        #[arg(long)]
        hide_trivial: bool,
        /// Read versions from this snapshot export, writing it first if empty
        #[arg(long, value_name = "DIR")]
        snapshots: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Materialize every version of a file into ver0 (oldest), ver1, ...
    Snapshots {
        file: String,
        /// Target directory
        #[arg(short, long)]
        out: PathBuf,
        /// What to do when the target already holds files
        #[arg(long, value_enum, default_value_t = ExportMode::Reuse)]
        mode: ExportMode,
    },
    /// Reduce a history and attach the pull request or ticket of each commit
    Issues {
        file: String,
        #[arg(long, value_enum)]
        tracker: TrackerKind,
        /// `owner/repo` for GitHub, the server base URL for Jira
        #[arg(long)]
        target: String,
        #[command(flatten)]
        reduce: ReduceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Serve the HTTP API
    Serve {
        /// Port to run the server on
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },
}

#[derive(Args)]
struct ReduceArgs {
    /// Words that mark a trivial commit as filtered (case-sensitive, repeatable)
    #[arg(short, long = "filter", value_delimiter = ',')]
    filter: Vec<String>,
    /// Line prefixes counted as imports (default: "import")
    #[arg(long = "import-keyword", value_delimiter = ',')]
    import_keywords: Vec<String>,
}

impl ReduceArgs {
    fn options(&self) -> ReduceOptions {
        ReduceOptions::new(self.filter.clone(), self.import_keywords.clone())
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Write JSON records to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn print_history(history: &FileHistory) {
    if history.is_empty() {
        println!("No commits touch {}", history.path);
        return;
    }
    for entry in &history.entries {
        println!(
            "  {}  {:<16}  {:<40}  {}",
            entry.commit.short_oid(),
            entry.commit.relative_time(),
            entry.path,
            entry.commit.summary
        );
    }
    println!();
    println!(
        "  {} commits, {} renames, {} log queries",
        history.len(),
        history.renames.len(),
        history.iterations
    );
}

fn print_reduced(reduced: &ReducedHistory) {
    for c in &reduced.commits {
        let label = if c.rename_only {
            "rename"
        } else if c.is_filtered() {
            "filtered"
        } else if c.is_trivial() {
            "trivial"
        } else {
            ""
        };
        println!(
            "  {}  {:<8}  {:>4}  {:<16}  {}",
            c.commit.short_oid(),
            label,
            c.classification.counts.substantive,
            c.commit.author.name,
            c.commit.summary
        );
    }
    let s = &reduced.summary;
    println!();
    println!(
        "  {} commits: {} substantive, {} trivial ({} filtered, {} rename-only)",
        s.total, s.substantive, s.trivial, s.filtered, s.rename_only
    );
}

fn open(path: &Path) -> anyhow::Result<GitRepository> {
    GitRepository::open(path).with_context(|| format!("Failed to open repository at {}", path.display()))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Log { file } => {
            let repo = open(&cli.repo)?;
            let history = repo.file_history(&file)?;
            print_history(&history);
        }
        Commands::Reduce {
            file,
            reduce,
            hide_trivial,
            snapshots,
            output,
        } => {
            let repo = open(&cli.repo)?;
            let options = reduce.options();
            let mut reduced = match &snapshots {
                Some(dir) => repo.reduced_history_with_snapshots(&file, &options, dir)?,
                None => repo.reduced_history(&file, &options)?,
            };
            if let Some(path) = &output.output {
                export::write_json(path, &export::records(&reduced, &[]))?;
            }
            if hide_trivial {
                reduced.hide_trivial(!options.filter_words.is_empty());
            }
            if output.json {
                println!("{}", serde_json::to_string_pretty(&reduced)?);
            } else {
                print_reduced(&reduced);
            }
        }
        Commands::Snapshots { file, out, mode } => {
            let repo = open(&cli.repo)?;
            let (_, outcome) = repo.with_repo(|r| {
                let history = git_lineage::git::history::build_history(r, &file)?;
                SnapshotSeries::materialize_into(r, &history, &out, mode)
            })?;
            match outcome {
                ExportOutcome::Written(n) => println!("✓ Wrote {} versions to {}", n, out.display()),
                ExportOutcome::Skipped => println!("✓ {} already holds snapshots, reusing them", out.display()),
            }
        }
        Commands::Issues {
            file,
            tracker,
            target,
            reduce,
            output,
        } => {
            let repo = open(&cli.repo)?;
            let reduced = repo.reduced_history(&file, &reduce.options())?;
            let tracker = TrackerConfig::from_env(tracker, &target)?.build();
            let correlated = issues::correlate(&*tracker, reduced.commits.iter().map(|c| &c.commit))?;
            let records = export::records(&reduced, &correlated);

            if let Some(path) = &output.output {
                export::write_json(path, &records)?;
            }
            if output.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    let issue = match (&record.reference, &record.issue) {
                        (Some(r), Some(i)) => format!("{} {} ({} comments, {} people)", r, i.title, i.comment_count, i.people_involved),
                        (Some(r), None) => format!("{} (not found)", r),
                        _ => String::new(),
                    };
                    println!("  {:.10}  {:<5}  {}", record.oid, if record.trivial { "triv" } else { "" }, issue);
                }
            }
        }
        Commands::Serve { port } => serve(cli.repo, port).await?,
    }
    Ok(())
}

async fn serve(repo_path: PathBuf, port: u16) -> anyhow::Result<()> {
    let repo = open(&repo_path)?;
    let canonical_path = std::fs::canonicalize(&repo_path)
        .unwrap_or_else(|_| repo_path.clone())
        .to_string_lossy()
        .to_string();

    let shared_repo = Arc::new(RwLock::new(repo));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(shared_repo))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to port {}, try a different one with --port", port))?;

    println!();
    println!("  Repository: {}", canonical_path);
    println!("  Server:     http://{}", addr);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    // Quiet by default; RUST_LOG=git_lineage=debug for stage traces
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Before parsing, so `.env` can supply GIT_LINEAGE_REPO
    config::load_dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("✗ {:#}", e);
        if e.downcast_ref::<AppError>().is_some_and(AppError::is_retryable) {
            eprintln!("  The issue tracker could not be reached; rerun once it is available.");
        }
        std::process::exit(1);
    }
}
