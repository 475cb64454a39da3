use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use keyindex_indexer::{concurrency_from_env, ReindexOptions, Reindexer};
use keyindex_keywords::{KeywordError, KeywordExtractor};
use keyindex_protocol::{
    serialize_json, ErrorEnvelope, ExtractOutput, ReindexReport, REPORT_SCHEMA_VERSION,
};
use keyindex_store::DirStore;

use crate::config::{load_config, FileConfig};
use crate::flags::SchemeFlag;

mod config;
mod flags;
mod report;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "keyindex")]
#[command(about = "Search keyword maintenance for OpenPGP user IDs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML config file (overrides KEYINDEX_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the search keywords derived from user ID strings
    Extract(ExtractArgs),

    /// Recompute identity keywords for every key in a store
    Reindex(ReindexArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// User IDs, e.g. "Alice Example (work) <alice@example.com>"
    #[arg(required = true)]
    identities: Vec<String>,

    /// Keyword scheme (default: from config, else identity)
    #[arg(long, value_enum)]
    scheme: Option<SchemeFlag>,

    /// Existing keywords to retokenize (retokenize scheme only)
    #[arg(long = "keyword")]
    keywords: Vec<String>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ReindexArgs {
    /// Store directory holding one <fingerprint>.json document per key
    #[arg(long)]
    store: PathBuf,

    /// Keyword scheme (default: from config, else identity)
    #[arg(long, value_enum)]
    scheme: Option<SchemeFlag>,

    /// Compute keywords without saving
    #[arg(long)]
    dry_run: bool,

    /// Number of keys processed at once (overrides KEYINDEX_CONCURRENCY)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Only save keys whose keywords changed
    #[arg(long)]
    skip_unchanged: bool,

    /// Write a markdown report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Extract(args) => args.json,
        Commands::Reindex(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let file_config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract(args) => run_extract(args, file_config)?,
        Commands::Reindex(args) => run_reindex(args, file_config).await?,
    }

    Ok(())
}

fn build_extractor(
    file_config: &FileConfig,
    scheme: Option<SchemeFlag>,
) -> Result<KeywordExtractor> {
    let mut config = file_config.keywords.clone();
    if let Some(scheme) = scheme {
        config.scheme = scheme.as_domain();
    }
    KeywordExtractor::new(config).context("Invalid keyword configuration")
}

fn error_envelope(err: &KeywordError) -> ErrorEnvelope {
    match err {
        KeywordError::MalformedIdentity(_) => {
            ErrorEnvelope::new("malformed_identity", err.to_string())
                .with_hint("expected `Name (Comment) <email>`; each part is optional")
        }
        _ => ErrorEnvelope::new("keyword_error", err.to_string()),
    }
}

fn run_extract(args: ExtractArgs, file_config: FileConfig) -> Result<()> {
    let extractor = build_extractor(&file_config, args.scheme)?;

    let results: Vec<ExtractOutput> = args
        .identities
        .iter()
        .map(|identity| match extractor.keywords_for(identity, &args.keywords) {
            Ok(keywords) => ExtractOutput::ok(identity, keywords),
            Err(err) => {
                log::error!("Cannot extract keywords from {identity:?}: {err}");
                ExtractOutput::failed(identity, error_envelope(&err))
            }
        })
        .collect();

    if args.json {
        print_stdout(&serialize_json(&results)?)?;
    } else {
        for result in results.iter().filter(|r| r.is_ok()) {
            let keywords = result.keywords.as_deref().unwrap_or_default();
            print_stdout(&format!("{}\t{}", result.identity, keywords.join(", ")))?;
        }
    }

    if results.iter().all(|r| !r.is_ok()) {
        return Err(anyhow!("No keywords could be extracted"));
    }
    Ok(())
}

async fn run_reindex(args: ReindexArgs, file_config: FileConfig) -> Result<()> {
    let extractor = build_extractor(&file_config, args.scheme)?;
    let scheme = extractor.scheme();

    let mut options: ReindexOptions = file_config.reindex;
    if let Some(concurrency) = concurrency_from_env() {
        options.concurrency = concurrency;
    }
    if args.dry_run {
        options.dry_run = true;
    }
    if let Some(concurrency) = args.concurrency {
        options.concurrency = concurrency;
    }
    if args.skip_unchanged {
        options.save_unchanged = false;
    }

    let store = DirStore::open(&args.store)
        .with_context(|| format!("Cannot open store {}", args.store.display()))?;
    let reindexer = Reindexer::new(Arc::new(store), extractor, options);
    let stats = reindexer.run().await.context("Re-index failed")?;

    let report = ReindexReport {
        schema_version: REPORT_SCHEMA_VERSION,
        store: args.store.display().to_string(),
        scheme: scheme.to_string(),
        options: reindexer.options().clone(),
        stats,
    };

    if let Some(path) = &args.report {
        std::fs::write(path, report::render_reindex_report(&report))
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    if args.json {
        print_stdout(&serialize_json(&report)?)?;
    } else {
        print_stdout(&report::render_summary_line(&report))?;
        for err in &report.stats.errors {
            print_stdout(&format!("skipped {}: {}", err.fingerprint, err.reason))?;
        }
    }
    Ok(())
}
