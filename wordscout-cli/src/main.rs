use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use std::{path::PathBuf, thread, time::Duration};
use tracing::{info, warn};
use wordscout::{
    CancellationToken, CountConfig, CountSettings, CountSummary, FileCount, FileProcessor,
    SettingsOverrides,
};

/// Count occurrences of a word across files using a pool of worker threads
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to scan (overrides `files` from configuration)
    files: Vec<PathBuf>,

    /// Word to count (case-sensitive substring)
    #[arg(short, long)]
    word: Option<String>,

    /// Number of worker threads
    #[arg(short = 'j', long = "workers", allow_negative_numbers = true)]
    workers: Option<i64>,

    /// Configuration file to read in addition to the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show only the summary, not per-file results
    #[arg(short, long)]
    stats: bool,

    /// Print results as JSON, one object per line
    #[arg(long)]
    json: bool,

    /// Print results ordered by path instead of completion order
    #[arg(long)]
    sort: bool,

    /// Cancel the run after this long (e.g. 500ms, 2s)
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = CountSettings::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?
        .merge_with_cli(SettingsOverrides {
            files: cli.files.clone(),
            word: cli.word.clone(),
            worker_count: cli.workers,
            log_level: None,
        });

    setup_logging(cli.verbose, &settings.log_level);

    let config = settings.validate().context("Invalid configuration")?;
    info!("Files: {:?}", config.files());
    info!("Word: {}", config.word());
    info!("Workers: {}", config.worker_count());

    let cancel = CancellationToken::new();
    if let Some(timeout) = cli.timeout {
        let cancel = cancel.clone();
        thread::spawn(move || {
            thread::sleep(timeout);
            warn!(
                "Timeout of {} reached, cancelling",
                humantime::format_duration(timeout)
            );
            cancel.cancel();
        });
    }

    let processor = FileProcessor::new(config);
    let config = processor.config();
    // Thread exhaustion is the only way a validated run fails to start
    let results = processor
        .process_files(&cancel)
        .context("Failed to start workers")?;

    let mut summary = CountSummary::new();
    for file_count in results {
        if !cli.stats && !cli.sort {
            print_file_count(&file_count, cli.json)?;
        }
        summary.add_file_count(file_count);
    }

    if !cli.stats && cli.sort {
        for file_count in summary.sorted_by_path() {
            print_file_count(file_count, cli.json)?;
        }
    }

    if cli.json {
        if cli.stats {
            print_summary_json(&summary, config);
        }
    } else {
        print_summary(&summary, config);
    }

    // Per-file errors are reported above; the run itself succeeded
    Ok(())
}

fn setup_logging(verbose: u8, log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::try_new(log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_file_count(file_count: &FileCount, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(file_count)?);
        return Ok(());
    }

    let path = file_count.path().display().to_string();
    match &file_count.outcome {
        Ok(count) => println!(
            "Processed file: {}; Word Count: {}",
            path.blue(),
            count.to_string().green()
        ),
        Err(e) => println!(
            "Error processing file {}: {}",
            path.blue(),
            e.to_string().red()
        ),
    }
    Ok(())
}

fn print_summary(summary: &CountSummary, config: &CountConfig) {
    let skipped = config.files().len() - summary.files_reported();
    let mut line = format!(
        "\nCounted {} occurrences of '{}' in {} files ({} failed",
        summary.total_words,
        config.word(),
        summary.files_counted,
        summary.files_failed
    );
    if summary.files_cancelled > 0 || skipped > 0 {
        line.push_str(&format!(
            ", {} cancelled, {} skipped",
            summary.files_cancelled, skipped
        ));
    }
    line.push(')');
    println!("{}", line);
}

fn print_summary_json(summary: &CountSummary, config: &CountConfig) {
    let value = serde_json::json!({
        "word": config.word(),
        "total_words": summary.total_words,
        "files_counted": summary.files_counted,
        "files_failed": summary.files_failed,
        "files_cancelled": summary.files_cancelled,
        "files_skipped": config.files().len() - summary.files_reported(),
    });
    println!("{}", value);
}
