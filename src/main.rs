use clap::{Parser, Subcommand};
use procminer::config::{ConfigLoader, DayBucketZone, TimeUnit};
use procminer::error::{AppResult, ErrorCode, ProcMinerError};
use procminer::report::{self, OutputFormat};
use procminer::{input, LogAnalyzer};
use std::path::PathBuf;
use tracing::{debug, error, info, trace};
use tracing_subscriber::EnvFilter;

/// Summarize process-mining event logs
#[derive(Parser)]
#[command(name = "procminer", version)]
#[command(about = "Combinable aggregation of process-mining event logs", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON Lines event file
    Analyze {
        /// Event file, one JSON record per line
        events: PathBuf,

        /// Log name shown in the report (default: file stem)
        #[arg(long)]
        name: Option<String>,

        /// Log description shown in the report
        #[arg(long)]
        description: Option<String>,

        /// Unit for durations (millisecond, second, minute, hour, day)
        #[arg(long)]
        time_unit: Option<TimeUnit>,

        /// Zone for per-day bucketing ("input", "utc" or "+HH:MM"; default: each event's own offset)
        #[arg(long, allow_hyphen_values = true)]
        day_bucket: Option<DayBucketZone>,

        /// Number of partitions; 1 analyzes sequentially
        #[arg(short = 'p', long)]
        partitions: Option<usize>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("PROCMINER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(verbose >= 3) // Show line numbers for -vvv
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    debug!("procminer started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        let (message, exit_code) = match e.downcast_ref::<ProcMinerError>() {
            Some(err) => (err.user_message(), err.exit_code()),
            None => (e.to_string(), 1),
        };
        eprintln!("Error: {message}");
        std::process::exit(exit_code);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command {
        Commands::Analyze {
            events,
            name,
            description,
            time_unit,
            day_bucket,
            partitions,
            format,
        } => {
            let mut loader = ConfigLoader::new();
            if let Some(path) = cli.config {
                loader = loader.with_path(path);
            }
            let mut config = loader.load().await?;

            if let Some(unit) = time_unit {
                config.time_unit = unit;
            }
            if let Some(zone) = day_bucket {
                config.day_bucket = zone;
            }
            if let Some(partitions) = partitions {
                config.partitions = partitions;
            }
            if name.is_some() {
                config.log_name = name;
            }
            if description.is_some() {
                config.log_description = description;
            }
            if config.log_name.is_none() {
                config.log_name = events
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned());
            }
            config.validate()?;

            let records = input::read_events(&events).await?;
            info!(
                "Analyzing {} events from {} with {} partitions",
                records.len(),
                events.display(),
                config.partitions
            );

            let analyzer = LogAnalyzer::new(config);
            let analysis = tokio::task::spawn_blocking(move || analyzer.analyze(&records))
                .await
                .map_err(|e| {
                    ProcMinerError::execution_with_code(
                        ErrorCode::EXEC_JOIN_FAILED,
                        "analysis task did not complete",
                        None,
                    )
                    .with_source(e)
                })??;

            println!("{}", report::render(&analysis, format)?.trim_end());
            Ok(())
        }
    }
}
