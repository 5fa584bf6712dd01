//! Impact Stories CLI - record, search, summarize and export impact stories

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use impact_stories::config::DATABASE_ENV;
use impact_stories::{ui, StoryFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "impact-stories")]
#[command(version)]
#[command(about = "Impact story indexer - record program outcomes with metrics and tags")]
#[command(long_about = r#"
Impact Stories keeps narrative records of program outcomes, enabling:
  • Metrics and tags attached to each story
  • Filtered search by program, outcome, location, tag or text
  • Outcome and program summaries
  • CSV export and import

Example usage:
  impact-stories seed
  impact-stories search-stories --program "STEM Bridge" --tag stem
  impact-stories program-summary --format table
  impact-stories export-csv --output stories.csv
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file
    #[arg(short, long, global = true, env = DATABASE_ENV)]
    database: Option<PathBuf>,

    /// Path to the config file (defaults to impact-stories.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// How command results are printed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per row
    #[default]
    Text,
    /// Rounded tables
    Table,
    /// JSON envelope on stdout
    Json,
}

impl OutputFormat {
    pub fn is_human(self) -> bool {
        self != OutputFormat::Json
    }
}

/// Print a JSON success envelope; no-op for human formats
pub fn emit_success(format: OutputFormat, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if format.is_human() {
        return Ok(());
    }
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Create schema and tables
    Migrate,

    /// Insert sample impact stories, metrics, and tags
    Seed {
        /// Clear existing data first
        #[arg(short, long)]
        force: bool,
    },

    /// Add a new impact story
    AddStory {
        /// Story title
        #[arg(long)]
        title: String,

        /// Short summary
        #[arg(long)]
        summary: String,

        /// Program name
        #[arg(long)]
        program: String,

        /// Outcome label
        #[arg(long)]
        outcome: String,

        /// Location
        #[arg(long)]
        location: String,

        /// Creation time as RFC 3339 (defaults to now)
        #[arg(long)]
        created_at: Option<String>,
    },

    /// List impact stories, newest first
    ListStories,

    /// Search stories by filters
    SearchStories {
        /// Program filter (exact)
        #[arg(long)]
        program: Option<String>,

        /// Outcome filter (exact)
        #[arg(long)]
        outcome: Option<String>,

        /// Location filter (exact)
        #[arg(long)]
        location: Option<String>,

        /// Tag filter (exact label)
        #[arg(long)]
        tag: Option<String>,

        /// Text search in title/summary
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show a detailed brief for one story
    StoryBrief {
        /// Story id
        #[arg(long)]
        story_id: i64,
    },

    /// Add a metric to a story
    AddMetric {
        /// Story id
        #[arg(long)]
        story_id: i64,

        /// Metric name
        #[arg(long)]
        name: String,

        /// Metric value, e.g. 92.50
        #[arg(long, allow_hyphen_values = true)]
        value: String,

        /// Metric unit
        #[arg(long)]
        unit: String,
    },

    /// List metrics, optionally for a story
    ListMetrics {
        /// Story id
        #[arg(long)]
        story_id: Option<i64>,
    },

    /// Create a tag label
    AddTag {
        /// Tag label
        #[arg(long)]
        label: String,
    },

    /// Assign a tag to a story
    AssignTag {
        /// Story id
        #[arg(long)]
        story_id: i64,

        /// Tag id
        #[arg(long)]
        tag_id: i64,
    },

    /// List tags, optionally for a story
    ListTags {
        /// Story id
        #[arg(long)]
        story_id: Option<i64>,
    },

    /// Summarize outcomes by story count
    OutcomeSummary,

    /// Summarize programs by story count
    ProgramSummary,

    /// Export stories, tags, and metrics to CSV
    ExportCsv {
        /// Output CSV path (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import stories from a CSV produced by export-csv
    ImportCsv {
        /// Input CSV path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show row counts
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so CSV and JSON on stdout stay clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            ui::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let database = cli.database.as_deref();
    let config = cli.config.as_deref();
    let open = || commands::open_store(database, config);

    match cli.command {
        Commands::Init { force } => commands::run_init(format, database, config, force),
        Commands::Migrate => commands::run_migrate(&open()?, format),
        Commands::Seed { force } => commands::run_seed(&open()?, format, force),
        Commands::AddStory { title, summary, program, outcome, location, created_at } => {
            let story = commands::StoryArgs { title, summary, program, outcome, location, created_at };
            commands::run_add_story(&open()?, format, story)
        }
        Commands::ListStories => commands::run_list_stories(&open()?, format),
        Commands::SearchStories { program, outcome, location, tag, query } => {
            let filter = StoryFilter::from_args(program, outcome, location, tag, query);
            commands::run_search_stories(&open()?, format, &filter)
        }
        Commands::StoryBrief { story_id } => commands::run_story_brief(&open()?, format, story_id),
        Commands::AddMetric { story_id, name, value, unit } => {
            commands::run_add_metric(&open, format, story_id, &name, &value, &unit)
        }
        Commands::ListMetrics { story_id } => commands::run_list_metrics(&open()?, format, story_id),
        Commands::AddTag { label } => commands::run_add_tag(&open()?, format, &label),
        Commands::AssignTag { story_id, tag_id } => {
            commands::run_assign_tag(&open()?, format, story_id, tag_id)
        }
        Commands::ListTags { story_id } => commands::run_list_tags(&open()?, format, story_id),
        Commands::OutcomeSummary => commands::run_outcome_summary(&open()?, format),
        Commands::ProgramSummary => commands::run_program_summary(&open()?, format),
        Commands::ExportCsv { output } => commands::run_export_csv(&open()?, format, output.as_deref()),
        Commands::ImportCsv { input } => commands::run_import_csv(&open, format, &input),
        Commands::Stats => commands::run_stats(&open()?, format),
    }
}
