//! CampusDB CLI
//!
//! Command-line tools for a CampusDB data directory.
//!
//! # Commands
//!
//! - `seed` - Load the demonstration dataset
//! - `stats` - Display the dashboard summary and counters
//! - `top` - Show the top students by average score
//! - `list` - List the records of one kind
//! - `export-csv` / `export-workbook` / `import-workbook` - Move data in and out
//! - `delete` - Delete a record, or preview what a delete would touch
//! - `verify` - Check cross-reference integrity
//! - `pull` / `push` - Copy data from or to the remote spreadsheet

mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// CampusDB command-line tools.
#[derive(Parser)]
#[command(name = "campus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the data directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

/// Output format of commands that print records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Record kind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// Students
    Student,
    /// Faculty members
    Faculty,
    /// Courses
    Course,
    /// Departments
    Department,
}

impl From<Kind> for campus_core::EntityKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Student => Self::Student,
            Kind::Faculty => Self::Faculty,
            Kind::Course => Self::Course,
            Kind::Department => Self::Department,
        }
    }
}

/// Connection flags for the remote spreadsheet.
#[derive(Debug, Args)]
pub struct RemoteArgs {
    /// Access key of the spreadsheet service
    #[arg(long)]
    api_key: String,

    /// Spreadsheet document id
    #[arg(long)]
    document: String,

    /// Service endpoint
    #[arg(long, default_value = campus_sync::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Rows fetched per request
    #[arg(long, default_value = "500")]
    page_size: usize,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Attempts per request
    #[arg(long, default_value = "3")]
    attempts: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the demonstration dataset
    Seed {
        /// Replace existing data
        #[arg(long)]
        force: bool,
    },

    /// Display the dashboard summary
    Stats {
        /// Show per-department counts
        #[arg(short, long)]
        departments: bool,
    },

    /// Show the top students by average score
    Top {
        /// Number of students to show
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// List records of one kind
    List {
        /// Kind of record
        #[arg(value_enum)]
        kind: Kind,

        /// Only show records whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Export the flat CSV report
    ExportCsv {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export all tables as a workbook document
    ExportWorkbook {
        /// Output file
        output: PathBuf,

        /// Write the summary workbook instead of the importable one
        #[arg(long)]
        summary: bool,
    },

    /// Import the tables present in a workbook document
    ImportWorkbook {
        /// Input file
        input: PathBuf,
    },

    /// Delete a record and its references
    Delete {
        /// Kind of record
        #[arg(value_enum)]
        kind: Kind,

        /// Record id
        id: String,

        /// Only show what would be removed
        #[arg(long)]
        preview: bool,
    },

    /// Remove all records
    Clear {
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },

    /// Check cross-reference integrity
    Verify,

    /// Replace local data with the remote spreadsheet
    Pull(RemoteArgs),

    /// Overwrite the remote spreadsheet with local data
    Push(RemoteArgs),

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format;
    match cli.command {
        Commands::Seed { force } => {
            let path = cli.path.ok_or("Data path required for seed")?;
            commands::seed::run(&path, force)?;
        }
        Commands::Stats { departments } => {
            let path = cli.path.ok_or("Data path required for stats")?;
            commands::stats::run(&path, departments, format)?;
        }
        Commands::Top { count } => {
            let path = cli.path.ok_or("Data path required for top")?;
            commands::top::run(&path, count, format)?;
        }
        Commands::List { kind, search } => {
            let path = cli.path.ok_or("Data path required for list")?;
            commands::list::run(&path, kind.into(), search.as_deref(), format)?;
        }
        Commands::ExportCsv { output } => {
            let path = cli.path.ok_or("Data path required for export-csv")?;
            commands::transfer::export_csv(&path, output.as_deref())?;
        }
        Commands::ExportWorkbook { output, summary } => {
            let path = cli.path.ok_or("Data path required for export-workbook")?;
            commands::transfer::export_workbook(&path, &output, summary)?;
        }
        Commands::ImportWorkbook { input } => {
            let path = cli.path.ok_or("Data path required for import-workbook")?;
            commands::transfer::import_workbook(&path, &input)?;
        }
        Commands::Delete { kind, id, preview } => {
            let path = cli.path.ok_or("Data path required for delete")?;
            commands::delete::run(&path, kind.into(), &id, preview, format)?;
        }
        Commands::Clear { yes } => {
            let path = cli.path.ok_or("Data path required for clear")?;
            commands::seed::clear(&path, yes)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Data path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Pull(args) => {
            let path = cli.path.ok_or("Data path required for pull")?;
            commands::remote::pull(&path, &args)?;
        }
        Commands::Push(args) => {
            let path = cli.path.ok_or("Data path required for push")?;
            commands::remote::push(&path, &args)?;
        }
        Commands::Version => {
            println!("CampusDB CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
