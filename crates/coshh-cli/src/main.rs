mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "coshh",
    version,
    about = "COSHH risk assessment helper for laboratory work with hazardous substances"
)]
struct Cli {
    /// Directory with replacement knowledge tables
    /// (hazard-statements.json, procedures.json, control-bands.json)
    #[arg(long, global = true, value_name = "DIR")]
    tables: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Task description shared by `assess` and `extract --assess`.
#[derive(Args)]
pub struct TaskArgs {
    /// Procedure key from the procedure catalog (see `coshh tables explain procedures`)
    #[arg(long)]
    procedure: Option<String>,

    /// Amount handled per task
    #[arg(long)]
    quantity: Option<f64>,

    /// Unit of the quantity: µg, mg, g, kg, µL, mL or L
    #[arg(long)]
    unit: Option<String>,

    /// How often the task is done: rare, weekly, daily, multiple_daily
    #[arg(long, default_value = "rare")]
    frequency: String,

    /// How long each task lasts: short, medium, long, very_long
    #[arg(long, default_value = "short")]
    duration: String,

    /// Override the quantity group derived from the quantity: small, medium, large
    #[arg(long)]
    quantity_group: Option<String>,

    /// Dustiness or volatility: low, medium, high
    #[arg(long = "physical", default_value = "medium")]
    physical: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess a task from hazard phrases and task details
    Assess {
        /// H-phrase of the substance (repeatable)
        #[arg(long = "h-phrase", value_name = "CODE")]
        h_phrases: Vec<String>,

        /// Signal word: Danger, Warning or None
        #[arg(long, default_value = "")]
        signal_word: String,

        /// Read the full assessment input from a JSON file instead of flags
        #[arg(long, value_name = "FILE", conflicts_with = "h_phrases")]
        input: Option<PathBuf>,

        #[command(flatten)]
        task: TaskArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show the score breakdown and reasoning
        #[arg(long)]
        verbose: bool,
    },
    /// Extract hazard facts from a safety data sheet (PDF or text)
    Extract {
        /// Path to a PDF or plain-text safety data sheet
        input_file: PathBuf,

        /// Also assess a task using the extracted hazard data
        #[arg(long)]
        assess: bool,

        #[command(flatten)]
        task: TaskArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the extracted facts to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Summarize the hazards of every record in an inventory export
    Inventory {
        /// Path to the inventory JSON file
        file: PathBuf,

        /// Only show records whose name, CAS number or location contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate the knowledge tables
    Tables {
        #[command(subcommand)]
        action: TablesAction,
    },
}

#[derive(Subcommand)]
enum TablesAction {
    /// List the knowledge tables in use
    List,
    /// Explain a table in plain language
    Explain {
        /// Table name: hazards, procedures or bands
        table: String,
    },
    /// Print the raw JSON of an embedded table
    Show {
        /// Table name: hazards, procedures or bands
        table: String,
    },
    /// Validate a directory of replacement tables
    Validate {
        /// Directory containing the three table files
        dir: PathBuf,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let tables = cli.tables.as_deref();
    let result = match cli.command {
        Commands::Assess {
            h_phrases,
            signal_word,
            input,
            task,
            output,
            verbose,
        } => commands::assess::run(
            tables,
            h_phrases,
            signal_word,
            input,
            &task,
            &output,
            verbose,
        ),
        Commands::Extract {
            input_file,
            assess,
            task,
            output,
            out,
        } => commands::extract::run(tables, input_file, assess.then_some(&task), &output, out),
        Commands::Inventory {
            file,
            search,
            output,
        } => commands::inventory::run(tables, &file, search.as_deref(), &output),
        Commands::Tables { action } => match action {
            TablesAction::List => commands::tables::list(tables),
            TablesAction::Explain { table } => commands::tables::explain(tables, &table),
            TablesAction::Show { table } => commands::tables::show(&table),
            TablesAction::Validate { dir } => commands::tables::validate(&dir),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
