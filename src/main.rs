//! CLI entry point for `filequery`.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use filequery::config::RunConfig;
use filequery::export::OutputFormat;
use filequery::runner;
use filequery::session::Session;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "filequery",
    about = "Query CSV, Parquet and JSON files with SQL"
)]
struct Cli {
    /// Path to a CSV, Parquet, JSON or NDJSON file
    #[arg(long)]
    filename: Option<PathBuf>,

    /// Directory whose CSV, Parquet, JSON and NDJSON files become tables
    #[arg(long)]
    filesdir: Option<PathBuf>,

    /// SQL to execute; may hold several `;` separated statements
    #[arg(long)]
    query: Option<String>,

    /// Path to a file with the SQL to execute
    #[arg(long, alias = "query_file")]
    query_file: Option<PathBuf>,

    /// Files to write results to, one per statement
    #[arg(long, alias = "out_file", num_args = 1..)]
    out_file: Option<Vec<PathBuf>>,

    /// Format of the output files
    #[arg(long, alias = "out_file_format", value_enum)]
    out_file_format: Option<OutputFormat>,

    /// Delimiter for printed results and CSV output files
    #[arg(long)]
    delimiter: Option<char>,

    /// Open the interactive SQL editor
    #[arg(long)]
    editor: bool,

    /// JSON config file; replaces all other query options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        RunConfig {
            filename: cli.filename,
            filesdir: cli.filesdir,
            query: cli.query,
            query_file: cli.query_file,
            out_file: cli.out_file,
            out_file_format: cli.out_file_format,
            delimiter: cli.delimiter,
            editor: cli.editor,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.config.clone() {
        Some(path) => match RunConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load config file: {e}");
                process::exit(2);
            }
        },
        None => RunConfig::from(cli),
    };

    if let Err(e) = config.validate() {
        eprintln!("{e}\n\nrun with --help for usage");
        process::exit(2);
    }

    let (engine, sources) = match runner::open(&config) {
        Ok(opened) => opened,
        Err(e) => {
            eprintln!("failed to load tables: {e}");
            process::exit(1);
        }
    };
    tracing::debug!("Loaded {} table(s)", sources.len());

    let result = if config.editor {
        let mut session = Session::new(engine);
        let stdin = io::stdin();
        let prompt = stdin.is_terminal();
        runner::run_editor(&mut session, stdin.lock(), &mut io::stdout(), prompt)
    } else {
        runner::run_batch(&engine, &config, &mut io::stdout())
    };

    if let Err(e) = result {
        eprintln!("failed to query file: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("FILEQUERY_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
