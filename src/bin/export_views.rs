use std::{io, path::PathBuf, process::exit};

use clap::Parser;

use bank_analytics::{
    export::{ExportConfig, export_views},
    setup_cli_logging,
};

/// Export every customer view in the bank database to a CSV file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database containing the customer views.
    #[arg(long, env = "BANK_DB_PATH", default_value = "bank.db")]
    db_path: PathBuf,

    /// Directory to write the CSV files to. Created if it does not exist.
    #[arg(long, short, default_value = "results")]
    output_dir: PathBuf,

    /// Exit with status 1 if any view could not be exported.
    #[arg(long)]
    strict: bool,
}

fn main() {
    setup_cli_logging();

    let args = Args::parse();
    let config = ExportConfig {
        db_path: args.db_path,
        output_dir: args.output_dir,
    };

    let summary = match export_views(&config, &mut io::stdout().lock()) {
        Ok(summary) => summary,
        Err(error) => {
            eprintln!("Could not write the export report: {error}");
            exit(1);
        }
    };

    if args.strict && !summary.is_complete() {
        exit(1);
    }
}
