mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pulso-cli")]
#[command(about = "Survey workbook analysis from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a survey workbook and print the report JSON
    Report {
        /// Path to the .xlsx workbook
        #[arg(long)]
        file: PathBuf,
        /// Write the JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
        /// Generate narrative summaries (needs PULSO_SUMMARY_API_KEY)
        #[arg(long)]
        summaries: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Report {
            file,
            output,
            pretty,
            summaries,
        }) => report::run_report(&file, output.as_deref(), pretty, summaries).await,
        None => {
            println!("no command given; try `pulso-cli report --file <workbook.xlsx>`");
            Ok(())
        }
    }
}
