use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "lexiscan")]
#[command(about = "Keyword frequency and context scanner for extracted documents", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory of extracted documents
    Scan(cli::scan::ScanArgs),
    /// Show the configuration file location and its effective contents
    Config {
        /// Configuration file to read instead of the default
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSONL reports on stdout stay clean
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Some(Commands::Version) | None => {
            println!("lexiscan {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Scan(args)) => {
            cli::scan::cmd_scan(args).await?;
        }
        Some(Commands::Config { config }) => {
            cli::scan::cmd_config(config)?;
        }
    }

    Ok(())
}
