//! grundton CLI - run the two-string pitch tracker on recordings.

mod commands;
mod panel;
mod report;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grundton")]
#[command(author, version, about = "Two-string pitch tracker with CV output", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track a stereo recording (left = string A, right = string B)
    Track(commands::track::TrackArgs),

    /// Generate a plucked-string test recording
    Generate(commands::generate::GenerateArgs),

    /// List the string catalog and each band's CV code range
    Strings(commands::strings::StringsArgs),

    /// Print CV codes for frequencies
    Cv(commands::cv::CvArgs),

    /// Print or save the effective configuration
    Config(commands::config::ConfigArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Track(args) => commands::track::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Strings(args) => commands::strings::run(args),
        Commands::Cv(args) => commands::cv::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
