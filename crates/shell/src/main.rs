//! CLI for ml-widgets: runs every widget on generated data and prints what
//! it would have drawn.

mod commands;
mod logger;
mod metrics;
mod output;

use clap::Parser;

use commands::Commands;

#[derive(Parser, Debug)]
#[command(name = "mlw", version, about, long_about = None)]
struct Args {
    /// The random seed to use. Runs are only reproducible with a seed.
    #[arg(short('s'), long, global = true)]
    seed: Option<u64>,

    /// The maximum level of log messages.
    #[arg(long, global = true, default_value = "info")]
    log_level: logger::LogLevel,

    /// Write logs to `./logs/<NAME>.log` instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let (_guard, log_path) = logger::configure_logger(args.log_level, args.log_file.as_deref())?;
    if let Some(path) = &log_path {
        println!("Logging to {}", path.display());
    }
    ftlog::info!("Args: {args:?}");

    commands::run(args.command, args.seed)
}
