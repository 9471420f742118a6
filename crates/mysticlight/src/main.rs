//! Mysticlight CLI: LED control for devices driven by the MSI Mystic Light SDK.
//!
//! Without a subcommand it runs the interactive menu.

use std::path::PathBuf;

use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(
    name = "mysticlight-cli",
    version,
    about = "LED control for devices driven by the MSI Mystic Light SDK"
)]
struct Args {
    /// Output as JSON (for devices, leds, show, config)
    #[arg(long, global = true)]
    json: bool,

    /// Path to the SDK library (overrides config and the default search)
    #[arg(long, global = true, value_name = "PATH")]
    sdk: Option<PathBuf>,

    /// Path to an alternative config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log every SDK call
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<cli::Command>,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let opts = cli::Options {
        json: args.json,
        sdk_path: args.sdk,
        config_path: args.config,
    };

    if let Err(e) = cli::run(args.command.unwrap_or(cli::Command::Interactive), &opts) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
