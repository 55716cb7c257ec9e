//! `persona-forge` command line entry point.

use clap::Parser;
use persona_forge::cli::{Opts, legacy_args};
use persona_forge::{Mode, Settings, run};
use std::process::ExitCode;
use tracing::{error, trace};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

/// Exit status for an unknown `--type`.
const USAGE_ERROR: u8 = 2;

fn main() -> ExitCode {
    let opts = Opts::parse_from(legacy_args(std::env::args_os()));

    // Initialise logging early
    //
    let tree = HierarchicalLayer::new(2)
        .with_targets(true)
        .with_bracketed_fields(true);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(tree).init();
    trace!("Logging initialised.");

    let status = match opts.kind.parse::<Mode>() {
        Ok(mode) => {
            if mode == Mode::Generate {
                println!("Generating {} Personas", opts.quantity);
            }
            match run(mode, opts.quantity, &Settings::default()) {
                Ok(report) => {
                    report.log_summary();
                    report.exit_code()
                }
                Err(e) => {
                    error!("{e}");
                    1
                }
            }
        }
        Err(e) => {
            println!("{e}");
            USAGE_ERROR
        }
    };

    println!("Done");
    ExitCode::from(status)
}
