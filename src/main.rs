use dssat_prep::cli::commands::{CliArgs, Commands};
use dssat_prep::cli::handlers::{handle_makefile, handle_order, handle_patch, handle_prepare};
use dssat_prep::util::logging::{init_logging, parse_level, LoggingConfig};
use dssat_prep::VERSION;

use clap::Parser;
use std::env;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("dssat-prep v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Prepare(prepare_args) => handle_prepare(prepare_args, args.quiet),
        Commands::Order(order_args) => handle_order(order_args),
        Commands::Makefile(makefile_args) => handle_makefile(makefile_args),
        Commands::Patch(patch_args) => handle_patch(patch_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("DSSAT_PREP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    let use_json = env::var("DSSAT_PREP_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level,
        use_json,
        ..Default::default()
    });
}
