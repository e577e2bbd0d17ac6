use clap::Parser;
use demand_tracker::StructuredError;
use demand_tracker::cli::{Cli, commands};
use demand_tracker::format::OutputContext;
use demand_tracker::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {err}");
    }

    let ctx = OutputContext::from_flags(cli.json, cli.quiet);
    if let Err(err) = commands::execute(&cli, &ctx) {
        let structured = StructuredError::from_error(&err);
        if ctx.is_json() {
            eprintln!("{}", structured.to_json());
        } else {
            eprintln!("Error: {err}");
            if let Some(hint) = &structured.hint {
                eprintln!("Hint: {hint}");
            }
        }
        std::process::exit(structured.code.exit_code());
    }
}
