//! Command implementations.

pub mod demand;
pub mod export;
pub mod init;
pub mod registry;

use crate::cli::{Cli, Commands};
use crate::config::{self, CliOverrides, StoreConfig};
use crate::error::Result;
use crate::format::OutputContext;
use crate::repository::Repository;
use tracing::debug;

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns whatever the command fails with.
pub fn execute(cli: &Cli, ctx: &OutputContext) -> Result<()> {
    let overrides = cli.overrides();
    match &cli.command {
        Commands::Init => init::execute(&overrides, ctx),
        Commands::List(args) => demand::list(&open_repository(&overrides)?, &args.filter, ctx),
        Commands::Show { id } => demand::show(&open_repository(&overrides)?, *id, ctx),
        Commands::Create(args) => demand::create(&mut open_repository(&overrides)?, args, ctx),
        Commands::Edit(args) => demand::edit(&mut open_repository(&overrides)?, args, ctx),
        Commands::Delete { id } => demand::delete(&mut open_repository(&overrides)?, *id, ctx),
        Commands::Client { command } => {
            registry::clients(&mut open_repository(&overrides)?, command, ctx)
        }
        Commands::Member { command } => {
            registry::team_members(&mut open_repository(&overrides)?, command, ctx)
        }
        Commands::Export(args) => export::execute(&open_repository(&overrides)?, args, ctx),
    }
}

/// Resolve configuration and open the repository it points at.
///
/// # Errors
///
/// Returns [`crate::DemandError::NotInitialized`] when a file backend has no
/// `.demands` directory or `--data` path, or any config/store error.
pub fn open_repository(cli: &CliOverrides) -> Result<Repository> {
    let data_dir = config::discover_data_dir(None, cli.dir.as_deref())?;
    let layer = config::load_config(data_dir.as_deref(), cli)?;
    let store_config = StoreConfig::resolve(&layer, data_dir.as_deref(), cli)?;
    debug!(?data_dir, backend = %store_config.backend, "Resolved store");
    Repository::open(store_config.open()?)
}
