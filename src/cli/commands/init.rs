//! `init`: create the data directory and an empty store.

use crate::config::{self, CONFIG_FILE_NAME, CliOverrides, DATA_DIR_NAME, StoreConfig};
use crate::error::Result;
use crate::format::OutputContext;
use crate::storage::Backend;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct InitResult {
    data_dir: PathBuf,
    backend: String,
    location: String,
    created: bool,
}

/// Create `.demands/` (or the `--dir` directory), record a `--backend`
/// choice in its config file, and make sure the store exists.
///
/// Running it again on an initialized directory is harmless: existing data
/// is never overwritten.
///
/// # Errors
///
/// Returns an error if the directory, config file or store cannot be
/// created.
pub fn execute(cli: &CliOverrides, ctx: &OutputContext) -> Result<()> {
    let data_dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?.join(DATA_DIR_NAME),
    };
    let created = !data_dir.is_dir();
    fs::create_dir_all(&data_dir)?;

    if let Some(backend) = &cli.backend {
        write_backend_choice(&data_dir, backend)?;
    }

    let layer = config::load_config(Some(&data_dir), cli)?;
    let store_config = StoreConfig::resolve(&layer, Some(&data_dir), cli)?;
    let mut store = store_config.open()?;
    let records = store.load()?;
    if records.is_empty() {
        store.save(&records)?;
    }

    let result = InitResult {
        data_dir,
        backend: store.backend().to_string(),
        location: store.location(),
        created,
    };
    info!(dir = %result.data_dir.display(), backend = %result.backend, "Initialized");

    if ctx.is_json() {
        ctx.json_pretty(&result);
    } else if result.created {
        ctx.success(&format!(
            "Initialized {} store at {}",
            result.backend, result.location
        ));
    } else {
        ctx.success(&format!(
            "Already initialized: {} store at {}",
            result.backend, result.location
        ));
    }
    Ok(())
}

/// Persist the backend in the project config unless one is already set.
fn write_backend_choice(data_dir: &Path, backend: &str) -> Result<()> {
    let backend: Backend = backend.parse()?;
    let path = data_dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Ok(());
    }
    let mut doc = serde_yaml::Mapping::new();
    doc.insert("backend".into(), backend.as_str().into());
    fs::write(&path, serde_yaml::to_string(&doc)?)?;
    Ok(())
}
