//! Configuration management for `demand_tracker`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`DEMANDS_*`)
//! 3. Project config (.demands/config.yaml)
//! 4. User config (~/.config/demands/config.yaml)
//! 5. Defaults
//!
//! The merged layer selects the storage backend and its location; see
//! [`StoreConfig`].

use crate::error::{DemandError, Result};
use crate::storage::{Backend, CsvStore, JsonStore, MemoryStore, RecordStore, SqliteStore};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-project data directory.
pub const DATA_DIR_NAME: &str = ".demands";
/// Project config file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";
/// Backend used when nothing is configured.
pub const DEFAULT_BACKEND: Backend = Backend::Sqlite;

const ENV_PREFIX: &str = "DEMANDS_";
const BACKEND_KEY: &str = "backend";
const DATA_KEY: &str = "data";
/// Alternate spellings, folded onto the canonical key when a layer is built
/// so that layer precedence decides between them.
const KEY_ALIASES: &[(&str, &str)] = &[
    ("storage.backend", BACKEND_KEY),
    ("storage-backend", BACKEND_KEY),
    ("storage.path", DATA_KEY),
    ("storage-path", DATA_KEY),
    ("data-path", DATA_KEY),
];

/// A flat set of dotted, normalized configuration keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from `DEMANDS_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut entries = Vec::new();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                for variant in env_key_variants(stripped) {
                    entries.push((variant, value.clone()));
                }
            }
        }
        let mut layer = Self::default();
        layer.insert_all(entries);
        layer
    }

    /// Insert a value under its canonical key. Blank values are ignored so
    /// they never mask a lower layer.
    pub fn insert(&mut self, key: &str, value: String) {
        if value.trim().is_empty() {
            return;
        }
        self.values.insert(canonical_key(key), value);
    }

    /// Insert entries from one source. Within a source the canonical
    /// spelling wins over an alias, and aliases apply in key order.
    fn insert_all(&mut self, mut entries: Vec<(String, String)>) {
        entries.sort_by(|(a, _), (b, _)| {
            is_canonical(a)
                .cmp(&is_canonical(b))
                .then_with(|| a.cmp(b))
        });
        for (key, value) in entries {
            self.insert(&key, value);
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(&canonical_key(key))
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit `.demands` directory.
    pub dir: Option<PathBuf>,
    pub backend: Option<String>,
    /// Data location, used as given (relative to the working directory).
    pub data: Option<PathBuf>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();
        if let Some(backend) = &self.backend {
            layer.insert("backend", backend.clone());
        }
        layer
    }
}

/// Discover the active `.demands` directory.
///
/// Uses `explicit` when given (the `--dir` flag or `DEMANDS_DIR`), otherwise
/// walks up from `start` (or CWD). Returns `None` when nothing is found.
///
/// # Errors
///
/// Returns an error if `explicit` is not a directory or the CWD cannot be read.
pub fn discover_data_dir(start: Option<&Path>, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if path.is_dir() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(DemandError::Config(format!(
            "data directory {} does not exist",
            path.display()
        )));
    }

    let mut current = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Ok(Some(candidate));
        }

        if !current.pop() {
            return Ok(None);
        }
    }
}

/// Load project config (.demands/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(data_dir: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&data_dir.join(CONFIG_FILE_NAME))
}

/// Load user config (~/.config/demands/config.yaml). Without `HOME` there is
/// no user config.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("demands")
        .join(CONFIG_FILE_NAME);
    ConfigLayer::from_yaml(&path)
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.insert("backend", DEFAULT_BACKEND.as_str().to_string());
    layer
}

/// Load configuration with the full precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(data_dir: Option<&Path>, cli: &CliOverrides) -> Result<ConfigLayer> {
    let project = match data_dir {
        Some(dir) => load_project_config(dir)?,
        None => ConfigLayer::default(),
    };

    Ok(ConfigLayer::merge_layers(&[
        default_config_layer(),
        load_user_config()?,
        project,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]))
}

/// Resolved storage selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: Backend,
    /// File (JSON, SQLite) or directory (CSV); `None` for memory.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Pick the backend and location from a merged layer.
    ///
    /// Path precedence: `--data` as given, then a configured `data` key
    /// (relative paths resolve against the data directory), then the
    /// backend's default inside the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown backend, or
    /// [`DemandError::NotInitialized`] when a file backend has no location.
    pub fn resolve(layer: &ConfigLayer, data_dir: Option<&Path>, cli: &CliOverrides) -> Result<Self> {
        let backend: Backend = layer
            .get(BACKEND_KEY)
            .map_or(Ok(DEFAULT_BACKEND), |value| value.parse())?;

        if backend == Backend::Memory {
            return Ok(Self {
                backend,
                path: None,
            });
        }

        let path = if let Some(path) = &cli.data {
            path.clone()
        } else if let Some(configured) = layer.get(DATA_KEY) {
            let candidate = PathBuf::from(configured);
            match data_dir {
                Some(dir) if candidate.is_relative() => dir.join(candidate),
                _ => candidate,
            }
        } else {
            let dir = data_dir.ok_or(DemandError::NotInitialized)?;
            backend
                .default_file_name()
                .map_or_else(|| dir.to_path_buf(), |name| dir.join(name))
        };

        Ok(Self {
            backend,
            path: Some(path),
        })
    }

    /// Open the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn open(&self) -> Result<Box<dyn RecordStore>> {
        debug!(backend = %self.backend, path = ?self.path, "Opening store");
        let path = || {
            self.path
                .clone()
                .ok_or_else(|| DemandError::Config(format!("{} backend needs a path", self.backend)))
        };
        let store: Box<dyn RecordStore> = match self.backend {
            Backend::Memory => Box::new(MemoryStore::new()),
            Backend::Csv => Box::new(CsvStore::new(path()?)),
            Backend::Json => Box::new(JsonStore::new(path()?)),
            Backend::Sqlite => Box::new(SqliteStore::open(&path()?)?),
        };
        Ok(store)
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn canonical_key(key: &str) -> String {
    let key = normalize_key(key);
    KEY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key, |(_, canonical)| (*canonical).to_string())
}

fn is_canonical(key: &str) -> bool {
    canonical_key(key) == normalize_key(key)
}

fn env_key_variants(raw: &str) -> Vec<String> {
    let raw_lower = raw.to_lowercase();
    vec![raw_lower.clone(), raw_lower.replace('_', ".")]
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);
    layer.insert_all(flat.into_iter().collect());
    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
