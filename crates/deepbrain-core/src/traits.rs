//! Traits shared across DeepBrain crates.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// A TOML-backed application configuration.
///
/// Implementors only name their project and, optionally, apply environment
/// overrides; file resolution, loading and export come from the defaults.
///
/// Resolution order for the config file:
/// 1. explicit path (e.g. a `--config` flag)
/// 2. `<PROJECT>_CONFIG` environment variable
/// 3. `<config_dir>/<project>/config.toml`
pub trait ConfigManager: Serialize + DeserializeOwned + Default {
    /// Project name, used for the config directory and env var prefix.
    fn project_name() -> &'static str;

    /// Apply environment variable overrides after the file is loaded.
    fn apply_env_overrides(&mut self) {}

    /// Name of the env var that points at a config file.
    fn config_env_var() -> String {
        format!("{}_CONFIG", Self::project_name().to_uppercase())
    }

    /// Platform default location of the config file.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve which config file to use.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(Self::config_env_var())
            && !path.trim().is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Load the configuration.
    ///
    /// A missing file at the default location yields defaults; a missing
    /// file given explicitly is an error.
    fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                log::debug!("Loading configuration from {}", path.display());
                toml::from_str(&content)
                    .map_err(|e| Error::parse(format!("{}: {e}", path.display())))?
            }
            Some(path) if explicit.is_some() => {
                return Err(Error::not_found(
                    path.display().to_string(),
                    "configuration file",
                ));
            }
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Render as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten into `PROJECT_SECTION_KEY=value` pairs.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_env(&Self::project_name().to_uppercase(), &value, &mut vars);
        Ok(vars)
    }

    /// Apply `PROJECT_SECTION_KEY=value` pairs, the inverse of
    /// [`to_env_vars`](Self::to_env_vars).
    ///
    /// Names without the project prefix or outside a known section are
    /// skipped. Values take the type of the field they replace; lists are
    /// comma-separated.
    fn apply_env_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let prefix = format!("{}_", Self::project_name().to_uppercase());
        let mut value = toml::Value::try_from(&*self).map_err(|e| Error::config(e.to_string()))?;

        let mut changed = false;
        for (name, raw) in vars {
            let Some(path) = name.as_ref().strip_prefix(&prefix) else {
                continue;
            };
            if set_env_value(&mut value, path, raw.as_ref(), 0)? {
                log::debug!("Applied environment override {}", name.as_ref());
                changed = true;
            }
        }

        if changed {
            *self = value
                .try_into()
                .map_err(|e| Error::config(format!("Invalid environment override: {e}")))?;
        }
        Ok(())
    }
}

/// Set the value named by `path` (`SECTION_KEY`, upper case) inside `node`.
///
/// Returns whether a value was set. Unknown keys are only accepted inside a
/// section, where they fill optional fields left out of the serialized tree.
fn set_env_value(node: &mut toml::Value, path: &str, raw: &str, depth: usize) -> Result<bool> {
    let Some(table) = node.as_table_mut() else {
        return Ok(false);
    };

    for (key, child) in table.iter_mut() {
        if !child.is_table() {
            continue;
        }
        if let Some(rest) = path.strip_prefix(&format!("{}_", key.to_uppercase()))
            && set_env_value(child, rest, raw, depth + 1)?
        {
            return Ok(true);
        }
    }

    let key = path.to_lowercase();
    let existing = table.get(&key);
    if existing.is_some_and(toml::Value::is_table) || (existing.is_none() && depth == 0) {
        return Ok(false);
    }
    let parsed = parse_env_value(existing, raw)
        .ok_or_else(|| Error::parse(format!("Invalid value '{raw}' for {key}")))?;
    table.insert(key, parsed);
    Ok(true)
}

fn parse_env_value(existing: Option<&toml::Value>, raw: &str) -> Option<toml::Value> {
    let trimmed = raw.trim();
    let value = match existing {
        Some(toml::Value::Integer(_)) => toml::Value::Integer(trimmed.parse().ok()?),
        Some(toml::Value::Float(_)) => toml::Value::Float(trimmed.parse().ok()?),
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(trimmed.parse().ok()?),
        Some(toml::Value::Array(_)) => toml::Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| toml::Value::String(item.to_string()))
                .collect(),
        ),
        _ => toml::Value::String(raw.to_string()),
    };
    Some(value)
}
