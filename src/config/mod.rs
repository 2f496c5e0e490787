/// Configuration system for folio.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::FolioConfig::default()`]
/// 2. **User global config**: `~/.folio/config.toml`
/// 3. **Project local config**: `.folio.toml` in the current working directory
/// 4. **Environment variables**: `FOLIO_*` overrides (highest precedence)
///
/// Later layers override earlier ones at the key level: each file is merged
/// into the accumulated TOML tree, so a project file that only sets
/// `[judge] base_url` keeps every key the global file set.
///
/// The resolved config is built once per process and passed by reference.
///
/// # Usage
///
/// ```rust,ignore
/// let cfg = folio::config::load();
/// let aggregator = StatsAggregator::from_config(&cfg);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::FolioConfig;

/// Environment variables checked (in order) for the assistant credential.
pub const API_KEY_VARS: [&str; 2] = ["FOLIO_API_KEY", "GEMINI_API_KEY"];

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved folio configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. Malformed files are skipped so a bad edit never stops the CLI.
pub fn load() -> FolioConfig {
    let mut config = load_files(
        global_config_path().as_deref(),
        project_config_path().as_deref(),
    );
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Merge defaults with the given TOML files (either may be missing).
pub fn load_files(global: Option<&Path>, project: Option<&Path>) -> FolioConfig {
    let Ok(mut tree) = toml::Value::try_from(FolioConfig::default()) else {
        return FolioConfig::default();
    };

    for path in [global, project].into_iter().flatten() {
        if let Some(layer) = read_toml_value(path) {
            merge_values(&mut tree, layer);
        }
    }

    tree.try_into().unwrap_or_default()
}

/// Read a TOML file as a raw value tree.
///
/// Returns `None` if the file doesn't exist or is malformed.
fn read_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `overlay` into `base`.
///
/// Tables merge key by key; any other value in the overlay replaces the base.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.folio/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".folio").join("config.toml"))
}

/// Path to the project local config: `.folio.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".folio.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `FOLIO_JUDGE_USER` / `FOLIO_SOURCE_HOST_USER`: account names
/// - `FOLIO_JUDGE_URL` / `FOLIO_SOURCE_HOST_URL`: upstream base URLs
/// - `FOLIO_SOURCE_HOST`: include the repository listing (`1`/`true`/`yes`/`on`)
/// - `FOLIO_MODEL` / `FOLIO_ASSISTANT_URL`: generative assistant settings
/// - `FOLIO_LOG`: event log on/off
pub fn apply_env_overrides<F>(config: &mut FolioConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());

    if let Some(val) = non_empty("FOLIO_JUDGE_USER") {
        config.identity.judge_username = val;
    }
    if let Some(val) = non_empty("FOLIO_SOURCE_HOST_USER") {
        config.identity.source_host_username = val;
    }
    if let Some(val) = non_empty("FOLIO_JUDGE_URL") {
        config.judge.base_url = val;
    }
    if let Some(val) = non_empty("FOLIO_SOURCE_HOST_URL") {
        config.source_host.base_url = val;
    }
    if let Some(val) = var("FOLIO_SOURCE_HOST") {
        config.source_host.enabled = is_truthy(&val);
    }
    if let Some(val) = non_empty("FOLIO_MODEL") {
        config.assistant.model = val;
    }
    if let Some(val) = non_empty("FOLIO_ASSISTANT_URL") {
        config.assistant.base_url = val;
    }
    if let Some(val) = var("FOLIO_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Resolve the assistant credential from the environment.
pub fn api_key() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|val| !val.trim().is_empty())
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.folio/config.toml`.
///
/// Creates the `~/.folio/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.folio/ directory")?;
    }

    fs::write(&path, FolioConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `source_host.enabled`. The key must exist in the
/// schema; the new value is typed after the existing one.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut tree: toml::Value = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(FolioConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut tree, key, value)?;

    // Reject edits that no longer deserialize into the schema
    let _: FolioConfig = tree
        .clone()
        .try_into()
        .with_context(|| format!("'{key} = {value}' does not fit the config schema"))?;

    let output = toml::to_string_pretty(&tree).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').filter(|p| !p.is_empty()).collect();
    let Some((leaf, sections)) = parts.split_last() else {
        anyhow::bail!("empty config key");
    };

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key '{key}'"),
    };

    table.insert((*leaf).to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Render a resolved config as TOML.
pub fn to_toml(config: &FolioConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("folio-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_files_without_files_gives_defaults() {
        assert_eq!(load_files(None, None), FolioConfig::default());
    }

    #[test]
    fn project_layer_merges_over_global_per_key() {
        let global = temp_file(
            "global.toml",
            "[identity]\njudge_username = \"global-user\"\n[judge]\ntimeout_ms = 42\n",
        );
        let project = temp_file("project.toml", "[judge]\nbase_url = \"http://judge.local\"\n");

        let config = load_files(Some(&global), Some(&project));

        assert_eq!(config.identity.judge_username, "global-user");
        assert_eq!(config.judge.timeout_ms, 42);
        assert_eq!(config.judge.base_url, "http://judge.local");
        assert_eq!(config.judge.capacity, 2500);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let broken = temp_file("broken.toml", "[judge\nbase_url = ");
        assert_eq!(load_files(Some(&broken), None), FolioConfig::default());
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("FOLIO_JUDGE_USER", "env-user"),
            ("FOLIO_SOURCE_HOST", "off"),
            ("FOLIO_MODEL", ""),
            ("FOLIO_LOG", "0"),
        ]
        .into_iter()
        .collect();

        let mut config = FolioConfig::default();
        apply_env_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.identity.judge_username, "env-user");
        assert!(!config.source_host.enabled);
        // Empty values don't clobber
        assert_eq!(config.assistant.model, "gemini-3-flash-preview");
        assert!(!config.logging.enabled);
    }

    #[test]
    fn is_truthy_accepts_variants() {
        for yes in ["1", "true", "TRUE", "yes", "on", "ON"] {
            assert!(is_truthy(yes), "{yes}");
        }
        for no in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(no), "{no}");
        }
    }

    #[test]
    fn set_toml_value_types_after_existing_value() {
        let mut root = toml::Value::try_from(FolioConfig::default()).unwrap();
        set_toml_value(&mut root, "source_host.enabled", "false").unwrap();
        set_toml_value(&mut root, "source_host.top_languages", "3").unwrap();
        set_toml_value(&mut root, "assistant.temperature", "0.1").unwrap();
        set_toml_value(&mut root, "identity.judge_username", "x").unwrap();

        let config: FolioConfig = root.try_into().unwrap();
        assert!(!config.source_host.enabled);
        assert_eq!(config.source_host.top_languages, 3);
        assert!((config.assistant.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.identity.judge_username, "x");
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root = toml::Value::try_from(FolioConfig::default()).unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "v").is_err());
        assert!(set_toml_value(&mut root, "judge.nope", "v").is_err());
        assert!(set_toml_value(&mut root, "", "v").is_err());
        assert!(set_toml_value(&mut root, "judge.timeout_ms", "soon").is_err());
    }

    #[test]
    fn to_toml_parses_back() {
        let text = to_toml(&FolioConfig::default()).unwrap();
        let _: FolioConfig = toml::from_str(&text).unwrap();
    }
}
