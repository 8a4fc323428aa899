//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.chinu/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChinuConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    pub system_instruction: Option<String>,
    pub system_instruction_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct KeysConfig {
    /// Enable the in-app key picker (Ctrl+K).
    pub selector: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are CHINU, a friendly and knowledgeable college \
    assistant for Avanthees St Theressa Institute of Engineering and Technology. \
    Help students, parents and visitors with questions about admissions, courses and branches, \
    fees, scholarships, exams, placements, hostel and transport facilities, and campus life. \
    Keep answers concise and well organized. If you are not sure about a college-specific detail, \
    say so and suggest contacting the college office instead of guessing.";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_name: String,
    pub system_instruction: String,
    /// Key from env or config file. A key picked in-app is stored separately.
    pub api_key: Option<String>,
    pub gemini_base_url: String,
    pub key_selector: bool,
}

/// Overrides taken from command-line flags.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub no_key_selector: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.chinu/`.
pub fn chinu_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chinu"))
}

/// Returns the path to `~/.chinu/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    chinu_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.chinu/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChinuConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChinuConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChinuConfig::default());
        }
    };
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<ChinuConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChinuConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChinuConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", redacted(&config));
    Ok(config)
}

/// Debug view of the config with the API key masked.
fn redacted(config: &ChinuConfig) -> String {
    format!(
        "model={:?} system_instruction_set={} system_instruction_file={:?} api_key_set={} base_url={:?} selector={:?}",
        config.general.model,
        config.general.system_instruction.is_some(),
        config.general.system_instruction_file,
        config.gemini.api_key.is_some(),
        config.gemini.base_url,
        config.keys.selector,
    )
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# CHINU Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# model = "gemini-2.5-flash"          # Or set CHINU_MODEL env var
# system_instruction = "You are CHINU, a college assistant."
# system_instruction_file = "system.md"   # Path relative to ~/.chinu/

# [gemini]
# api_key = "AIza..."                 # Or set GEMINI_API_KEY / API_KEY env var
# base_url = "https://generativelanguage.googleapis.com/v1beta"

# [keys]
# selector = true                     # In-app API key picker (Ctrl+K)
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChinuConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Model: CLI → env → config → default
    let model_name = cli
        .model
        .clone()
        .or_else(|| non_empty_env("CHINU_MODEL"))
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let system_instruction = resolve_system_instruction(config);

    // API key: env (GEMINI_API_KEY, then API_KEY) → config
    let api_key = non_empty_env("GEMINI_API_KEY")
        .or_else(|| non_empty_env("API_KEY"))
        .or_else(|| config.gemini.api_key.clone().filter(|k| !k.trim().is_empty()));

    // Base URL: env → config → default
    let gemini_base_url = non_empty_env("GEMINI_BASE_URL")
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

    let key_selector = !cli.no_key_selector && config.keys.selector.unwrap_or(true);

    ResolvedConfig {
        model_name,
        system_instruction,
        api_key,
        gemini_base_url,
        key_selector,
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolves the system instruction: inline wins over file, both win over default.
fn resolve_system_instruction(config: &ChinuConfig) -> String {
    if let Some(ref instruction) = config.general.system_instruction {
        return instruction.clone();
    }

    // Try loading from system_instruction_file (relative to ~/.chinu/)
    if let Some(ref file) = config.general.system_instruction_file
        && let Some(dir) = chinu_dir()
    {
        let path = dir.join(file);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    info!("Loaded system instruction from {}", path.display());
                    return trimmed;
                }
                warn!("System instruction file is empty: {}", path.display());
            }
            Err(e) => {
                warn!(
                    "Failed to read system instruction file {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    DEFAULT_SYSTEM_INSTRUCTION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = ChinuConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert!(resolved.system_instruction.starts_with("You are CHINU"));
        assert!(resolved.key_selector);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = ChinuConfig {
            general: GeneralConfig {
                model: Some("gemini-2.5-pro".to_string()),
                system_instruction: Some("Custom instruction.".to_string()),
                system_instruction_file: None,
            },
            keys: KeysConfig {
                selector: Some(false),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.system_instruction, "Custom instruction.");
        assert!(!resolved.key_selector);
    }

    #[test]
    fn test_resolve_cli_model_wins() {
        let config = ChinuConfig {
            general: GeneralConfig {
                model: Some("from-config".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            model: Some("from-cli".to_string()),
            no_key_selector: false,
        };
        assert_eq!(resolve(&config, &cli).model_name, "from-cli");
    }

    #[test]
    fn test_cli_can_disable_key_selector() {
        let config = ChinuConfig {
            keys: KeysConfig {
                selector: Some(true),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            model: None,
            no_key_selector: true,
        };
        assert!(!resolve(&config, &cli).key_selector);
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[general]
model = "gemini-2.5-flash"
system_instruction_file = "system.md"

[gemini]
api_key = "AIza-test-123"
base_url = "http://localhost:8080/v1beta"

[keys]
selector = false
"#;
        let config: ChinuConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(
            config.general.system_instruction_file.as_deref(),
            Some("system.md")
        );
        assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test-123"));
        assert_eq!(
            config.gemini.base_url.as_deref(),
            Some("http://localhost:8080/v1beta")
        );
        assert_eq!(config.keys.selector, Some(false));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[general]
model = "my-model"
"#;
        let config: ChinuConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.model.as_deref(), Some("my-model"));
        assert!(config.gemini.api_key.is_none());
        assert!(config.keys.selector.is_none());
    }

    #[test]
    fn test_inline_instruction_wins_over_file() {
        let config = ChinuConfig {
            general: GeneralConfig {
                system_instruction: Some("Inline wins.".to_string()),
                system_instruction_file: Some("should-not-load.md".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve_system_instruction(&config), "Inline wins.");
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.general.model.is_none());

        let generated = fs::read_to_string(&path).unwrap();
        assert!(generated.starts_with("# CHINU Configuration"));
        // Everything is commented out, so it parses back to defaults.
        let reparsed: ChinuConfig = toml::from_str(&generated).unwrap();
        assert!(reparsed.gemini.base_url.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general\nmodel = ").unwrap();

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
