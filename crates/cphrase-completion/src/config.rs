/// Configuration loading and management for the completion pipeline
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Placeholder replaced by the ghost text in the escalation prompt
pub const PROMPT_PLACEHOLDER: &str = "{text}";

const CONFIG_STEM: &str = "completion";
const PROJECT_DIR: &str = ".cphrase";
const USER_DIR: &str = "cphrase";

/// Completion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Target language identifier
    pub language: String,
    /// Quiet period before a ghost-text fetch, in milliseconds
    pub debounce_ms: u64,
    /// Candidates kept on the prompt path
    pub prompt_cap: usize,
    /// Object-scope marker the reconciler treats specially
    pub sentinel_marker: String,
    /// Token appended to the document length in the context length tag
    pub length_tag_marker: String,
    /// Context string the plain path hands to the insert-text generator
    pub plain_path_context: String,
    /// Escalation prompt; `{text}` is replaced by the ghost text
    pub prompt_template: String,
    /// Ghost text styling
    pub ghost_style: GhostTextStyle,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            language: "c".to_string(),
            debounce_ms: 1000,
            prompt_cap: 3,
            sentinel_marker: "TextWindow".to_string(),
            length_tag_marker: "True".to_string(),
            plain_path_context: "codecompletion".to_string(),
            prompt_template: "Please generate the following code in C language:\n\n{text}"
                .to_string(),
            ghost_style: GhostTextStyle::default(),
        }
    }
}

impl CompletionConfig {
    /// Debounce delay as a duration
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

/// Completion configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load completion configuration from a YAML file
    pub fn load_from_yaml(path: &Path) -> CompletionResult<CompletionConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Yaml)
    }

    /// Load completion configuration from a JSON file
    pub fn load_from_json(path: &Path) -> CompletionResult<CompletionConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Json)
    }

    /// Load completion configuration from a string
    pub fn load_from_string(
        content: &str,
        format: ConfigFormat,
    ) -> CompletionResult<CompletionConfig> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration with hierarchy: Project → User → Default
    ///
    /// 1. **Project**: `.cphrase/completion.{yaml,yml,json}` under `project_root`
    /// 2. **User**: `completion.{yaml,yml,json}` in the platform config directory
    /// 3. **Default**: [`CompletionConfig::default`]
    ///
    /// A file that exists but fails to parse or validate is an error rather than
    /// a silent fallback.
    pub fn load_with_hierarchy(project_root: &Path) -> CompletionResult<CompletionConfig> {
        let project_dir = project_root.join(PROJECT_DIR);
        if let Some(config) = Self::load_from_directory(&project_dir)? {
            debug!("Loaded completion config from {}", project_dir.display());
            return Ok(config);
        }

        if let Some(user_dir) = Self::user_config_dir() {
            if let Some(config) = Self::load_from_directory(&user_dir)? {
                debug!("Loaded completion config from {}", user_dir.display());
                return Ok(config);
            }
        }

        debug!("No completion config found, using defaults");
        Ok(CompletionConfig::default())
    }

    /// User-level configuration directory
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_DIR))
    }

    /// Load the first configuration file found in `dir`
    fn load_from_directory(dir: &Path) -> CompletionResult<Option<CompletionConfig>> {
        if !dir.is_dir() {
            return Ok(None);
        }

        for ext in ["yaml", "yml"] {
            let path = dir.join(format!("{}.{}", CONFIG_STEM, ext));
            if path.exists() {
                return Self::load_from_yaml(&path).map(Some);
            }
        }

        let json_path = dir.join(format!("{}.json", CONFIG_STEM));
        if json_path.exists() {
            return Self::load_from_json(&json_path).map(Some);
        }

        Ok(None)
    }

    /// Validate completion configuration
    pub fn validate_config(config: &CompletionConfig) -> CompletionResult<()> {
        if config.language.is_empty() {
            return Err(CompletionError::ConfigError(
                "Language name cannot be empty".to_string(),
            ));
        }

        if config.prompt_cap == 0 {
            return Err(CompletionError::ConfigError(
                "Prompt cap must be at least 1".to_string(),
            ));
        }

        if config.debounce_ms == 0 {
            return Err(CompletionError::ConfigError(
                "Debounce delay must be at least 1ms".to_string(),
            ));
        }

        if !config.prompt_template.contains(PROMPT_PLACEHOLDER) {
            return Err(CompletionError::ConfigError(format!(
                "Prompt template must contain {}",
                PROMPT_PLACEHOLDER
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CompletionConfig::default();
        assert!(ConfigLoader::validate_config(&config).is_ok());
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.prompt_cap, 3);
    }

    #[test]
    fn test_config_loader_validate_empty_language() {
        let config = CompletionConfig {
            language: String::new(),
            ..Default::default()
        };
        assert!(ConfigLoader::validate_config(&config).is_err());
    }

    #[test]
    fn test_config_loader_validate_zero_cap() {
        let config = CompletionConfig {
            prompt_cap: 0,
            ..Default::default()
        };
        assert!(ConfigLoader::validate_config(&config).is_err());
    }

    #[test]
    fn test_config_loader_validate_template_placeholder() {
        let config = CompletionConfig {
            prompt_template: "Write C".to_string(),
            ..Default::default()
        };
        assert!(ConfigLoader::validate_config(&config).is_err());
    }

    #[test]
    fn test_load_partial_yaml_fills_defaults() {
        let yaml = "debounce_ms: 250\nghost_style: faded\n";
        let config = ConfigLoader::load_from_string(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.ghost_style, GhostTextStyle::Faded);
        assert_eq!(config.sentinel_marker, "TextWindow");
    }

    #[test]
    fn test_load_json() {
        let config =
            ConfigLoader::load_from_string(r#"{"prompt_cap": 5}"#, ConfigFormat::Json).unwrap();
        assert_eq!(config.prompt_cap, 5);
    }

    #[test]
    fn test_hierarchy_prefers_project_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project_dir = temp_dir.path().join(".cphrase");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("completion.yaml"), "prompt_cap: 7\n").unwrap();

        let config = ConfigLoader::load_with_hierarchy(temp_dir.path()).unwrap();
        assert_eq!(config.prompt_cap, 7);
    }

    #[test]
    fn test_hierarchy_invalid_project_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project_dir = temp_dir.path().join(".cphrase");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("completion.json"), r#"{"prompt_cap": 0}"#).unwrap();

        assert!(ConfigLoader::load_with_hierarchy(temp_dir.path()).is_err());
    }
}
