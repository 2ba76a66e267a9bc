use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Config file looked up at the project root
pub const CONFIG_FILE: &str = "aiscript.toml";

/// Name of the generated directory inside the chosen source directory
pub const OUTPUT_DIR_NAME: &str = "aiscript";

/// Conventional source directories, in order of preference
pub const SOURCE_DIR_CANDIDATES: &[&str] = &["src", "app", "source"];

/// aiscript configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiscriptConfig {
    /// Namespace prefix that marks a component reference (`AIC.Button`)
    pub namespace: String,

    /// Globs, relative to the project root, of files to scan
    pub include: Vec<String>,

    /// Globs of files and directories to skip while scanning
    pub exclude: Vec<String>,

    /// Explicit output directory (relative to the project root)
    pub output_dir: Option<PathBuf>,

    /// File name of the aggregating index module
    pub index_file: String,

    /// Model identifier passed to the generation service
    pub model: String,

    pub max_tokens: u32,

    /// Base URL of the generation API
    pub api_base: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Per-request timeout for generation calls
    pub timeout_secs: u64,

    /// Maximum number of generation requests in flight
    pub concurrency: usize,
}

impl Default for AiscriptConfig {
    fn default() -> Self {
        Self {
            namespace: "AIC".to_string(),
            include: ["ts", "tsx", "js", "jsx", "vue"]
                .iter()
                .map(|ext| format!("**/*.{}", ext))
                .collect(),
            exclude: vec!["**/node_modules".to_string(), "**/.git".to_string()],
            output_dir: None,
            index_file: "index.ts".to_string(),
            model: "claude-3-sonnet-20240229".to_string(),
            max_tokens: 4000,
            api_base: "https://api.anthropic.com".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            timeout_secs: 300,
            concurrency: 1,
        }
    }
}

impl AiscriptConfig {
    /// Load config from aiscript.toml, falling back to defaults when absent
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let config_path = project_root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;

        let config: AiscriptConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: config_path,
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut chars = self.namespace.chars();
        let valid_namespace = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_namespace {
            return Err(ConfigError::Invalid(format!(
                "namespace '{}' is not a valid identifier",
                self.namespace
            )));
        }

        if self.include.is_empty() {
            return Err(ConfigError::Invalid(
                "include must contain at least one pattern".to_string(),
            ));
        }

        if self.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "concurrency must be at least 1".to_string(),
            ));
        }

        if self.index_file.trim().is_empty() || self.index_file.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "index_file '{}' must be a plain file name",
                self.index_file
            )));
        }

        Ok(())
    }

    /// Where generated components live for this project
    ///
    /// An explicit `output_dir` wins. Otherwise the first existing conventional
    /// source directory gets an `aiscript/` child, falling back to the root.
    pub fn resolve_output_dir(&self, project_root: &Path) -> PathBuf {
        if let Some(ref dir) = self.output_dir {
            return project_root.join(dir);
        }

        SOURCE_DIR_CANDIDATES
            .iter()
            .map(|dir| project_root.join(dir))
            .find(|path| path.is_dir())
            .unwrap_or_else(|| project_root.to_path_buf())
            .join(OUTPUT_DIR_NAME)
    }
}

/// API key for the generation service
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Read the key from the variable named in the config
    pub fn from_env(config: &AiscriptConfig) -> Result<Self, ConfigError> {
        Self::from_value(&config.api_key_env, std::env::var(&config.api_key_env).ok())
    }

    /// Build from an already looked-up value; empty counts as missing
    pub fn from_value(var: &str, value: Option<String>) -> Result<Self, ConfigError> {
        match value {
            Some(api_key) if !api_key.trim().is_empty() => Ok(Self { api_key }),
            _ => Err(ConfigError::MissingCredential {
                var: var.to_string(),
            }),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AiscriptConfig::load(temp_dir.path()).unwrap();

        assert_eq!(config.namespace, "AIC");
        assert_eq!(config.index_file, "index.ts");
        assert_eq!(config.concurrency, 1);
        assert!(config.include.contains(&"**/*.vue".to_string()));
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "namespace = \"UI\"\nconcurrency = 4\n",
        )
        .unwrap();

        let config = AiscriptConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.namespace, "UI");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.model, "claude-3-sonnet-20240229");
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "namespace = [").unwrap();

        let err = AiscriptConfig::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AiscriptConfig {
            namespace: "A.B".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AiscriptConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AiscriptConfig {
            index_file: "nested/index.ts".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(AiscriptConfig::default().validate().is_ok());
    }

    #[test]
    fn test_output_dir_prefers_src() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("app")).unwrap();
        fs::create_dir_all(temp_dir.path().join("src")).unwrap();

        let dir = AiscriptConfig::default().resolve_output_dir(temp_dir.path());
        assert_eq!(dir, temp_dir.path().join("src/aiscript"));
    }

    #[test]
    fn test_output_dir_uses_app_when_no_src() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("app")).unwrap();

        let dir = AiscriptConfig::default().resolve_output_dir(temp_dir.path());
        assert_eq!(dir, temp_dir.path().join("app/aiscript"));
    }

    #[test]
    fn test_output_dir_falls_back_to_root() {
        let temp_dir = TempDir::new().unwrap();
        // A plain file named src is not a source directory
        fs::write(temp_dir.path().join("src"), "").unwrap();

        let dir = AiscriptConfig::default().resolve_output_dir(temp_dir.path());
        assert_eq!(dir, temp_dir.path().join("aiscript"));
    }

    #[test]
    fn test_output_dir_explicit_override() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("src")).unwrap();

        let config = AiscriptConfig {
            output_dir: Some(PathBuf::from("generated/ui")),
            ..Default::default()
        };
        let dir = config.resolve_output_dir(temp_dir.path());
        assert_eq!(dir, temp_dir.path().join("generated/ui"));
    }

    #[test]
    fn test_credentials_missing_or_empty() {
        assert!(Credentials::from_value("KEY", None).is_err());
        assert!(Credentials::from_value("KEY", Some("  ".to_string())).is_err());

        let creds = Credentials::from_value("KEY", Some("sk-test".to_string())).unwrap();
        assert_eq!(creds.api_key(), "sk-test");
        assert!(!format!("{:?}", creds).contains("sk-test"));
    }
}
