use crate::adapters::fdsn::{DEFAULT_ETH_URL, DEFAULT_IRIS_URL};
use crate::core::cascade::{RegionChangePolicy, DEFAULT_START_YEAR};
use crate::core::ConfigProvider;
use crate::domain::model::{DataCenter, Language};
use crate::utils::error::{ExplorerError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub services: ServicesConfig,
    pub session: SessionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub eth_url: String,
    pub iris_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            eth_url: DEFAULT_ETH_URL.to_string(),
            iris_url: DEFAULT_IRIS_URL.to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub language: Language,
    pub start_year: i32,
    pub region_change: RegionChangePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: Language::En,
            start_year: DEFAULT_START_YEAR,
            region_change: RegionChangePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
        }
    }
}

impl TomlConfig {
    /// Loads a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExplorerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses a TOML configuration string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExplorerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable; unknown
    /// variables are left in place.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExplorerError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("services.eth_url", &self.services.eth_url)?;
        validate_url("services.iris_url", &self.services.iris_url)?;
        validate_range("services.timeout_seconds", self.services.timeout_seconds, 1, 600)?;
        validate_range(
            "session.start_year",
            self.session.start_year,
            1900,
            Utc::now().year(),
        )?;
        validate_path("output.path", &self.output.path)?;
        Ok(())
    }

    pub fn region_change_policy(&self) -> RegionChangePolicy {
        self.session.region_change
    }
}

impl ConfigProvider for TomlConfig {
    fn service_url(&self, center: DataCenter) -> &str {
        match center {
            DataCenter::Eth => &self.services.eth_url,
            DataCenter::Iris => &self.services.iris_url,
        }
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.services.timeout_seconds)
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn language(&self) -> Language {
        self.session.language
    }

    fn start_year(&self) -> i32 {
        self.session.start_year
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[services]
eth_url = "http://localhost:8080"
iris_url = "http://localhost:8081"
timeout_seconds = 15

[session]
language = "de"
start_year = 2024
region_change = "reset-only"

[output]
path = "./plots"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.service_url(DataCenter::Eth), "http://localhost:8080");
        assert_eq!(config.service_url(DataCenter::Iris), "http://localhost:8081");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.language(), Language::De);
        assert_eq!(config.start_year(), 2024);
        assert_eq!(config.region_change_policy(), RegionChangePolicy::ResetOnly);
        assert_eq!(config.output_path(), "./plots");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TomlConfig::from_toml_str("[session]\nlanguage = \"en\"\n").unwrap();
        assert_eq!(config.service_url(DataCenter::Eth), DEFAULT_ETH_URL);
        assert_eq!(config.start_year(), DEFAULT_START_YEAR);
        assert_eq!(config.region_change_policy(), RegionChangePolicy::Requery);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("QUAKE_EXPLORER_TEST_ETH", "https://fdsn.example.org");

        let toml_content = r#"
[services]
eth_url = "${QUAKE_EXPLORER_TEST_ETH}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.services.eth_url, "https://fdsn.example.org");

        std::env::remove_var("QUAKE_EXPLORER_TEST_ETH");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[services]
iris_url = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let bad_language = TomlConfig::from_toml_str("[session]\nlanguage = \"fr\"\n");
        assert!(matches!(
            bad_language,
            Err(ExplorerError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[output]
path = "./from-file"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./from-file");
    }
}
