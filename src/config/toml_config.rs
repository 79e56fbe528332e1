use crate::config::{AuditSettings, DEFAULT_REPORT_FILENAME};
use crate::domain::model::{AuditRules, Faction};
use crate::utils::error::{RegistryError, Result};
use crate::utils::validation::{validate_delimiter, validate_path, validate_required_field, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub audit: AuditInfo,
    pub source: SourceConfig,
    #[serde(default)]
    pub rules: AuditRules,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input_file: String,
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: Option<String>,
    pub report_filename: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern compiles"))
}

impl TomlConfig {
    /// Loads an audit configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RegistryError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RegistryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.audit.name.trim().is_empty() {
            return Err(RegistryError::ConfigValidationError {
                field: "audit.name".to_string(),
                message: "Audit name cannot be blank".to_string(),
            });
        }

        validate_path("source.input_file", &self.source.input_file)?;
        validate_path(
            "load.output_path",
            validate_required_field("load.output_path", &self.load.output_path)?,
        )?;

        if let Some(delimiter) = &self.source.delimiter {
            validate_delimiter("source.delimiter", delimiter)?;
        }

        for code in &self.rules.allowed_factions {
            if code.trim().is_empty() {
                return Err(RegistryError::InvalidConfigValueError {
                    field: "rules.allowed_factions".to_string(),
                    value: code.clone(),
                    reason: "Faction codes cannot be empty".to_string(),
                });
            }
            if code.parse::<Faction>().is_err() {
                tracing::warn!("rules.allowed_factions has a code outside the known list: {}", code);
            }
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        self.load.output_path.as_deref().unwrap_or("./output")
    }

    pub fn report_filename(&self) -> &str {
        self.load
            .report_filename
            .as_deref()
            .unwrap_or(DEFAULT_REPORT_FILENAME)
    }

    pub fn to_settings(&self) -> Result<AuditSettings> {
        self.validate_config()?;

        let delimiter = match &self.source.delimiter {
            Some(d) => validate_delimiter("source.delimiter", d)?,
            None => b',',
        };

        Ok(AuditSettings {
            input_file: self.source.input_file.clone(),
            output_path: self.output_path().to_string(),
            delimiter,
            report_filename: self.report_filename().to_string(),
            rules: self.rules.clone(),
        })
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
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[audit]
name = "monthly-check"

[source]
input_file = "exports/individuos.csv"
delimiter = ";"

[rules]
require_cpf = true

[load]
output_path = "./reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.audit.name, "monthly-check");
        assert!(config.rules.require_cpf);
        assert!(config.rules.flag_homonyms);
        assert_eq!(config.rules.allowed_factions.len(), 7);

        let settings = config.to_settings().unwrap();
        assert_eq!(settings.delimiter, b';');
        assert_eq!(settings.report_filename, "audit_report.zip");
    }

    #[test]
    fn test_rules_section_is_optional() {
        let toml_content = r#"
[audit]
name = "defaults"

[source]
input_file = "individuos.csv"

[load]
output_path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.rules, AuditRules::default());
        assert_eq!(config.to_settings().unwrap().delimiter, b',');
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CADASTRO_TEST_EXPORT", "/data/individuos.csv");

        let toml_content = r#"
[audit]
name = "env"

[source]
input_file = "${CADASTRO_TEST_EXPORT}"

[load]
output_path = "${CADASTRO_TEST_UNSET_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.input_file, "/data/individuos.csv");
        assert_eq!(config.output_path(), "${CADASTRO_TEST_UNSET_DIR}");

        std::env::remove_var("CADASTRO_TEST_EXPORT");
    }

    #[test]
    fn test_missing_output_path_fails_validation() {
        let toml_content = r#"
[audit]
name = "no-output"

[source]
input_file = "individuos.csv"

[load]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(RegistryError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_bad_delimiter_fails_validation() {
        let toml_content = r#"
[audit]
name = "bad"

[source]
input_file = "individuos.csv"
delimiter = "||"

[load]
output_path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[audit]
name = "file-test"

[source]
input_file = "individuos.csv"

[load]
output_path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.audit.name, "file-test");
    }

    #[test]
    fn test_blank_audit_name_fails_validation() {
        let toml_content = r#"
[audit]
name = "  "

[source]
input_file = "individuos.csv"

[load]
output_path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(RegistryError::ConfigValidationError { ref field, .. }) if field == "audit.name"
        ));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            TomlConfig::from_toml_str("[audit"),
            Err(RegistryError::ConfigError { .. })
        ));
    }
}
