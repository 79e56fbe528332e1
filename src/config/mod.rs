#[cfg(feature = "cli")]
pub mod cli;
pub mod local;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::AuditRules;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};

pub const DEFAULT_REPORT_FILENAME: &str = "audit_report.zip";

/// Resolved settings for one audit run, whichever front end produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSettings {
    pub input_file: String,
    pub output_path: String,
    pub delimiter: u8,
    pub report_filename: String,
    pub rules: AuditRules,
}

impl ConfigProvider for AuditSettings {
    fn input_file(&self) -> &str {
        &self.input_file
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn report_filename(&self) -> &str {
        &self.report_filename
    }

    fn rules(&self) -> &AuditRules {
        &self.rules
    }
}

impl Validate for AuditSettings {
    fn validate(&self) -> Result<()> {
        validate_path("input_file", &self.input_file)?;
        validate_path("output_path", &self.output_path)?;
        validate_non_empty_string("report_filename", &self.report_filename)?;
        Ok(())
    }
}
