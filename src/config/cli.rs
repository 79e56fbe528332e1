use crate::config::{AuditSettings, DEFAULT_REPORT_FILENAME};
use crate::domain::model::AuditRules;
use crate::utils::error::Result;
use crate::utils::validation::{validate_delimiter, Validate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "cadastro-cpf")]
#[command(about = "CPF masking, validation and registry audits")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the masked form (NNN.NNN.NNN-NN) of the input
    Mask { input: String },

    /// Check a CPF; exits with status 2 when it is invalid
    Validate { input: String },

    /// Print the form-field state (masked value and error flag) as JSON
    Check { input: String },

    /// Audit a registry export (CSV) and write a zipped report
    Audit(AuditArgs),
}

#[derive(Debug, Clone, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub input_file: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = ",")]
    pub delimiter: String,

    #[arg(long, default_value = DEFAULT_REPORT_FILENAME)]
    pub report_filename: String,

    #[arg(long, help = "Report rows without a CPF")]
    pub require_cpf: bool,

    #[arg(long, help = "Do not report plain homonyms")]
    pub no_homonyms: bool,

    #[arg(long, value_delimiter = ',', help = "Allowed faction codes (defaults to the known list)")]
    pub factions: Vec<String>,
}

impl AuditArgs {
    pub fn to_settings(&self) -> Result<AuditSettings> {
        let defaults = AuditRules::default();
        let settings = AuditSettings {
            input_file: self.input_file.clone(),
            output_path: self.output_path.clone(),
            delimiter: validate_delimiter("delimiter", &self.delimiter)?,
            report_filename: self.report_filename.clone(),
            rules: AuditRules {
                require_cpf: self.require_cpf,
                flag_homonyms: !self.no_homonyms,
                allowed_factions: if self.factions.is_empty() {
                    defaults.allowed_factions
                } else {
                    self.factions.clone()
                },
            },
        };
        settings.validate()?;
        Ok(settings)
    }
}
