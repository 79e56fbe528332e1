use crate::domain::cpf::{self, Cpf, CpfError};
use crate::utils::error::{RegistryError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// An individual in the registry, keyed by the backend's column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "alcunha", default)]
    pub alias: Option<String>,
    #[serde(rename = "documento", default)]
    pub document: Option<String>,
    #[serde(rename = "data_nascimento", default)]
    pub birth_date: Option<String>,
    #[serde(rename = "mae", default)]
    pub mother: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    #[serde(rename = "faccao", default)]
    pub faction: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Individual {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The form applied before a record is saved: trimmed, blank optionals
    /// dropped, name and mother upper-cased, document masked.
    ///
    /// A document with more than 11 digits is kept as written, since masking
    /// would drop the extra digits and hide the error.
    pub fn normalized(self) -> Self {
        Self {
            id: clean(self.id),
            name: self.name.trim().to_uppercase(),
            alias: clean(self.alias),
            document: clean(self.document).and_then(|d| match cpf::digits(&d).len() {
                0 => None,
                n if n > cpf::CPF_DIGITS => Some(d),
                _ => Some(cpf::mask(&d)),
            }),
            birth_date: clean(self.birth_date),
            mother: clean(self.mother).map(|m| m.to_uppercase()),
            address: clean(self.address),
            faction: clean(self.faction).map(|f| f.to_uppercase()),
        }
    }

    /// The parsed CPF, if a document is present.
    pub fn cpf(&self) -> Option<std::result::Result<Cpf, CpfError>> {
        self.document.as_deref().map(Cpf::parse)
    }
}

impl Validate for Individual {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("nome", &self.name)?;

        if let Some(result) = self.cpf() {
            result?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Faction {
    Pcc,
    Cv,
    Tcp,
    Gde,
    Bdm,
    Sdc,
    Fdn,
}

impl Faction {
    pub const ALL: [Faction; 7] = [
        Faction::Pcc,
        Faction::Cv,
        Faction::Tcp,
        Faction::Gde,
        Faction::Bdm,
        Faction::Sdc,
        Faction::Fdn,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Faction::Pcc => "PCC",
            Faction::Cv => "CV",
            Faction::Tcp => "TCP",
            Faction::Gde => "GDE",
            Faction::Bdm => "BDM",
            Faction::Sdc => "SDC",
            Faction::Fdn => "FDN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Faction::Pcc => "Primeiro Comando da Capital",
            Faction::Cv => "Comando Vermelho",
            Faction::Tcp => "Terceiro Comando Puro",
            Faction::Gde => "Guardiões do Estado",
            Faction::Bdm => "Bonde do Maluco",
            Faction::Sdc => "Sindicato do Crime",
            Faction::Fdn => "Família do Norte",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Faction {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        Faction::ALL
            .into_iter()
            .find(|f| f.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| RegistryError::ValidationError {
                message: format!("unknown faction code '{}'", code),
            })
    }
}

/// Which checks an audit run applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRules {
    #[serde(default)]
    pub require_cpf: bool,
    #[serde(default = "default_true")]
    pub flag_homonyms: bool,
    #[serde(default = "default_factions")]
    pub allowed_factions: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_factions() -> Vec<String> {
    Faction::ALL.iter().map(|f| f.code().to_string()).collect()
}

impl Default for AuditRules {
    fn default() -> Self {
        Self {
            require_cpf: false,
            flag_homonyms: true,
            allowed_factions: default_factions(),
        }
    }
}

impl AuditRules {
    pub fn allows_faction(&self, code: &str) -> bool {
        self.allowed_factions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(code))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingName,
    MissingCpf,
    InvalidCpf,
    UnknownFaction,
    DuplicateCpf,
    LikelySamePerson,
    Homonym,
}

impl FindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingKind::MissingName => "missing_name",
            FindingKind::MissingCpf => "missing_cpf",
            FindingKind::InvalidCpf => "invalid_cpf",
            FindingKind::UnknownFaction => "unknown_faction",
            FindingKind::DuplicateCpf => "duplicate_cpf",
            FindingKind::LikelySamePerson => "likely_same_person",
            FindingKind::Homonym => "homonym",
        }
    }
}

/// One problem found on one row of a registry export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub row: usize,
    pub kind: FindingKind,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub total_rows: usize,
    pub clean_rows: usize,
    pub findings: usize,
    pub by_kind: BTreeMap<FindingKind, usize>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct AuditResult {
    pub individuals: Vec<Individual>,
    pub findings: Vec<Finding>,
    pub summary: AuditSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_uppercases_and_masks() {
        let raw = Individual {
            name: "  joão da silva ".to_string(),
            mother: Some("maria".to_string()),
            document: Some("52998224725".to_string()),
            alias: Some("   ".to_string()),
            faction: Some("cv".to_string()),
            ..Default::default()
        };

        let ind = raw.normalized();
        assert_eq!(ind.name, "JOÃO DA SILVA");
        assert_eq!(ind.mother.as_deref(), Some("MARIA"));
        assert_eq!(ind.document.as_deref(), Some("529.982.247-25"));
        assert_eq!(ind.alias, None);
        assert_eq!(ind.faction.as_deref(), Some("CV"));
    }

    #[test]
    fn test_document_without_digits_is_dropped() {
        let ind = Individual {
            name: "X".to_string(),
            document: Some("n/a".to_string()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(ind.document, None);
    }

    #[test]
    fn test_overlong_document_is_kept_as_written() {
        let ind = Individual {
            name: "ANA".to_string(),
            document: Some(" 529.982.247-25 / 111.444.777-35 ".to_string()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(
            ind.document.as_deref(),
            Some("529.982.247-25 / 111.444.777-35")
        );
        assert_eq!(ind.cpf(), Some(Err(CpfError::WrongLength(22))));
    }

    #[test]
    fn test_validate_individual() {
        assert!(Individual::new("FULANO").validate().is_ok());
        assert!(matches!(
            Individual::new("  ").validate(),
            Err(RegistryError::ValidationError { .. })
        ));

        let mut bad = Individual::new("FULANO");
        bad.document = Some("123.456.789-00".to_string());
        assert!(matches!(
            bad.validate(),
            Err(RegistryError::CpfError(CpfError::CheckDigitMismatch))
        ));

        bad.document = Some("529.982.247-25".to_string());
        assert!(bad.validate().is_ok());
    }

    #[test]
    fn test_faction_parse() {
        assert_eq!("pcc".parse::<Faction>().unwrap(), Faction::Pcc);
        assert_eq!(" FDN ".parse::<Faction>().unwrap(), Faction::Fdn);
        assert!("XYZ".parse::<Faction>().is_err());
        assert_eq!(Faction::Gde.label(), "Guardiões do Estado");
    }

    #[test]
    fn test_default_rules_allow_known_factions() {
        let rules = AuditRules::default();
        assert!(rules.allows_faction("tcp"));
        assert!(!rules.allows_faction("ABC"));
        assert!(rules.flag_homonyms);
        assert!(!rules.require_cpf);
    }

    #[test]
    fn test_individual_deserializes_backend_columns() {
        let json = r#"{"id":"7","nome":"FULANO","documento":"529.982.247-25","faccao":"CV"}"#;
        let ind: Individual = serde_json::from_str(json).unwrap();
        assert_eq!(ind.name, "FULANO");
        assert_eq!(ind.document.as_deref(), Some("529.982.247-25"));
        assert_eq!(ind.mother, None);
    }
}
