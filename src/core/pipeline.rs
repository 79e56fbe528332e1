use crate::core::screening::{MatchKind, RegistryIndex};
use crate::core::{AuditResult, ConfigProvider, Individual, Pipeline, Storage};
use crate::domain::model::{AuditSummary, Finding, FindingKind};
use crate::utils::error::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

const FINDINGS_CSV: &str = "findings.csv";
const INDIVIDUALS_JSON: &str = "individuals.json";
const SUMMARY_JSON: &str = "summary.json";

/// Reads a registry export, checks every row and writes a zipped report.
pub struct RegistryAuditPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> RegistryAuditPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn row_findings(&self, row: usize, individual: &Individual, index: &RegistryIndex) -> Vec<Finding> {
        let rules = self.config.rules();
        let mut findings = Vec::new();
        let mut push = |kind: FindingKind, detail: String| {
            findings.push(Finding { row, kind, detail });
        };

        if individual.name.is_empty() {
            push(FindingKind::MissingName, "nome is empty".to_string());
        }

        match individual.cpf() {
            None if rules.require_cpf => {
                push(FindingKind::MissingCpf, "documento is empty".to_string())
            }
            None => {}
            Some(Err(e)) => push(FindingKind::InvalidCpf, e.to_string()),
            Some(Ok(_)) => {}
        }

        if let Some(code) = individual.faction.as_deref() {
            if !rules.allows_faction(code) {
                push(
                    FindingKind::UnknownFaction,
                    format!("faction '{}' is not in the allowed list", code),
                );
            }
        }

        for found in index.matches(individual) {
            let kind = match found.kind {
                MatchKind::DuplicateCpf => FindingKind::DuplicateCpf,
                MatchKind::LikelySamePerson => FindingKind::LikelySamePerson,
                MatchKind::Homonym if rules.flag_homonyms => FindingKind::Homonym,
                MatchKind::Homonym => continue,
            };
            push(kind, format!("same as row {}", found.row));
        }

        findings
    }

    fn findings_csv(individuals: &[Individual], findings: &[Finding]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["row", "nome", "documento", "finding", "detail"])?;

        for finding in findings {
            let individual = individuals.get(finding.row.wrapping_sub(1));
            writer.write_record([
                finding.row.to_string().as_str(),
                individual.map_or("", |ind| ind.name.as_str()),
                individual.and_then(|ind| ind.document.as_deref()).unwrap_or(""),
                finding.kind.as_str(),
                finding.detail.as_str(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RegistryAuditPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Individual>> {
        tracing::debug!("Reading registry export from: {}", self.config.input_file());
        let data = self.storage.read_file(self.config.input_file()).await?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter())
            .trim(csv::Trim::Headers)
            .flexible(false)
            .from_reader(data.as_slice());

        let mut rows = Vec::new();
        for record in reader.deserialize() {
            let individual: Individual = record?;
            rows.push(individual);
        }

        tracing::debug!("Parsed {} rows", rows.len());
        Ok(rows)
    }

    async fn transform(&self, rows: Vec<Individual>) -> Result<AuditResult> {
        let mut index = RegistryIndex::new();
        let mut individuals = Vec::with_capacity(rows.len());
        let mut findings = Vec::new();

        for (i, raw) in rows.into_iter().enumerate() {
            let row = i + 1;
            let individual = raw.normalized();

            let row_findings = self.row_findings(row, &individual, &index);
            if !row_findings.is_empty() {
                tracing::debug!("Row {}: {} finding(s)", row, row_findings.len());
            }
            findings.extend(row_findings);

            index.insert(row, &individual);
            individuals.push(individual);
        }

        let flagged: BTreeSet<usize> = findings.iter().map(|f| f.row).collect();
        let mut by_kind = BTreeMap::new();
        for finding in &findings {
            *by_kind.entry(finding.kind).or_insert(0) += 1;
        }

        let summary = AuditSummary {
            total_rows: individuals.len(),
            clean_rows: individuals.len() - flagged.len(),
            findings: findings.len(),
            by_kind,
            generated_at: chrono::Utc::now(),
        };

        Ok(AuditResult {
            individuals,
            findings,
            summary,
        })
    }

    async fn load(&self, result: AuditResult) -> Result<String> {
        let output_path = Path::new(self.config.output_path())
            .join(self.config.report_filename())
            .to_string_lossy()
            .into_owned();

        let csv_data = Self::findings_csv(&result.individuals, &result.findings)?;

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>(FINDINGS_CSV, FileOptions::default())?;
            zip.write_all(&csv_data)?;

            zip.start_file::<_, ()>(INDIVIDUALS_JSON, FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&result.individuals)?.as_bytes())?;

            zip.start_file::<_, ()>(SUMMARY_JSON, FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&result.summary)?.as_bytes())?;

            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing report ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&output_path, &zip_data).await?;

        Ok(output_path)
    }
}
