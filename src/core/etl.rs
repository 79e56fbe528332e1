use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct AuditEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AuditEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting registry audit");

        let rows = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows", rows.len());

        let result = self.pipeline.transform(rows).await?;
        tracing::info!(
            total = result.summary.total_rows,
            clean = result.summary.clean_rows,
            findings = result.summary.findings,
            "Audit checks finished"
        );
        for (kind, count) in &result.summary.by_kind {
            tracing::debug!("{}: {}", kind.as_str(), count);
        }

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Report saved to: {}", output_path);

        Ok(output_path)
    }
}
