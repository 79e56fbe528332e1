use crate::domain::model::{AuditResult, AuditRules, Individual};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn delimiter(&self) -> u8;
    fn report_filename(&self) -> &str;
    fn rules(&self) -> &AuditRules;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Individual>>;
    async fn transform(&self, rows: Vec<Individual>) -> Result<AuditResult>;
    async fn load(&self, result: AuditResult) -> Result<String>;
}
