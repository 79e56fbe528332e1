pub mod etl;
pub mod pipeline;
pub mod screening;

pub use crate::domain::model::{AuditResult, Individual};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
