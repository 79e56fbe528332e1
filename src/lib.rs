pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{AuditArgs, CliConfig, Command};
pub use config::{local::LocalStorage, AuditSettings};

pub use core::{etl::AuditEngine, pipeline::RegistryAuditPipeline};
pub use domain::cpf::{mask, validate, Cpf, CpfError, CpfField};
pub use domain::model::Individual;
pub use utils::error::{RegistryError, Result};
