use cadastro_cpf::config::toml_config::TomlConfig;
use cadastro_cpf::core::ConfigProvider;
use cadastro_cpf::utils::{logger, validation::Validate};
use cadastro_cpf::{AuditEngine, AuditSettings, LocalStorage, RegistryAuditPipeline};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-audit")]
#[command(about = "Registry audit driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "audit-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override rules.require_cpf from the config
    #[arg(long)]
    require_cpf: Option<bool>,

    /// Show what would be checked without reading the export
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(require_cpf) = args.require_cpf {
        config.rules.require_cpf = require_cpf;
        tracing::info!("rules.require_cpf overridden to: {}", require_cpf);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    let settings = config.to_settings()?;
    display_config_summary(&config, &settings);

    if args.dry_run {
        tracing::info!("Dry run, no report written");
        return Ok(());
    }

    let pipeline = RegistryAuditPipeline::new(LocalStorage::new("."), settings);
    let engine = AuditEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Audit '{}' completed", config.audit.name);
            println!("📁 Report saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Audit failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, settings: &AuditSettings) {
    let rules = settings.rules();
    println!("📋 Audit: {}", config.audit.name);
    if let Some(description) = &config.audit.description {
        println!("  {}", description);
    }
    println!("  Input: {}", settings.input_file());
    println!("  Delimiter: {:?}", char::from(settings.delimiter()));
    println!(
        "  Report: {}/{}",
        settings.output_path(),
        settings.report_filename()
    );
    println!("  Require CPF: {}", rules.require_cpf);
    println!("  Flag homonyms: {}", rules.flag_homonyms);
    println!("  Allowed factions: {}", rules.allowed_factions.join(", "));
    println!();
}
