use cadastro_cpf::utils::logger;
use cadastro_cpf::{AuditEngine, CliConfig, Command, CpfField, LocalStorage, RegistryAuditPipeline};
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    match config.command {
        Command::Mask { input } => println!("{}", cadastro_cpf::mask(&input)),
        Command::Validate { input } => match cadastro_cpf::Cpf::parse(&input) {
            Ok(cpf) => println!("valid {}", cpf),
            Err(e) => {
                tracing::debug!("CPF rejected: {}", e);
                println!("invalid: {}", e);
                std::process::exit(2);
            }
        },
        Command::Check { input } => {
            let field = CpfField::from_input(&input);
            match serde_json::to_string(&field) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(3);
                }
            }
        }
        Command::Audit(args) => {
            let settings = match args.to_settings() {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::error!("Configuration validation failed: {}", e);
                    eprintln!("❌ {}", e.user_friendly_message());
                    eprintln!("💡 {}", e.recovery_suggestion());
                    std::process::exit(e.exit_code());
                }
            };

            let pipeline = RegistryAuditPipeline::new(LocalStorage::new("."), settings);
            let engine = AuditEngine::new(pipeline);

            match engine.run().await {
                Ok(output_path) => {
                    println!("✅ Audit completed");
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
        }
    }
}
