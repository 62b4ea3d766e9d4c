use clap::Parser;
use std::sync::Arc;
use subbud::config::toml_config::TomlConfig;
use subbud::core::report;
use subbud::utils::error::{ErrorSeverity, Result, SubbudError};
use subbud::utils::logger::{self, ProgressLogger};
use subbud::utils::validation::{validate_project_name, validate_required_field, Validate};
use subbud::{CliConfig, LocalStorage, Operation, ProjectService, RedisStore, Settings};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::debug!("Starting subbud");
    if config.verbose {
        tracing::debug!("Operation: {:?}, project: {:?}", config.operation, config.project);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ {:?} failed: {} (Category: {:?}, Severity: {:?})",
            config.operation,
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<()> {
    config.validate()?;

    let file_config = match &config.config {
        Some(path) => {
            tracing::debug!("📁 Loading configuration from: {}", path);
            Some(TomlConfig::from_file(path)?)
        }
        None => None,
    };

    let settings = Settings::resolve(config, file_config.as_ref());
    settings.validate()?;

    let project = config.project_name()?;
    if let Some(name) = project {
        validate_project_name(name, &settings.reserved_prefix)?;
    }

    // 任何操作前先確認 Redis 可連線
    let store = Arc::new(RedisStore::connect(&settings).await?);
    let storage = LocalStorage::new(settings.output_dir.clone());
    let service = ProjectService::new(store, storage, settings.workers);

    match (config.operation, project) {
        (Operation::List, _) => {
            let projects = service.list().await?;
            println!("{}", report::render_projects(&projects));
        }
        (Operation::Add, Some(project)) => {
            let file = validate_required_field("file with the 'add' operation", &config.file)?;
            let result = service.add_from_file(project, file, &ProgressLogger).await?;
            if config.json {
                println!("{}", report::render_summary_json(&result)?);
            } else {
                println!("{}", report::render_summary(&result));
            }
        }
        (Operation::Print, Some(project)) => {
            let domains = service.members(project).await?;
            println!("{}", report::render_members(project, &domains));
        }
        (Operation::Delete, Some(project)) => {
            if service.delete(project).await? {
                println!("✅ Project '{}' deleted.", project);
            } else {
                println!("❌ Project '{}' not found.", project);
            }
        }
        (Operation::Save, Some(project)) => {
            let today = chrono::Local::now().date_naive();
            match service.save(project, today).await? {
                Some(path) => println!("✅ Printed domains saved to '{}'", path),
                None => println!("❌ No domains found for this project."),
            }
        }
        (_, None) => {
            return Err(SubbudError::MissingConfigError {
                field: "project name".to_string(),
            })
        }
    }

    Ok(())
}
