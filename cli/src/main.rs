//! CLI entrypoint for Ellen
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod input;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use ellen_application::{ControllerFactory, Orchestrator};
use ellen_domain::{
    RoutingLoop, TierModelMap, ToolDefinition, ToolRequest, check_entitlements, select_tier,
};
use ellen_infrastructure::{
    ConfigLoader, FileConfig, FileEntitlementsStore, JsonlToolAuditLogger, LoadedRegistry,
    OpenAiCompatibleGateway, RegistryLoader,
};
use ellen_presentation::{
    Cli, Command, ConsoleFormatter, JsonFormatter, OutputFormat, OutputFormatter,
    ProgressReporter,
};
use input::PayloadInput;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref());
    info!("Starting Ellen");

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }
    config.validate().context("Invalid configuration")?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!("\nEffective configuration:\n");
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        bail!("No command given. Run `ellen --help` for usage.");
    };

    let formatter: Box<dyn OutputFormatter> = match cli.output {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    };

    // === Dependency Injection ===
    // Registry and schemas are loaded once and shared read-only
    let loaded = RegistryLoader::load(config.registry.dir.as_deref())
        .context("Failed to load tool registry")?;
    let models = config.models.to_model_map();

    match command {
        Command::Tools => {
            println!("{}", formatter.format_tools(&loaded.registry, &models));
        }

        Command::Loop { steps } => {
            let default_loop = &loaded.registry.routing.default_loop;
            let walked: Vec<String> = match steps {
                Some(n) => {
                    let mut cursor = RoutingLoop::new(default_loop.clone());
                    (0..n).map_while(|_| cursor.next_step()).collect()
                }
                None => default_loop.clone(),
            };
            println!("{}", formatter.format_loop(&walked));
        }

        Command::Route { payload } => {
            let input = PayloadInput::read(&payload)?;
            let tool = lookup_tool(&loaded, &payload.tool)?;
            if let Some(entitlements) = &input.entitlements {
                check_entitlements(entitlements, &tool.name)
                    .map_err(|denial| anyhow!("Insufficient entitlements: {}", denial))?;
            }
            let decision = select_tier(tool, &input.payload, input.entitlements.as_ref());
            println!(
                "{}",
                formatter.format_decision(&tool.name, &decision, models.model_for(decision.tier))
            );
        }

        Command::Validate { payload, response } => {
            use ellen_application::SchemaValidator;

            let input = PayloadInput::read(&payload)?;
            let tool = lookup_tool(&loaded, &payload.tool)?;
            let outcome = if response {
                loaded.validator.validate_response(&tool.name, &input.payload)
            } else {
                loaded.validator.validate_request(&tool.name, &input.payload)
            };
            let blocked = if loaded.registry.formative_only {
                loaded.registry.check_for_blocked_fields(&input.payload)
            } else {
                Vec::new()
            };
            println!(
                "{}",
                formatter.format_validation(&tool.name, &outcome, &blocked)
            );
            if !outcome.valid || !blocked.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Invoke {
            payload,
            user,
            session,
        } => {
            let input = PayloadInput::read(&payload)?;
            let orchestrator = build_orchestrator(&config, &loaded, models)?;

            let mut request = ToolRequest::new(payload.tool.as_str(), input.payload);
            if let Some(user) = user {
                request = request.with_user(user);
            }
            if let Some(session) = session {
                request = request.with_session(session);
            }
            if let Some(entitlements) = input.entitlements {
                request = request.with_entitlements(entitlements);
            }

            let response = if cli.quiet || !config.output.show_progress {
                orchestrator.process_request(request).await
            } else {
                let progress = ProgressReporter::new();
                orchestrator
                    .process_request_with_progress(request, &progress)
                    .await
            };

            println!("{}", formatter.format_response(&response));
            if !response.success {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Registry lookup with a pointer to `ellen tools` for unknown names
fn lookup_tool<'a>(loaded: &'a LoadedRegistry, name: &str) -> Result<&'a ToolDefinition> {
    loaded.registry.get_tool(name).map_err(|err| {
        if err.is_unknown_tool() {
            anyhow!("{}. Run `ellen tools` to list registered tools.", err)
        } else {
            err.into()
        }
    })
}

/// Wire the orchestrator from configuration
fn build_orchestrator(
    config: &FileConfig,
    loaded: &LoadedRegistry,
    models: TierModelMap,
) -> Result<Orchestrator> {
    let gateway = Arc::new(
        OpenAiCompatibleGateway::from_config(&config.providers.openai)
            .context("Failed to create model gateway")?,
    );
    let controllers = ControllerFactory::new(gateway, Arc::new(models))
        .with_params(config.execution.to_params())
        .default_set();
    debug!(controllers = ?controllers.names(), "Registered tool controllers");

    let mut orchestrator = Orchestrator::new(
        Arc::clone(&loaded.registry),
        loaded.validator.clone(),
        controllers,
    );

    if let Some(path) = &config.entitlements.file {
        let store = FileEntitlementsStore::load(path).context("Failed to load entitlements store")?;
        orchestrator = orchestrator.with_entitlements_provider(Arc::new(store));
    }

    if let Some(path) = &config.logging.audit_log
        && let Some(logger) = JsonlToolAuditLogger::new(path)
    {
        info!(path = %logger.path().display(), "Writing tool audit trail");
        orchestrator = orchestrator.with_audit_logger(Arc::new(logger));
    }

    Ok(orchestrator)
}

/// stderr logging filtered by `-v` (or `ELLEN_LOG`), plus an optional
/// daily-rotated file. The returned guard must live until exit.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_env("ELLEN_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(filter).with(stderr).init();
        return None;
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ellen.log".to_string());
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, prefix));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
    Some(guard)
}
