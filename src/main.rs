//! toolspan — one function registration, three surfaces.
//!
//! Start-up order: configuration, tracing, one loader pass over the tool
//! modules, then CLI dispatch. The `serve` and `agent` subcommands hand the
//! populated registry to the HTTP and agent-tool adapters; every other
//! subcommand is a registered function.

use std::sync::Arc;

use toolspan_agent::ToolSurface;
use toolspan_core::config::AppConfig;
use toolspan_gateway::{GatewayConfig, GatewayServer};
use toolspan_registry::{LoadMode, ModuleLoader, Registry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    toolspan_core::telemetry::configure_tracing(config.telemetry.json_logs)?;
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "configuration load failed, using defaults");
    }

    tracing::info!("starting toolspan v{}", env!("CARGO_PKG_VERSION"));

    let registry = Arc::new(Registry::new());
    let mode = if config.loader.strict {
        LoadMode::Strict
    } else {
        LoadMode::Tolerant
    };
    let report = ModuleLoader::new(toolspan_tools::modules())
        .with_mode(mode)
        .load(&registry)?;
    tracing::info!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        functions = registry.len(),
        "module pass complete"
    );

    let matches = toolspan_cli::build_command(&registry).get_matches();
    let exit = match matches.subcommand() {
        Some(("list", _)) => {
            print!("{}", toolspan_cli::render_list(&registry));
            0
        }
        Some(("serve", sub)) => {
            let mut gateway_config = GatewayConfig {
                host: config.server.host.clone(),
                port: config.server.port,
                enable_cors: config.gateway.enable_cors,
                enable_tracing: config.gateway.enable_tracing,
            };
            if let Some(host) = sub.get_one::<String>("host") {
                gateway_config.host = host.clone();
            }
            if let Some(port) = sub.get_one::<u16>("port") {
                gateway_config.port = *port;
            }
            GatewayServer::new(gateway_config, registry.clone()).run().await?;
            0
        }
        Some(("agent", _)) => {
            let surface = ToolSurface::new(registry.clone());
            toolspan_agent::serve_stdio(&surface).await?;
            0
        }
        Some((name, sub)) => match registry.get(name) {
            Some(entry) => toolspan_cli::run_function(&entry, sub).await,
            None => {
                eprintln!("unknown command: {}", name);
                2
            }
        },
        None => 2,
    };

    std::process::exit(exit);
}
