mod analyzer;
mod api;
mod engine;
mod env;
mod evaluator;
mod language;
mod sandbox;
mod score;

use api::{ApiConfig, ApiServer, AppState};
use engine::Engine;
use sandbox::{DockerRuntime, Sandbox, SandboxConfig};
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{Level, error, info, warn};
use tracing_subscriber::fmt;

/// Tokio runtime with signal handling
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    fmt()
        .with_max_level(env::parse_env_var("LOG_LEVEL", Level::INFO))
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting codegrade execution service...");

    // Initialize config
    let sandbox_config = SandboxConfig::from_env()?;
    let api_config = ApiConfig::from_env();

    info!(
        port = api_config.port,
        timeout_ms = sandbox_config.timeout_ms(),
        memory_bytes = sandbox_config.limits.memory_bytes,
        network_enabled = sandbox_config.network_enabled,
        "Configuration loaded"
    );

    // Initialize container runtime
    let runtime = match DockerRuntime::connect() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Container runtime initialization failed");
            process::exit(1);
        }
    };
    let sandbox = Sandbox::new(Arc::new(runtime), sandbox_config);

    // Build missing runner images; the service still starts when some fail
    match sandbox.ping().await {
        Ok(()) => match sandbox.ensure_images().await {
            Ok(0) => info!("All runner images ready"),
            Ok(missing) => warn!(missing, "Some runner images are unavailable"),
            Err(e) => warn!(error = %e, "Image check failed"),
        },
        Err(e) => warn!(error = %e, "Container runtime not reachable, execution requests will fail"),
    }

    // Initialize API
    let state = AppState::new(Engine::new(sandbox));
    let server = ApiServer::bind(&api_config, state).await?;
    info!(addr = %server.local_addr()?, "API initialized");

    server
        .run(async {
            signal::ctrl_c().await.ok();
            info!("Received shutdown signal");
        })
        .await?;

    info!("Goodbye!");
    Ok(())
}
