use rtg_auth::TokenAuthority;
use rtg_bus::{InMemoryBus, PubSubBus, RedisBus};
use rtg_server::{GatewayState, ServerError, build_router, logger};
use rtg_ws::{HeartbeatMonitor, ShutdownCoordinator};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::net::TcpListener;

const HEARTBEAT_MONITOR_STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = rtg_config::Config::load()?;
    config.validate()?;

    // Initialize logger (before any other logging)
    logger::initialize(&config.logging)?;

    info!("Starting rtg-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let authority = Arc::new(TokenAuthority::from_config(&config.auth).map_err(ServerError::from)?);
    info!("JWT: {} verification enabled", authority.algorithm());

    // Pub/sub bus: Redis for multi-instance fan-out, in-process otherwise
    let bus: Arc<dyn PubSubBus> = if config.redis.enabled {
        info!("Connecting to Redis at {}", config.redis.redacted_url());
        let bus = RedisBus::connect(&config.redis)
            .await
            .map_err(ServerError::from)?;
        info!("Redis pub/sub connected");
        Arc::new(bus)
    } else {
        warn!("Redis disabled: broadcasts reach this instance only");
        Arc::new(InMemoryBus::new())
    };

    // Create shutdown coordinator
    let shutdown = ShutdownCoordinator::new();

    // Build application state
    let state = GatewayState::new(
        config.clone(),
        authority,
        Arc::clone(&bus),
        shutdown.clone(),
    );

    // Reap connections that stopped answering heartbeats
    let heartbeat = HeartbeatMonitor::new(
        state.ws.registry.clone(),
        state.ws.metrics.clone(),
        state.ws.config.heartbeat_interval,
        state.ws.config.heartbeat_timeout,
    )
    .spawn(shutdown.subscribe_guard());

    // Build router
    let app = build_router(state);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
    info!("Server listening on {}", listener.local_addr()?);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown_for_signal.shutdown();
    });

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("Shutdown signal received, draining connections");
        })
        .await?;

    if tokio::time::timeout(HEARTBEAT_MONITOR_STOP_TIMEOUT, heartbeat)
        .await
        .is_err()
    {
        warn!("Heartbeat monitor did not stop in time");
    }

    bus.shutdown().await;
    info!("Graceful shutdown complete");

    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn wait_for_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
