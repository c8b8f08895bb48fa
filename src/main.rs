//! Phone System Bridge
//!
//! Exposes a remote telephony service (calls, broadcasts, hangup) to a
//! home-automation host as services and sensors, backed by a polling
//! coordinator.

mod api;
mod config;
mod error;
mod models;
mod phone;
mod sensors;
#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::BridgeState;
use crate::phone::{CommandClient, Coordinator, PhoneClient, PhoneSyncer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phone_system_bridge=info,tower_http=debug".into()),
        )
        .init();

    tracing::info!("Starting phone-system-bridge...");

    // Load configuration
    let config = config::Config::load()?;
    let phone_cfg = &config.phone_system;
    tracing::info!("Configuration loaded");

    let client = PhoneClient::new(&phone_cfg.host, phone_cfg.port, phone_cfg.timeout())?;

    // Connection test against /health before anything else
    client
        .check_health()
        .await
        .with_context(|| format!("Cannot connect to phone system at {}", client.base_url()))?;
    tracing::info!("Phone system reachable at {}", client.base_url());

    let coordinator = Arc::new(Coordinator::new(
        client.clone(),
        phone_cfg.history_limit,
        phone_cfg.timeout(),
    ));

    // First refresh must succeed before sensors are served
    let snapshot = coordinator
        .refresh()
        .await
        .context("Initial phone system refresh failed")?;
    tracing::info!(
        "Initial refresh: {} active calls, {} groups, {} broadcasts",
        snapshot.active_calls.len(),
        snapshot.groups.len(),
        snapshot.broadcasts.len()
    );

    let commands = Arc::new(CommandClient::new(client.clone(), coordinator.clone()));

    start_background_tasks(coordinator.clone(), phone_cfg.scan_interval());

    let state = BridgeState {
        coordinator,
        commands,
        client,
        instance_id: phone_cfg.instance_id(),
    };

    let app = api::routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                config.server.host, config.server.port
            )
        })?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Start background tasks (phone system poller)
fn start_background_tasks(coordinator: Arc<Coordinator>, interval: Duration) {
    let syncer = Arc::new(PhoneSyncer::new(coordinator, interval));
    tokio::spawn(async move {
        syncer.start().await;
    });

    tracing::info!("Background tasks started");
}
