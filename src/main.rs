mod config;
mod handlers;
mod models;
mod reminders;
mod roster;
mod router;
mod store;
mod ws;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use reminders::{ReminderService, SimulatedSender};
use roster::Roster;
use store::Store;
use ws::Hub;

/// Application state shared across handlers
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub ws_hub: Arc<Hub>,
    pub reminders: Arc<ReminderService>,
}

impl AppState {
    /// Wire the roster, event hub and reminder service from configuration
    pub fn new(config: Config) -> Arc<Self> {
        let ws_hub = Arc::new(Hub::new());
        let roster = if config.seed_sample_tenants {
            Roster::seeded()
        } else {
            Roster::new()
        };
        let store = Store::new(roster, ws_hub.clone());
        let reminders = ReminderService::new(
            Arc::new(SimulatedSender),
            ws_hub.clone(),
            config.reminder_delay(),
        );

        Arc::new(Self {
            store,
            config,
            ws_hub,
            reminders,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env; real environment variables win
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rent_reminder=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::load();
    tracing::info!("Starting RentReminder Server");
    tracing::info!("Listen: {}", cfg.listen_addr);
    tracing::info!("Frontend Dir: {}", cfg.frontend_dir);
    tracing::info!("Reminder delay: {}ms", cfg.reminder_delay_ms);

    let state = AppState::new(cfg.clone());

    let app = router::build(state);

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("RentReminder listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("RentReminder shutting down");
    Ok(())
}

/// WebSocket upgrade handler
pub async fn ws_upgrade_handler(
    ws: axum::extract::ws::WebSocketUpgrade,
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> axum::response::Response {
    ws::ws_handler(ws, axum::extract::State(state.ws_hub.clone())).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
