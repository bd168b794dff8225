// Relay HTTP server: two API routes proxied to the flight-data provider plus
// the static frontend files.

use std::{path::Path, sync::Arc};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::{net::TcpListener, signal};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::provider::{AmadeusProvider, FlightDataProvider, FlightOffersQuery};
use crate::relay_client::{AUTOCOMPLETE_PATH, SEARCH_PATH};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn FlightDataProvider>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AutocompleteQuery {
    pub keyword: String,
}

pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route(AUTOCOMPLETE_PATH, get(autocomplete_handler))
        .route(SEARCH_PATH, get(search_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Any provider failure is answered with an empty list
pub async fn autocomplete_handler(
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> Json<Vec<Value>> {
    match state.provider.locations(&query.keyword).await {
        Ok(locations) => Json(locations),
        Err(e) => {
            error!("Location lookup for {:?} failed: {}", query.keyword, e);
            Json(Vec::new())
        }
    }
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<FlightOffersQuery>,
) -> Json<Vec<Value>> {
    info!("Flight search: {:?}", query);
    match state.provider.flight_offers(&query).await {
        Ok(offers) => {
            info!("Provider returned {} offers", offers.len());
            Json(offers)
        }
        Err(e) => {
            error!("Flight search failed: {}", e);
            Json(Vec::new())
        }
    }
}

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let provider = AmadeusProvider::new(&config)?;
    let state = AppState {
        provider: Arc::new(provider),
    };
    let app = app(state, &config.static_dir);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Flight search relay listening at http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {e}");
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
