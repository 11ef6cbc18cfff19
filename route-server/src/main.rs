use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use route_server::ekispert::{EkispertClient, EkispertConfig};
use route_server::resolver::RouteResolver;
use route_server::stations::StationAliases;
use route_server::store::{CacheConfig, MemoryRouteStore};
use route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("route_server=info")),
        )
        .init();

    // Get credentials from environment
    let api_key = std::env::var("EKISPERT_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("EKISPERT_API_KEY not set. Upstream calls will fail.");
        String::new()
    });

    // Create the upstream client
    let client_config = EkispertConfig::new(&api_key);
    let client = EkispertClient::new(client_config).expect("Failed to create Ekispert client");

    // Create the cache store
    let store = MemoryRouteStore::new(&CacheConfig::default());

    // Wire the resolver with the default station alias table
    let resolver = RouteResolver::new(client, store, StationAliases::default());

    // Build app state and router
    let state = AppState::new(resolver);
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = std::env::var("ROUTE_SERVER_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
    tracing::info!("Route server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
