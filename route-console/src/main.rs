use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_console::cache::{BusDirectory, BusSource, CacheConfig};
use route_console::catalog::{CatalogClient, LocationNames, LocationSnapshot, SnapshotConfig};
use route_console::config::ServerConfig;
use route_console::route::{RouteValidator, ValidatorConfig};
use route_console::store::{InMemoryRouteStore, RouteNumberGenerator};
use route_console::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match config.catalog.clone().map(CatalogClient::new).transpose() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create catalog client");
            return ExitCode::FAILURE;
        }
    };
    if client.is_none() {
        warn!("CATALOG_BASE_URL or CATALOG_API_KEY not set, starting with an empty catalog");
    }

    let snapshot = LocationSnapshot::new(SnapshotConfig::new(&config.location_cache_path));
    let locations = load_locations(client.clone(), &snapshot).await;
    info!(count = locations.len().await, "location catalog ready");

    // Refresh location names in the background
    if client.is_some() {
        let refresh = locations.clone();
        let snapshot = snapshot.clone();
        let period = config.location_refresh;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                match refresh.refresh().await {
                    Ok(count) => {
                        info!(count, "refreshed location names");
                        if let Err(e) = snapshot.save(&refresh.snapshot().await) {
                            warn!(error = %e, "failed to write location snapshot");
                        }
                    }
                    Err(e) => warn!(error = %e, "failed to refresh location names"),
                }
            }
        });
    }

    let bus_source = match client {
        Some(client) => BusSource::Remote(client),
        None => BusSource::Fixed(Vec::new()),
    };
    let buses = BusDirectory::new(bus_source, &CacheConfig::default());

    let validator = RouteValidator::new(ValidatorConfig {
        strict_time_format: config.strict_time_format,
    });

    let state = AppState::new(
        InMemoryRouteStore::new(),
        validator,
        RouteNumberGenerator::default(),
        locations,
        buses,
    );

    let static_dir = config.static_dir.to_string_lossy();
    let app = create_router(state, &static_dir);

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(addr = %config.addr, "route console listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Fresh snapshot, else the catalog API, else a stale snapshot, else empty.
async fn load_locations(
    client: Option<CatalogClient>,
    snapshot: &LocationSnapshot,
) -> LocationNames {
    let cached = snapshot.load();

    if let Some(cached) = &cached
        && cached.fresh
    {
        info!(path = %snapshot.path().display(), "using location snapshot");
        return LocationNames::with_entries(cached.locations.clone(), client);
    }

    if let Some(client) = client.clone() {
        match LocationNames::fetch(client).await {
            Ok(names) => {
                if let Err(e) = snapshot.save(&names.snapshot().await) {
                    warn!(error = %e, "failed to write location snapshot");
                }
                return names;
            }
            Err(e) => warn!(error = %e, "failed to fetch locations from catalog"),
        }
    }

    match cached {
        Some(stale) => {
            warn!(saved_at = %stale.saved_at, "using stale location snapshot");
            LocationNames::with_entries(stale.locations, client)
        }
        None => LocationNames::with_entries(Vec::new(), client),
    }
}
