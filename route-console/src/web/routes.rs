//! HTTP route handlers.

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use futures::future::join;
use tower_http::services::ServeDir;
use tracing::{debug, error, warn};

use crate::catalog::CatalogError;
use crate::domain::Weekday;
use crate::route::{RoutePayload, RouteSubmission, ValidationErrors};
use crate::store::{RouteId, RouteStore, StoreError, StoredRoute};
use crate::submit::{SubmitError, submit_route};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/routes/new", get(new_route))
        .route("/routes/validate", post(validate_route))
        .route("/routes", get(list_routes).post(create_route))
        .route("/routes/:id", get(show_route).delete(delete_route))
        .route("/api/locations/search", get(search_locations))
        .route("/api/buses", get(list_buses))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Console page with an empty add-route form.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let route_number = state.route_numbers.next_number();
    let (location_count, buses) = join(state.locations.len(), state.buses.buses(None)).await;

    let buses = match buses {
        Ok(buses) => buses
            .iter()
            .map(|b| BusOption {
                id: b.id.clone(),
                label: format!("{} ({})", b.plate_number, b.operator_id),
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, "bus list unavailable for new route form");
            Vec::new()
        }
    };

    let template = IndexTemplate {
        route_number: route_number.to_string(),
        location_count,
        buses,
        days: Weekday::ALL.iter().map(|d| d.tag()).collect(),
    };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok(Html(html))
}

/// Hand out a route number for a fresh form.
async fn new_route(State(state): State<AppState>) -> Json<NewRouteResponse> {
    Json(NewRouteResponse {
        route_number: state.route_numbers.next_number(),
    })
}

/// Run the validator without storing anything.
async fn validate_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let submission = parse_submission(&body)?;
    let route = state.validator.validate(&submission)?;
    Ok(Json(ValidRouteResponse { route }).into_response())
}

/// Validate and store a route.
async fn create_route(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let submission = parse_submission(&body)?;
    let created = submit_route(state.store.as_ref(), &state.validator, submission).await?;

    let body = Json(CreatedRouteResponse {
        id: created.id,
        route_number: created.route_number,
    });
    Ok((StatusCode::CREATED, body).into_response())
}

/// List stored routes, oldest first.
async fn list_routes(State(state): State<AppState>) -> Json<RouteListResponse> {
    let routes = state
        .store
        .list()
        .await
        .into_iter()
        .map(|stored| RouteListItem {
            id: stored.id,
            route_number: stored.payload.route_number.clone(),
            stops: stored.payload.stop_count(),
            created_at: stored.created_at.to_rfc3339(),
        })
        .collect();

    Json(RouteListResponse { routes })
}

/// Show a stored route as JSON, or as a summary fragment for HTML clients.
async fn show_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let id = RouteId(id);
    let html = accepts_html(&headers);

    let Some(stored) = state.store.get(id).await else {
        if html {
            return Ok(not_found_page(id));
        }
        return Err(AppError::NotFound {
            message: format!("route {id} not found"),
        });
    };

    if html {
        let names = resolve_names(&state, &stored.payload).await;
        let template = RouteSummaryTemplate {
            route: RouteSummaryView::new(
                stored.id.to_string(),
                format_created_at(&stored),
                &stored.payload,
                &names,
            ),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;
        Ok(Html(html).into_response())
    } else {
        Ok(Json(StoredRouteResponse {
            id: stored.id,
            created_at: stored.created_at.to_rfc3339(),
            route: stored.payload,
        })
        .into_response())
    }
}

/// Delete a stored route.
async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .delete_route(RouteId(id))
        .await
        .map_err(|e| store_failure(e, "failed to delete route"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search locations by name, city or id.
async fn search_locations(
    State(state): State<AppState>,
    Query(req): Query<LocationSearchRequest>,
) -> Json<LocationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let matches = state.locations.search(&req.q, limit).await;

    let locations = matches
        .into_iter()
        .map(|m| LocationSearchResult {
            id: m.location.to_string(),
            name: m.name,
            city: m.city,
        })
        .collect();

    Json(LocationSearchResponse { locations })
}

/// List assignable buses.
async fn list_buses(
    State(state): State<AppState>,
    Query(req): Query<BusListRequest>,
) -> Result<Json<BusListResponse>, AppError> {
    let operator = req.operator.as_deref().filter(|op| !op.trim().is_empty());
    let buses = state.buses.buses(operator).await?;

    let buses = buses
        .iter()
        .map(|b| BusResult {
            id: b.id.clone(),
            plate_number: b.plate_number.clone(),
            operator: b.operator_id.clone(),
            seats: b.seat_count,
        })
        .collect();

    Ok(Json(BusListResponse { buses }))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Parse a submission body, logging the body on failure.
fn parse_submission(body: &[u8]) -> Result<RouteSubmission, AppError> {
    let req: RouteSubmissionRequest = serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, body = %String::from_utf8_lossy(body), "unparseable route body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    req.into_submission().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

/// Display names for every waypoint of a stored route, plus the bus plate.
async fn resolve_names(state: &AppState, payload: &RoutePayload) -> ResolvedNames {
    let mut locations = Vec::with_capacity(payload.stops.len() + 2);
    locations.push(state.locations.display_name(&payload.departure.location).await);
    for stop in &payload.stops {
        locations.push(state.locations.display_name(&stop.location).await);
    }
    locations.push(state.locations.display_name(&payload.arrival.location).await);

    let bus = match state.buses.find(&payload.bus).await {
        Ok(Some(bus)) => bus.plate_number,
        Ok(None) => payload.bus.to_string(),
        Err(e) => {
            debug!(error = %e, bus = %payload.bus, "bus lookup failed, showing raw id");
            payload.bus.to_string()
        }
    };

    ResolvedNames { bus, locations }
}

fn format_created_at(stored: &StoredRoute) -> String {
    stored.created_at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn not_found_page(id: RouteId) -> Response {
    let template = ErrorTemplate {
        title: "Route not found".to_string(),
        message: format!("There is no route with id {id}."),
        details: None,
    };
    match template.render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => AppError::Internal {
            message: format!("Template error: {}", e),
        }
        .into_response(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unprocessable(ValidationErrors),
    Internal { message: String },
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Unprocessable(errors)
    }
}

/// Map a store failure. Backend details are logged, not returned.
fn store_failure(e: StoreError, action: &'static str) -> AppError {
    match e {
        StoreError::NotFound(id) => AppError::NotFound {
            message: format!("route {id} not found"),
        },
        other => {
            error!(error = %other, action, "route store failure");
            AppError::Internal {
                message: action.to_string(),
            }
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Invalid(errors) => AppError::Unprocessable(errors),
            SubmitError::Store(e) => store_failure(e, "failed to save route"),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::Internal {
            message: format!("catalog unavailable: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unprocessable(errors) => {
                let body = ValidationErrorResponse {
                    errors: errors.messages(),
                    missing_fares: errors.missing_fares().iter().map(|k| k.to_string()).collect(),
                };
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
