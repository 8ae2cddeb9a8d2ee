//! HTTP route handlers.

use askama_axum::{IntoResponse, Response};
use axum::{
    Json, Router,
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    routing::get,
};
use chrono::Local;
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::api::{ApiError, BusApi, SchedulePage};
use crate::pagination::PAGE_SIZE_OPTIONS;
use crate::query::{JourneySearch, QueryError, ScheduleQuery, SearchParams, SearchStatus, parse_date};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Default and maximum results for stop autocomplete.
const STOP_SEARCH_DEFAULT_LIMIT: usize = 10;
const STOP_SEARCH_MAX_LIMIT: usize = 50;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/journeys", get(journeys_page))
        .route("/journey/:id", get(journey_page))
        .route("/api/stops/search", get(search_stops))
        .route("/api/schedules", get(search_schedules))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Home page with search form.
async fn index_page(State(state): State<AppState>) -> IndexTemplate {
    let stops = state.stops.all().await;
    let today = Local::now().date_naive();

    IndexTemplate {
        form: SearchFormView::from_state(&ListingState::default(), today),
        stop_names: stop_names(&stops),
    }
}

/// Journey listing.
///
/// The query string carries the whole listing state; see
/// [`JourneysPageRequest`]. Filter lookups and the listing are fetched
/// concurrently. A failed listing renders the error in the page rather than
/// failing the request.
async fn journeys_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Result<Response, AppError> {
    let html = accepts_html(&headers);
    let request = JourneysPageRequest::from_query(raw.as_deref()).map_err(|e| {
        AppError::BadRequest {
            message: format!("Invalid query string: {e}"),
        }
    });
    let listing = match request.and_then(|r| r.into_state().map_err(AppError::from)) {
        Ok(listing) => listing,
        Err(e) if html => return Ok(e.into_page()),
        Err(e) => return Err(e),
    };

    let search_params = SearchParams {
        source: state.stops.resolve(&listing.from).await.param(),
        destination: state.stops.resolve(&listing.to).await.param(),
        date: listing.date,
    };

    let mut search = match JourneySearch::restore(
        search_params,
        listing.selection.reduce(),
        listing.sort,
        listing.page,
        listing.per_page,
    ) {
        Ok(search) => search,
        Err(e) if html => return Ok(AppError::from(e).into_page()),
        Err(e) => return Err(e.into()),
    };

    let api = state.api.as_ref();
    let pending = search.refresh();
    let (_, operators, bus_types) = tokio::join!(
        search.run(pending, api),
        api.operator_types(),
        api.bus_types()
    );

    let pagination = search.pagination();
    let error = match search.status() {
        SearchStatus::Error(message) => Some(message.clone()),
        _ => None,
    };

    if !html {
        return Ok(Json(JourneyListResponse {
            journeys: search.journeys().to_vec(),
            total: pagination.total_items,
            page: pagination.current_page,
            per_page: pagination.items_per_page,
            total_pages: pagination.total_pages(),
            sort_by: search.sort().field.as_str(),
            sort_order: search.sort().order.as_str(),
            error,
        })
        .into_response());
    }

    // Links follow the page size the backend actually used, when it is one we offer.
    let listing = if PAGE_SIZE_OPTIONS.contains(&pagination.items_per_page) {
        ListingState {
            per_page: pagination.items_per_page,
            ..listing
        }
    } else {
        listing
    };

    let operators = lookup_or_empty("operator types", operators);
    let bus_types = lookup_or_empty("bus types", bus_types);
    let stops = state.stops.all().await;

    let template = JourneysTemplate {
        form: SearchFormView::from_state(&listing, Local::now().date_naive()),
        stop_names: stop_names(&stops),
        filters: FilterPanelView::new(&listing, &operators, &bus_types),
        sort_options: sort_links(&listing),
        journeys: search
            .journeys()
            .iter()
            .map(JourneyCardView::from_journey)
            .collect(),
        error,
        pagination: PaginationView::new(&pagination, &listing),
    };

    Ok(template.into_response())
}

/// Filter lookups are optional; a failure leaves that filter group empty.
fn lookup_or_empty(what: &str, result: Result<Vec<String>, ApiError>) -> Vec<String> {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "failed to fetch {what}");
        Vec::new()
    })
}

/// Journey detail page.
async fn journey_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let html = accepts_html(&headers);

    let journey = match state.api.journey(&id).await {
        Ok(journey) => journey,
        Err(e) => {
            let err = if e.is_not_found() {
                AppError::NotFound {
                    message: format!("Journey {id} not found"),
                }
            } else {
                AppError::from(e)
            };
            return if html { Ok(err.into_page()) } else { Err(err) };
        }
    };

    if !html {
        return Ok(Json(journey).into_response());
    }

    let template = JourneyTemplate {
        journey: JourneyDetailView::from_journey(&journey),
    };
    Ok(template.into_response())
}

/// Search stops by name or city.
async fn search_stops(
    State(state): State<AppState>,
    Query(req): Query<StopSearchRequest>,
) -> Json<StopSearchResponse> {
    let limit = req
        .limit
        .unwrap_or(STOP_SEARCH_DEFAULT_LIMIT)
        .min(STOP_SEARCH_MAX_LIMIT);
    let matches = state.stops.search(&req.q, limit).await;

    Json(StopSearchResponse {
        stops: matches.into_iter().map(StopSearchResult::from).collect(),
    })
}

/// Schedule listing from the older backend endpoint.
async fn search_schedules(
    State(state): State<AppState>,
    Query(req): Query<ScheduleRequest>,
) -> Result<Json<SchedulePage>, AppError> {
    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let date = non_blank(req.date).map(|d| parse_date(&d)).transpose()?;
    let mut query = ScheduleQuery::new(SearchParams {
        source: non_blank(req.from),
        destination: non_blank(req.to),
        date,
    });
    query.operator = non_blank(req.operator);
    query.bus_type = non_blank(req.bus_type);
    query.route_name = non_blank(req.route_name);
    if let Some(limit) = req.limit {
        query.limit = limit;
    }
    if let Some(offset) = req.offset {
        query.offset = offset;
    }

    let page = state.api.search_schedules(&query).await?;
    Ok(Json(page))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn parts(&self) -> (StatusCode, &str) {
        match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.as_str()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.as_str()),
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.as_str())
            }
        }
    }

    /// Render as an HTML error page.
    pub fn into_page(self) -> Response {
        let (status, message) = self.parts();
        log_error(status, message);

        let title = match status {
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::BAD_REQUEST => "Invalid Request",
            _ => "Something Went Wrong",
        };
        let template = ErrorTemplate {
            title: title.to_string(),
            message: message.to_string(),
        };

        (status, template).into_response()
    }
}

fn log_error(status: StatusCode, message: &str) {
    if status.is_server_error() {
        error!(%status, "{message}");
    } else {
        warn!(%status, "{message}");
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        if e.is_not_found() {
            return AppError::NotFound {
                message: e.to_string(),
            };
        }
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        log_error(status, message);

        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}
