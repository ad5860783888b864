use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::app::CityVibe;
use crate::error::ErrorKind;
use crate::feed::Suggestions;
use crate::models::PlaceCandidate;
use crate::orchestrator::VibeReport;
use crate::playback::PlaybackId;
use crate::ui::UiState;
use crate::{VERSION, VibeError};

pub type AppState = Arc<CityVibe>;

/// `VibeError` rendered as a JSON error body
pub struct ApiError(VibeError);

impl From<VibeError> for ApiError {
    fn from(err: VibeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::EmptyResultSet => StatusCode::NOT_FOUND,
            ErrorKind::AmbiguousMatch => StatusCode::CONFLICT,
            ErrorKind::NetworkFailure | ErrorKind::MalformedResponse => StatusCode::BAD_GATEWAY,
            ErrorKind::ImageDecode => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": self.0.kind(),
            "message": self.0.user_message(),
        }));
        (status, body).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct PlaceQuery {
    pub name: String,
    pub country: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SelectResponse {
    pub generation: u64,
}

#[derive(Serialize, Deserialize)]
pub struct PlayRequest {
    pub preview_url: String,
}

#[derive(Serialize, Deserialize)]
pub struct PlayResponse {
    pub playback_id: PlaybackId,
    pub active: usize,
}

pub fn router(app: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/autocomplete", get(autocomplete))
        .route("/select", post(select))
        .route("/place", get(place))
        .route("/state", get(state))
        .route("/play", post(play))
        .with_state(app)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": VERSION,
    }))
}

async fn autocomplete(
    State(app): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> ApiResult<Json<Suggestions>> {
    Ok(Json(app.feed.suggest(&query.q).await?))
}

/// Start the fan-out and return at once; panels land in the UI store
async fn select(
    State(app): State<AppState>,
    Json(place): Json<PlaceCandidate>,
) -> ApiResult<(StatusCode, Json<SelectResponse>)> {
    let place = validated(place)?;
    let fanout = app.aggregator.on_place_selected(&place);
    Ok((
        StatusCode::ACCEPTED,
        Json(SelectResponse {
            generation: fanout.generation,
        }),
    ))
}

/// Look up a place and wait for every panel. The page state is left alone.
async fn place(
    State(app): State<AppState>,
    Query(query): Query<PlaceQuery>,
) -> ApiResult<Json<VibeReport>> {
    let country = query.country.unwrap_or_else(|| query.name.clone());
    let display_name = if country == query.name {
        query.name.clone()
    } else {
        format!("{}, {}", query.name, country)
    };
    let place = validated(PlaceCandidate::new(display_name, query.name, country))?;

    let report = app.aggregator.lookup(&place).join().await;
    info!(
        "Place '{}' joined with {} failed panels",
        place.display_name,
        report.panels.iter().filter(|panel| panel.error.is_some()).count()
    );
    Ok(Json(report))
}

async fn state(State(app): State<AppState>) -> Json<UiState> {
    Json(app.ui.snapshot())
}

async fn play(
    State(app): State<AppState>,
    Json(request): Json<PlayRequest>,
) -> ApiResult<Json<PlayResponse>> {
    let url = request.preview_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(VibeError::validation("preview_url must be an http(s) URL").into());
    }
    let music = app.aggregator.music();
    let playback_id = music.play(url);
    Ok(Json(PlayResponse {
        playback_id,
        active: music.deck().active(),
    }))
}

fn validated(place: PlaceCandidate) -> Result<PlaceCandidate, VibeError> {
    if place.primary_token.trim().is_empty() || place.context_token.trim().is_empty() {
        return Err(VibeError::validation("place needs a name and a region"));
    }
    Ok(place)
}
