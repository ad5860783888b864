//! In-process fake of every external provider

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use cityvibe::config::{Credential, VibeConfig};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};
use tempfile::TempDir;

pub const SCENIC_CORNER: [u8; 3] = [200, 100, 50];

#[derive(Clone)]
pub struct FakeProviders {
    pub base: String,
    calls: Arc<Mutex<Vec<(&'static str, String)>>>,
}

type Params = Query<HashMap<String, String>>;

impl FakeProviders {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let fake = Self {
            base: format!("http://{addr}"),
            calls: Arc::new(Mutex::new(Vec::new())),
        };

        let router = Router::new()
            .route("/geocoding/v5/mapbox.places/{file}", get(geocoding))
            .route("/data/2.5/weather", get(weather))
            .route("/api/json/v1/1/filter.php", get(meals))
            .route("/search", get(tracks))
            .route("/v3.1/name/{name}", get(countries))
            .route("/search/photos", get(photos))
            .route("/images/scenic.png", get(scenic_png))
            .route("/audio/{file}", get(audio))
            .with_state(fake.clone());

        tokio::spawn(async move { axum::serve(listener, router).await });
        fake
    }

    /// Config pointing every provider at this fake, with all credentials set
    pub fn config(&self, spool: &TempDir) -> VibeConfig {
        let mut config = VibeConfig::default();
        config.http.max_retries = 0;
        config.http.timeout_seconds = 5;
        config.providers.geocoding_url = self.base.clone();
        config.providers.weather_url = self.base.clone();
        config.providers.meals_url = self.base.clone();
        config.providers.music_url = self.base.clone();
        config.providers.countries_url = self.base.clone();
        config.providers.scenery_url = self.base.clone();
        config.credentials.mapbox_token = Some(Credential::new("pk.test"));
        config.credentials.openweather_key = Some(Credential::new("ow-test"));
        config.credentials.rapidapi_key = Some(Credential::new("rapid-test"));
        config.credentials.unsplash_key = Some(Credential::new("unsplash-test"));
        config.music.spool_dir = spool.path().to_string_lossy().into_owned();
        config.server.static_dir = spool.path().join("missing").to_string_lossy().into_owned();
        config
    }

    /// Recorded (provider, query) pairs, sorted
    pub fn calls(&self) -> Vec<(&'static str, String)> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }

    fn record(&self, provider: &'static str, query: &str) {
        self.calls.lock().unwrap().push((provider, query.to_string()));
    }
}

fn param(params: &Params, name: &str) -> String {
    params.get(name).cloned().unwrap_or_default()
}

async fn geocoding(State(fake): State<FakeProviders>, Path(file): Path<String>) -> Json<Value> {
    let query = file.trim_end_matches(".json").to_string();
    fake.record("geocoding", &query);
    if query == "Atlantis" {
        return Json(json!({ "type": "FeatureCollection", "features": [] }));
    }
    Json(json!({
        "type": "FeatureCollection",
        "features": [
            {
                "place_name": "Paris, Île-de-France, France",
                "text": "Paris",
                "context": [
                    { "id": "region.1", "text": "Île-de-France" },
                    { "id": "country.2", "text": "France" }
                ]
            },
            {
                "place_name": "Paris, Texas, United States",
                "text": "Paris",
                "context": [
                    { "id": "region.3", "text": "Texas" },
                    { "id": "country.4", "text": "United States" }
                ]
            }
        ]
    }))
}

async fn weather(State(fake): State<FakeProviders>, params: Params) -> Response {
    let city = param(&params, "q");
    fake.record("weather", &city);
    if city == "Atlantis" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "cod": "404", "message": "city not found" })),
        )
            .into_response();
    }
    Json(json!({
        "name": city,
        "main": { "temp": 18.4, "humidity": 60 },
        "weather": [ { "main": "Clear", "description": "clear sky" } ]
    }))
    .into_response()
}

async fn meals(State(fake): State<FakeProviders>, params: Params) -> Json<Value> {
    let area = param(&params, "a");
    fake.record("meals", &area);
    if area == "France" {
        return Json(json!({ "meals": [
            { "strMeal": "Ratatouille", "strMealThumb": "https://img/ratatouille.jpg", "idMeal": "1" },
            { "strMeal": "Bouillabaisse", "strMealThumb": "https://img/bouillabaisse.jpg", "idMeal": "2" }
        ]}));
    }
    Json(json!({ "meals": null }))
}

async fn tracks(State(fake): State<FakeProviders>, headers: HeaderMap, params: Params) -> Response {
    let query = param(&params, "q");
    fake.record("tracks", &query);
    let key = headers.get("X-RapidAPI-Key").and_then(|v| v.to_str().ok());
    if key != Some("rapid-test") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if !query.starts_with("France") {
        return Json(json!({ "data": [], "total": 0 })).into_response();
    }
    Json(json!({ "data": [
        {
            "title": "La Vie en rose",
            "artist": { "name": "Édith Piaf" },
            "preview": format!("{}/audio/1.mp3", fake.base)
        }
    ], "total": 1 }))
    .into_response()
}

async fn countries(State(fake): State<FakeProviders>, Path(name): Path<String>) -> Response {
    fake.record("countries", &name);
    if name != "France" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": 404, "message": "Not Found" })),
        )
            .into_response();
    }
    Json(json!([
        {
            "name": { "common": "France", "official": "French Republic" },
            "capital": ["Paris"],
            "population": 67391582
        }
    ]))
    .into_response()
}

async fn photos(State(fake): State<FakeProviders>, params: Params) -> Json<Value> {
    let query = param(&params, "query");
    fake.record("photos", &query);
    let photo = match query.as_str() {
        "Paris scenic" => json!({
            "urls": { "regular": format!("{}/images/scenic.png", fake.base) },
            "alt_description": "river through the city",
            "color": "#c86432"
        }),
        "France traditional dress costume" => json!({
            "urls": { "regular": "https://img/dress.jpg" },
            "alt_description": "folk costume",
            "color": null
        }),
        _ => return Json(json!({ "total": 0, "results": [] })),
    };
    Json(json!({ "total": 1, "results": [photo] }))
}

async fn scenic_png() -> impl IntoResponse {
    let mut image = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
    image.put_pixel(0, 0, Rgb(SCENIC_CORNER));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    ([(header::CONTENT_TYPE, "image/png")], bytes)
}

async fn audio(State(fake): State<FakeProviders>, Path(file): Path<String>) -> impl IntoResponse {
    fake.record("audio", &file);
    ([(header::CONTENT_TYPE, "audio/mpeg")], b"ID3 fake preview".to_vec())
}
