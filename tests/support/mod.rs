//! Stub Remote Data Service shared by the integration tests
//!
//! Serves canned JSON for every endpoint under `/api`, records each request
//! (method, path, raw query, JSON body) and lets a test override the response
//! of a single path.

#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct StubServer {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    overrides: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
}

impl StubServer {
    /// Bind to an ephemeral port and return the API base URL
    pub async fn start() -> (StubServer, String) {
        let stub = StubServer::default();
        let app = Router::new().fallback(handle).with_state(stub.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (stub, format!("http://{}/api", addr))
    }

    /// Answer `path` (including `/api`) with a fixed status and raw body
    pub fn respond_with(&self, path: &str, status: StatusCode, body: &str) {
        self.overrides
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received for `path`, oldest first
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn last_query(&self, path: &str) -> Option<String> {
        self.requests_to(path).pop().and_then(|r| r.query)
    }

    /// Whether any request to `path` carried exactly this query
    ///
    /// Requests issued back to back race on the wire, so tests that fire
    /// several of them check membership rather than order.
    pub fn saw_query(&self, path: &str, query: &str) -> bool {
        self.requests_to(path)
            .iter()
            .any(|r| r.query.as_deref() == Some(query))
    }

    pub fn bodies(&self, path: &str) -> Vec<Value> {
        self.requests_to(path)
            .into_iter()
            .filter_map(|r| r.body)
            .collect()
    }
}

async fn handle(State(stub): State<StubServer>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().to_string();

    stub.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    });

    let overridden = stub.overrides.lock().unwrap().get(&path).cloned();
    if let Some((status, body)) = overridden {
        return (status, [(header::CONTENT_TYPE, "application/json")], body).into_response();
    }

    match canned(&path) {
        Some(value) => axum::Json(value).into_response(),
        None => (StatusCode::NOT_FOUND, axum::Json(json!({"detail": "Not Found"}))).into_response(),
    }
}

pub fn vehicle_catalog() -> Value {
    json!([
        {
            "id": "1", "brand": "Tesla", "model": "Model 3", "variant": "Long Range",
            "category": "Limousine", "year": 2024, "price_chf": 52990,
            "range_wltp_km": 629, "battery_kwh": 82, "acceleration_0_100": 4.4,
            "charging_dc_kw": 250, "charging_ac_kw": 11, "consumption_kwh_100km": 14.9,
            "top_speed_kmh": 233, "cargo_liters": 594, "seats": 5, "drivetrain": "AWD"
        },
        {
            "id": "4", "brand": "BYD", "model": "Seal", "category": "Limousine",
            "price_chf": 44990, "range_wltp_km": 570, "battery_kwh": 82.5, "seats": 5
        },
        {
            "id": "7", "brand": "Dacia", "model": "Spring", "category": "Kleinwagen",
            "price_chf": 16990, "range_wltp_km": 220
        }
    ])
}

fn canned(path: &str) -> Option<Value> {
    let value = match path {
        "/api/health" => json!({"status": "healthy", "timestamp": "2025-01-15T08:30:00Z"}),
        "/api/vehicles" => vehicle_catalog(),
        "/api/vehicles/brands/list" => json!({"brands": ["BYD", "Dacia", "Tesla"]}),
        "/api/vehicles/categories/list" => json!({"categories": ["Kleinwagen", "Limousine"]}),
        "/api/vehicles/stats/price-per-km" => json!({
            "rankings": [
                {"vehicle": "Dacia Spring", "price_chf": 16990, "range_km": 220, "price_per_km": 77.23},
                {"vehicle": "BYD Seal", "price_chf": 44990, "range_km": 570, "price_per_km": 78.93}
            ]
        }),
        "/api/market/stats" => json!({
            "current_month": "Dezember", "year": 2024, "bev_market_share": 22.3,
            "bev_registrations_monthly": 5200, "charging_points_ch": 18500,
            "fast_chargers_ch": 1450,
            "top_brands": [{"brand": "Tesla", "sales": 12500, "share": 18.2}],
            "top_models": [{"model": "Tesla Model Y", "sales": 7800, "share": 11.4}]
        }),
        "/api/market/data" => json!({
            "monthly_data": [{
                "month": "Januar", "year": 2024, "bev_registrations": 3900,
                "phev_registrations": 1500, "total_registrations": 19000,
                "bev_market_share": 20.5
            }],
            "summary": {
                "total_bev_registrations": 3900, "total_phev_registrations": 1500,
                "total_registrations": 19000, "average_bev_market_share": 20.5, "year": 2024
            }
        }),
        "/api/charging/networks" => json!({
            "networks": [
                {"name": "Ionity", "dc_fast_kwh": 0.79},
                {"name": "Swisscharge", "ac_kwh": 0.45, "dc_50_kwh": 0.65},
                {"name": "Lokal"}
            ],
            "last_updated": "2025-01"
        }),
        "/api/charging/stations" => json!({
            "stations": [{
                "id": "3", "name": "Tesla Supercharger Dietikon", "city": "Dietikon",
                "latitude": 47.4003, "longitude": 8.4009, "max_power_kw": 250,
                "connection_types": ["Tesla"], "is_fast_charger": true
            }],
            "total": 1,
            "source": "cache",
            "search_params": {"lat": 47.3769, "lng": 8.5417, "radius_km": 25}
        }),
        "/api/calculator/range" => json!({
            "wltp_range_km": 400, "calculated_range_km": 340, "efficiency_percent": 85,
            "tips": ["Vorklimatisierung am Ladekabel nutzen"]
        }),
        "/api/calculator/cost" => json!({
            "ev_yearly_fuel_cost": 637.5, "ice_yearly_fuel_cost": 1942.5,
            "ev_yearly_maintenance": 450, "ice_yearly_maintenance": 900,
            "ev_yearly_tax": 0, "ice_yearly_tax": 500,
            "ev_yearly_insurance": 1200, "ice_yearly_insurance": 1100,
            "ev_total_yearly": 2287.5, "ice_total_yearly": 4442.5,
            "yearly_savings": 2155, "five_year_savings": 10775, "break_even_km": 0
        }),
        "/api/calculator/cantons" => json!({
            "cantons": [
                {"code": "ZH", "name": "Zürich", "ev_tax": 0, "ice_tax": 500, "incentive": 0},
                {"code": "BE", "name": "Bern", "ev_tax": 120, "ice_tax": 450}
            ]
        }),
        "/api/knowledge/articles" => json!({
            "articles": [{
                "id": "a1", "category": "laden", "title": "Laden zu Hause",
                "slug": "laden-zu-hause", "summary": "Wallbox oder Steckdose?", "order": 1
            }]
        }),
        "/api/knowledge/articles/laden-zu-hause" => json!({
            "id": "a1", "category": "laden", "title": "Laden zu Hause",
            "slug": "laden-zu-hause", "content": "Eine Wallbox lädt mit 11 kW."
        }),
        "/api/knowledge/glossary" => json!({
            "terms": [
                {"term": "WLTP", "definition": "Standardisierter Prüfzyklus", "category": "technik"},
                {"term": "BEV", "definition": "Battery Electric Vehicle"},
                {"term": "Bidirektionales Laden", "definition": "Strom zurück ins Netz"}
            ],
            "total": 3
        }),
        "/api/knowledge/myths" => json!({
            "myths": [{"id": "m1", "myth": "E-Autos brennen öfter", "fact": "Nein."}],
            "total": 1
        }),
        "/api/knowledge/categories" => json!({
            "categories": [{"id": "laden", "name": "Laden"}]
        }),
        "/api/news" => json!({
            "articles": [{
                "id": "n1", "title": "Neue Schnellladestationen",
                "url": "https://example.ch/n1", "source": "electrive",
                "language": "de", "region": "swiss", "categories": ["charging"]
            }],
            "total": 1,
            "cache_age_minutes": 3.5,
            "sources_count": 12
        }),
        "/api/news/sources" => json!({
            "sources": [{"name": "electrive", "url": "https://electrive.net", "language": "de"}],
            "total": 1,
            "regions": ["swiss"],
            "languages": ["de"]
        }),
        "/api/news/categories" => json!({
            "categories": [{"id": "charging", "name": "Laden"}]
        }),
        _ => return None,
    };
    Some(value)
}
