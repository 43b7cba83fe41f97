//! Query parameters for the synchronised forms
//!
//! Each user-editable form on a page is a plain struct that knows how to turn
//! itself into the query string (or JSON body) the Remote Data Service expects.
//! Nothing here validates ranges: whatever the user typed is sent, and the
//! service decides what it means.
//!
//! # Example
//! ```rust,ignore
//! let criteria = FilterCriteria {
//!     brand: Some(" Tesla ".to_string()),
//!     min_range: Some(400),
//!     ..Default::default()
//! };
//!
//! // GET /vehicles?brand=Tesla&min_range=400&sort_by=price_chf&sort_order=asc
//! let pairs = criteria.to_query_pairs();
//! ```

use crate::core::vehicle::{SortField, SortOrder};
use serde::{Deserialize, Serialize};

/// Ordered `(name, value)` pairs for a query string
pub type QueryPairs = Vec<(&'static str, String)>;

/// Filters and ordering for the vehicle list
///
/// Optional fields that are `None`, or strings that are empty after trimming,
/// are left out of the query entirely. `min_price` may exceed `max_price`; the
/// service then simply returns an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub brand: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_range: Option<i64>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl FilterCriteria {
    /// Build the `/vehicles` query
    pub fn to_query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();

        push_text(&mut pairs, "brand", self.brand.as_deref());
        push_text(&mut pairs, "category", self.category.as_deref());
        push_number(&mut pairs, "min_price", self.min_price);
        push_number(&mut pairs, "max_price", self.max_price);
        push_number(&mut pairs, "min_range", self.min_range);

        pairs.push(("sort_by", self.sort_by.as_str().to_string()));
        pairs.push(("sort_order", self.sort_order.as_str().to_string()));
        pairs
    }

    /// True when no optional filter would reach the query
    pub fn is_unfiltered(&self) -> bool {
        self.to_query_pairs().len() == 2
    }

    /// Drop every optional filter, keeping the ordering
    pub fn cleared(&self) -> Self {
        Self {
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            ..Default::default()
        }
    }
}

fn push_text(pairs: &mut QueryPairs, name: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        pairs.push((name, value.to_string()));
    }
}

fn push_number<N: ToString>(pairs: &mut QueryPairs, name: &'static str, value: Option<N>) {
    if let Some(value) = value {
        pairs.push((name, value.to_string()));
    }
}

/// Charging station search around a point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: u32,
    pub limit: u32,
}

impl Default for StationQuery {
    /// Zürich city centre
    fn default() -> Self {
        Self {
            lat: 47.3769,
            lng: 8.5417,
            radius_km: 25,
            limit: 50,
        }
    }
}

impl StationQuery {
    pub fn to_query_pairs(&self) -> QueryPairs {
        vec![
            ("lat", self.lat.to_string()),
            ("lng", self.lng.to_string()),
            ("radius", self.radius_km.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Inputs of the range estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeParams {
    pub wltp_range_km: i64,
    pub temperature_c: i64,
    pub speed_kmh: i64,
    pub climate_on: bool,
    pub highway_percent: i64,
}

impl Default for RangeParams {
    fn default() -> Self {
        Self {
            wltp_range_km: 400,
            temperature_c: 20,
            speed_kmh: 100,
            climate_on: false,
            highway_percent: 50,
        }
    }
}

impl RangeParams {
    /// Build the `/calculator/range` query (sent with POST, no body)
    pub fn to_query_pairs(&self) -> QueryPairs {
        vec![
            ("wltp_range_km", self.wltp_range_km.to_string()),
            ("temperature_c", self.temperature_c.to_string()),
            ("speed_kmh", self.speed_kmh.to_string()),
            ("climate_on", self.climate_on.to_string()),
            ("highway_percent", self.highway_percent.to_string()),
        ]
    }
}

/// Body of the `/calculator/cost` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostInput {
    pub yearly_km: i64,
    pub electricity_price_kwh: f64,
    pub petrol_price_liter: f64,
    pub ev_consumption_kwh_100km: f64,
    pub ice_consumption_l_100km: f64,
    pub canton: String,
}

impl Default for CostInput {
    fn default() -> Self {
        Self {
            yearly_km: 15_000,
            electricity_price_kwh: 0.25,
            petrol_price_liter: 1.85,
            ev_consumption_kwh_100km: 17.0,
            ice_consumption_l_100km: 7.0,
            canton: "ZH".to_string(),
        }
    }
}

/// Filters for the aggregated news feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsQuery {
    /// swiss, german, international or balkan
    pub region: Option<String>,
    pub category: Option<String>,
    /// de, en, sr or hr
    pub language: Option<String>,
    pub limit: u32,
    /// Ask the service to rebuild its feed cache; only sent when set
    #[serde(default)]
    pub refresh: bool,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            region: None,
            category: None,
            language: None,
            limit: 50,
            refresh: false,
        }
    }
}

impl NewsQuery {
    pub fn to_query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push_text(&mut pairs, "region", self.region.as_deref());
        push_text(&mut pairs, "category", self.category.as_deref());
        push_text(&mut pairs, "language", self.language.as_deref());
        pairs.push(("limit", self.limit.to_string()));
        if self.refresh {
            pairs.push(("refresh", "true".to_string()));
        }
        pairs
    }

    /// The same filters with the cache bypass requested
    pub fn forced(&self) -> Self {
        Self {
            refresh: true,
            ..self.clone()
        }
    }
}

/// Year selector for the monthly registration data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDataQuery {
    pub year: i32,
}

impl Default for MarketDataQuery {
    fn default() -> Self {
        Self { year: 2024 }
    }
}

impl MarketDataQuery {
    pub fn to_query_pairs(&self) -> QueryPairs {
        vec![("year", self.year.to_string())]
    }
}

/// Optional single `category` filter used by knowledge listings
pub fn category_pairs(category: Option<&str>) -> QueryPairs {
    let mut pairs = QueryPairs::new();
    push_text(&mut pairs, "category", category);
    pairs
}
