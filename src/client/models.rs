//! Response shapes of the Remote Data Service
//!
//! Only presence is checked: wrapper lists default to empty and most scalar
//! fields are optional, so a sparse payload still decodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Service
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// =============================================================================
// Vehicles
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandList {
    #[serde(default)]
    pub brands: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryList {
    #[serde(default)]
    pub categories: Vec<String>,
}

/// One entry of the price-per-km ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePerKm {
    pub vehicle: String,
    #[serde(default)]
    pub price_chf: Option<f64>,
    #[serde(default)]
    pub range_km: Option<f64>,
    pub price_per_km: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricePerKmRanking {
    #[serde(default)]
    pub rankings: Vec<PricePerKm>,
}

// =============================================================================
// Market
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandShare {
    pub brand: String,
    pub sales: u64,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelShare {
    pub model: String,
    pub sales: u64,
    pub share: f64,
}

/// Headline figures shown on the home page and dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    #[serde(default)]
    pub current_month: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub bev_market_share: Option<f64>,
    #[serde(default)]
    pub bev_registrations_monthly: Option<u64>,
    #[serde(default)]
    pub charging_points_ch: Option<u64>,
    #[serde(default)]
    pub fast_chargers_ch: Option<u64>,
    #[serde(default)]
    pub top_brands: Vec<BrandShare>,
    #[serde(default)]
    pub top_models: Vec<ModelShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRegistrations {
    pub month: String,
    pub year: i32,
    pub bev_registrations: u64,
    pub phev_registrations: u64,
    pub total_registrations: u64,
    pub bev_market_share: f64,
    #[serde(default)]
    pub top_brands: Vec<Value>,
    #[serde(default)]
    pub top_models: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    #[serde(default)]
    pub total_bev_registrations: u64,
    #[serde(default)]
    pub total_phev_registrations: u64,
    #[serde(default)]
    pub total_registrations: u64,
    #[serde(default)]
    pub average_bev_market_share: f64,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub monthly_data: Vec<MonthlyRegistrations>,
    #[serde(default)]
    pub summary: MarketSummary,
}

// =============================================================================
// Charging
// =============================================================================

/// Published price list of a charging network (CHF per kWh)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingNetwork {
    pub name: String,
    #[serde(default)]
    pub ac_kwh: Option<f64>,
    #[serde(default)]
    pub dc_50_kwh: Option<f64>,
    #[serde(default)]
    pub dc_150_kwh: Option<f64>,
    #[serde(default)]
    pub dc_fast_kwh: Option<f64>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ChargingNetwork {
    /// Lowest published DC price, if any
    pub fn cheapest_dc(&self) -> Option<f64> {
        [self.dc_50_kwh, self.dc_150_kwh, self.dc_fast_kwh]
            .into_iter()
            .flatten()
            .reduce(f64::min)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargingNetworks {
    #[serde(default)]
    pub networks: Vec<ChargingNetwork>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub num_points: Option<u32>,
    #[serde(default)]
    pub max_power_kw: Option<f64>,
    #[serde(default)]
    pub connection_types: Vec<String>,
    #[serde(default)]
    pub is_fast_charger: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationList {
    #[serde(default)]
    pub stations: Vec<ChargingStation>,
    #[serde(default)]
    pub total: usize,
    /// "cache" when the service fell back to its built-in list
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub search_params: Option<SearchParams>,
}

impl StationList {
    pub fn is_cached(&self) -> bool {
        self.source.as_deref() == Some("cache")
    }

    pub fn fast_chargers(&self) -> impl Iterator<Item = &ChargingStation> {
        self.stations.iter().filter(|s| s.is_fast_charger)
    }
}

// =============================================================================
// Calculators
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFactor {
    pub value: f64,
    pub factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateFactor {
    pub active: bool,
    pub factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFactors {
    pub temperature: ValueFactor,
    pub speed: ValueFactor,
    pub climate: ClimateFactor,
    pub highway_percent: ValueFactor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeEstimate {
    #[serde(default)]
    pub wltp_range_km: Option<f64>,
    pub calculated_range_km: f64,
    pub efficiency_percent: f64,
    #[serde(default)]
    pub factors: Option<RangeFactors>,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Yearly cost comparison between an EV and a combustion car (CHF)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostComparison {
    pub ev_yearly_fuel_cost: f64,
    pub ice_yearly_fuel_cost: f64,
    pub ev_yearly_maintenance: f64,
    pub ice_yearly_maintenance: f64,
    pub ev_yearly_tax: f64,
    pub ice_yearly_tax: f64,
    pub ev_yearly_insurance: f64,
    pub ice_yearly_insurance: f64,
    pub ev_total_yearly: f64,
    pub ice_total_yearly: f64,
    pub yearly_savings: f64,
    pub five_year_savings: f64,
    pub break_even_km: f64,
}

impl CostComparison {
    pub fn ev_is_cheaper(&self) -> bool {
        self.yearly_savings > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canton {
    pub code: String,
    pub name: String,
    pub ev_tax: f64,
    pub ice_tax: f64,
    #[serde(default)]
    pub incentive: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CantonList {
    #[serde(default)]
    pub cantons: Vec<Canton>,
}

impl CantonList {
    pub fn find(&self, code: &str) -> Option<&Canton> {
        self.cantons.iter().find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

// =============================================================================
// Knowledge
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeArticle {
    pub id: String,
    pub category: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleList {
    #[serde(default)]
    pub articles: Vec<KnowledgeArticle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Glossary {
    #[serde(default)]
    pub terms: Vec<GlossaryTerm>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MythFact {
    pub id: String,
    pub myth: String,
    pub fact: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MythList {
    #[serde(default)]
    pub myths: Vec<MythFact>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeCategories {
    #[serde(default)]
    pub categories: Vec<KnowledgeCategory>,
}

// =============================================================================
// News
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsFeed {
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub cache_age_minutes: Option<f64>,
    #[serde(default)]
    pub sources_count: Option<usize>,
}

/// One outlet the feed is aggregated from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsOutlet {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSources {
    #[serde(default)]
    pub sources: Vec<NewsOutlet>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub name_de: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsCategories {
    #[serde(default)]
    pub categories: Vec<NewsCategory>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_market_stats_sparse_payload() {
        let stats: MarketStats = serde_json::from_value(json!({
            "bev_market_share": 22.3,
            "top_brands": [{"brand": "Tesla", "sales": 12500, "share": 18.2}]
        }))
        .unwrap();

        assert_eq!(stats.bev_market_share, Some(22.3));
        assert_eq!(stats.top_brands.len(), 1);
        assert!(stats.top_models.is_empty());
        assert_eq!(stats.current_month, None);
    }

    #[test]
    fn test_wrappers_default_to_empty() {
        let brands: BrandList = serde_json::from_value(json!({})).unwrap();
        assert!(brands.brands.is_empty());

        let feed: NewsFeed = serde_json::from_value(json!({"total": 0})).unwrap();
        assert!(feed.articles.is_empty());
    }

    #[test]
    fn test_station_list_cache_flag() {
        let list: StationList = serde_json::from_value(json!({
            "stations": [{
                "id": "3",
                "name": "Tesla Supercharger",
                "latitude": 47.4003,
                "longitude": 8.4009,
                "max_power_kw": 250,
                "connection_types": ["Tesla"],
                "is_fast_charger": true
            }],
            "total": 1,
            "source": "cache",
            "search_params": {"lat": 47.3769, "lng": 8.5417, "radius_km": 25}
        }))
        .unwrap();

        assert!(list.is_cached());
        assert_eq!(list.fast_chargers().count(), 1);
    }

    #[test]
    fn test_cheapest_dc_ignores_missing_prices() {
        let network: ChargingNetwork = serde_json::from_value(json!({
            "name": "Ionity",
            "ac_kwh": null,
            "dc_50_kwh": null,
            "dc_150_kwh": null,
            "dc_fast_kwh": 0.79
        }))
        .unwrap();
        assert_eq!(network.cheapest_dc(), Some(0.79));

        let none: ChargingNetwork = serde_json::from_value(json!({"name": "X"})).unwrap();
        assert_eq!(none.cheapest_dc(), None);
    }

    #[test]
    fn test_range_estimate_with_factors() {
        let estimate: RangeEstimate = serde_json::from_value(json!({
            "wltp_range_km": 400,
            "calculated_range_km": 340,
            "efficiency_percent": 85,
            "factors": {
                "temperature": {"value": 20, "factor": 1.0},
                "speed": {"value": 100, "factor": 1.0},
                "climate": {"active": false, "factor": 1.0},
                "highway_percent": {"value": 100, "factor": 0.85}
            },
            "tips": ["Rekuperation auf Maximum stellen"]
        }))
        .unwrap();

        assert_eq!(estimate.calculated_range_km, 340.0);
        assert_eq!(estimate.factors.unwrap().highway_percent.factor, 0.85);
    }

    #[test]
    fn test_canton_lookup_is_case_insensitive() {
        let list = CantonList {
            cantons: vec![Canton {
                code: "ZH".to_string(),
                name: "Zürich".to_string(),
                ev_tax: 250.0,
                ice_tax: 500.0,
                incentive: 0.0,
            }],
        };
        assert!(list.find("zh").is_some());
        assert!(list.find("BE").is_none());
    }

    #[test]
    fn test_news_article_published_timestamp() {
        let article: NewsArticle = serde_json::from_value(json!({
            "id": "abc",
            "title": "Neue Ladestationen",
            "url": "https://example.ch/a",
            "published": "2025-01-15T08:30:00+00:00",
            "categories": ["charging"]
        }))
        .unwrap();
        assert!(article.published.is_some());
        assert_eq!(article.categories, vec!["charging"]);
    }
}
