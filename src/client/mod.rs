//! Client side of the Remote Data Service
//!
//! The service is split into one trait per concern so that each page depends
//! only on what it reads and tests can mock a single concern.
//! [`RemoteDataService`] bundles every source with the health check.

pub mod http;
pub mod models;

use crate::core::error::PortalError;
use crate::core::query::{
    CostInput, FilterCriteria, MarketDataQuery, NewsQuery, RangeParams, StationQuery,
};
use crate::core::vehicle::VehicleRecord;
use async_trait::async_trait;

pub use http::HttpDataService;
pub use models::*;

/// Result alias for every remote call
pub type RemoteResult<T> = Result<T, PortalError>;

/// Vehicle database endpoints
#[async_trait]
pub trait VehicleSource: Send + Sync {
    /// `GET /vehicles`, ordered by the service
    async fn list_vehicles(&self, criteria: &FilterCriteria) -> RemoteResult<Vec<VehicleRecord>>;

    /// `GET /vehicles/{id}`
    async fn get_vehicle(&self, id: &str) -> RemoteResult<VehicleRecord>;

    /// `GET /vehicles/brands/list`
    async fn brands(&self) -> RemoteResult<BrandList>;

    /// `GET /vehicles/categories/list`
    async fn categories(&self) -> RemoteResult<CategoryList>;

    /// `GET /vehicles/stats/price-per-km`
    async fn price_per_km_ranking(&self) -> RemoteResult<PricePerKmRanking>;
}

/// Market statistics endpoints
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// `GET /market/stats`
    async fn market_stats(&self) -> RemoteResult<MarketStats>;

    /// `GET /market/data?year`
    async fn market_data(&self, query: &MarketDataQuery) -> RemoteResult<MarketData>;
}

/// Charging infrastructure endpoints
#[async_trait]
pub trait ChargingSource: Send + Sync {
    /// `GET /charging/networks`
    async fn charging_networks(&self) -> RemoteResult<ChargingNetworks>;

    /// `GET /charging/stations?lat&lng&radius&limit`
    async fn charging_stations(&self, query: &StationQuery) -> RemoteResult<StationList>;
}

/// Computed endpoints and their reference data
#[async_trait]
pub trait CalculatorSource: Send + Sync {
    /// `POST /calculator/range` with query parameters
    async fn estimate_range(&self, params: &RangeParams) -> RemoteResult<RangeEstimate>;

    /// `POST /calculator/cost` with a JSON body
    async fn estimate_cost(&self, input: &CostInput) -> RemoteResult<CostComparison>;

    /// `GET /calculator/cantons`
    async fn cantons(&self) -> RemoteResult<CantonList>;
}

/// Knowledge base endpoints
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// `GET /knowledge/articles?category`
    async fn articles(&self, category: Option<&str>) -> RemoteResult<ArticleList>;

    /// `GET /knowledge/articles/{slug}`
    async fn article(&self, slug: &str) -> RemoteResult<KnowledgeArticle>;

    /// `GET /knowledge/glossary?category`
    async fn glossary(&self, category: Option<&str>) -> RemoteResult<Glossary>;

    /// `GET /knowledge/myths`
    async fn myths(&self) -> RemoteResult<MythList>;

    /// `GET /knowledge/categories`
    async fn knowledge_categories(&self) -> RemoteResult<KnowledgeCategories>;
}

/// Aggregated news endpoints
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// `GET /news?region&category&language&limit&refresh`
    async fn news(&self, query: &NewsQuery) -> RemoteResult<NewsFeed>;

    /// `GET /news/sources`
    async fn news_sources(&self) -> RemoteResult<NewsSources>;

    /// `GET /news/categories`
    async fn news_categories(&self) -> RemoteResult<NewsCategories>;
}

/// The complete Remote Data Service
#[async_trait]
pub trait RemoteDataService:
    VehicleSource + MarketSource + ChargingSource + CalculatorSource + KnowledgeSource + NewsSource
{
    /// `GET /health`
    async fn health(&self) -> RemoteResult<Health>;
}
