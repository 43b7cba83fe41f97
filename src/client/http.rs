//! reqwest-backed implementation of the Remote Data Service

use super::models::*;
use super::{
    CalculatorSource, ChargingSource, KnowledgeSource, MarketSource, NewsSource,
    RemoteDataService, RemoteResult, VehicleSource,
};
use crate::config::ApiConfig;
use crate::core::error::PortalError;
use crate::core::query::{
    CostInput, FilterCriteria, MarketDataQuery, NewsQuery, RangeParams, StationQuery,
    category_pairs,
};
use crate::core::vehicle::VehicleRecord;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Unauthenticated JSON-over-HTTP client for the portal API
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpDataService {
    client: Client,
    base_url: String,
}

impl HttpDataService {
    /// Build a client from the API section of the configuration
    pub fn new(config: &ApiConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PortalError::Config(format!("failed to build HTTP client: {}", e)))?;

        Self::with_client(client, &config.base_url)
    }

    /// Use an existing reqwest client against `base_url`
    pub fn with_client(client: Client, base_url: &str) -> RemoteResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| PortalError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> RemoteResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| PortalError::Config(format!("invalid URL '{}': {}", raw, e)))
    }

    /// `{path}/{segment}` with the segment percent-encoded
    fn endpoint_with_segment(&self, path: &str, segment: &str) -> RemoteResult<Url> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| PortalError::Config(format!("URL '{}' cannot take segments", path)))?
            .push(segment);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> RemoteResult<T> {
        let mut request = self.client.get(self.endpoint(path)?);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(path, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> RemoteResult<T> {
        tracing::debug!(endpoint = %endpoint, "Sending request");

        let response = request
            .send()
            .await
            .map_err(|e| PortalError::transport(endpoint, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(endpoint = %endpoint, status = status.as_u16(), "Non-success response");
            return Err(PortalError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PortalError::transport(endpoint, &e))?;

        serde_json::from_slice(&body).map_err(|e| PortalError::payload(endpoint, &e))
    }
}

#[async_trait]
impl VehicleSource for HttpDataService {
    async fn list_vehicles(&self, criteria: &FilterCriteria) -> RemoteResult<Vec<VehicleRecord>> {
        self.get_json("/vehicles", &criteria.to_query_pairs()).await
    }

    async fn get_vehicle(&self, id: &str) -> RemoteResult<VehicleRecord> {
        let url = self.endpoint_with_segment("/vehicles", id)?;
        self.execute("/vehicles/{id}", self.client.get(url)).await
    }

    async fn brands(&self) -> RemoteResult<BrandList> {
        self.get_json("/vehicles/brands/list", &[]).await
    }

    async fn categories(&self) -> RemoteResult<CategoryList> {
        self.get_json("/vehicles/categories/list", &[]).await
    }

    async fn price_per_km_ranking(&self) -> RemoteResult<PricePerKmRanking> {
        self.get_json("/vehicles/stats/price-per-km", &[]).await
    }
}

#[async_trait]
impl MarketSource for HttpDataService {
    async fn market_stats(&self) -> RemoteResult<MarketStats> {
        self.get_json("/market/stats", &[]).await
    }

    async fn market_data(&self, query: &MarketDataQuery) -> RemoteResult<MarketData> {
        self.get_json("/market/data", &query.to_query_pairs()).await
    }
}

#[async_trait]
impl ChargingSource for HttpDataService {
    async fn charging_networks(&self) -> RemoteResult<ChargingNetworks> {
        self.get_json("/charging/networks", &[]).await
    }

    async fn charging_stations(&self, query: &StationQuery) -> RemoteResult<StationList> {
        self.get_json("/charging/stations", &query.to_query_pairs()).await
    }
}

#[async_trait]
impl CalculatorSource for HttpDataService {
    async fn estimate_range(&self, params: &RangeParams) -> RemoteResult<RangeEstimate> {
        let path = "/calculator/range";
        let request = self
            .client
            .post(self.endpoint(path)?)
            .query(&params.to_query_pairs());
        self.execute(path, request).await
    }

    async fn estimate_cost(&self, input: &CostInput) -> RemoteResult<CostComparison> {
        let path = "/calculator/cost";
        let request = self.client.post(self.endpoint(path)?).json(input);
        self.execute(path, request).await
    }

    async fn cantons(&self) -> RemoteResult<CantonList> {
        self.get_json("/calculator/cantons", &[]).await
    }
}

#[async_trait]
impl KnowledgeSource for HttpDataService {
    async fn articles(&self, category: Option<&str>) -> RemoteResult<ArticleList> {
        self.get_json("/knowledge/articles", &category_pairs(category)).await
    }

    async fn article(&self, slug: &str) -> RemoteResult<KnowledgeArticle> {
        let url = self.endpoint_with_segment("/knowledge/articles", slug)?;
        self.execute("/knowledge/articles/{slug}", self.client.get(url)).await
    }

    async fn glossary(&self, category: Option<&str>) -> RemoteResult<Glossary> {
        self.get_json("/knowledge/glossary", &category_pairs(category)).await
    }

    async fn myths(&self) -> RemoteResult<MythList> {
        self.get_json("/knowledge/myths", &[]).await
    }

    async fn knowledge_categories(&self) -> RemoteResult<KnowledgeCategories> {
        self.get_json("/knowledge/categories", &[]).await
    }
}

#[async_trait]
impl NewsSource for HttpDataService {
    async fn news(&self, query: &NewsQuery) -> RemoteResult<NewsFeed> {
        self.get_json("/news", &query.to_query_pairs()).await
    }

    async fn news_sources(&self) -> RemoteResult<NewsSources> {
        self.get_json("/news/sources", &[]).await
    }

    async fn news_categories(&self) -> RemoteResult<NewsCategories> {
        self.get_json("/news/categories", &[]).await
    }
}

#[async_trait]
impl RemoteDataService for HttpDataService {
    async fn health(&self) -> RemoteResult<Health> {
        self.get_json("/health", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let service = HttpDataService::with_client(Client::new(), "http://localhost:8001/api/").unwrap();
        assert_eq!(service.base_url(), "http://localhost:8001/api");
        assert_eq!(
            service.endpoint("/vehicles").unwrap().as_str(),
            "http://localhost:8001/api/vehicles"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpDataService::with_client(Client::new(), "not a url").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_segment_is_percent_encoded() {
        let service = HttpDataService::with_client(Client::new(), "http://localhost/api").unwrap();
        let url = service
            .endpoint_with_segment("/knowledge/articles", "laden zu hause")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost/api/knowledge/articles/laden%20zu%20hause");
    }

    #[test]
    fn test_new_from_default_config() {
        let service = HttpDataService::new(&ApiConfig::default()).unwrap();
        assert_eq!(service.base_url(), "http://localhost:8001/api");
    }
}
