//! Market dashboard

use super::PageContext;
use crate::client::{
    ChargingNetwork, ChargingNetworks, ChargingSource, MarketData, MarketSource, MarketStats,
    PricePerKmRanking, VehicleSource,
};
use crate::core::error::PortalError;
use crate::core::events::EventBus;
use crate::core::query::MarketDataQuery;
use crate::sync::{Generation, QuerySynchronizer};
use std::cmp::Ordering;
use std::sync::Arc;

const OVERVIEW: &str = "overview";
const MARKET_DATA: &str = "market_data";

/// Everything the dashboard shows besides the monthly series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardOverview {
    pub stats: MarketStats,
    pub ranking: PricePerKmRanking,
    pub networks: ChargingNetworks,
}

pub struct DashboardPage {
    ctx: PageContext,
    market: Arc<dyn MarketSource>,

    year: MarketDataQuery,
    overview: Option<DashboardOverview>,
    market_data: Option<MarketData>,

    overview_sync: QuerySynchronizer<DashboardOverview>,
    market_sync: QuerySynchronizer<MarketData>,
}

impl DashboardPage {
    /// Create the page and start its initial load
    ///
    /// Stats, ranking and networks are one all-or-nothing fetch. The monthly
    /// series is its own slice so a year change never races the overview.
    pub fn open(
        market: Arc<dyn MarketSource>,
        vehicles: Arc<dyn VehicleSource>,
        charging: Arc<dyn ChargingSource>,
        bus: EventBus,
    ) -> Self {
        let mut overview_sync: QuerySynchronizer<DashboardOverview> =
            QuerySynchronizer::new(OVERVIEW);
        let stats_source = Arc::clone(&market);
        overview_sync.issue(async move {
            let (stats, ranking, networks) = futures::try_join!(
                stats_source.market_stats(),
                vehicles.price_per_km_ranking(),
                charging.charging_networks()
            )?;
            Ok::<_, PortalError>(DashboardOverview {
                stats,
                ranking,
                networks,
            })
        });

        let mut page = Self {
            ctx: PageContext::new("dashboard", bus),
            market,
            year: MarketDataQuery::default(),
            overview: None,
            market_data: None,
            overview_sync,
            market_sync: QuerySynchronizer::new(MARKET_DATA),
        };
        page.fetch_market_data();
        page
    }

    pub fn year(&self) -> i32 {
        self.year.year
    }

    /// Switch the monthly series to another year
    pub fn select_year(&mut self, year: i32) -> Generation {
        self.year = MarketDataQuery { year };
        self.fetch_market_data()
    }

    fn fetch_market_data(&mut self) -> Generation {
        let source = Arc::clone(&self.market);
        let query = self.year;
        self.market_sync.issue(async move { source.market_data(&query).await })
    }

    pub fn overview(&self) -> Option<&DashboardOverview> {
        self.overview.as_ref()
    }

    pub fn market_data(&self) -> Option<&MarketData> {
        self.market_data.as_ref()
    }

    /// Networks ordered by their cheapest DC price; networks without one last
    pub fn networks_by_dc_price(&self) -> Vec<&ChargingNetwork> {
        let mut networks: Vec<&ChargingNetwork> = self
            .overview
            .iter()
            .flat_map(|o| o.networks.networks.iter())
            .collect();

        networks.sort_by(|a, b| match (a.cheapest_dc(), b.cheapest_dc()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        networks
    }

    pub fn is_loading(&self) -> bool {
        self.overview_sync.is_loading() || self.market_sync.is_loading()
    }

    pub async fn pump(&mut self) -> bool {
        tokio::select! {
            Some(outcome) = self.overview_sync.next() => {
                if let Some(overview) = self.ctx.accept(OVERVIEW, outcome) {
                    self.overview = Some(overview);
                    self.ctx.loaded();
                }
            }
            Some(outcome) = self.market_sync.next() => {
                if let Some(data) = self.ctx.accept(MARKET_DATA, outcome) {
                    self.market_data = Some(data);
                }
            }
            else => return false,
        }
        true
    }

    pub async fn settle(&mut self) {
        while self.pump().await {}
    }

    pub fn close(&mut self) {
        self.overview_sync.close();
        self.market_sync.close();
    }
}
