//! Range estimator and charging station finder

use super::PageContext;
use crate::client::{CalculatorSource, ChargingNetworks, ChargingSource, RangeEstimate, StationList};
use crate::core::events::EventBus;
use crate::core::query::{RangeParams, StationQuery};
use crate::core::vehicle::VehicleRecord;
use crate::sync::{Generation, QuerySynchronizer};
use std::sync::Arc;

const ESTIMATE: &str = "estimate";
const NETWORKS: &str = "networks";
const STATIONS: &str = "stations";

/// View-model of the range page
///
/// Every parameter change re-issues the estimate immediately, without
/// debouncing. Only the response to the latest parameters is shown.
pub struct RangePage {
    ctx: PageContext,
    calculator: Arc<dyn CalculatorSource>,
    charging: Arc<dyn ChargingSource>,

    params: RangeParams,
    station_query: StationQuery,
    estimate: Option<RangeEstimate>,
    networks: Option<ChargingNetworks>,
    stations: Option<StationList>,

    estimate_sync: QuerySynchronizer<RangeEstimate>,
    networks_sync: QuerySynchronizer<ChargingNetworks>,
    stations_sync: QuerySynchronizer<StationList>,
}

impl RangePage {
    pub fn open(
        calculator: Arc<dyn CalculatorSource>,
        charging: Arc<dyn ChargingSource>,
        bus: EventBus,
    ) -> Self {
        let mut page = Self {
            ctx: PageContext::new("range", bus),
            calculator,
            charging,
            params: RangeParams::default(),
            station_query: StationQuery::default(),
            estimate: None,
            networks: None,
            stations: None,
            estimate_sync: QuerySynchronizer::new(ESTIMATE),
            networks_sync: QuerySynchronizer::new(NETWORKS),
            stations_sync: QuerySynchronizer::new(STATIONS),
        };

        let charging = Arc::clone(&page.charging);
        page.networks_sync.issue(async move { charging.charging_networks().await });
        page.recalculate();
        page.fetch_stations();
        page
    }

    // =========================================================================
    // Range parameters
    // =========================================================================

    pub fn params(&self) -> &RangeParams {
        &self.params
    }

    pub fn set_params(&mut self, params: RangeParams) -> Generation {
        self.params = params;
        self.recalculate()
    }

    pub fn set_wltp_range(&mut self, km: i64) -> Generation {
        self.params.wltp_range_km = km;
        self.recalculate()
    }

    pub fn set_temperature(&mut self, celsius: i64) -> Generation {
        self.params.temperature_c = celsius;
        self.recalculate()
    }

    pub fn set_speed(&mut self, kmh: i64) -> Generation {
        self.params.speed_kmh = kmh;
        self.recalculate()
    }

    pub fn set_climate(&mut self, on: bool) -> Generation {
        self.params.climate_on = on;
        self.recalculate()
    }

    pub fn set_highway_percent(&mut self, percent: i64) -> Generation {
        self.params.highway_percent = percent;
        self.recalculate()
    }

    /// Take the WLTP range from a vehicle; records without one change nothing
    pub fn use_vehicle(&mut self, record: &VehicleRecord) -> Option<Generation> {
        let km = record.range_wltp_km?;
        Some(self.set_wltp_range(km.round() as i64))
    }

    fn recalculate(&mut self) -> Generation {
        let source = Arc::clone(&self.calculator);
        let params = self.params.clone();
        self.estimate_sync.issue(async move { source.estimate_range(&params).await })
    }

    pub fn estimate(&self) -> Option<&RangeEstimate> {
        self.estimate.as_ref()
    }

    pub fn is_calculating(&self) -> bool {
        self.estimate_sync.is_loading()
    }

    // =========================================================================
    // Charging
    // =========================================================================

    pub fn networks(&self) -> Option<&ChargingNetworks> {
        self.networks.as_ref()
    }

    pub fn station_query(&self) -> &StationQuery {
        &self.station_query
    }

    /// Search stations around another point
    pub fn search_stations(&mut self, query: StationQuery) -> Generation {
        self.station_query = query;
        self.fetch_stations()
    }

    fn fetch_stations(&mut self) -> Generation {
        let source = Arc::clone(&self.charging);
        let query = self.station_query.clone();
        self.stations_sync.issue(async move { source.charging_stations(&query).await })
    }

    pub fn stations(&self) -> Option<&StationList> {
        self.stations.as_ref()
    }

    // =========================================================================
    // Completions
    // =========================================================================

    pub async fn pump(&mut self) -> bool {
        tokio::select! {
            Some(outcome) = self.estimate_sync.next() => {
                if let Some(estimate) = self.ctx.accept(ESTIMATE, outcome) {
                    let first = self.estimate.is_none();
                    self.estimate = Some(estimate);
                    if first {
                        self.ctx.loaded();
                    }
                }
            }
            Some(outcome) = self.networks_sync.next() => {
                if let Some(networks) = self.ctx.accept(NETWORKS, outcome) {
                    self.networks = Some(networks);
                }
            }
            Some(outcome) = self.stations_sync.next() => {
                if let Some(stations) = self.ctx.accept(STATIONS, outcome) {
                    if stations.is_cached() {
                        tracing::info!(total = stations.total, "Station list served from cache");
                    }
                    self.stations = Some(stations);
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
        self.estimate_sync.close();
        self.networks_sync.close();
        self.stations_sync.close();
    }
}
