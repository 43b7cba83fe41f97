//! Total cost of ownership calculator

use super::PageContext;
use crate::client::{CalculatorSource, Canton, CantonList, CostComparison};
use crate::core::events::EventBus;
use crate::core::query::CostInput;
use crate::sync::{Generation, QuerySynchronizer};
use std::sync::Arc;

const CANTONS: &str = "cantons";
const COMPARISON: &str = "comparison";

/// View-model of the cost calculator
///
/// Each input change re-issues the comparison; cantons are fetched once.
pub struct CostPage {
    ctx: PageContext,
    source: Arc<dyn CalculatorSource>,

    input: CostInput,
    cantons: Option<CantonList>,
    comparison: Option<CostComparison>,

    cantons_sync: QuerySynchronizer<CantonList>,
    comparison_sync: QuerySynchronizer<CostComparison>,
}

impl CostPage {
    pub fn open(source: Arc<dyn CalculatorSource>, bus: EventBus) -> Self {
        let mut page = Self {
            ctx: PageContext::new("cost", bus),
            source,
            input: CostInput::default(),
            cantons: None,
            comparison: None,
            cantons_sync: QuerySynchronizer::new(CANTONS),
            comparison_sync: QuerySynchronizer::new(COMPARISON),
        };

        let source = Arc::clone(&page.source);
        page.cantons_sync.issue(async move { source.cantons().await });
        page.recalculate();
        page
    }

    pub fn input(&self) -> &CostInput {
        &self.input
    }

    pub fn set_input(&mut self, input: CostInput) -> Generation {
        self.input = input;
        self.recalculate()
    }

    pub fn set_yearly_km(&mut self, km: i64) -> Generation {
        self.input.yearly_km = km;
        self.recalculate()
    }

    pub fn set_electricity_price(&mut self, chf_per_kwh: f64) -> Generation {
        self.input.electricity_price_kwh = chf_per_kwh;
        self.recalculate()
    }

    pub fn set_petrol_price(&mut self, chf_per_liter: f64) -> Generation {
        self.input.petrol_price_liter = chf_per_liter;
        self.recalculate()
    }

    pub fn set_ev_consumption(&mut self, kwh_per_100km: f64) -> Generation {
        self.input.ev_consumption_kwh_100km = kwh_per_100km;
        self.recalculate()
    }

    pub fn set_ice_consumption(&mut self, liters_per_100km: f64) -> Generation {
        self.input.ice_consumption_l_100km = liters_per_100km;
        self.recalculate()
    }

    /// Canton codes are sent upper-case
    pub fn set_canton(&mut self, code: &str) -> Generation {
        self.input.canton = code.trim().to_uppercase();
        self.recalculate()
    }

    fn recalculate(&mut self) -> Generation {
        let source = Arc::clone(&self.source);
        let input = self.input.clone();
        self.comparison_sync.issue(async move { source.estimate_cost(&input).await })
    }

    pub fn cantons(&self) -> &[Canton] {
        self.cantons
            .as_ref()
            .map(|list| list.cantons.as_slice())
            .unwrap_or_default()
    }

    /// Tax entry of the canton currently selected in the input
    pub fn selected_canton(&self) -> Option<&Canton> {
        self.cantons.as_ref()?.find(&self.input.canton)
    }

    pub fn comparison(&self) -> Option<&CostComparison> {
        self.comparison.as_ref()
    }

    pub fn is_calculating(&self) -> bool {
        self.comparison_sync.is_loading()
    }

    pub async fn pump(&mut self) -> bool {
        tokio::select! {
            Some(outcome) = self.cantons_sync.next() => {
                if let Some(cantons) = self.ctx.accept(CANTONS, outcome) {
                    self.cantons = Some(cantons);
                }
            }
            Some(outcome) = self.comparison_sync.next() => {
                if let Some(comparison) = self.ctx.accept(COMPARISON, outcome) {
                    let first = self.comparison.is_none();
                    self.comparison = Some(comparison);
                    if first {
                        self.ctx.loaded();
                    }
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
        self.cantons_sync.close();
        self.comparison_sync.close();
    }
}
