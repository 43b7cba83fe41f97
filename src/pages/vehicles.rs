//! Vehicle database page: filter, sort and compare

use super::PageContext;
use crate::client::{BrandList, CategoryList, VehicleSource};
use crate::core::compare::{CompareRow, ComparisonSet, ToggleOutcome, compare_rows};
use crate::core::events::{CompareEvent, EventBus, PortalEvent};
use crate::core::field::CompareField;
use crate::core::query::FilterCriteria;
use crate::core::vehicle::VehicleRecord;
use crate::sync::{Generation, QuerySynchronizer};
use std::sync::Arc;

const OPTIONS: &str = "options";
const LIST: &str = "list";
const DETAIL: &str = "detail";

/// View-model of the vehicle database
///
/// The displayed list is replaced wholesale by the response of the latest
/// filter request; a failed request leaves it untouched. The comparison set
/// is curated independently of the filters and dies with the page.
pub struct VehiclePage {
    ctx: PageContext,
    source: Arc<dyn VehicleSource>,

    criteria: FilterCriteria,
    vehicles: Vec<VehicleRecord>,
    brands: Vec<String>,
    categories: Vec<String>,
    detail: Option<VehicleRecord>,
    comparison: ComparisonSet,

    options_sync: QuerySynchronizer<(BrandList, CategoryList)>,
    list_sync: QuerySynchronizer<Vec<VehicleRecord>>,
    detail_sync: QuerySynchronizer<VehicleRecord>,
}

impl VehiclePage {
    /// Create the page and start its initial load
    ///
    /// The filter options (brands and categories) are fetched together and
    /// fail together; the unfiltered list is fetched alongside.
    pub fn open(source: Arc<dyn VehicleSource>, bus: EventBus) -> Self {
        let mut page = Self {
            ctx: PageContext::new("vehicles", bus),
            source,
            criteria: FilterCriteria::default(),
            vehicles: Vec::new(),
            brands: Vec::new(),
            categories: Vec::new(),
            detail: None,
            comparison: ComparisonSet::new(),
            options_sync: QuerySynchronizer::new(OPTIONS),
            list_sync: QuerySynchronizer::new(LIST),
            detail_sync: QuerySynchronizer::new(DETAIL),
        };

        let source = Arc::clone(&page.source);
        page.options_sync.issue(async move {
            futures::try_join!(source.brands(), source.categories())
        });
        page.apply_filters();
        page
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the criteria and re-query
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Generation {
        self.criteria = criteria;
        self.apply_filters()
    }

    /// Edit the criteria in place and re-query
    ///
    /// ```rust,ignore
    /// page.update_criteria(|c| c.brand = Some("Tesla".into()));
    /// ```
    pub fn update_criteria<F>(&mut self, edit: F) -> Generation
    where
        F: FnOnce(&mut FilterCriteria),
    {
        edit(&mut self.criteria);
        self.apply_filters()
    }

    /// Clear the optional filters, keeping the sort, and re-query
    pub fn reset_filters(&mut self) -> Generation {
        self.criteria = self.criteria.cleared();
        self.apply_filters()
    }

    /// Issue a list request for the current criteria
    ///
    /// Any request still in flight is superseded; its response will be
    /// discarded when it arrives.
    pub fn apply_filters(&mut self) -> Generation {
        let source = Arc::clone(&self.source);
        let criteria = self.criteria.clone();
        self.list_sync.issue(async move { source.list_vehicles(&criteria).await })
    }

    pub fn vehicles(&self) -> &[VehicleRecord] {
        &self.vehicles
    }

    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Whether the latest list request is still outstanding
    pub fn is_loading(&self) -> bool {
        self.list_sync.is_loading()
    }

    // =========================================================================
    // Detail
    // =========================================================================

    /// Fetch a single record for the detail view
    pub fn open_vehicle(&mut self, id: &str) -> Generation {
        let source = Arc::clone(&self.source);
        let id = id.to_string();
        self.detail_sync.issue(async move { source.get_vehicle(&id).await })
    }

    pub fn detail(&self) -> Option<&VehicleRecord> {
        self.detail.as_ref()
    }

    /// Hide the detail view; a fetch still in flight will not reopen it
    pub fn close_detail(&mut self) {
        self.detail_sync.supersede();
        self.detail = None;
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    pub fn toggle_compare(&mut self, record: &VehicleRecord) -> ToggleOutcome {
        let outcome = self.comparison.toggle(record);
        let vehicle_id = record.id.clone();

        let event = match outcome {
            ToggleOutcome::Added => CompareEvent::Added { vehicle_id },
            ToggleOutcome::Removed => CompareEvent::Removed { vehicle_id },
            ToggleOutcome::Rejected => {
                tracing::debug!(vehicle_id = %record.id, "Comparison set full, not added");
                CompareEvent::Rejected { vehicle_id }
            }
        };
        self.ctx.publish(PortalEvent::Compare(event));
        outcome
    }

    /// Remove a record by id; absent ids are ignored
    pub fn remove_from_compare(&mut self, id: &str) -> bool {
        let removed = self.comparison.remove(id);
        if removed {
            self.ctx.publish(PortalEvent::Compare(CompareEvent::Removed {
                vehicle_id: id.to_string(),
            }));
        }
        removed
    }

    pub fn is_compared(&self, id: &str) -> bool {
        self.comparison.contains(id)
    }

    /// Whether the compare affordance for `id` should be enabled
    pub fn can_toggle_compare(&self, id: &str) -> bool {
        self.comparison.can_toggle(id)
    }

    pub fn comparison(&self) -> &ComparisonSet {
        &self.comparison
    }

    pub fn compare_rows(&self, fields: &[CompareField]) -> Vec<CompareRow> {
        compare_rows(fields, &self.comparison)
    }

    // =========================================================================
    // Completions
    // =========================================================================

    /// Apply the next completion; `false` once nothing is in flight
    pub async fn pump(&mut self) -> bool {
        tokio::select! {
            Some(outcome) = self.options_sync.next() => {
                if let Some((brands, categories)) = self.ctx.accept(OPTIONS, outcome) {
                    self.brands = brands.brands;
                    self.categories = categories.categories;
                    self.ctx.loaded();
                }
            }
            Some(outcome) = self.list_sync.next() => {
                if let Some(vehicles) = self.ctx.accept(LIST, outcome) {
                    tracing::debug!(count = vehicles.len(), "Vehicle list replaced");
                    self.vehicles = vehicles;
                }
            }
            Some(outcome) = self.detail_sync.next() => {
                if let Some(record) = self.ctx.accept(DETAIL, outcome) {
                    self.detail = Some(record);
                }
            }
            else => return false,
        }
        true
    }

    /// Apply completions until nothing is in flight
    pub async fn settle(&mut self) {
        while self.pump().await {}
    }

    /// Tear down: abandon in-flight requests and suppress their results
    pub fn close(&mut self) {
        self.options_sync.close();
        self.list_sync.close();
        self.detail_sync.close();
    }
}

impl std::fmt::Debug for VehiclePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehiclePage")
            .field("criteria", &self.criteria)
            .field("vehicles", &self.vehicles.len())
            .field("comparison", &self.comparison.ids())
            .field("list_sync", &self.list_sync)
            .finish()
    }
}
