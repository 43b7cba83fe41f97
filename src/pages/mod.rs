//! Page view-models
//!
//! Each page is an owned state struct: fetched slices, the user-controlled
//! parameters that drive them, and one [`QuerySynchronizer`] per slice.
//! Parameter setters issue requests and return immediately; completions are
//! applied by `pump()` (one) or `settle()` (until nothing is in flight).
//!
//! Fetch failures never propagate out of a page. They are logged, published
//! as [`PageEvent::FetchFailed`] and the slice keeps its last-good value.
//!
//! [`QuerySynchronizer`]: crate::sync::QuerySynchronizer

pub mod cost;
pub mod dashboard;
pub mod home;
pub mod knowledge;
pub mod news;
pub mod portal;
pub mod range;
pub mod route;
pub mod vehicles;

pub use cost::CostPage;
pub use dashboard::DashboardPage;
pub use home::HomePage;
pub use knowledge::KnowledgePage;
pub use news::NewsPage;
pub use portal::{ActivePage, Portal};
pub use range::RangePage;
pub use route::Route;
pub use vehicles::VehiclePage;

use crate::core::events::{EventBus, PageEvent, PortalEvent};
use crate::sync::Outcome;

/// Name and event bus shared by everything a page reports
#[derive(Debug, Clone)]
pub struct PageContext {
    page: &'static str,
    bus: EventBus,
}

impl PageContext {
    pub fn new(page: &'static str, bus: EventBus) -> Self {
        Self { page, bus }
    }

    pub fn page(&self) -> &'static str {
        self.page
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub(crate) fn publish(&self, event: PortalEvent) {
        self.bus.publish(event);
    }

    pub(crate) fn loaded(&self) {
        tracing::info!(page = self.page, "Page loaded");
        self.publish(PortalEvent::Page(PageEvent::Loaded {
            page: self.page.to_string(),
        }));
    }

    /// Turn a completion into the value to commit, if any
    pub(crate) fn accept<T>(&self, slice: &'static str, outcome: Outcome<T>) -> Option<T> {
        match outcome {
            Outcome::Fresh { generation, value } => {
                tracing::debug!(
                    page = self.page,
                    slice,
                    generation = generation.value(),
                    "Committing response"
                );
                self.publish(PortalEvent::Page(PageEvent::Updated {
                    page: self.page.to_string(),
                    slice: slice.to_string(),
                    generation: generation.value(),
                }));
                Some(value)
            }
            Outcome::Failed { generation, error } => {
                tracing::warn!(
                    page = self.page,
                    slice,
                    generation = generation.value(),
                    code = error.error_code(),
                    "Fetch failed, keeping last state: {}",
                    error
                );
                self.publish(PortalEvent::fetch_failed(self.page, slice, &error));
                None
            }
            Outcome::Stale { generation } => {
                tracing::debug!(
                    page = self.page,
                    slice,
                    generation = generation.value(),
                    "Discarding superseded response"
                );
                self.publish(PortalEvent::Page(PageEvent::Discarded {
                    page: self.page.to_string(),
                    slice: slice.to_string(),
                    generation: generation.value(),
                }));
                None
            }
            Outcome::Lost => None,
        }
    }
}
