//! Core types of the portal: records, queries, comparison and events

pub mod compare;
pub mod error;
pub mod events;
pub mod field;
pub mod query;
pub mod vehicle;

pub use compare::{COMPARE_CAPACITY, CompareRow, ComparisonSet, ToggleOutcome, compare_rows};
pub use error::{ErrorKind, PortalError};
pub use events::{CompareEvent, EventBus, EventEnvelope, NavigationEvent, PageEvent, PortalEvent};
pub use field::{CompareField, FieldValue, vehicle_compare_fields};
pub use query::{CostInput, FilterCriteria, MarketDataQuery, NewsQuery, RangeParams, StationQuery};
pub use vehicle::{SortField, SortOrder, VehicleRecord};
