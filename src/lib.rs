//! # EV Portal
//!
//! Data layer of a Swiss electric-vehicle information portal: a typed client
//! for the portal's REST API and one owned view-model per page.
//!
//! ## Features
//!
//! - **Typed Remote Data Service**: one async trait per concern, backed by reqwest
//! - **Race-Free Re-Fetching**: generation tokens ensure only the latest request commits
//! - **Filter/Sort/Compare**: vehicle queries and a bounded comparison set
//! - **Last-Good State**: failed fetches are logged and never clear what is shown
//! - **Presentation Events**: broadcast bus carrying page, compare and navigation events
//! - **Configuration-Based**: YAML config with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ev_portal::prelude::*;
//!
//! let config = PortalConfig::from_yaml_file("portal.yaml")?.with_env_overrides()?;
//! init_tracing(&config.logging);
//!
//! let mut portal = Portal::from_config(&config)?;
//! let mut events = portal.bus().subscribe();
//!
//! let page = portal.navigate(Route::Vehicles).as_vehicles_mut().unwrap();
//! page.update_criteria(|c| c.brand = Some("Tesla".into()));
//! page.settle().await;
//!
//! for record in page.vehicles() {
//!     println!("{}", record.display_name());
//! }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod pages;
pub mod sync;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        compare::{COMPARE_CAPACITY, CompareRow, ComparisonSet, ToggleOutcome, compare_rows},
        error::{ErrorKind, PortalError},
        events::{
            CompareEvent, EventBus, EventEnvelope, NavigationEvent, PageEvent, PortalEvent,
        },
        field::{CompareField, FieldValue, vehicle_compare_fields},
        query::{
            CostInput, FilterCriteria, MarketDataQuery, NewsQuery, RangeParams, StationQuery,
        },
        vehicle::{SortField, SortOrder, VehicleRecord},
    };

    // === Client ===
    pub use crate::client::{
        CalculatorSource, ChargingSource, HttpDataService, KnowledgeSource, MarketSource,
        NewsSource, RemoteDataService, RemoteResult, VehicleSource,
    };

    // === Sync ===
    pub use crate::sync::{Generation, Outcome, QuerySynchronizer};

    // === Pages ===
    pub use crate::pages::{
        ActivePage, CostPage, DashboardPage, HomePage, KnowledgePage, NewsPage, Portal,
        RangePage, Route, VehiclePage,
    };

    // === Config ===
    pub use crate::config::{ApiConfig, LoggingConfig, PortalConfig, init_tracing};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
