//! Internal event system for presentation updates
//!
//! The EventBus decouples page view-models (which own state and talk to the
//! Remote Data Service) from whatever renders them. It uses
//! `tokio::sync::broadcast`, so any number of renderers can subscribe.
//!
//! # Architecture
//!
//! ```text
//! VehiclePage ──┐
//! RangePage   ──┼──▶ EventBus::publish() ──▶ broadcast channel ──▶ renderer(s)
//! Portal      ──┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let event_bus = EventBus::new(256);
//! let mut rx = event_bus.subscribe();
//!
//! event_bus.publish(PortalEvent::Compare(CompareEvent::Added {
//!     vehicle_id: "1".to_string(),
//! }));
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("Received: {:?}", envelope.event);
//! }
//! ```

use crate::core::error::PortalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events about a page's fetched state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PageEvent {
    /// The page's initial load completed
    Loaded { page: String },
    /// A slice of page state was replaced by a fresh response
    Updated {
        page: String,
        slice: String,
        generation: u64,
    },
    /// A request failed; the slice keeps its last-good value
    FetchFailed {
        page: String,
        slice: String,
        code: String,
        message: String,
    },
    /// A superseded response arrived and was dropped
    Discarded {
        page: String,
        slice: String,
        generation: u64,
    },
}

/// Events about the comparison set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CompareEvent {
    Added { vehicle_id: String },
    Removed { vehicle_id: String },
    /// The set was full and the vehicle was not added
    Rejected { vehicle_id: String },
}

/// Events about navigation between pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigationEvent {
    Navigated { from: Option<String>, to: String },
}

/// Top-level event that wraps page, compare and navigation events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortalEvent {
    Page(PageEvent),
    Compare(CompareEvent),
    Navigation(NavigationEvent),
}

impl PortalEvent {
    pub fn event_kind(&self) -> &str {
        match self {
            PortalEvent::Page(_) => "page",
            PortalEvent::Compare(_) => "compare",
            PortalEvent::Navigation(_) => "navigation",
        }
    }

    /// Get the page this event relates to (if applicable)
    pub fn page(&self) -> Option<&str> {
        match self {
            PortalEvent::Page(e) => match e {
                PageEvent::Loaded { page }
                | PageEvent::Updated { page, .. }
                | PageEvent::FetchFailed { page, .. }
                | PageEvent::Discarded { page, .. } => Some(page),
            },
            PortalEvent::Navigation(NavigationEvent::Navigated { to, .. }) => Some(to),
            PortalEvent::Compare(_) => None,
        }
    }

    /// Get the action name
    pub fn action(&self) -> &str {
        match self {
            PortalEvent::Page(e) => match e {
                PageEvent::Loaded { .. } => "loaded",
                PageEvent::Updated { .. } => "updated",
                PageEvent::FetchFailed { .. } => "fetch_failed",
                PageEvent::Discarded { .. } => "discarded",
            },
            PortalEvent::Compare(e) => match e {
                CompareEvent::Added { .. } => "added",
                CompareEvent::Removed { .. } => "removed",
                CompareEvent::Rejected { .. } => "rejected",
            },
            PortalEvent::Navigation(_) => "navigated",
        }
    }

    pub(crate) fn fetch_failed(page: &str, slice: &str, err: &PortalError) -> Self {
        PortalEvent::Page(PageEvent::FetchFailed {
            page: page.to_string(),
            slice: slice.to_string(),
            code: err.error_code().to_string(),
            message: err.to_string(),
        })
    }
}

/// Envelope wrapping a portal event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: PortalEvent,
}

impl EventEnvelope {
    pub fn new(event: PortalEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone (Arc internally); every page holds a clone.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Slow receivers that fall more than `capacity` events behind get a
    /// `Lagged` error on their next `recv()`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. Returns the number of receivers that will see the event.
    pub fn publish(&self, event: PortalEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() returns Err only if there are no receivers, which is fine
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
