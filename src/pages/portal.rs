//! Navigation shell owning the active page

use super::{
    CostPage, DashboardPage, HomePage, KnowledgePage, NewsPage, RangePage, Route, VehiclePage,
};
use crate::client::{Health, HttpDataService, RemoteDataService, RemoteResult};
use crate::config::PortalConfig;
use crate::core::events::{EventBus, NavigationEvent, PortalEvent};
use std::fmt;
use std::sync::Arc;

/// The page currently shown
pub enum ActivePage {
    Home(HomePage),
    Dashboard(DashboardPage),
    Vehicles(VehiclePage),
    Range(RangePage),
    Knowledge(KnowledgePage),
    Cost(CostPage),
    News(NewsPage),
}

impl ActivePage {
    pub fn route(&self) -> Route {
        match self {
            ActivePage::Home(_) => Route::Home,
            ActivePage::Dashboard(_) => Route::Dashboard,
            ActivePage::Vehicles(_) => Route::Vehicles,
            ActivePage::Range(_) => Route::Range,
            ActivePage::Knowledge(_) => Route::Knowledge,
            ActivePage::Cost(_) => Route::Cost,
            ActivePage::News(_) => Route::News,
        }
    }

    pub async fn pump(&mut self) -> bool {
        match self {
            ActivePage::Home(page) => page.pump().await,
            ActivePage::Dashboard(page) => page.pump().await,
            ActivePage::Vehicles(page) => page.pump().await,
            ActivePage::Range(page) => page.pump().await,
            ActivePage::Knowledge(page) => page.pump().await,
            ActivePage::Cost(page) => page.pump().await,
            ActivePage::News(page) => page.pump().await,
        }
    }

    pub async fn settle(&mut self) {
        while self.pump().await {}
    }

    pub fn close(&mut self) {
        match self {
            ActivePage::Home(page) => page.close(),
            ActivePage::Dashboard(page) => page.close(),
            ActivePage::Vehicles(page) => page.close(),
            ActivePage::Range(page) => page.close(),
            ActivePage::Knowledge(page) => page.close(),
            ActivePage::Cost(page) => page.close(),
            ActivePage::News(page) => page.close(),
        }
    }

    pub fn as_home_mut(&mut self) -> Option<&mut HomePage> {
        match self {
            ActivePage::Home(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_dashboard_mut(&mut self) -> Option<&mut DashboardPage> {
        match self {
            ActivePage::Dashboard(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_vehicles_mut(&mut self) -> Option<&mut VehiclePage> {
        match self {
            ActivePage::Vehicles(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_range_mut(&mut self) -> Option<&mut RangePage> {
        match self {
            ActivePage::Range(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_knowledge_mut(&mut self) -> Option<&mut KnowledgePage> {
        match self {
            ActivePage::Knowledge(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_cost_mut(&mut self) -> Option<&mut CostPage> {
        match self {
            ActivePage::Cost(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_news_mut(&mut self) -> Option<&mut NewsPage> {
        match self {
            ActivePage::News(page) => Some(page),
            _ => None,
        }
    }
}

impl fmt::Debug for ActivePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActivePage").field(&self.route()).finish()
    }
}

/// Owns the data service, the event bus and at most one live page
///
/// # Example
///
/// ```ignore
/// let config = PortalConfig::from_yaml_file("portal.yaml")?.with_env_overrides()?;
/// let mut portal = Portal::from_config(&config)?;
///
/// portal.navigate(Route::Vehicles);
/// portal.settle().await;
/// ```
pub struct Portal<S> {
    service: Arc<S>,
    bus: EventBus,
    active: Option<ActivePage>,
}

impl Portal<HttpDataService> {
    /// Portal backed by the HTTP client described in `config`
    pub fn from_config(config: &PortalConfig) -> RemoteResult<Self> {
        let service = HttpDataService::new(&config.api)?;
        tracing::info!(base_url = %service.base_url(), "Portal configured");
        Ok(Self::new(service, EventBus::default()))
    }
}

impl<S: RemoteDataService + 'static> Portal<S> {
    pub fn new(service: S, bus: EventBus) -> Self {
        Self::with_shared(Arc::new(service), bus)
    }

    pub fn with_shared(service: Arc<S>, bus: EventBus) -> Self {
        Self {
            service,
            bus,
            active: None,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub fn current_route(&self) -> Option<Route> {
        self.active.as_ref().map(ActivePage::route)
    }

    pub fn page(&self) -> Option<&ActivePage> {
        self.active.as_ref()
    }

    pub fn page_mut(&mut self) -> Option<&mut ActivePage> {
        self.active.as_mut()
    }

    /// Switch to `route`
    ///
    /// The previous page is torn down first: its in-flight requests are
    /// abandoned and their results never reach any state. The new page starts
    /// with fresh state (an empty comparison set included), even when the
    /// route is the one already shown.
    pub fn navigate(&mut self, route: Route) -> &mut ActivePage {
        let from = self.active.take().map(|mut page| {
            page.close();
            page.route()
        });

        let page = self.build(route);

        tracing::info!(
            from = from.map(|r| r.page_name()).unwrap_or("-"),
            to = route.page_name(),
            "Navigated"
        );
        self.bus
            .publish(PortalEvent::Navigation(NavigationEvent::Navigated {
                from: from.map(|r| r.page_name().to_string()),
                to: route.page_name().to_string(),
            }));

        self.active.insert(page)
    }

    /// Navigate by path, see [`Route::from_path`]
    pub fn open_path(&mut self, path: &str) -> &mut ActivePage {
        self.navigate(Route::from_path(path))
    }

    /// Apply completions on the active page until nothing is in flight
    pub async fn settle(&mut self) {
        if let Some(page) = self.active.as_mut() {
            page.settle().await;
        }
    }

    /// Tear down the active page without opening another
    pub fn close(&mut self) {
        if let Some(mut page) = self.active.take() {
            page.close();
        }
    }

    pub async fn check_health(&self) -> RemoteResult<Health> {
        let health = self.service.health().await?;
        if !health.is_healthy() {
            tracing::warn!(status = %health.status, "Data service reports degraded health");
        }
        Ok(health)
    }

    fn build(&self, route: Route) -> ActivePage {
        let bus = self.bus.clone();
        match route {
            Route::Home => ActivePage::Home(HomePage::open(self.service.clone(), bus)),
            Route::Dashboard => ActivePage::Dashboard(DashboardPage::open(
                self.service.clone(),
                self.service.clone(),
                self.service.clone(),
                bus,
            )),
            Route::Vehicles => ActivePage::Vehicles(VehiclePage::open(self.service.clone(), bus)),
            Route::Range => ActivePage::Range(RangePage::open(
                self.service.clone(),
                self.service.clone(),
                bus,
            )),
            Route::Knowledge => {
                ActivePage::Knowledge(KnowledgePage::open(self.service.clone(), bus))
            }
            Route::Cost => ActivePage::Cost(CostPage::open(self.service.clone(), bus)),
            Route::News => ActivePage::News(NewsPage::open(self.service.clone(), bus)),
        }
    }
}
