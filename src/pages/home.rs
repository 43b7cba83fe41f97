//! Landing page with headline market figures

use super::PageContext;
use crate::client::{MarketSource, MarketStats};
use crate::core::events::EventBus;
use crate::sync::QuerySynchronizer;
use std::sync::Arc;

const STATS: &str = "stats";

pub struct HomePage {
    ctx: PageContext,
    stats: Option<MarketStats>,
    stats_sync: QuerySynchronizer<MarketStats>,
}

impl HomePage {
    pub fn open(source: Arc<dyn MarketSource>, bus: EventBus) -> Self {
        let mut stats_sync = QuerySynchronizer::new(STATS);
        stats_sync.issue(async move { source.market_stats().await });

        Self {
            ctx: PageContext::new("home", bus),
            stats: None,
            stats_sync,
        }
    }

    /// `None` until the stats arrive, and for good if they never do
    pub fn stats(&self) -> Option<&MarketStats> {
        self.stats.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.stats_sync.is_loading()
    }

    pub async fn pump(&mut self) -> bool {
        let Some(outcome) = self.stats_sync.next().await else {
            return false;
        };
        if let Some(stats) = self.ctx.accept(STATS, outcome) {
            self.stats = Some(stats);
            self.ctx.loaded();
        }
        true
    }

    pub async fn settle(&mut self) {
        while self.pump().await {}
    }

    pub fn close(&mut self) {
        self.stats_sync.close();
    }
}
