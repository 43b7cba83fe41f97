//! Aggregated EV news

use super::PageContext;
use crate::client::{NewsArticle, NewsCategories, NewsFeed, NewsSource, NewsSources};
use crate::core::events::EventBus;
use crate::core::query::NewsQuery;
use crate::sync::{Generation, QuerySynchronizer};
use std::sync::Arc;

const FILTERS: &str = "filters";
const FEED: &str = "feed";

pub struct NewsPage {
    ctx: PageContext,
    source: Arc<dyn NewsSource>,

    query: NewsQuery,
    filters: Option<(NewsSources, NewsCategories)>,
    feed: Option<NewsFeed>,

    filters_sync: QuerySynchronizer<(NewsSources, NewsCategories)>,
    feed_sync: QuerySynchronizer<NewsFeed>,
}

impl NewsPage {
    pub fn open(source: Arc<dyn NewsSource>, bus: EventBus) -> Self {
        let mut page = Self {
            ctx: PageContext::new("news", bus),
            source,
            query: NewsQuery::default(),
            filters: None,
            feed: None,
            filters_sync: QuerySynchronizer::new(FILTERS),
            feed_sync: QuerySynchronizer::new(FEED),
        };

        let source = Arc::clone(&page.source);
        page.filters_sync.issue(async move {
            futures::try_join!(source.news_sources(), source.news_categories())
        });
        page.fetch_feed(false);
        page
    }

    pub fn query(&self) -> &NewsQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: NewsQuery) -> Generation {
        self.query = NewsQuery {
            refresh: false,
            ..query
        };
        self.fetch_feed(false)
    }

    pub fn set_region(&mut self, region: Option<String>) -> Generation {
        self.query.region = region;
        self.fetch_feed(false)
    }

    pub fn set_category(&mut self, category: Option<String>) -> Generation {
        self.query.category = category;
        self.fetch_feed(false)
    }

    pub fn set_language(&mut self, language: Option<String>) -> Generation {
        self.query.language = language;
        self.fetch_feed(false)
    }

    /// Re-fetch the feed for the current filters, bypassing the service cache
    ///
    /// Only this request carries `refresh=true`; later filter changes do not.
    pub fn refresh(&mut self) -> Generation {
        self.fetch_feed(true)
    }

    fn fetch_feed(&mut self, force: bool) -> Generation {
        let source = Arc::clone(&self.source);
        let query = if force {
            self.query.forced()
        } else {
            self.query.clone()
        };
        self.feed_sync.issue(async move { source.news(&query).await })
    }

    pub fn articles(&self) -> &[NewsArticle] {
        self.feed
            .as_ref()
            .map(|feed| feed.articles.as_slice())
            .unwrap_or_default()
    }

    pub fn feed(&self) -> Option<&NewsFeed> {
        self.feed.as_ref()
    }

    pub fn sources(&self) -> Option<&NewsSources> {
        self.filters.as_ref().map(|(sources, _)| sources)
    }

    pub fn categories(&self) -> Option<&NewsCategories> {
        self.filters.as_ref().map(|(_, categories)| categories)
    }

    pub fn is_loading(&self) -> bool {
        self.feed_sync.is_loading()
    }

    pub async fn pump(&mut self) -> bool {
        tokio::select! {
            Some(outcome) = self.filters_sync.next() => {
                if let Some(filters) = self.ctx.accept(FILTERS, outcome) {
                    self.filters = Some(filters);
                }
            }
            Some(outcome) = self.feed_sync.next() => {
                if let Some(feed) = self.ctx.accept(FEED, outcome) {
                    let first = self.feed.is_none();
                    self.feed = Some(feed);
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
        self.filters_sync.close();
        self.feed_sync.close();
    }
}
