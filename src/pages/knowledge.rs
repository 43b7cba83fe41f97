//! Knowledge base: articles, glossary and myths

use super::PageContext;
use crate::client::{
    ArticleList, Glossary, GlossaryTerm, KnowledgeArticle, KnowledgeCategories,
    KnowledgeCategory, KnowledgeSource, MythFact, MythList,
};
use crate::core::error::PortalError;
use crate::core::events::EventBus;
use crate::sync::{Generation, QuerySynchronizer};
use indexmap::IndexMap;
use std::sync::Arc;

const REFERENCE: &str = "reference";
const ARTICLES: &str = "articles";
const ARTICLE: &str = "article";

/// Glossary terms that do not start with a letter are grouped here
pub const NON_ALPHA_GROUP: char = '#';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeReference {
    pub categories: KnowledgeCategories,
    pub glossary: Glossary,
    pub myths: MythList,
}

pub struct KnowledgePage {
    ctx: PageContext,
    source: Arc<dyn KnowledgeSource>,

    selected_category: Option<String>,
    reference: Option<KnowledgeReference>,
    articles: Option<ArticleList>,
    article: Option<KnowledgeArticle>,

    reference_sync: QuerySynchronizer<KnowledgeReference>,
    articles_sync: QuerySynchronizer<ArticleList>,
    article_sync: QuerySynchronizer<KnowledgeArticle>,
}

impl KnowledgePage {
    pub fn open(source: Arc<dyn KnowledgeSource>, bus: EventBus) -> Self {
        let mut reference_sync: QuerySynchronizer<KnowledgeReference> =
            QuerySynchronizer::new(REFERENCE);
        let reference_source = Arc::clone(&source);
        reference_sync.issue(async move {
            let (categories, glossary, myths) = futures::try_join!(
                reference_source.knowledge_categories(),
                reference_source.glossary(None),
                reference_source.myths()
            )?;
            Ok::<_, PortalError>(KnowledgeReference {
                categories,
                glossary,
                myths,
            })
        });

        let mut page = Self {
            ctx: PageContext::new("knowledge", bus),
            source,
            selected_category: None,
            reference: None,
            articles: None,
            article: None,
            reference_sync,
            articles_sync: QuerySynchronizer::new(ARTICLES),
            article_sync: QuerySynchronizer::new(ARTICLE),
        };
        page.fetch_articles();
        page
    }

    // =========================================================================
    // Articles
    // =========================================================================

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    /// Filter articles by category; `None` shows all of them
    pub fn select_category(&mut self, category: Option<String>) -> Generation {
        self.selected_category = category.filter(|c| !c.trim().is_empty());
        self.fetch_articles()
    }

    fn fetch_articles(&mut self) -> Generation {
        let source = Arc::clone(&self.source);
        let category = self.selected_category.clone();
        self.articles_sync.issue(async move { source.articles(category.as_deref()).await })
    }

    pub fn articles(&self) -> &[KnowledgeArticle] {
        self.articles
            .as_ref()
            .map(|list| list.articles.as_slice())
            .unwrap_or_default()
    }

    pub fn open_article(&mut self, slug: &str) -> Generation {
        let source = Arc::clone(&self.source);
        let slug = slug.to_string();
        self.article_sync.issue(async move { source.article(&slug).await })
    }

    pub fn article(&self) -> Option<&KnowledgeArticle> {
        self.article.as_ref()
    }

    /// Hide the open article, superseding any fetch still in flight
    pub fn close_article(&mut self) {
        self.article_sync.supersede();
        self.article = None;
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    pub fn categories(&self) -> &[KnowledgeCategory] {
        self.reference
            .as_ref()
            .map(|r| r.categories.categories.as_slice())
            .unwrap_or_default()
    }

    pub fn myths(&self) -> &[MythFact] {
        self.reference
            .as_ref()
            .map(|r| r.myths.myths.as_slice())
            .unwrap_or_default()
    }

    pub fn glossary(&self) -> &[GlossaryTerm] {
        self.reference
            .as_ref()
            .map(|r| r.glossary.terms.as_slice())
            .unwrap_or_default()
    }

    /// Terms sorted case-insensitively and grouped by initial letter
    pub fn glossary_by_letter(&self) -> IndexMap<char, Vec<&GlossaryTerm>> {
        let mut terms: Vec<&GlossaryTerm> = self.glossary().iter().collect();
        terms.sort_by_cached_key(|t| t.term.to_lowercase());

        let mut groups: IndexMap<char, Vec<&GlossaryTerm>> = IndexMap::new();
        for term in terms {
            groups.entry(initial(&term.term)).or_default().push(term);
        }
        groups
    }

    /// Case-insensitive match on term or definition; blank queries match all
    pub fn search_glossary(&self, query: &str) -> Vec<&GlossaryTerm> {
        let needle = query.trim().to_lowercase();
        self.glossary()
            .iter()
            .filter(|t| {
                needle.is_empty()
                    || t.term.to_lowercase().contains(&needle)
                    || t.definition.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // =========================================================================
    // Completions
    // =========================================================================

    pub async fn pump(&mut self) -> bool {
        tokio::select! {
            Some(outcome) = self.reference_sync.next() => {
                if let Some(reference) = self.ctx.accept(REFERENCE, outcome) {
                    self.reference = Some(reference);
                    self.ctx.loaded();
                }
            }
            Some(outcome) = self.articles_sync.next() => {
                if let Some(articles) = self.ctx.accept(ARTICLES, outcome) {
                    self.articles = Some(articles);
                }
            }
            Some(outcome) = self.article_sync.next() => {
                if let Some(article) = self.ctx.accept(ARTICLE, outcome) {
                    self.article = Some(article);
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
        self.reference_sync.close();
        self.articles_sync.close();
        self.article_sync.close();
    }
}

fn initial(term: &str) -> char {
    term.trim_start()
        .chars()
        .next()
        .filter(|c| c.is_alphabetic())
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or(NON_ALPHA_GROUP)
}
