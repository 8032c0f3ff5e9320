//! In-memory [`ContentRepository`] for tests and small deployments.
//!
//! Items live in a `Vec` behind `std::sync::RwLock`. Every query is a
//! linear scan with [`ContentFilter::matches`].

use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::ContentRepository;
use crate::error::{ContentError, Result};
use crate::filter::ContentFilter;
use crate::types::{ContentItem, ContentType};

pub struct InMemoryContentRepository {
    items: RwLock<Vec<ContentItem>>,
    rng: Mutex<StdRng>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn from_items(items: Vec<ContentItem>) -> Self {
        Self {
            items: RwLock::new(items),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic sampling, for tests.
    pub fn with_seed(items: Vec<ContentItem>, seed: u64) -> Self {
        Self {
            items: RwLock::new(items),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned<T>(_: T) -> ContentError {
        ContentError::Repository("content store lock poisoned".to_string())
    }
}

impl Default for InMemoryContentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn sample_random(&self, filter: &ContentFilter, size: usize) -> Result<Vec<ContentItem>> {
        if size == 0 {
            return Ok(Vec::new());
        }
        let items = self.items.read().map_err(Self::poisoned)?;
        let pool: Vec<&ContentItem> = items.iter().filter(|item| filter.matches(item)).collect();

        let mut rng = self.rng.lock().map_err(Self::poisoned)?;
        Ok(pool
            .choose_multiple(&mut *rng, size)
            .map(|item| (*item).clone())
            .collect())
    }

    async fn count_matching(&self, filter: &ContentFilter) -> Result<usize> {
        let items = self.items.read().map_err(Self::poisoned)?;
        Ok(items.iter().filter(|item| filter.matches(item)).count())
    }

    async fn find_by_id(&self, content_id: &str) -> Result<Option<ContentItem>> {
        let items = self.items.read().map_err(Self::poisoned)?;
        Ok(items.iter().find(|item| item.content_id == content_id).cloned())
    }

    async fn find_by_ids(&self, content_ids: &[String]) -> Result<Vec<ContentItem>> {
        let items = self.items.read().map_err(Self::poisoned)?;
        Ok(content_ids
            .iter()
            .filter_map(|id| items.iter().find(|item| &item.content_id == id).cloned())
            .collect())
    }

    async fn list_by_collection(
        &self,
        collection_id: &str,
        content_type: Option<ContentType>,
        skip: usize,
        limit: usize,
    ) -> Result<(Vec<ContentItem>, usize)> {
        let items = self.items.read().map_err(Self::poisoned)?;
        let mut members: Vec<&ContentItem> = items
            .iter()
            .filter(|item| item.collection_id.as_deref() == Some(collection_id))
            .filter(|item| content_type.map_or(true, |ct| item.content_type == ct))
            .collect();
        members.sort_by_key(|item| item.content_index.unwrap_or(u32::MAX));

        let total = members.len();
        let page = members
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn list_by_language(
        &self,
        language: &str,
        content_type: Option<ContentType>,
        limit: usize,
    ) -> Result<Vec<ContentItem>> {
        let items = self.items.read().map_err(Self::poisoned)?;
        Ok(items
            .iter()
            .filter(|item| item.variant(language).is_some())
            .filter(|item| content_type.map_or(true, |ct| item.content_type == ct))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert(&self, item: ContentItem) -> Result<()> {
        let mut items = self.items.write().map_err(Self::poisoned)?;
        match items.iter_mut().find(|existing| existing.content_id == item.content_id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Ok(())
    }
}
