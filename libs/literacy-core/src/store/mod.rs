//! Content repository abstraction.
//!
//! Search and catalog code only talk to [`ContentRepository`], so the
//! backing store (in-memory, a document database) is pluggable.
//! Implementations must be `Send + Sync` to be shared across requests.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::filter::ContentFilter;
use crate::types::{ContentItem, ContentType};

pub use memory::InMemoryContentRepository;

/// Abstract content store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`sample_random`](ContentRepository::sample_random) | Uniform random sample of matching items |
/// | [`count_matching`](ContentRepository::count_matching) | Size of the matching pool |
/// | [`find_by_id`](ContentRepository::find_by_id) | Single item lookup |
/// | [`find_by_ids`](ContentRepository::find_by_ids) | Batch lookup, order preserved |
/// | [`list_by_collection`](ContentRepository::list_by_collection) | Paged collection listing |
/// | [`list_by_language`](ContentRepository::list_by_language) | Items with a variant in a language, optionally of one type |
/// | [`insert`](ContentRepository::insert) | Add or replace an item |
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Up to `size` distinct items matching `filter`, sampled without
    /// replacement. Returns fewer when the pool is smaller.
    async fn sample_random(&self, filter: &ContentFilter, size: usize) -> Result<Vec<ContentItem>>;

    async fn count_matching(&self, filter: &ContentFilter) -> Result<usize>;

    async fn find_by_id(&self, content_id: &str) -> Result<Option<ContentItem>>;

    /// Items for the ids that exist, in the order requested.
    async fn find_by_ids(&self, content_ids: &[String]) -> Result<Vec<ContentItem>>;

    /// Items of a collection ordered by `content_index`, then a page of them.
    async fn list_by_collection(
        &self,
        collection_id: &str,
        content_type: Option<ContentType>,
        skip: usize,
        limit: usize,
    ) -> Result<(Vec<ContentItem>, usize)>;

    /// Up to `limit` items with a variant in `language`. The type filter
    /// applies before the limit.
    async fn list_by_language(
        &self,
        language: &str,
        content_type: Option<ContentType>,
        limit: usize,
    ) -> Result<Vec<ContentItem>>;

    /// Insert an item, replacing any item with the same id.
    async fn insert(&self, item: ContentItem) -> Result<()>;
}
