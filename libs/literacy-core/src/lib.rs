//! Core literacy-content library used by the content backend.
//!
//! Provides:
//! - Difficulty and complexity rule tables with per-language overrides
//! - Classification of precomputed text metrics into levels and bands
//! - Language-aware token matching (characters or phonemes)
//! - Progressive-relaxation token search over a content repository
//! - Exact-filter search, catalog listings and the ingestion seam
//! - Shared types (ContentItem, ContentSourceVariant, Level, etc.)

pub mod catalog;
pub mod classify;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod matcher;
pub mod predicate;
pub mod rules;
pub mod search;
pub mod store;
pub mod types;

pub use catalog::{content_without_tokens, milestone_content, paginate_collection, random_content, Page};
pub use classify::{classify, classify_item, Classification};
pub use error::{ContentError, Result};
pub use filter::ContentFilter;
pub use ingest::{enrich_item, TextMetrics, TextMetricsProvider};
pub use matcher::{matcher_for, GraphemeMap, TokenMatcher};
pub use predicate::{build_complexity_predicate, build_level_predicate};
pub use rules::{MetricField, MetricPredicate, NumericRange, RuleRegistry};
pub use search::{
    dedup_by_text, search_by_filter, FilterSearchRequest, FilterSearchResult, SearchEngine,
    SearchRequest, SearchResult, Stage,
};
pub use store::{ContentRepository, InMemoryContentRepository};
pub use types::{
    ComplexityLevel, ContentItem, ContentSourceVariant, ContentType, LanguageFamily, Level,
    MatchedContent,
};
