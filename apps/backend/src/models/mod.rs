//! API request and response types

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

// Re-export shared types from literacy-core
pub use literacy_core::search::{FilterSearchRequest, FilterSearchResult, SearchResult};
pub use literacy_core::{
    Classification, ComplexityLevel, ContentItem, ContentSourceVariant, ContentType, GraphemeMap,
    Level, Page,
};

/// Largest `limit` a single request may ask for.
pub const MAX_LIMIT: usize = 100;

fn default_language() -> String {
    "ta".to_string()
}

fn default_content_type() -> ContentType {
    ContentType::Word
}

fn default_limit() -> usize {
    5
}

fn default_page() -> usize {
    1
}

pub fn check_limit(limit: usize) -> Result<usize> {
    if limit > MAX_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit {limit} exceeds the maximum of {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

/// Parse an optional level label; blank means no level.
fn parse_level(raw: Option<&str>) -> Result<Option<Level>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(label) => Ok(Some(label.parse()?)),
        None => Ok(None),
    }
}

fn parse_complexity(raw: &[String]) -> Result<Vec<ComplexityLevel>> {
    raw.iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<ComplexityLevel>().map_err(ApiError::from))
        .collect()
}

// === Search ===

/// POST /v1/content/search body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    #[serde(default, alias = "tokenArr")]
    pub tokens: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_content_type")]
    pub content_type: ContentType,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, alias = "cLevel")]
    pub level: Option<String>,
    #[serde(default, alias = "complexityLevel")]
    pub complexity: Vec<String>,
    #[serde(default, alias = "graphemesMappedObj")]
    pub grapheme_map: GraphemeMap,
}

impl SearchPayload {
    pub fn into_request(self, timeout: Option<Duration>) -> Result<literacy_core::SearchRequest> {
        let limit = check_limit(self.limit)?;
        let level = parse_level(self.level.as_deref())?;
        let complexity = parse_complexity(&self.complexity)?;
        Ok(
            literacy_core::SearchRequest::new(self.language, self.content_type, limit)
                .with_tokens(self.tokens)
                .with_required_tags(self.tags)
                .with_level(level)
                .with_complexity(complexity)
                .with_grapheme_map(self.grapheme_map)
                .with_deadline(timeout.map(|t| Instant::now() + t)),
        )
    }
}

// === Catalog ===

/// POST /v1/content/milestone body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePayload {
    #[serde(default, alias = "cLevel")]
    pub level: Option<String>,
    #[serde(default, alias = "complexityLevel")]
    pub complexity: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_content_type")]
    pub content_type: ContentType,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl MilestonePayload {
    pub fn level(&self) -> Result<Option<Level>> {
        parse_level(self.level.as_deref())
    }

    pub fn complexity(&self) -> Result<Vec<ComplexityLevel>> {
        parse_complexity(&self.complexity)
    }
}

/// GET /v1/content/random query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomQuery {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_content_type", alias = "type")]
    pub content_type: ContentType,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// GET /v1/content query
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub collection_id: String,
    #[serde(default, alias = "type")]
    pub content_type: Option<ContentType>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// POST /v1/content/without-tokens body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithoutTokensPayload {
    #[serde(alias = "tokenArr")]
    pub tokens: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<ContentItem>,
}

// === Classification ===

/// POST /v1/classify body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyPayload {
    pub content_type: ContentType,
    /// Text and precomputed metrics; its `language` selects the rule table.
    pub metrics: ContentSourceVariant,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub level: Option<Level>,
    pub complexity: Option<ComplexityLevel>,
    /// Every level whose rule matched, in table order.
    pub matching_levels: Vec<Level>,
    pub rules_version: u32,
}

/// POST /v1/content response
#[derive(Debug, Clone, Serialize)]
pub struct CreateContentResponse {
    pub item: ContentItem,
    pub classification: Classification,
}
