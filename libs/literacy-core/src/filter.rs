//! Repository filter shared by every query path.
//!
//! A filter is an immutable value. Relaxation stages derive new filters
//! from old ones with the `with_*`/`without_*` builders, so a stage never
//! observes another stage's edits.

use std::collections::BTreeSet;

use crate::matcher::TokenPattern;
use crate::rules::MetricPredicate;
use crate::types::{ContentItem, ContentSourceVariant, ContentType};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFilter {
    pub content_type: Option<ContentType>,
    /// Variant language every variant-level check is evaluated against.
    pub language: Option<String>,
    pub text: Option<TokenPattern>,
    /// Variant must carry at least one of these phonemes.
    pub phonemes_any: Vec<String>,
    /// Variant must satisfy at least one level predicate.
    pub level_any: Vec<MetricPredicate>,
    /// Variant must satisfy at least one complexity predicate.
    pub complexity_any: Vec<MetricPredicate>,
    /// Exact metric constraints from a caller-supplied filter.
    pub metrics: MetricPredicate,
    pub required_tags: Vec<String>,
    pub content_id: Option<String>,
    pub collection_id: Option<String>,
    pub excluded_ids: BTreeSet<String>,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type.storage_type());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_text(mut self, pattern: Option<TokenPattern>) -> Self {
        self.text = pattern;
        self
    }

    pub fn with_phonemes_any(mut self, phonemes: Vec<String>) -> Self {
        self.phonemes_any = phonemes;
        self
    }

    pub fn with_level_any(mut self, predicates: Vec<MetricPredicate>) -> Self {
        self.level_any = predicates;
        self
    }

    pub fn with_complexity_any(mut self, predicates: Vec<MetricPredicate>) -> Self {
        self.complexity_any = predicates;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricPredicate) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_required_tags(mut self, tags: Vec<String>) -> Self {
        self.required_tags = tags;
        self
    }

    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    pub fn with_collection_id(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_id = Some(collection_id.into());
        self
    }

    pub fn with_excluded_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.excluded_ids.extend(ids);
        self
    }

    /// Drop token constraints (text pattern and phonemes).
    pub fn without_tokens(mut self) -> Self {
        self.text = None;
        self.phonemes_any.clear();
        self
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        if self.excluded_ids.contains(&item.content_id) {
            return false;
        }
        if let Some(content_type) = self.content_type {
            if item.content_type != content_type {
                return false;
            }
        }
        if let Some(content_id) = &self.content_id {
            if &item.content_id != content_id {
                return false;
            }
        }
        if let Some(collection_id) = &self.collection_id {
            if item.collection_id.as_ref() != Some(collection_id) {
                return false;
            }
        }
        if !item.has_all_tags(&self.required_tags) {
            return false;
        }

        item.variants
            .iter()
            .any(|variant| self.matches_variant(variant))
    }

    fn matches_variant(&self, variant: &ContentSourceVariant) -> bool {
        if let Some(language) = &self.language {
            if &variant.language != language {
                return false;
            }
        }
        if let Some(pattern) = &self.text {
            if !pattern.is_match(&variant.text) {
                return false;
            }
        }
        if !self.phonemes_any.is_empty()
            && !variant
                .phonemes
                .iter()
                .any(|p| self.phonemes_any.contains(p))
        {
            return false;
        }
        if !self.level_any.is_empty() && !self.level_any.iter().any(|p| p.matches(variant)) {
            return false;
        }
        if !self.complexity_any.is_empty()
            && !self.complexity_any.iter().any(|p| p.matches(variant))
        {
            return false;
        }
        self.metrics.matches(variant)
    }
}
