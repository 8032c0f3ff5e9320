//! Ingestion seam.
//!
//! Metrics are produced by an external text-analysis service and written
//! onto each variant once, before the item is stored. Query paths never
//! recompute them.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::classify::{classify_item, Classification};
use crate::error::{ContentError, Result};
use crate::rules::RuleRegistry;
use crate::types::{ContentItem, ContentSourceVariant};

/// Output of one text analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub word_count: u32,
    /// Cluster count (script languages) or syllables derived from
    /// phonemes (English).
    pub syllable_count: u32,
    #[serde(default)]
    pub syllable_count_map: BTreeMap<String, u32>,
    #[serde(default)]
    pub phonemes: Vec<String>,
    #[serde(default)]
    pub total_ortho_complexity: Option<f64>,
    #[serde(default)]
    pub total_phonic_complexity: Option<f64>,
    #[serde(default)]
    pub mean_complexity: Option<f64>,
    #[serde(default)]
    pub mean_phonic_complexity: Option<f64>,
}

impl TextMetrics {
    fn apply(self, variant: &mut ContentSourceVariant) {
        variant.word_count = self.word_count;
        variant.syllable_count = self.syllable_count;
        variant.syllable_count_map = self.syllable_count_map;
        variant.phonemes = self.phonemes;
        variant.total_ortho_complexity = self.total_ortho_complexity;
        variant.total_phonic_complexity = self.total_phonic_complexity;
        variant.mean_complexity = self.mean_complexity;
        variant.mean_phonic_complexity = self.mean_phonic_complexity;
    }
}

#[async_trait]
pub trait TextMetricsProvider: Send + Sync {
    async fn analyze(&self, text: &str, language: &str) -> Result<TextMetrics>;
}

/// Fill every variant's metrics from `provider` and classify the item.
///
/// Fails on the first provider error; the item is not partially updated.
pub async fn enrich_item(
    provider: &dyn TextMetricsProvider,
    rules: &RuleRegistry,
    mut item: ContentItem,
) -> Result<(ContentItem, Classification)> {
    if item.variants.is_empty() {
        return Err(ContentError::Metrics(format!(
            "content {} has no language variants",
            item.content_id
        )));
    }

    let mut analyzed: Vec<TextMetrics> = Vec::with_capacity(item.variants.len());
    for variant in &item.variants {
        analyzed.push(
            provider
                .analyze(variant.normalized_text(), &variant.language)
                .await?,
        );
    }
    for (variant, metrics) in item.variants.iter_mut().zip(analyzed) {
        metrics.apply(variant);
    }
    item.updated_at = chrono::Utc::now();

    let classification = classify_item(rules, &item);
    tracing::debug!(
        content_id = %item.content_id,
        level = ?classification.level,
        complexity = ?classification.complexity,
        "content enriched"
    );
    Ok((item, classification))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentType, Level};

    /// Counts characters as clusters and spaces as word breaks.
    struct CharCounter;

    #[async_trait]
    impl TextMetricsProvider for CharCounter {
        async fn analyze(&self, text: &str, _language: &str) -> Result<TextMetrics> {
            let words: Vec<&str> = text.split_whitespace().collect();
            Ok(TextMetrics {
                word_count: words.len() as u32,
                syllable_count: words.iter().map(|w| w.chars().count() as u32).sum(),
                syllable_count_map: words
                    .iter()
                    .map(|w| (w.to_string(), w.chars().count() as u32))
                    .collect(),
                ..Default::default()
            })
        }
    }

    struct Unavailable;

    #[async_trait]
    impl TextMetricsProvider for Unavailable {
        async fn analyze(&self, _text: &str, _language: &str) -> Result<TextMetrics> {
            Err(ContentError::Metrics("service unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn enrich_fills_metrics_and_classifies() {
        let item = ContentItem::new(ContentType::Word, ContentSourceVariant::new("ta", "abc"));
        let (item, classification) = enrich_item(&CharCounter, RuleRegistry::builtin(), item)
            .await
            .unwrap();
        let variant = item.variant("ta").unwrap();
        assert_eq!(variant.syllable_count, 3);
        assert_eq!(variant.word_count, 1);
        assert_eq!(classification.level, Some(Level::L2));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let item = ContentItem::new(ContentType::Word, ContentSourceVariant::new("ta", "abc"));
        let err = enrich_item(&Unavailable, RuleRegistry::builtin(), item)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Metrics(_)));
    }

    #[tokio::test]
    async fn item_without_variants_is_rejected() {
        let mut item = ContentItem::new(ContentType::Word, ContentSourceVariant::new("ta", "abc"));
        item.variants.clear();
        assert!(enrich_item(&CharCounter, RuleRegistry::builtin(), item)
            .await
            .is_err());
    }
}
