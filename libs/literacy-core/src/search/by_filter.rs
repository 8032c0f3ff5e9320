//! Exact-filter search: one sampling call, no relaxation.

use serde::{Deserialize, Serialize};

use super::dedup_by_text;
use crate::error::Result;
use crate::filter::ContentFilter;
use crate::matcher::{PhonemeMatcher, ScriptMatcher, TokenMatcher, TokenPattern, TokenPosition};
use crate::rules::{MetricField, MetricPredicate, NumericRange};
use crate::store::ContentRepository;
use crate::types::{ContentType, LanguageFamily, MatchedContent};

/// Caller-supplied exact constraints. Absent ranges do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSearchRequest {
    /// Characters (script languages) or phonemes (English).
    #[serde(alias = "syllableList")]
    pub tokens: Vec<String>,
    pub syllable_count: Option<NumericRange>,
    pub word_count: Option<NumericRange>,
    pub total_ortho_complexity: Option<NumericRange>,
    pub total_phonic_complexity: Option<NumericRange>,
    /// Applied to the mean phonic complexity score.
    #[serde(alias = "meanComplexity")]
    pub mean_phonic_complexity: Option<NumericRange>,
    pub language: String,
    pub content_type: Option<ContentType>,
    pub limit: usize,
    pub content_id: Option<String>,
    pub collection_id: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSearchResult {
    pub items: Vec<MatchedContent>,
}

impl FilterSearchRequest {
    pub fn new(language: impl Into<String>, content_type: ContentType, limit: usize) -> Self {
        Self {
            language: language.into(),
            content_type: Some(content_type),
            limit,
            ..Default::default()
        }
    }

    fn family(&self) -> LanguageFamily {
        LanguageFamily::of(&self.language)
    }

    fn metrics(&self) -> MetricPredicate {
        let mut metrics = MetricPredicate::new();
        let ranges = [
            (MetricField::SyllableCount, self.syllable_count),
            (MetricField::WordCount, self.word_count),
        ];
        for (field, range) in ranges {
            if let Some(range) = range {
                metrics = metrics.with(field, range);
            }
        }

        // English content carries no complexity scores.
        if self.family() == LanguageFamily::Script {
            let complexity = [
                (MetricField::TotalOrthoComplexity, self.total_ortho_complexity),
                (MetricField::TotalPhonicComplexity, self.total_phonic_complexity),
                (MetricField::MeanPhonicComplexity, self.mean_phonic_complexity),
            ];
            for (field, range) in complexity {
                if let Some(range) = range {
                    metrics = metrics.with(field, range);
                }
            }
        }
        metrics
    }

    pub fn filter(&self) -> Result<ContentFilter> {
        let mut filter = ContentFilter::new()
            .with_language(self.language.clone())
            .with_metrics(self.metrics())
            .with_required_tags(self.tags.clone());

        if let Some(content_type) = self.content_type {
            filter = filter.with_content_type(content_type);
        }
        if let Some(content_id) = &self.content_id {
            filter = filter.with_content_id(content_id.clone());
        }
        if let Some(collection_id) = &self.collection_id {
            filter = filter.with_collection_id(collection_id.clone());
        }

        Ok(match self.family() {
            LanguageFamily::Script => {
                filter.with_text(TokenPattern::new(TokenPosition::MidWord, &self.tokens)?)
            }
            LanguageFamily::Phonemic => filter.with_phonemes_any(self.tokens.clone()),
        })
    }
}

/// Sample up to `limit` items satisfying every supplied constraint.
pub async fn search_by_filter(
    repo: &dyn ContentRepository,
    request: &FilterSearchRequest,
) -> Result<FilterSearchResult> {
    let filter = request.filter()?;
    let sampled = repo.sample_random(&filter, request.limit).await?;

    let items: Vec<MatchedContent> = match request.family() {
        LanguageFamily::Script => {
            let matcher = ScriptMatcher::new(request.language.clone(), &request.tokens)?;
            sampled
                .into_iter()
                .map(|item| {
                    let matched = matcher.matched(&item);
                    MatchedContent::new(item, matched)
                })
                .collect()
        }
        LanguageFamily::Phonemic => {
            let matcher =
                PhonemeMatcher::new(request.language.clone(), &request.tokens, Default::default());
            sampled
                .into_iter()
                .map(|item| {
                    let matched = matcher.matched_phonemes(&item);
                    MatchedContent::new(item, matched)
                })
                .collect()
        }
    };

    let items = dedup_by_text(items, &request.language);
    tracing::debug!(
        language = %request.language,
        returned = items.len(),
        limit = request.limit,
        "filter search complete"
    );
    Ok(FilterSearchResult { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryContentRepository;
    use crate::types::{ContentItem, ContentSourceVariant};
    use pretty_assertions::assert_eq;

    fn scored(text: &str, ortho: f64) -> ContentItem {
        let variant = ContentSourceVariant {
            word_count: 1,
            syllable_count: 3,
            total_ortho_complexity: Some(ortho),
            total_phonic_complexity: Some(ortho * 5.0),
            ..ContentSourceVariant::new("ta", text)
        };
        ContentItem::new(ContentType::Word, variant)
    }

    #[tokio::test]
    async fn exact_range_returns_only_qualifying_items() {
        let repo = InMemoryContentRepository::with_seed(
            vec![
                scored("கடல்", 2.0),
                scored("மலர்", 8.0),
                scored("வீடு", 0.0),
                scored("பள்ளிக்கூடம்", 12.0),
                scored("ஆசிரியர்", 20.0),
            ],
            8,
        );
        let request = FilterSearchRequest {
            total_ortho_complexity: Some(NumericRange::between(0.0, 8.0)),
            ..FilterSearchRequest::new("ta", ContentType::Word, 5)
        };

        let result = search_by_filter(&repo, &request).await.unwrap();
        let mut texts: Vec<&str> = result.items.iter().map(|m| m.item.name.as_str()).collect();
        texts.sort();
        assert_eq!(texts, vec!["கடல்", "மலர்", "வீடு"]);
    }

    #[tokio::test]
    async fn script_tokens_match_mid_word_only() {
        let repo = InMemoryContentRepository::from_items(vec![
            scored("கடல்", 2.0),
            scored("மகன்", 2.0),
            scored("பாக்கு", 2.0),
        ]);
        let request = FilterSearchRequest {
            tokens: vec!["க".to_string()],
            ..FilterSearchRequest::new("ta", ContentType::Word, 5)
        };

        let result = search_by_filter(&repo, &request).await.unwrap();
        assert_eq!(result.items.len(), 2);
        assert!(result.items.iter().all(|m| m.item.name != "கடல்"));
        let paakku = result.items.iter().find(|m| m.item.name == "பாக்கு").unwrap();
        assert_eq!(paakku.matched_char, vec!["க".to_string()]);
    }

    #[tokio::test]
    async fn english_ignores_complexity_and_reports_phonemes() {
        let variant = ContentSourceVariant {
            word_count: 1,
            syllable_count: 3,
            phonemes: vec!["k".to_string(), "æ".to_string(), "t".to_string()],
            ..ContentSourceVariant::new("en", "cat")
        };
        let repo =
            InMemoryContentRepository::from_items(vec![ContentItem::new(ContentType::Word, variant)]);
        let request = FilterSearchRequest {
            tokens: vec!["k".to_string(), "s".to_string()],
            total_ortho_complexity: Some(NumericRange::between(0.0, 1.0)),
            ..FilterSearchRequest::new("en", ContentType::Char, 5)
        };

        let result = search_by_filter(&repo, &request).await.unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].matched_char, vec!["k".to_string()]);
    }

    #[test]
    fn accepts_original_field_names() {
        let raw = r#"{
            "syllableList": ["க"],
            "meanComplexity": { "$lte": 50 },
            "language": "ta",
            "contentType": "Sentence",
            "limit": 3
        }"#;
        let request: FilterSearchRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.tokens, vec!["க".to_string()]);
        assert_eq!(request.mean_phonic_complexity, Some(NumericRange::at_most(50.0)));
        assert_eq!(request.content_type, Some(ContentType::Sentence));
    }
}
