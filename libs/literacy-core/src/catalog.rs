//! Simple content listings: random samples, milestone sets, collection
//! pages and the token-exclusion helper.

use serde::Serialize;

use crate::error::Result;
use crate::filter::ContentFilter;
use crate::matcher::clusters;
use crate::predicate::{build_complexity_predicate, build_level_predicate};
use crate::rules::RuleRegistry;
use crate::store::ContentRepository;
use crate::types::{ComplexityLevel, ContentItem, ContentType, Level};

/// Items scanned by [`content_without_tokens`] before giving up.
const TOKEN_EXCLUSION_SCAN: usize = 500;

/// Random items of one type with a variant in `language`.
pub async fn random_content(
    repo: &dyn ContentRepository,
    language: &str,
    content_type: ContentType,
    limit: usize,
) -> Result<Vec<ContentItem>> {
    let filter = ContentFilter::new()
        .with_content_type(content_type)
        .with_language(language);
    repo.sample_random(&filter, limit).await
}

/// Random items at a level and within any of the complexity bands. No
/// relaxation; an empty sample is a valid answer.
pub async fn milestone_content(
    repo: &dyn ContentRepository,
    rules: &RuleRegistry,
    level: Option<Level>,
    complexity: &[ComplexityLevel],
    language: &str,
    content_type: ContentType,
    limit: usize,
) -> Result<Vec<ContentItem>> {
    let level_any = level
        .and_then(|level| build_level_predicate(rules, level, content_type, language))
        .into_iter()
        .collect();
    let filter = ContentFilter::new()
        .with_content_type(content_type)
        .with_language(language)
        .with_level_any(level_any)
        .with_complexity_any(build_complexity_predicate(rules, complexity, content_type, language));
    repo.sample_random(&filter, limit).await
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub items: Vec<ContentItem>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// One page of a collection in `content_index` order. Pages start at 1;
/// page 0 is read as page 1.
pub async fn paginate_collection(
    repo: &dyn ContentRepository,
    collection_id: &str,
    content_type: Option<ContentType>,
    page: usize,
    limit: usize,
) -> Result<Page> {
    let page = page.max(1);
    let skip = (page - 1).saturating_mul(limit);
    let (items, total) = repo
        .list_by_collection(collection_id, content_type, skip, limit)
        .await?;
    Ok(Page {
        items,
        total,
        page,
        limit,
    })
}

/// Word items whose `language` text contains none of `tokens`, comparing
/// whole clusters so a consonant token does not match a vowel-signed form.
///
/// Legacy helper kept for older clients; new callers should use search.
pub async fn content_without_tokens(
    repo: &dyn ContentRepository,
    tokens: &[String],
    language: &str,
    limit: usize,
) -> Result<Vec<ContentItem>> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let candidates = repo
        .list_by_language(language, Some(ContentType::Word), TOKEN_EXCLUSION_SCAN)
        .await?;
    Ok(candidates
        .into_iter()
        .filter(|item| {
            item.variant(language).is_some_and(|variant| {
                !clusters(variant.normalized_text())
                    .iter()
                    .any(|cluster| tokens.iter().any(|token| token == cluster))
            })
        })
        .take(limit)
        .collect())
}
