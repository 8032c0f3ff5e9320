//! Progressive token search.
//!
//! A request names tokens to emphasise plus difficulty constraints. The
//! engine samples from the repository under the full constraints and then
//! walks the relaxation [`Stage`]s in order until `limit` items are
//! collected or the stages run out. Collected items are never dropped by
//! a later stage; each stage only tops up the shortfall.

pub mod by_filter;
pub mod stages;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Instant;

use serde::Serialize;

use crate::error::Result;
use crate::filter::ContentFilter;
use crate::matcher::{matcher_for, GraphemeMap, TokenMatcher, TokenPattern, TokenPosition};
use crate::predicate::{build_complexity_predicate, build_level_predicate};
use crate::rules::{MetricField, MetricPredicate, NumericRange, RuleRegistry};
use crate::store::ContentRepository;
use crate::types::{ComplexityLevel, ContentItem, ContentType, LanguageFamily, Level, MatchedContent};

pub use by_filter::{search_by_filter, FilterSearchRequest, FilterSearchResult};
pub use stages::{Stage, StageContext, StagePlan};

/// Sample size of the per-token top-up for tokens nothing matched.
pub const TOKEN_TOP_UP_SIZE: usize = 2;

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub tokens: Vec<String>,
    pub language: String,
    pub content_type: ContentType,
    pub limit: usize,
    pub required_tags: Vec<String>,
    pub level: Option<Level>,
    pub complexity: Vec<ComplexityLevel>,
    /// Phoneme -> grapheme spellings, English only.
    pub grapheme_map: GraphemeMap,
    /// Remaining stages are skipped once this passes.
    pub deadline: Option<Instant>,
}

impl SearchRequest {
    pub fn new(language: impl Into<String>, content_type: ContentType, limit: usize) -> Self {
        Self {
            tokens: Vec::new(),
            language: language.into(),
            content_type,
            limit,
            required_tags: Vec::new(),
            level: None,
            complexity: Vec::new(),
            grapheme_map: GraphemeMap::new(),
            deadline: None,
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<String>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_required_tags(mut self, tags: Vec<String>) -> Self {
        self.required_tags = tags;
        self
    }

    pub fn with_level(mut self, level: Option<Level>) -> Self {
        self.level = level;
        self
    }

    pub fn with_complexity(mut self, complexity: Vec<ComplexityLevel>) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_grapheme_map(mut self, grapheme_map: GraphemeMap) -> Self {
        self.grapheme_map = grapheme_map;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub items: Vec<MatchedContent>,
    /// Every requested token, mapped to the items that matched it.
    pub content_for_token: BTreeMap<String, Vec<MatchedContent>>,
    /// Stages that sampled, in order.
    pub stages: Vec<Stage>,
    /// Set when the deadline cut the relaxation short.
    pub truncated: bool,
}

/// Items collected so far. Threaded through the stages by value.
#[derive(Debug, Default)]
struct Accumulator {
    items: Vec<MatchedContent>,
    seen_ids: BTreeSet<String>,
    seen_texts: HashSet<String>,
    stages: Vec<Stage>,
}

impl Accumulator {
    fn shortfall(&self, limit: usize) -> usize {
        limit.saturating_sub(self.items.len())
    }

    /// Add an item unless its text in `language` was already collected.
    /// Returns whether the item was kept.
    fn push(&mut self, item: ContentItem, language: &str, matcher: &dyn TokenMatcher) -> bool {
        self.seen_ids.insert(item.content_id.clone());
        let texts = variant_texts(&item, language);
        if texts.iter().any(|text| self.seen_texts.contains(text)) {
            return false;
        }
        self.seen_texts.extend(texts);
        let matched = matcher.matched(&item);
        self.items.push(MatchedContent::new(item, matched));
        true
    }
}

/// Trimmed texts of every variant in `language`.
fn variant_texts(item: &ContentItem, language: &str) -> Vec<String> {
    item.variants
        .iter()
        .filter(|variant| variant.language == language)
        .map(|variant| variant.normalized_text().to_string())
        .collect()
}

/// Keep the first item for each normalized text in `language`. Stable
/// and idempotent.
pub fn dedup_by_text(items: Vec<MatchedContent>, language: &str) -> Vec<MatchedContent> {
    let mut seen: HashSet<String> = HashSet::new();
    items
        .into_iter()
        .filter(|matched| {
            let texts = variant_texts(&matched.item, language);
            if texts.iter().any(|text| seen.contains(text)) {
                return false;
            }
            seen.extend(texts);
            true
        })
        .collect()
}

pub struct SearchEngine<'a> {
    repo: &'a dyn ContentRepository,
    rules: &'a RuleRegistry,
}

impl<'a> SearchEngine<'a> {
    pub fn new(repo: &'a dyn ContentRepository, rules: &'a RuleRegistry) -> Self {
        Self { repo, rules }
    }

    /// Build the stage constraints for a request.
    pub fn stage_context(&self, request: &SearchRequest) -> StageContext {
        let family = LanguageFamily::of(&request.language);
        let base = ContentFilter::new()
            .with_content_type(request.content_type)
            .with_language(request.language.clone())
            .with_required_tags(request.required_tags.clone());

        let level: Vec<MetricPredicate> = match request.level {
            Some(level) => {
                build_level_predicate(self.rules, level, request.content_type, &request.language)
                    .into_iter()
                    .collect()
            }
            None if request.content_type == ContentType::Char && family == LanguageFamily::Script => {
                vec![MetricPredicate::new().with(MetricField::SyllableCount, NumericRange::eq(2.0))]
            }
            None => Vec::new(),
        };

        let demoted_level = request
            .level
            .and_then(Level::previous)
            .and_then(|previous| {
                build_level_predicate(self.rules, previous, request.content_type, &request.language)
            })
            .filter(|_| !level.is_empty())
            .map(|previous| {
                let mut widened = level.clone();
                if !widened.contains(&previous) {
                    widened.push(previous);
                }
                widened
            });

        let complexity = build_complexity_predicate(
            self.rules,
            &request.complexity,
            request.content_type,
            &request.language,
        );

        StageContext {
            family,
            limit: request.limit,
            base,
            tokens: request.tokens.clone(),
            level,
            demoted_level,
            complexity,
        }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let matcher = matcher_for(&request.language, &request.tokens, &request.grapheme_map)?;
        if request.limit == 0 {
            return Ok(SearchResult {
                content_for_token: request
                    .tokens
                    .iter()
                    .map(|token| (token.clone(), Vec::new()))
                    .collect(),
                ..Default::default()
            });
        }

        let context = self.stage_context(request);
        let mut acc = Accumulator::default();
        let mut truncated = false;

        for plan in context.plans()? {
            if acc.shortfall(request.limit) == 0 {
                break;
            }
            if request.expired() {
                tracing::warn!(
                    stage = plan.stage.as_str(),
                    collected = acc.items.len(),
                    limit = request.limit,
                    "search deadline passed, returning partial result"
                );
                truncated = true;
                break;
            }
            acc = self.run_stage(acc, &plan, request, matcher.as_ref()).await?;
        }

        let expired = request.expired();
        truncated |= expired && acc.shortfall(request.limit) > 0;

        let items = dedup_by_text(acc.items, &request.language);
        let content_for_token = self
            .partition(&items, &context, request, matcher.as_ref(), !expired)
            .await?;

        tracing::debug!(
            language = %request.language,
            content_type = %request.content_type,
            returned = items.len(),
            limit = request.limit,
            stages = acc.stages.len(),
            "search complete"
        );

        Ok(SearchResult {
            items,
            content_for_token,
            stages: acc.stages,
            truncated,
        })
    }

    async fn run_stage(
        &self,
        mut acc: Accumulator,
        plan: &StagePlan,
        request: &SearchRequest,
        matcher: &dyn TokenMatcher,
    ) -> Result<Accumulator> {
        let before = acc.items.len();
        for batch in &plan.batches {
            // Text duplicates use up sample slots; resample until the batch
            // is satisfied or its pool runs dry. Seen ids are excluded, so
            // every round draws fresh items.
            let mut taken = 0;
            loop {
                let size = batch.size(taken, acc.shortfall(request.limit));
                if size == 0 || request.expired() {
                    break;
                }
                let filter = batch.filter.clone().with_excluded_ids(acc.seen_ids.iter().cloned());
                let sample = self.repo.sample_random(&filter, size).await?;
                if sample.is_empty() {
                    break;
                }
                for item in sample {
                    if acc.push(item, &request.language, matcher) {
                        taken += 1;
                    }
                }
            }
        }

        tracing::debug!(
            stage = plan.stage.as_str(),
            added = acc.items.len() - before,
            collected = acc.items.len(),
            "search stage sampled"
        );
        acc.stages.push(plan.stage);
        Ok(acc)
    }

    /// Group result items by requested token. A token nothing matched gets
    /// a small targeted sample of its own when `top_up` is set, except for
    /// `Char` requests.
    async fn partition(
        &self,
        items: &[MatchedContent],
        context: &StageContext,
        request: &SearchRequest,
        matcher: &dyn TokenMatcher,
        top_up: bool,
    ) -> Result<BTreeMap<String, Vec<MatchedContent>>> {
        let mut partition: BTreeMap<String, Vec<MatchedContent>> = BTreeMap::new();
        for token in &request.tokens {
            if partition.contains_key(token) {
                continue;
            }
            let mut matched: Vec<MatchedContent> = items
                .iter()
                .filter(|item| matcher.matched_token(&item.matched_char, token))
                .cloned()
                .collect();

            if top_up
                && matched.is_empty()
                && request.content_type != ContentType::Char
                && !token.trim().is_empty()
            {
                let filter = self.token_top_up_filter(context, token)?;
                for item in self.repo.sample_random(&filter, TOKEN_TOP_UP_SIZE).await? {
                    let surface = matcher.matched(&item);
                    matched.push(MatchedContent::new(item, surface));
                }
                matched = dedup_by_text(matched, &request.language);
            }
            partition.insert(token.clone(), matched);
        }
        Ok(partition)
    }

    fn token_top_up_filter(&self, context: &StageContext, token: &str) -> Result<ContentFilter> {
        let tokens = [token.to_string()];
        let filter = context
            .base
            .clone()
            .with_level_any(context.level.clone())
            .with_complexity_any(context.complexity.clone());
        Ok(match context.family {
            LanguageFamily::Script => {
                filter.with_text(TokenPattern::new(TokenPosition::Anywhere, &tokens)?)
            }
            LanguageFamily::Phonemic => filter.with_phonemes_any(tokens.to_vec()),
        })
    }
}
