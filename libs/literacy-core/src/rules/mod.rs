//! Difficulty and complexity rule tables.
//!
//! A rule maps a (level, content type) pair to a set of metric ranges.
//! Tables are plain immutable data; the [`RuleRegistry`] resolves which
//! table applies to a language:
//!
//! - English uses its own table (syllables come from phoneme extraction).
//! - Every other language uses the shared script-language table.
//! - A language override replaces individual (level, content type)
//!   entries of the base table for that language only.

pub mod tables;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{ComplexityLevel, ContentSourceVariant, ContentType, Level, LanguageFamily};

pub use tables::{BUILTIN_RULES, RULES_VERSION};

/// Stored metric a range predicate can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricField {
    SyllableCount,
    WordCount,
    TotalOrthoComplexity,
    TotalPhonicComplexity,
    MeanComplexity,
    MeanPhonicComplexity,
}

impl MetricField {
    /// Read the metric from a variant. Missing complexity scores yield `None`.
    pub fn value(self, variant: &ContentSourceVariant) -> Option<f64> {
        match self {
            Self::SyllableCount => Some(f64::from(variant.syllable_count)),
            Self::WordCount => Some(f64::from(variant.word_count)),
            Self::TotalOrthoComplexity => variant.total_ortho_complexity,
            Self::TotalPhonicComplexity => variant.total_phonic_complexity,
            Self::MeanComplexity => variant.mean_complexity,
            Self::MeanPhonicComplexity => variant.mean_phonic_complexity,
        }
    }
}

/// Numeric range built from the operators `eq`, `gt`, `gte`, `lt`, `lte`.
///
/// All present operators must hold. A range with no operators matches
/// every value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(default, alias = "$eq", skip_serializing_if = "Option::is_none")]
    pub eq: Option<f64>,
    #[serde(default, alias = "$gt", skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    #[serde(default, alias = "$gte", skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default, alias = "$lt", skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    #[serde(default, alias = "$lte", skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

impl NumericRange {
    pub fn eq(value: f64) -> Self {
        Self {
            eq: Some(value),
            ..Default::default()
        }
    }

    /// Closed interval `[low, high]`.
    pub fn between(low: f64, high: f64) -> Self {
        Self {
            gte: Some(low),
            lte: Some(high),
            ..Default::default()
        }
    }

    /// Half-open interval `(low, high]`.
    pub fn above_up_to(low: f64, high: f64) -> Self {
        Self {
            gt: Some(low),
            lte: Some(high),
            ..Default::default()
        }
    }

    pub fn at_least(value: f64) -> Self {
        Self {
            gte: Some(value),
            ..Default::default()
        }
    }

    pub fn at_most(value: f64) -> Self {
        Self {
            lte: Some(value),
            ..Default::default()
        }
    }

    pub fn above(value: f64) -> Self {
        Self {
            gt: Some(value),
            ..Default::default()
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.eq.is_none()
            && self.gt.is_none()
            && self.gte.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.eq.map_or(true, |v| value == v)
            && self.gt.map_or(true, |v| value > v)
            && self.gte.map_or(true, |v| value >= v)
            && self.lt.map_or(true, |v| value < v)
            && self.lte.map_or(true, |v| value <= v)
    }
}

/// Conjunction of metric ranges evaluated against one language variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPredicate {
    #[serde(flatten)]
    pub ranges: BTreeMap<MetricField, NumericRange>,
    /// Every word's cluster count must stay below this value. Keeps a
    /// sentence with one long word from being classified too early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_clusters_below: Option<u32>,
}

impl MetricPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: MetricField, range: NumericRange) -> Self {
        if !range.is_unbounded() {
            self.ranges.insert(field, range);
        }
        self
    }

    pub fn with_word_clusters_below(mut self, limit: u32) -> Self {
        self.word_clusters_below = Some(limit);
        self
    }

    /// Copy of the predicate with one field's constraint removed.
    pub fn without(&self, field: MetricField) -> Self {
        let mut relaxed = self.clone();
        relaxed.ranges.remove(&field);
        relaxed
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.word_clusters_below.is_none()
    }

    pub fn constrains(&self, field: MetricField) -> bool {
        self.ranges.contains_key(&field)
    }

    pub fn matches(&self, variant: &ContentSourceVariant) -> bool {
        let ranges_hold = self.ranges.iter().all(|(field, range)| {
            field
                .value(variant)
                .map_or(false, |value| range.contains(value))
        });
        let guard_holds = self
            .word_clusters_below
            .map_or(true, |limit| variant.max_word_clusters() < limit);
        ranges_hold && guard_holds
    }
}

/// Difficulty level rule for one content type.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyRule {
    pub level: Level,
    pub content_type: ContentType,
    pub predicate: MetricPredicate,
}

impl DifficultyRule {
    pub fn new(level: Level, content_type: ContentType, predicate: MetricPredicate) -> Self {
        Self {
            level,
            content_type,
            predicate,
        }
    }
}

/// Complexity band rule for one content type.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityRule {
    pub level: ComplexityLevel,
    pub content_type: ContentType,
    pub predicate: MetricPredicate,
}

impl ComplexityRule {
    pub fn new(
        level: ComplexityLevel,
        content_type: ContentType,
        predicate: MetricPredicate,
    ) -> Self {
        Self {
            level,
            content_type,
            predicate,
        }
    }
}

/// Ordered level and complexity rules for one language family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    pub levels: Vec<DifficultyRule>,
    pub complexity: Vec<ComplexityRule>,
}

impl RuleTable {
    pub fn new(levels: Vec<DifficultyRule>, complexity: Vec<ComplexityRule>) -> Self {
        Self { levels, complexity }
    }

    fn level_rule(&self, level: Level, content_type: ContentType) -> Option<&DifficultyRule> {
        self.levels
            .iter()
            .find(|r| r.level == level && r.content_type == content_type)
    }

    fn complexity_rule(
        &self,
        level: ComplexityLevel,
        content_type: ContentType,
    ) -> Option<&ComplexityRule> {
        self.complexity
            .iter()
            .find(|r| r.level == level && r.content_type == content_type)
    }
}

/// Language-keyed, versioned registry of rule tables.
///
/// Built once and only read afterwards; every classification and query
/// path resolves rules through it.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    version: u32,
    script: RuleTable,
    english: RuleTable,
    overrides: HashMap<String, RuleTable>,
}

impl RuleRegistry {
    pub fn new(version: u32, script: RuleTable, english: RuleTable) -> Self {
        Self {
            version,
            script,
            english,
            overrides: HashMap::new(),
        }
    }

    /// The process-wide registry built from the shipped tables.
    pub fn builtin() -> &'static RuleRegistry {
        &BUILTIN_RULES
    }

    /// Register entries that replace the base table's entries for one language.
    pub fn with_override(mut self, language: impl Into<String>, table: RuleTable) -> Self {
        self.overrides.insert(language.into(), table);
        self
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    fn base_table(&self, language: &str) -> &RuleTable {
        match LanguageFamily::of(language) {
            LanguageFamily::Phonemic => &self.english,
            LanguageFamily::Script => &self.script,
        }
    }

    /// Level rules for a language and content type, in table order.
    pub fn level_rules(&self, language: &str, content_type: ContentType) -> Vec<&DifficultyRule> {
        let base = self.base_table(language);
        let overrides = self.overrides.get(language);

        let mut rules: Vec<&DifficultyRule> = base
            .levels
            .iter()
            .filter(|r| r.content_type == content_type)
            .map(|r| {
                overrides
                    .and_then(|o| o.level_rule(r.level, content_type))
                    .unwrap_or(r)
            })
            .collect();

        if let Some(o) = overrides {
            for rule in o.levels.iter().filter(|r| r.content_type == content_type) {
                if base.level_rule(rule.level, content_type).is_none() {
                    rules.push(rule);
                }
            }
        }
        rules
    }

    pub fn level_rule(
        &self,
        language: &str,
        level: Level,
        content_type: ContentType,
    ) -> Option<&DifficultyRule> {
        self.overrides
            .get(language)
            .and_then(|o| o.level_rule(level, content_type))
            .or_else(|| self.base_table(language).level_rule(level, content_type))
    }

    /// Complexity rules for a language and content type, in table order.
    pub fn complexity_rules(
        &self,
        language: &str,
        content_type: ContentType,
    ) -> Vec<&ComplexityRule> {
        ComplexityLevel::ALL
            .into_iter()
            .filter_map(|level| self.complexity_rule(language, level, content_type))
            .collect()
    }

    pub fn complexity_rule(
        &self,
        language: &str,
        level: ComplexityLevel,
        content_type: ContentType,
    ) -> Option<&ComplexityRule> {
        self.overrides
            .get(language)
            .and_then(|o| o.complexity_rule(level, content_type))
            .or_else(|| {
                self.base_table(language)
                    .complexity_rule(level, content_type)
            })
    }
}
