//! Difficulty classification of content variants against the rule tables.

use serde::{Deserialize, Serialize};

use crate::rules::RuleRegistry;
use crate::types::{ComplexityLevel, ContentItem, ContentSourceVariant, ContentType, Level};

/// Level and complexity tags for one variant. `None` means no rule
/// matched, which is reported rather than treated as an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub level: Option<Level>,
    pub complexity: Option<ComplexityLevel>,
}

impl Classification {
    pub fn is_classified(&self) -> bool {
        self.level.is_some()
    }
}

/// Classify a variant. Rules are evaluated in table order and the first
/// whose predicates all hold wins.
pub fn classify(
    rules: &RuleRegistry,
    variant: &ContentSourceVariant,
    content_type: ContentType,
    language: &str,
) -> Classification {
    let classification = Classification {
        level: classify_level(rules, variant, content_type, language),
        complexity: classify_complexity(rules, variant, content_type, language),
    };

    if !classification.is_classified() {
        tracing::debug!(
            language,
            content_type = %content_type,
            text = variant.normalized_text(),
            "content did not match any level rule"
        );
    }

    classification
}

pub fn classify_level(
    rules: &RuleRegistry,
    variant: &ContentSourceVariant,
    content_type: ContentType,
    language: &str,
) -> Option<Level> {
    rules
        .level_rules(language, content_type.storage_type())
        .into_iter()
        .find(|rule| rule.predicate.matches(variant))
        .map(|rule| rule.level)
}

pub fn classify_complexity(
    rules: &RuleRegistry,
    variant: &ContentSourceVariant,
    content_type: ContentType,
    language: &str,
) -> Option<ComplexityLevel> {
    rules
        .complexity_rules(language, content_type.storage_type())
        .into_iter()
        .find(|rule| rule.predicate.matches(variant))
        .map(|rule| rule.level)
}

/// Every level whose rule matches. More than one entry means the table
/// overlaps for these metrics; none means a gap.
pub fn matching_levels(
    rules: &RuleRegistry,
    variant: &ContentSourceVariant,
    content_type: ContentType,
    language: &str,
) -> Vec<Level> {
    rules
        .level_rules(language, content_type.storage_type())
        .into_iter()
        .filter(|rule| rule.predicate.matches(variant))
        .map(|rule| rule.level)
        .collect()
}

/// Classify an item using its primary-language variant.
pub fn classify_item(rules: &RuleRegistry, item: &ContentItem) -> Classification {
    match item.variant(&item.language) {
        Some(variant) => classify(rules, variant, item.content_type, &item.language),
        None => Classification::default(),
    }
}
