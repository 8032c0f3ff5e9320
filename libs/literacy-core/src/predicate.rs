//! Query predicates derived from the rule tables.
//!
//! A missing rule is a configuration gap, not an error: the builder logs
//! it and returns an empty predicate so the caller applies no constraint.

use crate::rules::{MetricPredicate, RuleRegistry};
use crate::types::{ComplexityLevel, ContentType, Level};

/// Metric ranges of the rule for `level`, with its labels stripped.
pub fn build_level_predicate(
    rules: &RuleRegistry,
    level: Level,
    content_type: ContentType,
    language: &str,
) -> Option<MetricPredicate> {
    let predicate = rules
        .level_rule(language, level, content_type.storage_type())
        .map(|rule| rule.predicate.clone());

    if predicate.is_none() {
        tracing::warn!(
            language,
            level = %level,
            content_type = %content_type,
            "no level rule configured, skipping level constraint"
        );
    }
    predicate
}

/// One predicate per requested complexity level. The caller combines
/// them with OR. Levels without a rule are skipped.
pub fn build_complexity_predicate(
    rules: &RuleRegistry,
    levels: &[ComplexityLevel],
    content_type: ContentType,
    language: &str,
) -> Vec<MetricPredicate> {
    let mut predicates: Vec<MetricPredicate> = Vec::new();
    for &level in levels {
        match rules.complexity_rule(language, level, content_type.storage_type()) {
            Some(rule) => {
                if !predicates.contains(&rule.predicate) {
                    predicates.push(rule.predicate.clone());
                }
            }
            None => tracing::warn!(
                language,
                level = %level,
                content_type = %content_type,
                "no complexity rule configured, skipping complexity constraint"
            ),
        }
    }
    predicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{MetricField, NumericRange};
    use pretty_assertions::assert_eq;

    #[test]
    fn level_predicate_strips_labels() {
        let rules = RuleRegistry::builtin();
        let predicate = build_level_predicate(rules, Level::L2, ContentType::Word, "ta").unwrap();
        assert_eq!(
            predicate,
            MetricPredicate::new().with(MetricField::SyllableCount, NumericRange::between(2.0, 3.0))
        );
    }

    #[test]
    fn sentence_level_keeps_cluster_guard() {
        let rules = RuleRegistry::builtin();
        let predicate =
            build_level_predicate(rules, Level::L3, ContentType::Sentence, "ta").unwrap();
        assert_eq!(predicate.word_clusters_below, Some(5));
        assert!(predicate.constrains(MetricField::WordCount));
    }

    #[test]
    fn unknown_combination_yields_no_constraint() {
        let rules = RuleRegistry::builtin();
        assert!(build_level_predicate(rules, Level::L6, ContentType::Word, "ta").is_none());
        assert!(build_level_predicate(rules, Level::L1, ContentType::Paragraph, "en").is_none());
        assert!(build_complexity_predicate(
            rules,
            &[ComplexityLevel::C1],
            ContentType::Paragraph,
            "ta"
        )
        .is_empty());
    }

    #[test]
    fn complexity_predicate_per_level() {
        let rules = RuleRegistry::builtin();
        let predicates = build_complexity_predicate(
            rules,
            &[ComplexityLevel::C1, ComplexityLevel::C3],
            ContentType::Word,
            "ta",
        );
        assert_eq!(predicates.len(), 2);
        assert_eq!(
            predicates[0],
            MetricPredicate::new()
                .with(MetricField::TotalOrthoComplexity, NumericRange::between(0.0, 2.0))
                .with(MetricField::TotalPhonicComplexity, NumericRange::between(0.0, 30.0))
        );
    }

    #[test]
    fn sentence_complexity_includes_mean() {
        let rules = RuleRegistry::builtin();
        let predicates = build_complexity_predicate(
            rules,
            &[ComplexityLevel::C2],
            ContentType::Sentence,
            "ta",
        );
        assert!(predicates[0].constrains(MetricField::MeanComplexity));
    }

    #[test]
    fn english_has_no_complexity_bands() {
        let rules = RuleRegistry::builtin();
        let predicates = build_complexity_predicate(
            rules,
            &ComplexityLevel::ALL,
            ContentType::Word,
            "en",
        );
        assert!(predicates.is_empty());
    }
}
