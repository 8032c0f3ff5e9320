//! Shipped rule tables.
//!
//! Complexity bands encode ranges over scores produced by an external
//! complexity scorer; only the banding lives here.

use once_cell::sync::Lazy;

use super::{
    ComplexityRule, DifficultyRule, MetricField, MetricPredicate, NumericRange, RuleRegistry,
    RuleTable,
};
use crate::types::{ComplexityLevel, ContentType, Level};

use ComplexityLevel::{C1, C2, C3, C4};
use ContentType::{Paragraph, Sentence, Word};
use Level::{L1, L2, L3, L4, L5, L6};
use MetricField::{
    MeanComplexity, SyllableCount, TotalOrthoComplexity, TotalPhonicComplexity, WordCount,
};

/// Bumped whenever a threshold in the shipped tables changes.
pub const RULES_VERSION: u32 = 1;

pub static BUILTIN_RULES: Lazy<RuleRegistry> =
    Lazy::new(|| RuleRegistry::new(RULES_VERSION, script_table(), english_table()));

fn syllables(range: NumericRange) -> MetricPredicate {
    MetricPredicate::new().with(SyllableCount, range)
}

fn words(range: NumericRange) -> MetricPredicate {
    MetricPredicate::new().with(WordCount, range)
}

/// Sentence rule: word count, total clusters, and a per-word ceiling.
fn sentence(word_range: NumericRange, max_syllables: f64, word_clusters_below: u32) -> MetricPredicate {
    words(word_range)
        .with(SyllableCount, NumericRange::at_most(max_syllables))
        .with_word_clusters_below(word_clusters_below)
}

fn complexity(ortho: NumericRange, phonic: NumericRange) -> MetricPredicate {
    MetricPredicate::new()
        .with(TotalOrthoComplexity, ortho)
        .with(TotalPhonicComplexity, phonic)
}

fn complexity_with_mean(
    ortho: NumericRange,
    phonic: NumericRange,
    mean: NumericRange,
) -> MetricPredicate {
    complexity(ortho, phonic).with(MeanComplexity, mean)
}

/// Shared table for script languages (grapheme-cluster counting).
pub fn script_table() -> RuleTable {
    let levels = vec![
        DifficultyRule::new(L1, Word, syllables(NumericRange::eq(2.0))),
        DifficultyRule::new(L1, Sentence, words(NumericRange::between(2.0, 3.0))),
        DifficultyRule::new(L2, Word, syllables(NumericRange::between(2.0, 3.0))),
        DifficultyRule::new(L2, Sentence, sentence(NumericRange::between(2.0, 3.0), 8.0, 4)),
        DifficultyRule::new(L3, Word, syllables(NumericRange::at_least(4.0))),
        DifficultyRule::new(L3, Sentence, sentence(NumericRange::above_up_to(2.0, 5.0), 15.0, 5)),
        DifficultyRule::new(L3, Paragraph, words(NumericRange::at_most(10.0))),
        DifficultyRule::new(L4, Sentence, sentence(NumericRange::above_up_to(5.0, 7.0), 20.0, 7)),
        DifficultyRule::new(L4, Paragraph, words(NumericRange::at_most(10.0))),
        DifficultyRule::new(L5, Sentence, words(NumericRange::between(7.0, 10.0))),
        DifficultyRule::new(L5, Paragraph, words(NumericRange::above_up_to(10.0, 15.0))),
        DifficultyRule::new(L6, Sentence, words(NumericRange::between(7.0, 12.0))),
        DifficultyRule::new(L6, Paragraph, words(NumericRange::above(15.0))),
    ];

    let bands = vec![
        ComplexityRule::new(
            C1,
            Word,
            complexity(NumericRange::between(0.0, 2.0), NumericRange::between(0.0, 30.0)),
        ),
        ComplexityRule::new(
            C1,
            Sentence,
            complexity_with_mean(
                NumericRange::between(0.0, 75.0),
                NumericRange::between(0.0, 20.0),
                NumericRange::between(0.0, 50.0),
            ),
        ),
        ComplexityRule::new(
            C2,
            Word,
            complexity(NumericRange::between(0.0, 8.0), NumericRange::between(0.0, 60.0)),
        ),
        ComplexityRule::new(
            C2,
            Sentence,
            complexity_with_mean(
                NumericRange::between(0.0, 20.0),
                NumericRange::between(0.0, 100.0),
                NumericRange::between(0.0, 50.0),
            ),
        ),
        ComplexityRule::new(
            C3,
            Word,
            complexity(NumericRange::between(0.0, 15.0), NumericRange::between(0.0, 100.0)),
        ),
        ComplexityRule::new(
            C3,
            Sentence,
            complexity_with_mean(
                NumericRange::between(20.0, 50.0),
                NumericRange::at_most(200.0),
                NumericRange::between(50.0, 100.0),
            ),
        ),
        ComplexityRule::new(
            C4,
            Word,
            complexity(NumericRange::above(15.0), NumericRange::above(100.0)),
        ),
        ComplexityRule::new(
            C4,
            Sentence,
            complexity_with_mean(
                NumericRange::above(50.0),
                NumericRange::above(200.0),
                NumericRange::above(100.0),
            ),
        ),
    ];

    RuleTable::new(levels, bands)
}

/// English table. Syllable counts come from phoneme extraction, so the
/// word thresholds differ from the script table. No complexity bands.
pub fn english_table() -> RuleTable {
    let levels = vec![
        DifficultyRule::new(L1, Word, syllables(NumericRange::between(2.0, 3.0))),
        DifficultyRule::new(L1, Sentence, words(NumericRange::between(2.0, 3.0))),
        DifficultyRule::new(L2, Word, syllables(NumericRange::eq(4.0))),
        DifficultyRule::new(L2, Sentence, sentence(NumericRange::between(2.0, 3.0), 8.0, 4)),
        DifficultyRule::new(L3, Word, syllables(NumericRange::above(4.0))),
        DifficultyRule::new(L3, Sentence, sentence(NumericRange::above_up_to(2.0, 5.0), 15.0, 5)),
        DifficultyRule::new(L4, Sentence, sentence(NumericRange::above_up_to(5.0, 7.0), 20.0, 7)),
        DifficultyRule::new(L4, Paragraph, words(NumericRange::at_most(10.0))),
        DifficultyRule::new(L5, Sentence, words(NumericRange::between(7.0, 10.0))),
        DifficultyRule::new(L5, Paragraph, words(NumericRange::above_up_to(10.0, 15.0))),
        DifficultyRule::new(L6, Sentence, words(NumericRange::between(7.0, 12.0))),
        DifficultyRule::new(L6, Paragraph, words(NumericRange::above(15.0))),
    ];

    RuleTable::new(levels, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_has_at_most_one_rule_per_type() {
        for table in [script_table(), english_table()] {
            for level in Level::ALL {
                for content_type in [Word, Sentence, Paragraph] {
                    let count = table
                        .levels
                        .iter()
                        .filter(|r| r.level == level && r.content_type == content_type)
                        .count();
                    assert!(count <= 1, "{level} {content_type} has {count} rules");
                }
            }
        }
    }

    #[test]
    fn multi_word_complexity_carries_mean() {
        for rule in script_table().complexity {
            assert_eq!(
                rule.predicate.constrains(MeanComplexity),
                rule.content_type.is_multi_word()
            );
        }
    }

    #[test]
    fn builtin_registry_is_versioned() {
        assert_eq!(BUILTIN_RULES.version(), RULES_VERSION);
    }
}
