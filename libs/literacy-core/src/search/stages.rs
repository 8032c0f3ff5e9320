//! Relaxation stages.
//!
//! Each stage is planned fresh from the request's base constraints, so a
//! stage's filter is a value that can be inspected and tested on its own.
//! Constraints only ever loosen from one stage to the next: the pool of
//! stage N+1 contains the pool of stage N.

use serde::Serialize;

use crate::error::Result;
use crate::filter::ContentFilter;
use crate::matcher::{TokenPattern, TokenPosition};
use crate::rules::{MetricField, MetricPredicate};
use crate::types::LanguageFamily;

/// Fixed order of relaxation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Full,
    WidenTokenPosition,
    DropOrthoComplexity,
    DropComplexity,
    DemoteLevel,
    DropTokens,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Full,
        Stage::WidenTokenPosition,
        Stage::DropOrthoComplexity,
        Stage::DropComplexity,
        Stage::DemoteLevel,
        Stage::DropTokens,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::WidenTokenPosition => "widenTokenPosition",
            Self::DropOrthoComplexity => "dropOrthoComplexity",
            Self::DropComplexity => "dropComplexity",
            Self::DemoteLevel => "demoteLevel",
            Self::DropTokens => "dropTokens",
        }
    }
}

/// One sampling source of a stage. `cap` bounds how many items the batch
/// may contribute, below the current shortfall.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub filter: ContentFilter,
    pub cap: Option<usize>,
}

impl Batch {
    fn new(filter: ContentFilter) -> Self {
        Self { filter, cap: None }
    }

    fn capped(filter: ContentFilter, cap: usize) -> Self {
        Self {
            filter,
            cap: Some(cap),
        }
    }

    /// Next sample size once `taken` items came from this batch.
    pub fn size(&self, taken: usize, shortfall: usize) -> usize {
        self.cap
            .map_or(shortfall, |cap| cap.saturating_sub(taken).min(shortfall))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagePlan {
    pub stage: Stage,
    pub batches: Vec<Batch>,
    /// Union of every batch's pool, used to compare stages.
    pub pool: ContentFilter,
}

/// Request constraints every stage is derived from.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub family: LanguageFamily,
    pub limit: usize,
    /// Type, language and tags. Never relaxed.
    pub base: ContentFilter,
    pub tokens: Vec<String>,
    pub level: Vec<MetricPredicate>,
    /// Level constraint after demotion; `None` when there is nothing
    /// easier to fall back to.
    pub demoted_level: Option<Vec<MetricPredicate>>,
    pub complexity: Vec<MetricPredicate>,
}

impl StageContext {
    /// Tokens used before the position is widened.
    fn primary_tokens(&self) -> &[String] {
        &self.tokens[..self.tokens.len().min(self.limit)]
    }

    /// Primary tokens plus the secondary batch.
    fn widened_tokens(&self) -> &[String] {
        &self.tokens[..self.tokens.len().min(self.limit.saturating_mul(2))]
    }

    fn token_filter(
        &self,
        filter: ContentFilter,
        position: TokenPosition,
        tokens: &[String],
    ) -> Result<ContentFilter> {
        Ok(match self.family {
            LanguageFamily::Script => filter.with_text(TokenPattern::new(position, tokens)?),
            LanguageFamily::Phonemic => filter.with_phonemes_any(tokens.to_vec()),
        })
    }

    fn constrained(&self, level: &[MetricPredicate], complexity: Vec<MetricPredicate>) -> ContentFilter {
        self.base
            .clone()
            .with_level_any(level.to_vec())
            .with_complexity_any(complexity)
    }

    /// Complexity predicates with orthographic bands removed. A band that
    /// only constrained orthographic complexity disappears, which widens
    /// the OR to everything.
    fn phonic_complexity(&self) -> Vec<MetricPredicate> {
        let relaxed: Vec<MetricPredicate> = self
            .complexity
            .iter()
            .map(|p| p.without(MetricField::TotalOrthoComplexity))
            .collect();
        if relaxed.iter().any(MetricPredicate::is_empty) {
            return Vec::new();
        }
        let mut unique: Vec<MetricPredicate> = Vec::with_capacity(relaxed.len());
        for predicate in relaxed {
            if !unique.contains(&predicate) {
                unique.push(predicate);
            }
        }
        unique
    }

    /// Filter and batches for a stage, or `None` when the stage does not
    /// apply to this request.
    pub fn plan(&self, stage: Stage) -> Result<Option<StagePlan>> {
        let plan = match stage {
            Stage::Full => {
                let constrained = self.constrained(&self.level, self.complexity.clone());
                let tokens = self.primary_tokens();
                match self.family {
                    LanguageFamily::Script if !tokens.is_empty() => {
                        let prefix =
                            self.token_filter(constrained.clone(), TokenPosition::Prefix, tokens)?;
                        let mid =
                            self.token_filter(constrained.clone(), TokenPosition::MidWord, tokens)?;
                        let pool = self.token_filter(
                            constrained,
                            TokenPosition::PrefixOrMidWord,
                            tokens,
                        )?;
                        StagePlan {
                            stage,
                            batches: vec![
                                Batch::capped(prefix, self.limit.div_ceil(2)),
                                Batch::new(mid),
                            ],
                            pool,
                        }
                    }
                    _ => {
                        let filter =
                            self.token_filter(constrained, TokenPosition::Anywhere, tokens)?;
                        single(stage, filter)
                    }
                }
            }
            Stage::WidenTokenPosition => single(
                stage,
                self.token_filter(
                    self.constrained(&self.level, self.complexity.clone()),
                    TokenPosition::Anywhere,
                    self.widened_tokens(),
                )?,
            ),
            Stage::DropOrthoComplexity => single(
                stage,
                self.token_filter(
                    self.constrained(&self.level, self.phonic_complexity()),
                    TokenPosition::Anywhere,
                    self.widened_tokens(),
                )?,
            ),
            Stage::DropComplexity => single(
                stage,
                self.token_filter(
                    self.constrained(&self.level, Vec::new()),
                    TokenPosition::Anywhere,
                    self.widened_tokens(),
                )?,
            ),
            Stage::DemoteLevel => {
                let Some(demoted) = &self.demoted_level else {
                    return Ok(None);
                };
                single(
                    stage,
                    self.token_filter(
                        self.constrained(demoted, Vec::new()),
                        TokenPosition::Anywhere,
                        self.widened_tokens(),
                    )?,
                )
            }
            Stage::DropTokens => single(stage, self.base.clone()),
        };
        Ok(Some(plan))
    }

    /// Pool filter of every applicable stage, in execution order, with
    /// stages that would not loosen anything removed.
    pub fn plans(&self) -> Result<Vec<StagePlan>> {
        let mut plans: Vec<StagePlan> = Vec::new();
        for stage in Stage::ALL {
            let Some(plan) = self.plan(stage)? else {
                continue;
            };
            if plans.last().is_some_and(|previous| previous.pool == plan.pool) {
                continue;
            }
            plans.push(plan);
        }
        Ok(plans)
    }
}

fn single(stage: Stage, filter: ContentFilter) -> StagePlan {
    StagePlan {
        stage,
        batches: vec![Batch::new(filter.clone())],
        pool: filter,
    }
}
