//! Language-aware token matching.
//!
//! Script languages match requested characters directly in the text,
//! comparing code points so multi-byte scripts behave. English matches
//! requested phoneme symbols against the precomputed phoneme list and
//! reports the grapheme spellings mapped to each matched phoneme.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::types::{ContentItem, LanguageFamily};

/// Caller-supplied phoneme -> grapheme spellings table.
pub type GraphemeMap = BTreeMap<String, Vec<String>>;

/// A base character followed by its combining marks.
static CLUSTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\P{M}\p{M}*").expect("valid cluster pattern"));

/// Where in the text a token must occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPosition {
    /// Text starts with the token.
    Prefix,
    /// Token follows another word character.
    MidWord,
    /// Either of the above.
    PrefixOrMidWord,
    /// Anywhere in the text, including the start of a later word.
    Anywhere,
}

/// Compiled token pattern for one position.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    position: TokenPosition,
    tokens: Vec<String>,
    regex: Regex,
}

impl PartialEq for TokenPattern {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.tokens == other.tokens
    }
}

impl TokenPattern {
    /// Compile a pattern, or `None` when there are no non-empty tokens.
    pub fn new(position: TokenPosition, tokens: &[String]) -> Result<Option<Self>> {
        let tokens = normalized_tokens(tokens);
        if tokens.is_empty() {
            return Ok(None);
        }

        let alternation = alternation(&tokens);
        let source = match position {
            TokenPosition::Prefix => format!("^(?:{alternation})"),
            TokenPosition::MidWord => format!(r"\B(?:{alternation})"),
            TokenPosition::PrefixOrMidWord => format!(r"^(?:{alternation})|\B(?:{alternation})"),
            TokenPosition::Anywhere => format!("(?:{alternation})"),
        };

        Ok(Some(Self {
            position,
            tokens,
            regex: Regex::new(&source)?,
        }))
    }

    pub fn position(&self) -> TokenPosition {
        self.position
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Test the trimmed text.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text.trim())
    }
}

/// Deduplicated, non-empty tokens in request order.
fn normalized_tokens(tokens: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.trim();
        if !token.is_empty() && !out.iter().any(|t| t == token) {
            out.push(token.to_string());
        }
    }
    out
}

/// Escaped alternation with longer tokens first so a multi-character
/// token wins over its own prefix.
fn alternation(tokens: &[String]) -> String {
    let mut ordered: Vec<&String> = tokens.iter().collect();
    ordered.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    ordered
        .into_iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}

/// Split text into base-plus-combining-mark clusters.
pub fn clusters(text: &str) -> Vec<&str> {
    CLUSTER_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Language-specific token matcher.
pub trait TokenMatcher: Send + Sync {
    fn family(&self) -> LanguageFamily;

    /// Surface forms of the requested tokens found in the item's variant
    /// for the matcher's language. Empty when nothing matched.
    fn matched(&self, item: &ContentItem) -> Vec<String>;

    /// Surface forms a single requested token can appear as.
    fn surface_forms(&self, token: &str) -> Vec<String>;

    /// Whether an item's matched forms count towards `token`.
    fn matched_token(&self, matched: &[String], token: &str) -> bool;
}

/// Direct character matching for script languages.
#[derive(Debug, Clone)]
pub struct ScriptMatcher {
    language: String,
    pattern: Option<TokenPattern>,
}

impl ScriptMatcher {
    pub fn new(language: impl Into<String>, tokens: &[String]) -> Result<Self> {
        Ok(Self {
            language: language.into(),
            pattern: TokenPattern::new(TokenPosition::Anywhere, tokens)?,
        })
    }
}

impl TokenMatcher for ScriptMatcher {
    fn family(&self) -> LanguageFamily {
        LanguageFamily::Script
    }

    fn matched(&self, item: &ContentItem) -> Vec<String> {
        let (Some(pattern), Some(variant)) = (&self.pattern, item.variant(&self.language)) else {
            return Vec::new();
        };

        let mut found: Vec<String> = Vec::new();
        for m in pattern.regex.find_iter(variant.normalized_text()) {
            if !found.iter().any(|f| f == m.as_str()) {
                found.push(m.as_str().to_string());
            }
        }
        found
    }

    fn surface_forms(&self, token: &str) -> Vec<String> {
        vec![token.to_string()]
    }

    fn matched_token(&self, matched: &[String], token: &str) -> bool {
        !token.is_empty() && matched.iter().any(|m| m.contains(token))
    }
}

/// Phoneme membership matching for English.
#[derive(Debug, Clone)]
pub struct PhonemeMatcher {
    language: String,
    tokens: Vec<String>,
    graphemes: GraphemeMap,
}

impl PhonemeMatcher {
    pub fn new(language: impl Into<String>, tokens: &[String], graphemes: GraphemeMap) -> Self {
        Self {
            language: language.into(),
            tokens: normalized_tokens(tokens),
            graphemes,
        }
    }

    /// Requested phonemes present in the item, in request order.
    pub fn matched_phonemes(&self, item: &ContentItem) -> Vec<String> {
        let Some(variant) = item.variant(&self.language) else {
            return Vec::new();
        };
        self.tokens
            .iter()
            .filter(|token| variant.phonemes.iter().any(|p| p == *token))
            .cloned()
            .collect()
    }
}

impl TokenMatcher for PhonemeMatcher {
    fn family(&self) -> LanguageFamily {
        LanguageFamily::Phonemic
    }

    fn matched(&self, item: &ContentItem) -> Vec<String> {
        let mut graphemes: Vec<String> = Vec::new();
        for phoneme in self.matched_phonemes(item) {
            for grapheme in self.surface_forms(&phoneme) {
                if !graphemes.contains(&grapheme) {
                    graphemes.push(grapheme);
                }
            }
        }
        graphemes
    }

    fn surface_forms(&self, token: &str) -> Vec<String> {
        match self.graphemes.get(token) {
            Some(spellings) => spellings.clone(),
            None => {
                tracing::debug!(phoneme = token, "no grapheme mapping for phoneme");
                Vec::new()
            }
        }
    }

    fn matched_token(&self, matched: &[String], token: &str) -> bool {
        self.surface_forms(token)
            .iter()
            .any(|grapheme| matched.contains(grapheme))
    }
}

/// Pick the matcher for a language.
pub fn matcher_for(
    language: &str,
    tokens: &[String],
    graphemes: &GraphemeMap,
) -> Result<Box<dyn TokenMatcher>> {
    match LanguageFamily::of(language) {
        LanguageFamily::Script => Ok(Box::new(ScriptMatcher::new(language, tokens)?)),
        LanguageFamily::Phonemic => Ok(Box::new(PhonemeMatcher::new(
            language,
            tokens,
            graphemes.clone(),
        ))),
    }
}
