//! Core types for literacy practice content.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Language code used for English content. Every other language is
/// treated as a script language.
pub const ENGLISH: &str = "en";

/// How tokens are matched for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    /// Tokens are characters matched directly against the text.
    Script,
    /// Tokens are phoneme symbols matched against precomputed phonemes.
    Phonemic,
}

impl LanguageFamily {
    pub fn of(language: &str) -> Self {
        if language.eq_ignore_ascii_case(ENGLISH) {
            Self::Phonemic
        } else {
            Self::Script
        }
    }
}

/// Unit of practice material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(alias = "char")]
    Char,
    #[serde(alias = "word")]
    Word,
    #[serde(alias = "sentence")]
    Sentence,
    #[serde(alias = "paragraph")]
    Paragraph,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Char => "Char",
            Self::Word => "Word",
            Self::Sentence => "Sentence",
            Self::Paragraph => "Paragraph",
        }
    }

    /// Content type items are stored under. Characters are practised
    /// through short words.
    pub fn storage_type(self) -> Self {
        match self {
            Self::Char => Self::Word,
            other => other,
        }
    }

    /// Multi-word types carry a mean complexity score.
    pub fn is_multi_word(self) -> bool {
        matches!(self, Self::Sentence | Self::Paragraph)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "char" => Ok(Self::Char),
            "word" => Ok(Self::Word),
            "sentence" => Ok(Self::Sentence),
            "paragraph" => Ok(Self::Paragraph),
            _ => Err(ContentError::UnknownContentType(s.to_string())),
        }
    }
}

/// Difficulty level derived from length and syllable metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    L1,
    L2,
    L3,
    L4,
    L5,
    L6,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::L1,
        Level::L2,
        Level::L3,
        Level::L4,
        Level::L5,
        Level::L6,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L1 => "L1",
            Self::L2 => "L2",
            Self::L3 => "L3",
            Self::L4 => "L4",
            Self::L5 => "L5",
            Self::L6 => "L6",
        }
    }

    /// The next easier level, or `None` at L1.
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::L1 => None,
            Self::L2 => Some(Self::L1),
            Self::L3 => Some(Self::L2),
            Self::L4 => Some(Self::L3),
            Self::L5 => Some(Self::L4),
            Self::L6 => Some(Self::L5),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ContentError::UnknownLevel(s.to_string()))
    }
}

/// Complexity band derived from orthographic and phonic scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplexityLevel {
    C1,
    C2,
    C3,
    C4,
}

impl ComplexityLevel {
    pub const ALL: [ComplexityLevel; 4] = [
        ComplexityLevel::C1,
        ComplexityLevel::C2,
        ComplexityLevel::C3,
        ComplexityLevel::C4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::C3 => "C3",
            Self::C4 => "C4",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplexityLevel {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComplexityLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ContentError::UnknownComplexity(s.to_string()))
    }
}

/// Text and precomputed metrics for one language of a content item.
///
/// Metrics are written once at ingestion and treated as ground truth by
/// every query path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSourceVariant {
    pub language: String,
    pub text: String,
    #[serde(default)]
    pub word_count: u32,
    /// Grapheme clusters for script languages, letters for English.
    #[serde(default)]
    pub syllable_count: u32,
    /// Word -> cluster (or unique character) count.
    #[serde(default)]
    pub syllable_count_map: BTreeMap<String, u32>,
    /// Phoneme symbols, English only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phonemes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_ortho_complexity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_phonic_complexity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_complexity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_phonic_complexity: Option<f64>,
}

impl ContentSourceVariant {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Text with surrounding whitespace removed, used for deduplication.
    pub fn normalized_text(&self) -> &str {
        self.text.trim()
    }

    /// Largest per-word cluster count, 0 for empty text.
    pub fn max_word_clusters(&self) -> u32 {
        self.syllable_count_map.values().copied().max().unwrap_or(0)
    }
}

/// One unit of practice material with one or more language variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(default)]
    pub content_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub content_type: ContentType,
    pub language: String,
    #[serde(rename = "contentSourceData")]
    pub variants: Vec<ContentSourceVariant>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_index: Option<u32>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_status() -> String {
    "live".to_string()
}

impl ContentItem {
    /// Create an item with a fresh id and a single language variant.
    pub fn new(content_type: ContentType, variant: ContentSourceVariant) -> Self {
        let now = Utc::now();
        Self {
            content_id: uuid::Uuid::new_v4().to_string(),
            collection_id: None,
            name: variant.text.clone(),
            content_type,
            language: variant.language.clone(),
            variants: vec![variant],
            status: default_status(),
            tags: Vec::new(),
            image_path: None,
            content_index: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The first variant authored in `language`.
    pub fn variant(&self, language: &str) -> Option<&ContentSourceVariant> {
        self.variants.iter().find(|v| v.language == language)
    }

    pub fn has_all_tags(&self, required: &[String]) -> bool {
        required.iter().all(|tag| self.tags.contains(tag))
    }
}

/// A content item annotated with the token surface forms it matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedContent {
    #[serde(flatten)]
    pub item: ContentItem,
    /// Characters (script languages) or graphemes (English) that matched.
    /// Empty for items included only through relaxation.
    pub matched_char: Vec<String>,
}

impl MatchedContent {
    pub fn new(item: ContentItem, matched_char: Vec<String>) -> Self {
        Self { item, matched_char }
    }

    pub fn content_id(&self) -> &str {
        &self.item.content_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering_and_previous() {
        assert!(Level::L1 < Level::L2);
        assert_eq!(Level::L3.previous(), Some(Level::L2));
        assert_eq!(Level::L1.previous(), None);
    }

    #[test]
    fn parse_labels() {
        assert_eq!("l4".parse::<Level>().unwrap(), Level::L4);
        assert_eq!("C2".parse::<ComplexityLevel>().unwrap(), ComplexityLevel::C2);
        assert!(matches!(
            "L9".parse::<Level>(),
            Err(ContentError::UnknownLevel(_))
        ));
        assert_eq!("char".parse::<ContentType>().unwrap(), ContentType::Char);
    }

    #[test]
    fn char_is_stored_as_word() {
        assert_eq!(ContentType::Char.storage_type(), ContentType::Word);
        assert_eq!(ContentType::Sentence.storage_type(), ContentType::Sentence);
    }

    #[test]
    fn language_family() {
        assert_eq!(LanguageFamily::of("en"), LanguageFamily::Phonemic);
        assert_eq!(LanguageFamily::of("ta"), LanguageFamily::Script);
    }

    #[test]
    fn deserialize_wire_shape() {
        let raw = r#"{
            "contentId": "c-1",
            "contentType": "Word",
            "language": "ta",
            "contentSourceData": [{
                "language": "ta",
                "text": " கடல் ",
                "wordCount": 1,
                "syllableCount": 3,
                "syllableCountMap": { "கடல்": 3 },
                "totalOrthoComplexity": 4.0
            }],
            "tags": ["ASER"]
        }"#;
        let item: ContentItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.status, "live");
        let variant = item.variant("ta").unwrap();
        assert_eq!(variant.normalized_text(), "கடல்");
        assert_eq!(variant.max_word_clusters(), 3);
        assert_eq!(variant.total_ortho_complexity, Some(4.0));
        assert!(variant.total_phonic_complexity.is_none());
    }

    #[test]
    fn matched_content_flattens_item() {
        let item = ContentItem::new(ContentType::Word, ContentSourceVariant::new("ta", "கடல்"));
        let matched = MatchedContent::new(item, vec!["க".to_string()]);
        let value = serde_json::to_value(&matched).unwrap();
        assert_eq!(value["matchedChar"][0], "க");
        assert_eq!(value["contentType"], "Word");
    }
}
