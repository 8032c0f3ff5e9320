//! Test fixtures and factory functions for creating content.

use serde_json::json;

use literacy_core::{ContentItem, ContentSourceVariant, ContentType};

/// A one-word item with a syllable count.
pub fn word(language: &str, text: &str, syllables: u32) -> ContentItem {
    let variant = ContentSourceVariant {
        word_count: 1,
        syllable_count: syllables,
        syllable_count_map: [(text.to_string(), syllables)].into_iter().collect(),
        ..ContentSourceVariant::new(language, text)
    };
    ContentItem::new(ContentType::Word, variant)
}

/// A Tamil word carrying complexity scores.
pub fn scored_word(text: &str, syllables: u32, ortho: f64, phonic: f64) -> ContentItem {
    let mut item = word("ta", text, syllables);
    item.variants[0].total_ortho_complexity = Some(ortho);
    item.variants[0].total_phonic_complexity = Some(phonic);
    item
}

/// An English word with its phoneme list.
pub fn english_word(text: &str, syllables: u32, phonemes: &[&str]) -> ContentItem {
    let mut item = word("en", text, syllables);
    item.variants[0].phonemes = phonemes.iter().map(|p| p.to_string()).collect();
    item
}

/// Ten L2 Tamil words; three start with க or ச and none contains either
/// elsewhere.
pub fn tamil_words() -> Vec<ContentItem> {
    vec![
        word("ta", "கடல்", 3),
        word("ta", "சட்டை", 3),
        word("ta", "கரடி", 3),
        word("ta", "மலர்", 3),
        word("ta", "வீடு", 2),
        word("ta", "மரம்", 3),
        word("ta", "படம்", 3),
        word("ta", "தேன்", 2),
        word("ta", "நீர்", 2),
        word("ta", "பழம்", 3),
    ]
}

/// Items of one collection with consecutive content indexes.
pub fn collection(collection_id: &str, texts: &[&str]) -> Vec<ContentItem> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let mut item = word("ta", text, 3);
            item.collection_id = Some(collection_id.to_string());
            item.content_index = Some(i as u32);
            item
        })
        .collect()
}

/// Create a search request body.
pub fn search_request(
    tokens: &[&str],
    language: &str,
    content_type: &str,
    limit: usize,
    level: &str,
) -> serde_json::Value {
    json!({
        "tokenArr": tokens,
        "language": language,
        "contentType": content_type,
        "limit": limit,
        "cLevel": level,
        "complexityLevel": []
    })
}

/// Create a classify request body.
pub fn classify_request(
    content_type: &str,
    language: &str,
    word_count: u32,
    syllable_count: u32,
) -> serde_json::Value {
    json!({
        "contentType": content_type,
        "metrics": {
            "language": language,
            "text": "sample",
            "wordCount": word_count,
            "syllableCount": syllable_count
        }
    })
}
