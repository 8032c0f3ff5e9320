//! Startup content seeding.

use std::path::Path;

use literacy_core::{classify_item, ContentItem, RuleRegistry};

use crate::error::{ApiError, Result};

/// Parse a JSON array of content items.
pub fn parse_seed(raw: &str) -> Result<Vec<ContentItem>> {
    serde_json::from_str(raw).map_err(|e| ApiError::Config(format!("invalid content seed: {e}")))
}

/// Load the seed file and report how much of it the rule tables classify.
pub async fn load_seed(path: &Path, rules: &RuleRegistry) -> Result<Vec<ContentItem>> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        ApiError::Config(format!("cannot read content seed {}: {e}", path.display()))
    })?;
    let items = parse_seed(&raw)?;

    let unclassified = items
        .iter()
        .filter(|item| !classify_item(rules, item).is_classified())
        .count();
    tracing::info!(
        path = %path.display(),
        items = items.len(),
        unclassified,
        "content seed loaded"
    );
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"[
        {
            "contentId": "w-1",
            "contentType": "Word",
            "language": "ta",
            "contentSourceData": [
                { "language": "ta", "text": "கடல்", "wordCount": 1, "syllableCount": 3 }
            ]
        }
    ]"#;

    #[test]
    fn test_parse_seed() {
        let items = parse_seed(SEED).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content_id, "w-1");
    }

    #[test]
    fn test_parse_seed_rejects_garbage() {
        assert!(matches!(parse_seed("{not json"), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_load_seed_from_file() {
        let path = std::env::temp_dir().join(format!("content-seed-{}.json", std::process::id()));
        std::fs::write(&path, SEED).unwrap();

        let items = tokio_test::block_on(load_seed(&path, RuleRegistry::builtin())).unwrap();
        assert_eq!(items.len(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_seed_file() {
        let path = std::env::temp_dir().join("content-seed-does-not-exist.json");
        let result = tokio_test::block_on(load_seed(&path, RuleRegistry::builtin()));
        assert!(matches!(result, Err(ApiError::Config(_))));
    }
}
