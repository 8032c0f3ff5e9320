//! Classification endpoint

use axum::{extract::State, Json};
use literacy_core::classify::{classify, matching_levels};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /v1/classify
pub async fn classify_metrics(
    State(state): State<AppState>,
    Json(payload): Json<ClassifyPayload>,
) -> Result<Json<ClassifyResponse>> {
    let language = payload.metrics.language.as_str();
    let classification = classify(state.rules, &payload.metrics, payload.content_type, language);
    let matching = matching_levels(state.rules, &payload.metrics, payload.content_type, language);

    if matching.len() > 1 {
        tracing::debug!(
            language,
            content_type = %payload.content_type,
            levels = ?matching,
            "metrics matched overlapping level rules"
        );
    }

    Ok(Json(ClassifyResponse {
        level: classification.level,
        complexity: classification.complexity,
        matching_levels: matching,
        rules_version: state.rules.version(),
    }))
}
