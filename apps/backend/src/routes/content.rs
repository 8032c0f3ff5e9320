//! Content endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use literacy_core::{
    catalog, classify_item, search_by_filter, ContentItem, ContentRepository, SearchEngine,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /v1/content/search
pub async fn search(
    State(state): State<AppState>,
    Json(payload): Json<SearchPayload>,
) -> Result<Json<SearchResult>> {
    let request = payload.into_request(state.search_timeout)?;
    let engine = SearchEngine::new(state.repo.as_ref(), state.rules);
    let result = engine.search(&request).await?;
    Ok(Json(result))
}

/// POST /v1/content/filter
pub async fn filter(
    State(state): State<AppState>,
    Json(request): Json<FilterSearchRequest>,
) -> Result<Json<FilterSearchResult>> {
    check_limit(request.limit)?;
    let result = search_by_filter(state.repo.as_ref(), &request).await?;
    Ok(Json(result))
}

/// POST /v1/content/milestone
pub async fn milestone(
    State(state): State<AppState>,
    Json(payload): Json<MilestonePayload>,
) -> Result<Json<ItemsResponse>> {
    let limit = check_limit(payload.limit)?;
    let items = catalog::milestone_content(
        state.repo.as_ref(),
        state.rules,
        payload.level()?,
        &payload.complexity()?,
        &payload.language,
        payload.content_type,
        limit,
    )
    .await?;
    Ok(Json(ItemsResponse { items }))
}

/// GET /v1/content/random
pub async fn random(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> Result<Json<ItemsResponse>> {
    let limit = check_limit(query.limit)?;
    let items =
        catalog::random_content(state.repo.as_ref(), &query.language, query.content_type, limit)
            .await?;
    Ok(Json(ItemsResponse { items }))
}

/// GET /v1/content
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page>> {
    let limit = check_limit(query.limit)?;
    let page = catalog::paginate_collection(
        state.repo.as_ref(),
        &query.collection_id,
        query.content_type,
        query.page,
        limit,
    )
    .await?;
    Ok(Json(page))
}

/// GET /v1/content/:id
pub async fn get(
    State(state): State<AppState>,
    Path(content_id): Path<String>,
) -> Result<Json<ContentItem>> {
    state
        .repo
        .find_by_id(&content_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("content {content_id}")))
}

/// POST /v1/content
///
/// Stores an item whose metrics were computed upstream. A missing
/// `contentId` is generated.
pub async fn create(
    State(state): State<AppState>,
    Json(mut item): Json<ContentItem>,
) -> Result<(StatusCode, Json<CreateContentResponse>)> {
    if item.variants.is_empty() {
        return Err(ApiError::BadRequest(
            "contentSourceData must contain at least one variant".to_string(),
        ));
    }
    if item.content_id.trim().is_empty() {
        item.content_id = uuid::Uuid::new_v4().to_string();
    }
    item.updated_at = chrono::Utc::now();

    let classification = classify_item(state.rules, &item);
    state.repo.insert(item.clone()).await?;
    tracing::info!(
        content_id = %item.content_id,
        level = ?classification.level,
        "content stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateContentResponse {
            item,
            classification,
        }),
    ))
}

/// POST /v1/content/without-tokens
pub async fn without_tokens(
    State(state): State<AppState>,
    Json(payload): Json<WithoutTokensPayload>,
) -> Result<Json<ItemsResponse>> {
    let limit = check_limit(payload.limit)?;
    let items = catalog::content_without_tokens(
        state.repo.as_ref(),
        &payload.tokens,
        &payload.language,
        limit,
    )
    .await?;
    Ok(Json(ItemsResponse { items }))
}
