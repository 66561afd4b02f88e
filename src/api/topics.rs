//! Topic endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;

use super::handlers::{json_body, list_query, parse_id};
use super::{AppState, JsonPayload};
use crate::cache::detail_key;
use crate::catalog::EntityKind;
use crate::error::Result;
use crate::models::{
    validate_name, validate_optional_name, ListQuery, ListView, TopicRequest, TopicResponse,
};

/// GET /topics
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<JsonPayload> {
    let view = ListView::new(EntityKind::Topic, list_query(query)?, &state.config)?;
    let key = state.config.cache_lists.then(|| view.cache_key());

    state
        .read_through(key, |store| {
            let topics: Vec<TopicResponse> = store.topics().into_iter().map(TopicResponse::from).collect();
            view.paginate(topics)
        })
        .await
}

/// GET /topics/:id
pub async fn retrieve(State(state): State<AppState>, Path(raw): Path<String>) -> Result<JsonPayload> {
    let id = parse_id(&raw, EntityKind::Topic)?;

    state
        .read_through(Some(detail_key(EntityKind::Topic, id)), |store| {
            store.topic(id).map(TopicResponse::from)
        })
        .await
}

/// POST /topics
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TopicRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TopicResponse>)> {
    let request = json_body(payload)?;
    let name = validate_name(request.name.as_deref())?;

    let topic = state
        .mutate(|store| {
            let (topic, changes) = store.create_topic(name);
            Ok((TopicResponse::from(&topic), changes))
        })
        .await?;

    info!(topic_id = topic.id, "topic created");
    Ok((StatusCode::CREATED, Json(topic)))
}

/// PUT /topics/:id
pub async fn replace(
    state: State<AppState>,
    path: Path<String>,
    payload: std::result::Result<Json<TopicRequest>, JsonRejection>,
) -> Result<Json<TopicResponse>> {
    save(state, path, payload, false).await
}

/// PATCH /topics/:id
pub async fn update(
    state: State<AppState>,
    path: Path<String>,
    payload: std::result::Result<Json<TopicRequest>, JsonRejection>,
) -> Result<Json<TopicResponse>> {
    save(state, path, payload, true).await
}

async fn save(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    payload: std::result::Result<Json<TopicRequest>, JsonRejection>,
    partial: bool,
) -> Result<Json<TopicResponse>> {
    let id = parse_id(&raw, EntityKind::Topic)?;
    state.store.read().await.topic(id)?;

    let request = json_body(payload)?;
    let name = if partial {
        validate_optional_name(request.name.as_deref())?
    } else {
        Some(validate_name(request.name.as_deref())?)
    };

    let topic = state
        .mutate(|store| {
            let (topic, changes) = store.update_topic(id, name)?;
            Ok((TopicResponse::from(&topic), changes))
        })
        .await?;

    info!(topic_id = id, "topic updated");
    Ok(Json(topic))
}

/// DELETE /topics/:id
pub async fn destroy(State(state): State<AppState>, Path(raw): Path<String>) -> Result<StatusCode> {
    let id = parse_id(&raw, EntityKind::Topic)?;

    state
        .mutate(|store| store.delete_topic(id).map(|changes| ((), changes)))
        .await?;

    info!(topic_id = id, "topic deleted");
    Ok(StatusCode::NO_CONTENT)
}
