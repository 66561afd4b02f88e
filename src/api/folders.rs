//! Folder endpoints

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
use crate::catalog::{EntityKind, FolderUpdate};
use crate::error::Result;
use crate::models::{
    validate_name, validate_optional_name, FolderRequest, FolderResponse, ListQuery, ListView,
};

/// GET /folders
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<JsonPayload> {
    let view = ListView::new(EntityKind::Folder, list_query(query)?, &state.config)?;
    let key = state.config.cache_lists.then(|| view.cache_key());

    state
        .read_through(key, |store| {
            let folders: Vec<FolderResponse> = store
                .folders()
                .into_iter()
                .map(|folder| FolderResponse::build(store, folder))
                .collect();
            view.paginate(folders)
        })
        .await
}

/// GET /folders/:id
pub async fn retrieve(State(state): State<AppState>, Path(raw): Path<String>) -> Result<JsonPayload> {
    let id = parse_id(&raw, EntityKind::Folder)?;

    state
        .read_through(Some(detail_key(EntityKind::Folder, id)), |store| {
            FolderResponse::load(store, id)
        })
        .await
}

/// POST /folders
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FolderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FolderResponse>)> {
    let request = json_body(payload)?;
    let name = validate_name(request.name.as_deref())?;
    let parent = request.parent.flatten();

    let folder = state
        .mutate(|store| {
            let (folder, changes) = store.create_folder(name, parent)?;
            Ok((FolderResponse::build(store, &folder), changes))
        })
        .await?;

    info!(folder_id = folder.id, parent = ?parent, "folder created");
    Ok((StatusCode::CREATED, Json(folder)))
}

/// PUT /folders/:id
pub async fn replace(
    state: State<AppState>,
    path: Path<String>,
    payload: std::result::Result<Json<FolderRequest>, JsonRejection>,
) -> Result<Json<FolderResponse>> {
    save(state, path, payload, false).await
}

/// PATCH /folders/:id
pub async fn update(
    state: State<AppState>,
    path: Path<String>,
    payload: std::result::Result<Json<FolderRequest>, JsonRejection>,
) -> Result<Json<FolderResponse>> {
    save(state, path, payload, true).await
}

async fn save(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    payload: std::result::Result<Json<FolderRequest>, JsonRejection>,
    partial: bool,
) -> Result<Json<FolderResponse>> {
    let id = parse_id(&raw, EntityKind::Folder)?;
    state.store.read().await.folder(id)?;

    let request = json_body(payload)?;
    let update = FolderUpdate {
        name: if partial {
            validate_optional_name(request.name.as_deref())?
        } else {
            Some(validate_name(request.name.as_deref())?)
        },
        parent_id: request.parent,
    };

    let folder = state
        .mutate(|store| {
            let (folder, changes) = store.update_folder(id, update)?;
            Ok((FolderResponse::build(store, &folder), changes))
        })
        .await?;

    info!(folder_id = id, "folder updated");
    Ok(Json(folder))
}

/// DELETE /folders/:id
///
/// Cascades to every descendant folder and document; all of them are
/// invalidated.
pub async fn destroy(State(state): State<AppState>, Path(raw): Path<String>) -> Result<StatusCode> {
    let id = parse_id(&raw, EntityKind::Folder)?;

    let (documents, affected) = state
        .mutate(|store| {
            let (documents, changes) = store.delete_folder(id)?;
            Ok(((documents, changes.len()), changes))
        })
        .await?;

    for document in &documents {
        state.files.remove(&document.file_ref).await;
    }

    info!(folder_id = id, affected, documents = documents.len(), "folder deleted");
    Ok(StatusCode::NO_CONTENT)
}
