//! Document endpoints
//!
//! Creation and updates take multipart forms. A successful creation also
//! dispatches an upload notification in the background.

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::QueryRejection, Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;

use super::handlers::{list_query, parse_id};
use super::upload::DocumentForm;
use super::{AppState, JsonPayload};
use crate::cache::detail_key;
use crate::catalog::{DocumentUpdate, EntityKind, NewDocument};
use crate::error::Result;
use crate::models::{
    validate_name, validate_optional_name, DocumentResponse, ListQuery, ListView,
};
use crate::notify::UploadNotice;

/// GET /documents, optionally filtered by `?topic=<name>`
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<JsonPayload> {
    let view = ListView::new(EntityKind::Document, list_query(query)?, &state.config)?;
    let key = state.config.cache_lists.then(|| view.cache_key());

    state
        .read_through(key, |store| {
            let documents: Vec<DocumentResponse> = store
                .documents(view.topic.as_deref())
                .into_iter()
                .map(DocumentResponse::from)
                .collect();
            view.paginate(documents)
        })
        .await
}

/// GET /documents/:id
pub async fn retrieve(State(state): State<AppState>, Path(raw): Path<String>) -> Result<JsonPayload> {
    let id = parse_id(&raw, EntityKind::Document)?;

    state
        .read_through(Some(detail_key(EntityKind::Document, id)), |store| {
            store.document(id).map(DocumentResponse::from)
        })
        .await
}

/// POST /documents
pub async fn create(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<DocumentResponse>)> {
    let form = DocumentForm::read(multipart).await?;
    let name = validate_name(form.name.as_deref())?;
    let folder_id = form.required_folder_id()?;
    let topic_id = form.topic_id()?.flatten();
    let file = form.required_file()?;

    state
        .store
        .read()
        .await
        .check_document_refs(Some(folder_id), topic_id)?;

    let file_ref = state.files.save(&file.filename, &file.bytes).await?;
    let new = NewDocument {
        name,
        folder_id,
        topic_id,
        file_ref: file_ref.clone(),
    };

    let created = state
        .mutate(|store| {
            let (document, changes) = store.create_document(new)?;
            let notice = UploadNotice {
                name: document.name.clone(),
                folder: store
                    .folder_path(document.folder_id)
                    .unwrap_or_else(|_| document.folder_id.to_string()),
                topic: document
                    .topic_id
                    .and_then(|t| store.topic(t).ok())
                    .map(|t| t.name.clone()),
            };
            Ok(((DocumentResponse::from(&document), notice), changes))
        })
        .await;

    let (document, notice) = match created {
        Ok(created) => created,
        Err(e) => {
            state.files.remove(&file_ref).await;
            return Err(e);
        }
    };

    info!(document_id = document.id, folder_id, "document created");
    state.notifier.dispatch(notice);

    Ok((StatusCode::CREATED, Json(document)))
}

/// PUT /documents/:id
pub async fn replace(
    state: State<AppState>,
    path: Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<DocumentResponse>> {
    save(state, path, multipart, false).await
}

/// PATCH /documents/:id
pub async fn update(
    state: State<AppState>,
    path: Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<DocumentResponse>> {
    save(state, path, multipart, true).await
}

async fn save(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
    partial: bool,
) -> Result<Json<DocumentResponse>> {
    let id = parse_id(&raw, EntityKind::Document)?;
    state.store.read().await.document(id)?;

    let form = DocumentForm::read(multipart).await?;

    let (name, folder_id) = if partial {
        (validate_optional_name(form.name.as_deref())?, form.folder_id()?)
    } else {
        (
            Some(validate_name(form.name.as_deref())?),
            Some(form.required_folder_id()?),
        )
    };
    let topic_id = form.topic_id()?;
    let file = form.file()?;

    state
        .store
        .read()
        .await
        .check_document_refs(folder_id, topic_id.flatten())?;

    let file_ref = match file {
        Some(file) => Some(state.files.save(&file.filename, &file.bytes).await?),
        None => None,
    };
    let update = DocumentUpdate {
        name,
        folder_id,
        topic_id,
        file_ref: file_ref.clone(),
    };

    let updated = state
        .mutate(|store| {
            let previous = store.document(id)?.file_ref.clone();
            let (document, changes) = store.update_document(id, update)?;
            Ok(((DocumentResponse::from(&document), previous), changes))
        })
        .await;

    match updated {
        Ok((document, previous)) => {
            if file_ref.is_some() {
                state.files.remove(&previous).await;
            }
            info!(document_id = id, "document updated");
            Ok(Json(document))
        }
        Err(e) => {
            if let Some(file_ref) = file_ref {
                state.files.remove(&file_ref).await;
            }
            Err(e)
        }
    }
}

/// DELETE /documents/:id
pub async fn destroy(State(state): State<AppState>, Path(raw): Path<String>) -> Result<StatusCode> {
    let id = parse_id(&raw, EntityKind::Document)?;

    let document = state
        .mutate(|store| store.delete_document(id))
        .await?;
    state.files.remove(&document.file_ref).await;

    info!(document_id = id, "document deleted");
    Ok(StatusCode::NO_CONTENT)
}
