//! File handlers: upload, listing, download and lifecycle.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{authorize, Action};
use crate::db::{FileRecord, FileRepository, FolderRepository, NewFile, ResourceRef};
use crate::web::dto::{FileResponse, FolderListQuery, MessageResponse, SearchQuery};
use crate::web::error::ApiError;
use crate::web::handlers::{require_user, AppState};
use crate::web::middleware::AuthUser;

/// Fetch a file or 404.
async fn get_file(state: &AppState, id: Uuid) -> Result<FileRecord, ApiError> {
    FileRepository::new(state.db.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))
}

/// POST /api/files - Upload a file as multipart form data.
///
/// Expects a `file` part and an optional `folder_id` text part.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileResponse>), ApiError> {
    let user = require_user(&state, &claims).await?;

    let mut file_part: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut folder_id: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let name = field
                    .file_name()
                    .map(|n| n.to_string())
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| ApiError::bad_request("File name is required"))?;
                let content_type = field.content_type().map(|c| c.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                file_part = Some((name, content_type, bytes.to_vec()));
            }
            Some("folder_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid folder_id: {}", e)))?;
                folder_id = Some(
                    text.parse()
                        .map_err(|_| ApiError::bad_request("Invalid folder_id"))?,
                );
            }
            _ => {}
        }
    }

    let (name, content_type, bytes) =
        file_part.ok_or_else(|| ApiError::bad_request("Missing file part"))?;

    // Uploads land in the caller's own folders only.
    if let Some(folder_id) = folder_id {
        let folder = FolderRepository::new(state.db.pool())
            .get_by_id(folder_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Folder not found"))?;
        if folder.owner_id != user.id {
            return Err(ApiError::not_found("Folder not found"));
        }
    }

    let mime_type = content_type.or_else(|| {
        mime_guess::from_path(&name)
            .first_raw()
            .map(|m| m.to_string())
    });

    let file = FileRepository::new(state.db.pool())
        .create(&NewFile {
            name,
            mime_type,
            size: bytes.len() as i64,
            owner_id: user.id,
            folder_id,
        })
        .await?;

    if let Err(e) = state.storage.save(file.id, &bytes) {
        // Keep metadata and bytes in step when the write fails.
        let _ = FileRepository::new(state.db.pool()).delete(file.id).await;
        tracing::error!(file_id = %file.id, "object write failed: {}", e);
        return Err(ApiError::internal("Failed to store file"));
    }

    tracing::info!(file_id = %file.id, size = file.size, "file uploaded");

    Ok((StatusCode::CREATED, Json(file.into())))
}

/// GET /api/files - List own files, in a folder or at the root.
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<FolderListQuery>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let repo = FileRepository::new(state.db.pool());

    let files = match query.folder_id {
        Some(folder_id) => {
            let folder = FolderRepository::new(state.db.pool())
                .get_by_id(folder_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Folder not found"))?;
            authorize(
                &state.db,
                user.id,
                folder.owner_id,
                ResourceRef::Folder(folder.id),
                Action::Read,
            )
            .await?;
            repo.list_in_folder(folder_id).await?
        }
        None => repo.list_owned(user.id).await?,
    };

    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// GET /api/files/shared - List files shared with the caller.
pub async fn shared(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let files = FileRepository::new(state.db.pool())
        .list_shared_with(user.id)
        .await?;
    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// GET /api/files/search - Search own files by name.
pub async fn search(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let files = FileRepository::new(state.db.pool())
        .search(user.id, &query.q)
        .await?;
    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// GET /api/files/trash - List own trashed files.
pub async fn trash(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let files = FileRepository::new(state.db.pool())
        .list_trash(user.id)
        .await?;
    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// GET /api/files/:id/download - Download file content.
pub async fn download(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = require_user(&state, &claims).await?;
    let file = get_file(&state, id).await?;

    // Trashed files stay out of reach until restored.
    if file.is_deleted {
        return Err(ApiError::not_found("File not found"));
    }

    authorize(
        &state.db,
        user.id,
        file.owner_id,
        ResourceRef::File(file.id),
        Action::Read,
    )
    .await?;

    let content = state.storage.load(file.id)?;
    let content_type = file
        .mime_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.name.replace('"', "")),
            ),
        ],
        content,
    ))
}

/// POST /api/files/:id/star - Toggle the starred flag.
pub async fn star(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FileResponse>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let file = get_file(&state, id).await?;

    authorize(
        &state.db,
        user.id,
        file.owner_id,
        ResourceRef::File(file.id),
        Action::Write,
    )
    .await?;

    let repo = FileRepository::new(state.db.pool());
    repo.toggle_star(id)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    let file = get_file(&state, id).await?;
    Ok(Json(file.into()))
}

/// DELETE /api/files/:id - Move a file to the trash.
pub async fn move_to_trash(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let file = get_file(&state, id).await?;

    authorize(
        &state.db,
        user.id,
        file.owner_id,
        ResourceRef::File(file.id),
        Action::Delete,
    )
    .await?;

    FileRepository::new(state.db.pool())
        .set_deleted(id, true)
        .await?;

    Ok(Json(MessageResponse::new("File moved to trash")))
}

/// POST /api/files/:id/restore - Restore a file from the trash.
///
/// Restoration is owner-only regardless of grants.
pub async fn restore(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FileResponse>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let file = get_file(&state, id).await?;

    if file.owner_id != user.id {
        return Err(ApiError::forbidden("Only the owner can restore a file"));
    }

    FileRepository::new(state.db.pool())
        .set_deleted(id, false)
        .await?;

    let file = get_file(&state, id).await?;
    Ok(Json(file.into()))
}

/// DELETE /api/files/:id/permanent - Permanently delete a file.
///
/// Owner-only. Removes the metadata row, any grants and links on it, and
/// the stored bytes.
pub async fn delete_permanent(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let file = get_file(&state, id).await?;

    if file.owner_id != user.id {
        return Err(ApiError::forbidden("Only the owner can delete a file"));
    }

    FileRepository::new(state.db.pool()).delete(id).await?;
    state.storage.delete(id)?;

    tracing::info!(file_id = %id, "file permanently deleted");

    Ok(Json(MessageResponse::new("File deleted")))
}
