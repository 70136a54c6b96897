//! Folder handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{authorize, Action};
use crate::db::{FileRepository, FolderRepository, NewFolder, ResourceRef};
use crate::web::dto::{
    FolderContentsResponse, FolderCreateRequest, FolderResponse, SearchQuery, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::{require_user, AppState};
use crate::web::middleware::AuthUser;

/// POST /api/folders - Create a folder.
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<FolderCreateRequest>,
) -> Result<(StatusCode, Json<FolderResponse>), ApiError> {
    let user = require_user(&state, &claims).await?;
    let repo = FolderRepository::new(state.db.pool());

    // New folders nest under the caller's own folders only.
    if let Some(parent_id) = req.parent_id {
        let parent = repo
            .get_by_id(parent_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Parent folder not found"))?;
        if parent.owner_id != user.id {
            return Err(ApiError::not_found("Parent folder not found"));
        }
    }

    let folder = repo
        .create(&NewFolder {
            name: req.name,
            parent_id: req.parent_id,
            owner_id: user.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(folder.into())))
}

/// GET /api/folders/:id - List a folder's direct children.
pub async fn contents(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FolderContentsResponse>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let repo = FolderRepository::new(state.db.pool());

    let folder = repo
        .get_by_id(id)
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

    let folders = repo.list_children(id).await?;
    let files = FileRepository::new(state.db.pool())
        .list_in_folder(id)
        .await?;

    Ok(Json(FolderContentsResponse {
        folders: folders.into_iter().map(Into::into).collect(),
        files: files.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/folders/search - Search own folders by name.
pub async fn search(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<FolderResponse>>, ApiError> {
    let user = require_user(&state, &claims).await?;
    let folders = FolderRepository::new(state.db.pool())
        .search(user.id, &query.q)
        .await?;
    Ok(Json(folders.into_iter().map(Into::into).collect()))
}
