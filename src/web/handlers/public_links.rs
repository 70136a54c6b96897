//! Public link handlers.
//!
//! Link creation and listing are authenticated management operations;
//! access through a token is the one unauthenticated read path in the
//! API. Access checks run in a fixed order: existence, then expiry, then
//! password.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::auth::can_manage;
use crate::db::{
    FileRepository, FolderRepository, NewPublicLink, PublicLink, PublicLinkRepository,
    ResourceRef,
};
use crate::web::dto::{
    FolderContentsResponse, PublicLinkCreateRequest, PublicLinkQuery, PublicLinkResponse,
    ResourceQuery, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::{require_user, resolve_owner, AppState};
use crate::web::middleware::AuthUser;

/// POST /api/public-link - Create a public link for a resource.
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<PublicLinkCreateRequest>,
) -> Result<Json<PublicLinkResponse>, ApiError> {
    let user = require_user(&state, &claims).await?;

    let resource = ResourceRef::from_ids(req.file_id, req.folder_id)?;
    let owner_id = resolve_owner(&state, resource).await?;

    if !can_manage(&state.db, user.id, owner_id, resource).await? {
        return Err(ApiError::forbidden("Not allowed to share this resource"));
    }

    // Only the hash is stored; the plaintext never reaches the database.
    let password_hash = match &req.password {
        Some(password) => {
            crate::auth::validate_password(password)
                .map_err(|e| ApiError::unprocessable(format!("Password error: {}", e)))?;
            Some(crate::auth::hash_password(password).map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::internal("Failed to create link")
            })?)
        }
        None => None,
    };

    let link = PublicLinkRepository::new(state.db.pool())
        .create(&NewPublicLink {
            resource,
            password_hash,
            expires_at: req.expires_at,
        })
        .await?;

    tracing::info!(link_id = %link.id, "public link created");

    Ok(Json(PublicLinkResponse::from_link(
        link,
        &state.public_base_url,
    )))
}

/// GET /api/public-link - List the links created for a resource.
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Vec<PublicLinkResponse>>, ApiError> {
    let user = require_user(&state, &claims).await?;

    let resource = ResourceRef::from_ids(query.file_id, query.folder_id)?;
    let owner_id = resolve_owner(&state, resource).await?;

    if !can_manage(&state.db, user.id, owner_id, resource).await? {
        return Err(ApiError::forbidden("Not allowed to view links"));
    }

    let links = PublicLinkRepository::new(state.db.pool())
        .list_for_resource(resource)
        .await?;
    Ok(Json(
        links
            .into_iter()
            .map(|l| PublicLinkResponse::from_link(l, &state.public_base_url))
            .collect(),
    ))
}

/// Enforce the expiry and password gates on a link.
fn check_access(link: &PublicLink, password: Option<&str>) -> Result<(), ApiError> {
    // Expiry is reported before the password gate so callers are not
    // prompted for a password on a dead link.
    if link.is_expired(Utc::now()) {
        return Err(ApiError::gone("This link has expired"));
    }

    if let Some(hash) = &link.password_hash {
        let password = password.ok_or_else(|| ApiError::unauthorized("Password required"))?;
        crate::auth::verify_password(password, hash)
            .map_err(|_| ApiError::unauthorized("Invalid password"))?;
    }

    Ok(())
}

/// GET /api/public/:token - Access a resource through a public link.
///
/// Unauthenticated. Protected links take the password as a `password`
/// query parameter.
pub async fn access(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Query(query): Query<PublicLinkQuery>,
) -> Result<Response, ApiError> {
    let link = PublicLinkRepository::new(state.db.pool())
        .get_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::not_found("Link not found"))?;

    check_access(&link, query.password.as_deref())?;

    match link.resource()? {
        ResourceRef::File(file_id) => {
            let file = FileRepository::new(state.db.pool())
                .get_by_id(file_id)
                .await?
                .filter(|f| !f.is_deleted)
                .ok_or_else(|| ApiError::not_found("File not found"))?;

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
            )
                .into_response())
        }
        ResourceRef::Folder(folder_id) => {
            let repo = FolderRepository::new(state.db.pool());
            let folder = repo
                .get_by_id(folder_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Folder not found"))?;

            let folders = repo.list_children(folder.id).await?;
            let files = FileRepository::new(state.db.pool())
                .list_in_folder(folder.id)
                .await?;

            Ok(Json(FolderContentsResponse {
                folders: folders.into_iter().map(Into::into).collect(),
                files: files.into_iter().map(Into::into).collect(),
            })
            .into_response())
        }
    }
}
