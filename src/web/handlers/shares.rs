//! Share grant handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::auth::can_manage;
use crate::db::{ResourceRef, ShareRepository, ShareRole, UserRepository};
use crate::web::dto::{
    MessageResponse, ResourceQuery, ShareCreateRequest, ShareResponse, ShareRevokeRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::{require_user, resolve_owner, AppState};
use crate::web::middleware::AuthUser;

/// POST /api/shares - Grant a role on a resource to a user.
///
/// Granting again for the same (resource, user) pair replaces the role.
pub async fn create(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<ShareCreateRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&state, &claims).await?;

    let role: ShareRole = req
        .role
        .parse()
        .map_err(|e: String| ApiError::bad_request(e))?;
    let resource = ResourceRef::from_ids(req.file_id, req.folder_id)?;
    let owner_id = resolve_owner(&state, resource).await?;

    if !can_manage(&state.db, user.id, owner_id, resource).await? {
        return Err(ApiError::forbidden("Not allowed to share this resource"));
    }

    UserRepository::new(state.db.pool())
        .get_by_id(req.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Target user not found"))?;

    ShareRepository::new(state.db.pool())
        .upsert(resource, req.user_id, role)
        .await?;

    tracing::info!(user_id = %req.user_id, role = %role, "share granted");

    Ok(Json(MessageResponse::new("Share granted")))
}

/// GET /api/shares - List the grants on a resource.
pub async fn list(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<Vec<ShareResponse>>, ApiError> {
    let user = require_user(&state, &claims).await?;

    let resource = ResourceRef::from_ids(query.file_id, query.folder_id)?;
    let owner_id = resolve_owner(&state, resource).await?;

    if !can_manage(&state.db, user.id, owner_id, resource).await? {
        return Err(ApiError::forbidden("Not allowed to view shares"));
    }

    let grants = ShareRepository::new(state.db.pool())
        .list_for_resource(resource)
        .await?;
    Ok(Json(grants.into_iter().map(Into::into).collect()))
}

/// DELETE /api/shares - Revoke a grant.
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<ShareRevokeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_user(&state, &claims).await?;

    let resource = ResourceRef::from_ids(req.file_id, req.folder_id)?;
    let owner_id = resolve_owner(&state, resource).await?;

    if !can_manage(&state.db, user.id, owner_id, resource).await? {
        return Err(ApiError::forbidden("Not allowed to revoke shares"));
    }

    let removed = ShareRepository::new(state.db.pool())
        .revoke(resource, req.user_id)
        .await?;
    if !removed {
        return Err(ApiError::not_found("Share not found"));
    }

    tracing::info!(user_id = %req.user_id, "share revoked");

    Ok(Json(MessageResponse::new("Share revoked")))
}
