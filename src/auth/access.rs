//! Resource gateway: the authorization decision for file/folder actions.
//!
//! Every file/folder operation goes through here after the principal has
//! been resolved. The owner check runs before the grant lookup; owners
//! implicitly hold the full capability set, so the ordering is only an
//! optimization.

use uuid::Uuid;

use crate::auth::permission::{check_permission, Action};
use crate::db::{Database, ResourceRef, ShareRepository};
use crate::{Result, VaultError};

/// Authorize `user_id` to perform `action` on a resource owned by
/// `owner_id`.
///
/// Grants apply to the exact resource only; there is no permission
/// inheritance from a parent folder.
pub async fn authorize(
    db: &Database,
    user_id: Uuid,
    owner_id: Uuid,
    resource: ResourceRef,
    action: Action,
) -> Result<()> {
    if user_id == owner_id {
        return Ok(());
    }

    let role = ShareRepository::new(db.pool())
        .resolve_role(resource, user_id)
        .await?;

    match role {
        Some(role) => check_permission(role, action),
        None => Err(VaultError::Permission(format!(
            "no access to this resource for '{action}'"
        ))),
    }
}

/// Whether `user_id` may manage sharing on a resource: grant or revoke
/// roles and create public links. The resource owner and users holding an
/// owner-role grant qualify.
pub async fn can_manage(
    db: &Database,
    user_id: Uuid,
    owner_id: Uuid,
    resource: ResourceRef,
) -> Result<bool> {
    if user_id == owner_id {
        return Ok(true);
    }

    let role = ShareRepository::new(db.pool())
        .resolve_role(resource, user_id)
        .await?;
    Ok(matches!(role, Some(crate::db::ShareRole::Owner)))
}
