//! Web API request handlers.

pub mod auth;
pub mod files;
pub mod folders;
pub mod public_links;
pub mod shares;

use uuid::Uuid;

use crate::auth::{JwtClaims, TokenSigner};
use crate::db::{
    Database, FileRepository, FolderRepository, ResourceRef, User, UserRepository,
};
use crate::storage::FileStorage;
use crate::web::error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Object storage for file bytes.
    pub storage: FileStorage,
    /// Access token signer.
    pub signer: TokenSigner,
    /// Base URL used to render public link URLs.
    pub public_base_url: String,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: usize,
}

/// Resolve verified claims to a live account.
///
/// A token can outlive its account, so the subject is checked against the
/// credential store on every request.
pub async fn require_user(state: &AppState, claims: &JwtClaims) -> Result<User, ApiError> {
    UserRepository::new(state.db.pool())
        .get_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unknown account"))
}

/// Resolve a resource reference to its owner, or 404.
pub async fn resolve_owner(state: &AppState, resource: ResourceRef) -> Result<Uuid, ApiError> {
    match resource {
        ResourceRef::File(id) => {
            let file = FileRepository::new(state.db.pool())
                .get_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("File not found"))?;
            Ok(file.owner_id)
        }
        ResourceRef::Folder(id) => {
            let folder = FolderRepository::new(state.db.pool())
                .get_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Folder not found"))?;
            Ok(folder.owner_id)
        }
    }
}
