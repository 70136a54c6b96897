//! Public link model and repository for CloudVault.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::share::ResourceRef;
use crate::{Result, VaultError};

/// Public link entity: an unauthenticated, token-gated pointer to a
/// resource, optionally password- and time-limited.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PublicLink {
    /// Link ID.
    pub id: Uuid,
    /// Unguessable URL token. A v4 UUID carries 122 random bits.
    pub token: String,
    /// Linked file (exclusive with folder_id).
    pub file_id: Option<Uuid>,
    /// Linked folder (exclusive with file_id).
    pub folder_id: Option<Uuid>,
    /// Argon2id hash of the link password, if one is set.
    pub password_hash: Option<String>,
    /// Expiry timestamp, if the link is time-limited.
    pub expires_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PublicLink {
    /// The resource this link points at.
    pub fn resource(&self) -> Result<ResourceRef> {
        ResourceRef::from_ids(self.file_id, self.folder_id)
    }

    /// Whether the link has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at <= now)
    }
}

/// New public link for creation.
#[derive(Debug)]
pub struct NewPublicLink {
    /// Linked resource.
    pub resource: ResourceRef,
    /// Argon2id hash of the link password. Never the plaintext.
    pub password_hash: Option<String>,
    /// Optional expiry. A past timestamp is accepted; the link is simply
    /// dead on arrival.
    pub expires_at: Option<DateTime<Utc>>,
}

const LINK_COLUMNS: &str = "id, token, file_id, folder_id, password_hash, expires_at, created_at";

/// Repository for public link operations.
pub struct PublicLinkRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PublicLinkRepository<'a> {
    /// Create a new PublicLinkRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a public link with a freshly generated token.
    pub async fn create(&self, new_link: &NewPublicLink) -> Result<PublicLink> {
        let id = Uuid::new_v4();
        // The token is random, never derived from the resource id.
        let token = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO public_links
                 (id, token, file_id, folder_id, password_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&token)
        .bind(new_link.resource.file_id())
        .bind(new_link.resource.folder_id())
        .bind(&new_link.password_hash)
        .bind(new_link.expires_at)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        self.get_by_token(&token)
            .await?
            .ok_or_else(|| VaultError::NotFound("public link".to_string()))
    }

    /// Look up a link by its URL token.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<PublicLink>> {
        let result = sqlx::query_as::<_, PublicLink>(&format!(
            "SELECT {LINK_COLUMNS} FROM public_links WHERE token = ?"
        ))
        .bind(token)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List the links created for a resource.
    pub async fn list_for_resource(&self, resource: ResourceRef) -> Result<Vec<PublicLink>> {
        let (sql, resource_id) = match resource {
            ResourceRef::File(id) => (
                format!(
                    "SELECT {LINK_COLUMNS} FROM public_links WHERE file_id = ? ORDER BY created_at"
                ),
                id,
            ),
            ResourceRef::Folder(id) => (
                format!(
                    "SELECT {LINK_COLUMNS} FROM public_links WHERE folder_id = ? ORDER BY created_at"
                ),
                id,
            ),
        };

        let result = sqlx::query_as::<_, PublicLink>(&sql)
            .bind(resource_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }
}
