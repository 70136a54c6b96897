//! Share grant model and repository for CloudVault.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{Result, VaultError};

/// Role granted on a shared resource.
///
/// Fixed three tiers, each a superset of the next: owner, editor,
/// viewer. The capability table lives in `crate::auth::permission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareRole {
    /// Full control: read, write, delete.
    Owner,
    /// Read and write.
    Editor,
    /// Read only.
    Viewer,
}

impl ShareRole {
    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareRole::Owner => "owner",
            ShareRole::Editor => "editor",
            ShareRole::Viewer => "viewer",
        }
    }
}

impl fmt::Display for ShareRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShareRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "owner" => Ok(ShareRole::Owner),
            "editor" => Ok(ShareRole::Editor),
            "viewer" => Ok(ShareRole::Viewer),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// Reference to exactly one shareable resource: a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRef {
    /// A file by ID.
    File(Uuid),
    /// A folder by ID.
    Folder(Uuid),
}

impl ResourceRef {
    /// Build a reference from optional ids, requiring exactly one to be set.
    pub fn from_ids(file_id: Option<Uuid>, folder_id: Option<Uuid>) -> Result<Self> {
        match (file_id, folder_id) {
            (Some(id), None) => Ok(ResourceRef::File(id)),
            (None, Some(id)) => Ok(ResourceRef::Folder(id)),
            _ => Err(VaultError::Validation(
                "exactly one of file_id or folder_id must be set".to_string(),
            )),
        }
    }

    /// The file ID, if this references a file.
    pub fn file_id(&self) -> Option<Uuid> {
        match self {
            ResourceRef::File(id) => Some(*id),
            ResourceRef::Folder(_) => None,
        }
    }

    /// The folder ID, if this references a folder.
    pub fn folder_id(&self) -> Option<Uuid> {
        match self {
            ResourceRef::File(_) => None,
            ResourceRef::Folder(id) => Some(*id),
        }
    }
}

/// Share grant entity: a (resource, user, role) authorization record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShareGrant {
    /// Grant ID.
    pub id: Uuid,
    /// Shared file (exclusive with folder_id).
    pub file_id: Option<Uuid>,
    /// Shared folder (exclusive with file_id).
    pub folder_id: Option<Uuid>,
    /// Target user the role is granted to.
    pub user_id: Uuid,
    /// Granted role as stored. Unknown values deny at evaluation time.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

const SHARE_COLUMNS: &str = "id, file_id, folder_id, user_id, role, created_at";

/// Repository for share grant operations.
pub struct ShareRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShareRepository<'a> {
    /// Create a new ShareRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Grant a role on a resource to a user.
    ///
    /// Upserts: a second grant for the same (resource, user) pair replaces
    /// the role instead of adding a row. Last write wins on concurrent
    /// grants.
    pub async fn upsert(
        &self,
        resource: ResourceRef,
        user_id: Uuid,
        role: ShareRole,
    ) -> Result<ShareGrant> {
        let sql = match resource {
            ResourceRef::File(_) => {
                "INSERT INTO shares (id, file_id, user_id, role, created_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(file_id, user_id) WHERE file_id IS NOT NULL
                 DO UPDATE SET role = excluded.role"
            }
            ResourceRef::Folder(_) => {
                "INSERT INTO shares (id, folder_id, user_id, role, created_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(folder_id, user_id) WHERE folder_id IS NOT NULL
                 DO UPDATE SET role = excluded.role"
            }
        };

        let resource_id = match resource {
            ResourceRef::File(id) | ResourceRef::Folder(id) => id,
        };

        sqlx::query(sql)
            .bind(Uuid::new_v4())
            .bind(resource_id)
            .bind(user_id)
            .bind(role.as_str())
            .bind(Utc::now())
            .execute(self.pool)
            .await
            .map_err(|e| VaultError::Database(e.to_string()))?;

        self.get(resource, user_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("share grant".to_string()))
    }

    /// Get the grant for an exact (resource, user) pair.
    pub async fn get(&self, resource: ResourceRef, user_id: Uuid) -> Result<Option<ShareGrant>> {
        let (sql, resource_id) = match resource {
            ResourceRef::File(id) => (
                format!("SELECT {SHARE_COLUMNS} FROM shares WHERE file_id = ? AND user_id = ?"),
                id,
            ),
            ResourceRef::Folder(id) => (
                format!("SELECT {SHARE_COLUMNS} FROM shares WHERE folder_id = ? AND user_id = ?"),
                id,
            ),
        };

        let result = sqlx::query_as::<_, ShareGrant>(&sql)
            .bind(resource_id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Resolve the granted role for an exact (resource, user) pair.
    ///
    /// No parent-folder inheritance: a grant on a folder does not apply to
    /// the files inside it.
    pub async fn resolve_role(
        &self,
        resource: ResourceRef,
        user_id: Uuid,
    ) -> Result<Option<ShareRole>> {
        let grant = self.get(resource, user_id).await?;
        // Unknown role strings in storage deny by default (fail closed).
        Ok(grant.and_then(|g| g.role.parse().ok()))
    }

    /// Remove a grant. Returns false if no grant existed.
    pub async fn revoke(&self, resource: ResourceRef, user_id: Uuid) -> Result<bool> {
        let (sql, resource_id) = match resource {
            ResourceRef::File(id) => ("DELETE FROM shares WHERE file_id = ? AND user_id = ?", id),
            ResourceRef::Folder(id) => {
                ("DELETE FROM shares WHERE folder_id = ? AND user_id = ?", id)
            }
        };

        let result = sqlx::query(sql)
            .bind(resource_id)
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// List all grants on a resource.
    pub async fn list_for_resource(&self, resource: ResourceRef) -> Result<Vec<ShareGrant>> {
        let (sql, resource_id) = match resource {
            ResourceRef::File(id) => (
                format!("SELECT {SHARE_COLUMNS} FROM shares WHERE file_id = ? ORDER BY created_at"),
                id,
            ),
            ResourceRef::Folder(id) => (
                format!(
                    "SELECT {SHARE_COLUMNS} FROM shares WHERE folder_id = ? ORDER BY created_at"
                ),
                id,
            ),
        };

        let result = sqlx::query_as::<_, ShareGrant>(&sql)
            .bind(resource_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, FileRepository, NewFile, NewUser, UserRepository};

    async fn setup() -> (Database, Uuid, Uuid) {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        let owner = users
            .create(&NewUser {
                name: "Owner".to_string(),
                email: "owner@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let target = users
            .create(&NewUser {
                name: "Target".to_string(),
                email: "target@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let file = FileRepository::new(db.pool())
            .create(&NewFile {
                name: "shared.txt".to_string(),
                mime_type: None,
                size: 0,
                owner_id: owner.id,
                folder_id: None,
            })
            .await
            .unwrap();

        (db, file.id, target.id)
    }

    #[test]
    fn test_role_round_trip() {
        for role in [ShareRole::Owner, ShareRole::Editor, ShareRole::Viewer] {
            assert_eq!(role.as_str().parse::<ShareRole>().unwrap(), role);
        }
        assert!("admin".parse::<ShareRole>().is_err());
    }

    #[test]
    fn test_resource_ref_requires_exactly_one_id() {
        let id = Uuid::new_v4();
        assert!(ResourceRef::from_ids(Some(id), None).is_ok());
        assert!(ResourceRef::from_ids(None, Some(id)).is_ok());
        assert!(ResourceRef::from_ids(None, None).is_err());
        assert!(ResourceRef::from_ids(Some(id), Some(id)).is_err());
    }

    #[tokio::test]
    async fn test_upsert_replaces_role() {
        let (db, file_id, user_id) = setup().await;
        let repo = ShareRepository::new(db.pool());
        let resource = ResourceRef::File(file_id);

        repo.upsert(resource, user_id, ShareRole::Viewer)
            .await
            .unwrap();
        repo.upsert(resource, user_id, ShareRole::Editor)
            .await
            .unwrap();

        // Exactly one effective grant carrying the latest role.
        let grants = repo.list_for_resource(resource).await.unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].role, "editor");

        let role = repo.resolve_role(resource, user_id).await.unwrap();
        assert_eq!(role, Some(ShareRole::Editor));
    }

    #[tokio::test]
    async fn test_resolve_role_missing_grant() {
        let (db, file_id, _user_id) = setup().await;
        let repo = ShareRepository::new(db.pool());

        let role = repo
            .resolve_role(ResourceRef::File(file_id), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(role, None);
    }

    #[tokio::test]
    async fn test_revoke() {
        let (db, file_id, user_id) = setup().await;
        let repo = ShareRepository::new(db.pool());
        let resource = ResourceRef::File(file_id);

        repo.upsert(resource, user_id, ShareRole::Viewer)
            .await
            .unwrap();
        assert!(repo.revoke(resource, user_id).await.unwrap());
        assert!(!repo.revoke(resource, user_id).await.unwrap());
        assert_eq!(repo.resolve_role(resource, user_id).await.unwrap(), None);
    }
}
