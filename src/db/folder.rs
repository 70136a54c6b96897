//! Folder model and repository for CloudVault.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{Result, VaultError};

/// Folder entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Folder {
    /// Unique folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Parent folder (None for a top-level folder).
    pub parent_id: Option<Uuid>,
    /// Owning user.
    pub owner_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// New folder for creation.
#[derive(Debug)]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Optional parent folder.
    pub parent_id: Option<Uuid>,
    /// Owning user.
    pub owner_id: Uuid,
}

const FOLDER_COLUMNS: &str = "id, name, parent_id, owner_id, created_at";

/// Repository for folder operations.
pub struct FolderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FolderRepository<'a> {
    /// Create a new FolderRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new folder.
    pub async fn create(&self, new_folder: &NewFolder) -> Result<Folder> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO folders (id, name, parent_id, owner_id, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&new_folder.name)
        .bind(new_folder.parent_id)
        .bind(new_folder.owner_id)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| VaultError::NotFound("folder".to_string()))
    }

    /// Get a folder by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Folder>> {
        let result = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List the direct subfolders of a folder.
    pub async fn list_children(&self, parent_id: Uuid) -> Result<Vec<Folder>> {
        let result = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders
             WHERE parent_id = ?
             ORDER BY name"
        ))
        .bind(parent_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Search an owner's folders by name substring.
    pub async fn search(&self, owner_id: Uuid, query: &str) -> Result<Vec<Folder>> {
        let pattern = format!("%{}%", escape_like(query));
        let result = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders
             WHERE owner_id = ? AND name LIKE ? ESCAPE '\\'
             ORDER BY name"
        ))
        .bind(owner_id)
        .bind(pattern)
        .fetch_all(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }
}

/// Escape LIKE wildcards in user-supplied search text.
pub(crate) fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, NewUser, UserRepository};

    async fn create_owner(db: &Database) -> Uuid {
        UserRepository::new(db.pool())
            .create(&NewUser {
                name: "Owner".to_string(),
                email: "owner@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_and_list_children() {
        let db = Database::open_in_memory().await.unwrap();
        let owner_id = create_owner(&db).await;
        let repo = FolderRepository::new(db.pool());

        let parent = repo
            .create(&NewFolder {
                name: "docs".to_string(),
                parent_id: None,
                owner_id,
            })
            .await
            .unwrap();

        repo.create(&NewFolder {
            name: "reports".to_string(),
            parent_id: Some(parent.id),
            owner_id,
        })
        .await
        .unwrap();

        let children = repo.list_children(parent.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "reports");
    }

    #[tokio::test]
    async fn test_search_is_owner_scoped() {
        let db = Database::open_in_memory().await.unwrap();
        let owner_id = create_owner(&db).await;
        let repo = FolderRepository::new(db.pool());

        repo.create(&NewFolder {
            name: "projects".to_string(),
            parent_id: None,
            owner_id,
        })
        .await
        .unwrap();

        let hits = repo.search(owner_id, "proj").await.unwrap();
        assert_eq!(hits.len(), 1);

        let other = Uuid::new_v4();
        let none = repo.search(other, "proj").await.unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_a"), "50\\%\\_a");
    }
}
