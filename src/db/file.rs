//! File metadata model and repository for CloudVault.
//!
//! Only metadata lives here; file bytes are kept in the object storage
//! collaborator (`crate::storage::FileStorage`).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::folder::escape_like;
use crate::{Result, VaultError};

/// File metadata entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique file ID. Also names the stored object.
    pub id: Uuid,
    /// Original file name.
    pub name: String,
    /// MIME type reported at upload.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size: i64,
    /// Owning user.
    pub owner_id: Uuid,
    /// Containing folder, if any.
    pub folder_id: Option<Uuid>,
    /// Starred flag.
    pub is_starred: bool,
    /// Soft-deletion (trash) flag.
    pub is_deleted: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// New file metadata for creation.
#[derive(Debug)]
pub struct NewFile {
    /// Original file name.
    pub name: String,
    /// MIME type reported at upload.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size: i64,
    /// Owning user.
    pub owner_id: Uuid,
    /// Containing folder, if any.
    pub folder_id: Option<Uuid>,
}

const FILE_COLUMNS: &str = "id, name, mime_type, size, owner_id, folder_id, \
                            is_starred, is_deleted, created_at, updated_at";

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new file record.
    pub async fn create(&self, new_file: &NewFile) -> Result<FileRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO files (id, name, mime_type, size, owner_id, folder_id,
                                is_starred, is_deleted, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, 0, ?, ?)",
        )
        .bind(id)
        .bind(&new_file.name)
        .bind(&new_file.mime_type)
        .bind(new_file.size)
        .bind(new_file.owner_id)
        .bind(new_file.folder_id)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| VaultError::NotFound("file".to_string()))
    }

    /// Get a file by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let result = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List an owner's non-trashed files.
    pub async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<FileRecord>> {
        let result = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE owner_id = ? AND is_deleted = 0
             ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List an owner's trashed files.
    pub async fn list_trash(&self, owner_id: Uuid) -> Result<Vec<FileRecord>> {
        let result = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE owner_id = ? AND is_deleted = 1
             ORDER BY updated_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List non-trashed files shared with a user through a grant.
    pub async fn list_shared_with(&self, user_id: Uuid) -> Result<Vec<FileRecord>> {
        let result = sqlx::query_as::<_, FileRecord>(
            "SELECT f.id, f.name, f.mime_type, f.size, f.owner_id, f.folder_id,
                    f.is_starred, f.is_deleted, f.created_at, f.updated_at
             FROM files f
             INNER JOIN shares s ON s.file_id = f.id
             WHERE s.user_id = ? AND f.is_deleted = 0
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Search an owner's non-trashed files by name substring.
    pub async fn search(&self, owner_id: Uuid, query: &str) -> Result<Vec<FileRecord>> {
        let pattern = format!("%{}%", escape_like(query));
        let result = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE owner_id = ? AND is_deleted = 0 AND name LIKE ? ESCAPE '\\'
             ORDER BY name"
        ))
        .bind(owner_id)
        .bind(pattern)
        .fetch_all(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Toggle the starred flag. Returns the new value, or None if missing.
    pub async fn toggle_star(&self, id: Uuid) -> Result<Option<bool>> {
        let result = sqlx::query(
            "UPDATE files
             SET is_starred = NOT is_starred, updated_at = ?
             WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(self.get_by_id(id).await?.map(|f| f.is_starred))
    }

    /// Set the soft-deletion flag. Returns false if the file is missing.
    pub async fn set_deleted(&self, id: Uuid, deleted: bool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE files
             SET is_deleted = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(deleted)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a file record. Grants and links on it cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// List a folder's non-trashed files.
    pub async fn list_in_folder(&self, folder_id: Uuid) -> Result<Vec<FileRecord>> {
        let result = sqlx::query_as::<_, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE folder_id = ? AND is_deleted = 0
             ORDER BY name"
        ))
        .bind(folder_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, NewUser, UserRepository};

    async fn create_owner(db: &Database, email: &str) -> Uuid {
        UserRepository::new(db.pool())
            .create(&NewUser {
                name: "Owner".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn new_file(owner_id: Uuid, name: &str) -> NewFile {
        NewFile {
            name: name.to_string(),
            mime_type: Some("text/plain".to_string()),
            size: 11,
            owner_id,
            folder_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_list_search() {
        let db = Database::open_in_memory().await.unwrap();
        let owner_id = create_owner(&db, "a@example.com").await;
        let repo = FileRepository::new(db.pool());

        repo.create(&new_file(owner_id, "notes.txt")).await.unwrap();
        repo.create(&new_file(owner_id, "photo.png")).await.unwrap();

        let listed = repo.list_owned(owner_id).await.unwrap();
        assert_eq!(listed.len(), 2);

        let hits = repo.search(owner_id, "notes").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "notes.txt");
    }

    #[tokio::test]
    async fn test_trash_restore_cycle() {
        let db = Database::open_in_memory().await.unwrap();
        let owner_id = create_owner(&db, "b@example.com").await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&new_file(owner_id, "old.txt")).await.unwrap();

        assert!(repo.set_deleted(file.id, true).await.unwrap());
        assert!(repo.list_owned(owner_id).await.unwrap().is_empty());
        assert_eq!(repo.list_trash(owner_id).await.unwrap().len(), 1);

        assert!(repo.set_deleted(file.id, false).await.unwrap());
        assert_eq!(repo.list_owned(owner_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_star() {
        let db = Database::open_in_memory().await.unwrap();
        let owner_id = create_owner(&db, "c@example.com").await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&new_file(owner_id, "fav.txt")).await.unwrap();
        assert!(!file.is_starred);

        assert_eq!(repo.toggle_star(file.id).await.unwrap(), Some(true));
        assert_eq!(repo.toggle_star(file.id).await.unwrap(), Some(false));
        assert_eq!(repo.toggle_star(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_permanent_delete() {
        let db = Database::open_in_memory().await.unwrap();
        let owner_id = create_owner(&db, "d@example.com").await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&new_file(owner_id, "gone.txt")).await.unwrap();
        assert!(repo.delete(file.id).await.unwrap());
        assert!(repo.get_by_id(file.id).await.unwrap().is_none());
        assert!(!repo.delete(file.id).await.unwrap());
    }
}
