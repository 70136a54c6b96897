//! Response DTOs for the Web API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{FileRecord, Folder, PublicLink, ShareGrant, User};

/// Simple message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always "bearer".
    pub token_type: &'static str,
}

impl LoginResponse {
    /// Wrap a signed token.
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Account information.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// File metadata.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    /// File ID.
    pub id: Uuid,
    /// File name.
    pub name: String,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size: i64,
    /// Owner ID.
    pub owner_id: Uuid,
    /// Containing folder, or the root when absent.
    pub folder_id: Option<Uuid>,
    /// Starred flag.
    pub is_starred: bool,
    /// Trash flag.
    pub is_deleted: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponse {
    fn from(file: FileRecord) -> Self {
        Self {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            size: file.size,
            owner_id: file.owner_id,
            folder_id: file.folder_id,
            is_starred: file.is_starred,
            is_deleted: file.is_deleted,
            created_at: file.created_at,
            updated_at: file.updated_at,
        }
    }
}

/// Folder metadata.
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    /// Folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Owner ID.
    pub owner_id: Uuid,
    /// Parent folder, or the root when absent.
    pub parent_id: Option<Uuid>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            owner_id: folder.owner_id,
            parent_id: folder.parent_id,
            created_at: folder.created_at,
        }
    }
}

/// Listing of a folder's direct children.
#[derive(Debug, Serialize)]
pub struct FolderContentsResponse {
    /// Child folders.
    pub folders: Vec<FolderResponse>,
    /// Child files.
    pub files: Vec<FileResponse>,
}

/// An active share grant on a resource.
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    /// Grant ID.
    pub id: Uuid,
    /// Target file, if the grant is on a file.
    pub file_id: Option<Uuid>,
    /// Target folder, if the grant is on a folder.
    pub folder_id: Option<Uuid>,
    /// User holding the grant.
    pub user_id: Uuid,
    /// Granted role.
    pub role: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<ShareGrant> for ShareResponse {
    fn from(share: ShareGrant) -> Self {
        Self {
            id: share.id,
            file_id: share.file_id,
            folder_id: share.folder_id,
            user_id: share.user_id,
            role: share.role,
            created_at: share.created_at,
        }
    }
}

/// A public share link.
#[derive(Debug, Serialize)]
pub struct PublicLinkResponse {
    /// Link ID.
    pub id: Uuid,
    /// Opaque link token.
    pub token: String,
    /// Absolute URL for the link.
    pub public_url: String,
    /// Target file, if the link is on a file.
    pub file_id: Option<Uuid>,
    /// Target folder, if the link is on a folder.
    pub folder_id: Option<Uuid>,
    /// Whether a password gates this link.
    pub has_password: bool,
    /// Expiry instant, if set.
    pub expires_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl PublicLinkResponse {
    /// Build a response from a stored link and the configured base URL.
    pub fn from_link(link: PublicLink, public_base_url: &str) -> Self {
        let public_url = format!(
            "{}/api/public/{}",
            public_base_url.trim_end_matches('/'),
            link.token
        );
        Self {
            id: link.id,
            public_url,
            token: link.token,
            file_id: link.file_id,
            folder_id: link.folder_id,
            has_password: link.password_hash.is_some(),
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}
