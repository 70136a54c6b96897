//! Request DTOs for the Web API.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::validation::not_empty_trimmed;

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(custom(function = "not_empty_trimmed"))]
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,
    /// Email address, unique per account.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    pub password: String,
}

/// Folder creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct FolderCreateRequest {
    /// Folder name.
    #[validate(custom(function = "not_empty_trimmed"))]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    /// Optional parent folder.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Share grant request. Exactly one of `file_id` and `folder_id` must be
/// set; that is checked in the handler since it spans two fields.
#[derive(Debug, Deserialize, Validate)]
pub struct ShareCreateRequest {
    /// User receiving the grant.
    pub user_id: Uuid,
    /// Target file.
    #[serde(default)]
    pub file_id: Option<Uuid>,
    /// Target folder.
    #[serde(default)]
    pub folder_id: Option<Uuid>,
    /// Role to grant: "owner", "editor" or "viewer".
    #[validate(custom(function = "not_empty_trimmed"))]
    pub role: String,
}

/// Share revocation request.
#[derive(Debug, Deserialize, Validate)]
pub struct ShareRevokeRequest {
    /// User whose grant is removed.
    pub user_id: Uuid,
    /// Target file.
    #[serde(default)]
    pub file_id: Option<Uuid>,
    /// Target folder.
    #[serde(default)]
    pub folder_id: Option<Uuid>,
}

/// Public link creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct PublicLinkCreateRequest {
    /// Target file.
    #[serde(default)]
    pub file_id: Option<Uuid>,
    /// Target folder.
    #[serde(default)]
    pub folder_id: Option<Uuid>,
    /// Optional password gating access to the link.
    #[serde(default)]
    pub password: Option<String>,
    /// Optional expiry instant. Past instants are accepted and yield a
    /// link that is already expired.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Query parameters naming a shareable resource. Exactly one of the two
/// ids must be set.
#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    /// Target file.
    #[serde(default)]
    pub file_id: Option<Uuid>,
    /// Target folder.
    #[serde(default)]
    pub folder_id: Option<Uuid>,
}

/// Query parameters for public link access.
#[derive(Debug, Deserialize)]
pub struct PublicLinkQuery {
    /// Password for protected links.
    #[serde(default)]
    pub password: Option<String>,
}

/// Query parameters for name search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring to match against names.
    pub q: String,
}

/// Query parameters for folder listing.
#[derive(Debug, Deserialize)]
pub struct FolderListQuery {
    /// Folder to list; the root when absent.
    #[serde(default)]
    pub folder_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = RegisterRequest {
            name: "   ".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_share_request_accepts_either_target() {
        let req: ShareCreateRequest = serde_json::from_str(
            r#"{"user_id":"11111111-1111-1111-1111-111111111111","file_id":"22222222-2222-2222-2222-222222222222","role":"viewer"}"#,
        )
        .unwrap();
        assert!(req.file_id.is_some());
        assert!(req.folder_id.is_none());
        assert!(req.validate().is_ok());
    }
}
