//! CloudVault - cloud file storage backend.
//!
//! A file storage service with token-based authentication, role-based
//! sharing between accounts and public share links.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod storage;
pub mod web;

pub use auth::{
    allows, authorize, can_manage, check_permission, hash_password, validate_password,
    verify_password, Action, JwtClaims, PasswordError, TokenSigner, TokenVerifier,
};
pub use config::Config;
pub use db::{
    Database, FileRecord, Folder, PublicLink, ResourceRef, ShareGrant, ShareRole, User,
};
pub use error::{Result, VaultError};
pub use storage::FileStorage;
pub use web::WebServer;
