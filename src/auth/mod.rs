//! Authentication and authorization for CloudVault.

pub mod access;
pub mod password;
pub mod permission;
pub mod token;

pub use access::{authorize, can_manage};
pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use permission::{allows, check_permission, Action};
pub use token::{JwtClaims, TokenSigner, TokenVerifier};
