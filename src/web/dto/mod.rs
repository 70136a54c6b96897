//! Data transfer objects for the Web API.

pub mod request;
pub mod response;
pub mod validation;

pub use request::{
    FolderCreateRequest, FolderListQuery, LoginRequest, PublicLinkCreateRequest, PublicLinkQuery,
    RegisterRequest, ResourceQuery, SearchQuery, ShareCreateRequest, ShareRevokeRequest,
};
pub use response::{
    FileResponse, FolderContentsResponse, FolderResponse, LoginResponse, MessageResponse,
    PublicLinkResponse, ShareResponse, UserResponse,
};
pub use validation::ValidatedJson;
