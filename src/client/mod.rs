pub mod auth;
pub mod http;

pub use auth::{AuthError, AuthProvider, SessionAuth};
pub use http::{ApiClient, ApiError, RequestConfig, TokenProvider, Transport};
