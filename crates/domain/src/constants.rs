//! Wire constants
//!
//! Endpoint paths and error codes agreed with the Ignite Gym API.

// Endpoints
pub const SESSIONS_PATH: &str = "/sessions";
pub const REFRESH_TOKEN_PATH: &str = "/sessions/refresh-token";

// Error codes carried in the `message` field of a 401 body
pub const TOKEN_EXPIRED_CODE: &str = "token.expired";
pub const TOKEN_INVALID_CODE: &str = "token.invalid";

// Headers
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

// Persistence keys
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "IgniteGym.session";
pub const TOKEN_ACCOUNT: &str = "auth.token";
pub const DEFAULT_USER_PROFILE_FILE: &str = "ignitegym-user.json";
