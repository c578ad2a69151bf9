//! Data types exchanged with the Ignite Gym API

pub mod session;
pub mod user;

pub use session::{ApiErrorBody, RefreshTokenRequest, RefreshTokenResponse, SignInRequest, SignInResponse};
pub use user::UserProfile;
