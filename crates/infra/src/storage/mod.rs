//! Token and user profile persistence adapters

pub mod file_user_store;
pub mod keychain_token_store;
pub mod memory;

pub use file_user_store::FileUserStore;
pub use keychain_token_store::KeychainTokenStore;
pub use memory::{MemoryTokenStore, MemoryUserStore};
