//! Storage mechanisms for persisting and retrieving user credentials

pub mod user_store;

// Re-export the user store
pub use user_store::{UserStore, UserTable};
