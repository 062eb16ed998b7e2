mod auth;
mod catalog;

pub use auth::TokenManager;
pub use catalog::{CatalogStore, SESSION_MAX_AGE_SECS};
