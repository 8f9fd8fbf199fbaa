/// Session state module
///
/// This module handles everything the tracker remembers between runs:
/// - Data model and product constants (data.rs)
/// - The flat key-value store backed by SQLite (store.rs)
/// - The session owner enforcing lifecycle rules (session.rs)

pub mod data;
pub mod session;
pub mod store;
