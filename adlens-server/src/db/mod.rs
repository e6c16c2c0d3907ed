//! Database access for adlens-server
//!
//! Thin sqlx query modules over the shared schema. Every query is scoped
//! by owner; nothing here reads across owners.

pub mod accounts;
pub mod sales;
pub mod sessions;
pub mod spend;
