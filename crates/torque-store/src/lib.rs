//! # torque-store
//!
//! SQLite storage for the Torque site.
//!
//! The store is the only component that assigns generated fields: record
//! ids (UUID v4), receipt and sign-up timestamps, and stored credentials.
//! It also owns the `users.email` uniqueness rule, enforced by a `UNIQUE`
//! column rather than a read-then-write check. Callers hand it insert
//! records already validated by `torque-shared`.

pub mod blog_posts;
pub mod cars;
pub mod config;
pub mod contact_messages;
pub mod database;
pub mod migrations;
pub mod users;

mod credentials;
mod error;
mod row;

pub use config::StoreConfig;
pub use database::Database;
pub use error::{Result, StoreError};
