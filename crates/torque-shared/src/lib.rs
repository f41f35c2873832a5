//! # torque-shared
//!
//! Entity schema and validation layer for the Torque site.
//!
//! Declares the four stored entities (cars, blog posts, contact messages,
//! users), derives the insertable shape of each from its declaration, and
//! validates untyped payloads into typed insert records. Nothing here does
//! I/O; the store in `torque-store` assigns ids and timestamps.

pub mod constants;
pub mod error;
pub mod models;
pub mod schema;
pub mod types;

pub use error::{FieldViolation, ValidationError, ViolationKind};
pub use models::*;
pub use schema::{validate_insert, Entity, FieldDef, FieldKind, FieldType, Insertable};
pub use types::EmailAddress;
