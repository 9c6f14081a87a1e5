//! Core domain models and collaborator contracts for the GDPR toolkit
//!
//! This crate contains:
//! - Domain models (Entity, FieldMeta, FieldPolicy, PolicyStore)
//! - Result containers for both request kinds (AccessResult, ForgetOutcome)
//! - The `EntityRepository` persistence contract and an in-memory reference
//!   implementation backing the CLI fixtures and the test suites

pub mod entity;
pub mod error;
pub mod field;
pub mod memory;
pub mod policy;
pub mod report;
pub mod repository;
pub mod store;

pub use entity::{Entity, EntityRef, FieldValue};
pub use error::{Error, Result};
pub use field::{Cardinality, FieldMeta, FieldType};
pub use memory::MemoryRepository;
pub use policy::{FieldPolicy, RelationshipMode, RtaDisposition, RtfDisposition};
pub use report::{AccessResult, AssetRef, ExportRecord, FieldAction, ForgetOutcome, LogEntry};
pub use repository::EntityRepository;
pub use store::{PolicyCatalog, PolicyStore};
