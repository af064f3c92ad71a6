//! DbVanity Entity Store
//!
//! Contract for the annotated key/value store that holds provider records
//! and vanity orders, plus an in-memory implementation.

mod config;
mod memory;
mod query;
mod traits;

pub use config::{StoreConfig, DEFAULT_NUMBER_OF_GROUPS, DEFAULT_REQUEST_BTL};
pub use memory::MemoryStore;
pub use query::{group_query, Clause, ClauseValue, Query};
pub use traits::{
    Annotation, Entity, EntityCreate, EntityKey, EntityStore, NumericAnnotation,
    StoreError, StringAnnotation,
};
