//! Entity store trait and types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid query clause '{0}'")]
    InvalidQuery(String),
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Identifier assigned by the store to a created entity (0x-prefixed hex)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey(pub String);

impl EntityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A key/value annotation attached to an entity, used for querying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation<T> {
    pub key: String,
    pub value: T,
}

impl<T> Annotation<T> {
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

pub type StringAnnotation = Annotation<String>;
pub type NumericAnnotation = Annotation<u64>;

/// An entity to be written to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCreate {
    /// Opaque payload
    pub data: Vec<u8>,
    /// Blocks-to-live before the store expires the entity
    pub btl: u64,
    pub string_annotations: Vec<StringAnnotation>,
    pub numeric_annotations: Vec<NumericAnnotation>,
}

/// An entity as returned by a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub key: EntityKey,
    /// Address of the account that created the entity
    pub owner: String,
    pub storage_value: Vec<u8>,
    pub string_annotations: Vec<StringAnnotation>,
    pub numeric_annotations: Vec<NumericAnnotation>,
}

impl Entity {
    /// Look up a string annotation by key
    pub fn string_annotation(&self, key: &str) -> Option<&str> {
        self.string_annotations
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// Look up a numeric annotation by key
    pub fn numeric_annotation(&self, key: &str) -> Option<u64> {
        self.numeric_annotations
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value)
    }
}

/// Black-box entity store collaborator
pub trait EntityStore: Send + Sync {
    /// Write entities, returning their assigned keys in input order
    fn create_entities(&mut self, creates: Vec<EntityCreate>) -> Result<Vec<EntityKey>, StoreError>;

    /// Return every entity matching a query expression
    /// (e.g. `group = 1 && $owner = "0xabc"`)
    fn query_entities(&self, query: &str) -> Result<Vec<Entity>, StoreError>;

    /// Fetch a single payload by key
    fn get_storage_value(&self, key: &EntityKey) -> Result<Option<Vec<u8>>, StoreError>;
}
