//! In-process entity store

use std::collections::BTreeMap;

use tracing::debug;

use crate::query::Query;
use crate::traits::{Entity, EntityCreate, EntityKey, EntityStore, StoreError};

/// Entity store backed by a map, used in tests and offline tooling.
///
/// Every entity created through a given store is owned by that store's
/// `owner`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    owner: String,
    next_id: u64,
    entities: BTreeMap<EntityKey, Entity>,
}

impl MemoryStore {
    /// Create an empty store writing as `owner`
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            next_id: 1,
            entities: BTreeMap::new(),
        }
    }

    /// Owner address used for new entities
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Switch the writing account (entities already stored keep their owner)
    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = owner.into();
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn next_key(&mut self) -> EntityKey {
        let mut id = [0u8; 32];
        id[24..].copy_from_slice(&self.next_id.to_be_bytes());
        self.next_id += 1;
        EntityKey(format!("0x{}", hex::encode(id)))
    }
}

impl EntityStore for MemoryStore {
    fn create_entities(&mut self, creates: Vec<EntityCreate>) -> Result<Vec<EntityKey>, StoreError> {
        let mut keys = Vec::with_capacity(creates.len());

        for create in creates {
            let key = self.next_key();
            let entity = Entity {
                key: key.clone(),
                owner: self.owner.clone(),
                storage_value: create.data,
                string_annotations: create.string_annotations,
                numeric_annotations: create.numeric_annotations,
            };
            self.entities.insert(key.clone(), entity);
            keys.push(key);
        }

        debug!("Created {} entities", keys.len());
        Ok(keys)
    }

    fn query_entities(&self, query: &str) -> Result<Vec<Entity>, StoreError> {
        let query = Query::parse(query)?;
        let found: Vec<Entity> = self
            .entities
            .values()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();

        debug!("Query '{}' matched {} entities", query, found.len());
        Ok(found)
    }

    fn get_storage_value(&self, key: &EntityKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entities.get(key).map(|e| e.storage_value.clone()))
    }
}
