//! Loading and publishing provider records through the entity store

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use dbvanity_store::{
    group_query, Annotation, EntityCreate, EntityKey, EntityStore, StoreConfig, StoreError,
};

use crate::codec::{deserialize_provider, serialize_provider, EncodeError};
use crate::entry::ProviderDataEntry;

/// Numeric annotation partitioning provider records
pub const GROUP_ANNOTATION_KEY: &str = "group";

/// String annotation carrying the provider id of a record
pub const PROVIDER_ID_ANNOTATION_KEY: &str = "providerId";

/// Load every provider record owned by `config.owner`, keyed by provider id.
///
/// Groups `1..=config.number_of_groups` are queried in turn. Records that fail
/// to decode are logged and skipped; store errors abort the load.
pub fn fetch_all_entities<S: EntityStore>(
    store: &S,
    config: &StoreConfig,
) -> Result<BTreeMap<String, ProviderDataEntry>, StoreError> {
    let mut by_provider_id = BTreeMap::new();
    let mut skipped = 0usize;

    for group in 1..=config.number_of_groups {
        let entities = store.query_entities(&group_query(group, &config.owner))?;
        debug!("Group {}: {} records", group, entities.len());

        for entity in entities {
            let provider_id = entity
                .string_annotation(PROVIDER_ID_ANNOTATION_KEY)
                .unwrap_or(entity.key.as_str());

            match deserialize_provider(provider_id, &entity.storage_value) {
                Ok(entry) => {
                    by_provider_id.insert(entry.provider_id.clone(), entry);
                }
                Err(e) => {
                    warn!("Failed to deserialize provider data {}: {}", entity.key, e);
                    skipped += 1;
                }
            }
        }
    }

    info!(
        "Loaded {} providers ({} records skipped)",
        by_provider_id.len(),
        skipped
    );
    Ok(by_provider_id)
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Encode and store a provider record in `group`
pub fn publish_provider<S: EntityStore>(
    store: &mut S,
    entry: &ProviderDataEntry,
    group: u64,
    config: &StoreConfig,
) -> Result<EntityKey, PublishError> {
    let create = EntityCreate {
        data: serialize_provider(entry)?,
        btl: config.record_btl,
        string_annotations: vec![Annotation::new(
            PROVIDER_ID_ANNOTATION_KEY,
            entry.provider_id.clone(),
        )],
        numeric_annotations: vec![Annotation::new(GROUP_ANNOTATION_KEY, group)],
    };

    let key = store
        .create_entities(vec![create])?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Backend("no key returned for created entity".into()))?;

    debug!("Published provider {} as {}", entry.provider_id, key);
    Ok(key)
}
