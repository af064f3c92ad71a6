//! DbVanity Provider Statistics
//!
//! Provider records, their compact binary encoding, ranking/filtering and
//! aggregation from the entity store.

mod codec;
mod entry;
mod filter;
mod query;

pub use codec::{
    deserialize_provider, serialize_provider, DecodeError, EncodeError, MIN_ENCODED_LEN,
};
pub use entry::{provider_score, recompute_fields, ProviderDataEntry};
pub use filter::{
    FilterCriteria, FilterOutcome, Range, SortBy, SortOrder, Stat, DEFAULT_DISPLAY_LIMIT,
};
pub use query::{
    fetch_all_entities, publish_provider, PublishError, GROUP_ANNOTATION_KEY,
    PROVIDER_ID_ANNOTATION_KEY,
};
