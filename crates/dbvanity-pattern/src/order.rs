//! Vanity order requests stored as entities

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use dbvanity_store::{
    Annotation, EntityCreate, EntityKey, EntityStore, Query, StoreConfig, StoreError,
};

use crate::difficulty::calculate_work_unit;
use crate::problem::{Problem, ProblemError};

/// String annotation marking an entity as a vanity order
pub const ORDER_ANNOTATION_KEY: &str = "vanity_market_request";

/// String annotation carrying the order's submission time
pub const TIMESTAMP_ANNOTATION_KEY: &str = "timestamp";

/// `0x` + uncompressed secp256k1 public key (65 bytes)
const PUBLIC_KEY_LEN: usize = 132;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(&'static str),
    #[error("Order must contain at least one problem")]
    NoProblems,
    #[error("Problem #{index}: {source}")]
    Problem {
        index: usize,
        #[source]
        source: ProblemError,
    },
    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("Malformed order payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Order not found: {0}")]
    NotFound(EntityKey),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A request to search for an address matching any of `problems`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VanityRequest {
    /// Public key the found address is derived from
    pub public_key: String,
    pub problems: Vec<Problem>,
}

/// A request as stored, with its submission time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VanityRequestWithTimestamp {
    #[serde(flatten)]
    pub request: VanityRequest,
    /// ISO-8601 submission time
    pub timestamp: String,
}

impl VanityRequest {
    pub fn new(public_key: impl Into<String>, problems: Vec<Problem>) -> Self {
        Self {
            public_key: public_key.into(),
            problems,
        }
    }

    pub fn validate(&self) -> Result<(), OrderError> {
        let key = self
            .public_key
            .strip_prefix("0x")
            .ok_or(OrderError::InvalidPublicKey("must start with 0x"))?;
        if self.public_key.len() != PUBLIC_KEY_LEN {
            return Err(OrderError::InvalidPublicKey("must be 132 characters long"));
        }
        if !key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(OrderError::InvalidPublicKey("must be hex"));
        }

        if self.problems.is_empty() {
            return Err(OrderError::NoProblems);
        }
        for (index, problem) in self.problems.iter().enumerate() {
            problem
                .validate()
                .map_err(|source| OrderError::Problem { index, source })?;
        }
        Ok(())
    }

    /// Expected number of addresses to examine for this order
    pub fn work_unit(&self) -> f64 {
        calculate_work_unit(&self.problems)
    }

    /// Build the entity that submits this order at `timestamp`
    pub fn to_entity(&self, timestamp: &str, config: &StoreConfig) -> Result<EntityCreate, OrderError> {
        self.validate()?;
        check_timestamp(timestamp)?;

        let stored = VanityRequestWithTimestamp {
            request: self.clone(),
            timestamp: timestamp.to_string(),
        };

        Ok(EntityCreate {
            data: serde_json::to_vec(&stored)?,
            btl: config.request_btl,
            string_annotations: vec![
                Annotation::new(ORDER_ANNOTATION_KEY, "1".to_string()),
                Annotation::new(TIMESTAMP_ANNOTATION_KEY, timestamp.to_string()),
            ],
            numeric_annotations: vec![],
        })
    }
}

impl VanityRequestWithTimestamp {
    /// Parse and validate a stored order payload
    pub fn from_payload(data: &[u8]) -> Result<Self, OrderError> {
        let order: Self = serde_json::from_slice(data)?;
        order.request.validate()?;
        check_timestamp(&order.timestamp)?;
        Ok(order)
    }
}

fn check_timestamp(timestamp: &str) -> Result<(), OrderError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|_| ())
        .map_err(|_| OrderError::InvalidTimestamp(timestamp.to_string()))
}

/// Query selecting every open order
pub fn order_query() -> String {
    Query::new().str(ORDER_ANNOTATION_KEY, "1").to_string()
}

/// Load a single order by entity key
pub fn fetch_order<S: EntityStore>(
    store: &S,
    key: &EntityKey,
) -> Result<VanityRequestWithTimestamp, OrderError> {
    let data = store
        .get_storage_value(key)?
        .ok_or_else(|| OrderError::NotFound(key.clone()))?;
    VanityRequestWithTimestamp::from_payload(&data)
}

/// Load every order in the store, skipping malformed ones
pub fn list_orders<S: EntityStore>(
    store: &S,
) -> Result<Vec<(EntityKey, VanityRequestWithTimestamp)>, OrderError> {
    let entities = store.query_entities(&order_query())?;
    let mut orders = Vec::with_capacity(entities.len());

    for entity in entities {
        match VanityRequestWithTimestamp::from_payload(&entity.storage_value) {
            Ok(order) => orders.push((entity.key, order)),
            Err(e) => warn!("Skipping order {}: {}", entity.key, e),
        }
    }

    debug!("Loaded {} orders", orders.len());
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbvanity_store::MemoryStore;

    const PUBLIC_KEY: &str = "0x04d4a96d675423cc05f60409c48b084a53d3fa0ac59957939f526505c43f975b77fabab74decd66d80396308db9cb4db13b0c273811d51a1773d6d9e2dbcac1d28";
    const TIMESTAMP: &str = "2025-03-01T12:00:00.000Z";

    fn request() -> VanityRequest {
        VanityRequest::new(
            PUBLIC_KEY,
            vec![
                Problem::UserPrefix { specifier: "0xC0FFEE".into() },
                Problem::LeadingAny { length: 8 },
            ],
        )
    }

    #[test]
    fn test_validate() {
        assert!(request().validate().is_ok());

        let mut bad = request();
        bad.public_key = "0x04".into();
        assert!(matches!(bad.validate(), Err(OrderError::InvalidPublicKey(_))));

        let mut empty = request();
        empty.problems.clear();
        assert!(matches!(empty.validate(), Err(OrderError::NoProblems)));

        let mut bad_problem = request();
        bad_problem.problems.push(Problem::LettersHeavy { count: 3 });
        assert!(matches!(
            bad_problem.validate(),
            Err(OrderError::Problem { index: 2, .. })
        ));
    }

    #[test]
    fn test_entity_payload() {
        let entity = request().to_entity(TIMESTAMP, &StoreConfig::default()).unwrap();
        assert_eq!(entity.btl, 302_400);
        assert_eq!(entity.string_annotations[0].key, ORDER_ANNOTATION_KEY);
        assert_eq!(entity.string_annotations[1].value, TIMESTAMP);

        let json: serde_json::Value = serde_json::from_slice(&entity.data).unwrap();
        assert_eq!(json["publicKey"], PUBLIC_KEY);
        assert_eq!(json["timestamp"], TIMESTAMP);
        assert_eq!(json["problems"][1]["type"], "leading-any");
    }

    #[test]
    fn test_bad_timestamp() {
        assert!(matches!(
            request().to_entity("yesterday", &StoreConfig::default()),
            Err(OrderError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_store_roundtrip() {
        let mut store = MemoryStore::new("0xuser");
        let entity = request().to_entity(TIMESTAMP, &StoreConfig::default()).unwrap();
        let keys = store
            .create_entities(vec![
                entity,
                EntityCreate {
                    data: b"not json".to_vec(),
                    btl: 1,
                    string_annotations: vec![Annotation::new(ORDER_ANNOTATION_KEY, "1".to_string())],
                    numeric_annotations: vec![],
                },
            ])
            .unwrap();

        let order = fetch_order(&store, &keys[0]).unwrap();
        assert_eq!(order.request, request());
        assert_eq!(order.timestamp, TIMESTAMP);

        assert!(matches!(fetch_order(&store, &keys[1]), Err(OrderError::Payload(_))));
        assert!(matches!(
            fetch_order(&store, &EntityKey("0x00".into())),
            Err(OrderError::NotFound(_))
        ));

        let orders = list_orders(&store).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].0, keys[0]);
    }

    #[test]
    fn test_work_unit() {
        let order = VanityRequest::new(PUBLIC_KEY, vec![Problem::LeadingAny { length: 8 }]);
        assert_eq!(order.work_unit(), 268_435_456.0);
    }
}
