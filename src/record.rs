use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Violation;
use crate::secret::{serialize_exposed, Secret};

/// A principal's wallet profile.
///
/// Records are immutable once seeded and are shared as `Arc<PrincipalRecord>`
/// between the record store and any sessions bound to them.
///
/// Serializes to the camelCase shape the lab frontend expects. The private API
/// key is serialized too: the fixed lookup still hands it to the record's
/// owner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalRecord {
    /// Unique identifier within the store
    pub id: String,
    /// Display name
    pub name: String,
    /// Public wallet address
    pub wallet_address: String,
    /// Human-readable balance, e.g. `45.32 SOL`
    pub balance: String,
    /// Recent transactions, newest first
    pub transactions: Vec<Transaction>,
    /// Owned NFTs
    pub nfts: Vec<Nft>,
    /// Owner-only API key
    #[serde(serialize_with = "serialize_exposed")]
    pub private_api_key: Secret<String>,
}

/// A wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Transaction identifier
    pub id: String,
    /// Transaction kind (`Send`, `Swap`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Amount as displayed
    pub amount: String,
    /// Timestamp as displayed
    pub timestamp: String,
    /// Confirmation status
    pub status: String,
    /// Truncated signature
    pub signature: String,
}

/// An NFT held by a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nft {
    /// NFT identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Collection name
    pub collection: String,
    /// Image URL
    pub image: String,
}

/// Read-only store of principal records keyed by identifier.
///
/// Built once at startup and handed to handlers through application state.
/// There are no update or delete operations.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<String, Arc<PrincipalRecord>>,
}

impl RecordStore {
    /// Builds a store from `records`.
    ///
    /// Identifiers must be unique. On a duplicate the first record wins and
    /// the later one is logged and dropped.
    pub fn new(records: impl IntoIterator<Item = PrincipalRecord>) -> Self {
        let mut map = HashMap::new();
        for record in records {
            if map.contains_key(&record.id) {
                tracing::warn!(id = %record.id, "duplicate record identifier ignored");
                continue;
            }
            map.insert(record.id.clone(), Arc::new(record));
        }
        Self { records: map }
    }

    /// Returns the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` violation if no such record exists.
    pub fn get(&self, id: &str) -> Result<Arc<PrincipalRecord>, Violation> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| Violation::not_found("User"))
    }

    /// Identifiers of every stored record, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViolationKind;

    fn record(id: &str, name: &str) -> PrincipalRecord {
        PrincipalRecord {
            id: id.to_string(),
            name: name.to_string(),
            wallet_address: format!("wallet-{id}"),
            balance: "1.00 SOL".to_string(),
            transactions: Vec::new(),
            nfts: Vec::new(),
            private_api_key: Secret::new(format!("sk_test_{id}")),
        }
    }

    #[test]
    fn get_returns_stored_record() {
        let store = RecordStore::new([record("1", "Jordan"), record("2", "Taylor")]);
        let found = store.get("2").unwrap();
        assert_eq!(found.name, "Taylor");
    }

    #[test]
    fn get_unknown_is_not_found() {
        let store = RecordStore::new([record("1", "Jordan")]);
        let err = store.get("99").unwrap_err();
        assert_eq!(err.kind, ViolationKind::NotFound);
        assert_eq!(err.message, "User not found");
    }

    #[test]
    fn duplicate_identifiers_keep_first() {
        let store = RecordStore::new([record("1", "Jordan"), record("1", "Impostor")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("1").unwrap().name, "Jordan");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let r = record("1", "Jordan");
        let debug_output = format!("{:?}", r);
        assert!(!debug_output.contains("sk_test_1"));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn json_uses_frontend_field_names() {
        let mut r = record("1", "Jordan");
        r.transactions.push(Transaction {
            id: "tx1".to_string(),
            kind: "Send".to_string(),
            amount: "5.2 SOL".to_string(),
            timestamp: "2025-04-15 14:32:11".to_string(),
            status: "Confirmed".to_string(),
            signature: "5KtP9UYpn...".to_string(),
        });

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["walletAddress"], "wallet-1");
        assert_eq!(json["privateApiKey"], "sk_test_1");
        assert_eq!(json["transactions"][0]["type"], "Send");
    }
}
