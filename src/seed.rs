//! Demo principals for the IDOR lab.

use crate::record::{Nft, PrincipalRecord, RecordStore, Transaction};
use crate::secret::Secret;

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=150&width=150";

impl RecordStore {
    /// Builds the store with the three lab principals: `"1"` Jordan,
    /// `"2"` Taylor and `"3"` Morgan.
    pub fn seeded() -> Self {
        Self::new(seed_records())
    }
}

fn tx(id: &str, kind: &str, amount: &str, timestamp: &str, signature: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind: kind.to_string(),
        amount: amount.to_string(),
        timestamp: timestamp.to_string(),
        status: "Confirmed".to_string(),
        signature: signature.to_string(),
    }
}

fn nft(id: &str, name: &str, collection: &str) -> Nft {
    Nft {
        id: id.to_string(),
        name: name.to_string(),
        collection: collection.to_string(),
        image: PLACEHOLDER_IMAGE.to_string(),
    }
}

fn seed_records() -> Vec<PrincipalRecord> {
    vec![
        PrincipalRecord {
            id: "1".to_string(),
            name: "Jordan".to_string(),
            wallet_address: "JrdN1XyBfXJKUd5dNoYz9F4UdaZ1pEMVr9Jv5e7SSYp".to_string(),
            balance: "45.32 SOL".to_string(),
            transactions: vec![
                tx("tx1", "Send", "5.2 SOL", "2025-04-15 14:32:11", "5KtP9UYpn..."),
                tx("tx2", "Receive", "12.0 SOL", "2025-04-14 09:15:43", "3xQm7UYzr..."),
                tx("tx3", "NFT Mint", "0.05 SOL", "2025-04-10 18:22:05", "9pLm2RYxq..."),
            ],
            nfts: vec![
                nft("nft1", "Solana Monkey #1234", "SMB"),
                nft("nft2", "DeGods #5678", "DeGods"),
            ],
            private_api_key: Secret::new("sk_live_jordan_12345abcdef".to_string()),
        },
        PrincipalRecord {
            id: "2".to_string(),
            name: "Taylor".to_string(),
            wallet_address: "TayX7ZpqRt2PtVk5uYs9KfmjJhAzDXpR8iKvxNK3YFD".to_string(),
            balance: "128.75 SOL".to_string(),
            transactions: vec![
                tx("tx4", "Swap", "10.5 SOL → 420 USDC", "2025-04-16 11:22:33", "7RtY9UYpn..."),
                tx("tx5", "Stake", "50.0 SOL", "2025-04-12 16:44:21", "2xZm7UYzr..."),
            ],
            nfts: vec![nft("nft3", "Okay Bears #9012", "Okay Bears")],
            private_api_key: Secret::new("sk_live_taylor_67890ghijkl".to_string()),
        },
        PrincipalRecord {
            id: "3".to_string(),
            name: "Morgan".to_string(),
            wallet_address: "MrgN5ZpqRt2PtVk5uYs9KfmjJhAzDXpR8iKvxNK3YFD".to_string(),
            balance: "352.18 SOL".to_string(),
            transactions: vec![tx(
                "tx6",
                "NFT Purchase",
                "35.0 SOL",
                "2025-04-17 09:12:45",
                "8TyZ9UYpn...",
            )],
            nfts: vec![
                nft("nft4", "Solana Monkey #4321", "SMB"),
                nft("nft5", "DeGods #8765", "DeGods"),
            ],
            private_api_key: Secret::new("sk_live_morgan_mnopqrstuv".to_string()),
        },
    ]
}
