//! Built-in dataset shown when neither cache nor network can serve the feed

use serde_json::{Value, json};

/// Data source labels exposed in feed snapshots
pub mod source {
    /// Nothing loaded yet, or the cache was just cleared
    pub const EMERGENCY: &str = "emergency";
    /// Built-in dataset after a failed fetch
    pub const EMERGENCY_FALLBACK: &str = "emergency_fallback";
    /// Served from the local cache
    pub const CACHE: &str = "cache";
    /// Live response that did not name its own source
    pub const API: &str = "api";
}

/// The two sample airdrops
pub fn emergency_airdrops() -> Vec<Value> {
    vec![
        json!({
            "id": "1",
            "name": "LayerZero Airdrop",
            "logo": "/placeholder.svg?height=40&width=40",
            "description": "Cross-chain protocol with potential airdrop for early users",
            "action": "Bridge tokens across different chains",
            "category": "latest",
            "rating": 4.5,
            "totalRatings": 1250,
            "status": "active",
            "reward": "TBA",
            "startDate": "2024-01-15",
            "difficulty": "Medium",
            "isHot": true,
            "isConfirmed": false,
            "participants": 45000,
            "networks": ["Ethereum", "Arbitrum", "Optimism"],
        }),
        json!({
            "id": "2",
            "name": "zkSync Era Airdrop",
            "logo": "/placeholder.svg?height=40&width=40",
            "description": "Layer 2 scaling solution with confirmed airdrop for users",
            "action": "Use zkSync Era for transactions",
            "category": "hottest",
            "rating": 4.8,
            "totalRatings": 2100,
            "status": "active",
            "reward": "ZK Tokens",
            "startDate": "2024-01-10",
            "difficulty": "Easy",
            "isHot": true,
            "isConfirmed": true,
            "participants": 78000,
            "networks": ["zkSync Era"],
        }),
    ]
}

/// Stats block matching [`emergency_airdrops`]
pub fn emergency_stats() -> Value {
    json!({
        "total": 2,
        "active": 2,
        "confirmed": 1,
        "potential": 1,
    })
}
