//! Airdrop display model

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use super::common::{field_bool, field_list, field_str, truncate_string};

/// One airdrop row for table output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AirdropDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "REWARD")]
    pub reward: String,

    #[tabled(rename = "DIFFICULTY")]
    pub difficulty: String,

    #[tabled(rename = "RATING")]
    pub rating: String,

    /// Confirmed / hot markers
    #[tabled(rename = "TAGS")]
    pub tags: String,

    #[tabled(rename = "NETWORKS")]
    pub networks: String,
}

impl From<&Value> for AirdropDisplay {
    fn from(record: &Value) -> Self {
        let mut tags = Vec::new();
        if field_bool(record, "isConfirmed") {
            tags.push("confirmed");
        }
        if field_bool(record, "isHot") {
            tags.push("hot");
        }

        Self {
            id: field_str(record, "id"),
            name: truncate_string(&field_str(record, "name"), 32),
            status: field_str(record, "status"),
            reward: truncate_string(&field_str(record, "reward"), 20),
            difficulty: field_str(record, "difficulty"),
            rating: field_str(record, "rating"),
            tags: tags.join(","),
            networks: truncate_string(&field_list(record, "networks"), 30),
        }
    }
}
