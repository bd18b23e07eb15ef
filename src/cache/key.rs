//! Cache key generation
//!
//! Every key lives under the `airdrophunter_` namespace so that clearing the
//! cache never touches entries written by anything else sharing the store.

use sha2::{Digest, Sha256};

/// Prefix shared by every key this application writes
pub const KEY_NAMESPACE: &str = "airdrophunter_";

/// Logical name of the airdrop listing entry
pub const AIRDROPS: &str = "airdrops";

/// Build a namespaced key for a logical entry name.
pub fn namespaced(name: &str) -> String {
    format!("{}{}", KEY_NAMESPACE, name)
}

/// Build a namespaced key scoped to the API host it was fetched from.
///
/// The scope is a short SHA-256 of the normalized base URL, so two hosts never
/// share an entry while the key stays readable in `cache status` output.
pub fn scoped(name: &str, base_url: &str) -> String {
    let normalized = base_url.trim().trim_end_matches('/').to_ascii_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    format!("{}_{}", namespaced(name), &digest[..12])
}

/// Whether a key belongs to this application's namespace.
pub fn is_namespaced(key: &str) -> bool {
    key.starts_with(KEY_NAMESPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_key() {
        assert_eq!(namespaced(AIRDROPS), "airdrophunter_airdrops");
        assert!(is_namespaced(&namespaced(AIRDROPS)));
    }

    #[test]
    fn test_scoped_key_deterministic() {
        let key1 = scoped(AIRDROPS, "https://airdrophunter.app");
        let key2 = scoped(AIRDROPS, "https://airdrophunter.app");
        assert_eq!(key1, key2);
        assert!(key1.starts_with("airdrophunter_airdrops_"));
    }

    #[test]
    fn test_scoped_key_normalizes_trailing_slash_and_case() {
        let key1 = scoped(AIRDROPS, "https://AirdropHunter.app/");
        let key2 = scoped(AIRDROPS, "https://airdrophunter.app");
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_scoped_key_different_hosts() {
        let key1 = scoped(AIRDROPS, "https://airdrophunter.app");
        let key2 = scoped(AIRDROPS, "http://localhost:3000");
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_foreign_key_not_namespaced() {
        assert!(!is_namespaced("theme_preference"));
    }
}
