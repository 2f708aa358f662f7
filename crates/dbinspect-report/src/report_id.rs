//! Report ID generation.

use chrono::{DateTime, Utc};
use dbinspect_core::constants::REPORT_ID_BYTES;

/// Opaque report ID: blake3 over the target, the generation time and a
/// random UUID, truncated and hex-encoded.
pub fn generate_report_id(target: &str, generated_at: DateTime<Utc>) -> String {
    let nanos = generated_at
        .timestamp_nanos_opt()
        .unwrap_or_else(|| generated_at.timestamp_micros());
    let mut hasher = blake3::Hasher::new();
    hasher.update(target.as_bytes());
    hasher.update(b"\0");
    hasher.update(&nanos.to_le_bytes());
    hasher.update(uuid::Uuid::new_v4().as_bytes());
    let hash = hasher.finalize();
    hash.as_bytes()[..REPORT_ID_BYTES]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_fixed_length_lowercase_hex() {
        let id = generate_report_id("db01:1521/ORCL", Utc::now());
        assert_eq!(id.len(), REPORT_ID_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn same_target_and_instant_still_differ() {
        let now = Utc::now();
        let ids: HashSet<String> = (0..100)
            .map(|_| generate_report_id("db01:1521/ORCL", now))
            .collect();
        assert_eq!(ids.len(), 100);
    }
}
