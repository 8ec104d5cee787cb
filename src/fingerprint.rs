use data_encoding::HEXLOWER;
use ring::digest;

use crate::json::ToJson;
use crate::projection::Projection;

/// Derives a stable key from a projected payload.
///
/// Projection is deterministic, so resending the same options yields the
/// same key, which makes it suitable as an idempotency key for retries.
pub fn idempotency_key(projection: &Projection) -> String {
    let payload_str = projection.to_json().to_string();
    let digest = digest::digest(&digest::SHA256, payload_str.as_bytes());
    // The full digest is longer than the remote API needs.
    let full_key = HEXLOWER.encode(digest.as_ref());
    full_key[0..32].to_string()
}
