//! Timestamps travel as integer seconds since the Unix epoch.
//!
//! The transform is lossy in two ways: sub-second precision is truncated on
//! encode, and the original UTC offset is dropped. Decoding always yields a
//! UTC value, so a round trip preserves the instant but not the offset.

use crate::generate::{Generatable, GeneratorContext};
use crate::json::{FromJson, ToJson};
use crate::json_ext::JsonValueExt;
use crate::types::Error;
use rand::Rng;
use serde_json::json;
use time::OffsetDateTime;

pub fn to_epoch_seconds(t: &OffsetDateTime) -> i64 {
    t.unix_timestamp()
}

/// Fails for seconds outside the range `time` can represent.
pub fn from_epoch_seconds(seconds: i64) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|e| Error::InvalidFieldType {
        field: "timestamp".to_string(),
        expected: format!("Unix seconds within range, got {} ({})", seconds, e),
    })
}

impl ToJson for OffsetDateTime {
    fn to_json(&self) -> serde_json::Value {
        json!(to_epoch_seconds(self))
    }
}

impl FromJson for OffsetDateTime {
    fn from_json(v: &serde_json::Value) -> Result<Self, Error> {
        from_epoch_seconds(v.to_i64_or_err()?)
    }
}

impl Generatable for OffsetDateTime {
    fn gen(context: &mut GeneratorContext) -> Self {
        // Whole seconds in UTC, so generated values survive a round trip unchanged.
        let seconds = context.rng.gen_range(0..4_000_000_000i64);
        OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(seconds)
    }
}
