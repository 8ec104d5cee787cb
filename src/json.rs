use crate::projection::Projection;
use crate::types::error::Error;

pub trait ToJson {
    fn to_json(&self) -> serde_json::Value;
}

pub trait FromJson
where
    Self: Sized,
{
    fn from_json(v: &serde_json::Value) -> Result<Self, Error>;
}

/// Reduces an options record to the fields that were explicitly set.
///
/// Unlike `ToJson` this can fail, since values are validated when they are
/// encoded rather than when they are set.
pub trait Project {
    fn project(&self) -> Result<Projection, Error>;
}
