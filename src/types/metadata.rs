use crate::generate::{func_gen, vec_gen, Generatable, Generator, GeneratorContext};
use crate::json::{FromJson, ToJson};
use crate::json_ext::JsonValueExt;
use crate::types::{Error, FieldValue};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Key/value pairs attached to an object.
///
/// Setting metadata replaces whatever was set before; there is no merging.
/// Keys are kept sorted so the encoded form is stable.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Metadata {
    values: BTreeMap<String, String>,
}

impl Metadata {
    pub fn new() -> Metadata {
        Metadata::default()
    }

    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Metadata {
        let mut result = self;
        result.values.insert(key.into(), value.into());
        result
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.values
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Metadata {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<Metadata> for FieldValue {
    fn from(value: Metadata) -> Self {
        FieldValue::Map(value.values)
    }
}

impl ToJson for Metadata {
    fn to_json(&self) -> Value {
        json!(self.values)
    }
}

impl FromJson for Metadata {
    fn from_json(value: &Value) -> Result<Self, Error> {
        let values = value
            .as_object_or_err()?
            .iter()
            .map(|(k, v)| Ok((k.clone(), v.to_string_or_err()?)))
            .collect::<Result<BTreeMap<_, _>, Error>>()?;
        Ok(Metadata { values })
    }
}

impl Generatable for Metadata {
    fn gen(context: &mut GeneratorContext) -> Metadata {
        let pair_gen = func_gen(|c| (String::gen(c), String::gen(c)));
        let values = vec_gen(0, 4, pair_gen).gen(context).into_iter().collect();
        Metadata { values }
    }
}
