use crate::generate::{func_gen, vec_gen, Generatable, Generator, GeneratorContext};
use crate::types::{AnyOf, Metadata, OptionsRecord, ScalarKind, ValueKind};
use rand::Rng;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// A value held by a field of an `OptionsRecord`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    Timestamp(OffsetDateTime),
    Sentinel(String),
    AnyOf(Box<AnyOf<FieldValue, FieldValue>>),
    Record(OptionsRecord),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, String>),
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<OffsetDateTime> for FieldValue {
    fn from(value: OffsetDateTime) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<OptionsRecord> for FieldValue {
    fn from(value: OptionsRecord) -> Self {
        FieldValue::Record(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value.into_iter().map(FieldValue::String).collect())
    }
}

impl<A, B> From<AnyOf<A, B>> for FieldValue
where
    A: Into<FieldValue>,
    B: Into<FieldValue>,
{
    fn from(value: AnyOf<A, B>) -> Self {
        FieldValue::AnyOf(Box::new(value.map(Into::into, Into::into)))
    }
}

/// Generates a random value conforming to `kind`.
///
/// Decimals respect their bounds and union values populate a single branch,
/// so every generated value encodes successfully.
pub fn gen_value(kind: &ValueKind, context: &mut GeneratorContext, depth: usize) -> FieldValue {
    match kind {
        ValueKind::Scalar(ScalarKind::Bool) => FieldValue::Bool(context.rng.gen()),
        ValueKind::Scalar(ScalarKind::Integer) => {
            FieldValue::Integer(context.rng.gen_range(0..10_000))
        }
        ValueKind::Scalar(ScalarKind::String) if context.rng.gen_bool(0.1) => {
            FieldValue::String(String::new())
        }
        ValueKind::Scalar(ScalarKind::String) => FieldValue::String(context.gen()),
        ValueKind::Scalar(ScalarKind::Decimal(bounds)) => {
            let steps = 10f64.powi(bounds.max_places as i32);
            let lo = (bounds.min * steps).ceil() as i64;
            let hi = (bounds.max * steps).floor() as i64;
            FieldValue::Decimal(context.rng.gen_range(lo..=hi) as f64 / steps)
        }
        ValueKind::Timestamp => FieldValue::Timestamp(OffsetDateTime::gen(context)),
        ValueKind::Sentinel(tokens) => {
            let i = context.rng.gen_range(0..tokens.len());
            FieldValue::Sentinel(tokens[i].to_string())
        }
        ValueKind::Either(a, b) => {
            let any = if context.rng.gen_bool(0.5) {
                AnyOf::from_left(gen_value(a, context, depth))
            } else {
                AnyOf::from_right(gen_value(b, context, depth))
            };
            FieldValue::AnyOf(Box::new(any))
        }
        ValueKind::NestedObject(spec) | ValueKind::ClearableNestedObject(spec) => {
            FieldValue::Record(OptionsRecord::gen_with_depth(spec, context, depth + 1))
        }
        ValueKind::ListOf(inner) => {
            let max = if depth > 2 { 0 } else { 3 };
            let item_gen = func_gen(|c| gen_value(inner, c, depth + 1));
            FieldValue::List(vec_gen(0, max, item_gen).gen(context))
        }
        ValueKind::MapOf => FieldValue::Map(Metadata::gen(context).into_map()),
    }
}
