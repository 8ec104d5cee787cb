use crate::types::{Error, FieldValue, Presence};
use serde_json::{json, Value};
use std::collections::HashSet;

/// Numeric constraints checked when a decimal field is encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimalBounds {
    pub min: f64,
    pub max: f64,
    pub max_places: u32,
}

impl DecimalBounds {
    /// The `[0, 100]` percentage range used across the billing API.
    pub const fn percent(max_places: u32) -> DecimalBounds {
        DecimalBounds {
            min: 0.0,
            max: 100.0,
            max_places,
        }
    }

    /// Describes the first violated constraint, if any.
    pub fn violation(&self, v: f64) -> Option<String> {
        if !v.is_finite() {
            return Some(format!("{} is not a finite number", v));
        }
        if v < self.min {
            return Some(format!("{} is below the minimum of {}", v, self.min));
        }
        if v > self.max {
            return Some(format!("{} is above the maximum of {}", v, self.max));
        }
        if decimal_places(v) > self.max_places as usize {
            return Some(format!(
                "{} has more than {} decimal places",
                v, self.max_places
            ));
        }
        None
    }
}

/// Digits after the point in the shortest rendering that reads back as `v`,
/// which is also what goes on the wire.
fn decimal_places(v: f64) -> usize {
    let rendered = v.to_string();
    rendered.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarKind {
    Bool,
    Integer,
    String,
    Decimal(DecimalBounds),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    Scalar(ScalarKind),
    /// Encoded as integer Unix seconds.
    Timestamp,
    /// One of a closed set of literal tokens.
    Sentinel(&'static [&'static str]),
    /// Exactly one of two otherwise unrelated kinds.
    Either(&'static ValueKind, &'static ValueKind),
    NestedObject(&'static RecordSpec),
    /// A nested object that can also be removed through its clear sentinel.
    ClearableNestedObject(&'static RecordSpec),
    ListOf(&'static ValueKind),
    /// Flat string to string map.
    MapOf,
}

impl ValueKind {
    /// Checks that `value` has the shape this kind declares.
    ///
    /// Sentinel tokens are checked against the declared set. Numeric
    /// constraints are not; those are validated at encode time.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (ValueKind::Scalar(ScalarKind::Bool), FieldValue::Bool(_)) => true,
            (ValueKind::Scalar(ScalarKind::Integer), FieldValue::Integer(_)) => true,
            (ValueKind::Scalar(ScalarKind::String), FieldValue::String(_)) => true,
            (ValueKind::Scalar(ScalarKind::Decimal(_)), FieldValue::Decimal(_)) => true,
            (ValueKind::Timestamp, FieldValue::Timestamp(_)) => true,
            (ValueKind::Sentinel(tokens), FieldValue::Sentinel(s)) => {
                tokens.iter().any(|t| *t == s.as_str())
            }
            (ValueKind::Either(a, b), FieldValue::AnyOf(any)) => {
                any.left().map_or(true, |v| a.accepts(v))
                    && any.right().map_or(true, |v| b.accepts(v))
            }
            (ValueKind::NestedObject(spec), FieldValue::Record(r))
            | (ValueKind::ClearableNestedObject(spec), FieldValue::Record(r)) => {
                std::ptr::eq(*spec, r.spec())
            }
            (ValueKind::ListOf(kind), FieldValue::List(items)) => {
                items.iter().all(|v| kind.accepts(v))
            }
            (ValueKind::MapOf, FieldValue::Map(_)) => true,
            _ => false,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ValueKind::Scalar(ScalarKind::Bool) => "a boolean".to_string(),
            ValueKind::Scalar(ScalarKind::Integer) => "an integer".to_string(),
            ValueKind::Scalar(ScalarKind::String) => "a string".to_string(),
            ValueKind::Scalar(ScalarKind::Decimal(b)) => format!(
                "a decimal in [{}, {}] with at most {} places",
                b.min, b.max, b.max_places
            ),
            ValueKind::Timestamp => "a timestamp".to_string(),
            ValueKind::Sentinel(tokens) => format!("one of {}", tokens.join("|")),
            ValueKind::Either(a, b) => format!("either {} or {}", a.describe(), b.describe()),
            ValueKind::NestedObject(spec) | ValueKind::ClearableNestedObject(spec) => {
                format!("{} options", spec.name)
            }
            ValueKind::ListOf(kind) => format!("a list of {}", kind.describe()),
            ValueKind::MapOf => "a string map".to_string(),
        }
    }
}

pub static STRING_KIND: ValueKind = ValueKind::Scalar(ScalarKind::String);
pub static TIMESTAMP_KIND: ValueKind = ValueKind::Timestamp;

/// How a field is told to remove its remote value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearProtocol {
    EmptyString,
    Null,
}

impl ClearProtocol {
    pub fn sentinel(&self) -> Value {
        match self {
            ClearProtocol::EmptyString => json!(""),
            ClearProtocol::Null => Value::Null,
        }
    }

    pub fn matches(&self, raw: &Value) -> bool {
        *raw == self.sentinel()
    }

    /// True for a value that would encode to the clear sentinel.
    pub fn is_marker(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (ClearProtocol::EmptyString, FieldValue::String(s)) => s.is_empty(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deprecation {
    /// Wire name of the replacement field on the same record.
    pub successor: &'static str,
    /// Whether the remote API accepts the legacy field alongside its successor.
    pub tolerates_redundant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ValueKind,
    pub clear: Option<ClearProtocol>,
    pub deprecation: Option<Deprecation>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: ValueKind) -> FieldSpec {
        FieldSpec {
            name,
            kind,
            clear: None,
            deprecation: None,
        }
    }

    pub const fn clearable(self, clear: ClearProtocol) -> FieldSpec {
        FieldSpec {
            clear: Some(clear),
            ..self
        }
    }

    /// The presence a value takes once assigned to this field.
    ///
    /// A value indistinguishable on the wire from the clear sentinel, such as
    /// `""` on an `EmptyString` field, is stored as `Clear`.
    pub fn presence_of(&self, value: FieldValue) -> Presence<FieldValue> {
        match self.clear {
            Some(clear) if clear.is_marker(&value) => Presence::Clear,
            _ => Presence::Value(value),
        }
    }

    pub const fn deprecated(self, successor: &'static str, tolerates_redundant: bool) -> FieldSpec {
        FieldSpec {
            deprecation: Some(Deprecation {
                successor,
                tolerates_redundant,
            }),
            ..self
        }
    }
}

/// The declaration table for one request type.
#[derive(Debug, PartialEq)]
pub struct RecordSpec {
    pub name: &'static str,
    /// Fields in declaration order, which is also the wire order.
    pub fields: &'static [FieldSpec],
    /// Pairs of fields that must not both hold a value.
    pub exclusive: &'static [(&'static str, &'static str)],
}

impl RecordSpec {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates the table itself, recursing into nested records.
    pub fn check(&self) -> Result<(), Error> {
        let invalid = |field: &str, reason: &str| Error::InvalidFieldType {
            field: format!("{}.{}", self.name, field),
            expected: reason.to_string(),
        };
        let mut seen = HashSet::new();
        for field in self.fields {
            if !seen.insert(field.name) {
                return Err(invalid(field.name, "a unique wire name"));
            }
            if let Some(dep) = &field.deprecation {
                if dep.successor == field.name || self.field(dep.successor).is_none() {
                    return Err(invalid(field.name, "a successor declared on the same record"));
                }
            }
            if matches!(field.kind, ValueKind::ClearableNestedObject(_)) && field.clear.is_none() {
                return Err(invalid(field.name, "a clear protocol"));
            }
            check_kind(&field.kind)?;
        }
        for (a, b) in self.exclusive {
            if self.field(a).is_none() || self.field(b).is_none() || a == b {
                return Err(invalid(*a, "an exclusive pair of two declared fields"));
            }
        }
        Ok(())
    }
}

fn check_kind(kind: &ValueKind) -> Result<(), Error> {
    match kind {
        ValueKind::NestedObject(spec) | ValueKind::ClearableNestedObject(spec) => spec.check(),
        ValueKind::ListOf(inner) => check_kind(inner),
        ValueKind::Either(a, b) => {
            check_kind(a)?;
            check_kind(b)
        }
        _ => Ok(()),
    }
}
