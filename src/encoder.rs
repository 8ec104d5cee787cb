//! Encoding and decoding of single field values against their declared kind.
//!
//! Union kinds dispatch on the branch that is actually populated (encode) or
//! on the shape of the raw value (decode). Nested kinds recurse back into the
//! projection engine.

use crate::config::ProjectionConfig;
use crate::json::FromJson;
use crate::json_ext::JsonValueExt;
use crate::projection::{join_path, Projector};
use crate::types::{
    timestamp, AnyOf, Error, FieldValue, Metadata, OneOf, OptionsRecord, Presence, RecordSpec,
    ScalarKind, ValueKind,
};
use serde_json::{json, Value};

/// Encodes a single value outside of a record projection.
///
/// Advisories raised by nested records are discarded; use
/// `projection::project_with` when they matter.
pub fn encode_value(kind: &ValueKind, value: &FieldValue, field: &str) -> Result<Value, Error> {
    let config = ProjectionConfig::quiet();
    let mut projector = Projector::new(&config);
    encode_with(&mut projector, kind, value, field)
}

pub(crate) fn encode_with(
    projector: &mut Projector,
    kind: &ValueKind,
    value: &FieldValue,
    field: &str,
) -> Result<Value, Error> {
    match (kind, value) {
        (ValueKind::Scalar(ScalarKind::Bool), FieldValue::Bool(b)) => Ok(json!(b)),
        (ValueKind::Scalar(ScalarKind::Integer), FieldValue::Integer(i)) => Ok(json!(i)),
        (ValueKind::Scalar(ScalarKind::String), FieldValue::String(s)) => Ok(json!(s)),
        (ValueKind::Scalar(ScalarKind::Decimal(bounds)), FieldValue::Decimal(d)) => {
            match bounds.violation(*d) {
                Some(reason) => Err(Error::UnencodableValue {
                    field: field.to_string(),
                    reason,
                }),
                None => Ok(json!(d)),
            }
        }
        (ValueKind::Timestamp, FieldValue::Timestamp(t)) => Ok(json!(timestamp::to_epoch_seconds(t))),
        (ValueKind::Sentinel(_), FieldValue::Sentinel(s)) if kind.accepts(value) => Ok(json!(s)),
        (ValueKind::Either(a, b), FieldValue::AnyOf(any)) => match any.resolve(field)? {
            OneOf::Left(v) => encode_with(projector, a, v, field),
            OneOf::Right(v) => encode_with(projector, b, v, field),
        },
        (ValueKind::NestedObject(spec), FieldValue::Record(r))
        | (ValueKind::ClearableNestedObject(spec), FieldValue::Record(r))
            if std::ptr::eq(*spec, r.spec()) =>
        {
            Ok(Value::Object(projector.record(r, field)?))
        }
        (ValueKind::ListOf(inner), FieldValue::List(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| encode_with(projector, inner, v, &format!("{}[{}]", field, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (ValueKind::MapOf, FieldValue::Map(m)) => Ok(json!(m)),
        _ => Err(Error::InvalidFieldType {
            field: field.to_string(),
            expected: kind.describe(),
        }),
    }
}

/// Decodes a raw wire value into the value it was encoded from.
///
/// No shape is coerced into another: an integer never decodes as a string
/// field, and a numeric string never decodes as a timestamp.
pub fn decode_value(kind: &ValueKind, raw: &Value, field: &str) -> Result<FieldValue, Error> {
    let decoded = match kind {
        ValueKind::Scalar(ScalarKind::Bool) => raw.to_bool_or_err().map(FieldValue::Bool),
        ValueKind::Scalar(ScalarKind::Integer) => raw.to_i64_or_err().map(FieldValue::Integer),
        ValueKind::Scalar(ScalarKind::String) => raw.to_string_or_err().map(FieldValue::String),
        ValueKind::Scalar(ScalarKind::Decimal(_)) => raw.to_f64_or_err().map(FieldValue::Decimal),
        ValueKind::Timestamp => raw
            .to_i64_or_err()
            .and_then(|seconds| {
                timestamp::from_epoch_seconds(seconds).map_err(|_| Error::InvalidFieldType {
                    field: field.to_string(),
                    expected: "a timestamp within the supported range".to_string(),
                })
            })
            .map(FieldValue::Timestamp),
        ValueKind::Sentinel(tokens) => raw.to_string_or_err().and_then(|s| {
            if tokens.iter().any(|t| *t == s.as_str()) {
                Ok(FieldValue::Sentinel(s))
            } else {
                Err(Error::InvalidFieldType {
                    field: field.to_string(),
                    expected: kind.describe(),
                })
            }
        }),
        ValueKind::Either(a, b) => {
            match (decode_value(a, raw, field), decode_value(b, raw, field)) {
                (Ok(v), Err(_)) => Ok(FieldValue::AnyOf(Box::new(AnyOf::from_left(v)))),
                (Err(_), Ok(v)) => Ok(FieldValue::AnyOf(Box::new(AnyOf::from_right(v)))),
                _ => {
                    log::debug!("{}: no single union branch accepts {}", field, raw.describe());
                    Err(Error::UnrecognizedUnionVariant {
                        raw: raw.describe(),
                    })
                }
            }
        }
        ValueKind::NestedObject(spec) | ValueKind::ClearableNestedObject(spec) => {
            decode_record(spec, raw, field).map(FieldValue::Record)
        }
        ValueKind::ListOf(inner) => raw
            .flat_map_array(|(i, v)| decode_value(inner, v, &format!("{}[{}]", field, i)))
            .map(FieldValue::List),
        ValueKind::MapOf => Metadata::from_json(raw).map(|m| FieldValue::Map(m.into_map())),
    };
    decoded.map_err(|e| match e {
        Error::JsonExpectedArray
        | Error::JsonExpectedObject
        | Error::JsonExpectedI64
        | Error::JsonExpectedF64
        | Error::JsonExpectedString
        | Error::JsonExpectedBool => Error::InvalidFieldType {
            field: field.to_string(),
            expected: kind.describe(),
        },
        other => other,
    })
}

pub(crate) fn decode_record(
    spec: &'static RecordSpec,
    raw: &Value,
    path: &str,
) -> Result<OptionsRecord, Error> {
    let mut record = OptionsRecord::new(spec);
    for (name, v) in raw.as_object_or_err()? {
        let field_path = join_path(path, name);
        let index = spec.index_of(name).ok_or_else(|| Error::UnknownField {
            record: spec.name.to_string(),
            field: field_path.clone(),
        })?;
        let field = &spec.fields[index];
        let presence = match field.clear {
            Some(clear) if clear.matches(v) => Presence::Clear,
            _ => Presence::Value(decode_value(&field.kind, v, &field_path)?),
        };
        record.put(index, presence);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubscriptionTrialEnd;
    use pretty_assertions::assert_eq;
    use time::OffsetDateTime;

    static TIMESTAMP: ValueKind = ValueKind::Timestamp;
    static TRIAL_END_TOKENS: ValueKind = ValueKind::Sentinel(SubscriptionTrialEnd::TOKENS);
    static TRIAL_END: ValueKind = ValueKind::Either(&TIMESTAMP, &TRIAL_END_TOKENS);

    fn at(seconds: i64) -> FieldValue {
        FieldValue::Timestamp(OffsetDateTime::from_unix_timestamp(seconds).unwrap())
    }

    #[test]
    fn union_encodes_populated_branch() {
        let left = FieldValue::AnyOf(Box::new(AnyOf::from_left(at(1_700_000_000))));
        assert_eq!(
            encode_value(&TRIAL_END, &left, "trial_end").unwrap(),
            json!(1_700_000_000)
        );
        let right = FieldValue::AnyOf(Box::new(AnyOf::from_right(SubscriptionTrialEnd::Now.into())));
        assert_eq!(encode_value(&TRIAL_END, &right, "trial_end").unwrap(), json!("now"));
    }

    #[test]
    fn union_with_both_branches_is_rejected() {
        let both = FieldValue::AnyOf(Box::new(
            AnyOf::from_left(at(1)).with_right(SubscriptionTrialEnd::Now.into()),
        ));
        let swapped = FieldValue::AnyOf(Box::new(
            AnyOf::from_right(SubscriptionTrialEnd::Now.into()).with_left(at(1)),
        ));
        let e1 = encode_value(&TRIAL_END, &both, "trial_end").unwrap_err();
        let e2 = encode_value(&TRIAL_END, &swapped, "trial_end").unwrap_err();
        assert_eq!(e1, e2);
        assert!(matches!(e1, Error::InvalidFieldCombination { .. }));
    }

    #[test]
    fn union_decodes_by_shape() {
        assert_eq!(
            decode_value(&TRIAL_END, &json!(5), "trial_end").unwrap(),
            FieldValue::AnyOf(Box::new(AnyOf::from_left(at(5))))
        );
        assert_eq!(
            decode_value(&TRIAL_END, &json!("now"), "trial_end").unwrap(),
            FieldValue::AnyOf(Box::new(AnyOf::from_right(FieldValue::Sentinel(
                "now".to_string()
            ))))
        );
        assert_eq!(
            decode_value(&TRIAL_END, &json!("tomorrow"), "trial_end").unwrap_err(),
            Error::UnrecognizedUnionVariant {
                raw: "\"tomorrow\"".to_string(),
            }
        );
    }

    #[test]
    fn mismatched_value_is_a_type_error() {
        let err = encode_value(&TIMESTAMP, &FieldValue::Integer(5), "cancel_at").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidFieldType {
                field: "cancel_at".to_string(),
                expected: "a timestamp".to_string(),
            }
        );
        let err = decode_value(&TIMESTAMP, &json!("5"), "cancel_at").unwrap_err();
        assert!(matches!(err, Error::InvalidFieldType { .. }));
    }

    #[test]
    fn out_of_range_timestamp_is_a_decode_type_error() {
        assert_eq!(
            decode_value(&TIMESTAMP, &json!(i64::MAX), "cancel_at").unwrap_err(),
            Error::InvalidFieldType {
                field: "cancel_at".to_string(),
                expected: "a timestamp within the supported range".to_string(),
            }
        );
    }

    #[test]
    fn unknown_token_names_the_field() {
        let err = decode_value(&TRIAL_END_TOKENS, &json!("later"), "items[0].interval").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidFieldType {
                field: "items[0].interval".to_string(),
                expected: "one of now".to_string(),
            }
        );
        assert_eq!(err.field(), Some("items[0].interval"));
    }
}
