use crate::encoder;
use crate::generate::GeneratorContext;
use crate::json::Project;
use crate::projection::{self, Projection};
use crate::types::error::{InvalidFieldTypeSnafu, UnknownFieldSnafu};
use crate::types::field_value::gen_value;
use crate::types::{AnyOf, Error, FieldSpec, FieldValue, Presence, RecordSpec, ValueKind};
use rand::Rng;
use snafu::{ensure, OptionExt};
use std::fmt;

/// One request's worth of field values, laid out by a `RecordSpec`.
///
/// Every declared field starts `Unset`. Values are checked against the
/// declared kind when they are set; numeric constraints and field
/// combinations are only checked when the record is projected, so a record
/// can pass through invalid intermediate states while it is being built.
#[derive(Clone)]
pub struct OptionsRecord {
    spec: &'static RecordSpec,
    slots: Vec<Presence<FieldValue>>,
}

impl OptionsRecord {
    pub fn new(spec: &'static RecordSpec) -> OptionsRecord {
        debug_assert!(spec.check().is_ok(), "malformed record spec {}", spec.name);
        OptionsRecord {
            spec,
            slots: vec![Presence::Unset; spec.fields.len()],
        }
    }

    pub fn spec(&self) -> &'static RecordSpec {
        self.spec
    }

    /// Declared fields with their presence, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static FieldSpec, &Presence<FieldValue>)> {
        self.spec.fields.iter().zip(self.slots.iter())
    }

    pub fn presence(&self, name: &str) -> Option<&Presence<FieldValue>> {
        self.spec.index_of(name).map(|i| &self.slots[i])
    }

    /// True when the field holds a value (not when it is unset or cleared).
    pub fn is_set(&self, name: &str) -> bool {
        self.presence(name).map_or(false, Presence::is_value)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.presence(name).and_then(Presence::value)
    }

    fn locate(&self, name: &str) -> Result<(usize, &'static FieldSpec), Error> {
        let i = self.spec.index_of(name).context(UnknownFieldSnafu {
            record: self.spec.name,
            field: name,
        })?;
        Ok((i, &self.spec.fields[i]))
    }

    /// Sets a field, rejecting values that do not fit its declared kind.
    ///
    /// For union fields a plain value populates whichever branch it fits,
    /// replacing the whole slot. Passing a `FieldValue::AnyOf` stores the
    /// slot as given, with every populated branch checked.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<&mut Self, Error> {
        let (i, field) = self.locate(name)?;
        let value: FieldValue = value.into();
        let value = match (&field.kind, value) {
            (_, v @ FieldValue::AnyOf(_)) => v,
            (ValueKind::Either(a, b), v) => {
                if a.accepts(&v) {
                    FieldValue::AnyOf(Box::new(AnyOf::from_left(v)))
                } else if b.accepts(&v) {
                    FieldValue::AnyOf(Box::new(AnyOf::from_right(v)))
                } else {
                    v
                }
            }
            (_, v) => v,
        };
        ensure!(
            field.kind.accepts(&value),
            InvalidFieldTypeSnafu {
                field: name,
                expected: field.kind.describe(),
            }
        );
        self.slots[i] = field.presence_of(value);
        Ok(self)
    }

    /// Marks a field to be removed remotely. Only fields with a clear protocol accept this.
    pub fn clear(&mut self, name: &str) -> Result<&mut Self, Error> {
        let (i, field) = self.locate(name)?;
        ensure!(
            field.clear.is_some(),
            InvalidFieldTypeSnafu {
                field: name,
                expected: "a clearable field",
            }
        );
        self.slots[i] = Presence::Clear;
        Ok(self)
    }

    pub fn unset(&mut self, name: &str) -> Result<&mut Self, Error> {
        let (i, _) = self.locate(name)?;
        self.slots[i] = Presence::Unset;
        Ok(self)
    }

    /// Direct slot access for the typed builders, whose setters are already
    /// constrained to the declared kind by their signatures.
    pub(crate) fn slot_mut(&mut self, name: &str) -> Option<&mut Presence<FieldValue>> {
        self.spec.index_of(name).map(|i| &mut self.slots[i])
    }

    /// Unchecked `set` for the typed builders.
    pub(crate) fn assign(&mut self, name: &str, value: FieldValue) {
        if let Some(i) = self.spec.index_of(name) {
            self.slots[i] = self.spec.fields[i].presence_of(value);
        }
    }

    /// Rebuilds a record from a projected payload.
    pub fn decode(spec: &'static RecordSpec, raw: &serde_json::Value) -> Result<OptionsRecord, Error> {
        encoder::decode_record(spec, raw, "")
    }

    pub(crate) fn put(&mut self, index: usize, presence: Presence<FieldValue>) {
        self.slots[index] = presence;
    }

    pub fn gen(spec: &'static RecordSpec, context: &mut GeneratorContext) -> OptionsRecord {
        OptionsRecord::gen_with_depth(spec, context, 0)
    }

    /// Random record where roughly half of the fields are set. Exclusive pairs
    /// never both hold a value, so the result always projects.
    pub(crate) fn gen_with_depth(
        spec: &'static RecordSpec,
        context: &mut GeneratorContext,
        depth: usize,
    ) -> OptionsRecord {
        let mut record = OptionsRecord::new(spec);
        for (i, field) in spec.fields.iter().enumerate() {
            let blocked = spec.exclusive.iter().any(|(a, b)| {
                (*a == field.name && record.is_set(b)) || (*b == field.name && record.is_set(a))
            });
            if blocked {
                continue;
            }
            let roll: f64 = context.rng.gen();
            if roll < 0.4 {
                continue;
            }
            record.slots[i] = if roll < 0.5 && field.clear.is_some() {
                Presence::Clear
            } else {
                field.presence_of(gen_value(&field.kind, context, depth))
            };
        }
        record
    }
}

impl PartialEq for OptionsRecord {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.spec, other.spec) && self.slots == other.slots
    }
}

impl fmt::Debug for OptionsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct(self.spec.name);
        for (field, presence) in self.entries() {
            if !presence.is_unset() {
                d.field(field.name, presence);
            }
        }
        d.finish()
    }
}

impl Project for OptionsRecord {
    fn project(&self) -> Result<Projection, Error> {
        projection::project(self)
    }
}

/// Wraps an `OptionsRecord` in a typed builder bound to one declaration table.
macro_rules! typed_options {
    ($(#[$meta:meta])* $name:ident, $spec:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            record: $crate::types::OptionsRecord,
        }

        impl $name {
            pub fn new() -> $name {
                $name {
                    record: $crate::types::OptionsRecord::new(&$spec),
                }
            }

            pub fn record(&self) -> &$crate::types::OptionsRecord {
                &self.record
            }

            pub fn record_mut(&mut self) -> &mut $crate::types::OptionsRecord {
                &mut self.record
            }

            pub fn into_record(self) -> $crate::types::OptionsRecord {
                self.record
            }

            fn with_value(self, field: &str, value: impl Into<$crate::types::FieldValue>) -> $name {
                let mut result = self;
                result.record.assign(field, value.into());
                result
            }

            #[allow(dead_code)]
            fn cleared(self, field: &str) -> $name {
                let mut result = self;
                if let Some(slot) = result.record.slot_mut(field) {
                    *slot = $crate::types::Presence::Clear;
                }
                result
            }

            pub fn project_with(
                &self,
                config: &$crate::config::ProjectionConfig,
            ) -> Result<$crate::projection::Projection, $crate::types::Error> {
                $crate::projection::project_with(&self.record, config)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::new()
            }
        }

        impl From<$name> for $crate::types::FieldValue {
            fn from(value: $name) -> Self {
                $crate::types::FieldValue::Record(value.record)
            }
        }

        impl $crate::json::Project for $name {
            fn project(&self) -> Result<$crate::projection::Projection, $crate::types::Error> {
                $crate::projection::project(&self.record)
            }
        }

        impl $crate::json::FromJson for $name {
            fn from_json(v: &serde_json::Value) -> Result<Self, $crate::types::Error> {
                Ok($name {
                    record: $crate::types::OptionsRecord::decode(&$spec, v)?,
                })
            }
        }

        impl $crate::generate::Generatable for $name {
            fn gen(context: &mut $crate::generate::GeneratorContext) -> Self {
                $name {
                    record: $crate::types::OptionsRecord::gen(&$spec, context),
                }
            }
        }
    };
}

pub(crate) use typed_options;
