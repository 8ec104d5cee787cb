//! Reduces an `OptionsRecord` to the payload sent over the wire.
//!
//! Fields are visited in declaration order. Unset fields produce no key at
//! all, cleared fields produce their clear sentinel, and set fields go
//! through the encoder. Any validation failure aborts the whole projection.

use crate::config::{LegacyOverlap, ProjectionConfig};
use crate::encoder;
use crate::json::ToJson;
use crate::types::{Deprecation, Error, OptionsRecord, Presence};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapOutcome {
    EmittedBoth,
    LegacySuppressed,
}

/// Non-fatal notice that a deprecated field was set alongside its successor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub field: String,
    pub successor: String,
    pub outcome: OverlapOutcome,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            OverlapOutcome::EmittedBoth => write!(
                f,
                "`{}` is deprecated and was sent together with `{}`; migrate to `{}`",
                self.field, self.successor, self.successor
            ),
            OverlapOutcome::LegacySuppressed => write!(
                f,
                "`{}` is deprecated and was dropped in favour of `{}`",
                self.field, self.successor
            ),
        }
    }
}

/// The outbound payload: wire name to encoded value, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    payload: Map<String, Value>,
    advisories: Vec<Advisory>,
}

impl Projection {
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.payload.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.payload.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }
}

impl ToJson for Projection {
    fn to_json(&self) -> Value {
        Value::Object(self.payload.clone())
    }
}

pub fn project(record: &OptionsRecord) -> Result<Projection, Error> {
    project_with(record, &ProjectionConfig::default())
}

pub fn project_with(record: &OptionsRecord, config: &ProjectionConfig) -> Result<Projection, Error> {
    let mut projector = Projector::new(config);
    let payload = projector.record(record, "")?;
    if config.log_advisories {
        for advisory in &projector.advisories {
            log::warn!("{}: {}", record.spec().name, advisory);
        }
    }
    Ok(Projection {
        payload,
        advisories: projector.advisories,
    })
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// State carried through one projection, including nested records.
pub(crate) struct Projector<'a> {
    config: &'a ProjectionConfig,
    advisories: Vec<Advisory>,
}

impl<'a> Projector<'a> {
    pub(crate) fn new(config: &'a ProjectionConfig) -> Projector<'a> {
        Projector {
            config,
            advisories: vec![],
        }
    }

    pub(crate) fn record(&mut self, record: &OptionsRecord, path: &str) -> Result<Map<String, Value>, Error> {
        check_exclusive(record, path)?;

        let mut payload = Map::new();
        for (field, presence) in record.entries() {
            let field_path = join_path(path, field.name);
            match presence {
                Presence::Unset => {}
                Presence::Clear => {
                    let clear = field.clear.ok_or_else(|| Error::InvalidFieldType {
                        field: field_path.clone(),
                        expected: "a clearable field".to_string(),
                    })?;
                    payload.insert(field.name.to_string(), clear.sentinel());
                }
                Presence::Value(value) => {
                    if let Some(deprecation) = &field.deprecation {
                        if record.is_set(deprecation.successor) {
                            let outcome = self.overlap_outcome(deprecation);
                            self.advisories.push(Advisory {
                                field: field_path.clone(),
                                successor: join_path(path, deprecation.successor),
                                outcome,
                            });
                            if outcome == OverlapOutcome::LegacySuppressed {
                                continue;
                            }
                        }
                    }
                    let encoded = encoder::encode_with(self, &field.kind, value, &field_path)?;
                    payload.insert(field.name.to_string(), encoded);
                }
            }
        }
        Ok(payload)
    }

    fn overlap_outcome(&self, deprecation: &Deprecation) -> OverlapOutcome {
        let emit_both = match self.config.legacy_overlap {
            LegacyOverlap::PerField => deprecation.tolerates_redundant,
            LegacyOverlap::EmitBoth => true,
            LegacyOverlap::PreferSuccessor => false,
        };
        if emit_both {
            OverlapOutcome::EmittedBoth
        } else {
            OverlapOutcome::LegacySuppressed
        }
    }
}

fn check_exclusive(record: &OptionsRecord, path: &str) -> Result<(), Error> {
    for (a, b) in record.spec().exclusive {
        if record.is_set(a) && record.is_set(b) {
            return Err(Error::InvalidFieldCombination {
                field: join_path(path, a),
                reason: format!("cannot be combined with `{}`", b),
            });
        }
    }
    Ok(())
}
