use crate::json::{FromJson, ToJson};
use crate::json_ext::JsonValueExt;
use crate::types::Error;

/// A union value that has been resolved to exactly one branch.
#[derive(Debug, Clone, PartialEq)]
pub enum OneOf<A, B> {
    Left(A),
    Right(B),
}

impl<A, B> ToJson for OneOf<A, B>
where
    A: ToJson,
    B: ToJson,
{
    fn to_json(&self) -> serde_json::Value {
        match self {
            OneOf::Left(a) => a.to_json(),
            OneOf::Right(b) => b.to_json(),
        }
    }
}

/// Branches are told apart by shape alone: each branch decoder is strict, and
/// a raw value accepted by both or by neither is rejected rather than
/// coerced into one of them.
impl<A, B> FromJson for OneOf<A, B>
where
    A: FromJson,
    B: FromJson,
{
    fn from_json(v: &serde_json::Value) -> Result<Self, Error> {
        match (A::from_json(v), B::from_json(v)) {
            (Ok(a), Err(_)) => Ok(OneOf::Left(a)),
            (Err(_), Ok(b)) => Ok(OneOf::Right(b)),
            _ => Err(Error::UnrecognizedUnionVariant { raw: v.describe() }),
        }
    }
}

/// The settable slot behind a union field.
///
/// Each branch can be populated independently, so a caller can end up with
/// both populated. That is only detected by `resolve`, which is what the
/// encoder calls; the outcome does not depend on which branch was set first.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyOf<A, B> {
    left: Option<A>,
    right: Option<B>,
}

impl<A, B> Default for AnyOf<A, B> {
    fn default() -> Self {
        AnyOf {
            left: None,
            right: None,
        }
    }
}

impl<A, B> AnyOf<A, B> {
    pub fn new() -> AnyOf<A, B> {
        AnyOf::default()
    }

    pub fn from_left(v: A) -> AnyOf<A, B> {
        AnyOf {
            left: Some(v),
            right: None,
        }
    }

    pub fn from_right(v: B) -> AnyOf<A, B> {
        AnyOf {
            left: None,
            right: Some(v),
        }
    }

    pub fn with_left(self, v: A) -> AnyOf<A, B> {
        let mut result = self;
        result.left = Some(v);
        result
    }

    pub fn with_right(self, v: B) -> AnyOf<A, B> {
        let mut result = self;
        result.right = Some(v);
        result
    }

    pub fn set_left(&mut self, v: A) {
        self.left = Some(v);
    }

    pub fn set_right(&mut self, v: B) {
        self.right = Some(v);
    }

    pub fn left(&self) -> Option<&A> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&B> {
        self.right.as_ref()
    }

    /// Returns the single populated branch.
    ///
    /// `field` is only used to label the error.
    pub fn resolve(&self, field: &str) -> Result<OneOf<&A, &B>, Error> {
        match (&self.left, &self.right) {
            (Some(a), None) => Ok(OneOf::Left(a)),
            (None, Some(b)) => Ok(OneOf::Right(b)),
            (Some(_), Some(_)) => Err(Error::InvalidFieldCombination {
                field: field.to_string(),
                reason: "both branches of the union are populated".to_string(),
            }),
            (None, None) => Err(Error::InvalidFieldCombination {
                field: field.to_string(),
                reason: "no branch of the union is populated".to_string(),
            }),
        }
    }

    pub fn map<C, D, F, G>(self, f: F, g: G) -> AnyOf<C, D>
    where
        F: FnOnce(A) -> C,
        G: FnOnce(B) -> D,
    {
        AnyOf {
            left: self.left.map(f),
            right: self.right.map(g),
        }
    }
}

impl<A, B> From<OneOf<A, B>> for AnyOf<A, B> {
    fn from(value: OneOf<A, B>) -> Self {
        match value {
            OneOf::Left(a) => AnyOf::from_left(a),
            OneOf::Right(b) => AnyOf::from_right(b),
        }
    }
}

impl<A, B> AnyOf<A, B>
where
    A: ToJson,
    B: ToJson,
{
    pub fn encode(&self, field: &str) -> Result<serde_json::Value, Error> {
        Ok(match self.resolve(field)? {
            OneOf::Left(a) => a.to_json(),
            OneOf::Right(b) => b.to_json(),
        })
    }
}

impl<A, B> AnyOf<A, B>
where
    A: FromJson,
    B: FromJson,
{
    pub fn decode(raw: &serde_json::Value) -> Result<AnyOf<A, B>, Error> {
        OneOf::from_json(raw).map(AnyOf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubscriptionTrialEnd;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use time::OffsetDateTime;

    type TrialEnd = AnyOf<OffsetDateTime, SubscriptionTrialEnd>;

    fn moment() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    #[test]
    fn encode_dispatches_on_populated_branch() {
        let t = TrialEnd::from_left(moment());
        assert_eq!(t.encode("trial_end").unwrap(), json!(1_700_000_000));

        let t = TrialEnd::from_right(SubscriptionTrialEnd::Now);
        assert_eq!(t.encode("trial_end").unwrap(), json!("now"));
    }

    #[test]
    fn both_branches_fail_regardless_of_order() {
        let a = TrialEnd::new()
            .with_left(moment())
            .with_right(SubscriptionTrialEnd::Now);
        let mut b = TrialEnd::new();
        b.set_right(SubscriptionTrialEnd::Now);
        b.set_left(moment());

        assert_eq!(a, b);
        let ea = a.encode("trial_end").unwrap_err();
        let eb = b.encode("trial_end").unwrap_err();
        assert_eq!(ea, eb);
        assert!(matches!(ea, Error::InvalidFieldCombination { .. }));
    }

    #[test]
    fn empty_slot_does_not_encode() {
        let err = TrialEnd::new().encode("trial_end").unwrap_err();
        assert!(matches!(err, Error::InvalidFieldCombination { .. }));
    }

    #[test]
    fn decode_is_structural() {
        assert_eq!(
            TrialEnd::decode(&json!(1_700_000_000)).unwrap(),
            TrialEnd::from_left(moment())
        );
        assert_eq!(
            TrialEnd::decode(&json!("now")).unwrap(),
            TrialEnd::from_right(SubscriptionTrialEnd::Now)
        );
        // A numeric string is neither an integer timestamp nor a known sentinel.
        for raw in [json!("1700000000"), json!("later"), json!(1.5), json!(null)] {
            assert!(matches!(
                TrialEnd::decode(&raw),
                Err(Error::UnrecognizedUnionVariant { .. })
            ));
        }
    }
}
