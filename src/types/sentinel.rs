use crate::generate::{Generatable, GeneratorContext};
use crate::json::{FromJson, ToJson};
use crate::types::{Error, FieldValue};
use rand::Rng;
use serde_json::json;

/// Declares a closed set of symbolic wire tokens.
macro_rules! sentinel {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const TOKENS: &'static [&'static str] = &[$($token),+];
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn token(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }

            pub fn from_token(s: &str) -> Option<$name> {
                match s {
                    $($token => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl ToJson for $name {
            fn to_json(&self) -> serde_json::Value {
                json!(self.token())
            }
        }

        impl FromJson for $name {
            fn from_json(v: &serde_json::Value) -> Result<Self, Error> {
                v.as_str()
                    .and_then($name::from_token)
                    .ok_or_else(|| Error::UnknownSentinel {
                        kind: stringify!($name).to_string(),
                        value: v.to_string(),
                    })
            }
        }

        impl Generatable for $name {
            fn gen(context: &mut GeneratorContext) -> Self {
                let i = context.rng.gen_range(0..$name::ALL.len());
                $name::ALL[i]
            }
        }

        impl From<$name> for FieldValue {
            fn from(value: $name) -> Self {
                FieldValue::Sentinel(value.token().to_string())
            }
        }
    };
}

sentinel!(
    /// Symbolic values accepted by `trial_end` in place of a timestamp.
    SubscriptionTrialEnd {
        Now => "now",
    }
);

sentinel!(
    CollectionMethod {
        ChargeAutomatically => "charge_automatically",
        SendInvoice => "send_invoice",
    }
);

sentinel!(
    /// How the first invoice of a subscription is handled when it cannot be paid.
    PaymentBehavior {
        AllowIncomplete => "allow_incomplete",
        ErrorIfIncomplete => "error_if_incomplete",
    }
);

sentinel!(
    BillingInterval {
        Day => "day",
        Week => "week",
        Month => "month",
        Year => "year",
    }
);
