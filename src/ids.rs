//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Opaque identifier newtypes shared by quotes, resting orders, and trade
// records. Spec treats `order_id`/`trade_id` as "opaque string or integer";
// wrapping a `String` gives one concrete, strongly-typed representation that
// a caller handing in a stringified integer (or a uuid) can use transparently.
//--------------------------------------------------------------------------------------------------

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Builds an id from anything string-like.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Generates a fresh random id, for callers that don't carry
            /// their own identifier scheme.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

opaque_id!(OrderId, "Unique identifier for a resting or incoming order.");
opaque_id!(TradeId, "Identifier of the party submitting a quote, echoed into trade records.");
