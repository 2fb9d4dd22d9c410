//! Per-subscriber filters
//!
//! A `Filter` decides whether a published payload is enqueued for one
//! subscriber. Filters are bound when the subscription is opened and only
//! ever read their bound arguments and the payload being published.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Arguments a client supplied when it opened a subscription
/// (for example `{"user_id": "2"}`).
pub type SubscriptionArgs = Map<String, Value>;

/// Predicate over `(payload, bound arguments)`.
pub type Predicate = Arc<dyn Fn(&Value, &SubscriptionArgs) -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub enum Filter {
    /// Accept every payload on the topic.
    #[default]
    All,
    /// Accept payloads whose top-level `field` equals `value`.
    FieldEquals { field: String, value: Value },
    /// Arbitrary predicate evaluated against the arguments captured at subscribe time.
    Predicate {
        predicate: Predicate,
        args: SubscriptionArgs,
    },
}

impl Filter {
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Build a filter from a subscription argument of the same name as the
    /// payload field. An absent or empty argument (`null`, `""`, `false`,
    /// `0`) means "accept all". Ids are strings on the wire, so a numeric
    /// argument matches the id with the same digits.
    pub fn by_argument(field: &str, args: &SubscriptionArgs) -> Self {
        match args.get(field) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Filter::All,
            Some(Value::String(s)) if s.is_empty() => Filter::All,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Filter::All,
            Some(Value::Number(n)) => Filter::field_equals(field, n.to_string()),
            Some(value) => Filter::field_equals(field, value.clone()),
        }
    }

    pub fn predicate<F>(args: SubscriptionArgs, predicate: F) -> Self
    where
        F: Fn(&Value, &SubscriptionArgs) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate {
            predicate: Arc::new(predicate),
            args,
        }
    }

    pub fn accepts(&self, payload: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::FieldEquals { field, value } => payload.get(field) == Some(value),
            Filter::Predicate { predicate, args } => predicate(payload, args),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("All"),
            Filter::FieldEquals { field, value } => f
                .debug_struct("FieldEquals")
                .field("field", field)
                .field("value", value)
                .finish(),
            Filter::Predicate { args, .. } => f
                .debug_struct("Predicate")
                .field("args", args)
                .finish_non_exhaustive(),
        }
    }
}
