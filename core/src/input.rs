//! Caller input and its normalization into `{query, body}`.

use serde_json::{Map, Value};

use crate::http::HttpMethod;

/// Ordered parameter mapping. Insertion order is kept so query parameters are
/// appended in the order the caller supplied them.
pub type Params = Map<String, Value>;

/// Input supplied to `Service::call`.
#[derive(Debug, Clone, PartialEq)]
pub enum CallInput {
    /// Query and body given separately. A missing side is treated as empty.
    Parts {
        query: Option<Params>,
        body: Option<Params>,
    },
    /// One bag of parameters, routed by the endpoint's method.
    Flat(Params),
}

impl CallInput {
    pub fn none() -> Self {
        CallInput::Flat(Params::new())
    }

    pub fn query(query: Params) -> Self {
        CallInput::Parts {
            query: Some(query),
            body: None,
        }
    }

    pub fn body(body: Params) -> Self {
        CallInput::Parts {
            query: None,
            body: Some(body),
        }
    }

    pub fn parts(query: Params, body: Params) -> Self {
        CallInput::Parts {
            query: Some(query),
            body: Some(body),
        }
    }

    /// Normalize against the endpoint's method.
    pub fn prepare(self, method: HttpMethod) -> PreparedInput {
        match self {
            CallInput::Parts { query, body } => PreparedInput {
                query: query.unwrap_or_default(),
                body: body.unwrap_or_default(),
            },
            CallInput::Flat(params) if method == HttpMethod::Get => PreparedInput {
                query: params,
                body: Params::new(),
            },
            CallInput::Flat(params) => PreparedInput {
                query: Params::new(),
                body: params,
            },
        }
    }
}

impl Default for CallInput {
    fn default() -> Self {
        CallInput::none()
    }
}

impl From<Params> for CallInput {
    fn from(params: Params) -> Self {
        CallInput::from(Value::Object(params))
    }
}

/// Classify an untyped JSON input.
///
/// An object with a `query` or `body` key is read as `Parts`; any other object
/// is `Flat`. Non-object values carry no parameters.
impl From<Value> for CallInput {
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return CallInput::none();
        };
        if map.contains_key("query") || map.contains_key("body") {
            CallInput::Parts {
                query: map.remove("query").map(into_params),
                body: map.remove("body").map(into_params),
            }
        } else {
            CallInput::Flat(map)
        }
    }
}

impl From<()> for CallInput {
    fn from(_: ()) -> Self {
        CallInput::none()
    }
}

fn into_params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

/// Normalized input: both sides always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedInput {
    pub query: Params,
    pub body: Params,
}
