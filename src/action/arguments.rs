//! Argument binding at the action boundary.
//!
//! Binds the matched path parameters, the query string and the buffered body
//! into a name → value map, the same inputs a handler's extractors see. The map is serialized into
//! `requestArguments` and left in the request extensions for handlers.

use axum::{
    body::Bytes,
    http::Uri,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CaptureResult;

const BODY_ARGUMENT: &str = "body";
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Bound action arguments, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActionArguments(Map<String, Value>);

impl ActionArguments {
    /// Bind path parameters, then query parameters and, if captured, the body.
    ///
    /// JSON bodies bind as parsed JSON under `body` (falling back to the raw
    /// text when they do not parse), form bodies bind field by field, anything
    /// else binds as text under `body`. Repeated names keep the last value.
    pub fn bind<'p>(
        path: impl IntoIterator<Item = (&'p str, &'p str)>,
        uri: &Uri,
        media_type: Option<&str>,
        body: Option<&Bytes>,
    ) -> Self {
        let mut args = Map::new();

        for (name, value) in path {
            args.insert(name.to_string(), Value::String(value.to_string()));
        }

        if let Some(query) = uri.query() {
            for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
                args.insert(name.into_owned(), Value::String(value.into_owned()));
            }
        }

        if let Some(body) = body {
            match media_type {
                Some(FORM_MEDIA_TYPE) => {
                    for (name, value) in url::form_urlencoded::parse(body) {
                        args.insert(name.into_owned(), Value::String(value.into_owned()));
                    }
                }
                Some(media) if is_json(media) => {
                    let value = serde_json::from_slice(body).unwrap_or_else(|_| lossy(body));
                    args.insert(BODY_ARGUMENT.to_string(), value);
                }
                _ => {
                    args.insert(BODY_ARGUMENT.to_string(), lossy(body));
                }
            }
        }

        Self(args)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialized form recorded as `requestArguments`.
    pub fn to_json(&self) -> CaptureResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

fn is_json(media_type: &str) -> bool {
    media_type == "application/json" || media_type.ends_with("+json")
}

fn lossy(body: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(body).into_owned())
}
