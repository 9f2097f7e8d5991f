//! # Codecs
//!
//! Converts response bodies into [`Resource`]s and caller payloads into request
//! bodies. [`HalJsonCodec`] understands the HAL+JSON shape:
//!
//! ```text
//! {
//!   <data fields...>,
//!   "_links":    { "<rel>": { "href": "...", "templated": bool, "name": "..." } | [ ... ] },
//!   "_embedded": { "<rel>": <resource> | [<resource>, ...] }
//! }
//! ```
//!
//! A navigation state carries a [`Codecs`] set; the response's `Content-Type`
//! decides which codec decodes it.

use crate::error::HalError;
use crate::model::{Link, Resource};
use crate::transport::Payload;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const HAL_JSON: &str = "application/hal+json";
pub const JSON: &str = "application/json";

const LINKS: &str = "_links";
const EMBEDDED: &str = "_embedded";

/// A pluggable media-type (de)serializer.
pub trait Codec: Send + Sync {
    /// Media types this codec decodes. The first one is sent when encoding.
    fn media_types(&self) -> &[&'static str];

    fn decode(&self, body: &[u8]) -> Result<Resource, HalError>;

    fn encode(&self, payload: &Value) -> Result<Payload, HalError>;
}

/// The default HAL+JSON codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalJsonCodec;

impl Codec for HalJsonCodec {
    fn media_types(&self) -> &[&'static str] {
        &[HAL_JSON, JSON]
    }

    fn decode(&self, body: &[u8]) -> Result<Resource, HalError> {
        let value: Value = serde_json::from_slice(body)?;
        decode_resource(value, None)
    }

    fn encode(&self, payload: &Value) -> Result<Payload, HalError> {
        let bytes = serde_json::to_vec(payload).map_err(|e| HalError::EncodeFailed(e.to_string()))?;
        Ok(Payload::new(HAL_JSON, bytes))
    }
}

fn decode_resource(value: Value, rel: Option<String>) -> Result<Resource, HalError> {
    let Value::Object(mut data) = value else {
        return Err(HalError::DecodeFailed(format!(
            "expected a JSON object for resource '{}'",
            rel.as_deref().unwrap_or("root")
        )));
    };

    let links = match data.remove(LINKS) {
        Some(links) => decode_links(links)?,
        None => Vec::new(),
    };
    let embedded = match data.remove(EMBEDDED) {
        Some(embedded) => decode_embedded(embedded)?,
        None => Vec::new(),
    };

    let self_link = links.iter().find(|link| link.rel == "self");
    let href = self_link.map(|link| link.href.clone());
    let name = self_link.and_then(|link| link.name.clone());

    Ok(Resource {
        rel,
        href,
        name,
        data: Value::Object(data),
        links,
        embedded,
    })
}

fn decode_links(value: Value) -> Result<Vec<Link>, HalError> {
    let Value::Object(map) = value else {
        return Err(HalError::DecodeFailed(format!("'{LINKS}' must be an object")));
    };

    let mut links = Vec::new();
    for (rel, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    links.push(decode_link(&rel, item)?);
                }
            }
            item => links.push(decode_link(&rel, item)?),
        }
    }
    Ok(links)
}

fn decode_link(rel: &str, value: Value) -> Result<Link, HalError> {
    let Value::Object(fields) = value else {
        return Err(HalError::DecodeFailed(format!("link '{rel}' must be an object")));
    };
    let href = string_field(&fields, "href")
        .ok_or_else(|| HalError::DecodeFailed(format!("link '{rel}' has no href")))?;

    Ok(Link {
        rel: rel.to_string(),
        href,
        templated: fields.get("templated").and_then(Value::as_bool).unwrap_or(false),
        name: string_field(&fields, "name"),
        title: string_field(&fields, "title"),
        media_type: string_field(&fields, "type"),
    })
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

fn decode_embedded(value: Value) -> Result<Vec<Resource>, HalError> {
    let Value::Object(map) = value else {
        return Err(HalError::DecodeFailed(format!("'{EMBEDDED}' must be an object")));
    };

    let mut embedded = Vec::new();
    for (rel, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    embedded.push(decode_resource(item, Some(rel.clone()))?);
                }
            }
            item => embedded.push(decode_resource(item, Some(rel.clone()))?),
        }
    }
    Ok(embedded)
}

/// The ordered set of codecs a navigation state decodes and encodes with.
#[derive(Clone)]
pub struct Codecs {
    codecs: Vec<Arc<dyn Codec>>,
}

impl Codecs {
    /// An empty list falls back to the default set.
    pub fn new(codecs: Vec<Arc<dyn Codec>>) -> Self {
        if codecs.is_empty() {
            return Self::default();
        }
        Self { codecs }
    }

    /// Picks the codec for a response's content type.
    ///
    /// Media type parameters are ignored. Without a content type, or without a
    /// codec claiming it, the first codec is used.
    pub fn for_content_type(&self, content_type: Option<&str>) -> &dyn Codec {
        let essence = content_type
            .and_then(|value| value.split(';').next())
            .map(str::trim);

        if let Some(essence) = essence {
            let found = self.codecs.iter().find(|codec| {
                codec
                    .media_types()
                    .iter()
                    .any(|media_type| media_type.eq_ignore_ascii_case(essence))
            });
            match found {
                Some(codec) => return codec.as_ref(),
                None => debug!(content_type = essence, "No codec claims content type, using default"),
            }
        }
        self.codecs[0].as_ref()
    }

    /// The codec request payloads are encoded with.
    pub fn encoder(&self) -> &dyn Codec {
        self.codecs[0].as_ref()
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for Codecs {
    fn default() -> Self {
        Self {
            codecs: vec![Arc::new(HalJsonCodec)],
        }
    }
}
