//! # Resource Model
//!
//! The immutable shapes a HAL document is decoded into: [`Link`], [`Resource`] and
//! the derived [`RelationKey`].
//!
//! A [`Resource`] is generic over its payload. Freshly decoded resources carry the
//! raw JSON object (`Resource<Value>`); [`Resource::project`] turns that into any
//! caller-defined shape while keeping links and embedded resources untouched.

use crate::error::HalError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt::{self, Display};

/// The name a link or embedded resource is looked up by: `rel`, or `curie:rel`
/// when a curie is given.
///
/// Two relation names are equal iff their keys are byte-for-byte equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationKey(String);

impl RelationKey {
    pub fn new(rel: &str, curie: Option<&str>) -> Self {
        match curie {
            Some(curie) => Self(format!("{curie}:{rel}")),
            None => Self(rel.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `rel` is exactly this key.
    pub fn matches(&self, rel: &str) -> bool {
        self.0 == rel
    }
}

impl Display for RelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A navigable relation exposed under `_links`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Link {
    pub rel: String,
    pub href: String,
    /// When set, `href` is an RFC 6570 template that needs parameters.
    pub templated: bool,
    pub name: Option<String>,
    pub title: Option<String>,
    pub media_type: Option<String>,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            ..Default::default()
        }
    }

    pub fn templated(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            templated: true,
            ..Self::new(rel, href)
        }
    }
}

/// A HAL resource: its own payload plus links and embedded resources.
///
/// `embedded` entries are full resources themselves, each tagged with the `rel`
/// it was embedded under. They always carry the raw JSON payload, whatever `T`
/// the parent has been projected into.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T = Value> {
    pub rel: Option<String>,
    pub href: Option<String>,
    pub name: Option<String>,
    pub data: T,
    pub links: Vec<Link>,
    pub embedded: Vec<Resource>,
}

impl Resource {
    /// A resource with no data, no links and nothing embedded.
    ///
    /// This is what a successful response without a body navigates to.
    pub fn empty() -> Self {
        Self::from_data(Value::Object(Map::new()))
    }
}

impl Default for Resource {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Resource<T> {
    pub fn from_data(data: T) -> Self {
        Self {
            rel: None,
            href: None,
            name: None,
            data,
            links: Vec::new(),
            embedded: Vec::new(),
        }
    }

    /// The first link whose rel equals `key`.
    pub fn link(&self, key: &RelationKey) -> Option<&Link> {
        self.links.iter().find(|link| key.matches(&link.rel))
    }

    /// Every embedded resource whose rel equals `key`, in declared order.
    pub fn embedded(&self, key: &RelationKey) -> Vec<&Resource> {
        self.embedded
            .iter()
            .filter(|resource| resource.rel.as_deref() == Some(key.as_str()))
            .collect()
    }

    pub fn has_embedded(&self, key: &RelationKey) -> bool {
        self.embedded
            .iter()
            .any(|resource| resource.rel.as_deref() == Some(key.as_str()))
    }

    pub fn has_link(&self, key: &RelationKey) -> bool {
        self.links.iter().any(|link| key.matches(&link.rel))
    }

    /// Swaps the payload, keeping identity, links and embedded resources.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        Resource {
            rel: self.rel,
            href: self.href,
            name: self.name,
            data: f(self.data),
            links: self.links,
            embedded: self.embedded,
        }
    }
}

impl Resource<Value> {
    /// Decodes `data` into `T`.
    ///
    /// `rel`, `href`, `name`, `links` and `embedded` are carried over unchanged.
    pub fn project<T: DeserializeOwned>(&self) -> Result<Resource<T>, HalError> {
        let data = serde_json::from_value(self.data.clone())
            .map_err(|e| HalError::DecodeFailed(e.to_string()))?;
        Ok(self.clone().map(|_| data))
    }
}
