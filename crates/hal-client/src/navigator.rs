//! # Navigator
//!
//! A [`Navigator`] is an immutable navigation state: the transport, the codec set,
//! and the resources currently in focus. Every verb returns a *new* navigator and
//! leaves the one it was called on untouched, so any state can be reused, retried
//! or branched from, including concurrently from several tasks.
//!
//! `current` holds either a single resource (the root, or the response of a link
//! navigation) or every embedded resource sharing one relation (a page of items).
//!
//! | Verb | Embedded match | Link match |
//! |------|----------------|------------|
//! | [`get`](Navigator::get) | new state over the embedded resources, no HTTP call | expand + `GET` |
//! | [`post`](Navigator::post) / [`put`](Navigator::put) / [`patch`](Navigator::patch) | ignored | expand + verb with payload |
//! | [`delete`](Navigator::delete) | ignored | expand + `DELETE` |
//!
//! Relations are named by `rel` plus an optional curie, supplied together with any
//! template parameters through [`Follow`].

use crate::codec::Codecs;
use crate::error::HalError;
use crate::model::{RelationKey, Resource};
use crate::pipeline::{execute, Request};
use crate::resolver::{find_link, resolve, resolve_in, Match};
use crate::template::{expand, Parameters, TemplateValue};
use crate::transport::{Payload, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// How to follow a relation: optional template parameters and curie.
///
/// # Example
/// ```rust
/// use hal_client::Follow;
///
/// let follow = Follow::with_curie("ns").param("orderRef", "123");
/// assert_eq!(follow.key("order").as_str(), "ns:order");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Follow {
    pub parameters: Option<Parameters>,
    pub curie: Option<String>,
}

impl Follow {
    /// An unqualified relation without parameters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_curie(curie: impl Into<String>) -> Self {
        Self::new().curie(curie)
    }

    pub fn with_parameters(parameters: impl Into<Parameters>) -> Self {
        Self::new().parameters(parameters)
    }

    pub fn curie(mut self, curie: impl Into<String>) -> Self {
        self.curie = Some(curie.into());
        self
    }

    pub fn parameters(mut self, parameters: impl Into<Parameters>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }

    /// Adds one parameter, starting a parameter set if there is none yet.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<TemplateValue>) -> Self {
        self.parameters.get_or_insert_with(Parameters::new).insert(name, value);
        self
    }

    pub fn key(&self, rel: &str) -> RelationKey {
        RelationKey::new(rel, self.curie.as_deref())
    }
}

/// An immutable snapshot of the resources in focus.
///
/// Cloning is cheap: transport, codecs and current resources are shared.
#[derive(Clone)]
pub struct Navigator {
    transport: Arc<dyn Transport>,
    codecs: Arc<Codecs>,
    current: Arc<[Resource]>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("codecs", &self.codecs.len())
            .field("current", &self.current)
            .finish()
    }
}

impl Navigator {
    /// A navigator with the default HAL+JSON codec and nothing in focus yet.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_codecs(transport, Codecs::default())
    }

    pub fn with_codecs(transport: impl Transport + 'static, codecs: Codecs) -> Self {
        Self::from_shared(Arc::new(transport), Arc::new(codecs))
    }

    pub fn from_shared(transport: Arc<dyn Transport>, codecs: Arc<Codecs>) -> Self {
        Self {
            transport,
            codecs,
            current: Arc::from(Vec::new()),
        }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn codecs(&self) -> &Codecs {
        &self.codecs
    }

    /// The resources in focus; empty before the first navigation.
    pub fn current(&self) -> &[Resource] {
        &self.current
    }

    /// A new state over `current`, sharing transport and codecs.
    pub(crate) fn with_current(&self, current: Vec<Resource>) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            codecs: Arc::clone(&self.codecs),
            current: Arc::from(current),
        }
    }

    /// `GET`s the transport's configured base URI.
    #[instrument(skip(self))]
    pub async fn root(&self) -> Result<Navigator, HalError> {
        execute(self, "", Request::Get).await
    }

    /// `GET`s an explicit root URI.
    #[instrument(skip(self))]
    pub async fn root_at(&self, uri: &str) -> Result<Navigator, HalError> {
        execute(self, uri, Request::Get).await
    }

    /// Follows `rel` from the current resources.
    ///
    /// Embedded resources under the relation become the new state without any
    /// HTTP call; otherwise the relation's link is expanded and fetched.
    #[instrument(skip(self, follow), fields(curie = ?follow.curie))]
    pub async fn get(&self, rel: &str, follow: Follow) -> Result<Navigator, HalError> {
        let key = follow.key(rel);
        let uri = match resolve(self.current(), &key) {
            Match::Embedded(found) => return Ok(self.embedded_state(&key, found)),
            Match::Link(link) => expand(link, follow.parameters.as_ref())?,
            Match::NoMatch => return Err(HalError::RelationNotFound(key.to_string())),
        };
        execute(self, &uri, Request::Get).await
    }

    /// Follows `rel` from a previously captured resource instead of `current`.
    ///
    /// Handy for branching out of one item of a page while keeping the page.
    #[instrument(skip(self, resource, follow), fields(curie = ?follow.curie))]
    pub async fn get_from<T>(
        &self,
        resource: &Resource<T>,
        rel: &str,
        follow: Follow,
    ) -> Result<Navigator, HalError> {
        let key = follow.key(rel);
        let uri = match resolve_in(resource, &key) {
            Match::Embedded(found) => return Ok(self.embedded_state(&key, found)),
            Match::Link(link) => expand(link, follow.parameters.as_ref())?,
            Match::NoMatch => return Err(HalError::RelationNotFound(key.to_string())),
        };
        execute(self, &uri, Request::Get).await
    }

    #[instrument(skip(self, payload, follow), fields(curie = ?follow.curie))]
    pub async fn post<P: Serialize + ?Sized>(
        &self,
        rel: &str,
        payload: &P,
        follow: Follow,
    ) -> Result<Navigator, HalError> {
        let uri = self.link_uri(rel, &follow)?;
        let payload = self.encode(payload)?;
        execute(self, &uri, Request::Post(payload)).await
    }

    #[instrument(skip(self, payload, follow), fields(curie = ?follow.curie))]
    pub async fn put<P: Serialize + ?Sized>(
        &self,
        rel: &str,
        payload: &P,
        follow: Follow,
    ) -> Result<Navigator, HalError> {
        let uri = self.link_uri(rel, &follow)?;
        let payload = self.encode(payload)?;
        execute(self, &uri, Request::Put(payload)).await
    }

    #[instrument(skip(self, payload, follow), fields(curie = ?follow.curie))]
    pub async fn patch<P: Serialize + ?Sized>(
        &self,
        rel: &str,
        payload: &P,
        follow: Follow,
    ) -> Result<Navigator, HalError> {
        let uri = self.link_uri(rel, &follow)?;
        let payload = self.encode(payload)?;
        execute(self, &uri, Request::Patch(payload)).await
    }

    #[instrument(skip(self, follow), fields(curie = ?follow.curie))]
    pub async fn delete(&self, rel: &str, follow: Follow) -> Result<Navigator, HalError> {
        let uri = self.link_uri(rel, &follow)?;
        execute(self, &uri, Request::Delete).await
    }

    /// True iff `get(rel, ..)` would find an embedded resource or a link.
    ///
    /// Never performs I/O.
    pub fn has(&self, rel: &str, curie: Option<&str>) -> bool {
        resolve(self.current(), &RelationKey::new(rel, curie)).is_match()
    }

    /// The most recently navigated resource, decoded into `T`.
    pub fn item<T: DeserializeOwned>(&self) -> Result<Resource<T>, HalError> {
        self.current.last().ok_or(HalError::NoActiveResource)?.project()
    }

    /// Every resource in focus, decoded into `T`.
    pub fn items<T: DeserializeOwned>(&self) -> Result<Vec<Resource<T>>, HalError> {
        self.current.iter().map(|resource| resource.project()).collect()
    }

    fn embedded_state(&self, key: &RelationKey, found: Vec<&Resource>) -> Navigator {
        debug!(rel = %key, count = found.len(), "Resolved to embedded resources");
        self.with_current(found.into_iter().cloned().collect())
    }

    fn link_uri(&self, rel: &str, follow: &Follow) -> Result<String, HalError> {
        let key = follow.key(rel);
        let link = find_link(self.current(), &key)
            .ok_or_else(|| HalError::RelationNotFound(key.to_string()))?;
        expand(link, follow.parameters.as_ref())
    }

    fn encode<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Payload, HalError> {
        let value = serde_json::to_value(payload).map_err(|e| HalError::EncodeFailed(e.to_string()))?;
        self.codecs.encoder().encode(&value)
    }
}
