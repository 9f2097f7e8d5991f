//! # Blocking Navigator
//!
//! A synchronous facade over [`Navigator`] for callers without an async runtime.
//! It owns a current-thread Tokio runtime and drives the same futures the async
//! API returns, so behaviour is identical.
//!
//! Calling it from inside an async context panics, as Tokio forbids nested
//! `block_on`. Use [`Navigator`] there instead.
//!
//! ```rust,ignore
//! let client = BlockingNavigator::new(ReqwestTransport::new(config)?)?;
//! let order = client
//!     .root()?
//!     .get("order", Follow::with_curie("ns").param("orderRef", "123"))?
//!     .item::<Order>()?;
//! ```

use crate::codec::Codecs;
use crate::error::HalError;
use crate::model::Resource;
use crate::navigator::{Follow, Navigator};
use crate::transport::Transport;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Synchronous counterpart of [`Navigator`]; every state shares one runtime.
#[derive(Clone, Debug)]
pub struct BlockingNavigator {
    inner: Navigator,
    runtime: Arc<Runtime>,
}

impl BlockingNavigator {
    pub fn new(transport: impl Transport + 'static) -> Result<Self, HalError> {
        Self::from_navigator(Navigator::new(transport))
    }

    pub fn with_codecs(transport: impl Transport + 'static, codecs: Codecs) -> Result<Self, HalError> {
        Self::from_navigator(Navigator::with_codecs(transport, codecs))
    }

    /// Wraps an existing navigation state.
    pub fn from_navigator(inner: Navigator) -> Result<Self, HalError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            inner,
            runtime: Arc::new(runtime),
        })
    }

    /// The async state this one wraps.
    pub fn navigator(&self) -> &Navigator {
        &self.inner
    }

    pub fn current(&self) -> &[Resource] {
        self.inner.current()
    }

    fn wrap(&self, result: Result<Navigator, HalError>) -> Result<Self, HalError> {
        result.map(|inner| Self {
            inner,
            runtime: Arc::clone(&self.runtime),
        })
    }

    pub fn root(&self) -> Result<Self, HalError> {
        self.wrap(self.runtime.block_on(self.inner.root()))
    }

    pub fn root_at(&self, uri: &str) -> Result<Self, HalError> {
        self.wrap(self.runtime.block_on(self.inner.root_at(uri)))
    }

    pub fn get(&self, rel: &str, follow: Follow) -> Result<Self, HalError> {
        self.wrap(self.runtime.block_on(self.inner.get(rel, follow)))
    }

    pub fn get_from<T>(&self, resource: &Resource<T>, rel: &str, follow: Follow) -> Result<Self, HalError> {
        self.wrap(self.runtime.block_on(self.inner.get_from(resource, rel, follow)))
    }

    pub fn post<P: Serialize + ?Sized>(&self, rel: &str, payload: &P, follow: Follow) -> Result<Self, HalError> {
        self.wrap(self.runtime.block_on(self.inner.post(rel, payload, follow)))
    }

    pub fn put<P: Serialize + ?Sized>(&self, rel: &str, payload: &P, follow: Follow) -> Result<Self, HalError> {
        self.wrap(self.runtime.block_on(self.inner.put(rel, payload, follow)))
    }

    pub fn patch<P: Serialize + ?Sized>(&self, rel: &str, payload: &P, follow: Follow) -> Result<Self, HalError> {
        self.wrap(self.runtime.block_on(self.inner.patch(rel, payload, follow)))
    }

    pub fn delete(&self, rel: &str, follow: Follow) -> Result<Self, HalError> {
        self.wrap(self.runtime.block_on(self.inner.delete(rel, follow)))
    }

    pub fn has(&self, rel: &str, curie: Option<&str>) -> bool {
        self.inner.has(rel, curie)
    }

    pub fn item<T: DeserializeOwned>(&self) -> Result<Resource<T>, HalError> {
        self.inner.item()
    }

    pub fn items<T: DeserializeOwned>(&self) -> Result<Vec<Resource<T>>, HalError> {
        self.inner.items()
    }
}
