//! # HalResourceClient Trait
//!
//! Provides a common interface for resource‑specific clients, adding default `fetch` and `remove` methods built on top of a rooted [`Navigator`].
use async_trait::async_trait;
use hal_client::{Follow, HalError, Navigator, Parameters, Resource};
use serde::de::DeserializeOwned;

/// Trait for resource-specific clients to inherit standard lookups.
///
/// Implementors hold a navigator positioned at the API root plus the curie
/// their relations live under; `fetch` and `remove` follow a relation from
/// that root.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use hal_client::{HalError, Navigator};
/// use hal_sample::clients::HalResourceClient;
///
/// #[derive(Debug)]
/// struct UserError(String);
///
/// struct UserClient {
///     root: Navigator,
/// }
///
/// #[async_trait]
/// impl HalResourceClient for UserClient {
///     type Error = UserError;
///
///     fn root(&self) -> &Navigator {
///         &self.root
///     }
///
///     fn curie(&self) -> Option<&str> {
///         Some("ns")
///     }
///
///     fn map_error(e: HalError) -> Self::Error {
///         UserError(e.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait HalResourceClient: Send + Sync {
    /// The resource-specific error type.
    type Error: Send;

    /// The navigation state at the API root.
    fn root(&self) -> &Navigator;

    /// The curie relations are qualified with, if any.
    fn curie(&self) -> Option<&str>;

    /// Map navigation errors to the specific resource error type.
    fn map_error(e: HalError) -> Self::Error;

    /// Follow options carrying this client's curie.
    fn follow(&self) -> Follow {
        match self.curie() {
            Some(curie) => Follow::with_curie(curie),
            None => Follow::new(),
        }
    }

    /// Follow `rel` from the root and decode the single resource it leads to.
    #[tracing::instrument(skip(self, parameters))]
    async fn fetch<T>(&self, rel: &str, parameters: Parameters) -> Result<Resource<T>, Self::Error>
    where
        T: DeserializeOwned + Send,
    {
        tracing::debug!(?parameters, "Sending request");
        self.root()
            .get(rel, self.follow().parameters(parameters))
            .await
            .and_then(|state| state.item())
            .map_err(Self::map_error)
    }

    /// Delete whatever `rel` points at from the root.
    #[tracing::instrument(skip(self, parameters))]
    async fn remove(&self, rel: &str, parameters: Parameters) -> Result<(), Self::Error> {
        tracing::debug!(?parameters, "Sending request");
        self.root()
            .delete(rel, self.follow().parameters(parameters))
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }
}
