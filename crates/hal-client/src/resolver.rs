//! # Relation Resolver
//!
//! Finds what a relation name points at inside a set of resources.
//!
//! Embedded resources always win over links: the resources are first scanned, in
//! order, for one with at least one embedded child under the relation, and only if
//! none has one are they scanned again for a link. An embedded match on the second
//! resource therefore beats a link on the first.

use crate::model::{Link, RelationKey, Resource};

/// Outcome of resolving a relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Match<'a> {
    /// All children embedded under the relation in the first resource that has any.
    Embedded(Vec<&'a Resource>),
    /// The first link with the relation, from the first resource that has one.
    Link(&'a Link),
    NoMatch,
}

impl Match<'_> {
    pub fn is_match(&self) -> bool {
        !matches!(self, Match::NoMatch)
    }
}

/// Resolves `key` against a navigation state's current resources.
pub fn resolve<'a, T>(resources: &'a [Resource<T>], key: &RelationKey) -> Match<'a> {
    if let Some(resource) = resources.iter().find(|r| r.has_embedded(key)) {
        return Match::Embedded(resource.embedded(key));
    }
    match find_link(resources, key) {
        Some(link) => Match::Link(link),
        None => Match::NoMatch,
    }
}

/// Resolves `key` against one known resource, with the same precedence.
pub fn resolve_in<'a, T>(resource: &'a Resource<T>, key: &RelationKey) -> Match<'a> {
    resolve(std::slice::from_ref(resource), key)
}

/// Link-only lookup used by the mutating verbs; embedded resources are never
/// targets for mutation.
pub fn find_link<'a, T>(resources: &'a [Resource<T>], key: &RelationKey) -> Option<&'a Link> {
    resources.iter().find_map(|resource| resource.link(key))
}
