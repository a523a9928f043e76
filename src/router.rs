//! The router: an ordered aggregation of routing maps.
//!
//! A [`Router`] owns a sequence of [`RoutingSource`]s and tries them in
//! registration order — the first source that produces a handler wins. One
//! source type may be registered once: suppression is by concrete *type*,
//! not by value, so an application wires each kind of map (static
//! configuration, database-backed, plugin-provided) exactly one time and
//! ordering stays predictable.
//!
//! ```rust
//! use junction::{Handler, Method, Router, RoutingMap};
//!
//! let mut router = Router::new();
//! router.add_routing_map(
//!     RoutingMap::builder()
//!         .route("/users/{id}", Method::Get, Handler::function("show_user"))
//!         .build()?,
//! )?;
//!
//! let result = router.match_request(Method::Get, "/users/42");
//! assert!(result.is_match());
//! assert_eq!(result.variables["id"], "42");
//! # Ok::<(), junction::RouteError>(())
//! ```

use std::any::{TypeId, type_name};

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::RouteError;
use crate::method::MethodSet;
use crate::request::{MatchResult, Request};

/// One complete source of routes, as seen by the [`Router`].
///
/// [`RoutingMap`](crate::RoutingMap) is the built-in implementation; hosts
/// supply their own when routes live somewhere junction does not know about
/// (a configuration store, a plugin registry).
pub trait RoutingSource: Send + Sync {
    /// Resolves a handler for `methods` + `path`. Must always return a
    /// result; a miss is an empty [`MatchResult`], not an error.
    fn match_request(&self, methods: MethodSet, path: &str) -> MatchResult;

    /// Metadata for `path`, with slash fallback.
    fn meta_data(&self, path: &str) -> Option<&Value>;

    /// Paths registered for any of `methods`, optionally filtered, in
    /// registration order.
    fn routes<'a>(
        &'a self,
        methods: MethodSet,
        filter: Option<&'a Regex>,
    ) -> Box<dyn Iterator<Item = &'a str> + 'a>;
}

/// An ordered, first-match-wins aggregation of routing sources.
#[derive(Default)]
pub struct Router {
    sources: Vec<(TypeId, &'static str, Box<dyn RoutingSource>)>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `source`, unless a source of the same concrete type is
    /// already present — in that case nothing is added and
    /// [`RouteError::DuplicateRoutingMap`] names the offending type.
    pub fn add_routing_map<S: RoutingSource + 'static>(
        &mut self,
        source: S,
    ) -> Result<(), RouteError> {
        let id = TypeId::of::<S>();
        if self.sources.iter().any(|(existing, _, _)| *existing == id) {
            return Err(RouteError::DuplicateRoutingMap(type_name::<S>()));
        }
        debug!(source = type_name::<S>(), position = self.sources.len(), "routing map added");
        self.sources.push((id, type_name::<S>(), Box::new(source)));
        Ok(())
    }

    /// Resolves `methods` + `path` against each source in registration
    /// order; the first source yielding a handler short-circuits the scan.
    ///
    /// When no source yields a handler, the last-tried source's empty result
    /// is returned (so its `allowed` set survives for a 405 answer) — check
    /// [`is_match`](MatchResult::is_match), not merely that a result came
    /// back.
    pub fn match_request(&self, methods: impl Into<MethodSet>, path: &str) -> MatchResult {
        let methods = methods.into();
        let mut last = MatchResult::default();
        for (_, _, source) in &self.sources {
            let result = source.match_request(methods, path);
            if result.is_match() {
                return result;
            }
            last = result;
        }
        last
    }

    /// Convenience wrapper: matches a host request object directly.
    pub fn route<R: Request>(&self, request: &R) -> MatchResult {
        self.match_request(request.method(), request.path())
    }

    /// Metadata for `path` — first-hit-wins across sources, in registration
    /// order.
    pub fn meta_data(&self, path: &str) -> Option<&Value> {
        self.sources
            .iter()
            .find_map(|(_, _, source)| source.meta_data(path))
    }

    /// Every source's route listing, concatenated in registration order.
    /// No deduplication: a path registered in two sources appears twice.
    pub fn routes<'a>(
        &'a self,
        methods: impl Into<MethodSet>,
        filter: Option<&'a Regex>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let methods = methods.into();
        self.sources
            .iter()
            .flat_map(move |(_, _, source)| source.routes(methods, filter))
    }

    /// The registered source type names, in order. Handy in logs and
    /// assertions; matching never consults this.
    pub fn source_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sources.iter().map(|&(_, name, _)| name)
    }
}
