//! Unified error type.
//!
//! Every variant is a *configuration* mistake — a malformed template, a
//! conflicting registration, a handler that points at nothing. They surface
//! at table-build or handler-resolution time and are never recovered
//! silently. An unmatched request is **not** an error: matching returns an
//! empty [`MatchResult`](crate::MatchResult) and the caller inspects it.

use thiserror::Error;

use crate::method::MethodSet;

/// The error type returned by junction's fallible operations.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A handler is already registered for one or more of these methods on
    /// this path. Raised by [`RouteTable::insert`](crate::RouteTable::insert)
    /// and [`RoutingMap::add_route`](crate::RoutingMap::add_route) — never by
    /// [`RouteTable::merge`](crate::RouteTable::merge), which resolves
    /// conflicts by first-table precedence instead.
    #[error("methods {methods} already registered for `{path}`")]
    MethodConflict { path: String, methods: MethodSet },

    /// Two distinct route templates compile to the identical pattern, so one
    /// of them could never match. Both originals are named so the offending
    /// registration can be found.
    #[error("templates `{first}` and `{second}` both compile to `{pattern}`")]
    DuplicatePattern {
        pattern: String,
        first: String,
        second: String,
    },

    /// The template produced a pattern the regex engine rejects.
    #[error("invalid route template `{template}`: {source}")]
    Template {
        template: String,
        source: regex::Error,
    },

    /// A `ClassMethod` handler names a controller class the host does not
    /// know about.
    #[error("unknown controller class `{0}`")]
    UnknownClass(String),

    /// A `ClassMethod` handler names a method its controller class does not
    /// have.
    #[error("controller `{class}` has no method `{method}`")]
    UnknownMethod { class: String, method: String },

    /// A `Function` handler names a function the host does not know about.
    #[error("unknown handler function `{0}`")]
    UnknownFunction(String),

    /// A routing map of this concrete type is already registered on the
    /// router. Suppression is per *type*, not per value: two differently
    /// configured instances of the same map type still collide.
    #[error("a routing map of type `{0}` is already registered")]
    DuplicateRoutingMap(&'static str),
}
