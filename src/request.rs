//! The request-side collaborator interface and the match outcome.
//!
//! junction never owns a request. The host hands one in behind the minimal
//! [`Request`] read surface — a method and a path — and gets back a
//! [`MatchResult`] carrying everything the surrounding dispatcher needs:
//! the handler descriptor, extracted path variables, the route that matched,
//! and that route's metadata. Nothing is stashed on the request itself, so
//! matching stays a pure function the host can call from any thread.

use std::collections::HashMap;

use serde_json::Value;

use crate::handler::Handler;
use crate::method::{Method, MethodSet};

/// The read surface junction needs from an incoming request.
pub trait Request {
    fn method(&self) -> Method;
    fn path(&self) -> &str;
}

/// The outcome of matching one request against a map or router.
///
/// A result is *always* produced, even on a total miss — inspect
/// [`handler`](MatchResult::handler) rather than expecting an error. The
/// [`allowed`](MatchResult::allowed) set splits the miss cases: a path that
/// matched structurally but not by method leaves its registered methods
/// here, so a dispatcher can answer 405-with-`Allow` instead of 404.
#[derive(Clone, Debug, Default)]
pub struct MatchResult {
    /// The matched handler descriptor, if any.
    pub handler: Option<Handler>,
    /// Path variables extracted from a template match; empty for literal
    /// matches.
    pub variables: HashMap<String, String>,
    /// The route that matched, as registered: the literal table's path or
    /// the original template string.
    pub matched_route: Option<String>,
    /// Metadata registered for the matched route, if any.
    pub meta_data: Option<Value>,
    /// Methods registered on every structurally-matching route, whether or
    /// not one of them produced the handler.
    pub allowed: MethodSet,
}

impl MatchResult {
    /// Whether a handler was found.
    pub fn is_match(&self) -> bool {
        self.handler.is_some()
    }

    /// True when the path exists but none of its registered methods
    /// intersect the request — the 405-equivalent signal, distinct from a
    /// path that matched nothing at all.
    pub fn method_not_allowed(&self) -> bool {
        self.handler.is_none() && !self.allowed.is_empty()
    }
}
