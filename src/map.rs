//! One complete routing map: exact table, template set, metadata.
//!
//! A [`RoutingMap`] is built once, up front, from a caller-supplied route
//! specification, and is read-only during matching. The builder compiles
//! every templated path at construction time and validates the two
//! registration invariants — no overlapping method claims on one path, no
//! two templates compiling to the identical pattern — so a map that builds
//! is a map that matches deterministically.
//!
//! # Matching, in order
//!
//! 1. Exact table, trying the path as given, then without its trailing
//!    slash, then with one appended.
//! 2. On an exact hit: the first method/handler pair intersecting the
//!    requested methods wins. A hit with no method intersection is final —
//!    templates are not consulted — and reports the path's registered
//!    methods for a 405-style answer.
//! 3. No exact hit: templates in registration order, matched against the
//!    original un-normalized path. A template whose methods do not
//!    intersect falls through to the next template.

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::RouteError;
use crate::handler::Handler;
use crate::method::MethodSet;
use crate::request::MatchResult;
use crate::router::RoutingSource;
use crate::table::RouteTable;
use crate::template::CompiledTemplate;

/// A complete, independently constructed table of routes plus metadata.
///
/// ```rust
/// use junction::{Handler, Method, RoutingMap};
/// use serde_json::json;
///
/// let map = RoutingMap::builder()
///     .route("/users", Method::Get | Method::Post, Handler::function("users"))
///     .route("/users/{id}", Method::Get, Handler::class_method("UserController", "show"))
///     .meta_data("/users", json!({ "auth": true }))
///     .build()?;
///
/// let result = map.match_request(Method::Get, "/users/42");
/// assert!(result.is_match());
/// assert_eq!(result.variables["id"], "42");
/// assert_eq!(result.matched_route.as_deref(), Some("/users/{id}"));
/// # Ok::<(), junction::RouteError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct RoutingMap {
    table: RouteTable,
    templates: Vec<CompiledTemplate>,
    meta: HashMap<String, Value>,
}

impl RoutingMap {
    pub fn builder() -> RoutingMapBuilder {
        RoutingMapBuilder::default()
    }

    /// Registers another literal route after construction.
    ///
    /// Fails with [`RouteError::MethodConflict`] when `methods` intersects a
    /// registration already present for `path`. The template set is fixed at
    /// build time: a path added here is exact-match only, even if it
    /// contains `{name}` placeholders.
    pub fn add_route(
        &mut self,
        path: &str,
        methods: impl Into<MethodSet>,
        handler: Handler,
    ) -> Result<(), RouteError> {
        self.table.insert(path, methods, handler)
    }

    /// Resolves a handler for `methods` + `path`.
    ///
    /// Always returns a [`MatchResult`]; inspect
    /// [`is_match`](MatchResult::is_match) rather than expecting an error.
    /// Passing a multi-method set is allowed — the first registered pair
    /// intersecting any of them wins.
    pub fn match_request(&self, methods: impl Into<MethodSet>, path: &str) -> MatchResult {
        let requested = methods.into();

        if let Some((route, pairs)) = self.exact_entry(path) {
            let allowed = pairs.iter().fold(MethodSet::EMPTY, |set, &(m, _)| set | m);
            let found = pairs.iter().find(|(m, _)| m.intersects(requested));

            // An exact structural hit is final: a method mismatch here is
            // the 405 signal, not a reason to consult the template set.
            return match found {
                Some((_, handler)) => {
                    trace!(%requested, path, route, "exact route hit");
                    MatchResult {
                        handler: Some(handler.clone()),
                        variables: HashMap::new(),
                        matched_route: Some(route.to_owned()),
                        meta_data: self.meta_data(route).cloned(),
                        allowed,
                    }
                }
                None => {
                    trace!(%requested, path, route, %allowed, "route hit but method not allowed");
                    MatchResult { allowed, ..MatchResult::default() }
                }
            };
        }

        let mut allowed = MethodSet::EMPTY;
        for template in &self.templates {
            // Templates match the original path, never a normalized form. A
            // structural miss, including a capture-count mismatch, falls
            // through to the next template.
            let Some(variables) = template.match_path(path) else {
                continue;
            };
            let Some(pairs) = self.table.get(template.template()) else {
                continue;
            };
            allowed = pairs.iter().fold(allowed, |set, &(m, _)| set | m);
            if let Some((_, handler)) = pairs.iter().find(|(m, _)| m.intersects(requested)) {
                trace!(%requested, path, template = template.template(), "template route hit");
                return MatchResult {
                    handler: Some(handler.clone()),
                    variables,
                    matched_route: Some(template.template().to_owned()),
                    meta_data: self.meta_data(template.template()).cloned(),
                    allowed,
                };
            }
        }

        trace!(%requested, path, "no route matched");
        MatchResult { allowed, ..MatchResult::default() }
    }

    /// The paths registered for any of `methods`, in table insertion order,
    /// optionally restricted to those matching `filter`.
    ///
    /// The iterator is lazy and borrows the map — call again to restart.
    pub fn routes<'a>(
        &'a self,
        methods: impl Into<MethodSet>,
        filter: Option<&'a Regex>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let methods = methods.into();
        self.table
            .iter()
            .filter(move |(_, pairs)| pairs.iter().any(|(m, _)| m.intersects(methods)))
            .filter(move |(path, _)| filter.map_or(true, |re| re.is_match(path)))
            .map(|(path, _)| path)
    }

    /// Metadata for `path`, with the same slash fallback as matching: exact
    /// first, then the path with its trailing slash stripped, or with one
    /// appended.
    pub fn meta_data(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.meta.get(path) {
            return Some(value);
        }
        if path.ends_with('/') {
            path.strip_suffix('/')
                .filter(|p| !p.is_empty())
                .and_then(|p| self.meta.get(p))
        } else {
            self.meta.get(format!("{path}/").as_str())
        }
    }

    /// Exact-table lookup across the slash-normalized candidates, in order:
    /// the path as given, without its trailing slash, with one appended.
    /// The returned path is the route as registered in the table.
    fn exact_entry(&self, path: &str) -> Option<(&str, &[(MethodSet, Handler)])> {
        if let Some(hit) = self.table.entry(path) {
            return Some(hit);
        }
        if let Some(stripped) = path.strip_suffix('/').filter(|p| !p.is_empty()) {
            if let Some(hit) = self.table.entry(stripped) {
                return Some(hit);
            }
        }
        if !path.ends_with('/') {
            if let Some(hit) = self.table.entry(format!("{path}/").as_str()) {
                return Some(hit);
            }
        }
        None
    }
}

impl RoutingSource for RoutingMap {
    fn match_request(&self, methods: MethodSet, path: &str) -> MatchResult {
        RoutingMap::match_request(self, methods, path)
    }

    fn meta_data(&self, path: &str) -> Option<&Value> {
        RoutingMap::meta_data(self, path)
    }

    fn routes<'a>(
        &'a self,
        methods: MethodSet,
        filter: Option<&'a Regex>,
    ) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        Box::new(RoutingMap::routes(self, methods, filter))
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Chaining builder for [`RoutingMap`].
///
/// Registrations accumulate unchecked; [`build`](RoutingMapBuilder::build)
/// validates everything at once so a configuration mistake names the exact
/// conflicting registrations instead of failing mid-chain.
#[derive(Debug, Default)]
pub struct RoutingMapBuilder {
    routes: Vec<(String, MethodSet, Handler)>,
    meta: Vec<(String, Value)>,
}

impl RoutingMapBuilder {
    /// Registers `handler` for `methods` on `path`. A path containing
    /// `{name}` placeholders is additionally compiled into the template set
    /// at build time.
    pub fn route(
        mut self,
        path: impl Into<String>,
        methods: impl Into<MethodSet>,
        handler: Handler,
    ) -> Self {
        self.routes.push((path.into(), methods.into(), handler));
        self
    }

    /// Attaches a metadata record to `path`, independent of method.
    pub fn meta_data(mut self, path: impl Into<String>, value: Value) -> Self {
        self.meta.push((path.into(), value));
        self
    }

    /// Validates and builds the map.
    ///
    /// Fails with [`RouteError::MethodConflict`] on overlapping method
    /// claims for one path, [`RouteError::DuplicatePattern`] when two
    /// distinct templates compile to the identical pattern, or
    /// [`RouteError::Template`] on a template the regex engine rejects.
    pub fn build(self) -> Result<RoutingMap, RouteError> {
        let mut table = RouteTable::new();
        for (path, methods, handler) in self.routes {
            table.insert(&path, methods, handler)?;
        }

        let mut templates: Vec<CompiledTemplate> = Vec::new();
        let mut seen_patterns: HashMap<String, String> = HashMap::new();
        for (path, _) in table.iter() {
            let Some(compiled) = CompiledTemplate::compile(path)? else {
                continue;
            };
            if let Some(first) = seen_patterns.get(compiled.pattern_str()) {
                return Err(RouteError::DuplicatePattern {
                    pattern: compiled.pattern_str().to_owned(),
                    first: first.clone(),
                    second: path.to_owned(),
                });
            }
            seen_patterns.insert(compiled.pattern_str().to_owned(), path.to_owned());
            templates.push(compiled);
        }

        let meta = self.meta.into_iter().collect();
        let map = RoutingMap { table, templates, meta };
        debug!(
            routes = map.table.len(),
            templates = map.templates.len(),
            "routing map built"
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use serde_json::json;

    fn h(name: &str) -> Handler {
        Handler::function(name)
    }

    fn map_of(routes: &[(&str, MethodSet, &str)]) -> RoutingMap {
        routes
            .iter()
            .fold(RoutingMap::builder(), |b, (path, methods, name)| {
                b.route(*path, *methods, h(name))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn exact_match_wins_and_extracts_nothing() {
        let map = map_of(&[("/users", Method::Get.into(), "list")]);
        let result = map.match_request(Method::Get, "/users");
        assert_eq!(result.handler, Some(h("list")));
        assert!(result.variables.is_empty());
        assert_eq!(result.matched_route.as_deref(), Some("/users"));
    }

    #[test]
    fn matching_is_idempotent() {
        let map = map_of(&[
            ("/users", Method::Get.into(), "list"),
            ("/users/{id}", Method::Get.into(), "show"),
        ]);
        let a = map.match_request(Method::Get, "/users/7");
        let b = map.match_request(Method::Get, "/users/7");
        assert_eq!(a.handler, b.handler);
        assert_eq!(a.variables, b.variables);
        assert_eq!(a.matched_route, b.matched_route);
    }

    #[test]
    fn trailing_slash_is_invisible_to_callers() {
        let map = map_of(&[("/a/b/", Method::Get.into(), "h")]);

        let with = map.match_request(Method::Get, "/a/b/");
        let without = map.match_request(Method::Get, "/a/b");
        assert!(with.is_match());
        assert!(without.is_match());
        // Both report the route as registered.
        assert_eq!(with.matched_route.as_deref(), Some("/a/b/"));
        assert_eq!(without.matched_route, with.matched_route);

        // And the other way around.
        let map = map_of(&[("/a/b", Method::Get.into(), "h")]);
        let slashed = map.match_request(Method::Get, "/a/b/");
        assert_eq!(slashed.matched_route.as_deref(), Some("/a/b"));
    }

    #[test]
    fn exact_form_is_preferred_over_normalized_forms() {
        let map = map_of(&[
            ("/a/b", Method::Get.into(), "bare"),
            ("/a/b/", Method::Get.into(), "slashed"),
        ]);
        assert_eq!(map.match_request(Method::Get, "/a/b").handler, Some(h("bare")));
        assert_eq!(map.match_request(Method::Get, "/a/b/").handler, Some(h("slashed")));
    }

    #[test]
    fn method_mismatch_on_exact_hit_is_final() {
        // `/{x}` would structurally match `/a` for POST, but the exact hit
        // on `/a` settles the request before templates are consulted.
        let map = map_of(&[
            ("/a", Method::Get.into(), "literal"),
            ("/{x}", Method::Post.into(), "template"),
        ]);
        let result = map.match_request(Method::Post, "/a");
        assert!(!result.is_match());
        assert!(result.method_not_allowed());
        assert_eq!(result.allowed, Method::Get.into());
    }

    #[test]
    fn miss_and_method_mismatch_are_distinguishable() {
        let map = map_of(&[("/a", Method::Get.into(), "h")]);

        let not_found = map.match_request(Method::Get, "/nope");
        assert!(!not_found.is_match());
        assert!(!not_found.method_not_allowed());

        let wrong_method = map.match_request(Method::Delete, "/a");
        assert!(!wrong_method.is_match());
        assert!(wrong_method.method_not_allowed());
    }

    #[test]
    fn first_registered_pair_wins_on_multi_method_requests() {
        let map = map_of(&[
            ("/x", Method::Get.into(), "first"),
            ("/x", Method::Post.into(), "second"),
        ]);
        let result = map.match_request(Method::Get | Method::Post, "/x");
        assert_eq!(result.handler, Some(h("first")));

        let map = map_of(&[
            ("/x", Method::Post.into(), "first"),
            ("/x", Method::Get.into(), "second"),
        ]);
        let result = map.match_request(Method::Get | Method::Post, "/x");
        assert_eq!(result.handler, Some(h("first")));
    }

    #[test]
    fn templates_match_in_registration_order() {
        let map = map_of(&[
            ("/x/{a}", Method::Get.into(), "first"),
            ("/{b}/y", Method::Get.into(), "second"),
        ]);
        // `/x/y` fits both templates; the earlier registration wins.
        let result = map.match_request(Method::Get, "/x/y");
        assert_eq!(result.handler, Some(h("first")));
        assert_eq!(result.variables["a"], "y");
    }

    #[test]
    fn template_with_wrong_method_falls_through() {
        let map = map_of(&[
            ("/t/{a}", Method::Post.into(), "posts"),
            ("/{b}/{c}", Method::Get.into(), "pairs"),
        ]);
        let result = map.match_request(Method::Get, "/t/1");
        assert_eq!(result.handler, Some(h("pairs")));
        assert_eq!(result.variables["b"], "t");
        assert_eq!(result.variables["c"], "1");
        // The skipped template still advertises its methods.
        assert!(result.allowed.contains(Method::Post));
    }

    #[test]
    fn template_match_reports_original_template() {
        let map = map_of(&[("/api/role/{uuid}", Method::Get.into(), "role")]);
        let result = map.match_request(Method::Get, "/api/role/abc-123");
        assert_eq!(result.matched_route.as_deref(), Some("/api/role/{uuid}"));
        assert_eq!(result.variables["uuid"], "abc-123");

        assert!(!map.match_request(Method::Get, "/api/role/abc/extra").is_match());
    }

    #[test]
    fn duplicate_compiled_patterns_fail_the_build() {
        let err = RoutingMap::builder()
            .route("/a/{x}", Method::Get, h("h1"))
            .route("/a/{y}", Method::Post, h("h2"))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RouteError::DuplicatePattern { ref first, ref second, .. }
                if first == "/a/{x}" && second == "/a/{y}"
        ));
    }

    #[test]
    fn build_rejects_overlapping_method_claims() {
        let err = RoutingMap::builder()
            .route("/x", Method::Get, h("h1"))
            .route("/x", Method::Get, h("h2"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RouteError::MethodConflict { .. }));
    }

    #[test]
    fn add_route_validates_but_never_compiles() {
        let mut map = map_of(&[("/a", Method::Get.into(), "a")]);

        assert!(map.add_route("/a", Method::Get, h("dup")).is_err());
        map.add_route("/p/{x}", Method::Get, h("late")).unwrap();

        // The late registration is exact-match only.
        assert!(!map.match_request(Method::Get, "/p/1").is_match());
        assert!(map.match_request(Method::Get, "/p/{x}").is_match());
    }

    #[test]
    fn meta_data_applies_slash_fallback() {
        let map = RoutingMap::builder()
            .route("/a/b", Method::Get, h("h"))
            .meta_data("/a/b", json!({ "cache": 60 }))
            .build()
            .unwrap();

        assert_eq!(map.meta_data("/a/b").unwrap()["cache"], 60);
        assert_eq!(map.meta_data("/a/b/").unwrap()["cache"], 60);
        assert!(map.meta_data("/a/c").is_none());
    }

    #[test]
    fn match_result_carries_route_meta_data() {
        let map = RoutingMap::builder()
            .route("/users/{id}", Method::Get, h("show"))
            .meta_data("/users/{id}", json!({ "auth": true }))
            .build()
            .unwrap();

        let result = map.match_request(Method::Get, "/users/42");
        assert_eq!(result.meta_data.unwrap()["auth"], true);
    }

    #[test]
    fn routes_lists_by_method_and_filter_in_order() {
        let map = map_of(&[
            ("/users", Method::Get | Method::Post, "u"),
            ("/admin", Method::Get.into(), "a"),
            ("/users/{id}", Method::Delete.into(), "d"),
        ]);

        let all_get: Vec<_> = map.routes(Method::Get, None).collect();
        assert_eq!(all_get, ["/users", "/admin"]);

        let filter = Regex::new("^/users").unwrap();
        let filtered: Vec<_> = map.routes(Method::Get | Method::Delete, Some(&filter)).collect();
        assert_eq!(filtered, ["/users", "/users/{id}"]);

        // Restartable: a second call yields the same sequence.
        let again: Vec<_> = map.routes(Method::Get, None).collect();
        assert_eq!(again, all_get);
    }

    #[test]
    fn empty_map_misses_cleanly() {
        let map = RoutingMap::default();
        let result = map.match_request(Method::Get, "/");
        assert!(!result.is_match());
        assert!(!result.method_not_allowed());
    }
}
