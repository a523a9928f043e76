//! Minimal junction example — a CRUD-ish route table and a few lookups.
//!
//! Run with:
//!   RUST_LOG=trace cargo run --example basic
//!
//! The trace output shows every matching decision: exact hits, template
//! hits, 405s, and misses.

use junction::{Handler, Method, Router, RoutingMap};
use serde_json::json;

fn main() -> Result<(), junction::RouteError> {
    tracing_subscriber::fmt::init();

    let map = RoutingMap::builder()
        .route("/users", Method::Get | Method::Post, Handler::function("users"))
        .route("/users/{id}", Method::Get, Handler::class_method("UserController", "show"))
        .route("/users/{id}", Method::Delete, Handler::class_method("UserController", "remove"))
        .route("/healthz", Method::Get, Handler::function("liveness"))
        .meta_data("/users/{id}", json!({ "auth": true }))
        .build()?;

    let mut router = Router::new();
    router.add_routing_map(map)?;

    for (method, path) in [
        (Method::Get, "/users/42"),      // template hit, extracts id
        (Method::Get, "/users/"),        // trailing slash, exact hit on /users
        (Method::Put, "/users"),         // 405 — path exists, method doesn't
        (Method::Get, "/users/42/pets"), // miss
    ] {
        let result = router.match_request(method, path);
        match &result.handler {
            Some(handler) => println!(
                "{method} {path} -> {handler:?} via {} vars={:?} meta={:?}",
                result.matched_route.as_deref().unwrap_or("?"),
                result.variables,
                result.meta_data,
            ),
            None if result.method_not_allowed() => {
                println!("{method} {path} -> 405, allow: {}", result.allowed)
            }
            None => println!("{method} {path} -> 404"),
        }
    }

    Ok(())
}
