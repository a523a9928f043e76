//! # junction
//!
//! A request-routing core for HTTP-like dispatchers.
//! It decides *which handler, with which extracted arguments*. Nothing more.
//!
//! ## The contract
//!
//! Your server owns the request/response lifecycle: parsing, transport,
//! instantiating controllers, calling the handler. junction owns the one
//! decision in the middle — and does it with plain, inspectable tables:
//!
//! - **Exact and templated paths** — `/users` and `/users/{id}`, templates
//!   compiled to anchored patterns once, at build time
//! - **Method-bitmask dispatch** — one registration serves `GET|POST`
//! - **Trailing-slash tolerance** — `/a/b` finds `/a/b/` and vice versa
//! - **Route metadata** — an opaque JSON record per path, same slash rules
//! - **Mergeable tables, stackable maps** — combine tables with first-table
//!   precedence, stack maps with first-match-wins
//!
//! Matching is a pure function over immutable tables: build a
//! [`RoutingMap`] once at startup, then match from as many threads as you
//! like. No I/O, no locks, no reflection on the hot path.
//!
//! ## Quick start
//!
//! ```rust
//! use junction::{Handler, Method, Router, RoutingMap};
//!
//! let map = RoutingMap::builder()
//!     .route("/users", Method::Get | Method::Post, Handler::function("users"))
//!     .route("/users/{id}", Method::Get, Handler::class_method("UserController", "show"))
//!     .build()?;
//!
//! let mut router = Router::new();
//! router.add_routing_map(map)?;
//!
//! let result = router.match_request(Method::Get, "/users/42");
//! assert!(result.is_match());
//! assert_eq!(result.variables["id"], "42");
//! assert_eq!(result.matched_route.as_deref(), Some("/users/{id}"));
//!
//! // A miss is a normal outcome, not an error:
//! let miss = router.match_request(Method::Delete, "/users");
//! assert!(!miss.is_match());
//! assert!(miss.method_not_allowed()); // 405, not 404 — /users exists
//! # Ok::<(), junction::RouteError>(())
//! ```
//!
//! ## What happens after the match
//!
//! The [`MatchResult`] hands your dispatcher a [`Handler`] *descriptor*.
//! Resolving it against your reflection facility ([`HandlerLookup`]) yields
//! an [`Invocation`] — static call, instance call, free function, or opaque
//! callable — and a host-side [`Invoker`] performs the dispatch. junction
//! never constructs or calls anything itself.

mod error;
mod handler;
mod map;
mod method;
mod request;
mod router;
mod table;
mod template;

pub use error::RouteError;
pub use handler::{Callable, Handler, HandlerLookup, Invocation, Invoker};
pub use map::{RoutingMap, RoutingMapBuilder};
pub use method::{Method, MethodSet};
pub use request::{MatchResult, Request};
pub use router::{Router, RoutingSource};
pub use table::RouteTable;
pub use template::CompiledTemplate;
