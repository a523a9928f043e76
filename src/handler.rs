//! Handler descriptors, resolution, and the invocation contract.
//!
//! # What the engine does and does not do
//!
//! Matching produces a [`Handler`] *descriptor* — a name for the thing that
//! should run, not the thing itself. The engine never calls a handler. A
//! separate invoker, owned by the host dispatcher, turns the descriptor into
//! an actual call:
//!
//! ```text
//! RoutingMap::match_request            ← pure table lookup, no reflection
//!        ↓ MatchResult { handler, … }
//! Handler::resolve(&lookup)            ← existence checks via HandlerLookup
//!        ↓ Invocation
//! invoker.invoke(&invocation)          ← host-owned dispatch, out of scope
//! ```
//!
//! Keeping existence checks out of `match_request` keeps the hot path free
//! of reflection: resolution runs once per matched request, on descriptors
//! the host already validated at startup if it chose to.
//!
//! # Opaque callables
//!
//! A host that routes to closures or function pointers rather than named
//! controllers stores them as [`Callable`] — an `Arc`-erased value the
//! engine carries around without understanding. The host downcasts it back
//! on the far side of the match:
//!
//! ```rust
//! use junction::Callable;
//!
//! let callable = Callable::new("a stand-in for any Send + Sync value");
//! assert_eq!(
//!     callable.downcast_ref::<&str>(),
//!     Some(&"a stand-in for any Send + Sync value"),
//! );
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::RouteError;

// ── Callable ──────────────────────────────────────────────────────────────────

/// An opaque, shareable handler value.
///
/// `Arc` gives cheap, thread-safe shared ownership so the same callable can
/// be handed out across concurrent matches without copying. Equality is
/// identity: two `Callable`s compare equal only when they share the same
/// allocation, which is what table merging needs to tell handlers apart.
#[derive(Clone)]
pub struct Callable(Arc<dyn Any + Send + Sync>);

impl Callable {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the wrapped value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable(<opaque>)")
    }
}

// ── Handler descriptor ────────────────────────────────────────────────────────

/// What should service a matched request.
///
/// The engine treats a descriptor as an opaque value until resolution, where
/// `ClassMethod` and `Function` variants are checked for existence against
/// the host's [`HandlerLookup`].
#[derive(Clone, Debug, PartialEq)]
pub enum Handler {
    /// A controller class/method pair, named by host-defined strings.
    ClassMethod { class: String, method: String },
    /// A named free function.
    Function(String),
    /// An opaque bound callable the host downcasts itself.
    Callable(Callable),
}

impl Handler {
    pub fn class_method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::ClassMethod { class: class.into(), method: method.into() }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    pub fn callable<T: Any + Send + Sync>(value: T) -> Self {
        Self::Callable(Callable::new(value))
    }

    /// Resolves the descriptor into an [`Invocation`], verifying that
    /// whatever it names actually exists.
    ///
    /// For `ClassMethod` descriptors the lookup decides staticness: a static
    /// method resolves to [`Invocation::StaticCall`]; an instance method
    /// resolves to [`Invocation::BoundInstanceCall`], which signals "needs
    /// instantiation" — constructing the instance is the invoker's job, not
    /// the engine's.
    pub fn resolve(&self, lookup: &dyn HandlerLookup) -> Result<Invocation, RouteError> {
        match self {
            Self::ClassMethod { class, method } => {
                if !lookup.class_exists(class) {
                    return Err(RouteError::UnknownClass(class.clone()));
                }
                if !lookup.has_method(class, method) {
                    return Err(RouteError::UnknownMethod {
                        class: class.clone(),
                        method: method.clone(),
                    });
                }
                if lookup.is_static(class, method) {
                    Ok(Invocation::StaticCall { class: class.clone(), method: method.clone() })
                } else {
                    Ok(Invocation::BoundInstanceCall { class: class.clone(), method: method.clone() })
                }
            }
            Self::Function(name) => {
                if !lookup.function_exists(name) {
                    return Err(RouteError::UnknownFunction(name.clone()));
                }
                Ok(Invocation::FreeFunctionCall(name.clone()))
            }
            Self::Callable(callable) => Ok(Invocation::CallableCall(callable.clone())),
        }
    }
}

// ── Host collaborators ────────────────────────────────────────────────────────

/// The host's reflection facility, consulted only during [`Handler::resolve`].
///
/// Pure path/method matching never touches this trait.
pub trait HandlerLookup {
    fn class_exists(&self, class: &str) -> bool;
    fn has_method(&self, class: &str, method: &str) -> bool;
    fn is_static(&self, class: &str, method: &str) -> bool;
    fn function_exists(&self, name: &str) -> bool;
}

/// A resolved, existence-checked handler, ready for dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum Invocation {
    /// Call `class::method` directly, no instance involved.
    StaticCall { class: String, method: String },
    /// Construct (or fetch) an instance of `class`, then call `method` on it.
    BoundInstanceCall { class: String, method: String },
    /// Call the named free function.
    FreeFunctionCall(String),
    /// Downcast and call the opaque callable.
    CallableCall(Callable),
}

/// The host-side dispatch contract.
///
/// junction ships no implementation — invoking handlers is the dispatcher's
/// lifecycle, not the routing core's. The trait exists so hosts write one
/// small component against a closed set of invocation shapes instead of
/// re-inspecting descriptors.
pub trait Invoker {
    type Output;

    fn invoke(&self, invocation: &Invocation) -> Self::Output;
}
