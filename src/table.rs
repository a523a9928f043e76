//! The exact-match route table and its merge semantics.
//!
//! A [`RouteTable`] maps a literal path to an ordered list of
//! `(MethodSet, Handler)` pairs. Insertion order is preserved twice over —
//! across paths and within one path's pairs — because both orders are
//! observable: route listing reports paths as registered, and matching picks
//! the *first* pair whose methods intersect the request.
//!
//! Two tables combine with [`RouteTable::merge`], which is deliberately
//! permissive where [`RouteTable::insert`] is strict: merge resolves method
//! conflicts by first-table precedence and never errors, while a conflicting
//! `insert` is a configuration mistake and fails loudly.

use std::collections::HashMap;

use crate::error::RouteError;
use crate::handler::Handler;
use crate::method::MethodSet;

#[derive(Clone, Debug)]
struct Row {
    path: String,
    handlers: Vec<(MethodSet, Handler)>,
}

/// Insertion-ordered mapping from literal path to method/handler pairs.
///
/// ```rust
/// use junction::{Handler, Method, RouteTable};
///
/// let mut table = RouteTable::new();
/// table.insert("/users", Method::Get | Method::Post, Handler::function("users"))?;
///
/// // GET is taken; a second claim on it is a configuration error.
/// assert!(table.insert("/users", Method::Get, Handler::function("other")).is_err());
/// // DELETE is free.
/// table.insert("/users", Method::Delete, Handler::function("purge"))?;
/// # Ok::<(), junction::RouteError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    index: HashMap<String, usize>,
    rows: Vec<Row>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `methods` on `path`.
    ///
    /// Fails with [`RouteError::MethodConflict`] if any of `methods` is
    /// already claimed by an existing pair for the same path. The error
    /// carries the intersecting methods, not the whole requested set.
    pub fn insert(
        &mut self,
        path: &str,
        methods: impl Into<MethodSet>,
        handler: Handler,
    ) -> Result<(), RouteError> {
        let methods = methods.into();
        match self.index.get(path).copied() {
            Some(i) => {
                let row = &mut self.rows[i];
                let clash = row.registered() & methods;
                if !clash.is_empty() {
                    return Err(RouteError::MethodConflict {
                        path: path.to_owned(),
                        methods: clash,
                    });
                }
                row.handlers.push((methods, handler));
            }
            None => {
                self.index.insert(path.to_owned(), self.rows.len());
                self.rows.push(Row {
                    path: path.to_owned(),
                    handlers: vec![(methods, handler)],
                });
            }
        }
        Ok(())
    }

    /// The method/handler pairs for `path`, in registration order.
    pub fn get(&self, path: &str) -> Option<&[(MethodSet, Handler)]> {
        self.index.get(path).map(|&i| self.rows[i].handlers.as_slice())
    }

    /// Like [`get`](Self::get), but also returns the table's own copy of the
    /// path, so callers looking up a derived form (say, a slash-normalized
    /// candidate) learn the route as registered.
    pub fn entry(&self, path: &str) -> Option<(&str, &[(MethodSet, Handler)])> {
        self.index.get(path).map(|&i| {
            let row = &self.rows[i];
            (row.path.as_str(), row.handlers.as_slice())
        })
    }

    /// All methods registered on `path`, as one set.
    pub fn registered_methods(&self, path: &str) -> MethodSet {
        self.index
            .get(path)
            .map(|&i| self.rows[i].registered())
            .unwrap_or(MethodSet::EMPTY)
    }

    /// `(path, pairs)` rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(MethodSet, Handler)])> {
        self.rows.iter().map(|row| (row.path.as_str(), row.handlers.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Combines two tables with first-table precedence.
    ///
    /// Paths only `second` knows copy over wholesale. For a path both tables
    /// know, each of `second`'s pairs copies over only when its methods
    /// intersect none of `first`'s pairs for that path; on any overlap,
    /// `first`'s handler keeps the contested methods and `second`'s pair is
    /// dropped without error.
    ///
    /// ```rust
    /// use junction::{Handler, Method, RouteTable};
    ///
    /// let h1 = Handler::function("h1");
    /// let h3 = Handler::function("h3");
    ///
    /// let mut first = RouteTable::new();
    /// first.insert("/x", Method::Get, h1.clone())?;
    ///
    /// let mut second = RouteTable::new();
    /// second.insert("/x", Method::Get, Handler::function("h2"))?;
    /// second.insert("/x", Method::Post, h3.clone())?;
    ///
    /// let merged = RouteTable::merge(&first, &second);
    /// let pairs = merged.get("/x").unwrap();
    /// assert_eq!(pairs[0], (Method::Get.into(), h1));
    /// assert_eq!(pairs[1], (Method::Post.into(), h3));
    /// # Ok::<(), junction::RouteError>(())
    /// ```
    pub fn merge(first: &RouteTable, second: &RouteTable) -> RouteTable {
        let mut merged = first.clone();
        for row in &second.rows {
            match merged.index.get(&row.path).copied() {
                None => {
                    merged.index.insert(row.path.clone(), merged.rows.len());
                    merged.rows.push(row.clone());
                }
                Some(i) => {
                    let taken = merged.rows[i].registered();
                    for (methods, handler) in &row.handlers {
                        if !taken.intersects(*methods) {
                            merged.rows[i].handlers.push((*methods, handler.clone()));
                        }
                    }
                }
            }
        }
        merged
    }
}

impl Row {
    fn registered(&self) -> MethodSet {
        self.handlers.iter().fold(MethodSet::EMPTY, |set, &(methods, _)| set | methods)
    }
}
