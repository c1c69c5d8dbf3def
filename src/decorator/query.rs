//! URL query string parsing.
//!
//! ```
//! use lighthttp::prelude::*;
//! use lighthttp::decorator::query;
//!
//! let router = Router::new().with_boxed_route(
//!     Method::GET,
//!     decorate(
//!         (|req: &mut Request, res: &mut Response| {
//!             let name = query::values(req).first("name").unwrap_or("world").to_string();
//!             res.write(format!("Hello, {}!", name).as_bytes());
//!         })
//!         .into_boxed(),
//!         vec![query::parser()],
//!     ),
//! );
//!
//! let mut res = Response::default();
//! router.handle(&mut Request::new(Method::GET, "/hello?name=Bob"), &mut res);
//! assert_eq!(res.text(), "Hello, Bob!");
//! ```
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::trace;
use serde::Serialize;
use url::form_urlencoded;

use crate::ctx::{self, Key};
use crate::decorator::DecoratorRef;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// Parsed query parameters: each key maps to its values in order of
/// appearance. Keys iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryValues(BTreeMap<String, Vec<String>>);

impl QueryValues {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }
    /// Parse a URL-encoded query string. A key without `=` gets an empty
    /// value.
    pub fn parse(query: &str) -> Self {
        let mut values = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            values.add(&key, &value);
        }
        values
    }
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
    pub fn add(&mut self, key: &str, value: &str) {
        self.0
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }
    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), vec![value.to_string()]);
    }
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(key)
    }
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// URL-encode, keys sorted.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.0 {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<'a> IntoIterator for &'a QueryValues {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

lazy_static! {
    static ref QUERY_KEY: Key<QueryValues> = ctx::next_key();
}

/// Decorator parsing the request query into the context map.
pub fn parser() -> DecoratorRef {
    Arc::new(|next: BoxedHandler| -> BoxedHandler {
        Arc::new(move |req: &mut Request, res: &mut Response| {
            let values = QueryValues::parse(&req.query);
            trace!("parsed {} query keys for {}", values.len(), req.path);
            ctx::get_map_mut(req).insert(&*QUERY_KEY, values);
            next.handle(req, res);
        })
    })
}

/// Query values parsed by [`parser`].
///
/// # Panics
/// Panics if the request did not go through [`parser`].
pub fn values(request: &Request) -> &QueryValues {
    match ctx::get_map(request).get(&*QUERY_KEY) {
        Some(values) => values,
        None => panic!("query values accessed without the query parser decorator"),
    }
}
