//! HTTP request as seen by handlers.
pub use header::*;
pub use method::*;

use crate::ctx::ContextMap;

pub mod header;
pub mod method;

/// An HTTP Request.
///
/// The host server builds one per incoming request. The per-request
/// [`ContextMap`](crate::ctx::ContextMap) is attached lazily, normally by the
/// [`Router`](crate::router::Router) before any decorator runs.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: String,
    pub fragment: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
    context: Option<ContextMap>,
}

impl Default for Request {
    fn default() -> Self {
        let mut headers = Headers::new();
        headers.add("Host", "localhost");
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query: "".to_string(),
            fragment: "".to_string(),
            headers,
            body: None,
            context: None,
        }
    }
}

impl Request {
    /// Create a request from a method and a request target such as
    /// `/search?q=rust#results`.
    ///
    /// # Example
    /// ```
    /// use lighthttp::request::{Method, Request};
    ///
    /// let req = Request::new(Method::GET, "/search?q=rust#results");
    /// assert_eq!(req.path, "/search");
    /// assert_eq!(req.query, "q=rust");
    /// assert_eq!(req.fragment, "results");
    /// ```
    pub fn new(method: Method, target: &str) -> Self {
        let (rest, fragment) = match target.split_once('#') {
            Some((rest, fragment)) => (rest, fragment),
            None => (target, ""),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, query),
            None => (rest, ""),
        };
        Self {
            method,
            path: path.to_string(),
            query: query.to_string(),
            fragment: fragment.to_string(),
            ..Self::default()
        }
    }
    /// Append a header value, keeping earlier values for the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.add(name, value);
        self
    }
    /// Attach a fresh, empty context map, dropping any previous one.
    pub fn init_context(&mut self) {
        self.context = Some(ContextMap::new());
    }
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }
    /// The request's context map.
    ///
    /// # Panics
    /// Panics if [`init_context`](Request::init_context) was never called.
    pub fn context(&self) -> &ContextMap {
        match &self.context {
            Some(map) => map,
            None => panic!("request context map accessed before initialization"),
        }
    }
    /// Mutable access to the request's context map.
    ///
    /// # Panics
    /// Panics if [`init_context`](Request::init_context) was never called.
    pub fn context_mut(&mut self) -> &mut ContextMap {
        match &mut self.context {
            Some(map) => map,
            None => panic!("request context map accessed before initialization"),
        }
    }
}
