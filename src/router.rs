//! HTTP method based request routing.
use std::collections::HashMap;
use std::iter::FromIterator;

use log::debug;

use crate::handler::{BoxedHandler, Handler};
use crate::request::{Method, Request};
use crate::response::{status, Response};

/// Router is a Handler which dispatches requests to other Handlers based on
/// the request method. Path matching belongs to the host server: mount one
/// Router per path.
///
/// Before dispatching, the router attaches a fresh
/// [`ContextMap`](crate::ctx::ContextMap) to requests that have none.
///
/// When no handler matches, the response carries an `Allow` header listing
/// the registered methods; `OPTIONS` gets `200`, anything else `405`.
///
/// # Example
/// ```
/// use lighthttp::prelude::*;
///
/// fn handle_get(_req: &mut Request, res: &mut Response) {
///     res.write(b"GetHandler");
/// }
///
/// let router = Router::new()
///     .with_route(Method::GET, handle_get)
///     .with_route(Method::POST, |_: &mut Request, res: &mut Response| res.write(b"PostHandler"));
///
/// let mut response = Response::default();
/// router.handle(&mut Request::new(Method::GET, "/test"), &mut response);
/// assert_eq!(response.text(), "GetHandler");
///
/// let mut response = Response::default();
/// router.handle(&mut Request::new(Method::PUT, "/test"), &mut response);
/// assert_eq!(response.status_code, 405);
/// assert_eq!(response.headers().get("Allow"), Some("GET, POST"));
/// ```
#[derive(Clone, Default)]
pub struct Router {
    routes: HashMap<Method, BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }
    pub fn with_route<H>(self, method: Method, handler: H) -> Self
    where
        H: 'static + Handler,
    {
        self.with_boxed_route(method, handler.into_boxed())
    }
    pub fn with_boxed_route(mut self, method: Method, handler: BoxedHandler) -> Self {
        self.routes.insert(method, handler);
        self
    }
    pub fn get(&self, method: &Method) -> Option<&BoxedHandler> {
        self.routes.get(method)
    }
    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.routes.keys().map(Method::as_str).collect();
        methods.sort_unstable();
        methods
    }
    pub fn len(&self) -> usize {
        self.routes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
    /// Replace every handler with `f(handler)`, keeping the methods.
    pub fn map_handlers<F>(self, mut f: F) -> Self
    where
        F: FnMut(BoxedHandler) -> BoxedHandler,
    {
        Self {
            routes: self
                .routes
                .into_iter()
                .map(|(method, handler)| (method, f(handler)))
                .collect(),
        }
    }
    fn allow(&self) -> String {
        self.methods().join(", ")
    }
}

impl FromIterator<(Method, BoxedHandler)> for Router {
    fn from_iter<T: IntoIterator<Item = (Method, BoxedHandler)>>(iter: T) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

impl Handler for Router {
    fn handle(&self, request: &mut Request, response: &mut Response) {
        if !request.has_context() {
            request.init_context();
        }
        if let Some(handler) = self.routes.get(&request.method) {
            return handler.handle(request, response);
        }
        let allow = self.allow();
        debug!(
            "no handler for {} {}, allow: {}",
            request.method, request.path, allow
        );
        response.headers_mut().set("Allow", &allow);
        if request.method == Method::OPTIONS {
            response.write_status(200);
        } else {
            let headers = response.headers_mut();
            headers.set("Content-Type", "text/plain; charset=utf-8");
            headers.set("X-Content-Type-Options", "nosniff");
            response.write_status(405);
            response.write(status::reason(405).as_bytes());
            response.write(b"\n");
        }
    }
}
