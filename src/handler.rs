//! Base for all request handlers.
use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

/// A Handler implements an HTTP endpoint, or wraps one. It reads the
/// request (and its context map) and writes into the shared response.
///
/// Any `Fn(&mut Request, &mut Response)` is a Handler:
/// ```
/// use lighthttp::prelude::*;
///
/// let hello = |_req: &mut Request, res: &mut Response| res.write(b"Hello!");
///
/// let mut response = Response::default();
/// hello.handle(&mut Request::default(), &mut response);
/// assert_eq!(response.payload, b"Hello!".to_vec());
/// ```
pub trait Handler: Send + Sync {
    fn handle(&self, request: &mut Request, response: &mut Response);

    /// Type-erase the handler so it can be shared by routers and chains.
    fn into_boxed(self) -> BoxedHandler
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// Shared, type-erased handler. Decorated handlers are built once and may
/// serve many requests concurrently.
pub type BoxedHandler = Arc<dyn Handler>;

impl<F> Handler for F
where
    F: Fn(&mut Request, &mut Response) + Send + Sync,
{
    fn handle(&self, request: &mut Request, response: &mut Response) {
        (self)(request, response)
    }
}
