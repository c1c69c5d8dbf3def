//! Response header injection.
use std::sync::Arc;

use crate::decorator::DecoratorRef;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// How the injected values combine with headers already on the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apply {
    /// Append, keeping existing values.
    Add,
    /// Replace existing values.
    Set,
}

/// Decorator writing the given headers to the response before delegating.
///
/// # Example
/// ```
/// use lighthttp::prelude::*;
/// use lighthttp::decorator::header::{self, Apply};
///
/// let cors = header::injector(vec![("Access-Control-Allow-Origin", "*")], Apply::Set);
/// let h = decorate((|_: &mut Request, _: &mut Response| {}).into_boxed(), vec![cors]);
///
/// let mut res = Response::default();
/// h.handle(&mut Request::default(), &mut res);
/// assert_eq!(res.headers().get("access-control-allow-origin"), Some("*"));
/// ```
pub fn injector<I, K, V>(headers: I, apply: Apply) -> DecoratorRef
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let headers: Arc<Vec<(String, String)>> = Arc::new(
        headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect(),
    );
    Arc::new(move |next: BoxedHandler| -> BoxedHandler {
        let headers = headers.clone();
        Arc::new(move |req: &mut Request, res: &mut Response| {
            let out = res.headers_mut();
            for (name, value) in headers.iter() {
                match apply {
                    Apply::Add => out.add(name, value),
                    Apply::Set => out.set(name, value),
                }
            }
            next.handle(req, res);
        })
    })
}
