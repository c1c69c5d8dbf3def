//! Handler decorators (middleware) and decorator chains.
//!
//! A decorator wraps a handler with logic that runs before and/or after it
//! delegates to the wrapped handler:
//!
//! ```
//! use std::sync::Arc;
//! use lighthttp::prelude::*;
//!
//! fn tag(name: &'static str) -> DecoratorRef {
//!     Arc::new(move |next: BoxedHandler| -> BoxedHandler {
//!         Arc::new(move |req: &mut Request, res: &mut Response| {
//!             res.write(format!("before {} ", name).as_bytes());
//!             next.handle(req, res);
//!             res.write(format!("after {} ", name).as_bytes());
//!         })
//!     })
//! }
//!
//! let core = |_: &mut Request, res: &mut Response| res.write(b"core ");
//! let handler = decorate(core.into_boxed(), vec![tag("inner"), tag("outer")]);
//!
//! let mut res = Response::default();
//! handler.handle(&mut Request::default(), &mut res);
//! assert_eq!(res.text(), "before outer before inner core after inner after outer ");
//! ```
//!
//! Decorators apply left to right, each wrapping the result of the previous
//! one: `decorate(h, [d3, d2, d1])` is `d1(d2(d3(h)))`. The last decorator
//! is the outermost, so its "before" logic runs first and its "after" logic
//! runs last.
use std::sync::Arc;

use crate::handler::BoxedHandler;
use crate::router::Router;

pub mod header;
pub mod logging;
pub mod query;
pub mod respond;

/// Wraps a handler into a new handler.
///
/// Implemented by every `Fn(BoxedHandler) -> BoxedHandler`. Composition must
/// be free of side effects: only the returned handler does work, at request
/// time.
pub trait Decorator: Send + Sync {
    fn decorate(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Decorator for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync,
{
    fn decorate(&self, next: BoxedHandler) -> BoxedHandler {
        (self)(next)
    }
}

pub type DecoratorRef = Arc<dyn Decorator>;

/// Decorate `handler` with each decorator in order.
pub fn decorate<I>(handler: BoxedHandler, decorators: I) -> BoxedHandler
where
    I: IntoIterator<Item = DecoratorRef>,
{
    decorators
        .into_iter()
        .fold(handler, |handler, decorator| decorator.decorate(handler))
}

/// Decorate every handler of the router with the same decorators.
pub fn decorate_router<I>(router: Router, decorators: I) -> Router
where
    I: IntoIterator<Item = DecoratorRef>,
{
    Chain::new(decorators).decorate_router(router)
}

/// A reusable, ordered list of decorators.
///
/// # Example
/// ```
/// use lighthttp::prelude::*;
/// use lighthttp::decorator::header::{self, Apply};
///
/// let base = Chain::new(vec![header::injector(vec![("X-Base", "1")], Apply::Add)]);
/// let extended = base.append(vec![header::injector(vec![("X-Extra", "2")], Apply::Add)]);
/// assert_eq!(base.len(), 1);
/// assert_eq!(extended.len(), 2);
///
/// let core = |_: &mut Request, _: &mut Response| {};
/// let handler = extended.decorate(core.into_boxed());
/// let mut res = Response::default();
/// handler.handle(&mut Request::default(), &mut res);
/// assert_eq!(res.headers().get("X-Base"), Some("1"));
/// assert_eq!(res.headers().get("X-Extra"), Some("2"));
/// ```
#[derive(Clone, Default)]
pub struct Chain {
    decorators: Vec<DecoratorRef>,
}

impl Chain {
    pub fn new<I>(decorators: I) -> Self
    where
        I: IntoIterator<Item = DecoratorRef>,
    {
        Self {
            decorators: decorators.into_iter().collect(),
        }
    }
    pub fn len(&self) -> usize {
        self.decorators.len()
    }
    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, DecoratorRef> {
        self.decorators.iter()
    }
    /// New chain with `decorators` after the current ones. The receiver is
    /// left untouched, so a chain can be extended in several directions.
    pub fn append<I>(&self, decorators: I) -> Self
    where
        I: IntoIterator<Item = DecoratorRef>,
    {
        Self {
            decorators: self
                .decorators
                .iter()
                .cloned()
                .chain(decorators)
                .collect(),
        }
    }
    pub fn decorate(&self, handler: BoxedHandler) -> BoxedHandler {
        decorate(handler, self.decorators.iter().cloned())
    }
    pub fn decorate_router(&self, router: Router) -> Router {
        router.map_handlers(|handler| self.decorate(handler))
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a DecoratorRef;
    type IntoIter = std::slice::Iter<'a, DecoratorRef>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
