//! Logger injection.
//!
//! ```
//! use lighthttp::prelude::*;
//! use lighthttp::decorator::logging;
//!
//! let base = Logger::new(std::io::sink(), false).with_kv("service", "accounts");
//! let router = Router::new().with_boxed_route(
//!     Method::GET,
//!     decorate(
//!         (|req: &mut Request, _: &mut Response| {
//!             let log = logging::logger(req).with_kv("path", req.path.as_str());
//!             log.info("event", "handled");
//!         })
//!         .into_boxed(),
//!         vec![logging::injector(base)],
//!     ),
//! );
//! router.handle(&mut Request::default(), &mut Response::default());
//! ```
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::ctx::{self, Key};
use crate::decorator::DecoratorRef;
use crate::handler::{BoxedHandler, Handler};
use crate::logger::Logger;
use crate::request::Request;
use crate::response::Response;

lazy_static! {
    static ref LOGGER_KEY: Key<Arc<Logger>> = ctx::next_key();
}

/// Decorator sharing `logger` with every request it handles.
pub fn injector(logger: Logger) -> DecoratorRef {
    let logger = Arc::new(logger);
    Arc::new(move |next: BoxedHandler| -> BoxedHandler {
        let logger = logger.clone();
        Arc::new(move |req: &mut Request, res: &mut Response| {
            ctx::get_map_mut(req).insert(&*LOGGER_KEY, logger.clone());
            next.handle(req, res);
        })
    })
}

/// Sublogger of the injected logger. Fields added to it stay with the
/// request.
///
/// # Panics
/// Panics if the request did not go through [`injector`].
pub fn logger(request: &Request) -> Logger {
    match ctx::get_map(request).get(&*LOGGER_KEY) {
        Some(logger) => logger.sublogger(),
        None => panic!("logger accessed without the logging injector decorator"),
    }
}
