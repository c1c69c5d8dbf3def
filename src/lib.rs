//! Lightweight helpers for HTTP services, meant to sit behind any HTTP server.
//! * Method based [request routing](crate::router::Router)
//! * [Decorators](crate::decorator) and reusable [decorator chains](crate::decorator::Chain)
//! * Typed per-request [context map](crate::ctx)
//! * Ready-made decorators: [query parsing](crate::decorator::query),
//!   [response headers](crate::decorator::header),
//!   [logger injection](crate::decorator::logging) and
//!   [JSON envelopes](crate::decorator::respond)
//! * Structured [JSON logger](crate::logger::Logger)
//!
//! # Example
//! ```
//! use lighthttp::prelude::*;
//! use lighthttp::decorator::header::{self, Apply};
//! use lighthttp::decorator::{logging, query, respond};
//!
//! let log = Logger::new(std::io::sink(), true).with_kv("service", "users");
//!
//! let common = Chain::new(vec![
//!     query::parser(),
//!     logging::injector(log),
//!     header::injector(vec![("Cache-Control", "no-store")], Apply::Set),
//! ]);
//! let api = common.append(vec![respond::json()]);
//!
//! let list_users = |req: &mut Request, _: &mut Response| {
//!     let limit = query::values(req).first("limit").unwrap_or("10").to_string();
//!     logging::logger(req).info("limit", limit.as_str());
//!     let envelope = respond::envelope(req);
//!     envelope.message = format!("first {} users", limit);
//! };
//!
//! let router = Router::new()
//!     .with_boxed_route(Method::GET, api.decorate(list_users.into_boxed()));
//!
//! let mut response = Response::default();
//! router.handle(&mut Request::new(Method::GET, "/users?limit=5"), &mut response);
//! assert_eq!(response.status_code, 200);
//! assert_eq!(response.headers().get("Cache-Control"), Some("no-store"));
//! assert_eq!(response.text(), "{\"code\":200,\"message\":\"first 5 users\"}\n");
//!
//! let mut response = Response::default();
//! router.handle(&mut Request::new(Method::DELETE, "/users"), &mut response);
//! assert_eq!(response.status_code, 405);
//! assert_eq!(response.headers().get("Allow"), Some("GET"));
//! ```
pub mod ctx;
pub mod decorator;
pub mod handler;
pub mod logger;
pub mod prelude;
pub mod request;
pub mod response;
pub mod router;

#[cfg(test)]
pub(crate) mod testutil;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
