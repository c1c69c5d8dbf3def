pub use crate::decorator::{decorate, decorate_router, Chain, Decorator, DecoratorRef};
pub use crate::handler::{BoxedHandler, Handler};
pub use crate::logger::{Field, Level, Logger};
pub use crate::request::{Header, Headers, Method, Request};
pub use crate::response::Response;
pub use crate::router::Router;
