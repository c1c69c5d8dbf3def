//! JSON envelope responses.
//!
//! The handler fills in the request's [`Envelope`]; the decorator writes it
//! once the handler returns:
//!
//! ```
//! use lighthttp::prelude::*;
//! use lighthttp::decorator::respond;
//!
//! let get_user = |req: &mut Request, _: &mut Response| {
//!     let envelope = respond::envelope(req);
//!     envelope.code = 404;
//!     envelope.message = "no such user".to_string();
//! };
//! let h = decorate(get_user.into_boxed(), vec![respond::json()]);
//!
//! let mut res = Response::default();
//! h.handle(&mut lighthttp::ctx::init_map(Request::default()), &mut res);
//! assert_eq!(res.status_code, 404);
//! assert_eq!(res.text(), "{\"code\":404,\"message\":\"no such user\"}\n");
//! ```
use std::sync::Arc;

use lazy_static::lazy_static;
use log::error;
use serde::Serialize;

use crate::ctx::{self, Key};
use crate::decorator::DecoratorRef;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// Response body: `{"code": ..., "message": ..., "data": ...}`. An empty
/// message and a missing payload are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Also used as the HTTP status.
    pub code: u16,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    pub fn new(code: u16) -> Self {
        Self {
            code,
            message: String::new(),
            data: None,
        }
    }
    /// Serialize `data` as the payload.
    pub fn set_data<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<(), serde_json::Error> {
        self.data = Some(serde_json::to_value(data)?);
        Ok(())
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(200)
    }
}

lazy_static! {
    static ref ENVELOPE_KEY: Key<Envelope> = ctx::next_key();
}

/// Decorator writing the request's envelope as the JSON response.
pub fn json() -> DecoratorRef {
    Arc::new(|next: BoxedHandler| -> BoxedHandler {
        Arc::new(move |req: &mut Request, res: &mut Response| {
            ctx::get_map_mut(req).insert(&*ENVELOPE_KEY, Envelope::default());
            next.handle(req, res);
            let envelope = ctx::get_map_mut(req)
                .remove(&*ENVELOPE_KEY)
                .unwrap_or_default();
            write_envelope(&envelope, res);
        })
    })
}

fn write_envelope(envelope: &Envelope, res: &mut Response) {
    res.headers_mut()
        .set("Content-Type", "application/json; charset=utf-8");
    match serde_json::to_vec(envelope) {
        Ok(mut body) => {
            body.push(b'\n');
            res.write_status(envelope.code);
            res.write(&body);
        }
        Err(err) => {
            error!("failed to encode response envelope: {}", err);
            res.write_status(500);
        }
    }
}

/// The envelope the [`json`] decorator will write.
///
/// # Panics
/// Panics if the request did not go through [`json`].
pub fn envelope(request: &mut Request) -> &mut Envelope {
    match ctx::get_map_mut(request).get_mut(&*ENVELOPE_KEY) {
        Some(envelope) => envelope,
        None => panic!("envelope accessed without the json responder decorator"),
    }
}
