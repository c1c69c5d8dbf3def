//! Helpers shared by unit tests.
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;

use crate::decorator::DecoratorRef;
use crate::handler::{BoxedHandler, Handler};
use crate::logger::{set_global_level, Level};
use crate::request::Request;
use crate::response::Response;

/// In-memory sink readable after the logger took ownership of a clone.
#[derive(Clone, Default)]
pub(crate) struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub(crate) fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
    pub(crate) fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Write for SharedBuf {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

lazy_static! {
    static ref LEVEL_LOCK: Mutex<()> = Mutex::new(());
}

/// Serializes tests that write through a logger, since the global level is
/// process-wide. Resets the global level to debug.
pub(crate) fn level_guard() -> MutexGuard<'static, ()> {
    let guard = LEVEL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    set_global_level(Level::Debug);
    guard
}

/// Decorator writing `before <name>` and `after <name>` lines around the
/// wrapped handler.
pub(crate) fn tag(name: &'static str) -> DecoratorRef {
    Arc::new(move |next: BoxedHandler| -> BoxedHandler {
        Arc::new(move |req: &mut Request, res: &mut Response| {
            res.write(format!("before {}\n", name).as_bytes());
            next.handle(req, res);
            res.write(format!("after {}\n", name).as_bytes());
        })
    })
}
