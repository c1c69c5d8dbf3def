//! Per-request context map.
//!
//! Decorators pass data down the chain without widening every handler
//! signature: each feature reserves a typed [`Key`] once, then reads and
//! writes its value in the request's [`ContextMap`].
//!
//! # Example
//! ```
//! use lighthttp::ctx::{self, Key};
//! use lighthttp::request::Request;
//!
//! let request_id: Key<u64> = ctx::next_key();
//!
//! let mut req = ctx::init_map(Request::default());
//! ctx::get_map_mut(&mut req).insert(&request_id, 42);
//! assert_eq!(ctx::get_map(&req).get(&request_id), Some(&42));
//! ```
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::request::Request;

/// Typed key into a [`ContextMap`].
pub struct Key<T> {
    id: usize,
    phantom_t: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.id)
    }
}

/// Issues unique keys. Ids start at 1 and are never reused.
pub struct KeyRegistry {
    last: AtomicUsize,
}

impl KeyRegistry {
    pub const fn new() -> Self {
        Self {
            last: AtomicUsize::new(0),
        }
    }
    pub fn next_key<T: 'static>(&self) -> Key<T> {
        Key {
            id: self.last.fetch_add(1, Ordering::Relaxed) + 1,
            phantom_t: PhantomData,
        }
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRY: KeyRegistry = KeyRegistry::new();

/// Reserve a key from the process-wide registry. Call once per feature.
pub fn next_key<T: 'static>() -> Key<T> {
    REGISTRY.next_key()
}

/// Request-scoped heterogeneous map. Not synchronized: it belongs to the one
/// request being handled.
#[derive(Default)]
pub struct ContextMap {
    values: HashMap<usize, Box<dyn Any + Send>>,
}

impl ContextMap {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
    /// Store a value, returning the previous one for the key.
    pub fn insert<T: Any + Send>(&mut self, key: &Key<T>, value: T) -> Option<T> {
        self.values
            .insert(key.id, Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }
    pub fn get<T: Any + Send>(&self, key: &Key<T>) -> Option<&T> {
        self.values.get(&key.id).and_then(|v| v.downcast_ref::<T>())
    }
    pub fn get_mut<T: Any + Send>(&mut self, key: &Key<T>) -> Option<&mut T> {
        self.values
            .get_mut(&key.id)
            .and_then(|v| v.downcast_mut::<T>())
    }
    pub fn remove<T: Any + Send>(&mut self, key: &Key<T>) -> Option<T> {
        self.values
            .remove(&key.id)
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }
    pub fn contains<T: Any + Send>(&self, key: &Key<T>) -> bool {
        self.get(key).is_some()
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ContextMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&usize> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("ContextMap").field("keys", &keys).finish()
    }
}

/// Attach a fresh, empty map to the request. Call once, as early as
/// possible in request handling.
pub fn init_map(mut request: Request) -> Request {
    request.init_context();
    request
}

/// # Panics
/// Panics if [`init_map`] was never called on the request.
pub fn get_map(request: &Request) -> &ContextMap {
    request.context()
}

/// # Panics
/// Panics if [`init_map`] was never called on the request.
pub fn get_map_mut(request: &mut Request) -> &mut ContextMap {
    request.context_mut()
}
