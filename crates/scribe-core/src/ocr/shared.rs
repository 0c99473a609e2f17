//! Construct-once handle for the OCR client.
//!
//! The composition root owns one [`SharedClient`] and asks it for the client
//! on every pipeline run. The first successful initialization is kept; later
//! requests get the same `Arc` without running the initializer again.
//! Initialization is serialized, so concurrent first callers build exactly
//! one client.

use crate::error::Result;
use std::sync::{Arc, Mutex};

pub struct SharedClient<T: ?Sized> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T: ?Sized> SharedClient<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the existing instance, or build it with `init`.
    ///
    /// A failed `init` leaves the slot empty, so the next call tries again.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<Arc<T>>,
    {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = slot.as_ref() {
            return Ok(Arc::clone(existing));
        }
        let created = init()?;
        *slot = Some(Arc::clone(&created));
        Ok(created)
    }

    /// The instance, if one has been built.
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
    }
}

impl<T: ?Sized> Default for SharedClient<T> {
    fn default() -> Self {
        Self::new()
    }
}
