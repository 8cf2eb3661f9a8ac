//! Scoped device-memory session.

use tracing::{debug, warn};

use crate::backend::Engine;

/// Guard over the engine's device memory for one synthesis attempt.
///
/// Dropping the guard tells the engine to free cached model state, so the
/// release runs on every exit path. Release failures are logged and never
/// escalated.
pub struct DeviceSession<'a, E: Engine> {
    engine: &'a E,
}

impl<'a, E: Engine> DeviceSession<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }
}

impl<E: Engine> Drop for DeviceSession<'_, E> {
    fn drop(&mut self) {
        match self.engine.release() {
            Ok(()) => debug!("engine device memory released"),
            Err(err) => warn!("Failed to release engine device memory: {err}"),
        }
    }
}
