use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::ports::SessionInvalidator;

type Slot = Option<Arc<dyn SessionInvalidator>>;

// Single late-bound slot connecting the transport to the session controller.
// The transport is built with a clone of the hook and fires it; the controller
// installs itself on mount and clears itself on unmount. Clones share the slot.
#[derive(Clone, Default)]
pub struct ExpiryHook {
    slot: Arc<RwLock<Slot>>,
}

impl ExpiryHook {
    pub fn new() -> Self {
        Self::default()
    }

    // Replaces whatever handler was installed before.
    pub fn install(&self, handler: Arc<dyn SessionInvalidator>) {
        *self.write() = Some(handler);
    }

    pub fn clear(&self) {
        *self.write() = None;
    }

    // Clears the slot only if `handler` is the one installed, so a stale
    // controller cannot evict its replacement.
    pub fn remove(&self, handler: &Arc<dyn SessionInvalidator>) -> bool {
        let mut slot = self.write();
        let owned = slot
            .as_ref()
            .is_some_and(|current| std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(handler)));
        if owned {
            *slot = None;
        }
        owned
    }

    pub fn is_installed(&self) -> bool {
        self.read().is_some()
    }

    // Runs the installed handler, if any. Returns whether one ran.
    pub fn fire(&self) -> bool {
        // Clone out so the handler never runs under the lock.
        let handler = self.read().clone();
        match handler {
            Some(handler) => {
                handler.invalidate();
                true
            }
            None => false,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Slot> {
        self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slot> {
        self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
