//! Edits requested by listeners while a notification is in flight.
//!
//! Listeners only see `&Document`, so they cannot mutate the store they are
//! called from. They queue follow-up edits here instead; the store applies
//! them once the current fan-out has finished.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// One follow-up edit applied by the store after a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredEdit {
    /// Back-fill the display window. Ignored when a window is already set.
    InferredWindow { start: i64, end: i64 },
}

/// Shared handle to the store's deferred edit queue.
#[derive(Debug, Clone, Default)]
pub struct DeferredEdits {
    queue: Rc<RefCell<VecDeque<DeferredEdit>>>,
}

impl DeferredEdits {
    pub fn push(&self, edit: DeferredEdit) {
        self.queue.borrow_mut().push_back(edit);
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub(crate) fn pop(&self) -> Option<DeferredEdit> {
        self.queue.borrow_mut().pop_front()
    }
}
