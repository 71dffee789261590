//! Subscription registry shared by the store and the panel stylesheets.

/// Handle returned by `subscribe`, used to unsubscribe on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Ordered list of boxed callbacks.
///
/// Callbacks are invoked in subscription order.
pub struct Listeners<F: ?Sized> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<F>)>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> Listeners<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one callback and returns its handle.
    pub fn insert(&mut self, listener: Box<F>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    /// Removes one callback. Returns `false` for unknown handles.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut F> {
        self.entries.iter_mut().map(|(_, listener)| listener.as_mut())
    }
}

impl<F: ?Sized> std::fmt::Debug for Listeners<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Listeners;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn removed_listener_is_not_called() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut listeners: Listeners<dyn FnMut(u32)> = Listeners::new();

        let first_calls = Rc::clone(&calls);
        let first = listeners.insert(Box::new(move |value: u32| {
            first_calls.borrow_mut().push(("a", value))
        }));
        let second_calls = Rc::clone(&calls);
        listeners.insert(Box::new(move |value: u32| {
            second_calls.borrow_mut().push(("b", value))
        }));

        for listener in listeners.iter_mut() {
            listener(1);
        }
        assert!(listeners.remove(first));
        assert!(!listeners.remove(first));
        for listener in listeners.iter_mut() {
            listener(2);
        }

        assert_eq!(*calls.borrow(), vec![("a", 1), ("b", 1), ("b", 2)]);
        assert_eq!(listeners.len(), 1);
    }
}
