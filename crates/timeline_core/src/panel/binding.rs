//! Store subscription shared by all panel controllers.

use crate::model::document::Document;
use crate::store::{DocumentStore, SubscriptionId};
use log::debug;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// View model re-derived from the document on every change.
pub trait PanelView {
    /// Stable panel name used in log events.
    const NAME: &'static str;

    fn render(&mut self, document: &Document);

    /// Resets the view when no document is loaded.
    fn clear(&mut self);
}

/// Keeps one view model subscribed to a store.
pub struct PanelBinding<V> {
    view: Rc<RefCell<V>>,
    subscription: Option<SubscriptionId>,
}

impl<V: PanelView + 'static> PanelBinding<V> {
    /// Subscribes `view` and renders it once.
    pub fn attach(store: &mut DocumentStore, view: V) -> Self {
        let view = Rc::new(RefCell::new(view));
        let listener_view = Rc::clone(&view);
        let subscription = store.subscribe(move |change, document| {
            debug!(
                "event=panel_render module=panel panel={} change={}",
                V::NAME,
                change.as_str()
            );
            listener_view.borrow_mut().render(document);
        });

        let binding = Self {
            view,
            subscription: Some(subscription),
        };
        binding.refresh(store);
        binding
    }

    /// Re-renders from current store state.
    pub fn refresh(&self, store: &DocumentStore) {
        let mut view = self.view.borrow_mut();
        match store.document() {
            Some(document) => view.render(document),
            None => view.clear(),
        }
    }

    pub fn view(&self) -> Ref<'_, V> {
        self.view.borrow()
    }

    pub fn view_mut(&self) -> RefMut<'_, V> {
        self.view.borrow_mut()
    }

    pub fn detach(mut self, store: &mut DocumentStore) {
        if let Some(subscription) = self.subscription.take() {
            store.unsubscribe(subscription);
        }
    }
}
