//! Change notification between stores and views.
//!
//! A store owns a [`Notifier`] and exposes `subscribe`; views register once at
//! start-up and re-read the store when notified. Everything is single-threaded.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Listener<E> = Rc<dyn Fn(&E)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct Notifier<E> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Listener<E>)>>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<E> Notifier<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = self.listeners.borrow_mut();
        let before = guard.len();
        guard.retain(|(existing, _)| *existing != id);
        guard.len() != before
    }

    /// Deliver `event` to every listener registered before the call.
    ///
    /// The listener list is snapshotted first, so listeners may subscribe,
    /// unsubscribe or emit further events without a borrow conflict.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_registration_order() {
        let notifier = Notifier::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&seen);
        notifier.subscribe(move |e| a.borrow_mut().push(("a", *e)));
        let b = Rc::clone(&seen);
        notifier.subscribe(move |e| b.borrow_mut().push(("b", *e)));

        notifier.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let notifier = Notifier::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = notifier.subscribe(move |_| h.set(h.get() + 1));

        notifier.emit(&());
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.emit(&());

        assert_eq!(hits.get(), 1);
        assert!(notifier.is_empty());
    }

    #[test]
    fn listener_may_subscribe_during_emit() {
        let notifier = Rc::new(Notifier::<()>::new());
        let inner = Rc::clone(&notifier);
        notifier.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        notifier.emit(&());
        assert_eq!(notifier.len(), 2);
    }
}
