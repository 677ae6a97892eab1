//! Typed change notification with an explicit disposal contract.
//!
//! A [`Notifier`] holds registered callbacks; [`Notifier::subscribe`]
//! returns a [`Subscription`] handle, and the registration lives exactly
//! as long as the handle: `dispose()` (or dropping it) unregisters the
//! callback. Every subscribe has a matching unsubscribe by construction,
//! so long-lived engines cannot accumulate dead observers.
//!
//! Single-threaded, like the rest of the engine: callbacks run
//! synchronously inside `notify`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct Registry<T> {
    subscribers: Vec<(u64, Box<dyn FnMut(&T)>)>,
    next_id: u64,
}

/// A typed broadcast channel for model change events.
pub struct Notifier<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Notifier<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a callback. It fires on every `notify` until the returned
    /// handle is disposed or dropped.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.subscribers.push((id, Box::new(callback)));
            id
        };
        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry
                        .borrow_mut()
                        .subscribers
                        .retain(|(sub_id, _)| *sub_id != id);
                }
            })),
        }
    }

    /// Invoke every live callback with `value`.
    pub fn notify(&self, value: &T) {
        let mut registry = self.registry.borrow_mut();
        for (_, callback) in registry.subscribers.iter_mut() {
            callback(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().subscribers.len()
    }
}

/// Handle tying a callback registration to a scope.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unregister now instead of at drop time.
    pub fn dispose(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscribe_and_notify() {
        let notifier: Notifier<i32> = Notifier::new();
        let seen = Rc::new(Cell::new(0));
        let seen_in_cb = Rc::clone(&seen);
        let sub = notifier.subscribe(move |v| seen_in_cb.set(seen_in_cb.get() + *v));

        notifier.notify(&2);
        notifier.notify(&3);
        assert_eq!(seen.get(), 5);
        drop(sub);
    }

    #[test]
    fn test_dispose_stops_delivery() {
        let notifier: Notifier<u32> = Notifier::new();
        let count = Rc::new(Cell::new(0u32));
        let count_in_cb = Rc::clone(&count);
        let sub = notifier.subscribe(move |_| count_in_cb.set(count_in_cb.get() + 1));

        notifier.notify(&0);
        sub.dispose();
        notifier.notify(&0);
        assert_eq!(count.get(), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let notifier: Notifier<u32> = Notifier::new();
        {
            let _sub = notifier.subscribe(|_| {});
            assert_eq!(notifier.subscriber_count(), 1);
        }
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_notifier_is_harmless() {
        let sub = {
            let notifier: Notifier<u32> = Notifier::new();
            notifier.subscribe(|_| {})
        };
        // Notifier is gone; disposing must not panic.
        sub.dispose();
    }
}
