/// Application activation notifications
///
/// The window-event dispatcher publishes activate/deactivate events here and
/// subsystems that care (the device layer, audio, input capture) subscribe.
/// Subscriptions are RAII guards: dropping one unregisters the listener, so a
/// subsystem is removed from the hub on every exit path.
///
/// The hub is thread-local: listeners hold native objects that must stay on
/// the render thread, and events are dispatched from that same thread.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key identifying one registered listener
    pub struct SubscriptionKey;
}

/// Application focus transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The application window regained focus
    Activate,
    /// The application window lost focus
    Deactivate,
}

/// Receiver of application focus transitions
pub trait AppActivationListener {
    /// Called when the application becomes the foreground application
    fn on_app_activate(&mut self);

    /// Called when the application goes to the background
    fn on_app_deactivate(&mut self);
}

struct AppEventHub {
    listeners: SlotMap<SubscriptionKey, Weak<RefCell<dyn AppActivationListener>>>,
}

thread_local! {
    static HUB: RefCell<AppEventHub> = RefCell::new(AppEventHub {
        listeners: SlotMap::with_key(),
    });
}

/// Registration guard returned by [`subscribe`]
///
/// The listener stays registered for as long as the guard lives.
#[must_use = "dropping the subscription unregisters the listener immediately"]
pub struct Subscription {
    key: SubscriptionKey,
    _thread_bound: PhantomData<*const ()>,
}

impl Subscription {
    /// Key of the registered listener
    pub fn key(&self) -> SubscriptionKey {
        self.key
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The hub may already be gone if the thread is exiting
        let _ = HUB.try_with(|hub| {
            hub.borrow_mut().listeners.remove(self.key);
        });
    }
}

/// Register a listener for application focus transitions
///
/// The hub only keeps a weak reference: a listener that has been dropped is
/// skipped at dispatch time even if its subscription is still alive.
pub fn subscribe(listener: Weak<RefCell<dyn AppActivationListener>>) -> Subscription {
    let key = HUB.with(|hub| hub.borrow_mut().listeners.insert(listener));
    Subscription {
        key,
        _thread_bound: PhantomData,
    }
}

/// Deliver an event to every live listener
///
/// Returns the number of listeners that received the event. A listener that is
/// already mutably borrowed (an event raised from inside one of its own calls)
/// is skipped.
pub fn dispatch(event: AppEvent) -> usize {
    // Collect first so listeners may subscribe/unsubscribe while handling the event
    let listeners: Vec<Rc<RefCell<dyn AppActivationListener>>> = HUB.with(|hub| {
        hub.borrow()
            .listeners
            .values()
            .filter_map(|weak| weak.upgrade())
            .collect()
    });

    let mut delivered = 0;
    for listener in listeners {
        let Ok(mut listener) = listener.try_borrow_mut() else {
            crate::engine_warn!("galaxy3d::AppEvents",
                "Skipping {:?} for a listener that is busy", event);
            continue;
        };
        match event {
            AppEvent::Activate => listener.on_app_activate(),
            AppEvent::Deactivate => listener.on_app_deactivate(),
        }
        delivered += 1;
    }
    delivered
}

/// Number of registered listeners on the current thread
pub fn listener_count() -> usize {
    HUB.with(|hub| hub.borrow().listeners.len())
}

#[cfg(test)]
#[path = "app_events_tests.rs"]
mod tests;
