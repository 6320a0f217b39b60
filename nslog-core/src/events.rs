//! In-process publish/subscribe channels keyed by event name.
//!
//! Every logger owns one [`EventBus`]; all loggers additionally publish into
//! the process-wide bus returned by [`global_bus`].
//!
//! Delivery is synchronous and in subscription order. A subscriber that
//! panics is caught and reported through `tracing`; the remaining
//! subscribers still run and the publisher never sees the panic.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock};

use serde_json::Value;
use tracing::warn;

/// Subscriber callback. Receives the published payload.
pub type Handler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Identifies one subscription on one bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionHandle {
    event: String,
    id: u64,
}

impl SubscriptionHandle {
    /// Event name this subscription listens to.
    pub fn event(&self) -> &str {
        &self.event
    }
}

#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<String, Vec<(u64, Handler)>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<String, usize> = self
            .read()
            .iter()
            .map(|(name, subs)| (name.clone(), subs.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event`. Callbacks run in registration order.
    pub fn subscribe<F>(&self, event: &str, callback: F) -> SubscriptionHandle
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.write()
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(callback)));
        SubscriptionHandle {
            event: event.to_string(),
            id,
        }
    }

    /// Remove a single subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        let mut subscribers = self.write();
        let Some(list) = subscribers.get_mut(&handle.event) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != handle.id);
        let removed = list.len() != before;
        if list.is_empty() {
            subscribers.remove(&handle.event);
        }
        removed
    }

    /// Remove every subscription for `event`.
    pub fn unsubscribe_all(&self, event: &str) {
        self.write().remove(event);
    }

    /// Remove every subscription on this bus.
    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.read().get(event).map_or(0, Vec::len)
    }

    /// Deliver `payload` to every subscriber of `event`.
    ///
    /// The subscriber list is snapshotted first, so callbacks may subscribe
    /// or unsubscribe without deadlocking; changes apply to the next publish.
    pub fn publish(&self, event: &str, payload: &[Value]) {
        let handlers: Vec<Handler> = match self.read().get(event) {
            Some(list) => list.iter().map(|(_, h)| Arc::clone(h)).collect(),
            None => return,
        };

        for (index, handler) in handlers.iter().enumerate() {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler(payload))) {
                warn!(
                    event = %event,
                    subscriber = index,
                    reason = %panic_message(panic.as_ref()),
                    "event subscriber panicked"
                );
            }
        }
    }

    // A poisoned lock only means a writer panicked mid-update; the map
    // itself is still structurally valid.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<(u64, Handler)>>> {
        self.subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<(u64, Handler)>>> {
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

static GLOBAL_BUS: OnceLock<Arc<EventBus>> = OnceLock::new();

/// The process-wide bus shared by every logger built without an explicit
/// global bus. Created on first access and kept for the process lifetime.
pub fn global_bus() -> Arc<EventBus> {
    Arc::clone(GLOBAL_BUS.get_or_init(|| Arc::new(EventBus::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Handler) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_for_factory = Arc::clone(&log);
        let factory = move |tag: &str| -> Handler {
            let log = Arc::clone(&log_for_factory);
            let tag = tag.to_string();
            Arc::new(move |payload: &[Value]| {
                log.lock().unwrap().push(format!("{}:{}", tag, payload.len()));
            })
        };
        (log, factory)
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        bus.publish("Nothing", &[json!(1)]);
        assert_eq!(bus.subscriber_count("Nothing"), 0);
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let a = make("a");
        let b = make("b");
        bus.subscribe("Info", move |p| a(p));
        bus.subscribe("Info", move |p| b(p));

        bus.publish("Info", &[json!("x"), json!(2)]);

        assert_eq!(*log.lock().unwrap(), vec!["a:2", "b:2"]);
    }

    #[test]
    fn test_events_are_keyed_by_name() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let warn = make("warn");
        bus.subscribe("Warn", move |p| warn(p));

        bus.publish("Error", &[json!("ignored")]);
        bus.publish("Warn", &[json!("seen")]);

        assert_eq!(*log.lock().unwrap(), vec!["warn:1"]);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let after = make("after");
        bus.subscribe("Error", |_| panic!("subscriber failure"));
        bus.subscribe("Error", move |p| after(p));

        bus.publish("Error", &[json!("boom")]);

        assert_eq!(*log.lock().unwrap(), vec!["after:1"]);
    }

    #[test]
    fn test_unsubscribe_single_handle() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let a = make("a");
        let b = make("b");
        let first = bus.subscribe("Debug", move |p| a(p));
        bus.subscribe("Debug", move |p| b(p));

        assert!(bus.unsubscribe(&first));
        assert!(!bus.unsubscribe(&first));
        bus.publish("Debug", &[]);

        assert_eq!(*log.lock().unwrap(), vec!["b:0"]);
        assert_eq!(first.event(), "Debug");
    }

    #[test]
    fn test_unsubscribe_all_and_clear() {
        let bus = EventBus::new();
        bus.subscribe("Info", |_| {});
        bus.subscribe("Info", |_| {});
        bus.subscribe("Warn", |_| {});

        bus.unsubscribe_all("Info");
        assert_eq!(bus.subscriber_count("Info"), 0);
        assert_eq!(bus.subscriber_count("Warn"), 1);

        bus.clear();
        assert_eq!(bus.subscriber_count("Warn"), 0);
    }

    #[test]
    fn test_reentrant_subscribe_applies_to_next_publish() {
        let bus = Arc::new(EventBus::new());
        let hits = Arc::new(Mutex::new(0));
        let inner_bus = Arc::clone(&bus);
        let inner_hits = Arc::clone(&hits);
        bus.subscribe("Info", move |_| {
            let hits = Arc::clone(&inner_hits);
            inner_bus.subscribe("Info", move |_| *hits.lock().unwrap() += 1);
        });

        bus.publish("Info", &[]);
        assert_eq!(*hits.lock().unwrap(), 0);
        bus.publish("Info", &[]);
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_global_bus_is_singleton() {
        let a = global_bus();
        let b = global_bus();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
