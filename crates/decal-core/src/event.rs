#![forbid(unsafe_code)]

//! Named-event hub with synchronous, re-entrant dispatch.
//!
//! # Design
//!
//! [`EventHub<P>`] maps event names to ordered listener lists. Every listener
//! receives the payload by reference (`&P`). The hub uses interior mutability
//! so all operations take `&self`: a listener may register or remove
//! listeners, or emit further events, while a dispatch is in progress.
//!
//! # Dispatch
//!
//! `emit()` snapshots the listener list for the event before invoking any
//! callback, and never holds a `RefCell` borrow across a callback. As a
//! consequence:
//!
//! - A listener added during a dispatch is first called on the next `emit()`.
//! - A listener removed during a dispatch is still called for the dispatch
//!   that was already in progress.
//! - `once` listeners are removed from the list before they are invoked.
//!
//! # Invariants
//!
//! 1. Listeners for one event are invoked in list order (registration order,
//!    except for prepended listeners).
//! 2. An event name with no listeners does not appear in [`EventHub::event_names`].
//! 3. Listener ids are unique within a hub and never reused.
//!
//! # Failure Modes
//!
//! - **Listener leak**: registering more than `max_listeners` listeners for
//!   one event logs a `warn!` once per event name. Nothing is rejected.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

/// Default per-event listener threshold before a leak warning is logged.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// A listener callback shared between the hub and dispatch snapshots.
pub type Listener<P> = Rc<dyn Fn(&P)>;

/// Handle identifying one registered listener.
///
/// Closures cannot be compared, so removal goes through the id returned at
/// registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw numeric value of the id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

struct Entry<P: ?Sized> {
    id: ListenerId,
    once: bool,
    callback: Listener<P>,
}

struct HubInner<P: ?Sized> {
    /// Listener lists in first-registration order of their event names.
    events: Vec<(String, Vec<Entry<P>>)>,
    next_id: u64,
    max_listeners: usize,
    /// Event names that already triggered the leak warning.
    warned: HashSet<String>,
}

impl<P: ?Sized> HubInner<P> {
    fn position(&self, event: &str) -> Option<usize> {
        self.events.iter().position(|(name, _)| name == event)
    }

    fn list(&self, event: &str) -> Option<&Vec<Entry<P>>> {
        self.events
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, list)| list)
    }

    fn list_mut(&mut self, event: &str) -> &mut Vec<Entry<P>> {
        let pos = match self.position(event) {
            Some(pos) => pos,
            None => {
                self.events.push((event.to_owned(), Vec::new()));
                self.events.len() - 1
            }
        };
        &mut self.events[pos].1
    }
}

/// A publish/subscribe hub keyed by event name.
///
/// Not shared across owners: each container creates its own hub.
pub struct EventHub<P: ?Sized> {
    inner: RefCell<HubInner<P>>,
}

impl<P: ?Sized> fmt::Debug for EventHub<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let names: Vec<&str> = inner.events.iter().map(|(name, _)| name.as_str()).collect();
        let total: usize = inner.events.iter().map(|(_, list)| list.len()).sum();
        f.debug_struct("EventHub")
            .field("event_names", &names)
            .field("listener_count", &total)
            .field("max_listeners", &inner.max_listeners)
            .finish()
    }
}

impl<P: ?Sized + 'static> Default for EventHub<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized + 'static> EventHub<P> {
    /// Create an empty hub with [`DEFAULT_MAX_LISTENERS`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_listeners(DEFAULT_MAX_LISTENERS)
    }

    /// Create an empty hub with a custom leak threshold (0 = unlimited).
    #[must_use]
    pub fn with_max_listeners(max_listeners: usize) -> Self {
        Self {
            inner: RefCell::new(HubInner {
                events: Vec::new(),
                next_id: 0,
                max_listeners,
                warned: HashSet::new(),
            }),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Append a listener for `event`.
    pub fn add_listener(&self, event: &str, listener: impl Fn(&P) + 'static) -> ListenerId {
        self.insert(event, Rc::new(listener), false, false)
    }

    /// Alias for [`add_listener`](Self::add_listener).
    pub fn on(&self, event: &str, listener: impl Fn(&P) + 'static) -> ListenerId {
        self.add_listener(event, listener)
    }

    /// Add a listener at the front of the list for `event`.
    pub fn prepend_listener(&self, event: &str, listener: impl Fn(&P) + 'static) -> ListenerId {
        self.insert(event, Rc::new(listener), false, true)
    }

    /// Append a listener that is removed right before its first invocation.
    pub fn once(&self, event: &str, listener: impl Fn(&P) + 'static) -> ListenerId {
        self.insert(event, Rc::new(listener), true, false)
    }

    /// Prepend a listener that is removed right before its first invocation.
    pub fn prepend_once_listener(
        &self,
        event: &str,
        listener: impl Fn(&P) + 'static,
    ) -> ListenerId {
        self.insert(event, Rc::new(listener), true, true)
    }

    /// Append an already shared listener.
    pub fn add_shared_listener(&self, event: &str, listener: Listener<P>) -> ListenerId {
        self.insert(event, listener, false, false)
    }

    fn insert(&self, event: &str, callback: Listener<P>, once: bool, prepend: bool) -> ListenerId {
        let inner = &mut *self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        let entry = Entry { id, once, callback };

        let list = inner.list_mut(event);
        if prepend {
            list.insert(0, entry);
        } else {
            list.push(entry);
        }
        let count = list.len();

        let max = inner.max_listeners;
        if max > 0 && count > max && inner.warned.insert(event.to_owned()) {
            warn!(
                event,
                count,
                max_listeners = max,
                "possible listener leak: listener count exceeds max_listeners"
            );
        }
        id
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove the listener `id` from `event`. Returns whether it was found.
    pub fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(pos) = inner.position(event) else {
            return false;
        };
        let list = &mut inner.events[pos].1;
        let before = list.len();
        list.retain(|entry| entry.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            inner.events.remove(pos);
        }
        removed
    }

    /// Alias for [`remove_listener`](Self::remove_listener).
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.remove_listener(event, id)
    }

    /// Remove every listener of `event`, or of every event when `None`.
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        let mut inner = self.inner.borrow_mut();
        match event {
            Some(event) => {
                if let Some(pos) = inner.position(event) {
                    inner.events.remove(pos);
                }
            }
            None => inner.events.clear(),
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Invoke every listener of `event` with `payload`.
    ///
    /// Returns `true` if the event had listeners.
    pub fn emit(&self, event: &str, payload: &P) -> bool {
        let callbacks: Vec<Listener<P>> = {
            let mut inner = self.inner.borrow_mut();
            let Some(pos) = inner.position(event) else {
                return false;
            };
            let list = &mut inner.events[pos].1;
            let snapshot = list.iter().map(|entry| Rc::clone(&entry.callback)).collect();
            list.retain(|entry| !entry.once);
            if list.is_empty() {
                inner.events.remove(pos);
            }
            snapshot
        };

        trace!(event, listeners = callbacks.len(), "emit");
        for callback in &callbacks {
            callback(payload);
        }
        !callbacks.is_empty()
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of listeners currently registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner.borrow().list(event).map_or(0, Vec::len)
    }

    /// Ids of the listeners registered for `event`, in invocation order.
    #[must_use]
    pub fn listeners(&self, event: &str) -> Vec<ListenerId> {
        self.inner
            .borrow()
            .list(event)
            .map(|list| list.iter().map(|entry| entry.id).collect())
            .unwrap_or_default()
    }

    /// Names of events with at least one listener.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .events
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Current leak-warning threshold (0 = unlimited).
    #[must_use]
    pub fn max_listeners(&self) -> usize {
        self.inner.borrow().max_listeners
    }

    /// Set the leak-warning threshold (0 = unlimited).
    pub fn set_max_listeners(&self, max_listeners: usize) {
        self.inner.borrow_mut().max_listeners = max_listeners;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0u32));
        (Rc::clone(&count), count)
    }

    #[test]
    fn emit_reaches_listener() {
        let hub: EventHub<i32> = EventHub::new();
        let seen = Rc::new(Cell::new(0));
        let seen_clone = Rc::clone(&seen);

        hub.on("value", move |v| seen_clone.set(*v));
        assert!(hub.emit("value", &42));
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn emit_without_listeners_returns_false() {
        let hub: EventHub<i32> = EventHub::new();
        assert!(!hub.emit("nothing", &1));
    }

    #[test]
    fn events_are_isolated_by_name() {
        let hub: EventHub<()> = EventHub::new();
        let (count, count_clone) = counter();
        hub.on("a", move |_| count_clone.set(count_clone.get() + 1));

        hub.emit("b", &());
        assert_eq!(count.get(), 0);
        hub.emit("a", &());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn invocation_order_is_registration_order() {
        let hub: EventHub<()> = EventHub::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log1 = Rc::clone(&log);
        hub.on("e", move |_| log1.borrow_mut().push('A'));
        let log2 = Rc::clone(&log);
        hub.on("e", move |_| log2.borrow_mut().push('B'));
        let log3 = Rc::clone(&log);
        hub.prepend_listener("e", move |_| log3.borrow_mut().push('C'));

        hub.emit("e", &());
        assert_eq!(*log.borrow(), vec!['C', 'A', 'B']);
    }

    #[test]
    fn off_removes_only_that_listener() {
        let hub: EventHub<()> = EventHub::new();
        let (a, a_clone) = counter();
        let (b, b_clone) = counter();

        let id_a = hub.on("e", move |_| a_clone.set(a_clone.get() + 1));
        hub.on("e", move |_| b_clone.set(b_clone.get() + 1));

        assert!(hub.off("e", id_a));
        assert!(!hub.off("e", id_a));
        hub.emit("e", &());
        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 1);
    }

    #[test]
    fn off_with_wrong_event_is_noop() {
        let hub: EventHub<()> = EventHub::new();
        let id = hub.on("e", |_| {});
        assert!(!hub.off("other", id));
        assert_eq!(hub.listener_count("e"), 1);
    }

    #[test]
    fn once_fires_a_single_time() {
        let hub: EventHub<()> = EventHub::new();
        let (count, count_clone) = counter();
        hub.once("e", move |_| count_clone.set(count_clone.get() + 1));

        assert_eq!(hub.listener_count("e"), 1);
        assert!(hub.emit("e", &()));
        assert!(!hub.emit("e", &()));
        assert_eq!(count.get(), 1);
        assert_eq!(hub.listener_count("e"), 0);
    }

    #[test]
    fn prepend_once_runs_first_then_disappears() {
        let hub: EventHub<()> = EventHub::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log1 = Rc::clone(&log);
        hub.on("e", move |_| log1.borrow_mut().push("regular"));
        let log2 = Rc::clone(&log);
        hub.prepend_once_listener("e", move |_| log2.borrow_mut().push("once"));

        hub.emit("e", &());
        hub.emit("e", &());
        assert_eq!(*log.borrow(), vec!["once", "regular", "regular"]);
    }

    #[test]
    fn listener_removed_mid_dispatch_still_runs_this_round() {
        let hub = Rc::new(EventHub::<()>::new());
        let (b, b_clone) = counter();
        let victim = Rc::new(Cell::new(None::<ListenerId>));

        let hub_clone = Rc::clone(&hub);
        let victim_clone = Rc::clone(&victim);
        hub.on("e", move |_| {
            if let Some(id) = victim_clone.get() {
                hub_clone.off("e", id);
            }
        });
        victim.set(Some(hub.on("e", move |_| b_clone.set(b_clone.get() + 1))));

        hub.emit("e", &());
        assert_eq!(b.get(), 1);
        hub.emit("e", &());
        assert_eq!(b.get(), 1);
    }

    #[test]
    fn listener_added_mid_dispatch_runs_next_round() {
        let hub = Rc::new(EventHub::<()>::new());
        let (count, count_clone) = counter();

        let hub_clone = Rc::clone(&hub);
        hub.once("e", move |_| {
            let count_inner = Rc::clone(&count_clone);
            hub_clone.on("e", move |_| count_inner.set(count_inner.get() + 1));
        });

        hub.emit("e", &());
        assert_eq!(count.get(), 0);
        hub.emit("e", &());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn reentrant_emit_is_allowed() {
        let hub = Rc::new(EventHub::<u32>::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let hub_clone = Rc::clone(&hub);
        let log_clone = Rc::clone(&log);
        hub.on("e", move |depth| {
            log_clone.borrow_mut().push(*depth);
            if *depth < 3 {
                hub_clone.emit("e", &(depth + 1));
            }
        });

        hub.emit("e", &0);
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn event_names_track_live_events() {
        let hub: EventHub<()> = EventHub::new();
        let a = hub.on("a", |_| {});
        hub.on("b", |_| {});
        assert_eq!(hub.event_names(), vec!["a".to_string(), "b".to_string()]);

        hub.off("a", a);
        assert_eq!(hub.event_names(), vec!["b".to_string()]);
    }

    #[test]
    fn remove_all_listeners_scoped_and_global() {
        let hub: EventHub<()> = EventHub::new();
        hub.on("a", |_| {});
        hub.on("a", |_| {});
        hub.on("b", |_| {});

        hub.remove_all_listeners(Some("a"));
        assert_eq!(hub.listener_count("a"), 0);
        assert_eq!(hub.listener_count("b"), 1);

        hub.remove_all_listeners(None);
        assert!(hub.event_names().is_empty());
    }

    #[test]
    fn listeners_reports_ids_in_order() {
        let hub: EventHub<()> = EventHub::new();
        let first = hub.on("e", |_| {});
        let second = hub.on("e", |_| {});
        let front = hub.prepend_listener("e", |_| {});
        assert_eq!(hub.listeners("e"), vec![front, first, second]);
        assert!(hub.listeners("missing").is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let hub: EventHub<()> = EventHub::new();
        let a = hub.on("x", |_| {});
        let b = hub.on("y", |_| {});
        let c = hub.once("x", |_| {});
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(a.get() < b.get() && b.get() < c.get());
    }

    #[test]
    fn exceeding_max_listeners_does_not_reject() {
        let hub: EventHub<()> = EventHub::with_max_listeners(2);
        for _ in 0..5 {
            hub.on("e", |_| {});
        }
        assert_eq!(hub.listener_count("e"), 5);
        assert_eq!(hub.max_listeners(), 2);

        hub.set_max_listeners(0);
        assert_eq!(hub.max_listeners(), 0);
    }

    #[test]
    fn unsized_payload() {
        let hub: EventHub<[i32]> = EventHub::new();
        let sum = Rc::new(Cell::new(0));
        let sum_clone = Rc::clone(&sum);
        hub.on("sum", move |values: &[i32]| sum_clone.set(values.iter().sum()));

        hub.emit("sum", &[1, 2, 3]);
        assert_eq!(sum.get(), 6);
    }

    #[test]
    fn debug_format() {
        let hub: EventHub<()> = EventHub::new();
        hub.on("ready", |_| {});
        let dbg = format!("{hub:?}");
        assert!(dbg.contains("EventHub"));
        assert!(dbg.contains("ready"));
    }
}
