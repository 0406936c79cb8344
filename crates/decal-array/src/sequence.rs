#![forbid(unsafe_code)]

//! Observable sequence with lifecycle events and item event relaying.
//!
//! # Design
//!
//! [`ObservableSequence<T>`] is a handle to shared state (`Rc<..>`): the
//! backing `Vec<T>`, an [`EventHub`] for the sequence's own events and the
//! item relay table. Cloning a handle does not copy the elements; both
//! handles observe and mutate the same sequence.
//!
//! Every structural mutation funnels through two hooks:
//!
//! - `on_inserted(items)`: attach relay listeners for the whole batch, then
//!   emit one `add` per element.
//! - `on_removed(item)`: detach relay listeners, then emit `remove`.
//!
//! Relay bookkeeping for a batch completes before the first event, so a
//! listener which removes (or re-inserts) any element of the batch leaves
//! the relay table consistent.
//!
//! # Events
//!
//! | Event          | Payload                                   |
//! |----------------|-------------------------------------------|
//! | `add`          | [`SequenceEvent::Add`] with the element    |
//! | `remove`       | [`SequenceEvent::Remove`] with the element |
//! | `destroy`      | [`SequenceEvent::Destroy`]                 |
//! | `item.<name>`  | [`SequenceEvent::Item`] with element and the element's arguments |
//!
//! Subscribing to `item.<name>` activates the relay for `<name>`: every
//! listenable element gets a listener that re-emits its `<name>` events on
//! the sequence. Elements inserted later are attached too.
//!
//! # Failure Modes
//!
//! - **Re-entrant borrow in callbacks**: the closures passed to
//!   [`with`](ObservableSequence::with), [`sort_by`](ObservableSequence::sort_by)
//!   and [`sort_by_key`](ObservableSequence::sort_by_key) run while the
//!   storage is borrowed; mutating the sequence from inside them panics.
//!   Event listeners carry no such restriction.
//! - **Reference cycles**: a listener that captures a strong handle to its
//!   own sequence keeps it alive until [`destroy`](ObservableSequence::destroy)
//!   removes all listeners. Capture a [`WeakSequence`] instead.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::rc::{Rc, Weak};

use decal_core::{EventHub, Listener, ListenerId, Value, path};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{RelayPolicy, SequenceConfig};
use crate::element::Element;
use crate::error::SequenceError;
use crate::relay::ItemEventRelay;

/// Name of the event fired for each inserted element.
pub const ADD: &str = "add";
/// Name of the event fired for each removed element.
pub const REMOVE: &str = "remove";
/// Name of the event fired when the sequence is destroyed.
pub const DESTROY: &str = "destroy";

/// Payload delivered to sequence listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceEvent<T> {
    /// An element was inserted.
    Add(T),
    /// An element was removed.
    Remove(T),
    /// The sequence is being destroyed.
    Destroy,
    /// A contained element emitted a relayed event.
    Item { item: T, args: Vec<Value> },
}

impl<T> SequenceEvent<T> {
    /// The element this event is about, if any.
    #[must_use]
    pub fn item(&self) -> Option<&T> {
        match self {
            Self::Add(item) | Self::Remove(item) | Self::Item { item, .. } => Some(item),
            Self::Destroy => None,
        }
    }

    /// Arguments of a relayed element event (empty for other events).
    #[must_use]
    pub fn args(&self) -> &[Value] {
        match self {
            Self::Item { args, .. } => args.as_slice(),
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Live,
    Destroying,
    Destroyed,
}

struct Shared<T: Element> {
    items: RefCell<Vec<T>>,
    hub: EventHub<SequenceEvent<T>>,
    relay: RefCell<ItemEventRelay<T>>,
    config: SequenceConfig,
    lifecycle: Cell<Lifecycle>,
}

impl<T: Element> Drop for Shared<T> {
    fn drop(&mut self) {
        // Elements outlive the sequence; they must not keep relay listeners.
        let detached = self.relay.get_mut().clear();
        if detached > 0 {
            debug!(detached, "sequence dropped, relay listeners detached");
        }
    }
}

/// A shared, observable sequence of elements.
///
/// See the [module documentation](self) for the event model.
pub struct ObservableSequence<T: Element> {
    shared: Rc<Shared<T>>,
}

impl<T: Element> Clone for ObservableSequence<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for ObservableSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableSequence")
            .field("items", &*self.shared.items.borrow())
            .field("event_names", &self.shared.hub.event_names())
            .field("active_relays", &self.shared.relay.borrow().names())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

impl<T: Element> Default for ObservableSequence<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Element> FromIterator<T> for ObservableSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T: Element> Extend<T> for ObservableSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push(iter);
    }
}

/// Iterates over a snapshot taken when iteration starts, so the sequence may
/// be mutated while iterating.
impl<T: Element> IntoIterator for &ObservableSequence<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.to_vec().into_iter()
    }
}

/// Non-owning handle to an [`ObservableSequence`].
pub struct WeakSequence<T: Element> {
    shared: Weak<Shared<T>>,
}

impl<T: Element> Clone for WeakSequence<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T: Element> fmt::Debug for WeakSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSequence")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl<T: Element> WeakSequence<T> {
    /// Get a strong handle if the sequence is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ObservableSequence<T>> {
        self.shared
            .upgrade()
            .map(|shared| ObservableSequence { shared })
    }
}

impl<T: Element> ObservableSequence<T> {
    /// Create a sequence holding `items`, with the default configuration.
    ///
    /// Initial elements are present from the start: no `add` is emitted
    /// for them.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self::with_config(SequenceConfig::default(), items)
    }

    /// Create a sequence holding `items` with a custom configuration.
    #[must_use]
    pub fn with_config(config: SequenceConfig, items: impl IntoIterator<Item = T>) -> Self {
        let items: Vec<T> = items.into_iter().collect();
        let sequence = Self {
            shared: Rc::new(Shared {
                items: RefCell::new(items.clone()),
                hub: EventHub::with_max_listeners(config.max_listeners),
                relay: RefCell::new(ItemEventRelay::new()),
                config,
                lifecycle: Cell::new(Lifecycle::Live),
            }),
        };
        sequence.attach_relays(&items);
        sequence
    }

    /// Create a non-owning handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakSequence<T> {
        WeakSequence {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Whether both handles refer to the same sequence.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Configuration this sequence was created with.
    #[must_use]
    pub fn config(&self) -> &SequenceConfig {
        &self.shared.config
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.items.borrow().len()
    }

    /// Whether the sequence has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.items.borrow().is_empty()
    }

    /// Element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.shared.items.borrow().get(index).cloned()
    }

    /// First element.
    #[must_use]
    pub fn first(&self) -> Option<T> {
        self.shared.items.borrow().first().cloned()
    }

    /// Last element.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.shared.items.borrow().last().cloned()
    }

    /// Index of the first occurrence of `item`, by identity.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.shared
            .items
            .borrow()
            .iter()
            .position(|candidate| candidate.same_as(item))
    }

    /// Whether `item` occurs in the sequence, by identity.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Plain snapshot of the current elements, in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.shared.items.borrow().clone()
    }

    /// Access the elements by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if `f` mutates this sequence.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.shared.items.borrow())
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Insert `item` at `index`, shifting later elements right.
    ///
    /// # Errors
    ///
    /// [`SequenceError::IndexOutOfBounds`] if `index > len`,
    /// [`SequenceError::Destroyed`] after [`destroy`](Self::destroy).
    pub fn insert_at(&self, index: usize, item: T) -> Result<(), SequenceError> {
        if self.is_destroyed() {
            return Err(SequenceError::Destroyed);
        }
        let len = self.len();
        if index > len {
            return Err(SequenceError::IndexOutOfBounds { index, len });
        }
        self.splice(index, Some(0), [item]);
        Ok(())
    }

    /// Append `items` in order. Returns the new length.
    pub fn push(&self, items: impl IntoIterator<Item = T>) -> usize {
        let added: Vec<T> = items.into_iter().collect();
        if !self.is_live("push") {
            return self.len();
        }
        let len = {
            let mut storage = self.shared.items.borrow_mut();
            storage.extend(added.iter().cloned());
            storage.len()
        };
        self.on_inserted(&added);
        len
    }

    /// Prepend `items`, keeping their order. Returns the new length.
    pub fn unshift(&self, items: impl IntoIterator<Item = T>) -> usize {
        let added: Vec<T> = items.into_iter().collect();
        if !self.is_live("unshift") {
            return self.len();
        }
        let len = {
            let mut storage = self.shared.items.borrow_mut();
            storage.splice(0..0, added.iter().cloned());
            storage.len()
        };
        self.on_inserted(&added);
        len
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove and return the last element.
    pub fn pop(&self) -> Option<T> {
        if !self.is_live("pop") {
            return None;
        }
        let item = self.shared.items.borrow_mut().pop()?;
        self.on_removed(&item);
        Some(item)
    }

    /// Remove and return the first element.
    pub fn shift(&self) -> Option<T> {
        if !self.is_live("shift") {
            return None;
        }
        let item = {
            let mut storage = self.shared.items.borrow_mut();
            if storage.is_empty() {
                return None;
            }
            storage.remove(0)
        };
        self.on_removed(&item);
        Some(item)
    }

    /// Remove the first occurrence of `item`. Returns its former index, or
    /// `None` if it is absent (nothing is emitted then).
    pub fn remove(&self, item: &T) -> Option<usize> {
        let index = self.index_of(item)?;
        self.remove_at(index);
        Some(index)
    }

    /// Remove the element at `index`. Returns the removed elements: one, or
    /// none when `index` is out of range.
    pub fn remove_at(&self, index: usize) -> Vec<T> {
        if index >= self.len() {
            return Vec::new();
        }
        self.splice(index, Some(1), std::iter::empty())
    }

    /// Remove every element.
    pub fn empty(&self) {
        self.splice(0, None, std::iter::empty());
    }

    // ========================================================================
    // Replacement
    // ========================================================================

    /// Replace the first occurrence of `old` with `new`. Returns the index,
    /// or `None` if `old` is absent (nothing is inserted then).
    pub fn replace(&self, old: &T, new: T) -> Option<usize> {
        let index = self.index_of(old)?;
        self.replace_at(index, new).ok().map(|()| index)
    }

    /// Replace the element at `index`, emitting `remove` then `add`.
    ///
    /// # Errors
    ///
    /// [`SequenceError::IndexOutOfBounds`] if `index >= len`,
    /// [`SequenceError::Destroyed`] after [`destroy`](Self::destroy).
    pub fn replace_at(&self, index: usize, item: T) -> Result<(), SequenceError> {
        if self.is_destroyed() {
            return Err(SequenceError::Destroyed);
        }
        let len = self.len();
        if index >= len {
            return Err(SequenceError::IndexOutOfBounds { index, len });
        }
        self.remove_at(index);
        self.splice(index, Some(0), [item]);
        Ok(())
    }

    /// Empty the sequence, then append `items`.
    pub fn replace_with(&self, items: impl IntoIterator<Item = T>) {
        self.empty();
        self.push(items);
    }

    /// Remove `delete_count` elements from `start` (all remaining when
    /// `None`), then insert `items` at `start`. Returns the removed elements.
    ///
    /// `start` is clamped to the length and `delete_count` to the number of
    /// elements available. One `remove` is emitted per removed element, in
    /// order, before any `add` for the inserted ones.
    pub fn splice(
        &self,
        start: usize,
        delete_count: Option<usize>,
        items: impl IntoIterator<Item = T>,
    ) -> Vec<T> {
        let added: Vec<T> = items.into_iter().collect();
        if !self.is_live("splice") {
            return Vec::new();
        }
        self.splice_unchecked(start, delete_count, added)
    }

    fn splice_unchecked(&self, start: usize, delete_count: Option<usize>, added: Vec<T>) -> Vec<T> {
        let (start, removed) = {
            let mut storage = self.shared.items.borrow_mut();
            let start = start.min(storage.len());
            let available = storage.len() - start;
            let count = delete_count.map_or(available, |n| n.min(available));
            let removed: Vec<T> = storage.drain(start..start + count).collect();
            (start, removed)
        };
        for item in &removed {
            self.on_removed(item);
        }

        if added.is_empty() || self.is_destroyed() {
            return removed;
        }
        {
            let mut storage = self.shared.items.borrow_mut();
            // `remove` listeners may have shrunk the sequence.
            let at = start.min(storage.len());
            storage.splice(at..at, added.iter().cloned());
        }
        self.on_inserted(&added);
        removed
    }

    // ========================================================================
    // Derived sequences
    // ========================================================================

    /// New sequence with this sequence's elements followed by `items`.
    ///
    /// Emits nothing on `self`. The new sequence shares this one's
    /// configuration but none of its listeners.
    /// Another sequence can be passed by reference to append its elements.
    #[must_use]
    pub fn concat(&self, items: impl IntoIterator<Item = T>) -> Self {
        let mut all = self.to_vec();
        all.extend(items);
        Self::with_config(self.shared.config.clone(), all)
    }

    // ========================================================================
    // Reordering
    // ========================================================================

    /// Reverse the order of the elements. Membership is unchanged, so no
    /// `add`/`remove` is emitted.
    pub fn reverse(&self) {
        if self.is_live("reverse") {
            self.shared.items.borrow_mut().reverse();
        }
    }

    /// Stable sort with a comparator. Emits nothing.
    ///
    /// # Panics
    ///
    /// Panics if `compare` mutates this sequence.
    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> Ordering) {
        if self.is_live("sort_by") {
            self.shared.items.borrow_mut().sort_by(compare);
        }
    }

    /// Stable sort by a key. Emits nothing.
    ///
    /// # Panics
    ///
    /// Panics if `key` mutates this sequence.
    pub fn sort_by_key<K: Ord>(&self, key: impl FnMut(&T) -> K) {
        if self.is_live("sort_by_key") {
            self.shared.items.borrow_mut().sort_by_key(key);
        }
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Append a listener for `event`. Subscribing to `item.<name>` activates
    /// the relay for `<name>`.
    ///
    /// Once [`destroy`](Self::destroy) has started, listeners are still
    /// registered (and reachable through [`emit`](Self::emit)) but no relay is
    /// activated. Listeners added from inside `destroy` are dropped with the
    /// rest when it finishes.
    pub fn add_listener(
        &self,
        event: &str,
        listener: impl Fn(&SequenceEvent<T>) + 'static,
    ) -> ListenerId {
        self.activate_relay(event);
        self.shared.hub.add_listener(event, listener)
    }

    /// Alias for [`add_listener`](Self::add_listener).
    pub fn on(&self, event: &str, listener: impl Fn(&SequenceEvent<T>) + 'static) -> ListenerId {
        self.add_listener(event, listener)
    }

    /// Add a listener at the front of the list for `event`.
    pub fn prepend_listener(
        &self,
        event: &str,
        listener: impl Fn(&SequenceEvent<T>) + 'static,
    ) -> ListenerId {
        self.activate_relay(event);
        self.shared.hub.prepend_listener(event, listener)
    }

    /// Append a listener removed before its first invocation.
    pub fn once(&self, event: &str, listener: impl Fn(&SequenceEvent<T>) + 'static) -> ListenerId {
        self.activate_relay(event);
        self.shared.hub.once(event, listener)
    }

    /// Prepend a listener removed before its first invocation.
    pub fn prepend_once_listener(
        &self,
        event: &str,
        listener: impl Fn(&SequenceEvent<T>) + 'static,
    ) -> ListenerId {
        self.activate_relay(event);
        self.shared.hub.prepend_once_listener(event, listener)
    }

    /// Remove listener `id` from `event`. Returns whether it was registered.
    ///
    /// For `item.<name>` the relay is deactivated according to the
    /// configured [`RelayPolicy`].
    pub fn remove_listener(&self, event: &str, id: ListenerId) -> bool {
        let removed = self.shared.hub.remove_listener(event, id);
        if let Some(name) = self.shared.config.relay_name(event) {
            let deactivate = match self.shared.config.relay_policy {
                RelayPolicy::OnLastListener => self.shared.hub.listener_count(event) == 0,
                RelayPolicy::OnAnyRemoval => true,
            };
            if deactivate {
                self.deactivate_relay(name);
            }
        }
        removed
    }

    /// Alias for [`remove_listener`](Self::remove_listener).
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.remove_listener(event, id)
    }

    /// Remove every listener of `event`, or of every event when `None`.
    /// Affected relays are deactivated.
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        self.shared.hub.remove_all_listeners(event);
        match event {
            Some(event) => {
                if let Some(name) = self.shared.config.relay_name(event) {
                    self.deactivate_relay(name);
                }
            }
            None => {
                let detached = self.shared.relay.borrow_mut().clear();
                if detached > 0 {
                    debug!(detached, "all item event relays deactivated");
                }
            }
        }
    }

    /// Emit `event` on this sequence. Returns whether it had listeners.
    pub fn emit(&self, event: &str, payload: &SequenceEvent<T>) -> bool {
        self.dispatch(event, payload)
    }

    /// Number of listeners for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.shared.hub.listener_count(event)
    }

    /// Ids of the listeners for `event`, in invocation order.
    #[must_use]
    pub fn listeners(&self, event: &str) -> Vec<ListenerId> {
        self.shared.hub.listeners(event)
    }

    /// Names of events with at least one listener.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.shared.hub.event_names()
    }

    /// Leak-warning threshold of this sequence's hub.
    #[must_use]
    pub fn max_listeners(&self) -> usize {
        self.shared.hub.max_listeners()
    }

    /// Set the leak-warning threshold (0 = unlimited).
    pub fn set_max_listeners(&self, max_listeners: usize) {
        self.shared.hub.set_max_listeners(max_listeners);
    }

    /// Relay names currently active, in activation order.
    #[must_use]
    pub fn active_relays(&self) -> Vec<String> {
        self.shared.relay.borrow().names()
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Emit `destroy`, remove every element (emitting `remove` for each),
    /// then drop all listeners and relays.
    ///
    /// Afterwards mutations are ignored (index-addressed ones return
    /// [`SequenceError::Destroyed`]). Calling `destroy` again is a no-op.
    pub fn destroy(&self) {
        if self.shared.lifecycle.get() != Lifecycle::Live {
            return;
        }
        self.shared.lifecycle.set(Lifecycle::Destroying);
        self.dispatch(DESTROY, &SequenceEvent::Destroy);
        let removed = self.splice_unchecked(0, None, Vec::new());
        self.shared.hub.remove_all_listeners(None);
        let detached = self.shared.relay.borrow_mut().clear();
        self.shared.lifecycle.set(Lifecycle::Destroyed);
        debug!(removed = removed.len(), detached, "sequence destroyed");
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.shared.lifecycle.get() != Lifecycle::Live
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    fn on_inserted(&self, items: &[T]) {
        self.attach_relays(items);
        for item in items {
            self.dispatch(ADD, &SequenceEvent::Add(item.clone()));
        }
    }

    fn attach_relays(&self, items: &[T]) {
        let mut relay = self.shared.relay.borrow_mut();
        for item in items {
            relay.attach(item, &|name: &str, item: &T| self.relay_listener(name, item));
        }
    }

    fn on_removed(&self, item: &T) {
        self.shared.relay.borrow_mut().detach(item);
        self.dispatch(REMOVE, &SequenceEvent::Remove(item.clone()));
    }

    fn dispatch(&self, event: &str, payload: &SequenceEvent<T>) -> bool {
        let delivered = self.shared.hub.emit(event, payload);
        // The last listener of a relay event may have been a `once`.
        if delivered && self.shared.hub.listener_count(event) == 0 {
            if let Some(name) = self.shared.config.relay_name(event) {
                self.deactivate_relay(name);
            }
        }
        delivered
    }

    fn activate_relay(&self, event: &str) {
        let Some(name) = self.shared.config.relay_name(event) else {
            return;
        };
        if self.is_destroyed() {
            warn!(relay = name, "relay not activated on a destroyed sequence");
            return;
        }
        let items = self.shared.items.borrow();
        let attached = self.shared.relay.borrow_mut().activate(
            name,
            items.as_slice(),
            &|name: &str, item: &T| self.relay_listener(name, item),
        );
        if let Some(attached) = attached {
            debug!(relay = name, attached, "item event relay activated");
        }
    }

    fn deactivate_relay(&self, name: &str) {
        let detached = self.shared.relay.borrow_mut().deactivate(name);
        if let Some(detached) = detached {
            debug!(relay = name, detached, "item event relay deactivated");
        }
    }

    /// Listener attached to `item` for relay `name`.
    fn relay_listener(&self, name: &str, item: &T) -> Listener<[Value]> {
        let sequence = Rc::downgrade(&self.shared);
        let event = self.shared.config.relay_event(name);
        let item = item.clone();
        Rc::new(move |args: &[Value]| {
            if let Some(shared) = sequence.upgrade() {
                ObservableSequence { shared }.dispatch(
                    &event,
                    &SequenceEvent::Item {
                        item: item.clone(),
                        args: args.to_vec(),
                    },
                );
            }
        })
    }

    fn is_live(&self, operation: &'static str) -> bool {
        if self.is_destroyed() {
            warn!(operation, "mutation on a destroyed sequence ignored");
            return false;
        }
        true
    }
}

impl<T: Element + Ord> ObservableSequence<T> {
    /// Stable sort in ascending order. Emits nothing.
    pub fn sort(&self) {
        self.sort_by(Ord::cmp);
    }
}

impl<T: Element + Serialize> ObservableSequence<T> {
    /// First element whose value at key path `key` equals `value`.
    pub fn find_by<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> Option<T> {
        let expected = serde_json::to_value(value).ok()?;
        self.to_vec()
            .into_iter()
            .find(|item| key_matches(item, key, &expected))
    }

    /// Every element whose value at key path `key` equals `value`.
    pub fn filter_by<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> Vec<T> {
        let Ok(expected) = serde_json::to_value(value) else {
            return Vec::new();
        };
        self.to_vec()
            .into_iter()
            .filter(|item| key_matches(item, key, &expected))
            .collect()
    }
}

fn key_matches<T: Serialize>(item: &T, key: &str, expected: &Value) -> bool {
    path::lookup(item, key).is_some_and(|found| path::values_equal(&found, expected))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
