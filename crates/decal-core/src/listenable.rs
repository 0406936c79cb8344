#![forbid(unsafe_code)]

//! The optional listener capability of contained elements.
//!
//! A container never inspects an element's type to decide whether it can
//! listen to it. Elements that want their events relayed expose a
//! [`Listenable`] trait object; all others are skipped silently.

use crate::event::{EventHub, Listener, ListenerId};
use serde_json::Value;

/// Hub type for element events: arguments travel as a slice of JSON values.
pub type Emitter = EventHub<[Value]>;

/// Subscribe/unsubscribe pair an element exposes to have its events relayed.
pub trait Listenable {
    /// Attach `listener` to `event`, returning the id needed to detach it.
    fn subscribe(&self, event: &str, listener: Listener<[Value]>) -> ListenerId;

    /// Detach the listener `id` from `event`. Returns whether it was attached.
    fn unsubscribe(&self, event: &str, id: ListenerId) -> bool;
}

impl Listenable for Emitter {
    fn subscribe(&self, event: &str, listener: Listener<[Value]>) -> ListenerId {
        self.add_shared_listener(event, listener)
    }

    fn unsubscribe(&self, event: &str, id: ListenerId) -> bool {
        self.remove_listener(event, id)
    }
}
