#![forbid(unsafe_code)]

//! Item event relay bookkeeping.
//!
//! For each active relay name the table records, per distinct element, the
//! listener id it attached to that element and how many times the element
//! currently occurs in the sequence. An element inserted twice keeps one
//! listener with two occurrences; the listener is detached when the last
//! occurrence leaves.
//!
//! The table only does bookkeeping and the subscribe/unsubscribe calls on
//! elements. Building the listener closure is left to the caller, which
//! knows how to reach the owning sequence.

use decal_core::{Listener, ListenerId, Value};

use crate::element::Element;

/// Builds the relay listener for `(relay name, element)`.
pub(crate) type ListenerFactory<'a, T> = &'a dyn Fn(&str, &T) -> Listener<[Value]>;

struct Attachment<T> {
    item: T,
    id: ListenerId,
    occurrences: usize,
}

pub(crate) struct ItemEventRelay<T> {
    /// Active relay names with their attachments, in activation order.
    relays: Vec<(String, Vec<Attachment<T>>)>,
}

impl<T: Element> ItemEventRelay<T> {
    pub(crate) fn new() -> Self {
        Self { relays: Vec::new() }
    }

    pub(crate) fn is_active(&self, name: &str) -> bool {
        self.relays.iter().any(|(active, _)| active == name)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.relays.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Activate `name` and attach it to every listenable element in `items`.
    ///
    /// Returns the number of listeners attached, or `None` if `name` was
    /// already active.
    pub(crate) fn activate(
        &mut self,
        name: &str,
        items: &[T],
        make_listener: ListenerFactory<'_, T>,
    ) -> Option<usize> {
        if self.is_active(name) {
            return None;
        }
        let mut attachments = Vec::new();
        for item in items {
            attach_one(&mut attachments, name, item, make_listener);
        }
        let attached = attachments.len();
        self.relays.push((name.to_owned(), attachments));
        Some(attached)
    }

    /// Deactivate `name`, detaching its listener from every element.
    ///
    /// Returns the number of listeners detached, or `None` if `name` was
    /// not active.
    pub(crate) fn deactivate(&mut self, name: &str) -> Option<usize> {
        let pos = self.relays.iter().position(|(active, _)| active == name)?;
        let (name, attachments) = self.relays.remove(pos);
        Some(detach_all(&name, attachments))
    }

    /// Deactivate every relay. Returns the number of listeners detached.
    pub(crate) fn clear(&mut self) -> usize {
        self.relays
            .drain(..)
            .map(|(name, attachments)| detach_all(&name, attachments))
            .sum()
    }

    /// Record one more occurrence of `item` under every active relay.
    pub(crate) fn attach(&mut self, item: &T, make_listener: ListenerFactory<'_, T>) {
        for (name, attachments) in &mut self.relays {
            attach_one(attachments, name, item, make_listener);
        }
    }

    /// Record one fewer occurrence of `item` under every active relay.
    pub(crate) fn detach(&mut self, item: &T) {
        for (name, attachments) in &mut self.relays {
            let Some(pos) = attachments.iter().position(|a| a.item.same_as(item)) else {
                continue;
            };
            attachments[pos].occurrences -= 1;
            if attachments[pos].occurrences == 0 {
                let attachment = attachments.remove(pos);
                if let Some(target) = attachment.item.listenable() {
                    target.unsubscribe(name, attachment.id);
                }
            }
        }
    }

    /// Number of distinct elements attached under `name`.
    #[cfg(test)]
    pub(crate) fn attached_count(&self, name: &str) -> usize {
        self.relays
            .iter()
            .find(|(active, _)| active == name)
            .map_or(0, |(_, attachments)| attachments.len())
    }
}

fn attach_one<T: Element>(
    attachments: &mut Vec<Attachment<T>>,
    name: &str,
    item: &T,
    make_listener: ListenerFactory<'_, T>,
) {
    if let Some(existing) = attachments.iter_mut().find(|a| a.item.same_as(item)) {
        existing.occurrences += 1;
        return;
    }
    let Some(target) = item.listenable() else {
        return;
    };
    let id = target.subscribe(name, make_listener(name, item));
    attachments.push(Attachment {
        item: item.clone(),
        id,
        occurrences: 1,
    });
}

fn detach_all<T: Element>(name: &str, attachments: Vec<Attachment<T>>) -> usize {
    let count = attachments.len();
    for attachment in attachments {
        if let Some(target) = attachment.item.listenable() {
            target.unsubscribe(name, attachment.id);
        }
    }
    count
}
