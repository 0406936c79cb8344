#![forbid(unsafe_code)]

//! Observable, mutation-tracking sequence container.
//!
//! This crate provides:
//!
//! - [`ObservableSequence`]: a shared, growable sequence whose structural
//!   mutations emit `add` / `remove` events and whose elements' own events
//!   are relayed as `item.<name>` events.
//! - [`Element`]: identity and capability query for contained values.
//! - [`SequenceConfig`]: leak threshold, relay prefix and relay policy.
//!
//! # Architecture
//!
//! `ObservableSequence<T>` is a handle around `Rc<..>` shared state: a
//! `RefCell<Vec<T>>` for storage, one [`EventHub`] and the item relay
//! table. Every insertion and removal funnels through two internal hooks
//! that keep relay attachments in step with membership and emit the
//! lifecycle events.
//!
//! # Invariants
//!
//! 1. Every element added to or removed from the sequence produces exactly
//!    one `add` / `remove` event before the mutating call returns.
//!    Elements present at construction produce none.
//! 2. While `item.<name>` is active, every listenable element currently in
//!    the sequence holds exactly one relay listener for `<name>`; elements
//!    not in the sequence hold none.
//! 3. No `RefCell` borrow is held while listeners run, so listeners may
//!    mutate the sequence they observe.

pub mod config;
pub mod element;
pub mod error;
mod relay;
pub mod sequence;

pub use config::{RelayPolicy, SequenceConfig};
pub use decal_core::{Emitter, EventHub, Listenable, Listener, ListenerId, Value};
pub use element::{AsListenable, Element};
pub use error::SequenceError;
pub use sequence::{ObservableSequence, SequenceEvent, WeakSequence};
