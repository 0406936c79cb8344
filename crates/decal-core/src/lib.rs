#![forbid(unsafe_code)]

//! Core: event dispatch, listener capability, and key-path lookup.
//!
//! # Role in decal
//! `decal-core` holds the collaborators the observable sequence is built on:
//!
//! - [`EventHub`]: a per-instance, single-threaded publish/subscribe hub with
//!   `on`/`off`/`once`/`emit` semantics.
//! - [`Listenable`]: the optional capability an element exposes so that a
//!   container can attach listeners to it.
//! - [`path`]: dotted key-path lookup over serialized values.
//!
//! # How it fits in the system
//! `decal-array` owns one [`EventHub`] per sequence and relays events from
//! every [`Listenable`] element it contains. Nothing in this crate knows
//! about sequences.

pub mod event;
pub mod listenable;
pub mod path;

pub use event::{DEFAULT_MAX_LISTENERS, EventHub, Listener, ListenerId};
pub use listenable::{Emitter, Listenable};
pub use serde_json::Value;
