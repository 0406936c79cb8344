#![forbid(unsafe_code)]

//! Element identity and the listener-capability query.
//!
//! # Identity
//!
//! The sequence tracks elements by identity, not by value. Shared objects
//! (`Rc<U>`) are identified by pointer, so two equal-but-distinct objects are
//! different elements and the same object inserted twice is one element
//! occurring twice. Primitives and strings have no identity of their own and
//! compare by value (so `f64::NAN` is never found, as with `indexOf`).
//!
//! # Capability
//!
//! An element exposes its [`Listenable`] side through
//! [`Element::listenable`]. For `Rc<U>` this forwards to
//! [`AsListenable::as_listenable`], which plain data types implement with an
//! empty `impl` block to opt out.

use std::rc::Rc;

use decal_core::{Emitter, Listenable, Value};

/// A value that can be stored in an [`ObservableSequence`](crate::ObservableSequence).
pub trait Element: Clone + 'static {
    /// Whether `self` and `other` are the same element.
    fn same_as(&self, other: &Self) -> bool;

    /// The element's listener capability, if it has one.
    fn listenable(&self) -> Option<&dyn Listenable> {
        None
    }
}

/// Capability query for types stored behind `Rc`.
///
/// ```ignore
/// struct Point { x: i32, y: i32 }
/// impl AsListenable for Point {}
///
/// struct Model { events: Emitter }
/// impl AsListenable for Model {
///     fn as_listenable(&self) -> Option<&dyn Listenable> {
///         Some(&self.events)
///     }
/// }
/// ```
pub trait AsListenable {
    /// Listener capability of this object, `None` by default.
    fn as_listenable(&self) -> Option<&dyn Listenable> {
        None
    }
}

impl AsListenable for Emitter {
    fn as_listenable(&self) -> Option<&dyn Listenable> {
        Some(self)
    }
}

impl<U: AsListenable + ?Sized + 'static> Element for Rc<U> {
    fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }

    fn listenable(&self) -> Option<&dyn Listenable> {
        (**self).as_listenable()
    }
}

macro_rules! value_elements {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                #[inline]
                fn same_as(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

value_elements!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    Value,
);
