//! Signals: lists of callbacks notified with a value.

use crate::{
    Typed, Variant,
    func::{
        ArgError, ArgList, CallError, DynamicFunction, FunctionInfo, FunctionKind,
        args::{ArgInfo, Ownership},
    },
};
use alloc::sync::Arc;
use core::{
    any::TypeId,
    fmt::{self, Debug, Formatter},
};
use tracing::warn;

/// Identifies one connection of a [`Signal`], for [`Signal::disconnect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

enum Slot<T> {
    Typed(Arc<dyn Fn(T) + Send + Sync>),
    Dynamic(DynamicFunction),
}

/// A list of slots called with a value of type `T` every time the signal is emitted.
///
/// Slots are either Rust closures or [`DynamicFunction`]s, which lets a signal be wired to a
/// method looked up by name. Slots run in the order they were connected.
///
/// ```
/// use prism_reflect::Signal;
/// use std::sync::{Arc, atomic::{AtomicI32, Ordering}};
///
/// let total = Arc::new(AtomicI32::new(0));
/// let mut changed = Signal::<i32>::new();
///
/// let sum = total.clone();
/// let connection = changed.connect(move |value| {
///     sum.fetch_add(value, Ordering::Relaxed);
/// });
///
/// changed.emit(2);
/// changed.emit(3);
/// assert!(changed.disconnect(connection));
/// changed.emit(100);
/// assert_eq!(total.load(Ordering::Relaxed), 5);
/// ```
pub struct Signal<T> {
    slots: Vec<(ConnectionId, Slot<T>)>,
    next_id: u64,
}

impl<T: Typed + Clone> Signal<T> {
    /// Creates a signal without slots.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }

    /// Connects a closure.
    pub fn connect(&mut self, slot: impl Fn(T) + Send + Sync + 'static) -> ConnectionId {
        self.push(Slot::Typed(Arc::new(slot)))
    }

    /// Connects a dynamic function.
    ///
    /// The function must be static and take the emitted value as its only, owned argument. For
    /// a signal of `()` it may take no arguments at all.
    pub fn connect_dynamic(&mut self, slot: DynamicFunction) -> Result<ConnectionId, CallError> {
        check_slot::<T>(&slot)?;
        Ok(self.push(Slot::Dynamic(slot)))
    }

    fn push(&mut self, slot: Slot<T>) -> ConnectionId {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, slot));
        id
    }

    /// Removes a connection. Returns `false` if it was not connected.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        let len = self.slots.len();
        self.slots.retain(|(slot_id, _)| *slot_id != id);
        self.slots.len() != len
    }

    /// Removes every connection.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// The number of connected slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot is connected.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Calls every slot with a copy of `value`.
    ///
    /// A failing dynamic slot is logged and skipped. Returns the number of slots that ran
    /// successfully.
    pub fn emit(&self, value: T) -> usize {
        let mut delivered = 0;
        for (id, slot) in &self.slots {
            match slot {
                Slot::Typed(slot) => {
                    slot(value.clone());
                    delivered += 1;
                }
                Slot::Dynamic(slot) => match slot.call(payload_args(value.clone())) {
                    Ok(_) => delivered += 1,
                    Err(error) => {
                        warn!("signal slot {id:?} ({slot:?}) failed: {error}");
                    }
                },
            }
        }
        delivered
    }
}

impl<T: Typed + Clone> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Signal<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.len())
            .finish()
    }
}

fn is_unit<T: 'static>() -> bool {
    TypeId::of::<T>() == TypeId::of::<()>()
}

fn check_slot<T: Typed>(slot: &DynamicFunction) -> Result<(), CallError> {
    let info = slot.info();
    if let FunctionKind::Method { receiver } = info.kind() {
        return Err(ArgError::InvalidOwnership {
            index: 0,
            expected: Ownership::Owned,
            received: receiver,
        }
        .into());
    }
    match info.args() {
        [] if is_unit::<T>() => Ok(()),
        [arg] if arg.type_descriptor() == T::type_descriptor() => Ok(()),
        [arg] => Err(ArgError::UnexpectedType {
            index: 0,
            expected: arg.type_descriptor().name(),
            received: T::type_descriptor().name(),
        }
        .into()),
        args => Err(CallError::ArgCountMismatch {
            expected: usize::from(!is_unit::<T>()),
            received: args.len(),
        }),
    }
}

fn payload_args<T: Typed>(value: T) -> ArgList<'static> {
    if is_unit::<T>() {
        ArgList::new()
    } else {
        ArgList::new().with_owned(value)
    }
}

/// Describes the parameter list a slot of `Signal<T>` receives.
pub(crate) fn payload_info<T: Typed>() -> Vec<ArgInfo> {
    if is_unit::<T>() {
        Vec::new()
    } else {
        vec![ArgInfo::new::<T>(0)]
    }
}

/// Extracts the emitted value from a dynamic argument list.
pub(crate) fn take_payload<T: Typed>(mut args: ArgList) -> Result<T, CallError> {
    let info = FunctionInfo::new(FunctionKind::Static).with_args(payload_info::<T>());
    info.validate(&mut args)?;
    if is_unit::<T>() {
        return Variant::unit()
            .take::<T>()
            .map_err(|value| CallError::UnexpectedReturn {
                expected: T::type_descriptor().name(),
                received: value.type_name(),
            });
    }
    Ok(args.take_owned::<T>()?)
}
