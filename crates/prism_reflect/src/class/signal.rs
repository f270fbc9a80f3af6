use crate::{
    ConnectionId, Reflect, Signal, TypeDescriptor, Typed,
    func::{ArgList, CallError, DynamicFunction, args::ArgInfo},
    signal::{payload_info, take_payload},
};
use alloc::{borrow::Cow, sync::Arc};
use core::fmt::{self, Debug, Formatter};

trait SignalAccess: Send + Sync {
    fn connect(
        &self,
        owner: &mut dyn Reflect,
        slot: DynamicFunction,
    ) -> Option<Result<ConnectionId, CallError>>;
    fn disconnect(&self, owner: &mut dyn Reflect, id: ConnectionId) -> Option<bool>;
    fn emit(&self, owner: &dyn Reflect, args: ArgList) -> Option<Result<usize, CallError>>;
    fn slot_count(&self, owner: &dyn Reflect) -> Option<usize>;
}

struct TypedSignal<C, T> {
    get: fn(&C) -> &Signal<T>,
    get_mut: fn(&mut C) -> &mut Signal<T>,
}

impl<C: Typed, T: Typed + Clone> SignalAccess for TypedSignal<C, T> {
    fn connect(
        &self,
        owner: &mut dyn Reflect,
        slot: DynamicFunction,
    ) -> Option<Result<ConnectionId, CallError>> {
        let signal = (self.get_mut)(owner.downcast_mut::<C>()?);
        Some(signal.connect_dynamic(slot))
    }

    fn disconnect(&self, owner: &mut dyn Reflect, id: ConnectionId) -> Option<bool> {
        let signal = (self.get_mut)(owner.downcast_mut::<C>()?);
        Some(signal.disconnect(id))
    }

    fn emit(&self, owner: &dyn Reflect, args: ArgList) -> Option<Result<usize, CallError>> {
        let signal = (self.get)(owner.downcast_ref::<C>()?);
        Some(take_payload::<T>(args).map(|value| signal.emit(value)))
    }

    fn slot_count(&self, owner: &dyn Reflect) -> Option<usize> {
        let signal = (self.get)(owner.downcast_ref::<C>()?);
        Some(signal.len())
    }
}

/// Describes a [`Signal`] field of a class.
///
/// Lets slots be connected to, and values emitted from, the signal of a type-erased object.
/// Every operation fails with [`CallError::NotDerived`] when the object is not of the signal's
/// class.
#[derive(Clone)]
pub struct ClassSignal {
    name: Cow<'static, str>,
    class: &'static TypeDescriptor,
    params: Vec<ArgInfo>,
    access: Arc<dyn SignalAccess>,
}

impl ClassSignal {
    /// Describes the `Signal<T>` of `C` reached through `get` and `get_mut`.
    pub fn new<C: Typed, T: Typed + Clone>(
        name: impl Into<Cow<'static, str>>,
        get: fn(&C) -> &Signal<T>,
        get_mut: fn(&mut C) -> &mut Signal<T>,
    ) -> Self {
        Self {
            name: name.into(),
            class: C::type_descriptor(),
            params: payload_info::<T>(),
            access: Arc::new(TypedSignal { get, get_mut }),
        }
    }

    /// The name of the signal.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The descriptor of the class that declares the signal.
    pub fn class_type(&self) -> &'static TypeDescriptor {
        self.class
    }

    /// The parameters slots receive: none for `Signal<()>`, one otherwise.
    pub fn params(&self) -> &[ArgInfo] {
        &self.params
    }

    /// Connects `slot` to the signal of `object`.
    pub fn connect(
        &self,
        object: &mut dyn Reflect,
        slot: DynamicFunction,
    ) -> Result<ConnectionId, CallError> {
        let received = object.reflect_type();
        self.access
            .connect(object, slot)
            .ok_or_else(|| self.not_derived(received))?
    }

    /// Disconnects a slot from the signal of `object`. Returns `false` if it was not connected.
    pub fn disconnect(
        &self,
        object: &mut dyn Reflect,
        id: ConnectionId,
    ) -> Result<bool, CallError> {
        let received = object.reflect_type();
        self.access
            .disconnect(object, id)
            .ok_or_else(|| self.not_derived(received))
    }

    /// Emits the value in `args` from the signal of `object`.
    ///
    /// Returns the number of slots that ran successfully.
    pub fn emit(&self, object: &dyn Reflect, args: ArgList) -> Result<usize, CallError> {
        self.access
            .emit(object, args)
            .ok_or_else(|| self.not_derived(object.reflect_type()))?
    }

    /// The number of slots connected to the signal of `object`.
    pub fn slot_count(&self, object: &dyn Reflect) -> Result<usize, CallError> {
        self.access
            .slot_count(object)
            .ok_or_else(|| self.not_derived(object.reflect_type()))
    }

    fn not_derived(&self, received: &TypeDescriptor) -> CallError {
        CallError::NotDerived {
            expected: self.class.name().into(),
            received: received.name().into(),
        }
    }
}

impl Debug for ClassSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassSignal")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}
