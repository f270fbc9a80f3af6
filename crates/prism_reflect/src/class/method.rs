use crate::{
    Variant,
    func::{
        ArgList, CallError, DirectArgs, DynamicFunction, FunctionInfo, FunctionKind, IntoFunction,
        args::ArgValue,
    },
};
use alloc::borrow::Cow;
use core::fmt::{self, Debug, Formatter};

/// Describes a named method of a class.
///
/// Instance methods take the object as their first argument, static methods do not. Two
/// methods are equal when they wrap the same Rust function.
#[derive(Clone)]
pub struct ClassMethod {
    name: Cow<'static, str>,
    function: DynamicFunction,
}

impl ClassMethod {
    /// Describes the function `f` under `name`.
    pub fn new<Marker>(name: impl Into<Cow<'static, str>>, f: impl IntoFunction<Marker>) -> Self {
        Self::from_function(name, f.into_function())
    }

    /// Describes an already erased function under `name`.
    pub fn from_function(name: impl Into<Cow<'static, str>>, function: DynamicFunction) -> Self {
        let name = name.into();
        Self {
            function: function.with_name(name.clone()),
            name,
        }
    }

    /// The name of the method.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying function.
    pub fn function(&self) -> &DynamicFunction {
        &self.function
    }

    /// The signature of the method.
    pub fn info(&self) -> &FunctionInfo {
        self.function.info()
    }

    /// Returns `true` for methods without a receiver.
    pub fn is_static(&self) -> bool {
        self.function.kind() == FunctionKind::Static
    }

    /// Calls the method. For instance methods, the object is the first argument.
    pub fn call(&self, args: ArgList) -> Result<Variant, CallError> {
        self.function.call(args)
    }

    /// Calls an instance method on `receiver`.
    pub fn call_on<'a>(
        &self,
        receiver: ArgValue<'a>,
        args: ArgList<'a>,
    ) -> Result<Variant, CallError> {
        self.function.call(args.with_receiver(receiver))
    }

    /// Calls a static method with textual arguments.
    pub fn call_with_strings<S: AsRef<str>>(
        &self,
        args: impl IntoIterator<Item = S>,
    ) -> Result<Variant, CallError> {
        self.function.call_with_strings(args)
    }

    /// Calls a static method with its exact argument types.
    pub fn call_direct<Args: DirectArgs, R: 'static>(&self, args: Args) -> Result<R, CallError> {
        self.function.call_direct(args)
    }

    /// Calls a method borrowing its receiver with its exact argument types.
    pub fn call_direct_ref<C: 'static, Args: DirectArgs, R: 'static>(
        &self,
        receiver: &C,
        args: Args,
    ) -> Result<R, CallError> {
        self.function.call_direct_ref(receiver, args)
    }

    /// Calls a method mutating its receiver with its exact argument types.
    pub fn call_direct_mut<C: 'static, Args: DirectArgs, R: 'static>(
        &self,
        receiver: &mut C,
        args: Args,
    ) -> Result<R, CallError> {
        self.function.call_direct_mut(receiver, args)
    }
}

impl PartialEq for ClassMethod {
    fn eq(&self, other: &Self) -> bool {
        self.function.id() == other.function.id()
    }
}

impl Debug for ClassMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassMethod").field(&self.function).finish()
    }
}
