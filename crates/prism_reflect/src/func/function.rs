use alloc::{borrow::Cow, sync::Arc};
use core::{
    any::{Any, TypeId, type_name},
    fmt::{Debug, Formatter},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    Variant,
    func::{
        ArgList, CallError, DirectArgs, FunctionInfo, FunctionKind, ReflectFn,
        args::ArgInfo,
    },
};

/// The identity of the callable behind a [`DynamicFunction`].
///
/// Function items and closures that capture nothing are identified by their type, so converting
/// the same function twice yields the same identity. Any other callable, such as a function
/// pointer or a capturing closure, gets a fresh identity each time it is converted. Clones of a
/// [`DynamicFunction`] share its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(FunctionIdRepr);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FunctionIdRepr {
    Type(TypeId),
    Instance(u64),
}

impl FunctionId {
    fn of<F: 'static>() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);

        if size_of::<F>() == 0 {
            Self(FunctionIdRepr::Type(TypeId::of::<F>()))
        } else {
            Self(FunctionIdRepr::Instance(NEXT.fetch_add(1, Ordering::Relaxed)))
        }
    }
}

type ErasedCall = dyn for<'a> Fn(ArgList<'a>) -> Result<Variant, CallError> + Send + Sync;

/// A dynamic representation of a function.
///
/// This type can be used to represent any callable that satisfies [`Fn`] (or the reflection-based
/// equivalent, [`ReflectFn`]). Functions converted through [`IntoFunction`] can also be called
/// directly with their exact Rust signature, bypassing [`ArgList`] entirely.
///
/// Cloning a [`DynamicFunction`] is cheap: clones share the underlying callable.
///
/// # Example
///
/// ```
/// # use prism_reflect::func::{ArgList, DynamicFunction, IntoFunction};
/// fn add(a: i32, b: i32) -> i32 {
///   a + b
/// }
///
/// let func: DynamicFunction = add.into_function();
///
/// let args = ArgList::new().with_owned(25_i32).with_str("75");
/// let value = func.call(args).unwrap();
/// assert_eq!(value.take::<i32>().unwrap(), 100);
///
/// let value: i32 = func.call_direct((1_i32, 2_i32)).unwrap();
/// assert_eq!(value, 3);
/// ```
///
/// [`IntoFunction`]: crate::func::IntoFunction
#[derive(Clone)]
pub struct DynamicFunction {
    info: FunctionInfo,
    id: FunctionId,
    func: Arc<ErasedCall>,
    direct: Option<Arc<dyn Any + Send + Sync>>,
}

impl DynamicFunction {
    /// Create a new [`DynamicFunction`].
    ///
    /// The given function can be used to call out to any other callable, including functions
    /// that take no arguments statically. Arguments are checked against `info` before `func`
    /// runs, so `func` can take them without checking their count.
    ///
    /// A function created this way cannot be called directly.
    pub fn new<F>(func: F, info: FunctionInfo) -> Self
    where
        F: for<'a> Fn(ArgList<'a>) -> Result<Variant, CallError> + Send + Sync + 'static,
    {
        Self {
            info,
            id: FunctionId::of::<F>(),
            func: Arc::new(func),
            direct: None,
        }
    }

    pub(crate) fn from_reflect_fn<F, Marker>(function: F) -> Self
    where
        F: ReflectFn<Marker>,
    {
        let function = Arc::new(function);
        let direct = <F as ReflectFn<Marker>>::into_direct(Arc::clone(&function));
        let mut dynamic = Self::new(
            move |args| function.reflect_call(args),
            F::function_info(),
        );
        dynamic.id = FunctionId::of::<F>();
        dynamic.direct = Some(direct);
        dynamic
    }

    /// Set the name of the function.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.info = self.info.with_name(name);
        self
    }

    /// Set the names of the arguments, skipping the receiver of a method.
    pub fn with_arg_names(mut self, names: &[&'static str]) -> Self {
        let offset = usize::from(!self.info.is_static());
        let args = self
            .info
            .args()
            .iter()
            .enumerate()
            .map(|(index, arg)| match index.checked_sub(offset).and_then(|i| names.get(i)) {
                Some(name) => arg.clone().with_name(*name),
                None => arg.clone(),
            })
            .collect::<Vec<ArgInfo>>();
        self.info = self.info.with_args(args);
        self
    }

    /// Call the function with the given arguments.
    ///
    /// The arguments are [validated](FunctionInfo::validate) first. Textual arguments given for
    /// non-textual parameters are parsed into the declared type.
    pub fn call<'a>(&self, mut args: ArgList<'a>) -> Result<Variant, CallError> {
        self.info.validate(&mut args)?;
        (self.func)(args)
    }

    /// Call a static function with textual arguments.
    pub fn call_with_strings<S: AsRef<str>>(
        &self,
        args: impl IntoIterator<Item = S>,
    ) -> Result<Variant, CallError> {
        self.call(ArgList::from_strings(args))
    }

    /// Call a free function with its exact argument types.
    ///
    /// `Args` is the tuple of argument types and `R` the return type. If either does not match
    /// the function, [`CallError::DirectSignatureMismatch`] is returned and nothing is called.
    pub fn call_direct<Args: DirectArgs, R: 'static>(&self, args: Args) -> Result<R, CallError> {
        let f = self.direct::<Args::Static<R>>()?;
        Ok(Args::call_static(f, args))
    }

    /// Call a method borrowing its receiver with its exact argument types.
    pub fn call_direct_ref<C: 'static, Args: DirectArgs, R: 'static>(
        &self,
        receiver: &C,
        args: Args,
    ) -> Result<R, CallError> {
        let f = self.direct::<Args::Ref<C, R>>()?;
        Ok(Args::call_ref(f, receiver, args))
    }

    /// Call a method mutating its receiver with its exact argument types.
    pub fn call_direct_mut<C: 'static, Args: DirectArgs, R: 'static>(
        &self,
        receiver: &mut C,
        args: Args,
    ) -> Result<R, CallError> {
        let f = self.direct::<Args::Mut<C, R>>()?;
        Ok(Args::call_mut(f, receiver, args))
    }

    fn direct<T: ?Sized + 'static>(&self) -> Result<&T, CallError> {
        self.direct
            .as_ref()
            .and_then(|direct| direct.downcast_ref::<Box<T>>())
            .map(|boxed| &**boxed)
            .ok_or(CallError::DirectSignatureMismatch {
                requested: type_name::<T>(),
            })
    }

    /// Returns `true` if the function supports direct calls.
    pub fn is_direct(&self) -> bool {
        self.direct.is_some()
    }

    /// The type information of the function.
    pub fn info(&self) -> &FunctionInfo {
        &self.info
    }

    /// The name of the function, if it has one.
    pub fn name(&self) -> Option<&Cow<'static, str>> {
        self.info.name()
    }

    /// The kind of the function.
    pub fn kind(&self) -> FunctionKind {
        self.info.kind()
    }

    /// The number of arguments the function takes, including the receiver of a method.
    pub fn arg_count(&self) -> usize {
        self.info.arg_count()
    }

    /// The identity of the underlying callable.
    ///
    /// See [`FunctionId`] for when two functions share an identity.
    pub fn id(&self) -> FunctionId {
        self.id
    }
}

/// Outputs the function's signature.
///
/// This takes the format: `DynamicFunction(fn {name}({arg_name}: {arg_type}, ...) -> {return_type})`.
///
/// Names for arguments are optional and will default to `_` if not provided.
impl Debug for DynamicFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let name = self.info.name().map_or("_", |name| &**name);
        write!(f, "DynamicFunction(fn {name}(")?;

        for (index, arg) in self.info.args().iter().enumerate() {
            let name = arg.name().unwrap_or("_");
            let ty = arg.type_descriptor().name();
            write!(f, "{name}: {ty}")?;

            if index + 1 < self.info.args().len() {
                write!(f, ", ")?;
            }
        }

        let ret = self.info.return_type().name();
        write!(f, ") -> {ret})")
    }
}
