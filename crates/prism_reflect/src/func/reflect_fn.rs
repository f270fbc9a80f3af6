use alloc::sync::Arc;
use core::any::Any;
use variadics_please::all_tuples;

use crate::{
    Typed, Variant,
    func::{
        CallError, FunctionInfo, FunctionKind,
        args::{ArgInfo, ArgList, Ownership},
        macros::count_tokens,
    },
};

/// A reflection-based version of the [`Fn`] trait.
///
/// This allows functions to be called dynamically through [reflection]. It is implemented for
/// functions and closures whose arguments and return type all implement [`Typed`], in three
/// shapes:
///
/// * free functions: `fn(A, B, ..) -> R`
/// * methods borrowing their receiver: `fn(&C, A, ..) -> R`
/// * methods mutating their receiver: `fn(&mut C, A, ..) -> R`
///
/// Up to eight arguments are supported, not counting the receiver.
///
/// # Example
///
/// ```
/// # use prism_reflect::func::{ArgList, ReflectFn};
/// fn add(a: i32, b: i32) -> i32 {
///   a + b
/// }
///
/// let args = ArgList::new().with_owned(25_i32).with_owned(75_i32);
/// let value = add.reflect_call(args).unwrap();
/// assert_eq!(value.take::<i32>().unwrap(), 100);
/// ```
///
/// # Generic Parameters
///
/// The `Marker` parameter is the function signature the implementation was selected for. It
/// only exists to keep the three shapes from overlapping.
///
/// [reflection]: crate
pub trait ReflectFn<Marker>: Send + Sync + 'static {
    /// Call the function with the given arguments and return the result.
    fn reflect_call<'a>(&self, args: ArgList<'a>) -> Result<Variant, CallError>;

    /// Describe the signature of the function.
    fn function_info() -> FunctionInfo
    where
        Self: Sized;

    /// Erase the function into a strongly typed `Box<dyn Fn(..)>` for
    /// [direct calls](crate::func::DynamicFunction::call_direct).
    fn into_direct(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

macro_rules! impl_reflect_fn {
    ($(($Arg:ident, $arg:ident)),*) => {
        // === (...) -> ReturnType === //
        impl<$($Arg,)* ReturnType, Function> ReflectFn<fn($($Arg),*) -> [ReturnType]> for Function
        where
            $($Arg: Typed,)*
            ReturnType: Typed,
            Function: Fn($($Arg),*) -> ReturnType + Send + Sync + 'static,
        {
            #[expect(
                clippy::allow_attributes,
                reason = "This lint is part of a macro, which may not always trigger the `unused_mut` lint."
            )]
            #[allow(
                unused_mut,
                reason = "Some invocations of this macro may trigger the `unused_mut` lint, where others won't."
            )]
            fn reflect_call<'a>(&self, mut args: ArgList<'a>) -> Result<Variant, CallError> {
                const COUNT: usize = count_tokens!($($Arg)*);

                if args.len() != COUNT {
                    return Err(CallError::ArgCountMismatch {
                        expected: COUNT,
                        received: args.len(),
                    });
                }

                // Extract all arguments (in order)
                $(let $arg = args.take_owned::<$Arg>()?;)*

                Ok(Variant::new((self)($($arg,)*)))
            }

            fn function_info() -> FunctionInfo {
                #[expect(
                    clippy::allow_attributes,
                    reason = "This lint is part of a macro, which may not always trigger the `unused_mut` lint."
                )]
                #[allow(
                    unused_mut,
                    reason = "Functions without arguments never push."
                )]
                let mut args = Vec::with_capacity(count_tokens!($($Arg)*));
                $(args.push(ArgInfo::new::<$Arg>(args.len()));)*

                FunctionInfo::new(FunctionKind::Static)
                    .with_name(core::any::type_name::<Function>())
                    .with_args(args)
                    .with_return::<ReturnType>()
            }

            fn into_direct(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
                let direct: Box<dyn Fn($($Arg),*) -> ReturnType + Send + Sync> =
                    Box::new(move |$($arg: $Arg),*| (*self)($($arg),*));
                Arc::new(direct)
            }
        }

        // === (&self, ...) -> ReturnType === //
        impl<Receiver, $($Arg,)* ReturnType, Function> ReflectFn<fn(&Receiver, $($Arg),*) -> ReturnType> for Function
        where
            Receiver: Typed,
            $($Arg: Typed,)*
            ReturnType: Typed,
            Function: Fn(&Receiver, $($Arg),*) -> ReturnType + Send + Sync + 'static,
        {
            fn reflect_call<'a>(&self, mut args: ArgList<'a>) -> Result<Variant, CallError> {
                const COUNT: usize = count_tokens!(Receiver $($Arg)*);

                if args.len() != COUNT {
                    return Err(CallError::ArgCountMismatch {
                        expected: COUNT,
                        received: args.len(),
                    });
                }

                // Extract all arguments (in order)
                let receiver = args.take_ref::<Receiver>()?;
                $(let $arg = args.take_owned::<$Arg>()?;)*

                Ok(Variant::new((self)(receiver, $($arg,)*)))
            }

            fn function_info() -> FunctionInfo {
                let mut args = Vec::with_capacity(count_tokens!(Receiver $($Arg)*));
                args.push(ArgInfo::with_ownership::<Receiver>(0, Ownership::Ref));
                $(args.push(ArgInfo::new::<$Arg>(args.len()));)*

                FunctionInfo::new(FunctionKind::Method { receiver: Ownership::Ref })
                    .with_name(core::any::type_name::<Function>())
                    .with_args(args)
                    .with_return::<ReturnType>()
            }

            fn into_direct(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
                let direct: Box<dyn Fn(&Receiver, $($Arg),*) -> ReturnType + Send + Sync> =
                    Box::new(move |receiver: &Receiver, $($arg: $Arg),*| (*self)(receiver, $($arg),*));
                Arc::new(direct)
            }
        }

        // === (&mut self, ...) -> ReturnType === //
        impl<Receiver, $($Arg,)* ReturnType, Function> ReflectFn<fn(&mut Receiver, $($Arg),*) -> ReturnType> for Function
        where
            Receiver: Typed,
            $($Arg: Typed,)*
            ReturnType: Typed,
            Function: Fn(&mut Receiver, $($Arg),*) -> ReturnType + Send + Sync + 'static,
        {
            fn reflect_call<'a>(&self, mut args: ArgList<'a>) -> Result<Variant, CallError> {
                const COUNT: usize = count_tokens!(Receiver $($Arg)*);

                if args.len() != COUNT {
                    return Err(CallError::ArgCountMismatch {
                        expected: COUNT,
                        received: args.len(),
                    });
                }

                // Extract all arguments (in order)
                let receiver = args.take_mut::<Receiver>()?;
                $(let $arg = args.take_owned::<$Arg>()?;)*

                Ok(Variant::new((self)(receiver, $($arg,)*)))
            }

            fn function_info() -> FunctionInfo {
                let mut args = Vec::with_capacity(count_tokens!(Receiver $($Arg)*));
                args.push(ArgInfo::with_ownership::<Receiver>(0, Ownership::Mut));
                $(args.push(ArgInfo::new::<$Arg>(args.len()));)*

                FunctionInfo::new(FunctionKind::Method { receiver: Ownership::Mut })
                    .with_name(core::any::type_name::<Function>())
                    .with_args(args)
                    .with_return::<ReturnType>()
            }

            fn into_direct(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
                let direct: Box<dyn Fn(&mut Receiver, $($Arg),*) -> ReturnType + Send + Sync> =
                    Box::new(move |receiver: &mut Receiver, $($arg: $Arg),*| (*self)(receiver, $($arg),*));
                Arc::new(direct)
            }
        }
    };
}

all_tuples!(impl_reflect_fn, 0, 8, Arg, arg);
