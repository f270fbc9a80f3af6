use variadics_please::all_tuples;

/// A tuple of arguments for a direct call into a [`DynamicFunction`].
///
/// Direct calls skip the [`ArgList`] machinery. The tuple's element types must be exactly the
/// argument types of the function, and the call fails cleanly if they are not. The associated
/// types name the boxed closure a function of each shape is stored as.
///
/// [`DynamicFunction`]: crate::func::DynamicFunction
/// [`ArgList`]: crate::func::ArgList
pub trait DirectArgs: Sized + 'static {
    /// `dyn Fn(Args..) -> R`
    type Static<R: 'static>: ?Sized + 'static;
    /// `dyn Fn(&C, Args..) -> R`
    type Ref<C: 'static, R: 'static>: ?Sized + 'static;
    /// `dyn Fn(&mut C, Args..) -> R`
    type Mut<C: 'static, R: 'static>: ?Sized + 'static;

    /// Call a free function with these arguments.
    fn call_static<R: 'static>(f: &Self::Static<R>, args: Self) -> R;

    /// Call a method borrowing its receiver with these arguments.
    fn call_ref<C: 'static, R: 'static>(f: &Self::Ref<C, R>, receiver: &C, args: Self) -> R;

    /// Call a method mutating its receiver with these arguments.
    fn call_mut<C: 'static, R: 'static>(f: &Self::Mut<C, R>, receiver: &mut C, args: Self) -> R;
}

macro_rules! impl_direct_args {
    ($(($Arg:ident, $arg:ident)),*) => {
        impl<$($Arg: 'static),*> DirectArgs for ($($Arg,)*) {
            type Static<R: 'static> = dyn Fn($($Arg),*) -> R + Send + Sync;
            type Ref<C: 'static, R: 'static> = dyn Fn(&C, $($Arg),*) -> R + Send + Sync;
            type Mut<C: 'static, R: 'static> = dyn Fn(&mut C, $($Arg),*) -> R + Send + Sync;

            fn call_static<R: 'static>(f: &Self::Static<R>, ($($arg,)*): Self) -> R {
                f($($arg),*)
            }

            fn call_ref<C: 'static, R: 'static>(f: &Self::Ref<C, R>, receiver: &C, ($($arg,)*): Self) -> R {
                f(receiver, $($arg),*)
            }

            fn call_mut<C: 'static, R: 'static>(f: &Self::Mut<C, R>, receiver: &mut C, ($($arg,)*): Self) -> R {
                f(receiver, $($arg),*)
            }
        }
    };
}

all_tuples!(impl_direct_args, 0, 8, Arg, arg);
