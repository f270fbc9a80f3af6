use crate::func::{DynamicFunction, ReflectFn};

/// A trait for types that can be converted into a [`DynamicFunction`].
///
/// This trait is automatically implemented for any type that implements [`ReflectFn`].
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
/// let args = ArgList::new().with_owned(25_i32).with_owned(75_i32);
/// let value = func.call(args).unwrap().take::<i32>().unwrap();
/// assert_eq!(value, 100);
/// ```
///
/// # Generic Parameters
///
/// The `Marker` parameter is a marker type used to disambiguate the different function shapes,
/// as described on [`ReflectFn`].
pub trait IntoFunction<Marker> {
    /// Converts [`Self`] into a [`DynamicFunction`].
    fn into_function(self) -> DynamicFunction;
}

impl<F, Marker> IntoFunction<Marker> for F
where
    F: ReflectFn<Marker>,
{
    fn into_function(self) -> DynamicFunction {
        DynamicFunction::from_reflect_fn(self)
    }
}
