use crate::{
    Reflect, Typed, Variant,
    func::args::{Arg, ArgError, ArgValue},
};
use alloc::collections::VecDeque;

/// A list of arguments that can be passed to a [`DynamicFunction`].
///
/// For methods, the receiver is the first argument.
///
/// # Example
///
/// ```
/// # use prism_reflect::func::ArgList;
/// let foo = 123_i32;
/// let mut baz = 789_u32;
/// let args = ArgList::new()
///     // Push an owned argument
///     .with_owned(foo)
///     // Push an argument as text, to be parsed into the declared type
///     .with_str("4.5")
///     // Push a mutable reference argument
///     .with_mut(&mut baz);
///
/// assert_eq!(args.len(), 3);
/// ```
///
/// [`DynamicFunction`]: crate::func::DynamicFunction
#[derive(Debug, Default)]
pub struct ArgList<'a> {
    list: VecDeque<ArgValue<'a>>,
    /// The number of arguments already taken, used to index the next one.
    taken: usize,
}

impl<'a> ArgList<'a> {
    /// Create a new empty list of arguments.
    pub fn new() -> Self {
        Self {
            list: VecDeque::new(),
            taken: 0,
        }
    }

    /// Creates a list of owned [`String`] arguments, one per item.
    ///
    /// When the list is passed to a function, each string is parsed into the type the function
    /// declares at that position.
    pub fn from_strings<S: AsRef<str>>(strings: impl IntoIterator<Item = S>) -> Self {
        strings
            .into_iter()
            .fold(Self::new(), |args, text| args.with_str(text.as_ref()))
    }

    /// Push an [`ArgValue`] onto the list.
    pub fn push_arg(&mut self, arg: ArgValue<'a>) {
        self.list.push_back(arg);
    }

    /// Push an owned argument onto the list.
    pub fn push_owned<T: Typed>(&mut self, arg: T) {
        self.push_arg(ArgValue::Owned(Variant::new(arg)));
    }

    /// Push an owned [`Variant`] onto the list.
    pub fn push_variant(&mut self, arg: Variant) {
        self.push_arg(ArgValue::Owned(arg));
    }

    /// Push a reference argument onto the list.
    pub fn push_ref(&mut self, arg: &'a dyn Reflect) {
        self.push_arg(ArgValue::Ref(arg));
    }

    /// Push a mutable reference argument onto the list.
    pub fn push_mut(&mut self, arg: &'a mut dyn Reflect) {
        self.push_arg(ArgValue::Mut(arg));
    }

    /// Push a textual argument onto the list.
    pub fn push_str(&mut self, arg: &str) {
        self.push_owned(String::from(arg));
    }

    /// Push an [`ArgValue`] onto the list and return it.
    pub fn with_arg(mut self, arg: ArgValue<'a>) -> Self {
        self.push_arg(arg);
        self
    }

    /// Push an owned argument onto the list and return it.
    pub fn with_owned<T: Typed>(mut self, arg: T) -> Self {
        self.push_owned(arg);
        self
    }

    /// Push an owned [`Variant`] onto the list and return it.
    pub fn with_variant(mut self, arg: Variant) -> Self {
        self.push_variant(arg);
        self
    }

    /// Push a reference argument onto the list and return it.
    pub fn with_ref(mut self, arg: &'a dyn Reflect) -> Self {
        self.push_ref(arg);
        self
    }

    /// Push a mutable reference argument onto the list and return it.
    pub fn with_mut(mut self, arg: &'a mut dyn Reflect) -> Self {
        self.push_mut(arg);
        self
    }

    /// Push a textual argument onto the list and return it.
    pub fn with_str(mut self, arg: &str) -> Self {
        self.push_str(arg);
        self
    }

    /// Insert a receiver in front of the other arguments and return the list.
    pub fn with_receiver(mut self, receiver: ArgValue<'a>) -> Self {
        self.list.push_front(receiver);
        self
    }

    /// Remove the first argument in the list and return it.
    pub fn take_arg(&mut self) -> Result<Arg<'a>, ArgError> {
        let index = self.taken;
        let value = self
            .list
            .pop_front()
            .ok_or(ArgError::EmptyArgList { index })?;
        self.taken += 1;
        Ok(Arg::new(index, value))
    }

    /// Remove the first argument in the list and return it as an owned `T`.
    pub fn take_owned<T: Typed>(&mut self) -> Result<T, ArgError> {
        self.take_arg()?.take_owned()
    }

    /// Remove the first argument in the list and return it as a `&T`.
    pub fn take_ref<T: Typed>(&mut self) -> Result<&'a T, ArgError> {
        self.take_arg()?.take_ref()
    }

    /// Remove the first argument in the list and return it as a `&mut T`.
    pub fn take_mut<T: Typed>(&mut self) -> Result<&'a mut T, ArgError> {
        self.take_arg()?.take_mut()
    }

    /// The remaining arguments, in order.
    pub fn values(&self) -> impl Iterator<Item = &ArgValue<'a>> {
        self.list.iter()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut ArgValue<'a>> {
        self.list.iter_mut()
    }

    /// Returns the number of arguments in the list.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the list of arguments is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<'a> FromIterator<Variant> for ArgList<'a> {
    fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |args, value| args.with_variant(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::args::Ownership;

    #[test]
    fn should_push_arguments_in_order() {
        let a = 1_u32;
        let mut b = 2_u32;
        let args = ArgList::new()
            .with_owned(String::from("a"))
            .with_ref(&a)
            .with_mut(&mut b);

        let ownership: Vec<_> = args.values().map(ArgValue::ownership).collect();
        assert_eq!(ownership, [Ownership::Owned, Ownership::Ref, Ownership::Mut]);
    }

    #[test]
    fn should_take_arguments_in_order() {
        let a = 1_u32;
        let mut b = 2_u32;
        let mut args = ArgList::new()
            .with_owned(String::from("a"))
            .with_ref(&a)
            .with_mut(&mut b);

        assert_eq!(args.take_owned::<String>().unwrap(), "a");
        assert_eq!(args.take_ref::<u32>().unwrap(), &1);
        *args.take_mut::<u32>().unwrap() += 5;
        assert!(args.is_empty());
        assert_eq!(
            args.take_arg().unwrap_err(),
            ArgError::EmptyArgList { index: 3 }
        );
        assert_eq!(b, 7);
    }

    #[test]
    fn should_report_the_failing_index() {
        let mut args = ArgList::new().with_owned(1_i32).with_owned(2_i32);
        args.take_owned::<i32>().unwrap();
        assert_eq!(
            args.take_owned::<u8>().unwrap_err(),
            ArgError::UnexpectedType {
                index: 1,
                expected: "u8",
                received: "i32",
            }
        );
    }

    #[test]
    fn should_accept_mut_as_ref() {
        let mut value = 3_i64;
        let mut args = ArgList::new().with_mut(&mut value);
        assert_eq!(args.take_ref::<i64>().unwrap(), &3);

        let value = 3_i64;
        let mut args = ArgList::new().with_ref(&value);
        assert_eq!(
            args.take_mut::<i64>().unwrap_err(),
            ArgError::InvalidOwnership {
                index: 0,
                expected: Ownership::Mut,
                received: Ownership::Ref,
            }
        );
    }

    #[test]
    fn should_put_receiver_first() {
        let receiver = 10_u8;
        let mut args = ArgList::from_strings(["1", "2"]).with_receiver(ArgValue::Ref(&receiver));
        assert_eq!(args.len(), 3);
        assert_eq!(args.take_ref::<u8>().unwrap(), &10);
        assert_eq!(args.take_owned::<String>().unwrap(), "1");
    }
}
