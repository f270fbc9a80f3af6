/// Counts the number of tokens passed to it.
///
/// Used to get the number of arguments of a function from its generic parameters.
macro_rules! count_tokens {
    () => { 0 };
    ($head:tt $($tail:tt)*) => { 1 + $crate::func::macros::count_tokens!($($tail)*) };
}

pub(crate) use count_tokens;
