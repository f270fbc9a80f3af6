use crate::{
    TypeDescriptor, Typed,
    func::{
        CallError,
        args::{ArgError, ArgInfo, ArgList, ArgValue, Ownership},
    },
};
use alloc::borrow::Cow;

/// What kind of callable a [`FunctionInfo`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// A free function or a static method.
    Static,
    /// A method taking a receiver as its first argument.
    Method {
        /// How the receiver is borrowed.
        receiver: Ownership,
    },
}

/// Type information for a [`DynamicFunction`].
///
/// [`DynamicFunction`]: crate::func::DynamicFunction
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    name: Option<Cow<'static, str>>,
    kind: FunctionKind,
    args: Vec<ArgInfo>,
    return_type: &'static TypeDescriptor,
}

impl FunctionInfo {
    /// Create a new [`FunctionInfo`] for a function taking no arguments and returning `()`.
    pub fn new(kind: FunctionKind) -> Self {
        Self {
            name: None,
            kind,
            args: Vec::new(),
            return_type: <()>::type_descriptor(),
        }
    }

    /// Set the name of the function.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the arguments of the function.
    ///
    /// For methods, the receiver is the first argument.
    pub fn with_args(mut self, args: Vec<ArgInfo>) -> Self {
        self.args = args;
        self
    }

    /// Set the return type of the function.
    pub fn with_return<R: Typed>(mut self) -> Self {
        self.return_type = R::type_descriptor();
        self
    }

    /// The name of the function, if it has one.
    pub fn name(&self) -> Option<&Cow<'static, str>> {
        self.name.as_ref()
    }

    /// The kind of the function.
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// The arguments of the function, including the receiver of a method.
    pub fn args(&self) -> &[ArgInfo] {
        &self.args
    }

    /// The number of arguments the function takes, including the receiver of a method.
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// The return type of the function.
    pub fn return_type(&self) -> &'static TypeDescriptor {
        self.return_type
    }

    /// Returns `true` if the function takes no receiver.
    pub fn is_static(&self) -> bool {
        self.kind == FunctionKind::Static
    }

    /// The type of the receiver of a method.
    pub fn receiver_type(&self) -> Option<&'static TypeDescriptor> {
        match self.kind {
            FunctionKind::Static => None,
            FunctionKind::Method { .. } => self.args.first().map(ArgInfo::type_descriptor),
        }
    }

    /// Returns `true` if `args` would pass [validation](Self::validate).
    ///
    /// Textual arguments are parsed on a trial basis and the list is left untouched.
    pub fn accepts(&self, args: &ArgList) -> bool {
        args.len() == self.args.len()
            && self
                .args
                .iter()
                .zip(args.values())
                .all(|(info, value)| match check_arg(info, value) {
                    Ok(Check::Exact) => true,
                    Ok(Check::Parse(text)) => info.type_descriptor().parse(text).is_ok(),
                    Err(_) => false,
                })
    }

    /// Checks `args` against the signature before a call.
    ///
    /// The count, ownership and type of every argument must match. An owned [`String`] given
    /// where another textual type is expected is parsed into that type in place.
    pub fn validate(&self, args: &mut ArgList) -> Result<(), CallError> {
        if args.len() != self.args.len() {
            return Err(CallError::ArgCountMismatch {
                expected: self.args.len(),
                received: args.len(),
            });
        }

        for (info, value) in self.args.iter().zip(args.values_mut()) {
            let parsed = match check_arg(info, value)? {
                Check::Exact => continue,
                Check::Parse(text) => info.type_descriptor().parse(text)?,
            };
            *value = ArgValue::Owned(parsed);
        }
        Ok(())
    }
}

enum Check<'v> {
    Exact,
    Parse(&'v str),
}

fn check_arg<'v>(info: &ArgInfo, value: &'v ArgValue) -> Result<Check<'v>, ArgError> {
    let received = value.ownership();
    if !info.ownership().accepts(received) {
        return Err(ArgError::InvalidOwnership {
            index: info.index(),
            expected: info.ownership(),
            received,
        });
    }

    let expected = info.type_descriptor();
    let actual = value.type_descriptor();
    if actual == expected {
        return Ok(Check::Exact);
    }

    if let ArgValue::Owned(variant) = value
        && expected.is_textual()
        && let Some(text) = variant.downcast_ref::<String>()
    {
        return Ok(Check::Parse(text));
    }

    Err(ArgError::UnexpectedType {
        index: info.index(),
        expected: expected.name(),
        received: actual.name(),
    })
}
