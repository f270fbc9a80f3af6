use crate::{
    Reflect, TypeDescriptor, Typed, Variant,
    func::{ArgList, CallError, DirectArgs, DynamicFunction, FunctionInfo, IntoFunction},
};
use core::fmt::{self, Debug, Formatter};

/// Describes a constructor of a class.
///
/// A constructor is a free function returning the class by value. Calling it dynamically hands
/// back the new object boxed behind [`Reflect`]. Two constructors are equal when they wrap the
/// same Rust function.
#[derive(Clone)]
pub struct ClassConstructor {
    class: &'static TypeDescriptor,
    function: DynamicFunction,
    into_object: fn(Variant) -> Result<Box<dyn Reflect>, Variant>,
}

impl ClassConstructor {
    /// Describes the function `f` as a constructor of `C`.
    pub fn new<C: Typed, Marker>(f: impl IntoFunction<Marker>) -> Self {
        Self::from_function::<C>(f.into_function())
    }

    /// Describes an already erased function as a constructor of `C`.
    pub fn from_function<C: Typed>(function: DynamicFunction) -> Self {
        Self {
            class: C::type_descriptor(),
            function,
            into_object: into_object::<C>,
        }
    }

    /// The descriptor of the constructed class.
    pub fn class_type(&self) -> &'static TypeDescriptor {
        self.class
    }

    /// The underlying function.
    pub fn function(&self) -> &DynamicFunction {
        &self.function
    }

    /// The signature of the constructor.
    pub fn info(&self) -> &FunctionInfo {
        self.function.info()
    }

    /// The number of arguments the constructor takes.
    pub fn arg_count(&self) -> usize {
        self.function.arg_count()
    }

    /// Returns `true` if the constructor returns its class.
    pub fn returns_class(&self) -> bool {
        self.info().return_type() == self.class
    }

    /// Returns `true` if the constructor can be called with `args`.
    pub fn accepts(&self, args: &ArgList) -> bool {
        self.info().accepts(args)
    }

    /// Creates a new object.
    pub fn call(&self, args: ArgList) -> Result<Box<dyn Reflect>, CallError> {
        let value = self.function.call(args)?;
        (self.into_object)(value).map_err(|value| CallError::UnexpectedReturn {
            expected: self.class.name(),
            received: value.type_name(),
        })
    }

    /// Creates a new object from textual arguments.
    pub fn call_with_strings<S: AsRef<str>>(
        &self,
        args: impl IntoIterator<Item = S>,
    ) -> Result<Box<dyn Reflect>, CallError> {
        self.call(ArgList::from_strings(args))
    }

    /// Creates a new object with the constructor's exact argument types.
    pub fn call_direct<Args: DirectArgs, R: 'static>(&self, args: Args) -> Result<R, CallError> {
        self.function.call_direct(args)
    }
}

impl PartialEq for ClassConstructor {
    fn eq(&self, other: &Self) -> bool {
        self.function.id() == other.function.id()
    }
}

impl Debug for ClassConstructor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassConstructor")
            .field("class", &self.class.name())
            .field("function", &self.function)
            .finish()
    }
}

fn into_object<C: Typed>(value: Variant) -> Result<Box<dyn Reflect>, Variant> {
    value
        .take::<C>()
        .map(|object| Box::new(object) as Box<dyn Reflect>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Color {
        r: u8,
        g: u8,
        b: u8,
    }

    crate::reflect_class!(Color);

    fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    #[test]
    fn should_create_objects_from_strings() {
        let constructor = ClassConstructor::new::<Color, _>(rgb);
        assert!(constructor.returns_class());
        assert_eq!(constructor.arg_count(), 3);

        let object = constructor.call_with_strings(["255", "128", "0"]).unwrap();
        assert_eq!(
            object.downcast_ref::<Color>(),
            Some(&Color { r: 255, g: 128, b: 0 })
        );
    }

    #[test]
    fn should_check_arguments() {
        let constructor = ClassConstructor::new::<Color, _>(rgb);
        assert!(constructor.accepts(&ArgList::from_strings(["1", "2", "3"])));
        assert!(!constructor.accepts(&ArgList::from_strings(["1", "2"])));
        assert!(!constructor.accepts(&ArgList::from_strings(["1", "2", "300"])));
        assert!(constructor.call_with_strings(["1", "2", "300"]).is_err());
    }

    #[test]
    fn should_reject_foreign_return_types() {
        let constructor = ClassConstructor::new::<Color, _>(|| 5_u32);
        assert!(!constructor.returns_class());
        assert_eq!(
            constructor.call(ArgList::new()).unwrap_err(),
            CallError::UnexpectedReturn {
                expected: "Color",
                received: "u32"
            }
        );
    }

    #[test]
    fn should_create_directly() {
        let constructor = ClassConstructor::new::<Color, _>(rgb);
        let color: Color = constructor.call_direct((1_u8, 2_u8, 3_u8)).unwrap();
        assert_eq!(color, Color { r: 1, g: 2, b: 3 });
        assert_eq!(constructor, ClassConstructor::new::<Color, _>(rgb));
    }
}
