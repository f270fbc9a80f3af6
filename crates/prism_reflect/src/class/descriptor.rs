use crate::{
    ClassConstructor, ClassField, ClassMethod, ClassProperty, ClassSignal, ConnectionId, Reflect,
    TypeDescriptor, Typed, Variant,
    class::field::MemberAccess,
    func::{ArgList, CallError, DynamicFunction, args::ArgValue},
};
use alloc::{borrow::Cow, sync::Arc};
use core::{
    fmt::{self, Debug, Formatter},
    ptr,
};
use indexmap::IndexMap;

/// The base class of a [`ClassDescriptor`], together with the projection from a derived object
/// onto its embedded base object.
#[derive(Clone)]
pub struct BaseClass {
    class: Arc<ClassDescriptor>,
    access: Arc<dyn MemberAccess>,
}

impl BaseClass {
    pub(crate) fn new(class: Arc<ClassDescriptor>, access: Arc<dyn MemberAccess>) -> Self {
        Self { class, access }
    }

    /// The base class descriptor.
    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    /// Projects a derived object onto its base object.
    pub fn upcast<'a>(&self, object: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        self.access.get(object)
    }

    /// Projects a derived object onto its base object, mutably.
    pub fn upcast_mut<'a>(&self, object: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        self.access.get_mut(object)
    }
}

impl Debug for BaseClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BaseClass").field(&self.class.name).finish()
    }
}

/// The runtime directory of one class: its fields, properties, methods, signals and
/// constructors, plus the link to its base class.
///
/// Descriptors are built with [`ClassBuilder`](crate::ClassBuilder) and are immutable once
/// built. Member lookups come in two flavors:
///
/// * `get_*` only searches the members this class declares itself.
/// * `find_*` walks the base class chain and returns the nearest declaration, so members of a
///   derived class shadow members of the same name in its bases.
///
/// The object-level helpers such as [`set_property_str`](Self::set_property_str) and
/// [`invoke`](Self::invoke) use `find_*` and project the object onto the class that declares
/// the member before touching it.
pub struct ClassDescriptor {
    pub(crate) name: Cow<'static, str>,
    pub(crate) ty: &'static TypeDescriptor,
    pub(crate) base: Option<BaseClass>,
    pub(crate) fields: IndexMap<Cow<'static, str>, ClassField>,
    pub(crate) properties: IndexMap<Cow<'static, str>, ClassProperty>,
    pub(crate) methods: IndexMap<Cow<'static, str>, ClassMethod>,
    pub(crate) signals: IndexMap<Cow<'static, str>, ClassSignal>,
    pub(crate) constructors: Vec<ClassConstructor>,
}

impl ClassDescriptor {
    pub(crate) fn new(name: Cow<'static, str>, ty: &'static TypeDescriptor) -> Self {
        Self {
            name,
            ty,
            base: None,
            fields: IndexMap::default(),
            properties: IndexMap::default(),
            methods: IndexMap::default(),
            signals: IndexMap::default(),
            constructors: Vec::new(),
        }
    }

    /// The name of the class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The descriptor of the Rust type behind the class.
    pub fn type_descriptor(&self) -> &'static TypeDescriptor {
        self.ty
    }

    /// The base class, if any.
    pub fn base(&self) -> Option<&BaseClass> {
        self.base.as_ref()
    }

    /// This class followed by its base classes, nearest first.
    pub fn hierarchy(&self) -> Hierarchy<'_> {
        Hierarchy { next: Some(self) }
    }

    /// Returns `true` if `other` is this class or one of its bases.
    pub fn is_derived_from(&self, other: &ClassDescriptor) -> bool {
        self.hierarchy().any(|class| class.is_same(other))
    }

    /// Returns `true` if a class named `name` is this class or one of its bases.
    pub fn is_derived_from_name(&self, name: &str) -> bool {
        self.hierarchy().any(|class| class.name == name)
    }

    fn is_same(&self, other: &ClassDescriptor) -> bool {
        ptr::eq(self, other) || (self.ty == other.ty && self.name == other.name)
    }

    /// The fields declared by this class.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &ClassField> {
        self.fields.values()
    }

    /// The properties declared by this class.
    pub fn properties(&self) -> impl ExactSizeIterator<Item = &ClassProperty> {
        self.properties.values()
    }

    /// The methods declared by this class.
    pub fn methods(&self) -> impl ExactSizeIterator<Item = &ClassMethod> {
        self.methods.values()
    }

    /// The signals declared by this class.
    pub fn signals(&self) -> impl ExactSizeIterator<Item = &ClassSignal> {
        self.signals.values()
    }

    /// The constructors of this class.
    pub fn get_constructors(&self) -> &[ClassConstructor] {
        &self.constructors
    }

    /// Looks up a field declared by this class.
    pub fn get_field(&self, name: &str) -> Option<&ClassField> {
        self.fields.get(name)
    }

    /// Looks up a property declared by this class.
    pub fn get_property(&self, name: &str) -> Option<&ClassProperty> {
        self.properties.get(name)
    }

    /// Looks up a method declared by this class.
    pub fn get_method(&self, name: &str) -> Option<&ClassMethod> {
        self.methods.get(name)
    }

    /// Looks up a signal declared by this class.
    pub fn get_signal(&self, name: &str) -> Option<&ClassSignal> {
        self.signals.get(name)
    }

    /// Looks up a field through the class hierarchy, returning it with its declaring class.
    pub fn find_field(&self, name: &str) -> Option<(&ClassDescriptor, &ClassField)> {
        self.hierarchy()
            .find_map(|class| Some((class, class.get_field(name)?)))
    }

    /// Looks up a property through the class hierarchy, returning it with its declaring class.
    pub fn find_property(&self, name: &str) -> Option<(&ClassDescriptor, &ClassProperty)> {
        self.hierarchy()
            .find_map(|class| Some((class, class.get_property(name)?)))
    }

    /// Looks up a method through the class hierarchy, returning it with its declaring class.
    pub fn find_method(&self, name: &str) -> Option<(&ClassDescriptor, &ClassMethod)> {
        self.hierarchy()
            .find_map(|class| Some((class, class.get_method(name)?)))
    }

    /// Looks up a signal through the class hierarchy, returning it with its declaring class.
    pub fn find_signal(&self, name: &str) -> Option<(&ClassDescriptor, &ClassSignal)> {
        self.hierarchy()
            .find_map(|class| Some((class, class.get_signal(name)?)))
    }

    /// Every property visible on this class, base classes first, shadowed properties skipped.
    pub fn all_properties(&self) -> Vec<(&ClassDescriptor, &ClassProperty)> {
        let mut classes = self.hierarchy().collect::<Vec<_>>();
        classes.reverse();
        let mut properties = IndexMap::<&str, (&ClassDescriptor, &ClassProperty)>::default();
        for class in classes {
            for property in class.properties() {
                properties.insert(property.name(), (class, property));
            }
        }
        properties.into_values().collect()
    }

    /// Projects `object`, which must be of this class, onto the embedded object of `target`.
    ///
    /// Returns [`None`] if `object` is not of this class or `target` is not one of its bases.
    pub fn upcast<'a>(
        &self,
        object: &'a dyn Reflect,
        target: &ClassDescriptor,
    ) -> Option<&'a dyn Reflect> {
        if object.reflect_type() != self.ty {
            return None;
        }
        let mut class = self;
        let mut object = object;
        loop {
            if class.is_same(target) {
                return Some(object);
            }
            let base = class.base.as_ref()?;
            object = base.upcast(object)?;
            class = &*base.class;
        }
    }

    /// Mutable counterpart of [`upcast`](Self::upcast).
    pub fn upcast_mut<'a>(
        &self,
        object: &'a mut dyn Reflect,
        target: &ClassDescriptor,
    ) -> Option<&'a mut dyn Reflect> {
        if object.reflect_type() != self.ty {
            return None;
        }
        let mut class = self;
        let mut object = object;
        loop {
            if class.is_same(target) {
                return Some(object);
            }
            let base = class.base.as_ref()?;
            object = base.upcast_mut(object)?;
            class = &*base.class;
        }
    }

    fn not_derived(&self, received: &TypeDescriptor) -> CallError {
        CallError::NotDerived {
            expected: self.name.to_string(),
            received: received.name().into(),
        }
    }

    fn member_not_found(&self, member: &str) -> CallError {
        CallError::MemberNotFound {
            class: self.name.to_string(),
            member: member.into(),
        }
    }

    fn resolve<'a>(
        &self,
        object: &'a dyn Reflect,
        owner: &ClassDescriptor,
    ) -> Result<&'a dyn Reflect, CallError> {
        self.upcast(object, owner)
            .ok_or_else(|| self.not_derived(object.reflect_type()))
    }

    fn resolve_mut<'a>(
        &self,
        object: &'a mut dyn Reflect,
        owner: &ClassDescriptor,
    ) -> Result<&'a mut dyn Reflect, CallError> {
        let received = object.reflect_type();
        self.upcast_mut(object, owner)
            .ok_or_else(|| self.not_derived(received))
    }

    fn property_for(&self, name: &str) -> Result<(&ClassDescriptor, &ClassProperty), CallError> {
        self.find_property(name)
            .ok_or_else(|| self.member_not_found(name))
    }

    /// Writes `value` into the property `name` of `object`.
    pub fn set_property_value(
        &self,
        object: &mut dyn Reflect,
        name: &str,
        value: Variant,
    ) -> Result<(), CallError> {
        let (owner, property) = self.property_for(name)?;
        property.set_value(self.resolve_mut(object, owner)?, value)
    }

    /// Reads the property `name` of `object`.
    pub fn get_property_value(&self, object: &dyn Reflect, name: &str) -> Result<Variant, CallError> {
        let (owner, property) = self.property_for(name)?;
        property.get_value(self.resolve(object, owner)?)
    }

    /// Parses `text` and writes it into the property `name` of `object`.
    pub fn set_property_str(
        &self,
        object: &mut dyn Reflect,
        name: &str,
        text: &str,
    ) -> Result<(), CallError> {
        let (owner, property) = self.property_for(name)?;
        property.set_from_str(self.resolve_mut(object, owner)?, text)
    }

    /// Reads the property `name` of `object` as text.
    pub fn get_property_str(&self, object: &dyn Reflect, name: &str) -> Result<String, CallError> {
        let (owner, property) = self.property_for(name)?;
        property.get_as_string(self.resolve(object, owner)?)
    }

    /// Restores the default value of the property `name` of `object`.
    pub fn restore_default(&self, object: &mut dyn Reflect, name: &str) -> Result<(), CallError> {
        let (owner, property) = self.property_for(name)?;
        property.restore_default_value(self.resolve_mut(object, owner)?)
    }

    /// Restores every property of `object` that has a default value, base classes first.
    ///
    /// Returns the number of properties restored.
    pub fn restore_defaults(&self, object: &mut dyn Reflect) -> Result<usize, CallError> {
        let mut restored = 0;
        for (owner, property) in self.all_properties() {
            if property.has_default() && !property.is_read_only() {
                property.restore_default_value(self.resolve_mut(&mut *object, owner)?)?;
                restored += 1;
            }
        }
        Ok(restored)
    }

    /// Calls the method `name` on `object`.
    ///
    /// Static methods are called with `args` alone and ignore `object`.
    pub fn invoke<'a>(
        &self,
        object: &'a mut dyn Reflect,
        name: &str,
        args: ArgList<'a>,
    ) -> Result<Variant, CallError> {
        let (owner, method) = self
            .find_method(name)
            .ok_or_else(|| self.member_not_found(name))?;
        if method.is_static() {
            return method.call(args);
        }
        let receiver = self.resolve_mut(object, owner)?;
        method.call_on(ArgValue::Mut(receiver), args)
    }

    /// Calls the method `name` on `object` with textual arguments.
    pub fn invoke_with_strings<S: AsRef<str>>(
        &self,
        object: &mut dyn Reflect,
        name: &str,
        args: impl IntoIterator<Item = S>,
    ) -> Result<Variant, CallError> {
        self.invoke(object, name, ArgList::from_strings(args))
    }

    /// Calls the static method `name`.
    pub fn invoke_static(&self, name: &str, args: ArgList) -> Result<Variant, CallError> {
        let (_, method) = self
            .find_method(name)
            .ok_or_else(|| self.member_not_found(name))?;
        method.call(args)
    }

    /// Connects `slot` to the signal `name` of `object`.
    pub fn connect(
        &self,
        object: &mut dyn Reflect,
        name: &str,
        slot: DynamicFunction,
    ) -> Result<ConnectionId, CallError> {
        let (owner, signal) = self
            .find_signal(name)
            .ok_or_else(|| self.member_not_found(name))?;
        signal.connect(self.resolve_mut(object, owner)?, slot)
    }

    /// Emits the value in `args` from the signal `name` of `object`.
    pub fn emit(&self, object: &dyn Reflect, name: &str, args: ArgList) -> Result<usize, CallError> {
        let (owner, signal) = self
            .find_signal(name)
            .ok_or_else(|| self.member_not_found(name))?;
        signal.emit(self.resolve(object, owner)?, args)
    }

    /// Creates an object with the first constructor that accepts `args`.
    pub fn create_dynamic(&self, args: ArgList) -> Result<Box<dyn Reflect>, CallError> {
        let constructor = self
            .constructors
            .iter()
            .find(|constructor| constructor.accepts(&args))
            .ok_or_else(|| CallError::NoMatchingConstructor {
                class: self.name.to_string(),
            })?;
        constructor.call(args)
    }

    /// Creates an object from textual arguments.
    pub fn create_from_strings<S: AsRef<str>>(
        &self,
        args: impl IntoIterator<Item = S>,
    ) -> Result<Box<dyn Reflect>, CallError> {
        self.create_dynamic(ArgList::from_strings(args))
    }

    /// Creates an object and downcasts it to `T`.
    pub fn create<T: Typed>(&self, args: ArgList) -> Result<Box<T>, CallError> {
        self.create_dynamic(args)?
            .downcast::<T>()
            .map_err(|object| CallError::NotDerived {
                expected: T::type_descriptor().name().into(),
                received: object.reflect_type().name().into(),
            })
    }
}

impl Debug for ClassDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("fields", &self.fields.values())
            .field("properties", &self.properties.values())
            .field("methods", &self.methods.values())
            .field("signals", &self.signals.values())
            .field("constructors", &self.constructors)
            .finish()
    }
}

/// Iterator over a class and its bases, returned by [`ClassDescriptor::hierarchy`].
#[derive(Clone)]
pub struct Hierarchy<'a> {
    next: Option<&'a ClassDescriptor>,
}

impl<'a> Iterator for Hierarchy<'a> {
    type Item = &'a ClassDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let class = self.next?;
        self.next = class.base.as_ref().map(|base| &*base.class);
        Some(class)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ClassBuilder, ClassDescriptor, Typed, func::CallError, reflect_class};
    use alloc::sync::Arc;

    #[derive(Default)]
    struct Node {
        name: String,
        visible: bool,
    }

    #[derive(Default)]
    struct Sprite {
        node: Node,
        frame: u32,
    }

    #[derive(Default)]
    struct AnimatedSprite {
        sprite: Sprite,
        speed: f32,
    }

    reflect_class!(Node);
    reflect_class!(Sprite);
    reflect_class!(AnimatedSprite);

    fn classes() -> (Arc<ClassDescriptor>, Arc<ClassDescriptor>, Arc<ClassDescriptor>) {
        let node = Arc::new(
            ClassBuilder::<Node>::new("Node")
                .constructor(Node::default)
                .property("Name", |n: &Node| n.name.clone(), |n: &mut Node, v: String| n.name = v)
                .property("Visible", |n: &Node| n.visible, |n: &mut Node, v: bool| n.visible = v)
                .default_value("Visible", true)
                .method("Hide", |n: &mut Node| n.visible = false)
                .build(),
        );
        let sprite = Arc::new(
            ClassBuilder::<Sprite>::new("Sprite")
                .base(node.clone(), |s: &Sprite| &s.node, |s: &mut Sprite| &mut s.node)
                .constructor(Sprite::default)
                .property("Frame", |s: &Sprite| s.frame, |s: &mut Sprite, v: u32| s.frame = v)
                .default_value("Frame", 1_u32)
                .build(),
        );
        let animated = Arc::new(
            ClassBuilder::<AnimatedSprite>::new("AnimatedSprite")
                .base(
                    sprite.clone(),
                    |a: &AnimatedSprite| &a.sprite,
                    |a: &mut AnimatedSprite| &mut a.sprite,
                )
                .constructor(AnimatedSprite::default)
                .constructor(|speed: f32| AnimatedSprite {
                    speed,
                    ..Default::default()
                })
                .property(
                    "Speed",
                    |a: &AnimatedSprite| a.speed,
                    |a: &mut AnimatedSprite, v: f32| a.speed = v,
                )
                .read_only_property("Frame", |a: &AnimatedSprite| a.sprite.frame * 2)
                .build(),
        );
        (node, sprite, animated)
    }

    #[test]
    fn should_derive_reflexively_and_transitively() {
        let (node, sprite, animated) = classes();
        assert!(animated.is_derived_from(&animated));
        assert!(animated.is_derived_from(&sprite));
        assert!(animated.is_derived_from(&node));
        assert!(!node.is_derived_from(&animated));
        assert!(animated.is_derived_from_name("Node"));
        assert_eq!(
            animated.hierarchy().map(ClassDescriptor::name).collect::<Vec<_>>(),
            ["AnimatedSprite", "Sprite", "Node"]
        );
    }

    #[test]
    fn should_only_search_locally_with_get() {
        let (_, _, animated) = classes();
        assert!(animated.get_property("Visible").is_none());
        let (owner, _) = animated.find_property("Visible").unwrap();
        assert_eq!(owner.name(), "Node");
    }

    #[test]
    fn should_let_derived_members_shadow_base_members() {
        let (_, _, animated) = classes();
        let (owner, frame) = animated.find_property("Frame").unwrap();
        assert_eq!(owner.name(), "AnimatedSprite");
        assert!(frame.is_read_only());

        let names = animated
            .all_properties()
            .into_iter()
            .map(|(owner, property)| (owner.name(), property.name()))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                ("Node", "Name"),
                ("Node", "Visible"),
                ("AnimatedSprite", "Frame"),
                ("AnimatedSprite", "Speed"),
            ]
        );
    }

    #[test]
    fn should_access_inherited_properties() {
        let (_, _, animated) = classes();
        let mut object = animated.create_from_strings(["2.5"]).unwrap();

        animated
            .set_property_str(object.as_mut(), "Name", "hero")
            .unwrap();
        assert_eq!(
            animated.get_property_str(object.as_ref(), "Name").unwrap(),
            "hero"
        );
        assert_eq!(
            animated.get_property_str(object.as_ref(), "Speed").unwrap(),
            "2.5"
        );

        let restored = animated.restore_defaults(object.as_mut()).unwrap();
        assert_eq!(restored, 1);
        let object = object.downcast::<AnimatedSprite>().unwrap();
        assert!(object.sprite.node.visible);
        assert_eq!(object.sprite.frame, 0);
    }

    #[test]
    fn should_invoke_inherited_methods() {
        let (_, _, animated) = classes();
        let mut object = AnimatedSprite::default();
        object.sprite.node.visible = true;
        animated
            .invoke(&mut object, "Hide", Default::default())
            .unwrap();
        assert!(!object.sprite.node.visible);

        assert_eq!(
            animated
                .invoke(&mut object, "Jump", Default::default())
                .unwrap_err(),
            CallError::MemberNotFound {
                class: "AnimatedSprite".into(),
                member: "Jump".into(),
            }
        );
    }

    #[test]
    fn should_reject_objects_of_other_classes() {
        let (node, sprite, _) = classes();
        let mut object = Node::default();
        assert_eq!(
            sprite.set_property_str(&mut object, "Frame", "3"),
            Err(CallError::NotDerived {
                expected: "Sprite".into(),
                received: "Node".into(),
            })
        );
        assert!(node.upcast(&object, &sprite).is_none());
        assert!(sprite.upcast(&Sprite::default(), &node).is_some());
    }

    #[test]
    fn should_select_constructor_by_arguments() {
        let (_, _, animated) = classes();
        let default = animated.create::<AnimatedSprite>(Default::default()).unwrap();
        assert_eq!(default.speed, 0.0);

        let fast = animated
            .create::<AnimatedSprite>(crate::func::ArgList::new().with_owned(4.0_f32))
            .unwrap();
        assert_eq!(fast.speed, 4.0);

        assert_eq!(
            animated.create_from_strings(["1", "2"]).unwrap_err(),
            CallError::NoMatchingConstructor {
                class: "AnimatedSprite".into()
            }
        );
        assert_eq!(
            animated.type_descriptor(),
            AnimatedSprite::type_descriptor()
        );
    }
}
