//! Drives a class through the registry by name, the way a scene loader or property browser does.

use prism::{
    prelude::*,
    reflect::{
        ClassDescriptor,
        func::{CallError, args::ArgValue},
    },
};
use std::sync::{
    Arc,
    atomic::{AtomicI32, Ordering},
};

#[derive(Default)]
struct Widget {
    width: i32,
    height: i32,
    title: String,
    resized: Signal<i32>,
}

impl Widget {
    fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    fn area(&self) -> i32 {
        self.width * self.height
    }

    fn scale(&mut self, factor: i32) {
        self.width *= factor;
        self.height *= factor;
        self.resized.emit(self.width);
    }
}

reflect_class!(Widget);

fn widget_class() -> Arc<ClassDescriptor> {
    ClassBuilder::<Widget>::new("Widget")
        .constructor(Widget::default)
        .constructor(Widget::new)
        .field(class_field!(Widget, title: String))
        .property("Width", |w: &Widget| w.width, |w: &mut Widget, v: i32| w.width = v)
        .default_value("Width", 800)
        .property("Height", |w: &Widget| w.height, |w: &mut Widget, v: i32| w.height = v)
        .default_value("Height", 600)
        .method("Area", Widget::area)
        .method("Scale", Widget::scale)
        .signal("Resized", |w: &Widget| &w.resized, |w: &mut Widget| &mut w.resized)
        .build()
        .into()
}

fn registry() -> TypeRegistry {
    let registry = TypeRegistry::with_builtins();
    assert!(registry.register_class_type("Widget", widget_class()));
    registry
}

#[test]
fn should_drive_widget_by_name() {
    let registry = registry();
    let class = registry.get_class_type("Widget").unwrap();

    let mut widget = class.create_dynamic(ArgList::new()).unwrap();
    class.restore_defaults(widget.as_mut()).unwrap();

    class
        .set_property_value(widget.as_mut(), "Width", Variant::new(1024))
        .unwrap();
    let width = class.get_property_value(widget.as_ref(), "Width").unwrap();
    assert_eq!(width.downcast_ref::<i32>(), Some(&1024));

    class.restore_default(widget.as_mut(), "Width").unwrap();
    assert_eq!(class.get_property_str(widget.as_ref(), "Width").unwrap(), "800");
    assert_eq!(class.get_property_str(widget.as_ref(), "Height").unwrap(), "600");

    assert!(registry.get_class_type("Bogus").is_none());
}

#[test]
fn should_restore_only_attached_defaults() {
    let class = ClassBuilder::<Widget>::new("Widget")
        .property("Width", |w: &Widget| w.width, |w: &mut Widget, v: i32| w.width = v)
        .default_value("Width", 5)
        .property("Height", |w: &Widget| w.height, |w: &mut Widget, v: i32| w.height = v)
        .build();
    let mut widget = Widget::new(7, 7);

    let width = class.get_property("Width").unwrap();
    width.restore_default_value(&mut widget).unwrap();
    assert_eq!(width.get_direct::<Widget, i32>(&widget), Ok(5));

    let height = class.get_property("Height").unwrap();
    height.restore_default_value(&mut widget).unwrap();
    assert_eq!(height.get_direct::<Widget, i32>(&widget), Ok(7));
}

#[test]
fn should_construct_from_strings() {
    let registry = registry();
    let class = registry.get_class_type("Widget").unwrap();

    let widget = class.create_from_strings(["3", "4"]).unwrap();
    let area = class
        .get_method("Area")
        .unwrap()
        .call_on(ArgValue::Ref(widget.as_ref()), ArgList::new())
        .unwrap();
    assert_eq!(area.downcast_ref::<i32>(), Some(&12));

    assert!(matches!(
        class.create_from_strings(["3"]),
        Err(CallError::NoMatchingConstructor { .. })
    ));
    assert!(matches!(
        class.create_from_strings(["3", "wide"]),
        Err(CallError::NoMatchingConstructor { .. })
    ));

    let typed = class.create::<Widget>(ArgList::new().with_owned(2).with_owned(5)).unwrap();
    assert_eq!(typed.area(), 10);
}

#[test]
fn should_report_argument_mismatches() {
    let registry = registry();
    let class = registry.get_class_type("Widget").unwrap();
    let mut widget = class.create_dynamic(ArgList::new()).unwrap();

    assert!(matches!(
        class.invoke(widget.as_mut(), "Scale", ArgList::new()),
        Err(CallError::ArgCountMismatch { .. })
    ));
    assert!(matches!(
        class.invoke(widget.as_mut(), "Scale", ArgList::new().with_owned(2.5_f32)),
        Err(CallError::Arg(_))
    ));
    assert!(matches!(
        class.set_property_str(widget.as_mut(), "Width", "wide"),
        Err(CallError::Parse(_))
    ));
    assert!(matches!(
        class.invoke(widget.as_mut(), "Explode", ArgList::new()),
        Err(CallError::MemberNotFound { .. })
    ));
}

#[test]
fn should_deliver_signals_to_dynamic_slots() {
    static LAST_WIDTH: AtomicI32 = AtomicI32::new(0);

    fn on_resized(width: i32) {
        LAST_WIDTH.store(width, Ordering::Relaxed);
    }

    let registry = registry();
    let class = registry.get_class_type("Widget").unwrap();
    let mut widget = class
        .create_dynamic(ArgList::new().with_owned(10).with_owned(20))
        .unwrap();

    class
        .connect(widget.as_mut(), "Resized", on_resized.into_function())
        .unwrap();
    class
        .invoke_with_strings(widget.as_mut(), "Scale", ["3"])
        .unwrap();
    assert_eq!(LAST_WIDTH.load(Ordering::Relaxed), 30);

    assert_eq!(
        class
            .emit(widget.as_ref(), "Resized", ArgList::new().with_str("7"))
            .unwrap(),
        1
    );
    assert_eq!(LAST_WIDTH.load(Ordering::Relaxed), 7);
}

#[test]
fn should_read_fields_structurally() {
    let class = widget_class();
    let widget = Widget {
        title: "main".into(),
        ..Default::default()
    };

    let field = class.get_field("title").unwrap();
    assert_eq!(field.offset(), core::mem::offset_of!(Widget, title));
    assert_eq!(field.to_text(&widget).unwrap(), "main");
}
