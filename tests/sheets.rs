//! Loading objects from a RON scene file made of property sheets.

use bitflags::bitflags;
use prism::{
    prelude::*,
    reflect::{ApplyOptions, ApplyReport},
};
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Layers: u32 {
        const WORLD = 1;
        const UI = 2;
        const DEBUG = 4;
    }
}

reflect_flags!(Layers { WORLD, UI, DEBUG });

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Shape {
    #[default]
    Cuboid,
    Sphere,
}

reflect_enum!(Shape { Cuboid, Sphere });

#[derive(Default)]
struct Body {
    shape: Shape,
    mass: f64,
    layers: Layers,
    sleeping: bool,
}

reflect_class!(Body);

#[derive(Serialize, Deserialize)]
struct Scene {
    objects: Vec<PropertySheet>,
}

const SCENE: &str = r#"(
    objects: [
        (
            class: "Body",
            properties: {
                "Shape": "Sphere",
                "Mass": "2.5",
                "Layers": "WORLD|DEBUG",
            },
        ),
        (
            class: "Body",
            properties: {
                "Mass": "heavy",
                "Friction": "0.3",
                "Sleeping": "1",
            },
        ),
        (
            class: "Vehicle",
            properties: {},
        ),
    ],
)"#;

fn registry() -> TypeRegistry {
    let registry = TypeRegistry::with_builtins();
    registry.register_class_type(
        "Body",
        ClassBuilder::<Body>::new("Body")
            .constructor(Body::default)
            .property("Shape", |b: &Body| b.shape, |b: &mut Body, v| b.shape = v)
            .property("Mass", |b: &Body| b.mass, |b: &mut Body, v| b.mass = v)
            .default_value("Mass", 1.0_f64)
            .property("Layers", |b: &Body| b.layers, |b: &mut Body, v| b.layers = v)
            .property("Sleeping", |b: &Body| b.sleeping, |b: &mut Body, v| b.sleeping = v)
            .build()
            .into(),
    );
    registry
}

#[test]
fn should_load_scene_best_effort() {
    let registry = registry();
    let scene: Scene = ron::from_str(SCENE).unwrap();
    let options = ApplyOptions::default();

    let objects = scene
        .objects
        .iter()
        .filter_map(|sheet| sheet.instantiate(&registry, &options).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(objects.len(), 2);

    let first = objects[0].downcast_ref::<Body>().unwrap();
    assert_eq!(first.shape, Shape::Sphere);
    assert_eq!(first.mass, 2.5);
    assert_eq!(first.layers, Layers::WORLD | Layers::DEBUG);

    let second = objects[1].downcast_ref::<Body>().unwrap();
    assert_eq!(second.mass, 1.0);
    assert!(second.sleeping);
    assert_eq!(second.layers, Layers::empty());
}

#[test]
fn should_report_each_entry() {
    let registry = registry();
    let class = registry.get_class_type("Body").unwrap();
    let scene: Scene = ron::from_str(SCENE).unwrap();

    let mut body = Body::default();
    let report = scene.objects[1]
        .apply(&class, &mut body, &ApplyOptions::default())
        .unwrap();
    assert_eq!(
        report,
        ApplyReport {
            applied: 1,
            unknown: 1,
            restored: 1,
            skipped: 0,
        }
    );
    assert!(scene.objects[1]
        .apply(&class, &mut body, &ApplyOptions::STRICT)
        .is_err());
}

#[test]
fn should_save_what_it_loads() {
    let registry = registry();
    let class = registry.get_class_type("Body").unwrap();
    let body = Body {
        shape: Shape::Sphere,
        mass: 0.15,
        layers: Layers::UI | Layers::from_bits_retain(64),
        sleeping: false,
    };

    let sheet = PropertySheet::capture(&class, &body).unwrap();
    assert_eq!(sheet.get("Layers"), Some("UI|64"));
    assert_eq!(sheet.get("Mass"), Some("0.15"));

    let text = ron::ser::to_string_pretty(
        &Scene {
            objects: vec![sheet.clone()],
        },
        Default::default(),
    )
    .unwrap();
    let scene: Scene = ron::from_str(&text).unwrap();
    let copy = scene.objects[0]
        .instantiate(&registry, &ApplyOptions::STRICT)
        .unwrap()
        .unwrap();
    assert_eq!(PropertySheet::capture(&class, copy.as_ref()).unwrap(), sheet);
}
