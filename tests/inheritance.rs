//! Member lookup and upcasting along a single-inheritance chain.

use prism::{
    prelude::*,
    reflect::{ClassDescriptor, func::CallError},
};
use std::sync::Arc;

#[derive(Default)]
struct Entity {
    name: String,
    visible: bool,
}

#[derive(Default)]
struct Actor {
    entity: Entity,
    health: i32,
}

#[derive(Default)]
struct Player {
    actor: Actor,
    score: u32,
}

impl Entity {
    fn describe(&self) -> String {
        format!("entity {}", self.name)
    }
}

impl Player {
    fn describe(&self) -> String {
        format!("player {} ({})", self.actor.entity.name, self.score)
    }
}

reflect_class!(Entity);
reflect_class!(Actor);
reflect_class!(Player);

struct Chain {
    entity: Arc<ClassDescriptor>,
    actor: Arc<ClassDescriptor>,
    player: Arc<ClassDescriptor>,
}

fn chain() -> Chain {
    let entity: Arc<ClassDescriptor> = ClassBuilder::<Entity>::new("Entity")
        .constructor(Entity::default)
        .property("Name", |e: &Entity| e.name.clone(), |e: &mut Entity, v| e.name = v)
        .property("Visible", |e: &Entity| e.visible, |e: &mut Entity, v| e.visible = v)
        .default_value("Visible", true)
        .method("Describe", Entity::describe)
        .build()
        .into();
    let actor: Arc<ClassDescriptor> = ClassBuilder::<Actor>::new("Actor")
        .base(entity.clone(), |a: &Actor| &a.entity, |a: &mut Actor| &mut a.entity)
        .constructor(Actor::default)
        .property("Health", |a: &Actor| a.health, |a: &mut Actor, v| a.health = v)
        .default_value("Health", 100)
        .build()
        .into();
    let player: Arc<ClassDescriptor> = ClassBuilder::<Player>::new("Player")
        .base(actor.clone(), |p: &Player| &p.actor, |p: &mut Player| &mut p.actor)
        .constructor(Player::default)
        .property("Score", |p: &Player| p.score, |p: &mut Player, v| p.score = v)
        .method("Describe", Player::describe)
        .build()
        .into();
    Chain {
        entity,
        actor,
        player,
    }
}

#[test]
fn should_be_reflexive_and_transitive() {
    let Chain {
        entity,
        actor,
        player,
    } = chain();

    assert!(player.is_derived_from(&player));
    assert!(player.is_derived_from(&actor));
    assert!(player.is_derived_from(&entity));
    assert!(player.is_derived_from_name("Entity"));
    assert!(!entity.is_derived_from(&player));
    assert!(!actor.is_derived_from(&player));

    let names = player.hierarchy().map(ClassDescriptor::name).collect::<Vec<_>>();
    assert_eq!(names, ["Player", "Actor", "Entity"]);
}

#[test]
fn should_keep_local_lookups_local() {
    let Chain { player, .. } = chain();

    assert!(player.get_property("Health").is_none());
    let (owner, _) = player.find_property("Health").unwrap();
    assert_eq!(owner.name(), "Actor");

    let (owner, _) = player.find_method("Describe").unwrap();
    assert_eq!(owner.name(), "Player");
    assert!(player.find_property("Ammo").is_none());
}

#[test]
fn should_drive_base_members_through_derived_class() {
    let Chain { player, .. } = chain();
    let mut object = player.create_dynamic(ArgList::new()).unwrap();

    assert_eq!(player.restore_defaults(object.as_mut()).unwrap(), 2);
    player.set_property_str(object.as_mut(), "Name", "ada").unwrap();
    player.set_property_str(object.as_mut(), "Score", "12").unwrap();

    assert_eq!(player.get_property_str(object.as_ref(), "Health").unwrap(), "100");
    assert_eq!(player.get_property_str(object.as_ref(), "Visible").unwrap(), "true");

    let described = player.invoke(object.as_mut(), "Describe", ArgList::new()).unwrap();
    assert_eq!(described.get::<String>().as_deref(), Some("player ada (12)"));

    let names = player
        .all_properties()
        .into_iter()
        .map(|(_, property)| property.name())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Name", "Visible", "Health", "Score"]);
}

#[test]
fn should_upcast_to_base_objects() {
    let Chain {
        entity,
        actor,
        player,
    } = chain();
    let mut object = Player::default();
    object.actor.entity.name = "bob".into();

    let base = player.upcast(&object, &entity).unwrap();
    assert_eq!(base.downcast_ref::<Entity>().unwrap().name, "bob");

    let base = player.upcast_mut(&mut object, &actor).unwrap();
    base.downcast_mut::<Actor>().unwrap().health = 3;
    assert_eq!(object.actor.health, 3);

    assert!(actor.upcast(&object, &entity).is_none());
    let described = entity
        .invoke(&mut object.actor.entity, "Describe", ArgList::new())
        .unwrap();
    assert_eq!(described.get::<String>().as_deref(), Some("entity bob"));
}

#[test]
fn should_refuse_objects_of_unrelated_classes() {
    let Chain { actor, player, .. } = chain();
    let mut object = Actor::default();

    assert_eq!(
        player.set_property_str(&mut object, "Score", "1"),
        Err(CallError::NotDerived {
            expected: "Player".into(),
            received: "Actor".into(),
        })
    );
    assert!(matches!(
        actor.create::<Player>(ArgList::new()),
        Err(CallError::NotDerived { .. })
    ));
}
