//! Textual snapshots of an object's properties, for configuration and scene files.

use crate::{ClassDescriptor, Reflect, TypeRegistry, func::ArgList, func::CallError};
use alloc::boxed::Box;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What [`PropertySheet::apply`] does with an entry naming a property the class does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownPropertyPolicy {
    /// Log a warning and skip the entry.
    #[default]
    Warn,
    /// Skip the entry silently.
    Ignore,
    /// Stop and return [`CallError::MemberNotFound`].
    Fail,
}

/// What [`PropertySheet::apply`] does with an entry whose text does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseFailurePolicy {
    /// Log a warning and write the property's default value, if it has one.
    #[default]
    RestoreDefault,
    /// Log a warning and leave the property as it is.
    Keep,
    /// Stop and return the error.
    Fail,
}

/// Settings for [`PropertySheet::apply`]. The default logs problems and carries on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Handling of entries naming unknown properties.
    pub unknown_property: UnknownPropertyPolicy,
    /// Handling of entries that fail to parse.
    pub parse_failure: ParseFailurePolicy,
}

impl ApplyOptions {
    /// Options that turn every problem into an error.
    pub const STRICT: Self = Self {
        unknown_property: UnknownPropertyPolicy::Fail,
        parse_failure: ParseFailurePolicy::Fail,
    };
}

/// What happened to the entries of a sheet during [`PropertySheet::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Entries written into the object.
    pub applied: usize,
    /// Entries naming properties the class does not have.
    pub unknown: usize,
    /// Entries that failed to parse and were replaced by the property default.
    pub restored: usize,
    /// Entries left unapplied: read-only properties and unparsable values kept as they were.
    pub skipped: usize,
}

/// The properties of one object, written as text and keyed by property name.
///
/// A sheet names its class, so it can be turned back into an object by
/// [`instantiate`](Self::instantiate) with nothing but a [`TypeRegistry`]. Entries keep their
/// insertion order and are applied in that order.
///
/// ```
/// use prism_reflect::{ApplyOptions, ClassBuilder, PropertySheet, reflect_class};
///
/// #[derive(Default)]
/// struct Light {
///     intensity: f32,
/// }
///
/// reflect_class!(Light);
///
/// let class = ClassBuilder::<Light>::new("Light")
///     .property("Intensity", |l: &Light| l.intensity, |l: &mut Light, v: f32| l.intensity = v)
///     .build();
///
/// let mut light = Light::default();
/// let sheet = PropertySheet::new("Light").with("Intensity", "0.75");
/// let report = sheet.apply(&class, &mut light, &ApplyOptions::default()).unwrap();
/// assert_eq!((report.applied, light.intensity), (1, 0.75));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySheet {
    class: String,
    #[serde(default)]
    properties: IndexMap<String, String>,
}

impl PropertySheet {
    /// Creates an empty sheet for the class `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            properties: IndexMap::new(),
        }
    }

    /// Records every readable property of `object`, base class properties first.
    ///
    /// Properties whose value type has no textual form are left out.
    pub fn capture(class: &ClassDescriptor, object: &dyn Reflect) -> Result<Self, CallError> {
        let mut sheet = Self::new(class.name());
        for (owner, property) in class.all_properties() {
            let target = class
                .upcast(object, owner)
                .ok_or_else(|| CallError::NotDerived {
                    expected: class.name().into(),
                    received: object.reflect_type().name().into(),
                })?;
            if !property.value_type().is_textual() {
                continue;
            }
            sheet.insert(property.name(), property.get_as_string(target)?);
        }
        Ok(sheet)
    }

    /// Adds an entry, replacing any previous value of `name`.
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Adds an entry, returning the previous value of `name`.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.properties.insert(name.into(), text.into())
    }

    /// Returns the text recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// The name of the class the sheet describes.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the sheet has no entries.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Writes every entry into `object`, an object of `class` or of a class derived from it.
    ///
    /// Problems with single entries are handled as `options` say. Errors that concern the
    /// object as a whole, such as an object of the wrong class, are always returned.
    pub fn apply(
        &self,
        class: &ClassDescriptor,
        object: &mut dyn Reflect,
        options: &ApplyOptions,
    ) -> Result<ApplyReport, CallError> {
        let mut report = ApplyReport::default();
        for (name, text) in &self.properties {
            let Some((_, property)) = class.find_property(name) else {
                report.unknown += 1;
                match options.unknown_property {
                    UnknownPropertyPolicy::Warn => {
                        warn!("`{}` has no property `{name}`, skipping it", class.name());
                    }
                    UnknownPropertyPolicy::Ignore => {}
                    UnknownPropertyPolicy::Fail => {
                        return Err(CallError::MemberNotFound {
                            class: class.name().into(),
                            member: name.clone(),
                        });
                    }
                }
                continue;
            };
            if property.is_read_only() {
                warn!("property `{}::{name}` is read-only, skipping it", class.name());
                report.skipped += 1;
                continue;
            }
            let error = match class.set_property_str(&mut *object, name, text) {
                Ok(()) => {
                    report.applied += 1;
                    continue;
                }
                Err(error @ (CallError::Parse(_) | CallError::Arg(_))) => error,
                Err(error) => return Err(error),
            };
            match options.parse_failure {
                ParseFailurePolicy::RestoreDefault if property.has_default() => {
                    warn!(
                        "cannot set `{}::{name}` to {text:?} ({error}), restoring its default",
                        class.name()
                    );
                    class.restore_default(&mut *object, name)?;
                    report.restored += 1;
                }
                ParseFailurePolicy::RestoreDefault | ParseFailurePolicy::Keep => {
                    warn!(
                        "cannot set `{}::{name}` to {text:?} ({error}), keeping its value",
                        class.name()
                    );
                    report.skipped += 1;
                }
                ParseFailurePolicy::Fail => return Err(error),
            }
        }
        Ok(report)
    }

    /// Creates an object of the sheet's class with its argument-less constructor and applies
    /// the sheet to it.
    ///
    /// Returns `Ok(None)` if `registry` does not know the class.
    pub fn instantiate(
        &self,
        registry: &TypeRegistry,
        options: &ApplyOptions,
    ) -> Result<Option<Box<dyn Reflect>>, CallError> {
        let Some(class) = registry.get_class_type(&self.class) else {
            warn!("class `{}` is not registered, skipping its sheet", self.class);
            return Ok(None);
        };
        let mut object = class.create_dynamic(ArgList::new())?;
        self.apply(&class, object.as_mut(), options)?;
        Ok(Some(object))
    }
}

impl<'a> IntoIterator for &'a PropertySheet {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassBuilder, reflect_class, reflect_enum};
    use alloc::sync::Arc;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    enum Anchor {
        #[default]
        TopLeft,
        Center,
    }

    reflect_enum!(Anchor { TopLeft, Center });

    #[derive(Default)]
    struct Element {
        anchor: Anchor,
        id: u32,
    }

    #[derive(Default)]
    struct Text {
        element: Element,
        content: String,
        size: f32,
    }

    reflect_class!(Element);
    reflect_class!(Text);

    fn element_class() -> Arc<ClassDescriptor> {
        Arc::new(
            ClassBuilder::<Element>::new("Element")
                .constructor(Element::default)
                .property("Anchor", |e: &Element| e.anchor, |e: &mut Element, v| e.anchor = v)
                .read_only_property("Id", |e: &Element| e.id)
                .build(),
        )
    }

    fn text_class() -> ClassDescriptor {
        ClassBuilder::<Text>::new("Text")
            .base(element_class(), |t: &Text| &t.element, |t: &mut Text| &mut t.element)
            .constructor(Text::default)
            .property("Content", |t: &Text| t.content.clone(), |t: &mut Text, v| t.content = v)
            .property("Size", |t: &Text| t.size, |t: &mut Text, v: f32| t.size = v)
            .default_value("Size", 14.0_f32)
            .build()
    }

    #[test]
    fn should_capture_base_properties_first() {
        let class = text_class();
        let text = Text {
            element: Element {
                anchor: Anchor::Center,
                id: 7,
            },
            content: "hi".into(),
            size: 9.5,
        };

        let sheet = PropertySheet::capture(&class, &text).unwrap();
        assert_eq!(sheet.class(), "Text");
        assert_eq!(
            sheet.iter().collect::<Vec<_>>(),
            [
                ("Anchor", "Center"),
                ("Id", "7"),
                ("Content", "hi"),
                ("Size", "9.5")
            ]
        );
    }

    #[test]
    fn should_log_and_continue_by_default() {
        let class = text_class();
        let mut text = Text::default();
        let sheet = PropertySheet::new("Text")
            .with("Anchor", "Center")
            .with("Id", "3")
            .with("Size", "huge")
            .with("Color", "red");

        let report = sheet
            .apply(&class, &mut text, &ApplyOptions::default())
            .unwrap();
        assert_eq!(
            report,
            ApplyReport {
                applied: 1,
                unknown: 1,
                restored: 1,
                skipped: 1,
            }
        );
        assert_eq!(text.element.anchor, Anchor::Center);
        assert_eq!(text.element.id, 0);
        assert_eq!(text.size, 14.0);
    }

    #[test]
    fn should_fail_when_strict() {
        let class = text_class();
        let mut text = Text::default();

        let unknown = PropertySheet::new("Text").with("Color", "red");
        assert!(matches!(
            unknown.apply(&class, &mut text, &ApplyOptions::STRICT),
            Err(CallError::MemberNotFound { .. })
        ));

        let malformed = PropertySheet::new("Text").with("Size", "huge");
        assert!(matches!(
            malformed.apply(&class, &mut text, &ApplyOptions::STRICT),
            Err(CallError::Parse(_))
        ));

        let options = ApplyOptions {
            parse_failure: ParseFailurePolicy::Keep,
            ..Default::default()
        };
        text.size = 2.0;
        let report = malformed.apply(&class, &mut text, &options).unwrap();
        assert_eq!((report.skipped, text.size), (1, 2.0));
    }

    #[test]
    fn should_round_trip_through_ron() {
        let sheet = PropertySheet::new("Text")
            .with("Content", "hello")
            .with("Size", "12");

        let text = ron::ser::to_string_pretty(&sheet, Default::default()).unwrap();
        let parsed: PropertySheet = ron::from_str(&text).unwrap();
        assert_eq!(parsed, sheet);

        let registry = TypeRegistry::new();
        registry.register_class_type("Text", Arc::new(text_class()));
        let object = parsed
            .instantiate(&registry, &ApplyOptions::default())
            .unwrap()
            .unwrap();
        let text = object.downcast_ref::<Text>().unwrap();
        assert_eq!((text.content.as_str(), text.size), ("hello", 12.0));

        let missing = PropertySheet::new("Missing");
        assert!(missing
            .instantiate(&registry, &ApplyOptions::default())
            .unwrap()
            .is_none());
    }
}
