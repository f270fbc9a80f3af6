use crate::{ParseError, Typed};

/// A named value of an enum or flag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    name: &'static str,
    value: i64,
}

impl EnumVariant {
    /// The name of the variant.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The discriminant of the variant, or its bits for flags.
    pub fn value(&self) -> i64 {
        self.value
    }
}

/// The variants of an enum, or the named bits of a flag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    variants: Vec<EnumVariant>,
    is_flags: bool,
}

impl EnumInfo {
    /// Describes a plain enum from `(name, discriminant)` pairs.
    pub fn new(variants: impl IntoIterator<Item = (&'static str, i64)>) -> Self {
        Self {
            variants: variants
                .into_iter()
                .map(|(name, value)| EnumVariant { name, value })
                .collect(),
            is_flags: false,
        }
    }

    /// Describes a flag set from `(name, bits)` pairs.
    pub fn flags(variants: impl IntoIterator<Item = (&'static str, i64)>) -> Self {
        Self {
            is_flags: true,
            ..Self::new(variants)
        }
    }

    /// Returns `true` for flag sets.
    pub fn is_flags(&self) -> bool {
        self.is_flags
    }

    /// The variants in declaration order.
    pub fn variants(&self) -> &[EnumVariant] {
        &self.variants
    }

    /// The value of the variant called `name`.
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|variant| variant.name == name)
            .or_else(|| {
                self.variants
                    .iter()
                    .find(|variant| variant.name.eq_ignore_ascii_case(name))
            })
            .map(EnumVariant::value)
    }

    /// The name of the first variant with the given value.
    pub fn name_of(&self, value: i64) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|variant| variant.value == value)
            .map(EnumVariant::name)
    }

    /// Parses a variant name or a number.
    ///
    /// Flag sets accept any number of names and numbers separated by `|`, and the empty
    /// string as the empty set.
    pub fn parse(&self, text: &str) -> Result<i64, String> {
        let text = text.trim();
        if !self.is_flags {
            return self.parse_token(text);
        }
        if text.is_empty() {
            return Ok(0);
        }
        text.split('|')
            .map(|token| self.parse_token(token.trim()))
            .try_fold(0, |bits, token| Ok(bits | token?))
    }

    fn parse_token(&self, token: &str) -> Result<i64, String> {
        if let Some(value) = self.value_of(token) {
            return Ok(value);
        }
        match token.parse::<i64>() {
            Ok(value) if self.is_flags || self.name_of(value).is_some() => Ok(value),
            _ => Err(format!("`{token}` is not a known variant")),
        }
    }

    /// Formats a value as its variant name.
    ///
    /// Flag sets join the names of all contained flags with `|`. Bits without a name are
    /// appended as a number, and the empty set is written as `0` unless a variant names it.
    pub fn format(&self, value: i64) -> String {
        if !self.is_flags || value == 0 {
            return match self.name_of(value) {
                Some(name) => name.to_owned(),
                None => value.to_string(),
            };
        }

        let mut names = Vec::new();
        let mut remaining = value;
        for variant in &self.variants {
            if variant.value != 0 && remaining & variant.value == variant.value {
                names.push(variant.name.to_owned());
                remaining &= !variant.value;
            }
        }
        if remaining != 0 {
            names.push(remaining.to_string());
        }
        names.join("|")
    }
}

/// A fieldless enum or a set of bit flags.
///
/// Implemented by [`reflect_enum!`](crate::reflect_enum) and
/// [`reflect_flags!`](crate::reflect_flags).
pub trait ReflectEnum: Typed + Sized {
    /// Builds the variant table of the type.
    fn enum_info() -> EnumInfo;

    /// The discriminant of the value, or its bits for flags.
    fn to_value(&self) -> i64;

    /// The value with the given discriminant or bits.
    fn from_value(value: i64) -> Option<Self>;
}

/// Parses an enum value by variant name. Used by the enum macros.
#[doc(hidden)]
pub fn parse_enum<T: ReflectEnum>(text: &str) -> Result<T, ParseError> {
    let ty = T::type_descriptor();
    let info = ty.enum_info().ok_or(ParseError::NotTextual {
        type_name: ty.name(),
    })?;
    let value = info
        .parse(text)
        .map_err(|reason| ParseError::malformed::<T>(text, reason))?;
    T::from_value(value).ok_or_else(|| ParseError::malformed::<T>(text, "no such value"))
}

/// Formats an enum value by variant name. Used by the enum macros.
#[doc(hidden)]
pub fn format_enum<T: ReflectEnum>(value: &T) -> String {
    let value = value.to_value();
    match T::type_descriptor().enum_info() {
        Some(info) => info.format(value),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{ParseError, TextValue, TypeKind, Typed, reflect_enum, reflect_flags};
    use bitflags::bitflags;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Anchor {
        Left,
        Center = 5,
        Right,
    }

    reflect_enum!(Anchor { Left, Center, Right });

    bitflags! {
        #[derive(Clone, Copy, Debug, PartialEq)]
        struct TextStyle: u32 {
            const BOLD = 1;
            const ITALIC = 1 << 1;
            const UNDERLINE = 1 << 2;
        }
    }

    reflect_flags!(TextStyle { BOLD, ITALIC, UNDERLINE });

    bitflags! {
        #[derive(Clone, Copy, Debug, PartialEq)]
        struct Channels: u8 {
            const RED = 1;
            const GREEN = 1 << 1;
            const BLUE = 1 << 2;
        }
    }

    reflect_flags!(Channels { RED, GREEN, BLUE });

    #[test]
    fn should_describe_enum_variants() {
        let ty = Anchor::type_descriptor();
        assert_eq!(ty.name(), "Anchor");
        let TypeKind::Enum(info) = ty.kind() else {
            panic!("expected an enum descriptor");
        };
        assert!(!info.is_flags());
        let variants: Vec<_> = info
            .variants()
            .iter()
            .map(|variant| (variant.name(), variant.value()))
            .collect();
        assert_eq!(variants, [("Left", 0), ("Center", 5), ("Right", 6)]);
    }

    #[test]
    fn should_parse_enum_names() {
        assert_eq!(Anchor::parse_text("Center").unwrap(), Anchor::Center);
        assert_eq!(Anchor::parse_text("right").unwrap(), Anchor::Right);
        assert_eq!(Anchor::parse_text("6").unwrap(), Anchor::Right);
        assert!(Anchor::parse_text("Middle").is_err());
        assert!(Anchor::parse_text("3").is_err());
        assert_eq!(Anchor::Left.format_text(), "Left");
    }

    #[test]
    fn should_format_flag_sets() {
        assert_eq!((TextStyle::BOLD | TextStyle::UNDERLINE).format_text(), "BOLD|UNDERLINE");
        assert_eq!(TextStyle::empty().format_text(), "0");
        assert_eq!(TextStyle::from_bits_retain(0b1010).format_text(), "ITALIC|8");
    }

    #[test]
    fn should_parse_flag_sets() {
        assert_eq!(
            TextStyle::parse_text("ITALIC | bold").unwrap(),
            TextStyle::BOLD | TextStyle::ITALIC
        );
        assert_eq!(TextStyle::parse_text("").unwrap(), TextStyle::empty());
        assert_eq!(
            TextStyle::parse_text("UNDERLINE|16").unwrap().bits(),
            0b10100
        );
        assert!(TextStyle::parse_text("BOLD|HEAVY").is_err());
    }

    #[test]
    fn should_refuse_flags_out_of_range() {
        assert_eq!(Channels::parse_text("255").unwrap().bits(), 255);
        assert_eq!(Channels::parse_text("RED|128").unwrap().bits(), 129);
        assert!(matches!(
            Channels::parse_text("256"),
            Err(ParseError::Malformed { .. })
        ));
        assert!(Channels::parse_text("BLUE|512").is_err());
        assert!(Channels::parse_text("-1").is_err());
    }

    #[test]
    fn should_parse_through_descriptor() {
        let value = TextStyle::type_descriptor().parse("BOLD").unwrap();
        assert_eq!(value.downcast_ref::<TextStyle>(), Some(&TextStyle::BOLD));
        assert_eq!(value.to_text().unwrap(), "BOLD");
    }
}
