use crate::{ParseError, TypeDescriptor, Typed, reflect_primitive};

/// Conversion between a value and its textual form.
///
/// Textual forms are what property sheets store and what string-based invocation accepts. For
/// every implementor, formatting a value and parsing the result yields an equal value.
pub trait TextValue: Typed + Sized {
    /// Parses a value from `text`.
    fn parse_text(text: &str) -> Result<Self, ParseError>;

    /// Formats the value as text.
    fn format_text(&self) -> String;
}

/// Accepts `true`/`false` in any letter case, as well as `1`/`0`.
impl TextValue for bool {
    fn parse_text(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        if text == "1" || text.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if text == "0" || text.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ParseError::malformed::<Self>(
                text,
                "expected `true`, `false`, `1` or `0`",
            ))
        }
    }

    fn format_text(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_text_value_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TextValue for $ty {
                fn parse_text(text: &str) -> Result<Self, ParseError> {
                    let text = text.trim();
                    text.parse::<$ty>()
                        .map_err(|err| ParseError::malformed::<Self>(text, err))
                }

                fn format_text(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

// Float `Display` prints the shortest text that parses back to the same value.
impl_text_value_from_str!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

impl TextValue for char {
    fn parse_text(text: &str) -> Result<Self, ParseError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ParseError::malformed::<Self>(
                text,
                "expected exactly one character",
            )),
        }
    }

    fn format_text(&self) -> String {
        self.to_string()
    }
}

impl TextValue for String {
    fn parse_text(text: &str) -> Result<Self, ParseError> {
        Ok(text.to_owned())
    }

    fn format_text(&self) -> String {
        self.clone()
    }
}

/// The unit value is written as the empty string.
impl TextValue for () {
    fn parse_text(text: &str) -> Result<Self, ParseError> {
        if text.trim().is_empty() {
            Ok(())
        } else {
            Err(ParseError::malformed::<Self>(text, "expected no value"))
        }
    }

    fn format_text(&self) -> String {
        String::new()
    }
}

reflect_primitive!(bool);
reflect_primitive!(char);
reflect_primitive!(i8);
reflect_primitive!(i16);
reflect_primitive!(i32);
reflect_primitive!(i64);
reflect_primitive!(isize);
reflect_primitive!(u8);
reflect_primitive!(u16);
reflect_primitive!(u32);
reflect_primitive!(u64);
reflect_primitive!(usize);
reflect_primitive!(f32);
reflect_primitive!(f64);
reflect_primitive!(String);
reflect_primitive!(());

/// The descriptors of every primitive type known to the crate.
pub(crate) fn builtin_primitives() -> [&'static TypeDescriptor; 16] {
    [
        bool::type_descriptor(),
        char::type_descriptor(),
        i8::type_descriptor(),
        i16::type_descriptor(),
        i32::type_descriptor(),
        i64::type_descriptor(),
        isize::type_descriptor(),
        u8::type_descriptor(),
        u16::type_descriptor(),
        u32::type_descriptor(),
        u64::type_descriptor(),
        usize::type_descriptor(),
        f32::type_descriptor(),
        f64::type_descriptor(),
        String::type_descriptor(),
        <()>::type_descriptor(),
    ]
}
