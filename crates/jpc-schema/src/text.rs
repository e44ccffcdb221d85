//! # Text Renderer
//!
//! Renders values as a compact JSON subset:
//!
//! ```text
//! object := '{' (member (',' member)*)? '}'
//! member := '"' name '"' ':' value
//! array  := '[' (value (',' value)*)? ']'
//! value  := 'true' | 'false' | 'null' | number | '"' text '"' | object | array
//! ```
//!
//! No whitespace is emitted. Plain [`string`](crate::string) schemas wrap
//! text in quotes without escaping anything inside; callers must keep `"`
//! and control characters out of such values or opt into
//! [`Str::escaped`](crate::Str::escaped).
//!
//! Rendering goes through [`Text`], a borrowed, lazily written value that
//! only schemas can construct. It is meant to be consumed where it is
//! created, by `format!`, `write!` or `to_string`.

use std::fmt;
use std::sync::Arc;

/// A schema that can render a `T` as text.
pub trait TextSchema<T: ?Sized> {
    /// Write the rendering of `value` to `out`.
    fn write_text(&self, value: &T, out: &mut dyn fmt::Write) -> fmt::Result;

    /// A displayable rendering of `value` that borrows both the schema and
    /// the value. Nothing is written until it is formatted.
    fn to_text<'a>(&'a self, value: &'a T) -> Text<'a, T, Self>
    where
        Self: Sized,
    {
        Text::new(self, value)
    }

    /// Render `value` into a fresh string.
    ///
    /// # Errors
    ///
    /// Whatever [`write_text`](Self::write_text) reports. The built-in
    /// schemas fail only where a string schema cannot escape its value.
    fn to_text_string(&self, value: &T) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.write_text(value, &mut out)?;
        Ok(out)
    }
}

impl<T: ?Sized, S: TextSchema<T> + ?Sized> TextSchema<T> for &S {
    fn write_text(&self, value: &T, out: &mut dyn fmt::Write) -> fmt::Result {
        (**self).write_text(value, out)
    }
}

impl<T: ?Sized, S: TextSchema<T> + ?Sized> TextSchema<T> for Arc<S> {
    fn write_text(&self, value: &T, out: &mut dyn fmt::Write) -> fmt::Result {
        (**self).write_text(value, out)
    }
}

/// The text rendering of one value, written on demand.
///
/// Obtained from [`TextSchema::to_text`]; there is no public constructor.
pub struct Text<'a, T: ?Sized, S> {
    schema: &'a S,
    value: &'a T,
}

impl<'a, T: ?Sized, S> Text<'a, T, S> {
    pub(crate) fn new(schema: &'a S, value: &'a T) -> Self {
        Self { schema, value }
    }
}

impl<T: ?Sized, S: TextSchema<T>> fmt::Display for Text<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.schema.write_text(self.value, f)
    }
}

impl<T: ?Sized, S: TextSchema<T>> fmt::Debug for Text<'_, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Text").field(&format_args!("{self}")).finish()
    }
}

/// Write `items` separated by commas, each rendered by `write_item`.
pub(crate) fn write_joined<I>(
    out: &mut dyn fmt::Write,
    items: I,
    mut write_item: impl FnMut(I::Item, &mut dyn fmt::Write) -> fmt::Result,
) -> fmt::Result
where
    I: IntoIterator,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write_item(item, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes a prefix, then fails.
    struct Failing;

    impl TextSchema<str> for Failing {
        fn write_text(&self, value: &str, out: &mut dyn fmt::Write) -> fmt::Result {
            out.write_str(value)?;
            Err(fmt::Error)
        }
    }

    struct Plain;

    impl TextSchema<str> for Plain {
        fn write_text(&self, value: &str, out: &mut dyn fmt::Write) -> fmt::Result {
            out.write_str(value)
        }
    }

    #[test]
    fn test_to_text_string_propagates_write_error() {
        assert_eq!(Failing.to_text_string("x"), Err(fmt::Error));
        assert_eq!(Plain.to_text_string("x"), Ok("x".to_string()));
    }

    #[test]
    fn test_text_display_and_debug() {
        let text = Plain.to_text("ab");
        assert_eq!(text.to_string(), "ab");
        assert_eq!(format!("{text:?}"), "Text(ab)");
    }

    #[test]
    fn test_write_joined() {
        let mut out = String::new();
        write_joined(&mut out, ["a", "b", "c"], |item, out| out.write_str(item)).unwrap();
        assert_eq!(out, "a,b,c");
    }
}
