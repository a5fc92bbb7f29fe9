//! Errors raised by set construction, mutation and pattern compilation.

use std::fmt;

/// A type alias for dealing with errors returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised by a set operation or by the pattern compiler.
///
/// This includes the specific kind of error and, for pattern errors, the
/// character offset and a fragment of the pattern around the failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    position: Option<usize>,
    fragment: Option<String>,
}

/// The specific type of error that can occur.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A value outside `0..=0x10FFFF` was given where a code point was required.
    InvalidCodePoint(u32),
    /// A range was given whose start is not smaller than its end where a
    /// strict range was required, e.g., `[z-a]`.
    InvalidRange {
        /// The first code point of the range.
        start: u32,
        /// The last code point of the range.
        end: u32,
    },
    /// An attempt was made to add the empty string as a member.
    InvalidMember,
    /// The pattern violates the pattern grammar.
    PatternSyntax(String),
    /// A property name or a property value name could not be resolved.
    UnknownProperty {
        /// The property name as written.
        name: String,
        /// The value name as written. Empty if no value was given.
        value: String,
    },
    /// A mutation was attempted on a frozen set.
    Frozen,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            position: None,
            fragment: None,
        }
    }

    pub(crate) fn invalid_code_point(c: u32) -> Self {
        Error::new(ErrorKind::InvalidCodePoint(c))
    }

    pub(crate) fn invalid_member() -> Self {
        Error::new(ErrorKind::InvalidMember)
    }

    pub(crate) fn frozen() -> Self {
        Error::new(ErrorKind::Frozen)
    }

    pub(crate) fn unknown_property(name: &str, value: &str) -> Self {
        Error::new(ErrorKind::UnknownProperty {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::PatternSyntax(message.into()))
    }

    /// Attaches the location of a pattern error.
    pub(crate) fn at(mut self, position: usize, fragment: impl Into<String>) -> Self {
        self.position = Some(position);
        self.fragment = Some(fragment.into());
        self
    }

    /// Returns the type of the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the approximate character offset in the pattern at which the
    /// error occurred, if the error was raised by the pattern compiler.
    ///
    /// The offset may be equal to the number of characters in the pattern, in
    /// which case it points to the end of the pattern.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Returns the part of the pattern surrounding the error, if the error
    /// was raised by the pattern compiler.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns `true` if the error is caused by a caller bug rather than by
    /// invalid user input, e.g. an invalid code point passed to a mutator or
    /// the mutation of a frozen set.
    pub fn is_programming_error(&self) -> bool {
        !self.is_input_error()
    }

    /// Returns `true` if the error signals invalid user input, i.e., a
    /// malformed pattern or an unknown property.
    ///
    /// Every error raised by the pattern compiler carries a position and is
    /// an input error, including reversed ranges such as `[z-a]`.
    pub fn is_input_error(&self) -> bool {
        self.position.is_some()
            || matches!(
                self.kind,
                ErrorKind::PatternSyntax(_) | ErrorKind::UnknownProperty { .. }
            )
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.fragment, self.position) {
            (Some(fragment), Some(position)) => write!(
                f,
                "error parsing pattern near '{}' at character offset {}: {}",
                fragment, position, self.kind
            ),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorKind::*;
        match self {
            InvalidCodePoint(c) => write!(
                f,
                "invalid code point {:#X}: code points must not exceed U+10FFFF",
                c
            ),
            InvalidRange { start, end } => write!(
                f,
                "invalid range U+{:04X}-U+{:04X}: ranges must start with the smaller code point",
                start, end
            ),
            InvalidMember => write!(f, "the empty string cannot be a set member"),
            PatternSyntax(message) => write!(f, "{}", message),
            UnknownProperty { name, value } if value.is_empty() => {
                write!(f, "unknown property '{}'", name)
            }
            UnknownProperty { name, value } => {
                write!(f, "unknown property value '{}={}'", name, value)
            }
            Frozen => write!(f, "attempt to modify a frozen set"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_location() {
        let err = Error::syntax("Missing ']'").at(4, "[abc");
        assert_eq!(
            err.to_string(),
            "error parsing pattern near '[abc' at character offset 4: Missing ']'"
        );
        assert_eq!(err.position(), Some(4));
        assert_eq!(err.fragment(), Some("[abc"));
    }

    #[test]
    fn test_classification() {
        assert!(Error::frozen().is_programming_error());
        assert!(Error::invalid_code_point(0x110000).is_programming_error());
        assert!(Error::invalid_member().is_programming_error());
        assert!(Error::syntax("x").is_input_error());
        assert!(Error::unknown_property("Foo", "").is_input_error());
        let reversed = Error::new(ErrorKind::InvalidRange {
            start: 'z' as u32,
            end: 'a' as u32,
        });
        assert!(reversed.is_programming_error());
        let located = reversed.at(4, "[z-a]");
        assert!(located.is_input_error());
        assert!(!located.is_programming_error());
    }

    #[test]
    fn test_display_unknown_property() {
        assert_eq!(
            Error::unknown_property("gc", "Xx").to_string(),
            "unknown property value 'gc=Xx'"
        );
        assert_eq!(
            Error::unknown_property("Foo", "").to_string(),
            "unknown property 'Foo'"
        );
    }
}
