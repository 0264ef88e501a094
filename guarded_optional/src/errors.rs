//! The errors produced when constructing or defaulting optionals.

use std::{
    borrow::Cow,
    error::Error as ErrorTrait,
    fmt::{self, Debug, Display},
};

use crate::erased::DeclaredType;

/// The message of an [`AbsentValueError`] when the caller did not supply one.
pub const NIL_VALUE_MESSAGE: &str = "Given value was nil";

///////////////////////////////////////////////////////////////////////////////

/// Returned by the `require_present*` constructors when the candidate value was absent.
///
/// This is a recoverable error:
/// it carries the absent optional (`O`),
/// which can be taken back out with [`into_optional`](#method.into_optional)
/// to substitute a default.
///
/// # Example
///
/// ```
/// use guarded_optional::{Optional, OptionalState};
///
/// let err = Optional::require_present_with_message(None::<u8>, "no port configured")
///     .unwrap_err();
///
/// assert_eq!(err.message(), "no port configured");
/// assert_eq!(err.optional().state(), OptionalState::Absent);
///
/// let port = err.into_optional().with_default(80);
/// assert_eq!(port.value(), Some(&80));
/// ```
pub struct AbsentValueError<O> {
    optional: O,
    message: Cow<'static, str>,
}

impl<O> AbsentValueError<O> {
    pub(crate) fn new(optional: O, message: Cow<'static, str>) -> Self {
        Self { optional, message }
    }

    /// The human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets a reference to the absent optional.
    pub fn optional(&self) -> &O {
        &self.optional
    }

    /// Unwraps this error, returning the absent optional.
    pub fn into_optional(self) -> O {
        self.optional
    }
}

impl<O> Debug for AbsentValueError<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbsentValueError")
            .field("message", &self.message)
            .finish()
    }
}

impl<O> Display for AbsentValueError<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.message)
    }
}

impl<O> ErrorTrait for AbsentValueError<O> {}

///////////////////////////////////////////////////////////////////////////////

/// A default value whose type differs from the type an
/// [`ErasedOptional`](crate::ErasedOptional) was bound to.
///
/// [`ErasedOptional::with_default`](crate::ErasedOptional::with_default)
/// panics with this as the payload,
/// while [`ErasedOptional::try_with_default`](crate::ErasedOptional::try_with_default)
/// returns it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TypeMismatch {
    given: DeclaredType,
    declared: DeclaredType,
}

impl TypeMismatch {
    pub(crate) const fn new(given: DeclaredType, declared: DeclaredType) -> Self {
        Self { given, declared }
    }

    /// The type of the rejected default value.
    pub const fn given(&self) -> DeclaredType {
        self.given
    }

    /// The type the optional was bound to.
    pub const fn declared(&self) -> DeclaredType {
        self.declared
    }
}

impl Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The given type {} cannot be used with an Optional of type {}",
            self.given, self.declared,
        )
    }
}

impl ErrorTrait for TypeMismatch {}

///////////////////////////////////////////////////////////////////////////////
