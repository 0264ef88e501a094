//! Contains `Optional`, a wrapper that remembers whether its value was confirmed present.

use std::{any::type_name, borrow::Cow};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use core_extensions::SelfOps;

use crate::errors::{AbsentValueError, NIL_VALUE_MESSAGE};


/// The state of an [`Optional`], returned by [`Optional::state`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum OptionalState {
    /// The value was present when the `Optional` was constructed.
    Present,
    /// There is no value.
    Absent,
    /// The value was absent and a default was substituted.
    Defaulted,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum Slot<T> {
    Present(T),
    Absent,
    Defaulted(T),
}

/// A value that may be absent,
/// which tracks whether it was initialized with a present value.
///
/// An `Optional` is constructed with either:
///
/// - [`require_present`](#method.require_present):
/// treats an absent candidate as an error.
///
/// - [`from_nillable`](#method.from_nillable):
/// treats an absent candidate as a normal state.
///
/// An absent `Optional` can then be filled in with
/// [`with_default`](#method.with_default),
/// which does not make it [present](#method.is_present).
///
/// # Example
///
/// ```
/// use guarded_optional::Optional;
///
/// let name = Optional::require_present(Some("test")).unwrap();
/// assert!(name.is_present());
/// assert_eq!(name.value(), Some(&"test"));
///
/// let nick = Optional::from_nillable(None).with_default("anon");
/// assert!(!nick.is_present());
/// assert_eq!(nick.value(), Some(&"anon"));
///
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Optional<T> {
    slot: Slot<T>,
}

#[allow(clippy::missing_const_for_fn)]
impl<T> Optional<T> {
    /// Constructs an `Optional` from `candidate`,
    /// returning an error with the [`NIL_VALUE_MESSAGE`] message if it is `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::{Optional, NIL_VALUE_MESSAGE};
    ///
    /// let opt = Optional::require_present(Some(12)).unwrap();
    /// assert!(opt.is_present());
    ///
    /// let err = Optional::require_present(None::<u32>).unwrap_err();
    /// assert_eq!(err.message(), NIL_VALUE_MESSAGE);
    /// assert!(!err.optional().is_present());
    ///
    /// ```
    pub fn require_present(candidate: Option<T>) -> Result<Self, AbsentValueError<Self>> {
        Self::require_present_with_message(candidate, NIL_VALUE_MESSAGE)
    }

    /// Constructs an `Optional` from `candidate`,
    /// returning an error with `message` if it is `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::Optional;
    ///
    /// let err = Optional::require_present_with_message(None::<u32>, "the id is required")
    ///     .unwrap_err();
    ///
    /// assert_eq!(err.to_string(), "the id is required");
    ///
    /// ```
    pub fn require_present_with_message<M>(
        candidate: Option<T>,
        message: M,
    ) -> Result<Self, AbsentValueError<Self>>
    where
        M: Into<Cow<'static, str>>,
    {
        match candidate {
            Some(value) => Ok(Self::present(value)),
            None => {
                let message = message.into();
                log::trace!(
                    "required Optional<{}> was absent: {}",
                    type_name::<T>(),
                    message
                );
                Err(AbsentValueError::new(Self::absent(), message))
            }
        }
    }

    /// Constructs an `Optional` from `candidate`, which may be absent.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::{Optional, OptionalState};
    ///
    /// assert_eq!(Optional::from_nillable(Some(3)).state(), OptionalState::Present);
    /// assert_eq!(Optional::from_nillable(None::<u8>).state(), OptionalState::Absent);
    ///
    /// ```
    pub fn from_nillable(candidate: Option<T>) -> Self {
        match candidate {
            Some(value) => Self::present(value),
            None => {
                log::trace!("constructed an absent Optional<{}>", type_name::<T>());
                Self::absent()
            }
        }
    }

    /// Constructs an `Optional` holding a value known to be present.
    #[inline]
    pub const fn present(value: T) -> Self {
        Self {
            slot: Slot::Present(value),
        }
    }

    /// Constructs an absent `Optional`.
    #[inline]
    pub const fn absent() -> Self {
        Self { slot: Slot::Absent }
    }

    #[inline]
    pub(crate) const fn defaulted(value: T) -> Self {
        Self {
            slot: Slot::Defaulted(value),
        }
    }

    /// Whether this was initialized with a present value.
    ///
    /// Substituting a default does not make an `Optional` present.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::Optional;
    ///
    /// assert!(Optional::from_nillable(Some(10)).is_present());
    /// assert!(!Optional::from_nillable(None::<u32>).is_present());
    /// assert!(!Optional::from_nillable(None::<u32>).with_default(7).is_present());
    ///
    /// ```
    #[inline]
    pub const fn is_present(&self) -> bool {
        matches!(self.slot, Slot::Present { .. })
    }

    /// Whether the value was absent and a default was substituted.
    #[inline]
    pub const fn is_defaulted(&self) -> bool {
        matches!(self.slot, Slot::Defaulted { .. })
    }

    /// Returns which of the three states this `Optional` is in.
    pub const fn state(&self) -> OptionalState {
        match self.slot {
            Slot::Present { .. } => OptionalState::Present,
            Slot::Absent => OptionalState::Absent,
            Slot::Defaulted { .. } => OptionalState::Defaulted,
        }
    }

    /// Gets the held value,
    /// which is either the present value or a substituted default.
    ///
    /// Use [`is_present`](#method.is_present) to tell those two apart.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::Optional;
    ///
    /// assert_eq!(Optional::from_nillable(Some(10)).value(), Some(&10));
    /// assert_eq!(Optional::from_nillable(None::<u32>).value(), None);
    /// assert_eq!(Optional::from_nillable(None).with_default(5).value(), Some(&5));
    ///
    /// ```
    pub fn value(&self) -> Option<&T> {
        match &self.slot {
            Slot::Present(v) | Slot::Defaulted(v) => Some(v),
            Slot::Absent => None,
        }
    }

    /// Gets a mutable reference to the held value.
    ///
    /// Mutating the value does not change the state of the `Optional`.
    pub fn value_mut(&mut self) -> Option<&mut T> {
        match &mut self.slot {
            Slot::Present(v) | Slot::Defaulted(v) => Some(v),
            Slot::Absent => None,
        }
    }

    /// Unwraps this `Optional`, returning the held value.
    pub fn into_value(self) -> Option<T> {
        match self.slot {
            Slot::Present(v) | Slot::Defaulted(v) => Some(v),
            Slot::Absent => None,
        }
    }

    /// Unwraps this `Optional`, returning the value only if it was present.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::Optional;
    ///
    /// assert_eq!(Optional::from_nillable(Some(10)).into_present(), Some(10));
    /// assert_eq!(Optional::from_nillable(None).with_default(5).into_present(), None);
    ///
    /// ```
    pub fn into_present(self) -> Option<T> {
        match self.slot {
            Slot::Present(v) => Some(v),
            Slot::Absent | Slot::Defaulted(_) => None,
        }
    }

    /// Converts from `&Optional<T>` to `Optional<&T>`, keeping the state.
    pub fn as_ref(&self) -> Optional<&T> {
        let slot = match &self.slot {
            Slot::Present(v) => Slot::Present(v),
            Slot::Absent => Slot::Absent,
            Slot::Defaulted(v) => Slot::Defaulted(v),
        };
        Optional { slot }
    }

    /// Substitutes `def` for the value if this `Optional` isn't present.
    ///
    /// Calling this on a present `Optional` leaves it unchanged,
    /// calling it on a defaulted one replaces the previous default.
    ///
    /// The returned `Optional` is still not [present](#method.is_present).
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::Optional;
    ///
    /// let opt = Optional::from_nillable(Some(12)).with_default(13);
    /// assert_eq!(opt.value(), Some(&12));
    /// assert!(opt.is_present());
    ///
    /// let opt = Optional::from_nillable(None).with_default(13);
    /// assert_eq!(opt.value(), Some(&13));
    /// assert!(!opt.is_present());
    ///
    /// ```
    pub fn with_default(self, def: T) -> Self {
        self.with_default_else(|| def)
    }

    /// Substitutes the return value of `f` for the value if this `Optional` isn't present.
    ///
    /// `f` is only called when the value is substituted.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::Optional;
    ///
    /// let opt = Optional::from_nillable(Some(3)).with_default_else(|| unreachable!());
    /// assert_eq!(opt.value(), Some(&3));
    ///
    /// let opt = Optional::from_nillable(None).with_default_else(|| 3 * 7);
    /// assert_eq!(opt.value(), Some(&21));
    ///
    /// ```
    pub fn with_default_else<F>(self, f: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match self.slot {
            Slot::Present { .. } => self,
            Slot::Absent | Slot::Defaulted { .. } => {
                log::debug!(
                    "substituting a default for an absent Optional<{}>",
                    type_name::<T>()
                );
                Self::defaulted(f())
            }
        }
    }

    /// Substitutes `T::default()` for the value if this `Optional` isn't present.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::Optional;
    ///
    /// let opt = Optional::<String>::absent().with_type_default();
    /// assert_eq!(opt.value().map(|s| s.as_str()), Some(""));
    ///
    /// ```
    pub fn with_type_default(self) -> Self
    where
        T: Default,
    {
        self.with_default_else(T::default)
    }
}

/// The default value is an absent `Optional`.
impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(candidate: Option<T>) -> Self {
        Self::from_nillable(candidate)
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(this: Optional<T>) -> Self {
        this.into_value()
    }
}

/////////////////////////////////////////////////////////////////////

#[derive(Serialize)]
struct SerializeProxy<'a, T> {
    value: Option<&'a T>,
    state: OptionalState,
}

#[derive(Deserialize)]
struct DeserializeProxy<T> {
    value: Option<T>,
    state: OptionalState,
}

impl<T> Optional<T> {
    fn from_proxy(proxy: DeserializeProxy<T>) -> Result<Self, String> {
        match (proxy.state, proxy.value) {
            (OptionalState::Present, Some(v)) => Ok(Self::present(v)),
            (OptionalState::Defaulted, Some(v)) => Ok(Self::defaulted(v)),
            (OptionalState::Absent, None) => Ok(Self::absent()),
            (OptionalState::Absent, Some(_)) => {
                Err("an `Absent` Optional can't hold a value".to_string())
            }
            (state, None) => Err(format!("a `{:?}` Optional must hold a value", state)),
        }
    }
}

impl<T> Serialize for Optional<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializeProxy {
            value: self.value(),
            state: self.state(),
        }
        .serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Optional<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        DeserializeProxy::<T>::deserialize(deserializer)?
            .piped(Self::from_proxy)
            .map_err(de::Error::custom)
    }
}
