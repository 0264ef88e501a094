/*!
Contains `ErasedOptional`, an optional over a type-erased value.

Unlike [`Optional<T>`](crate::Optional),
whose default values are checked by the compiler,
`ErasedOptional` checks them when they're substituted,
against the runtime type that it was first bound to.
*/

use std::{
    any::{self, Any, TypeId},
    borrow::Cow,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    panic,
};

use crate::{
    errors::{AbsentValueError, TypeMismatch, NIL_VALUE_MESSAGE},
    optional::{Optional, OptionalState},
};

#[cfg(test)]
mod test;

/// The name of types only known through a `dyn Any`.
const ERASED_TYPE_NAME: &str = "<erased>";

///////////////////////////////////////////////////////////////////////////////

/// The runtime type that an [`ErasedOptional`] is bound to.
///
/// Two `DeclaredType`s are equal when they describe the same type,
/// regardless of the name they were given.
///
/// # Example
///
/// ```
/// use guarded_optional::DeclaredType;
///
/// let ty = DeclaredType::of::<u32>();
///
/// assert!(ty.is::<u32>());
/// assert!(!ty.is::<i32>());
/// assert_eq!(ty.name(), "u32");
///
/// let boxed: Box<dyn std::any::Any> = Box::new(3_u32);
/// assert_eq!(DeclaredType::of_val(&*boxed), ty);
///
/// ```
#[derive(Copy, Clone)]
pub struct DeclaredType {
    id: TypeId,
    name: &'static str,
}

impl DeclaredType {
    /// Constructs the `DeclaredType` of `T`.
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// Constructs the `DeclaredType` of the concrete type behind `value`.
    ///
    /// The name of the type is not recoverable from a `dyn Any`,
    /// so it is `"<erased>"`.
    pub fn of_val(value: &dyn Any) -> Self {
        Self {
            id: value.type_id(),
            name: ERASED_TYPE_NAME,
        }
    }

    /// The `TypeId` of the type.
    pub const fn type_id(&self) -> TypeId {
        self.id
    }

    /// The name of the type, for diagnostics.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this describes `T`.
    pub fn is<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for DeclaredType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DeclaredType {}

impl Hash for DeclaredType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeclaredType").field(&self.name).finish()
    }
}

impl Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name)
    }
}

///////////////////////////////////////////////////////////////////////////////

/// An optional over a type-erased value,
/// which only accepts defaults of the type it was bound to.
///
/// The type is bound when the `ErasedOptional` is constructed,
/// except for [`from_untyped(None)`](#method.from_untyped),
/// which is bound by the first default it's given.
///
/// # Example
///
/// ```
/// use guarded_optional::ErasedOptional;
///
/// let opt = ErasedOptional::from_nillable(None::<u32>).with_default(8_u32);
/// assert_eq!(opt.value_ref::<u32>(), Some(&8));
/// assert!(!opt.is_present());
///
/// ```
///
/// This one panics, because the default isn't a `u32`:
/// ```should_panic
/// use guarded_optional::ErasedOptional;
///
/// let _ = ErasedOptional::from_nillable(None::<u32>).with_default("eight");
/// ```
pub struct ErasedOptional {
    value: Option<Box<dyn Any>>,
    declared_type: Option<DeclaredType>,
    initialized: bool,
}

impl ErasedOptional {
    /// Constructs an `ErasedOptional` bound to `T`,
    /// returning an error with the [`NIL_VALUE_MESSAGE`] message if `candidate` is `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::ErasedOptional;
    ///
    /// let opt = ErasedOptional::require_present(Some("hello")).unwrap();
    /// assert_eq!(opt.value_ref::<&str>(), Some(&"hello"));
    ///
    /// let err = ErasedOptional::require_present(None::<String>).unwrap_err();
    /// assert!(err.optional().is::<String>());
    ///
    /// ```
    pub fn require_present<T>(candidate: Option<T>) -> Result<Self, AbsentValueError<Self>>
    where
        T: Any,
    {
        Self::require_present_with_message(candidate, NIL_VALUE_MESSAGE)
    }

    /// Constructs an `ErasedOptional` bound to `T`,
    /// returning an error with `message` if `candidate` is `None`.
    pub fn require_present_with_message<T, M>(
        candidate: Option<T>,
        message: M,
    ) -> Result<Self, AbsentValueError<Self>>
    where
        T: Any,
        M: Into<Cow<'static, str>>,
    {
        let this = Self::from_nillable(candidate);
        if this.initialized {
            Ok(this)
        } else {
            let message = message.into();
            log::trace!(
                "required ErasedOptional<{}> was absent: {}",
                any::type_name::<T>(),
                message
            );
            Err(AbsentValueError::new(this, message))
        }
    }

    /// Constructs an `ErasedOptional` bound to `T`, from a value which may be absent.
    pub fn from_nillable<T>(candidate: Option<T>) -> Self
    where
        T: Any,
    {
        let initialized = candidate.is_some();
        Self {
            value: candidate.map(|v| Box::new(v) as Box<dyn Any>),
            declared_type: Some(DeclaredType::of::<T>()),
            initialized,
        }
    }

    /// Constructs an `ErasedOptional` from an already erased value.
    ///
    /// If `candidate` is `Some`, this is bound to the type of the boxed value,
    /// otherwise this isn't bound to any type.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use guarded_optional::ErasedOptional;
    ///
    /// let boxed: Box<dyn Any> = Box::new(5_u8);
    /// let opt = ErasedOptional::from_untyped(Some(boxed));
    /// assert!(opt.is::<u8>());
    ///
    /// let opt = ErasedOptional::from_untyped(None);
    /// assert_eq!(opt.declared_type(), None);
    ///
    /// // The absent value carries no type, so any default is accepted.
    /// let opt = opt.with_default(String::from("anything"));
    /// assert!(opt.is::<String>());
    ///
    /// ```
    pub fn from_untyped(candidate: Option<Box<dyn Any>>) -> Self {
        let declared_type = candidate.as_deref().map(DeclaredType::of_val);
        Self {
            initialized: candidate.is_some(),
            value: candidate,
            declared_type,
        }
    }

    /// Whether this was initialized with a present value.
    #[inline]
    pub const fn is_present(&self) -> bool {
        self.initialized
    }

    /// Whether the value was absent and a default was substituted.
    #[inline]
    pub fn is_defaulted(&self) -> bool {
        !self.initialized && self.value.is_some()
    }

    /// Returns which of the three states this `ErasedOptional` is in.
    pub fn state(&self) -> OptionalState {
        match (self.initialized, &self.value) {
            (true, _) => OptionalState::Present,
            (false, Some(_)) => OptionalState::Defaulted,
            (false, None) => OptionalState::Absent,
        }
    }

    /// The type this is bound to,
    /// `None` if it was constructed from an untyped absent value.
    pub const fn declared_type(&self) -> Option<DeclaredType> {
        self.declared_type
    }

    /// Whether this is bound to `T`.
    pub fn is<T>(&self) -> bool
    where
        T: Any,
    {
        self.declared_type.map_or(false, |ty| ty.is::<T>())
    }

    /// Gets the held value, which is either the present value or a substituted default.
    pub fn value(&self) -> Option<&dyn Any> {
        self.value.as_deref()
    }

    /// Gets the held value as a `T`,
    /// returning `None` if there is no value or it isn't a `T`.
    pub fn value_ref<T>(&self) -> Option<&T>
    where
        T: Any,
    {
        self.value.as_deref()?.downcast_ref::<T>()
    }

    /// Unwraps this `ErasedOptional`, returning the held value.
    pub fn into_value(self) -> Option<Box<dyn Any>> {
        self.value
    }

    /// Substitutes `def` for the value if this isn't present.
    ///
    /// # Panics
    ///
    /// Panics with a [`TypeMismatch`] payload
    /// if this is bound to a type other than `D`,
    /// even when the value is present.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::ErasedOptional;
    ///
    /// let opt = ErasedOptional::from_nillable(Some(3_i64)).with_default(5_i64);
    /// assert_eq!(opt.value_ref::<i64>(), Some(&3));
    ///
    /// let opt = ErasedOptional::from_nillable(None::<i64>).with_default(5_i64);
    /// assert_eq!(opt.value_ref::<i64>(), Some(&5));
    ///
    /// ```
    #[track_caller]
    pub fn with_default<D>(self, def: D) -> Self
    where
        D: Any,
    {
        match self.try_with_default(def) {
            Ok(this) => this,
            Err((_, mismatch)) => type_mismatch(mismatch),
        }
    }

    /// Substitutes `def` for the value if this isn't present,
    /// returning `self` along with the mismatch if this is bound to a type other than `D`.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::{DeclaredType, ErasedOptional};
    ///
    /// let (opt, mismatch) = ErasedOptional::from_nillable(None::<u8>)
    ///     .try_with_default('c')
    ///     .unwrap_err();
    ///
    /// assert_eq!(mismatch.given(), DeclaredType::of::<char>());
    /// assert_eq!(mismatch.declared(), DeclaredType::of::<u8>());
    /// assert!(opt.value().is_none());
    ///
    /// ```
    pub fn try_with_default<D>(self, def: D) -> Result<Self, (Self, TypeMismatch)>
    where
        D: Any,
    {
        self.substitute(DeclaredType::of::<D>(), Box::new(def))
    }

    /// Substitutes the already erased `def` for the value if this isn't present.
    ///
    /// The default is checked by the type of the boxed value,
    /// and is stored without another layer of boxing.
    ///
    /// # Panics
    ///
    /// Panics with a [`TypeMismatch`] payload
    /// if this is bound to a type other than the one behind `def`,
    /// even when the value is present.
    ///
    /// # Example
    ///
    /// ```
    /// use std::any::Any;
    ///
    /// use guarded_optional::ErasedOptional;
    ///
    /// let def: Box<dyn Any> = Box::new(6_u8);
    /// let opt = ErasedOptional::from_nillable(None::<u8>).with_untyped_default(def);
    ///
    /// assert_eq!(opt.value_ref::<u8>(), Some(&6));
    /// assert!(opt.is_defaulted());
    ///
    /// ```
    #[track_caller]
    pub fn with_untyped_default(self, def: Box<dyn Any>) -> Self {
        match self.try_with_untyped_default(def) {
            Ok(this) => this,
            Err((_, mismatch)) => type_mismatch(mismatch),
        }
    }

    /// Substitutes the already erased `def` for the value if this isn't present,
    /// returning `self` along with the mismatch if this is bound to a type
    /// other than the one behind `def`.
    pub fn try_with_untyped_default(
        self,
        def: Box<dyn Any>,
    ) -> Result<Self, (Self, TypeMismatch)> {
        self.substitute(DeclaredType::of_val(&*def), def)
    }

    fn substitute(
        mut self,
        given: DeclaredType,
        def: Box<dyn Any>,
    ) -> Result<Self, (Self, TypeMismatch)> {
        if let Some(declared) = self.declared_type {
            if declared != given {
                return Err((self, TypeMismatch::new(given, declared)));
            }
        }

        if !self.initialized {
            log::debug!(
                "substituting a default for an absent ErasedOptional<{}>",
                given
            );
            self.value = Some(def);
        }

        // Keeps the more descriptive name of the two.
        if self
            .declared_type
            .map_or(true, |ty| ty.name == ERASED_TYPE_NAME)
        {
            self.declared_type = Some(given);
        }
        Ok(self)
    }

    /// Converts this into an `Optional<T>`, keeping its state.
    ///
    /// Returns `self` back if it's bound to a type other than `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use guarded_optional::{ErasedOptional, Optional, OptionalState};
    ///
    /// let erased = ErasedOptional::from_nillable(None::<u16>).with_default(9_u16);
    /// let erased = erased.downcast::<String>().unwrap_err();
    ///
    /// let opt: Optional<u16> = erased.downcast().unwrap();
    /// assert_eq!(opt.state(), OptionalState::Defaulted);
    /// assert_eq!(opt.value(), Some(&9));
    ///
    /// ```
    pub fn downcast<T>(self) -> Result<Optional<T>, Self>
    where
        T: Any,
    {
        if self.declared_type.map_or(false, |ty| !ty.is::<T>()) {
            return Err(self);
        }

        let Self {
            value,
            declared_type,
            initialized,
        } = self;

        match value {
            None => Ok(Optional::absent()),
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(v) if initialized => Ok(Optional::present(*v)),
                Ok(v) => Ok(Optional::defaulted(*v)),
                Err(boxed) => Err(Self {
                    value: Some(boxed),
                    declared_type,
                    initialized,
                }),
            },
        }
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn type_mismatch(mismatch: TypeMismatch) -> ! {
    log::error!("{}", mismatch);
    panic::panic_any(mismatch)
}

impl Debug for ErasedOptional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedOptional")
            .field("declared_type", &self.declared_type)
            .field("state", &self.state())
            .finish()
    }
}

/// The default value is an absent `ErasedOptional` that isn't bound to any type.
impl Default for ErasedOptional {
    fn default() -> Self {
        Self::from_untyped(None)
    }
}

impl<T> From<Optional<T>> for ErasedOptional
where
    T: Any,
{
    fn from(optional: Optional<T>) -> Self {
        let initialized = optional.is_present();
        Self {
            value: optional
                .into_value()
                .map(|v| Box::new(v) as Box<dyn Any>),
            declared_type: Some(DeclaredType::of::<T>()),
            initialized,
        }
    }
}
