/*!
An `Optional` wrapper for values that may be missing.

This crate provides:

- [`Optional<T>`]: a value wrapper that records whether its value was confirmed present,
    with a fail-fast constructor ([`Optional::require_present`]),
    a nilable constructor ([`Optional::from_nillable`]),
    and a default-value fallback ([`Optional::with_default`]).

- [`ErasedOptional`]: the dynamically typed equivalent,
    which remembers the runtime type it was bound to and
    refuses defaults of any other type.

# Initialized vs filled

An `Optional` distinguishes a value that was present when it was constructed
from a value that was substituted in afterwards.
Substituting a default never makes an `Optional` "present":

```
use guarded_optional::{Optional, OptionalState};

let opt = Optional::from_nillable(None::<u32>).with_default(13);

assert_eq!(opt.value(), Some(&13));
assert!(!opt.is_present());
assert_eq!(opt.state(), OptionalState::Defaulted);
```

# Failing fast

```
use guarded_optional::{Optional, NIL_VALUE_MESSAGE};

let err = Optional::require_present(None::<String>).unwrap_err();
assert_eq!(err.to_string(), NIL_VALUE_MESSAGE);

// The absent Optional is still usable.
let opt = err.into_optional().with_default("fallback".to_string());
assert_eq!(opt.value().map(|s| s.as_str()), Some("fallback"));
```

*/

#![warn(rust_2018_idioms)]

#[cfg(test)]
mod test_utils;

pub mod erased;
pub mod errors;
pub mod optional;

pub use crate::{
    erased::{DeclaredType, ErasedOptional},
    errors::{AbsentValueError, TypeMismatch, NIL_VALUE_MESSAGE},
    optional::{Optional, OptionalState},
};
