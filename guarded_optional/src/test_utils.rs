use std::{
    any::Any,
    fmt::{Debug, Display},
    panic::{catch_unwind, AssertUnwindSafe},
};

pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// Runs `f`, returning the payload it panicked with.
///
/// # Panics
///
/// Panics at the caller's location if `f` returns normally.
#[track_caller]
pub fn must_panic<F, R>(f: F) -> PanicPayload
where
    F: FnOnce() -> R,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("expected the closure to panic"),
        Err(e) => e,
    }
}

/// Routes the `log` records of the code under test to the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_must_panic() {
    let payload = must_panic(|| panic!("boom"));
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));

    assert!(catch_unwind(|| must_panic(|| ())).is_err());
}

//////////////////////////////////////////////////////////////////

/// Checks that `left` and `right` produce the exact same Display and Debug output.
pub(crate) fn check_formatting_equivalence<T, U>(left: &T, right: &U)
where
    T: Debug + Display,
    U: Debug + Display,
{
    assert_eq!(format!("{:?}", left), format!("{:?}", right));
    assert_eq!(format!("{:#?}", left), format!("{:#?}", right));
    assert_eq!(format!("{}", left), format!("{}", right));
    assert_eq!(format!("{:#}", left), format!("{:#}", right));
}

//////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub(crate) struct TestStruct {
    pub v: i32,
    pub n: String,
}

impl TestStruct {
    pub fn new(v: i32, n: &str) -> Self {
        Self { v, n: n.into() }
    }

    pub fn test() -> Self {
        Self::new(12, "test")
    }

    pub fn another_test() -> Self {
        Self::new(13, "anotherTest")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WrongTypeStruct;
