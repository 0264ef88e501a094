use super::*;

use crate::test_utils::{init_logger, must_panic, TestStruct, WrongTypeStruct};

fn test_value() -> Box<dyn Any> {
    Box::new(TestStruct::test())
}

#[test]
fn require_present() {
    init_logger();

    let opt = ErasedOptional::require_present(Some(TestStruct::test())).unwrap();
    assert!(opt.is_present());
    assert!(opt.is::<TestStruct>());
    assert_eq!(opt.value_ref::<TestStruct>(), Some(&TestStruct::test()));

    let err = ErasedOptional::require_present(None::<TestStruct>).unwrap_err();
    assert_eq!(err.message(), NIL_VALUE_MESSAGE);

    let opt = err.into_optional();
    assert!(!opt.is_present());
    assert_eq!(opt.state(), OptionalState::Absent);
    assert!(opt.value().is_none());
    assert_eq!(opt.declared_type(), Some(DeclaredType::of::<TestStruct>()));

    let err =
        ErasedOptional::require_present_with_message(None::<u8>, "missing byte").unwrap_err();
    assert_eq!(err.to_string(), "missing byte");
}

#[test]
fn from_nillable() {
    let opt = ErasedOptional::from_nillable(Some(TestStruct::test()));
    assert!(opt.is_present());
    assert_eq!(opt.value_ref::<TestStruct>(), Some(&TestStruct::test()));
    assert_eq!(opt.value_ref::<WrongTypeStruct>(), None);

    let opt = ErasedOptional::from_nillable(None::<TestStruct>);
    assert!(!opt.is_present());
    assert!(opt.is::<TestStruct>());
}

#[test]
fn from_untyped() {
    let opt = ErasedOptional::from_untyped(Some(test_value()));
    assert!(opt.is_present());
    assert!(opt.is::<TestStruct>());
    assert_eq!(opt.declared_type().unwrap().name(), "<erased>");
    assert_eq!(opt.value_ref::<TestStruct>(), Some(&TestStruct::test()));

    let opt = ErasedOptional::from_untyped(None);
    assert!(!opt.is_present());
    assert_eq!(opt.declared_type(), None);
    assert!(!opt.is::<TestStruct>());
}

#[test]
fn default_on_present_is_noop() {
    let opt =
        ErasedOptional::from_nillable(Some(TestStruct::test())).with_default(TestStruct::another_test());

    assert!(opt.is_present());
    assert_eq!(opt.value_ref::<TestStruct>(), Some(&TestStruct::test()));
}

#[test]
fn default_on_absent_substitutes() {
    init_logger();

    let opt =
        ErasedOptional::from_nillable(None::<TestStruct>).with_default(TestStruct::another_test());

    assert!(!opt.is_present());
    assert!(opt.is_defaulted());
    assert_eq!(opt.state(), OptionalState::Defaulted);
    assert_eq!(opt.value_ref::<TestStruct>(), Some(&TestStruct::another_test()));
}

#[test]
fn untyped_absent_accepts_any_default() {
    let opt = ErasedOptional::default().with_default(TestStruct::another_test());
    assert!(!opt.is_present());
    assert!(opt.is::<TestStruct>());
    assert_eq!(opt.value_ref::<TestStruct>(), Some(&TestStruct::another_test()));

    // Binding to the default's type makes later defaults checked.
    let (_, mismatch) = opt.try_with_default(WrongTypeStruct).unwrap_err();
    assert_eq!(mismatch.declared(), DeclaredType::of::<TestStruct>());

    let opt = ErasedOptional::from_untyped(None).with_default(3_u16);
    assert_eq!(opt.value_ref::<u16>(), Some(&3));
}

#[test]
fn untyped_present_checks_defaults() {
    let opt = ErasedOptional::from_untyped(Some(test_value()))
        .with_default(TestStruct::another_test());
    assert_eq!(opt.value_ref::<TestStruct>(), Some(&TestStruct::test()));

    let (opt, mismatch) = ErasedOptional::from_untyped(Some(test_value()))
        .try_with_default(WrongTypeStruct)
        .unwrap_err();
    assert_eq!(mismatch.declared().name(), "<erased>");
    assert!(opt.is_present());
}

#[test]
fn mismatched_default_on_absent_panics() {
    init_logger();

    let payload = must_panic(|| {
        ErasedOptional::from_nillable(None::<TestStruct>).with_default(WrongTypeStruct)
    });

    let mismatch = payload.downcast_ref::<TypeMismatch>().unwrap();
    assert_eq!(mismatch.given(), DeclaredType::of::<WrongTypeStruct>());
    assert_eq!(mismatch.declared(), DeclaredType::of::<TestStruct>());
    assert!(mismatch.to_string().starts_with("The given type "));
    assert!(mismatch
        .to_string()
        .contains("cannot be used with an Optional of type"));
}

#[test]
fn mismatched_default_on_present_panics() {
    let payload = must_panic(|| {
        ErasedOptional::from_nillable(Some(TestStruct::test())).with_default(WrongTypeStruct)
    });

    assert!(payload.downcast_ref::<TypeMismatch>().is_some());
}

#[test]
fn try_with_default_reports_mismatch() {
    let (opt, mismatch) = ErasedOptional::from_nillable(None::<TestStruct>)
        .try_with_default(WrongTypeStruct)
        .unwrap_err();

    assert_eq!(opt.state(), OptionalState::Absent);
    assert_eq!(
        mismatch.to_string(),
        format!(
            "The given type {} cannot be used with an Optional of type {}",
            any::type_name::<WrongTypeStruct>(),
            any::type_name::<TestStruct>(),
        ),
    );

    let opt = ErasedOptional::from_nillable(None::<u8>)
        .try_with_default(4_u8)
        .unwrap();
    assert_eq!(opt.value_ref::<u8>(), Some(&4));
}

#[test]
fn downcast_keeps_state() {
    let opt = ErasedOptional::from_nillable(Some(TestStruct::test()))
        .downcast::<TestStruct>()
        .unwrap();
    assert_eq!(opt, Optional::present(TestStruct::test()));

    let opt = ErasedOptional::from_nillable(None::<TestStruct>)
        .downcast::<TestStruct>()
        .unwrap();
    assert_eq!(opt, Optional::absent());

    let opt = ErasedOptional::from_nillable(None::<TestStruct>)
        .with_default(TestStruct::another_test())
        .downcast::<TestStruct>()
        .unwrap();
    assert_eq!(opt.state(), OptionalState::Defaulted);
    assert_eq!(opt.value(), Some(&TestStruct::another_test()));

    let erased = ErasedOptional::from_nillable(None::<TestStruct>)
        .downcast::<WrongTypeStruct>()
        .unwrap_err();
    assert!(erased.is::<TestStruct>());

    let opt = ErasedOptional::from_untyped(None)
        .downcast::<WrongTypeStruct>()
        .unwrap();
    assert_eq!(opt, Optional::absent());
}

#[test]
fn from_optional() {
    let erased = ErasedOptional::from(Optional::present(TestStruct::test()));
    assert_eq!(erased.state(), OptionalState::Present);
    assert!(erased.is::<TestStruct>());

    let erased = ErasedOptional::from(Optional::<TestStruct>::absent());
    assert_eq!(erased.state(), OptionalState::Absent);
    assert!(erased.is::<TestStruct>());

    let erased = ErasedOptional::from(Optional::absent().with_default(TestStruct::another_test()));
    assert_eq!(erased.state(), OptionalState::Defaulted);
    assert_eq!(erased.value_ref::<TestStruct>(), Some(&TestStruct::another_test()));
}

#[test]
fn declared_type() {
    let ty = DeclaredType::of::<TestStruct>();
    assert!(ty.is::<TestStruct>());
    assert!(!ty.is::<WrongTypeStruct>());
    assert_eq!(ty.type_id(), TypeId::of::<TestStruct>());
    assert_eq!(ty.to_string(), any::type_name::<TestStruct>());
    assert_eq!(DeclaredType::of::<str>().name(), "str");

    let erased = DeclaredType::of_val(&*test_value());
    assert_eq!(erased, ty);
    assert_eq!(erased.to_string(), "<erased>");
    assert_eq!(format!("{:?}", erased), r#"DeclaredType("<erased>")"#);
}

#[test]
fn debug_output() {
    let opt = ErasedOptional::from_nillable(None::<u8>).with_default(1_u8);
    assert_eq!(
        format!("{:?}", opt),
        r#"ErasedOptional { declared_type: Some(DeclaredType("u8")), state: Defaulted }"#,
    );
}

#[test]
fn untyped_default_is_checked_by_its_contents() {
    init_logger();

    let opt = ErasedOptional::from_untyped(None).with_untyped_default(Box::new(6_u8));
    assert!(opt.is::<u8>());
    assert!(opt.is_defaulted());
    assert_eq!(opt.value_ref::<u8>(), Some(&6));

    let opt = ErasedOptional::from_nillable(None::<u8>)
        .try_with_untyped_default(Box::new(7_u8))
        .unwrap();
    assert_eq!(opt.value_ref::<u8>(), Some(&7));
    assert_eq!(opt.declared_type().unwrap().name(), "u8");

    let opt = ErasedOptional::from_nillable(Some(TestStruct::test()))
        .with_untyped_default(test_value());
    assert!(opt.is_present());
    assert_eq!(opt.value_ref::<TestStruct>(), Some(&TestStruct::test()));
}

#[test]
fn untyped_default_binds_later_typed_defaults() {
    let opt = ErasedOptional::default().with_untyped_default(test_value());
    assert_eq!(opt.declared_type().unwrap().name(), "<erased>");

    let opt = opt.with_default(TestStruct::another_test());
    assert_eq!(opt.declared_type().unwrap().name(), any::type_name::<TestStruct>());
    assert_eq!(opt.value_ref::<TestStruct>(), Some(&TestStruct::another_test()));

    let (_, mismatch) = opt.try_with_default(6_u8).unwrap_err();
    assert_eq!(mismatch.declared(), DeclaredType::of::<TestStruct>());
}

#[test]
fn mismatched_untyped_default() {
    let (opt, mismatch) = ErasedOptional::from_nillable(None::<u8>)
        .try_with_untyped_default(test_value())
        .unwrap_err();
    assert_eq!(opt.state(), OptionalState::Absent);
    assert_eq!(mismatch.given(), DeclaredType::of::<TestStruct>());
    assert_eq!(mismatch.given().name(), "<erased>");
    assert_eq!(mismatch.declared(), DeclaredType::of::<u8>());

    let payload = must_panic(|| {
        ErasedOptional::from_nillable(Some(5_u8)).with_untyped_default(test_value())
    });
    assert!(payload.downcast_ref::<TypeMismatch>().is_some());
}
