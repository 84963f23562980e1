//! Try combinators: capture, short-circuit and pass-through behavior

use std::cell::RefCell;

use recourse_types::function::not;
use recourse_types::{Cause, CheckedPredicate, ErrorKind, Try};

use crate::common::{
    SUCCESS_VALUE, assertion_error, error, expect_fatal, failure, failure_cause, linkage_error,
    success,
};

fn same_cause(attempt: &Try<String>, cause: &Cause) -> bool {
    attempt.get_cause().is_ok_and(|stored| stored.same_as(cause))
}

// -- map

#[test]
fn map_on_success() {
    assert_eq!(
        success().map(|s| Ok(s + "!")),
        Try::success(format!("{SUCCESS_VALUE}!"))
    );
}

#[test]
fn map_identity_is_equal_on_success() {
    assert_eq!(success().map(Ok), success());
}

#[test]
fn map_on_failure_keeps_the_cause_and_skips_the_mapper() {
    let cause = failure_cause();
    let mapped = failure(&cause).map(|_| -> Result<String, Cause> { panic!("mapper must not run") });
    assert!(same_cause(&mapped, &cause));
}

#[test]
fn map_captures_non_fatal_errors() {
    let raised = error();
    let mapped = success().map(|_| -> Result<String, Cause> { Err(raised.clone()) });
    assert!(same_cause(&mapped, &raised));
}

#[test]
fn map_rethrows_fatal_errors() {
    let fatal = linkage_error();
    let escaped = expect_fatal(|| success().map(|_| -> Result<String, Cause> { Err(fatal.clone()) }));
    assert!(escaped.same_as(&fatal));
}

// -- flat_map

#[test]
fn flat_map_returns_the_inner_try() {
    let cause = failure_cause();
    assert_eq!(success().flat_map(|_| Ok(success())), success());
    let inner = success().flat_map(|_| Ok(failure(&cause)));
    assert!(same_cause(&inner, &cause));
}

#[test]
fn flat_map_on_failure_is_a_no_op() {
    let cause = failure_cause();
    let chained = failure(&cause).flat_map(|_| -> Result<Try<String>, Cause> { Err(error()) });
    assert!(same_cause(&chained, &cause));
}

#[test]
fn flat_map_captures_raised_errors() {
    let raised = error();
    let chained = success().flat_map(|_| -> Result<Try<String>, Cause> { Err(raised.clone()) });
    assert!(same_cause(&chained, &raised));
}

#[test]
fn flat_map_rethrows_fatal_errors() {
    let fatal = linkage_error();
    let escaped =
        expect_fatal(|| success().flat_map(|_| -> Result<Try<String>, Cause> { Err(fatal.clone()) }));
    assert!(escaped.same_as(&fatal));
}

// -- filter

#[test]
fn filter_on_failure_never_runs_the_predicate() {
    let cause = failure_cause();
    for filtered in [
        failure(&cause).filter(|_| Ok(true)),
        failure(&cause).filter(|_| Ok(false)),
        failure(&cause).filter(|_| Err(error())),
    ] {
        assert!(same_cause(&filtered, &cause));
    }
}

#[test]
fn filter_keeps_matching_success() {
    assert_eq!(success().filter(|_| Ok(true)), success());
}

#[test]
fn filter_rejects_non_matching_success() {
    let filtered = success().filter(|_| Ok(false));
    let cause = filtered.get_cause().unwrap();
    assert_eq!(cause.kind(), &ErrorKind::PredicateNotSatisfied);
    assert!(cause.is_a(&ErrorKind::NoSuchElement));
    assert_eq!(cause.message(), Some("Predicate does not hold for \"success\""));
}

#[test]
fn filter_captures_predicate_errors() {
    let raised = error();
    let filtered = success().filter(|_| Err(raised.clone()));
    assert!(same_cause(&filtered, &raised));
}

#[test]
fn filter_rethrows_fatal_predicate_errors() {
    let fatal = linkage_error();
    let escaped = expect_fatal(|| success().filter(|_| Err(fatal.clone())));
    assert!(escaped.same_as(&fatal));
}

#[test]
fn filter_accepts_composed_predicates() {
    let short = |s: &String| -> Result<bool, Cause> { Ok(s.len() < 5) };
    let lowercase = |s: &String| -> Result<bool, Cause> { Ok(s.chars().all(char::is_lowercase)) };

    assert_eq!(success().filter(not(short).and(lowercase)), success());
    assert!(success().filter(short.or(not(lowercase))).is_failure());
}

// -- map_failure

#[test]
fn map_failure_replaces_the_cause() {
    let replacement = error();
    let mapped = failure(&failure_cause()).map_failure(|_| Ok(replacement.clone()));
    assert!(same_cause(&mapped, &replacement));
}

#[test]
fn map_failure_captures_raised_errors() {
    let raised = error();
    let mapped = failure(&failure_cause()).map_failure(|_| Err(raised.clone()));
    assert!(same_cause(&mapped, &raised));
}

#[test]
fn map_failure_on_success_is_a_no_op() {
    let mapped = success().map_failure(|_| panic!("mapper must not run"));
    assert_eq!(mapped, success());
}

#[test]
fn map_failure_rethrows_fatal_causes() {
    let fatal = linkage_error();
    let escaped = expect_fatal(|| failure(&failure_cause()).map_failure(|_| Ok(fatal.clone())));
    assert!(escaped.same_as(&fatal));

    let escaped = expect_fatal(|| failure(&failure_cause()).map_failure(|_| Err(fatal.clone())));
    assert!(escaped.same_as(&fatal));
}

// -- recover / recover_with

#[test]
fn recover_when_kind_matches_exactly() {
    let recovered = failure(&failure_cause()).recover(&ErrorKind::InvalidState, |_| Ok("ok".to_owned()));
    assert_eq!(recovered, Try::success("ok".to_owned()));
}

#[test]
fn recover_when_kind_is_an_ancestor() {
    let recovered =
        failure(&failure_cause()).recover(&ErrorKind::Any, |_| Ok(SUCCESS_VALUE.to_owned()));
    assert_eq!(recovered, success());
}

#[test]
fn recover_ignores_unrelated_kinds() {
    let cause = failure_cause();
    let untouched = failure(&cause).recover(&ErrorKind::VirtualMachine, |_| {
        panic!("recovery must not run")
    });
    assert!(same_cause(&untouched, &cause));
}

#[test]
fn recover_on_success_is_a_no_op() {
    let recovered = success().recover(&ErrorKind::Any, |_| panic!("recovery must not run"));
    assert_eq!(recovered, success());
}

#[test]
fn recover_hands_the_cause_to_the_recovery() {
    let recovered = failure(&failure_cause()).recover(&ErrorKind::Exception, |cause| {
        Ok(cause.message().unwrap_or_default().to_owned())
    });
    assert_eq!(recovered, Try::success("failure".to_owned()));
}

#[test]
fn recover_captures_and_rethrows_like_map() {
    let raised = error();
    let recovered = failure(&failure_cause()).recover(&ErrorKind::Any, |_| Err(raised.clone()));
    assert!(same_cause(&recovered, &raised));

    let fatal = linkage_error();
    let escaped =
        expect_fatal(|| failure(&failure_cause()).recover(&ErrorKind::Any, |_| Err(fatal.clone())));
    assert!(escaped.same_as(&fatal));
}

#[test]
fn recover_with_returns_the_recovery_try() {
    assert_eq!(
        failure(&failure_cause()).recover_with(&ErrorKind::InvalidState, |_| Ok(success())),
        success()
    );

    let other = error();
    let recovered = failure(&failure_cause()).recover_with(&ErrorKind::Any, |_| Ok(failure(&other)));
    assert!(same_cause(&recovered, &other));
}

#[test]
fn recover_with_ignores_unrelated_kinds_and_successes() {
    let cause = failure_cause();
    let untouched = failure(&cause).recover_with(&ErrorKind::Io, |_| Ok(success()));
    assert!(same_cause(&untouched, &cause));
    assert_eq!(
        success().recover_with(&ErrorKind::Any, |_| panic!("recovery must not run")),
        success()
    );
}

#[test]
fn recover_with_captures_raised_errors() {
    let raised = error();
    let recovered = failure(&failure_cause()).recover_with(&ErrorKind::Any, |_| Err(raised.clone()));
    assert!(same_cause(&recovered, &raised));
}

#[test]
fn recover_with_rethrows_fatal_errors() {
    let fatal = linkage_error();
    let escaped = expect_fatal(|| {
        failure(&failure_cause())
            .recover_with(&ErrorKind::Any, |_| -> Result<Try<String>, Cause> { Err(fatal.clone()) })
    });
    assert!(escaped.same_as(&fatal));
}

// -- or_else

#[test]
fn or_else_keeps_success() {
    assert_eq!(success().or_else(|| panic!("supplier must not run")), success());
}

#[test]
fn or_else_replaces_failure() {
    assert_eq!(failure(&failure_cause()).or_else(|| Ok(success())), success());
}

#[test]
fn or_else_captures_raised_errors() {
    let raised = error();
    let replaced = failure(&failure_cause()).or_else(|| Err(raised.clone()));
    assert!(same_cause(&replaced, &raised));
}

#[test]
fn or_else_rethrows_fatal_errors() {
    let fatal = linkage_error();
    let escaped = expect_fatal(|| failure(&failure_cause()).or_else(|| Err(fatal.clone())));
    assert!(escaped.same_as(&fatal));
}

// -- fold / transform

#[test]
fn fold_picks_the_matching_branch() {
    assert_eq!(success().fold(|_| 0, |s| s.len()), SUCCESS_VALUE.len());
    assert_eq!(
        failure(&failure_cause()).fold(|cause| cause.to_string(), |s| s),
        "InvalidState: failure"
    );
}

#[test]
fn transform_returns_the_branch_result() {
    let transformed = success().transform(
        |_| -> Result<Try<usize>, Cause> { Err(assertion_error()) },
        |s| Ok(Try::success(s.len())),
    );
    assert_eq!(transformed, Try::success(SUCCESS_VALUE.len()));

    let alternate = failure(&failure_cause()).transform(|_| Ok(success()), |s| Ok(Try::success(s)));
    assert_eq!(alternate, success());
}

#[test]
fn transform_captures_raised_errors_from_either_branch() {
    let raised = error();
    let from_failure = failure(&failure_cause())
        .transform(|_| Err(raised.clone()), |s| Ok(Try::success(s)));
    assert!(same_cause(&from_failure, &raised));

    let from_success = success().transform(|_| Ok(success()), |_| Err(raised.clone()));
    assert!(same_cause(&from_success, &raised));
}

#[test]
fn transform_rethrows_fatal_errors() {
    let fatal = linkage_error();
    let escaped = expect_fatal(|| {
        success().transform(|_| Ok(success()), |_| -> Result<Try<String>, Cause> {
            Err(fatal.clone())
        })
    });
    assert!(escaped.same_as(&fatal));
}

// -- side effects

#[test]
fn for_each_consumes_only_success() {
    let seen = RefCell::new(Vec::new());
    let record = |s: &String| -> Result<(), Cause> {
        seen.borrow_mut().push(s.clone());
        Ok(())
    };
    assert_eq!(failure(&failure_cause()).for_each(record), Ok(()));
    assert_eq!(success().for_each(record), Ok(()));
    assert_eq!(*seen.borrow(), vec![SUCCESS_VALUE.to_owned()]);
}

#[test]
fn for_each_returns_consumer_errors_unmodified() {
    let raised = error();
    let err = success().for_each(|_| Err(raised.clone())).unwrap_err();
    assert!(err.same_as(&raised));
}

#[test]
fn on_success_observes_success_and_returns_it() {
    let seen = RefCell::new(Vec::new());
    let observed = success().on_success(|s| {
        seen.borrow_mut().push(s.clone());
        Ok(())
    });
    assert_eq!(observed, Ok(success()));
    assert_eq!(*seen.borrow(), vec![SUCCESS_VALUE.to_owned()]);
}

#[test]
fn on_success_does_not_capture_consumer_errors() {
    let raised = error();
    let err = success().on_success(|_| Err(raised.clone())).unwrap_err();
    assert!(err.same_as(&raised));
}

#[test]
fn on_success_ignores_failure() {
    let cause = failure_cause();
    let observed = failure(&cause)
        .on_success(|_| panic!("consumer must not run"))
        .unwrap();
    assert!(same_cause(&observed, &cause));
}

#[test]
fn on_failure_observes_the_cause() {
    let cause = failure_cause();
    let seen = RefCell::new(Vec::new());
    let observed = failure(&cause)
        .on_failure(|c| {
            seen.borrow_mut().push(c.clone());
            Ok(())
        })
        .unwrap();
    assert!(same_cause(&observed, &cause));
    assert!(seen.borrow()[0].same_as(&cause));
}

#[test]
fn on_failure_does_not_capture_consumer_errors() {
    let raised = error();
    let err = failure(&failure_cause())
        .on_failure(|_| Err(raised.clone()))
        .unwrap_err();
    assert!(err.same_as(&raised));
}

#[test]
fn on_failure_ignores_success() {
    assert_eq!(
        success().on_failure(|_| panic!("consumer must not run")),
        Ok(success())
    );
}

// -- failed

#[test]
fn failed_inverts_success() {
    let inverted = success().failed();
    let cause = inverted.get_cause().unwrap();
    assert_eq!(cause.kind(), &ErrorKind::Unsupported);
    assert_eq!(cause.message(), Some("Success.failed()"));
}

#[test]
fn failed_promotes_the_cause_to_a_value() {
    let cause = failure_cause();
    let inverted = failure(&cause).failed();
    assert_eq!(inverted, Try::success(cause.clone()));
    assert!(inverted.get().unwrap().same_as(&cause));
}
