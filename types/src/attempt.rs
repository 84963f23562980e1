//! `Try`: the outcome of a computation that may have failed.
//!
//! A `Try` is either a [`Success`](Try::Success) holding a value or a
//! [`Failure`](Try::Failure) holding a non-fatal [`Cause`]. Combinators that
//! run caller code send any error it returns through the active classifier
//! (see [`fatal`](crate::fatal)): non-fatal causes become a `Failure`, fatal
//! ones unwind out of the combinator untouched.
//!
//! Branches that have nothing to do hand the receiver back as-is, so a
//! `Failure` travelling through `map`, `filter` or `recover` keeps the
//! identical cause.
//!
//! ```
//! use recourse_types::{Cause, ErrorKind, Try};
//!
//! let parsed = Try::of(|| "42".parse::<u32>().map_err(|e| Cause::from_error(ErrorKind::InvalidArgument, e)))
//!     .map(|n| Ok(n + 1))
//!     .recover(&ErrorKind::InvalidArgument, |_| Ok(0));
//! assert_eq!(parsed, Try::success(43));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::option;

use either::Either;
use serde::{Deserialize, Serialize};

use crate::cause::{Cause, ErrorKind};
use crate::fatal::NonFatal;
use crate::maybe::Maybe;

const SUCCESS_SALT: u32 = 31;

/// Result of a computation that may have failed with a non-fatal cause.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Try<T> {
    Success(T),
    Failure(NonFatal),
}

impl<T> Try<T> {
    /// Run `computation` and capture its outcome.
    pub fn of(computation: impl FnOnce() -> Result<T, Cause>) -> Self {
        Self::from(computation())
    }

    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// Wrap `cause`. A fatal cause unwinds instead.
    pub fn failure(cause: Cause) -> Self {
        Self::Failure(NonFatal::capture(cause))
    }

    pub fn from_result<E: Into<Cause>>(result: Result<T, E>) -> Self {
        Self::from(result.map_err(Into::into))
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The value, or a [`ErrorKind::NonFatal`] cause wrapping the stored one.
    pub fn get(&self) -> Result<&T, Cause> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(cause) => Err(surface(cause)),
        }
    }

    /// Consuming form of [`get`](Self::get).
    pub fn into_value(self) -> Result<T, Cause> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(cause) => Err(surface(&cause)),
        }
    }

    /// The value, or the stored cause itself.
    pub fn into_result(self) -> Result<T, Cause> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(cause) => Err(cause.into_cause()),
        }
    }

    pub fn get_cause(&self) -> Result<&Cause, Cause> {
        match self {
            Self::Success(_) => Err(Cause::unsupported("Success.get_cause()")),
            Self::Failure(cause) => Ok(cause.cause()),
        }
    }

    /// `other` is evaluated by the caller whatever the outcome.
    pub fn get_or_else(self, other: T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => other,
        }
    }

    pub fn get_or_else_get(self, supplier: impl FnOnce() -> T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => supplier(),
        }
    }

    pub fn get_or_else_throw<E>(self, cause_to_error: impl FnOnce(Cause) -> E) -> Result<T, E> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(cause) => Err(cause_to_error(cause.into_cause())),
        }
    }

    /// Iterate over the value, if any. Each call starts a fresh iterator.
    pub fn iter(&self) -> option::IntoIter<&T> {
        self.as_ref().to_optional().into_iter()
    }

    pub fn as_ref(&self) -> Try<&T> {
        match self {
            Self::Success(value) => Try::Success(value),
            Self::Failure(cause) => Try::Failure(cause.clone()),
        }
    }

    pub fn map<U>(self, mapper: impl FnOnce(T) -> Result<U, Cause>) -> Try<U> {
        match self {
            Self::Success(value) => Try::of(|| mapper(value)),
            Self::Failure(cause) => Try::Failure(cause),
        }
    }

    pub fn flat_map<U>(self, mapper: impl FnOnce(T) -> Result<Try<U>, Cause>) -> Try<U> {
        match self {
            Self::Success(value) => settle(mapper(value)),
            Self::Failure(cause) => Try::Failure(cause),
        }
    }

    /// Keep a success only if `predicate` holds; otherwise fail with
    /// [`ErrorKind::PredicateNotSatisfied`].
    pub fn filter(self, predicate: impl FnOnce(&T) -> Result<bool, Cause>) -> Self
    where
        T: fmt::Debug,
    {
        self.filter_or(predicate, |value| {
            Cause::new(
                ErrorKind::PredicateNotSatisfied,
                format!("Predicate does not hold for {value:?}"),
            )
        })
    }

    /// Like [`filter`](Self::filter) with a caller-built cause.
    pub fn filter_or(
        self,
        predicate: impl FnOnce(&T) -> Result<bool, Cause>,
        error: impl FnOnce(&T) -> Cause,
    ) -> Self {
        match self {
            Self::Success(value) => match predicate(&value) {
                Ok(true) => Self::Success(value),
                Ok(false) => Self::failure(error(&value)),
                Err(cause) => Self::failure(cause),
            },
            failure @ Self::Failure(_) => failure,
        }
    }

    /// Replace the cause of a failure. Both the mapped cause and any error
    /// raised by `mapper` become the new failure, subject to classification.
    pub fn map_failure(self, mapper: impl FnOnce(Cause) -> Result<Cause, Cause>) -> Self {
        match self {
            success @ Self::Success(_) => success,
            Self::Failure(cause) => match mapper(cause.into_cause()) {
                Ok(mapped) | Err(mapped) => Self::failure(mapped),
            },
        }
    }

    /// Turn a failure whose cause [is a](ErrorKind::is_a) `kind` into a success.
    pub fn recover(self, kind: &ErrorKind, recovery: impl FnOnce(Cause) -> Result<T, Cause>) -> Self {
        match self {
            Self::Failure(cause) if cause.is_a(kind) => Self::of(|| recovery(cause.into_cause())),
            unchanged => unchanged,
        }
    }

    pub fn recover_with(
        self,
        kind: &ErrorKind,
        recovery: impl FnOnce(Cause) -> Result<Self, Cause>,
    ) -> Self {
        match self {
            Self::Failure(cause) if cause.is_a(kind) => settle(recovery(cause.into_cause())),
            unchanged => unchanged,
        }
    }

    pub fn or_else(self, supplier: impl FnOnce() -> Result<Self, Cause>) -> Self {
        match self {
            success @ Self::Success(_) => success,
            Self::Failure(_) => settle(supplier()),
        }
    }

    /// Collapse both branches into a value. Neither function is classified.
    pub fn fold<U>(self, on_failure: impl FnOnce(Cause) -> U, on_success: impl FnOnce(T) -> U) -> U {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(cause) => on_failure(cause.into_cause()),
        }
    }

    /// Continue with whichever branch applies; errors from either are
    /// classified like [`flat_map`](Self::flat_map).
    pub fn transform<U>(
        self,
        if_failure: impl FnOnce(Cause) -> Result<Try<U>, Cause>,
        if_success: impl FnOnce(T) -> Result<Try<U>, Cause>,
    ) -> Try<U> {
        settle(match self {
            Self::Success(value) => if_success(value),
            Self::Failure(cause) => if_failure(cause.into_cause()),
        })
    }

    /// Errors raised by `consumer` are returned unmodified.
    pub fn for_each(&self, consumer: impl FnOnce(&T) -> Result<(), Cause>) -> Result<(), Cause> {
        match self {
            Self::Success(value) => consumer(value),
            Self::Failure(_) => Ok(()),
        }
    }

    /// Observe a success. Errors raised by `consumer` are returned unmodified.
    pub fn on_success(self, consumer: impl FnOnce(&T) -> Result<(), Cause>) -> Result<Self, Cause> {
        if let Self::Success(value) = &self {
            consumer(value)?;
        }
        Ok(self)
    }

    /// Observe a failure. Errors raised by `consumer` are returned unmodified.
    pub fn on_failure(
        self,
        consumer: impl FnOnce(&Cause) -> Result<(), Cause>,
    ) -> Result<Self, Cause> {
        if let Self::Failure(cause) = &self {
            consumer(cause)?;
        }
        Ok(self)
    }

    /// Swap the branches: a failure's cause becomes the value.
    pub fn failed(self) -> Try<Cause> {
        match self {
            Self::Success(_) => Try::failure(Cause::unsupported("Success.failed()")),
            Self::Failure(cause) => Try::Success(cause.into_cause()),
        }
    }

    pub fn to_maybe(self) -> Maybe<T> {
        match self {
            Self::Success(value) => Maybe::Some(value),
            Self::Failure(_) => Maybe::None,
        }
    }

    #[must_use]
    pub fn to_optional(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn to_either<L>(self, cause_mapper: impl FnOnce(Cause) -> L) -> Either<L, T> {
        match self {
            Self::Success(value) => Either::Right(value),
            Self::Failure(cause) => Either::Left(cause_mapper(cause.into_cause())),
        }
    }
}

impl Try<()> {
    /// Run a side effect and capture its outcome.
    pub fn run(action: impl FnOnce() -> Result<(), Cause>) -> Self {
        Self::of(action)
    }
}

impl<T> Try<Option<T>> {
    /// Present only for a success holding `Some`.
    #[must_use]
    pub fn flatten_optional(self) -> Option<T> {
        self.to_optional().flatten()
    }
}

fn surface(cause: &NonFatal) -> Cause {
    Cause::wrapping(ErrorKind::NonFatal, cause.cause().clone())
}

fn settle<T>(attempt: Result<Try<T>, Cause>) -> Try<T> {
    attempt.unwrap_or_else(Try::failure)
}

impl<T> From<Result<T, Cause>> for Try<T> {
    fn from(result: Result<T, Cause>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(cause) => Self::failure(cause),
        }
    }
}

impl<T> From<Try<T>> for Result<T, Cause> {
    fn from(attempt: Try<T>) -> Self {
        attempt.into_result()
    }
}

impl<T: PartialEq> PartialEq for Try<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Success(a), Self::Success(b)) => a == b,
            (Self::Failure(a), Self::Failure(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for Try<T> {}

impl<T: Hash> Hash for Try<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Success(value) => {
                SUCCESS_SALT.hash(state);
                value.hash(state);
            }
            Self::Failure(cause) => cause.hash(state),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Try<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(f, "Success({value})"),
            Self::Failure(cause) => write!(f, "Failure({cause})"),
        }
    }
}

impl<T> IntoIterator for Try<T> {
    type Item = T;
    type IntoIter = option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.to_optional().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Try<T> {
    type Item = &'a T;
    type IntoIter = option::IntoIter<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
