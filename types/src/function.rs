//! Checked single-argument contracts.
//!
//! Caller code handed to the combinators reports failure by returning a
//! [`Cause`]. Each trait here is a blanket alias over the matching closure
//! signature, so every closure of that shape picks up the composition helpers.

use crate::attempt::Try;
use crate::cause::Cause;

/// A function that may fail.
pub trait CheckedFunction<T, R>: FnOnce(T) -> Result<R, Cause> {
    fn apply(self, value: T) -> Result<R, Cause>
    where
        Self: Sized,
    {
        self(value)
    }

    /// Feed this function's result into `after`.
    fn and_then<V>(
        self,
        after: impl FnOnce(R) -> Result<V, Cause>,
    ) -> impl FnOnce(T) -> Result<V, Cause>
    where
        Self: Sized,
    {
        move |value: T| -> Result<V, Cause> { after(self(value)?) }
    }

    /// Feed the result of `before` into this function.
    fn compose<V>(
        self,
        before: impl FnOnce(V) -> Result<T, Cause>,
    ) -> impl FnOnce(V) -> Result<R, Cause>
    where
        Self: Sized,
    {
        move |value: V| -> Result<R, Cause> { self(before(value)?) }
    }

    /// Turn the error channel into a classified [`Try`].
    fn lift(self) -> impl FnOnce(T) -> Try<R>
    where
        Self: Sized,
    {
        move |value: T| Try::of(|| self(value))
    }
}

impl<T, R, F> CheckedFunction<T, R> for F where F: FnOnce(T) -> Result<R, Cause> {}

/// A predicate that may fail.
///
/// `and` and `or` short-circuit; an error from the first operand is returned
/// without evaluating the second.
pub trait CheckedPredicate<T: ?Sized>: Fn(&T) -> Result<bool, Cause> {
    fn test(&self, value: &T) -> Result<bool, Cause> {
        self(value)
    }

    fn negate(self) -> impl Fn(&T) -> Result<bool, Cause>
    where
        Self: Sized,
    {
        move |value: &T| -> Result<bool, Cause> { Ok(!self(value)?) }
    }

    fn and(
        self,
        other: impl Fn(&T) -> Result<bool, Cause>,
    ) -> impl Fn(&T) -> Result<bool, Cause>
    where
        Self: Sized,
    {
        move |value: &T| -> Result<bool, Cause> { Ok(self(value)? && other(value)?) }
    }

    fn or(
        self,
        other: impl Fn(&T) -> Result<bool, Cause>,
    ) -> impl Fn(&T) -> Result<bool, Cause>
    where
        Self: Sized,
    {
        move |value: &T| -> Result<bool, Cause> { Ok(self(value)? || other(value)?) }
    }
}

impl<T: ?Sized, F> CheckedPredicate<T> for F where F: Fn(&T) -> Result<bool, Cause> {}

/// Negate `predicate`.
pub fn not<T: ?Sized>(
    predicate: impl Fn(&T) -> Result<bool, Cause>,
) -> impl Fn(&T) -> Result<bool, Cause> {
    predicate.negate()
}

/// A side effect that may fail.
pub trait CheckedConsumer<T: ?Sized>: Fn(&T) -> Result<(), Cause> {
    fn accept(&self, value: &T) -> Result<(), Cause> {
        self(value)
    }

    /// Run this consumer, then `after`; stops at the first error.
    fn followed_by(
        self,
        after: impl Fn(&T) -> Result<(), Cause>,
    ) -> impl Fn(&T) -> Result<(), Cause>
    where
        Self: Sized,
    {
        move |value: &T| -> Result<(), Cause> {
            self(value)?;
            after(value)
        }
    }
}

impl<T: ?Sized, F> CheckedConsumer<T> for F where F: Fn(&T) -> Result<(), Cause> {}
