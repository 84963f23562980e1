//! `Maybe`: a value that may be absent.
//!
//! Unlike [`Try`], nothing here is classified. Closures are infallible and a
//! panic inside one propagates unmodified.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::option;

use either::Either;
use serde::{Deserialize, Serialize};

use crate::attempt::Try;
use crate::cause::Cause;

const SOME_SALT: u32 = 31;
const NONE_HASH: u32 = 1;

/// Present or absent value.
///
/// `Maybe::Some(None)` for `Maybe<Option<U>>` is defined and distinct from
/// `Maybe::None`.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Maybe<T> {
    Some(T),
    #[default]
    None,
}

impl<T> Maybe<T> {
    pub const fn some(value: T) -> Self {
        Self::Some(value)
    }

    pub const fn none() -> Self {
        Self::None
    }

    /// `Maybe::Some` when `value` is present.
    pub fn of(value: Option<T>) -> Self {
        value.map_or(Self::None, Self::Some)
    }

    /// `Some(supplier())` if `condition` holds; `supplier` is not run otherwise.
    pub fn when(condition: bool, supplier: impl FnOnce() -> T) -> Self {
        if condition {
            Self::Some(supplier())
        } else {
            Self::None
        }
    }

    /// `Some(supplier())` unless `condition` holds.
    pub fn unless(condition: bool, supplier: impl FnOnce() -> T) -> Self {
        Self::when(!condition, supplier)
    }

    #[must_use]
    pub const fn is_defined(&self) -> bool {
        matches!(self, Self::Some(_))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The value, or a [`NoSuchElement`](crate::ErrorKind::NoSuchElement) cause.
    pub fn get(&self) -> Result<&T, Cause> {
        match self {
            Self::Some(value) => Ok(value),
            Self::None => Err(Cause::no_such_element("None.get()")),
        }
    }

    pub const fn as_ref(&self) -> Maybe<&T> {
        match self {
            Self::Some(value) => Maybe::Some(value),
            Self::None => Maybe::None,
        }
    }

    pub fn iter(&self) -> option::IntoIter<&T> {
        self.as_ref().to_optional().into_iter()
    }

    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Self::Some(value) => {
                if predicate(&value) {
                    Self::Some(value)
                } else {
                    Self::None
                }
            }
            Self::None => Self::None,
        }
    }

    pub fn map<U>(self, mapper: impl FnOnce(T) -> U) -> Maybe<U> {
        match self {
            Self::Some(value) => Maybe::Some(mapper(value)),
            Self::None => Maybe::None,
        }
    }

    pub fn flat_map<U>(self, mapper: impl FnOnce(T) -> Maybe<U>) -> Maybe<U> {
        match self {
            Self::Some(value) => mapper(value),
            Self::None => Maybe::None,
        }
    }

    pub fn fold<U>(self, if_none: impl FnOnce() -> U, if_some: impl FnOnce(T) -> U) -> U {
        match self {
            Self::Some(value) => if_some(value),
            Self::None => if_none(),
        }
    }

    /// `other` is evaluated by the caller whatever the state.
    pub fn get_or_else(self, other: T) -> T {
        match self {
            Self::Some(value) => value,
            Self::None => other,
        }
    }

    pub fn get_or_else_get(self, supplier: impl FnOnce() -> T) -> T {
        match self {
            Self::Some(value) => value,
            Self::None => supplier(),
        }
    }

    pub fn get_or_else_throw<E>(self, error: impl FnOnce() -> E) -> Result<T, E> {
        match self {
            Self::Some(value) => Ok(value),
            Self::None => Err(error()),
        }
    }

    pub fn or_else(self, supplier: impl FnOnce() -> Self) -> Self {
        match self {
            Self::None => supplier(),
            defined => defined,
        }
    }

    pub fn on_empty(self, action: impl FnOnce()) -> Self {
        if self.is_empty() {
            action();
        }
        self
    }

    pub fn on_defined(self, action: impl FnOnce(&T)) -> Self {
        if let Self::Some(value) = &self {
            action(value);
        }
        self
    }

    pub fn transform<U>(
        self,
        if_none: impl FnOnce() -> Maybe<U>,
        if_some: impl FnOnce(T) -> Maybe<U>,
    ) -> Maybe<U> {
        match self {
            Self::Some(value) => if_some(value),
            Self::None => if_none(),
        }
    }

    pub fn to_either<L>(self, left: impl FnOnce() -> L) -> Either<L, T> {
        match self {
            Self::Some(value) => Either::Right(value),
            Self::None => Either::Left(left()),
        }
    }

    #[must_use]
    pub fn to_optional(self) -> Option<T> {
        match self {
            Self::Some(value) => Some(value),
            Self::None => None,
        }
    }

    /// A success holding the value, or a failure of `if_none()`. A fatal
    /// cause unwinds as with [`Try::failure`].
    pub fn to_try(self, if_none: impl FnOnce() -> Cause) -> Try<T> {
        match self {
            Self::Some(value) => Try::success(value),
            Self::None => Try::failure(if_none()),
        }
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        Self::of(value)
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(value: Maybe<T>) -> Self {
        value.to_optional()
    }
}

impl<T: Hash> Hash for Maybe<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Some(value) => {
                SOME_SALT.hash(state);
                value.hash(state);
            }
            Self::None => NONE_HASH.hash(state),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Some(value) => write!(f, "Some({value})"),
            Self::None => f.write_str("None"),
        }
    }
}

impl<T> IntoIterator for Maybe<T> {
    type Item = T;
    type IntoIter = option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.to_optional().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Maybe<T> {
    type Item = &'a T;
    type IntoIter = option::IntoIter<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
