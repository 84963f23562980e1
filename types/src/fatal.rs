//! The fatality classifier.
//!
//! Every point where caller-supplied code runs inside a [`Try`](crate::Try)
//! combinator routes the code's error through [`NonFatal::capture`]. Causes
//! the active [`Classifier`] judges fatal are never turned into data: they
//! unwind out of the combinator as a panic whose payload is the `Cause`
//! itself, so the caller can still observe the exact condition with
//! [`catch`].
//!
//! The active classifier is process-wide. It defaults to
//! [`FatalPolicy::default`] and may be replaced once, before first use, via
//! [`install`].

use std::fmt;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cause::{Cause, ErrorKind};

/// Decides whether a cause must never be captured.
pub trait Classifier: Send + Sync + fmt::Debug {
    fn is_fatal(&self, cause: &Cause) -> bool;
}

/// Allow-list classifier: a cause is fatal if its kind [is a](ErrorKind::is_a)
/// listed kind.
///
/// The default list is [`FatalPolicy::DEFAULT_KINDS`]. `Fault`, `Assertion`
/// and every `Exception` stay non-fatal unless listed explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalPolicy {
    kinds: Vec<ErrorKind>,
}

impl FatalPolicy {
    pub const DEFAULT_KINDS: [ErrorKind; 3] = [
        ErrorKind::Linkage,
        ErrorKind::VirtualMachine,
        ErrorKind::Terminated,
    ];

    pub fn new(kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        kinds
            .into_iter()
            .fold(Self::empty(), |policy, kind| policy.with_kind(kind))
    }

    /// A policy under which nothing is fatal.
    #[must_use]
    pub fn empty() -> Self {
        Self { kinds: Vec::new() }
    }

    #[must_use]
    pub fn kinds(&self) -> &[ErrorKind] {
        &self.kinds
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    pub fn without_kind(mut self, kind: &ErrorKind) -> Self {
        self.kinds.retain(|listed| listed != kind);
        self
    }
}

impl Default for FatalPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KINDS)
    }
}

impl Classifier for FatalPolicy {
    fn is_fatal(&self, cause: &Cause) -> bool {
        self.kinds.iter().any(|kind| cause.is_a(kind))
    }
}

static CLASSIFIER: OnceLock<Box<dyn Classifier>> = OnceLock::new();

#[derive(Debug, Error)]
#[error("a fatal-cause classifier is already active")]
pub struct InstallError;

/// Replace the default classifier.
///
/// Fails once any classifier is active, including the default one picked up
/// by the first classification.
pub fn install(classifier: impl Classifier + 'static) -> Result<(), InstallError> {
    CLASSIFIER
        .set(Box::new(classifier))
        .map_err(|_| InstallError)?;
    tracing::debug!(classifier = ?active(), "Fatal-cause classifier installed");
    Ok(())
}

/// The classifier in effect for this process.
pub fn active() -> &'static dyn Classifier {
    &**CLASSIFIER.get_or_init(|| Box::new(FatalPolicy::default()))
}

#[must_use]
pub fn is_fatal(cause: &Cause) -> bool {
    active().is_fatal(cause)
}

/// Unwind with `cause` as the panic payload.
pub fn rethrow(cause: Cause) -> ! {
    tracing::error!(%cause, "Fatal cause escaping composition");
    panic::panic_any(cause)
}

/// Run `body`, returning a fatal [`Cause`] that unwound out of it as `Err`.
///
/// Panics that do not carry a `Cause` keep unwinding.
pub fn catch<R>(body: impl FnOnce() -> R) -> Result<R, Cause> {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<Cause>() {
            Ok(cause) => Err(*cause),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Classification refused to capture a cause.
#[derive(Debug, Error)]
#[error("fatal cause cannot be captured: {0}")]
pub struct FatalCause(pub Cause);

/// A cause the active classifier judged non-fatal.
///
/// Classification is the only way to obtain one, so a
/// [`Try::Failure`](crate::Try::Failure) never holds a fatal cause:
///
/// ```compile_fail
/// use recourse_types::{Cause, NonFatal};
///
/// let forged = NonFatal(Cause::of_kind(recourse_types::ErrorKind::Linkage));
/// ```
///
/// Deserialization re-runs the classifier and rejects fatal causes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Cause", into = "Cause")]
pub struct NonFatal(Cause);

impl NonFatal {
    /// Classify `cause`, unwinding via [`rethrow`] if it is fatal.
    #[must_use]
    pub fn capture(cause: Cause) -> Self {
        match Self::try_from(cause) {
            Ok(captured) => {
                tracing::trace!(cause = %captured.0, "Captured non-fatal cause");
                captured
            }
            Err(FatalCause(cause)) => rethrow(cause),
        }
    }

    #[must_use]
    pub fn cause(&self) -> &Cause {
        &self.0
    }

    #[must_use]
    pub fn into_cause(self) -> Cause {
        self.0
    }
}

impl TryFrom<Cause> for NonFatal {
    type Error = FatalCause;

    fn try_from(cause: Cause) -> Result<Self, Self::Error> {
        if is_fatal(&cause) {
            Err(FatalCause(cause))
        } else {
            Ok(Self(cause))
        }
    }
}

impl From<NonFatal> for Cause {
    fn from(captured: NonFatal) -> Self {
        captured.0
    }
}

impl Deref for NonFatal {
    type Target = Cause;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for NonFatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for NonFatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
