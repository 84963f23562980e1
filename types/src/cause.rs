//! Raised conditions and the taxonomy they are classified by.
//!
//! A [`Cause`] is the value a fallible computation hands back instead of a
//! result. Causes are reference counted and compared by identity: cloning a
//! cause yields the *same* condition, while two causes built separately from
//! identical parts are different conditions.

use std::convert::Infallible;
use std::error::Error;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::ptr;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Category of a [`Cause`].
///
/// Kinds form a tree rooted at [`ErrorKind::Any`]. [`ErrorKind::is_a`] walks
/// that tree, so matching against a kind also matches all of its descendants:
///
/// ```text
/// Any
/// ├─ Fault
/// │  ├─ Linkage
/// │  ├─ VirtualMachine
/// │  │  ├─ OutOfMemory
/// │  │  └─ StackOverflow
/// │  ├─ Terminated
/// │  └─ Assertion
/// └─ Exception
///    ├─ InvalidState
///    ├─ InvalidArgument
///    ├─ Unsupported
///    ├─ NoSuchElement
///    │  └─ PredicateNotSatisfied
///    ├─ NonFatal
///    ├─ Io
///    └─ Other(name)
/// ```
///
/// # Serde
///
/// Serializes as its [name](Self::name). Unknown names deserialize to
/// [`ErrorKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorKind {
    Any,
    /// Faults in the executing environment rather than in application logic.
    Fault,
    Linkage,
    VirtualMachine,
    OutOfMemory,
    StackOverflow,
    /// Forced termination of the running computation.
    Terminated,
    Assertion,
    /// Ordinary application errors.
    Exception,
    InvalidState,
    InvalidArgument,
    Unsupported,
    NoSuchElement,
    PredicateNotSatisfied,
    /// A captured cause surfaced again, e.g. by [`Try::get`](crate::Try::get).
    NonFatal,
    Io,
    /// Caller-defined kind; always a child of [`ErrorKind::Exception`].
    Other(String),
}

impl ErrorKind {
    /// A caller-defined kind. A name that belongs to a built-in kind yields
    /// that kind, so `other(name)` always survives a trip through its name.
    #[must_use]
    pub fn other(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Any => "Any",
            Self::Fault => "Fault",
            Self::Linkage => "Linkage",
            Self::VirtualMachine => "VirtualMachine",
            Self::OutOfMemory => "OutOfMemory",
            Self::StackOverflow => "StackOverflow",
            Self::Terminated => "Terminated",
            Self::Assertion => "Assertion",
            Self::Exception => "Exception",
            Self::InvalidState => "InvalidState",
            Self::InvalidArgument => "InvalidArgument",
            Self::Unsupported => "Unsupported",
            Self::NoSuchElement => "NoSuchElement",
            Self::PredicateNotSatisfied => "PredicateNotSatisfied",
            Self::NonFatal => "NonFatal",
            Self::Io => "Io",
            Self::Other(name) => name,
        }
    }

    /// The direct ancestor of this kind, `None` only for [`ErrorKind::Any`].
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self {
            Self::Any => None,
            Self::Fault | Self::Exception => Some(Self::Any),
            Self::Linkage | Self::VirtualMachine | Self::Terminated | Self::Assertion => {
                Some(Self::Fault)
            }
            Self::OutOfMemory | Self::StackOverflow => Some(Self::VirtualMachine),
            Self::PredicateNotSatisfied => Some(Self::NoSuchElement),
            Self::InvalidState
            | Self::InvalidArgument
            | Self::Unsupported
            | Self::NoSuchElement
            | Self::NonFatal
            | Self::Io
            | Self::Other(_) => Some(Self::Exception),
        }
    }

    /// This kind followed by each of its ancestors, ending at [`ErrorKind::Any`].
    pub fn lineage(&self) -> impl Iterator<Item = ErrorKind> {
        std::iter::successors(Some(self.clone()), Self::parent)
    }

    /// True if `self` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn is_a(&self, ancestor: &ErrorKind) -> bool {
        if *ancestor == Self::Any || self == ancestor {
            return true;
        }
        self.lineage().skip(1).any(|kind| kind == *ancestor)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for ErrorKind {
    fn from(name: &str) -> Self {
        match name {
            "Any" => Self::Any,
            "Fault" => Self::Fault,
            "Linkage" => Self::Linkage,
            "VirtualMachine" => Self::VirtualMachine,
            "OutOfMemory" => Self::OutOfMemory,
            "StackOverflow" => Self::StackOverflow,
            "Terminated" => Self::Terminated,
            "Assertion" => Self::Assertion,
            "Exception" => Self::Exception,
            "InvalidState" => Self::InvalidState,
            "InvalidArgument" => Self::InvalidArgument,
            "Unsupported" => Self::Unsupported,
            "NoSuchElement" => Self::NoSuchElement,
            "PredicateNotSatisfied" => Self::PredicateNotSatisfied,
            "NonFatal" => Self::NonFatal,
            "Io" => Self::Io,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for ErrorKind {
    fn from(name: String) -> Self {
        match Self::from(name.as_str()) {
            Self::Other(_) => Self::Other(name),
            known => known,
        }
    }
}

impl From<ErrorKind> for String {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Other(name) => name,
            known => known.name().to_owned(),
        }
    }
}

impl FromStr for ErrorKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

enum Source {
    Cause(Cause),
    Foreign(Box<dyn Error + Send + Sync>),
}

struct Inner {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<Source>,
}

/// A raised condition: a kind, an optional message and an optional source.
///
/// Equality and hashing use reference identity.
///
/// # Serde
///
/// Serializes as `{"kind": .., "message": .., "wrapped": ..}`. Foreign
/// sources are not carried, and a deserialized cause is a new condition.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "CauseRecord", into = "CauseRecord")]
pub struct Cause(Arc<Inner>);

impl Cause {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::build(kind, Some(message.into()), None)
    }

    /// A cause carrying no message.
    #[must_use]
    pub fn of_kind(kind: ErrorKind) -> Self {
        Self::build(kind, None, None)
    }

    /// A cause of `kind` whose source is `cause`, reusing its message.
    #[must_use]
    pub fn wrapping(kind: ErrorKind, cause: Cause) -> Self {
        let message = cause.message().map(str::to_owned);
        Self::build(kind, message, Some(Source::Cause(cause)))
    }

    /// Adopt a foreign error; its `Display` output becomes the message.
    pub fn from_error<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let message = error.to_string();
        Self::build(kind, Some(message), Some(Source::Foreign(Box::new(error))))
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported, message)
    }

    pub fn no_such_element(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoSuchElement, message)
    }

    fn build(kind: ErrorKind, message: Option<String>, source: Option<Source>) -> Self {
        Self(Arc::new(Inner {
            kind,
            message,
            source,
        }))
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.0.kind
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0.message.as_deref()
    }

    /// The cause this one wraps, if its source is a [`Cause`].
    #[must_use]
    pub fn wrapped(&self) -> Option<&Cause> {
        match &self.0.source {
            Some(Source::Cause(cause)) => Some(cause),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_a(&self, kind: &ErrorKind) -> bool {
        self.0.kind.is_a(kind)
    }

    /// True if both handles refer to the same condition.
    #[must_use]
    pub fn same_as(&self, other: &Cause) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Cause {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Cause {}

impl Hash for Cause {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{}: {message}", self.0.kind),
            None => write!(f, "{}", self.0.kind),
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Cause");
        debug.field("kind", &self.0.kind);
        if let Some(message) = self.message() {
            debug.field("message", &message);
        }
        match &self.0.source {
            Some(Source::Cause(cause)) => {
                debug.field("wrapped", cause);
            }
            Some(Source::Foreign(error)) => {
                debug.field("foreign", error);
            }
            None => {}
        }
        debug.finish()
    }
}

impl Error for Cause {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.0.source {
            Some(Source::Cause(cause)) => Some(cause),
            Some(Source::Foreign(error)) => Some(&**error),
            None => None,
        }
    }
}

impl From<io::Error> for Cause {
    fn from(error: io::Error) -> Self {
        Self::from_error(ErrorKind::Io, error)
    }
}

#[derive(Serialize, Deserialize)]
struct CauseRecord {
    kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wrapped: Option<Box<CauseRecord>>,
}

impl From<Cause> for CauseRecord {
    fn from(cause: Cause) -> Self {
        Self {
            kind: cause.kind().clone(),
            message: cause.message().map(str::to_owned),
            wrapped: cause.wrapped().cloned().map(|inner| Box::new(inner.into())),
        }
    }
}

impl From<CauseRecord> for Cause {
    fn from(record: CauseRecord) -> Self {
        let source = record
            .wrapped
            .map(|inner| Source::Cause(Cause::from(*inner)));
        Self::build(record.kind, record.message, source)
    }
}
