//! Fallible-computation values for recourse.
//!
//! This crate contains pure value types with no IO and no async:
//!
//! - [`Try`]: a success value or a captured non-fatal [`Cause`]
//! - [`Maybe`]: a present or absent value
//! - [`fatal`]: the classifier deciding which causes are never captured
//! - [`function`]: checked function, predicate and consumer contracts
//! - [`codec`]: byte-level round trip for both value types
//!
//! [`Either`] is re-exported as the target of `to_either` conversions.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::must_use_candidate)] // Combinators already carry #[must_use] on their types

mod attempt;
mod cause;
pub mod codec;
pub mod fatal;
pub mod function;
mod maybe;

pub use attempt::Try;
pub use cause::{Cause, ErrorKind};
pub use codec::CodecError;
pub use either::Either;
pub use fatal::{Classifier, FatalPolicy, InstallError, NonFatal};
pub use function::{CheckedConsumer, CheckedFunction, CheckedPredicate};
pub use maybe::Maybe;
