//! # Value Abstraction
//!
//! The evaluator is generic over the arithmetic it performs. [`Number`]
//! captures the minimal capability set: the four operations (via the
//! `std::ops` supertraits, consuming both operands), a zero test to guard
//! division, and decimal parse/render for the wire format.
//!
//! Two implementations ship with the crate:
//!
//! - [`num_bigint::BigInt`]: the production type. Division truncates
//!   toward zero, which is exactly the contract the service exposes.
//! - [`i64`]: a cheap stand-in for tests.
//!
//! # Examples
//! ```rust
//! # use bigcalc::Number;
//! # use num_bigint::BigInt;
//! let n = BigInt::from_decimal("-170141183460469231731687303715884105728").unwrap();
//! assert!(!n.is_zero());
//! assert_eq!(n.to_decimal(), "-170141183460469231731687303715884105728");
//! ```

use num_bigint::BigInt;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// An arithmetic value the evaluator can compute with.
///
/// `Send + 'static` because values cross into the session's worker thread
/// and the final one crosses back through its join handle.
pub trait Number:
    Sized
    + Debug
    + Send
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Parses a decimal literal: an optional leading `-` followed by one or
    /// more ASCII digits. Returns `None` for anything the type rejects.
    fn from_decimal(literal: &str) -> Option<Self>;

    /// `true` if the value equals zero.
    fn is_zero(&self) -> bool;

    /// Renders the value as a decimal string.
    fn to_decimal(&self) -> String;
}

impl Number for BigInt {
    fn from_decimal(literal: &str) -> Option<Self> {
        literal.parse().ok()
    }

    fn is_zero(&self) -> bool {
        num_traits::Zero::is_zero(self)
    }

    fn to_decimal(&self) -> String {
        self.to_string()
    }
}

impl Number for i64 {
    fn from_decimal(literal: &str) -> Option<Self> {
        literal.parse().ok()
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn to_decimal(&self) -> String {
        self.to_string()
    }
}
