//! # Calculator Error Type
//!
//! This module defines [`CalcError`], the single error surface of the
//! evaluator pipeline. It covers three groups of failures:
//!
//! - **Lifecycle misuse** (starting a busy session, feeding an idle one,
//!   resetting mid-calculation),
//! - **Expression defects** (bad characters, malformed literals, operator
//!   placement, bracket balance, division by zero, inconsistent end state),
//! - **Cancellation** ([`CalcError::Aborted`], which is not an expression
//!   defect but the outcome of [`Calculator::abort`](crate::Calculator::abort)).
//!
//! The `Display` strings are what a network peer ultimately sees; no
//! structured code crosses the wire.
use smartstring::alias::String;
use thiserror::Error;

/// Represents all possible errors that can occur within the calculator.
///
/// Produced by the evaluation session and the streaming evaluator. The
/// session delivers at most one `CalcError` per calculation, through the
/// result of [`Calculator::wait`](crate::Calculator::wait).
///
/// # Examples
/// ```rust
/// # use bigcalc::CalcError;
/// let err = CalcError::DivisionByZero;
/// assert_eq!(err.to_string(), "division by zero");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// An empty chunk was handed to `start` or `feed`.
    #[error("empty expression")]
    EmptyInput,

    /// `start` was called on a session that is not idle.
    #[error("calculation already started")]
    AlreadyRunning,

    /// `feed` was called on a session with no calculation in flight.
    #[error("calculation is not running")]
    NotRunning,

    /// `reset` was called while the worker is still evaluating.
    #[error("calculation is running")]
    ResetWhileRunning,

    /// A byte is not a digit, operator, bracket, newline, or space.
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    /// A bare `-` without digits, or a literal the value type rejects.
    #[error("invalid expression: bad number {0:?}")]
    InvalidNumber(String),

    /// A math operator arrived where an operand was required.
    #[error("invalid expression: operator without left operand")]
    LeadingOperator,

    /// `()` with nothing inside.
    #[error("invalid expression: empty subexpression")]
    EmptyGroup,

    /// A reduction found fewer than two operands.
    #[error("invalid expression: not enough operands")]
    MissingOperands,

    /// A `)` without a matching `(`.
    #[error("invalid expression: unbalanced brackets")]
    UnbalancedParens,

    /// `/` with a zero right-hand operand.
    #[error("division by zero")]
    DivisionByZero,

    /// The terminator arrived but the expression state is inconsistent:
    /// unclosed brackets, a dangling operand, or non-space residue.
    #[error("invalid expression: unexpected end")]
    UnexpectedEnd,

    /// The calculation was cancelled via `abort`.
    #[error("calculation aborted")]
    Aborted,
}
