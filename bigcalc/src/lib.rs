//! Streaming arbitrary-precision arithmetic over byte chunks.
//!
//! `bigcalc` evaluates newline-terminated arithmetic expressions
//! (`+ - * /`, brackets, decimal integer literals with an optional sign)
//! that arrive as an arbitrary sequence of byte chunks, the way a network
//! transport delivers them. The evaluator makes forward progress on
//! whatever is buffered and suspends only when it genuinely needs more
//! input, so an expression never has to be materialized in full.
//!
//! The building blocks, leaves first:
//!
//! - [`classify`] / [`Oper`]: byte classification and operator precedence,
//! - [`ChunkQueue`]: the producer/consumer chunk buffer with its blocking,
//!   space-skipping byte cursor,
//! - [`Evaluator`]: the shunting-yard state machine itself,
//! - [`Calculator`]: the session tying them to a worker thread with a
//!   start / feed / abort / reset lifecycle,
//! - [`Number`]: the value abstraction; `num_bigint::BigInt` is the
//!   production implementation.
//!
//! # Examples
//! ```rust
//! # use bigcalc::{Calculator, Number};
//! # use num_bigint::BigInt;
//! let mut calc = Calculator::<BigInt>::new();
//! calc.start("(4 - 2 ) - ( 5 * 3 )\n").unwrap();
//! let result = calc.wait().unwrap().unwrap();
//! assert_eq!(result.to_decimal(), "-13");
//! ```

pub mod chunk;
pub mod error;
pub mod eval;
pub mod oper;
pub mod session;
pub mod value;

pub use chunk::ChunkQueue;
pub use error::CalcError;
pub use eval::Evaluator;
pub use oper::{classify, ByteClass, Oper};
pub use session::Calculator;
pub use value::Number;
