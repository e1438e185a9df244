//! TCP calculator service over the streaming evaluator.
//!
//! Clients connect, send a newline-terminated arithmetic expression in as
//! many pieces as they like, and receive `<result>\n` back: the decimal
//! value, or a human-readable error message. One connection can evaluate
//! any number of expressions in sequence.
//!
//! The layers, inside out: [`CalcHandle`] hides the value type from the
//! transport, [`Session`] frames reads and writes over any `Read + Write`,
//! and [`Server`] accepts TCP connections into a bounded session pool.

pub mod handle;
pub mod server;
pub mod session;

pub use handle::{CalcHandle, HandleFactory, NumericHandle, NumericHandleFactory};
pub use server::Server;
pub use session::Session;
