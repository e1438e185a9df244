//! # Calculator Handles
//!
//! A network session should not care which value type the calculator runs
//! on. [`CalcHandle`] is that seam: chunk routing, lifecycle observers, and
//! a stringified result. [`NumericHandle`] implements it over any
//! [`Number`]; [`HandleFactory`] lets the server mint one handle per
//! accepted connection.

use bigcalc::{CalcError, Calculator, Number};
use std::marker::PhantomData;

/// Value-type-independent interface between a connection and its
/// calculator session.
pub trait CalcHandle: Send {
    /// Routes one transport read to the calculation. `end` marks a
    /// complete transmission: a trailing newline was seen, or the peer hit
    /// EOF, in which case the missing terminator is appended.
    fn on_data(&mut self, data: &[u8], end: bool) -> Result<(), CalcError>;

    fn running(&self) -> bool;
    fn finished(&self) -> bool;
    fn errored(&self) -> bool;

    /// Cancels the calculation in flight, if any.
    fn abort(&self);

    /// Returns the handle to idle for the next expression.
    fn reset(&mut self) -> Result<(), CalcError>;

    /// Blocks for the outcome and renders it for the wire: the decimal
    /// value, or the error message.
    fn result(&mut self) -> String;
}

/// The production [`CalcHandle`] over a [`Calculator<V>`].
pub struct NumericHandle<V: Number> {
    calc: Calculator<V>,
}

impl<V: Number> NumericHandle<V> {
    pub fn new() -> Self {
        Self {
            calc: Calculator::new(),
        }
    }
}

impl<V: Number> CalcHandle for NumericHandle<V> {
    fn on_data(&mut self, data: &[u8], end: bool) -> Result<(), CalcError> {
        if data.is_empty() {
            return Ok(());
        }
        let mut chunk = data.to_vec();
        if end && chunk.last() != Some(&b'\n') {
            chunk.push(b'\n');
        }
        if self.calc.running() {
            return self.calc.feed(chunk);
        }
        if self.calc.finished() {
            // a failed calculation awaits its result write; drop the rest
            // of the doomed transmission
            return Ok(());
        }
        self.calc.start(chunk)
    }

    fn running(&self) -> bool {
        self.calc.running()
    }

    fn finished(&self) -> bool {
        self.calc.finished()
    }

    fn errored(&self) -> bool {
        self.calc.errored()
    }

    fn abort(&self) {
        self.calc.abort();
    }

    fn reset(&mut self) -> Result<(), CalcError> {
        self.calc.reset()
    }

    fn result(&mut self) -> String {
        match self.calc.wait() {
            Some(Ok(value)) => value.to_decimal(),
            Some(Err(err)) => err.to_string(),
            None => String::from("No calculation was done"),
        }
    }
}

/// Mints one calculator handle per accepted connection.
pub trait HandleFactory: Send + Sync {
    fn create(&self) -> Box<dyn CalcHandle>;
}

/// [`HandleFactory`] producing [`NumericHandle<V>`]s.
pub struct NumericHandleFactory<V> {
    _marker: PhantomData<fn() -> V>,
}

impl<V> NumericHandleFactory<V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<V: Number> HandleFactory for NumericHandleFactory<V> {
    fn create(&self) -> Box<dyn CalcHandle> {
        Box::new(NumericHandle::<V>::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn whole_expression_in_one_read() {
        let mut handle = NumericHandle::<i64>::new();
        handle.on_data(b"1 + 2\n", true).unwrap();
        assert_eq!(handle.result(), "3");
        assert!(handle.finished());
        assert!(!handle.errored());
    }

    #[test]
    fn expression_over_several_reads() {
        let mut handle = NumericHandle::<i64>::new();
        handle.on_data(b"(4 - 2 ) - ", false).unwrap();
        handle.on_data(b"( 5 * 3 )", false).unwrap();
        handle.on_data(b"\n", true).unwrap();
        assert_eq!(handle.result(), "-13");
    }

    #[test]
    fn eof_supplies_the_missing_terminator() {
        let mut handle = NumericHandle::<i64>::new();
        handle.on_data(b"1 + 2", true).unwrap();
        assert_eq!(handle.result(), "3");
    }

    #[test]
    fn errors_render_their_message() {
        let mut handle = NumericHandle::<i64>::new();
        handle.on_data(b"1 / 0\n", true).unwrap();
        assert_eq!(handle.result(), "division by zero");
        assert!(handle.errored());
    }

    #[test]
    fn data_after_a_failure_is_dropped() {
        let mut handle = NumericHandle::<i64>::new();
        handle.on_data(b"1 / 0\n", false).unwrap();
        // the worker has already failed once the result is taken; any tail
        // of the transmission is ignored
        assert_eq!(handle.result(), "division by zero");
        handle.on_data(b" + 3", false).unwrap();
        assert_eq!(handle.result(), "No calculation was done");
    }

    #[test]
    fn result_without_any_data() {
        let mut handle = NumericHandle::<i64>::new();
        assert_eq!(handle.result(), "No calculation was done");
    }

    #[test]
    fn reset_enables_the_next_expression() {
        let mut handle = NumericHandle::<BigInt>::new();
        handle.on_data(b"10 * 10\n", false).unwrap();
        assert_eq!(handle.result(), "100");
        handle.reset().unwrap();
        handle.on_data(b"10 / 4\n", false).unwrap();
        assert_eq!(handle.result(), "2");
    }
}
