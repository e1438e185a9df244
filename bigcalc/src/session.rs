//! # Evaluation Session
//!
//! [`Calculator`] binds the chunk queue, the streaming evaluator, and a
//! dedicated worker thread into one restartable session:
//!
//! - [`Calculator::start`] clears state, enqueues the first chunk, and
//!   spawns the worker,
//! - [`Calculator::feed`] hands further chunks to the running worker,
//! - [`Calculator::abort`] cooperatively cancels: the worker observes the
//!   signal on its next byte peek and surfaces [`CalcError::Aborted`],
//! - [`Calculator::wait`] joins the worker and yields the result exactly
//!   once,
//! - [`Calculator::reset`] returns a finished session to idle.
//!
//! The operand and operator stacks live inside the worker; the only state
//! shared with the feeder is the chunk queue and three atomic flags, so the
//! `running`/`finished`/`errored` observers never take a lock.
//!
//! # Examples
//! ```rust
//! # use bigcalc::Calculator;
//! let mut calc = Calculator::<i64>::new();
//! calc.start("1 + 2 *").unwrap();
//! calc.feed(" 3\n").unwrap();
//! assert_eq!(calc.wait(), Some(Ok(7)));
//! assert!(calc.finished());
//! ```

use crate::chunk::ChunkQueue;
use crate::eval::Evaluator;
use crate::value::Number;
use crate::CalcError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[derive(Debug, Default)]
struct Flags {
    running: AtomicBool,
    finished: AtomicBool,
    errored: AtomicBool,
}

/// A restartable evaluation session over a value type `V`.
///
/// State machine: idle → running → finished (ok, error, or aborted); only
/// [`Calculator::reset`] leads from a finish state back to idle. `running`
/// and `finished` are never both set.
#[derive(Debug)]
pub struct Calculator<V> {
    input: Arc<ChunkQueue>,
    flags: Arc<Flags>,
    worker: Option<JoinHandle<Result<V, CalcError>>>,
}

impl<V: Number> Calculator<V> {
    pub fn new() -> Self {
        Self {
            input: Arc::new(ChunkQueue::new()),
            flags: Arc::new(Flags::default()),
            worker: None,
        }
    }

    /// Begins a new calculation with the first expression chunk.
    ///
    /// Fails with [`CalcError::EmptyInput`] on an empty chunk and with
    /// [`CalcError::AlreadyRunning`] unless the session is idle; a
    /// finished session must be [`reset`](Calculator::reset) first.
    pub fn start(&mut self, chunk: impl Into<Vec<u8>>) -> Result<(), CalcError> {
        let chunk = chunk.into();
        if chunk.is_empty() {
            return Err(CalcError::EmptyInput);
        }
        if self.flags.running.load(Ordering::SeqCst) || self.flags.finished.load(Ordering::SeqCst)
        {
            return Err(CalcError::AlreadyRunning);
        }

        self.input.clear();
        self.flags.errored.store(false, Ordering::SeqCst);
        self.flags.running.store(true, Ordering::SeqCst);
        self.input.push(chunk)?;

        let input = Arc::clone(&self.input);
        let flags = Arc::clone(&self.flags);
        self.worker = Some(thread::spawn(move || {
            let result = Evaluator::new(Arc::clone(&input)).run();
            if let Err(err) = &result {
                log::debug!("calculation failed: {err}");
                input.clear();
                flags.errored.store(true, Ordering::SeqCst);
            }
            flags.running.store(false, Ordering::SeqCst);
            flags.finished.store(true, Ordering::SeqCst);
            result
        }));
        Ok(())
    }

    /// Hands another chunk to the calculation in flight.
    pub fn feed(&mut self, chunk: impl Into<Vec<u8>>) -> Result<(), CalcError> {
        let chunk = chunk.into();
        if chunk.is_empty() {
            return Err(CalcError::EmptyInput);
        }
        if !self.flags.running.load(Ordering::SeqCst) {
            return Err(CalcError::NotRunning);
        }
        self.input.push(chunk)
    }

    /// Requests cancellation of a running calculation. Idempotent; a no-op
    /// on a session that is not running.
    ///
    /// The worker cannot be interrupted mid-arithmetic, but any wait for
    /// input is, and the next byte peek surfaces [`CalcError::Aborted`].
    pub fn abort(&self) {
        if self.flags.running.load(Ordering::SeqCst) {
            self.input.signal_abort();
        }
    }

    /// Returns a finished (or idle) session to the idle state.
    pub fn reset(&mut self) -> Result<(), CalcError> {
        if self.flags.running.load(Ordering::SeqCst) {
            return Err(CalcError::ResetWhileRunning);
        }
        if let Some(worker) = self.worker.take() {
            // the worker is past its last flag store; reap it and discard
            // any uncollected result
            let _ = worker.join();
        }
        self.input.clear();
        self.flags.finished.store(false, Ordering::SeqCst);
        self.flags.errored.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Blocks until the worker completes and returns its outcome, or `None`
    /// when no calculation was ever started (or the result was already
    /// taken).
    pub fn wait(&mut self) -> Option<Result<V, CalcError>> {
        let worker = self.worker.take()?;
        match worker.join() {
            Ok(result) => Some(result),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    pub fn running(&self) -> bool {
        self.flags.running.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> bool {
        self.flags.finished.load(Ordering::SeqCst)
    }

    pub fn errored(&self) -> bool {
        self.flags.errored.load(Ordering::SeqCst)
    }
}

impl<V> Drop for Calculator<V> {
    fn drop(&mut self) {
        if self.flags.running.load(Ordering::SeqCst) {
            self.input.signal_abort();
        }
        if let Some(worker) = self.worker.take() {
            if let Ok(Err(err)) = worker.join() {
                log::debug!("dropped calculation ended with: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn start_feed_wait() {
        init_logger();
        let mut calc = Calculator::<i64>::new();
        calc.start("1 + 2 *").unwrap();
        calc.feed("( 3 - 4 /").unwrap();
        calc.feed(" ( 5 -3 ) )").unwrap();
        calc.feed("\n").unwrap();
        assert_eq!(calc.wait(), Some(Ok(3)));
        assert!(!calc.running());
        assert!(calc.finished());
        assert!(!calc.errored());
    }

    #[test]
    fn wait_before_completion_blocks_until_done() {
        init_logger();
        let mut calc = Calculator::<i64>::new();
        calc.start("(4 - 2 ) - ( 5 * 3 )\n").unwrap();
        assert_eq!(calc.wait(), Some(Ok(-13)));
    }

    #[test]
    fn wait_without_start() {
        let mut calc = Calculator::<i64>::new();
        assert_eq!(calc.wait(), None);
    }

    #[test]
    fn empty_chunks_are_rejected() {
        let mut calc = Calculator::<i64>::new();
        assert_eq!(calc.start(""), Err(CalcError::EmptyInput));
        assert_eq!(calc.feed(""), Err(CalcError::EmptyInput));
        calc.start("1 +").unwrap();
        assert_eq!(calc.feed(""), Err(CalcError::EmptyInput));
        calc.abort();
        assert_eq!(calc.wait(), Some(Err(CalcError::Aborted)));
    }

    #[test]
    fn feed_requires_a_running_calculation() {
        let mut calc = Calculator::<i64>::new();
        assert_eq!(calc.feed("1+2\n"), Err(CalcError::NotRunning));
    }

    #[test]
    fn start_requires_an_idle_session() {
        init_logger();
        let mut calc = Calculator::<i64>::new();
        calc.start("1 +").unwrap();
        assert_eq!(calc.start("2\n"), Err(CalcError::AlreadyRunning));
        calc.feed("2\n").unwrap();
        assert_eq!(calc.wait(), Some(Ok(3)));
        // finished but not reset
        assert_eq!(calc.start("1\n"), Err(CalcError::AlreadyRunning));
        calc.reset().unwrap();
        calc.start("1\n").unwrap();
        assert_eq!(calc.wait(), Some(Ok(1)));
    }

    #[test]
    fn abort_resolves_a_starved_worker() {
        init_logger();
        let mut calc = Calculator::<i64>::new();
        calc.start("1 + ").unwrap();
        assert!(calc.running());
        calc.abort();
        calc.abort(); // idempotent
        assert_eq!(calc.wait(), Some(Err(CalcError::Aborted)));
        assert!(!calc.running());
        assert!(calc.finished());
        assert!(calc.errored());
        calc.reset().unwrap();
        calc.start("4 / 2\n").unwrap();
        assert_eq!(calc.wait(), Some(Ok(2)));
    }

    #[test]
    fn reset_is_refused_while_running() {
        init_logger();
        let mut calc = Calculator::<i64>::new();
        calc.start("1 + ").unwrap();
        assert_eq!(calc.reset(), Err(CalcError::ResetWhileRunning));
        calc.abort();
        assert_eq!(calc.wait(), Some(Err(CalcError::Aborted)));
        calc.reset().unwrap();
        assert!(!calc.finished());
        assert!(!calc.errored());
    }

    #[test]
    fn expression_errors_finish_the_session() {
        init_logger();
        let mut calc = Calculator::<i64>::new();
        calc.start("1 / 0\n").unwrap();
        assert_eq!(calc.wait(), Some(Err(CalcError::DivisionByZero)));
        assert!(calc.finished());
        assert!(calc.errored());
        // the dead calculation accepts no more input
        assert_eq!(calc.feed("1\n"), Err(CalcError::NotRunning));
    }

    #[test]
    fn drop_aborts_a_running_calculation() {
        init_logger();
        let mut calc = Calculator::<i64>::new();
        calc.start("1 + ").unwrap();
        drop(calc); // must not hang
    }

    #[test]
    fn reset_without_collecting_the_result() {
        init_logger();
        let mut calc = Calculator::<i64>::new();
        calc.start("1 + 2\n").unwrap();
        while calc.running() {
            std::thread::yield_now();
        }
        calc.reset().unwrap();
        assert_eq!(calc.wait(), None);
        calc.start("5\n").unwrap();
        assert_eq!(calc.wait(), Some(Ok(5)));
    }
}
