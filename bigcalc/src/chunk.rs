//! Producer/consumer queue of expression chunks.
//!
//! The feeder pushes byte chunks in transport order; the evaluation worker
//! peeks one byte at a time through a persistent read cursor. A literal or
//! a run of spaces may straddle chunk boundaries, so the cursor survives
//! the head chunk being popped. [`ChunkQueue::peek`] blocks on a single
//! condition variable until a byte is available or the queue is aborted.

use crate::CalcError;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

#[derive(Debug, Default)]
struct QueueState {
    chunks: VecDeque<Vec<u8>>,
    cursor: usize,
    aborted: bool,
}

/// Shared input queue between the feeder and the evaluation worker.
///
/// All operations are O(1) under one mutex; `peek` is the only blocking
/// call and re-checks its predicate (byte available or aborted) on every
/// wakeup.
#[derive(Debug, Default)]
pub struct ChunkQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl ChunkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a chunk and wakes at most one waiter.
    ///
    /// Empty chunks are rejected: they carry no bytes and would only
    /// produce a spurious wakeup.
    pub fn push(&self, chunk: Vec<u8>) -> Result<(), CalcError> {
        if chunk.is_empty() {
            return Err(CalcError::EmptyInput);
        }
        let mut state = self.state.lock().unwrap();
        log::trace!("queueing {} bytes", chunk.len());
        state.chunks.push_back(chunk);
        self.ready.notify_one();
        Ok(())
    }

    /// Returns the byte under the cursor without consuming it, skipping
    /// ASCII spaces and exhausted chunks on the way.
    ///
    /// Blocks while the queue is empty. Fails with [`CalcError::Aborted`]
    /// once [`ChunkQueue::signal_abort`] has been called; the abort flag is
    /// checked before anything else, so an abort is observed on the next
    /// peek even when input is still buffered.
    pub fn peek(&self) -> Result<u8, CalcError> {
        let mut state = self.state.lock().unwrap();
        loop {
            if state.aborted {
                return Err(CalcError::Aborted);
            }
            let Some(chunk) = state.chunks.front() else {
                state = self.ready.wait(state).unwrap();
                continue;
            };
            let mut pos = state.cursor;
            while chunk.get(pos) == Some(&b' ') {
                pos += 1;
            }
            match chunk.get(pos).copied() {
                Some(byte) => {
                    state.cursor = pos;
                    return Ok(byte);
                }
                None => {
                    state.cursor = 0;
                    state.chunks.pop_front();
                }
            }
        }
    }

    /// Moves the cursor one byte forward.
    pub fn advance(&self) {
        let mut state = self.state.lock().unwrap();
        state.cursor += 1;
    }

    /// Raises the abort flag and wakes every waiter.
    pub fn signal_abort(&self) {
        let mut state = self.state.lock().unwrap();
        log::trace!("abort signalled");
        state.aborted = true;
        self.ready.notify_all();
    }

    /// Drops all buffered input and clears the cursor and abort flag.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        *state = QueueState::default();
    }

    /// `true` if consuming stopped in an acceptable end state: nothing
    /// buffered beyond the current chunk, and nothing after the cursor but
    /// spaces.
    pub fn residue_is_blank(&self) -> bool {
        let state = self.state.lock().unwrap();
        match state.chunks.len() {
            0 => true,
            1 => state.chunks[0]
                .get(state.cursor..)
                .is_none_or(|rest| rest.iter().all(|&b| b == b' ')),
            _ => false,
        }
    }
}
