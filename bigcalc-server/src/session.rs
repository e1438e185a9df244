//! Per-connection session: framing and result delivery.
//!
//! A session owns one transport and one [`CalcHandle`]. Reads are taken in
//! 8 KiB chunks; a read whose last byte is the terminator newline (or a
//! read hitting EOF) completes the transmission, at which point the
//! stringified outcome plus `\n` goes back to the peer and the handle is
//! reset for the next expression on the same connection.
//!
//! The transport is any `Read + Write`, so tests drive a session with a
//! scripted stream instead of a socket.

use crate::handle::CalcHandle;
use anyhow::Result;
use std::io::{Read, Write};

const READ_CHUNK_SIZE: usize = 8192;

pub struct Session<S> {
    stream: S,
    handle: Box<dyn CalcHandle>,
}

impl<S: Read + Write> Session<S> {
    pub fn new(stream: S, handle: Box<dyn CalcHandle>) -> Self {
        Self { stream, handle }
    }

    /// Serves the connection until the peer closes it.
    pub fn run(mut self) -> Result<()> {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        loop {
            let n = self.stream.read(&mut buf)?;
            if !self.on_data(&buf[..n], n == 0)? {
                return Ok(());
            }
        }
    }

    /// Routes one read worth of bytes. Returns `false` once the peer has
    /// hit EOF and the session is done.
    fn on_data(&mut self, data: &[u8], eof: bool) -> Result<bool> {
        let errored = self.handle.errored();
        let mut complete = false;
        if !data.is_empty() && !errored {
            complete = eof || data.last() == Some(&b'\n');
            self.handle.on_data(data, complete)?;
        } else if eof && !errored && self.handle.running() {
            // the peer closed with a transmission in flight; complete it
            // with the terminator the peer never sent
            self.handle.on_data(b"\n", true)?;
            complete = true;
        }
        if complete || errored {
            self.write_result()?;
        }
        Ok(!eof)
    }

    fn write_result(&mut self) -> Result<()> {
        let result = self.handle.result();
        log::debug!("writing result: {result:?}");
        self.stream.write_all(result.as_bytes())?;
        self.stream.write_all(b"\n")?;
        self.stream.flush()?;
        self.handle.reset()?;
        Ok(())
    }
}
