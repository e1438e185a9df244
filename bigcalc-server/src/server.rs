//! TCP acceptor with a bounded session pool.
//!
//! Each accepted connection gets a fresh handle from the factory and runs
//! its [`Session`] on its own thread. The number of live sessions is
//! bounded; connections beyond the bound are refused by dropping the
//! socket.

use crate::handle::HandleFactory;
use crate::session::Session;
use anyhow::Result;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub struct Server {
    listener: TcpListener,
    factory: Arc<dyn HandleFactory>,
    max_sessions: usize,
    active: Arc<AtomicUsize>,
}

impl Server {
    /// Binds the listener. `max_sessions` bounds the number of concurrent
    /// client sessions.
    pub fn bind(
        addr: impl ToSocketAddrs,
        factory: Arc<dyn HandleFactory>,
        max_sessions: usize,
    ) -> io::Result<Self> {
        Ok(Self {
            listener: TcpListener::bind(addr)?,
            factory,
            max_sessions,
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// The bound address; useful when binding port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the process ends.
    pub fn run(&self) -> Result<()> {
        log::info!("listening on {}", self.listener.local_addr()?);
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.dispatch(stream),
                Err(err) => log::error!("accept failed: {err}"),
            }
        }
        Ok(())
    }

    fn dispatch(&self, stream: TcpStream) {
        if self.active.fetch_add(1, Ordering::SeqCst) >= self.max_sessions {
            self.active.fetch_sub(1, Ordering::SeqCst);
            log::error!(
                "connection refused: session limit {} reached",
                self.max_sessions
            );
            return;
        }

        let factory = Arc::clone(&self.factory);
        let active = Arc::clone(&self.active);
        thread::spawn(move || {
            let peer = stream
                .peer_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| String::from("unknown"));
            log::info!("session opened for {peer}");
            match Session::new(stream, factory.create()).run() {
                Ok(()) => log::info!("session closed for {peer}"),
                Err(err) => log::error!("session for {peer} failed: {err}"),
            }
            active.fetch_sub(1, Ordering::SeqCst);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::NumericHandleFactory;
    use num_bigint::BigInt;
    use std::io::{BufRead, BufReader, Write};

    fn spawn_server(max_sessions: usize) -> SocketAddr {
        let factory = Arc::new(NumericHandleFactory::<BigInt>::new());
        let server = Server::bind("127.0.0.1:0", factory, max_sessions).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.run());
        addr
    }

    #[test]
    fn answers_over_tcp() {
        let addr = spawn_server(4);
        let stream = TcpStream::connect(addr).unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut stream = stream;

        stream.write_all(b"(4 - 2 ) - ( 5 * 3 )\n").unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "-13\n");

        // the session resets and serves the next expression
        stream.write_all(b"1 + 2\n").unwrap();
        line.clear();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "3\n");
    }

    #[test]
    fn big_integers_over_tcp() {
        let addr = spawn_server(4);
        let stream = TcpStream::connect(addr).unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut stream = stream;

        stream
            .write_all(b"123456789012345678901234567890 * 1000000000000\n")
            .unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "123456789012345678901234567890000000000000\n");
    }

    #[test]
    fn refused_when_the_limit_is_reached() {
        let addr = spawn_server(0);
        let stream = TcpStream::connect(addr).unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        // the server drops the socket without writing anything
        assert_eq!(reader.read_line(&mut line).unwrap(), 0);
    }
}
