//! Outbound message channel to the application server.
//!
//! Sends are fire-and-forget: nothing in the header waits on a reply, and a
//! failed send is logged by the caller rather than surfaced to the selector.

pub mod message;

pub use message::BackendMessage;

use crate::error::{Error, Result};
use std::io::Write;
use std::net::TcpStream;
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use tracing::{debug, info};

pub trait Backend: Send + Sync {
    fn send(&self, message: &BackendMessage) -> Result<()>;
}

/// Delivers messages to an in-process receiver.
pub struct ChannelBackend {
    tx: Sender<BackendMessage>,
}

impl ChannelBackend {
    pub fn new(tx: Sender<BackendMessage>) -> Self {
        Self { tx }
    }
}

impl Backend for ChannelBackend {
    fn send(&self, message: &BackendMessage) -> Result<()> {
        self.tx
            .send(message.clone())
            .map_err(|_| Error::BackendClosed)
    }
}

/// Writes one JSON document per line.
pub struct WriterBackend<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterBackend<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl WriterBackend<TcpStream> {
    pub fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        info!(%addr, "connected to backend");
        Ok(Self::new(stream))
    }
}

impl<W: Write + Send> Backend for WriterBackend<W> {
    fn send(&self, message: &BackendMessage) -> Result<()> {
        let line = message.to_json()?;
        let mut writer = self.writer.lock().map_err(|_| Error::BackendClosed)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Used when no server address is configured.
#[derive(Debug, Default)]
pub struct LogBackend;

impl Backend for LogBackend {
    fn send(&self, message: &BackendMessage) -> Result<()> {
        debug!(kind = %message.kind, payload = ?message.payload, "backend message (not delivered)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn tcp_backend_streams_json_lines() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr").to_string();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            BufReader::new(stream)
                .lines()
                .take(2)
                .collect::<std::io::Result<Vec<String>>>()
                .expect("read lines")
        });

        let backend = WriterBackend::connect(&addr).expect("connect");
        backend
            .send(&BackendMessage::set_dataset("quickstart"))
            .expect("send");
        backend.send(&BackendMessage::refresh()).expect("send");

        let lines = server.join().expect("server");
        assert_eq!(
            lines,
            vec![
                r#"{"type":"set_dataset","payload":{"dataset_name":"quickstart"}}"#.to_string(),
                r#"{"type":"refresh","payload":{}}"#.to_string(),
            ]
        );
    }

    #[test]
    fn connect_to_closed_port_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr").to_string();
        drop(listener);
        assert!(matches!(WriterBackend::connect(&addr), Err(Error::Io(_))));
    }

    #[test]
    fn channel_backend_delivers_clone() {
        let (tx, rx) = mpsc::channel();
        let backend = ChannelBackend::new(tx);
        backend
            .send(&BackendMessage::set_dataset("cifar10"))
            .expect("send");
        let received = rx.try_recv().expect("message");
        assert_eq!(received, BackendMessage::set_dataset("cifar10"));
    }

    #[test]
    fn channel_backend_reports_closed_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let backend = ChannelBackend::new(tx);
        let err = backend.send(&BackendMessage::refresh()).unwrap_err();
        assert!(matches!(err, Error::BackendClosed));
    }

    #[test]
    fn writer_backend_emits_json_lines() {
        let backend = WriterBackend::new(Vec::new());
        backend.send(&BackendMessage::refresh()).expect("send");
        backend
            .send(&BackendMessage::set_dataset("mnist"))
            .expect("send");
        let written = String::from_utf8(backend.into_inner()).expect("utf8");
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"type":"refresh","payload":{}}"#,
                r#"{"type":"set_dataset","payload":{"dataset_name":"mnist"}}"#,
            ]
        );
    }
}
