use std::io::{self, Read};
use std::time::Duration;

use reqwest::StatusCode;

const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("can't connect to stream: {0}")]
    Network(#[source] reqwest::Error),

    #[error("received non-success response: {0}")]
    BadStatus(StatusCode),
}

/// Opens stream connections. The seam lets the supervisor be driven
/// without real sockets.
pub trait Connector {
    fn connect(&self, url: &str) -> Result<StreamSource, StreamError>;
}

/// Plain HTTP connector used in production.
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn connect(&self, url: &str) -> Result<StreamSource, StreamError> {
        StreamSource::open(url)
    }
}

/// One live connection to a stream URL, exposed as a sequential byte
/// stream for decoding.
pub struct StreamSource {
    url: String,
    body: Option<Box<dyn Read + Send + Sync>>,
}

impl StreamSource {
    /// Opens the connection. Performs exactly one request; retrying is
    /// the caller's decision.
    pub fn open(url: &str) -> Result<Self, StreamError> {
        let resp = reqwest::blocking::Client::builder()
            .user_agent(APP_USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(StreamError::Network)?
            .get(url)
            .send()
            .map_err(StreamError::Network)?;

        if !resp.status().is_success() {
            return Err(StreamError::BadStatus(resp.status()));
        }

        log::debug!("stream connection to {url} opened");

        Ok(Self {
            url: url.to_string(),
            body: Some(Box::new(resp)),
        })
    }

    /// Wraps an already open reader, bypassing the network.
    pub fn from_reader<R>(url: &str, reader: R) -> Self
    where
        R: Read + Send + Sync + 'static,
    {
        Self {
            url: url.to_string(),
            body: Some(Box::new(reader)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_open(&self) -> bool {
        self.body.is_some()
    }

    /// Releases the connection. Repeat calls have no effect.
    pub fn close(&mut self) {
        if self.body.take().is_some() {
            log::debug!("stream connection to {} closed", self.url);
        }
    }
}

impl Read for StreamSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.body.as_mut() {
            Some(body) => body.read(buf),
            None => Ok(0),
        }
    }
}

impl Drop for StreamSource {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::StreamSource;

    #[test]
    fn reads_body_sequentially() {
        let mut source = StreamSource::from_reader("https://host/Stream", Cursor::new(b"abc".to_vec()));

        let mut body = String::new();
        source.read_to_string(&mut body).unwrap();

        assert_eq!(body, "abc");
        assert_eq!(source.url(), "https://host/Stream");
    }

    #[test]
    fn close_is_idempotent() {
        let mut source = StreamSource::from_reader("https://host/Stream", Cursor::new(b"abc".to_vec()));
        assert!(source.is_open());

        source.close();
        assert!(!source.is_open());

        source.close();
        assert!(!source.is_open());
    }

    #[test]
    fn read_after_close_is_eof() {
        let mut source = StreamSource::from_reader("https://host/Stream", Cursor::new(b"abc".to_vec()));
        source.close();

        let mut buf = [0u8; 8];
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }
}
