//! Request bodies.

use std::fmt;

use bytes::Bytes;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// A request body: buffered bytes or a one-shot byte stream.
///
/// Strings and byte buffers have a known length and can be replayed on a
/// method-preserving redirect. A reader is consumed by the first exchange.
///
/// ```
/// use requests::Body;
///
/// let body: Body = "plain text".into();
/// assert_eq!(body.len(), Some(10));
/// ```
pub enum Body {
    /// Buffered bytes
    Bytes(Bytes),
    /// A readable stream of unknown length
    Reader(Box<dyn AsyncRead + Send + Sync + Unpin>),
}

impl Body {
    /// Wraps an async reader. The body length is unknown.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        Body::Reader(Box::new(reader))
    }

    /// Total length, when it is known without reading.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Option<u64> {
        match self {
            Body::Bytes(bytes) => Some(bytes.len() as u64),
            Body::Reader(_) => None,
        }
    }

    /// The buffered bytes, or `None` for a stream.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes(bytes) => Some(bytes),
            Body::Reader(_) => None,
        }
    }

    /// A copy of the body if it can be sent again.
    pub fn try_clone(&self) -> Option<Body> {
        match self {
            Body::Bytes(bytes) => Some(Body::Bytes(bytes.clone())),
            Body::Reader(_) => None,
        }
    }

    /// Converts into a `reqwest` body, streaming readers chunk by chunk.
    pub(crate) fn into_reqwest(self) -> reqwest::Body {
        match self {
            Body::Bytes(bytes) => reqwest::Body::from(bytes),
            Body::Reader(reader) => reqwest::Body::wrap_stream(ReaderStream::new(reader)),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Body::Reader(_) => f.write_str("Reader"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Body::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Bytes(Bytes::from(s))
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }
}
