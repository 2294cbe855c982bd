//! External sources over `std::io`
//!
//! Both sources borrow or own a reader supplied by the caller. Any
//! `Read`/`BufRead` works, including `&mut TcpStream`, so the connection
//! stays owned and closed by whoever opened it.
//!
//! End-of-stream is reported as [`SourceError::EndOfStream`], which makes it
//! the terminal latched error of an [`ExternalProducer`](crate::ExternalProducer).

use std::io::{self, BufRead, Read};
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::config::ReadConfig;
use crate::external::ExternalSource;

/// Errors reported by the I/O sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The reader returned no more data.
    #[error("end of stream")]
    EndOfStream,

    /// Underlying I/O failure.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    /// A delimited record was not valid UTF-8.
    #[error("record is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

impl SourceError {
    /// True for a clean end of stream rather than a failure.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, SourceError::EndOfStream)
    }
}

/// Reads byte chunks of at most `chunk_size` bytes.
#[derive(Debug)]
pub struct ChunkSource<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: Read> ChunkSource<R> {
    /// Chunked reader using `config.chunk_size`.
    pub fn new(reader: R, config: &ReadConfig) -> Self {
        Self {
            reader,
            chunk_size: config.chunk_size,
        }
    }

    /// Give back the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ExternalSource for ChunkSource<R> {
    type Chunk = Vec<u8>;
    type Error = SourceError;

    fn read(&mut self) -> Result<Vec<u8>, SourceError> {
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Err(SourceError::EndOfStream),
                Ok(n) => {
                    buf.truncate(n);
                    return Ok(buf);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Reads one delimited text record per call, delimiter stripped.
///
/// With the default `\n` delimiter a trailing `\r` is stripped as well.
/// A final record without a delimiter is still delivered.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    delimiter: u8,
}

impl<R: BufRead> LineSource<R> {
    /// Record reader using `config.delimiter`.
    pub fn new(reader: R, config: &ReadConfig) -> Self {
        Self {
            reader,
            delimiter: config.delimiter,
        }
    }

    /// Give back the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> ExternalSource for LineSource<R> {
    type Chunk = String;
    type Error = SourceError;

    fn read(&mut self) -> Result<String, SourceError> {
        let mut buf = Vec::new();
        if self.reader.read_until(self.delimiter, &mut buf)? == 0 {
            return Err(SourceError::EndOfStream);
        }
        if buf.last() == Some(&self.delimiter) {
            buf.pop();
            if self.delimiter == b'\n' && buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(String::from_utf8(buf)?)
    }
}
