//! Byte sources read by a [`Cursor`](crate::Cursor).
//!
//! A source only needs to hand over bytes in order and say when it has run
//! out. Sources that can seek override [`ByteSource::discard`] to pass over
//! skipped fields and data sections without reading them.

use std::io::{self, Read, Seek, SeekFrom};

use either::Either;

/// A sequential provider of bytes.
pub trait ByteSource {
    /// Fill as much of `buf` as the source allows.
    ///
    /// Returns the number of bytes written, which is less than `buf.len()`
    /// only if the source was exhausted.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Pass over the next `n` bytes.
    ///
    /// Returns the number of bytes passed over, which is less than `n` only
    /// if the source was exhausted. The default implementation reads and
    /// discards through a small stack buffer.
    fn discard(&mut self, n: u64) -> io::Result<u64> {
        let mut scratch = [0; 512];
        let mut done = 0;

        while done < n {
            let want = (n - done).min(scratch.len() as u64) as usize;
            let read = self.fill(&mut scratch[..want])?;
            done += read as u64;

            if read < want {
                break;
            }
        }

        Ok(done)
    }
}

impl ByteSource for &[u8] {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }

    fn discard(&mut self, n: u64) -> io::Result<u64> {
        let n = usize::try_from(n).unwrap_or(usize::MAX).min(self.len());
        *self = &self[n..];
        Ok(n as u64)
    }
}

impl<L: ByteSource, R: ByteSource> ByteSource for Either<L, R> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Either::Left(s) => s.fill(buf),
            Either::Right(s) => s.fill(buf),
        }
    }

    fn discard(&mut self, n: u64) -> io::Result<u64> {
        match self {
            Either::Left(s) => s.discard(n),
            Either::Right(s) => s.discard(n),
        }
    }
}

/// A source over any reader, passing over skipped bytes by reading them.
#[derive(Debug)]
pub struct Sequential<R>(R);

impl<R: Read> Sequential<R> {
    pub fn new(inner: R) -> Self {
        Self(inner)
    }

    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Read> ByteSource for Sequential<R> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        fill_from(&mut self.0, buf)
    }

    fn discard(&mut self, n: u64) -> io::Result<u64> {
        io::copy(&mut (&mut self.0).take(n), &mut io::sink())
    }
}

/// A source over a seekable reader, passing over skipped bytes by seeking.
#[derive(Debug)]
pub struct Seekable<R> {
    inner: R,
    position: u64,
    len: u64,
}

impl<R: Read + Seek> Seekable<R> {
    /// Wrap a reader, starting from its current position.
    ///
    /// The length of the stream is measured once here, so seeking past its
    /// end is reported like a short read.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let position = inner.stream_position()?;
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(position))?;

        Ok(Self {
            inner,
            position,
            len,
        })
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteSource for Seekable<R> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = fill_from(&mut self.inner, buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn discard(&mut self, n: u64) -> io::Result<u64> {
        let n = n.min(self.len.saturating_sub(self.position));
        self.position = self.inner.seek(SeekFrom::Start(self.position + n))?;
        Ok(n)
    }
}

/// Read until `buf` is full or the reader is exhausted.
fn fill_from(r: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut n = 0;

    while n < buf.len() {
        match r.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(read) => n += read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(n)
}
