//! Sequential stream over a fixed-capacity byte ring.
//!
//! Writes never block and never fail for lack of space: once the ring is
//! full, each new byte replaces the oldest unread one. Reads never block
//! either; they return whatever is available, possibly nothing.

use crate::ring::{RingBuffer, RingError};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// Thread-safe byte ring exposed as a stream.
///
/// Every operation that touches the ring takes the same lock, so a write,
/// a read or a disposal is atomic with respect to the cursors, the length
/// and the stored bytes. The stream is either open or disposed; disposal
/// releases the backing block and cannot be undone.
pub struct RingBufferStream {
    ring: Mutex<Option<RingBuffer>>,
    capacity: usize,
    can_write: bool,
    position: AtomicU64,
}

impl RingBufferStream {
    /// Opens a writable stream of `capacity` bytes.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Self::with_access(capacity, true)
    }

    pub fn with_access(capacity: usize, can_write: bool) -> Result<Self, RingError> {
        let ring = RingBuffer::new(capacity)?;
        debug!(capacity, can_write, "ring buffer stream opened");

        Ok(Self {
            ring: Mutex::new(Some(ring)),
            capacity,
            can_write,
            position: AtomicU64::new(0),
        })
    }

    // Every mutation leaves the ring consistent, so a poisoned lock is safe to reuse.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, Option<RingBuffer>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn with_open<T>(
        &self,
        f: impl FnOnce(&mut RingBuffer) -> Result<T, RingError>,
    ) -> Result<T, RingError> {
        let mut guard = self.lock();
        let ring = guard.as_mut().ok_or(RingError::Disposed)?;
        f(ring)
    }

    #[inline]
    fn inspect<T: Default>(&self, f: impl FnOnce(&RingBuffer) -> T) -> T {
        self.lock().as_ref().map(f).unwrap_or_default()
    }

    /// Appends `data[offset..offset + count]`, overwriting the oldest unread
    /// bytes if the ring runs out of room.
    pub fn write(&self, data: &[u8], offset: usize, count: usize) -> Result<(), RingError> {
        if !self.can_write {
            return Err(RingError::Unsupported {
                operation: "write",
                reason: "cannot write on a non writable stream",
            });
        }

        let src = &data[checked_range(data.len(), offset, count)?];

        self.with_open(|ring| {
            let overwritten = ring.write_from(src);
            if overwritten > 0 {
                debug!(overwritten, capacity = ring.capacity, "ring full, discarded oldest bytes");
            }
            trace!(count, len = ring.len, write_pos = ring.write_pos, "write");
            Ok(())
        })
    }

    /// Copies up to `count` available bytes into `dst[offset..]`, oldest
    /// first, and returns how many were copied. An empty ring yields 0.
    pub fn read(&self, dst: &mut [u8], offset: usize, count: usize) -> Result<usize, RingError> {
        let range = checked_range(dst.len(), offset, count)?;

        self.with_open(|ring| {
            let read = ring.read_into(&mut dst[range]);
            trace!(count, read, read_pos = ring.read_pos, "read");
            Ok(read)
        })
    }

    /// Takes a single byte. Unlike [`read`](Self::read) this fails with
    /// [`RingError::Empty`] when nothing is available.
    pub fn pop(&self) -> Result<u8, RingError> {
        self.with_open(RingBuffer::pop_front)
    }

    pub fn seek(&self, _pos: SeekFrom) -> Result<u64, RingError> {
        Err(RingError::Unsupported {
            operation: "seek",
            reason: "cannot seek",
        })
    }

    pub fn set_length(&self, _len: u64) -> Result<(), RingError> {
        Err(RingError::Unsupported {
            operation: "set_length",
            reason: "cannot change length of a fixed size ring buffer",
        })
    }

    #[inline]
    pub fn flush(&self) -> Result<(), RingError> {
        Ok(())
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Unread bytes currently held. 0 once disposed.
    #[inline]
    pub fn len(&self) -> usize {
        self.inspect(|ring| ring.len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.inspect(RingBuffer::is_full)
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.inspect(RingBuffer::available)
    }

    /// Cursor distance without the length disambiguation; 0 when full.
    #[inline]
    pub fn cursor_span(&self) -> usize {
        self.inspect(RingBuffer::cursor_span)
    }

    #[inline]
    pub fn read_position(&self) -> usize {
        self.inspect(|ring| ring.read_pos)
    }

    #[inline]
    pub fn write_position(&self) -> usize {
        self.inspect(|ring| ring.write_pos)
    }

    #[inline]
    pub fn can_read(&self) -> bool {
        true
    }

    #[inline]
    pub fn can_write(&self) -> bool {
        self.can_write
    }

    #[inline]
    pub fn can_seek(&self) -> bool {
        false
    }

    /// Caller-managed counter. Not connected to either cursor.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_position(&self, position: u64) {
        self.position.store(position, Ordering::Relaxed);
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().is_none()
    }

    /// Releases the backing block. Later calls are no-ops.
    pub fn dispose(&self) {
        let mut guard = self.lock();
        if let Some(ring) = guard.take() {
            debug!(capacity = ring.capacity, unread = ring.len, "ring buffer stream disposed");
            drop(ring);
        }
    }

    #[inline]
    pub fn close(&self) {
        self.dispose();
    }

    #[cfg(test)]
    pub(crate) fn raw_block(&self) -> Vec<u8> {
        self.inspect(|ring| ring.buf.to_vec())
    }
}

fn checked_range(len: usize, offset: usize, count: usize) -> Result<Range<usize>, RingError> {
    offset
        .checked_add(count)
        .filter(|&end| end <= len)
        .map(|end| offset..end)
        .ok_or(RingError::OutOfBounds { offset, count, len })
}

impl Read for &RingBufferStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = buf.len();
        RingBufferStream::read(*self, buf, 0, count).map_err(io::Error::from)
    }
}

impl Read for RingBufferStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(&mut &*self, buf)
    }
}

impl Write for &RingBufferStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RingBufferStream::write(*self, buf, 0, buf.len())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        RingBufferStream::flush(*self).map_err(io::Error::from)
    }
}

impl Write for RingBufferStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut &*self)
    }
}

impl Seek for &RingBufferStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        RingBufferStream::seek(*self, pos).map_err(io::Error::from)
    }
}

impl Seek for RingBufferStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(&mut &*self, pos)
    }
}
