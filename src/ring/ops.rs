use super::RingError;
use crate::ring::RingBuffer;
use crate::storage::BackingBlock;

impl RingBuffer {
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::InvalidCapacity {
                capacity,
                reason: "must be greater than zero",
            });
        }

        let buf =
            BackingBlock::allocate(capacity).ok_or(RingError::Allocation { capacity })?;

        Ok(Self {
            buf,
            capacity,
            read_pos: 0,
            write_pos: 0,
            len: 0,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Unread bytes held.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn read_position(&self) -> usize {
        self.read_pos
    }

    #[inline(always)]
    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    /// Bytes that can be taken without underflow. `len` is authoritative:
    /// a full ring has coinciding cursors yet `capacity` bytes available.
    #[inline(always)]
    pub fn available(&self) -> usize {
        self.len
    }

    /// Distance from the read cursor to the write cursor, ignoring `len`.
    /// Reports 0 for both the empty and the full ring.
    #[inline]
    pub fn cursor_span(&self) -> usize {
        if self.read_pos == self.write_pos {
            0
        } else if self.write_pos > self.read_pos {
            self.write_pos - self.read_pos
        } else {
            (self.capacity - self.read_pos) + self.write_pos
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    #[inline(always)]
    fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.capacity { 0 } else { next }
    }

    /// Stores one byte at the write cursor. On a full ring the oldest unread
    /// byte is overwritten and the read cursor follows the write cursor.
    ///
    /// Returns `true` when a byte was discarded.
    #[inline]
    pub fn push_back(&mut self, byte: u8) -> bool {
        let overwrote = self.is_full();

        self.buf[self.write_pos] = byte;
        self.write_pos = self.advance(self.write_pos);

        if overwrote {
            self.read_pos = self.write_pos;
        } else {
            self.len += 1;
        }
        overwrote
    }

    #[inline]
    pub fn pop_front(&mut self) -> Result<u8, RingError> {
        if self.is_empty() {
            return Err(RingError::Empty);
        }

        let byte = self.buf[self.read_pos];
        self.read_pos = self.advance(self.read_pos);
        self.len -= 1;
        Ok(byte)
    }

    /// Writes all of `data`, byte for byte equivalent to repeated
    /// [`push_back`](Self::push_back). Returns the number of unread bytes
    /// discarded to make room.
    #[inline]
    pub fn write_from(&mut self, data: &[u8]) -> usize {
        let capacity = self.capacity;
        let total = data.len();
        let mut src = data;

        // Only the last `capacity` bytes survive; the rest just move the cursor.
        if total > capacity {
            let skipped = total - capacity;
            self.write_pos = (self.write_pos + skipped % capacity) % capacity;
            src = &data[skipped..];
        }

        while !src.is_empty() {
            let start = self.write_pos;
            let chunk = src.len().min(capacity - start);
            self.buf[start..start + chunk].copy_from_slice(&src[..chunk]);
            self.write_pos = (start + chunk) % capacity;
            src = &src[chunk..];
        }

        let free = capacity - self.len;
        if total <= free {
            self.len += total;
            0
        } else {
            self.len = capacity;
            self.read_pos = self.write_pos;
            total - free
        }
    }

    /// Moves up to `dst.len()` bytes out of the ring, oldest first.
    #[inline]
    pub fn read_into(&mut self, dst: &mut [u8]) -> usize {
        let count = dst.len().min(self.len);
        let start = self.read_pos;
        let first = count.min(self.capacity - start);

        dst[..first].copy_from_slice(&self.buf[start..start + first]);
        dst[first..count].copy_from_slice(&self.buf[..count - first]);

        self.read_pos = (start + count) % self.capacity;
        self.len -= count;
        count
    }
}
