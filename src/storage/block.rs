use std::ops::{Deref, DerefMut};

/// A fixed-size, zero-filled byte block.
///
/// Allocated once by [`BackingBlock::allocate`] and released when dropped.
/// The block never grows or moves.
pub struct BackingBlock {
    bytes: Box<[u8]>,
}

impl BackingBlock {
    /// Returns `None` for an empty request or when the allocator cannot
    /// provide `len` bytes.
    pub fn allocate(len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(len).ok()?;
        bytes.resize(len, 0);

        Some(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Deref for BackingBlock {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl DerefMut for BackingBlock {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
