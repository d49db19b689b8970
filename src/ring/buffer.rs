use crate::storage::BackingBlock;

/// Cursor state of a byte ring. Not synchronised; see
/// [`RingBufferStream`](crate::stream::RingBufferStream) for the shared form.
pub struct RingBuffer {
    pub(crate) buf: BackingBlock,
    pub(crate) capacity: usize,
    pub(crate) read_pos: usize,
    pub(crate) write_pos: usize,
    pub(crate) len: usize,
}
