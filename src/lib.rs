pub mod ring;
pub mod storage;
pub mod stream;

pub use ring::{ErrorKind, RingBuffer, RingError};
pub use stream::RingBufferStream;
