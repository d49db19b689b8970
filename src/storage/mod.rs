pub mod block;

pub use block::BackingBlock;
