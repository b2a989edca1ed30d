//! Chunked containers (components C4, C5, C6): a segmented array, its LRU-spilling virtual
//! variant, and a mutex-guarded safe deque built on top.

mod array;
mod safe_deque;
mod virtual_array;

pub use array::{ChunkedArray, Iter};
pub use safe_deque::SafeDeque;
pub use virtual_array::VirtualChunkedArray;
