//! Image streaming (component C10): a flat ARGB8888 image plus a tiled, mip-mapped streaming
//! variant with an LRU tile cache, layered on [`udcore_file`] for storage and
//! [`udcore_threads`]'s locking idiom for concurrent sampling. Grounded on
//! `original_source/Include/udImage.h`.

mod format;
mod image;
mod sample;
mod streaming;

pub use format::{full_mip_chain_length, MipGeometry, OnDiskHeader, MAX_MIP_LEVELS, TILE_SIZE};
pub use image::Image;
pub use sample::SampleFlags;
pub use streaming::{save, ImageStreaming};
