//! Allocator facade (component C2).
//!
//! The original `udAlloc`/`udAllocAligned`/`udFreeSecure`/`udMemDup` family exists because C++
//! has no owned, alignment-aware, zero-on-drop buffer type. Rust does: this crate is a thin
//! wrapper around [`Vec<u8>`] that keeps the same three guarantees (alignment, zero-fill,
//! secure-zero-on-free) behind a safe API instead of raw `malloc`/`free` pairs.

use udcore_result::{ud_error_if, UdResultCode, UdResult};

/// A heap buffer aligned to a requested byte boundary, zero-filled on allocation and
/// zeroed-out again when dropped.
///
/// Alignment is achieved by over-allocating and exposing the aligned sub-slice, rather than via
/// a custom `GlobalAlloc` — this workspace denies `unsafe_code`, so we can't call the allocator
/// API directly; the over-allocation trick keeps everything in safe Rust.
pub struct AlignedBuffer {
    storage: Vec<u8>,
    offset: usize,
    len: usize,
}

impl AlignedBuffer {
    /// Allocate `len` zeroed bytes aligned to `align` (which must be a power of two).
    pub fn alloc_zeroed(len: usize, align: usize) -> UdResult<Self> {
        ud_error_if!(align == 0 || !align.is_power_of_two(), UdResultCode::InvalidParameter);

        let storage = vec![0u8; len + align];
        let addr = storage.as_ptr() as usize;
        let offset = (align - (addr % align)) % align;
        Ok(Self {
            storage,
            offset,
            len,
        })
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.offset..self.offset + self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[self.offset..self.offset + self.len]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        secure_zero(&mut self.storage);
    }
}

/// Overwrite `buf` with zeros in a way the optimiser cannot prove is dead, mirroring the
/// source's `udFreeSecure` (used for key material and decrypted buffers before release).
///
/// There is no safe `write_volatile` in std for slices, so this uses a plain zero-fill guarded
/// by [`std::hint::black_box`] to keep the store from being eliminated as dead code — the
/// standard safe substitute for the volatile-write trick.
pub fn secure_zero(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        *byte = 0;
    }
    std::hint::black_box(&buf);
}

/// Duplicate a byte slice into a freshly allocated `Vec`, mirroring `udMemDup`.
#[must_use]
pub fn duplicate(src: &[u8]) -> Vec<u8> {
    src.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_buffer_is_aligned_and_zeroed() {
        for align in [1usize, 2, 4, 8, 16, 64] {
            let buf = AlignedBuffer::alloc_zeroed(100, align).unwrap();
            assert_eq!(buf.as_slice().as_ptr() as usize % align, 0);
            assert!(buf.as_slice().iter().all(|&b| b == 0));
            assert_eq!(buf.len(), 100);
        }
    }

    #[test]
    fn alloc_rejects_non_power_of_two_align() {
        assert!(AlignedBuffer::alloc_zeroed(10, 3).is_err());
        assert!(AlignedBuffer::alloc_zeroed(10, 0).is_err());
    }

    #[test]
    fn secure_zero_clears_buffer() {
        let mut buf = vec![1u8, 2, 3, 4];
        secure_zero(&mut buf);
        assert_eq!(buf, vec![0, 0, 0, 0]);
    }

    #[test]
    fn duplicate_copies_independently() {
        let src = vec![1u8, 2, 3];
        let mut dup = duplicate(&src);
        dup[0] = 99;
        assert_eq!(src[0], 1);
    }
}
