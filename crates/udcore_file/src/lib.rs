//! File layer (component C9): a prefix-dispatched handler registry, pipelined reads, a CTR-mode
//! crypto filter, and performance accounting, grounded on
//! `original_source/Include/udFile.h` / `udFileHandler.h`.
//!
//! Reference counting (`udFile_AddReference`) has no counterpart here: callers wanting shared
//! ownership of a handle use `Arc<Mutex<UdFile>>` the way the rest of this workspace shares state,
//! rather than the source's manual refcount.

mod crypto;
mod handle;
mod handlers;
mod registry;

use std::collections::VecDeque;
use std::time::Instant;

pub use crypto::{self_test_aes128_cbc, CtrFilter};
pub use handle::{FileOpenFlags, PipelinedRequest, SeekWhence};
pub use handlers::raw::{generate_raw_filename, is_raw};
pub use registry::{deregister_handler, register_handler, FileBackend, FileHandler};

use udcore_result::{ud_bail, UdResult, UdResultCode};

use handle::Performance;

/// An open file handle: a dispatched backend plus the cross-cutting state (seek base, crypto
/// filter, pipelining, performance) every handler shares.
pub struct UdFile {
    filename: String,
    flags: FileOpenFlags,
    backend: Box<dyn FileBackend>,
    seek_base: i64,
    file_pos: i64,
    performance: Performance,
    crypto: Option<CtrFilter>,
    next_issue_sequence: u64,
    next_retrieve_sequence: u64,
    pending: VecDeque<PipelinedRequest>,
}

/// Open `path` via the first matching registered handler.
pub fn open(path: &str, flags: FileOpenFlags) -> UdResult<UdFile> {
    let backend = registry::open_backend(path, flags)?;
    Ok(UdFile {
        filename: path.to_string(),
        flags,
        backend,
        seek_base: 0,
        file_pos: 0,
        performance: Performance::default(),
        crypto: None,
        next_issue_sequence: 0,
        next_retrieve_sequence: 0,
        pending: VecDeque::new(),
    })
}

/// Load an entire file into memory.
pub fn load(path: &str) -> UdResult<Vec<u8>> {
    let mut file = open(path, FileOpenFlags::READ)?;
    let length = file.backend.length().max(0) as usize;
    let mut buffer = vec![0u8; length];
    let mut total = 0;
    while total < length {
        let n = read(&mut file, &mut buffer[total..], total as i64, SeekWhence::Set)?;
        if n == 0 {
            break;
        }
        total += n;
    }
    buffer.truncate(total);
    Ok(buffer)
}

/// Save a buffer as an entire file, overwriting any existing content.
pub fn save(path: &str, data: &[u8]) -> UdResult<()> {
    let mut file = open(path, FileOpenFlags::WRITE | FileOpenFlags::CREATE)?;
    let mut total = 0;
    while total < data.len() {
        let n = write(&mut file, &data[total..], total as i64, SeekWhence::Set)?;
        if n == 0 {
            ud_bail!(UdResultCode::WriteFailure);
        }
        total += n;
    }
    Ok(())
}

impl UdFile {
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// `(throughput_bytes, mb_per_sec, requests_in_flight)`.
    #[must_use]
    pub fn performance(&self) -> (u64, f32, u32) {
        self.performance.snapshot()
    }

    /// Add a base offset applied to all `SeekWhence::Set` positions, useful when this file is
    /// wrapped inside another (e.g. a sub-region of a larger container file).
    pub fn set_seek_base(&mut self, seek_base: i64, new_length: Option<i64>) {
        self.seek_base = seek_base;
        if let Some(length) = new_length {
            // Only meaningful to the caller's own bookkeeping; the backend still reports its own
            // length via `FileBackend::length`, matching the source where this is advisory.
            self.file_pos = self.file_pos.min(length);
        }
    }

    pub fn set_sub_filename(&mut self, sub_filename: &str) -> UdResult<()> {
        self.backend.set_sub_filename(sub_filename)
    }

    /// Set the AES-128 CTR key/nonce for subsequent reads. Only permitted on read-only handles,
    /// matching the source's note that write support requires aligned writes the backend must
    /// declare explicitly (none of the bundled handlers do, so encrypted writes always fail).
    pub fn set_encryption(&mut self, key: &[u8], nonce: u64, counter_offset: i64) -> UdResult<()> {
        if self.flags.contains(FileOpenFlags::WRITE) {
            ud_bail!(UdResultCode::Unsupported);
        }
        self.crypto = Some(CtrFilter::new(key, nonce, counter_offset)?);
        Ok(())
    }

    fn resolve(&self, seek_offset: i64, whence: SeekWhence) -> i64 {
        match whence {
            SeekWhence::Set => self.seek_base + seek_offset,
            SeekWhence::Current => self.file_pos + seek_offset,
            SeekWhence::End => self.seek_base + self.backend.length() + seek_offset,
        }
    }
}

/// Seek and read, synchronously.
pub fn read(
    file: &mut UdFile,
    buffer: &mut [u8],
    seek_offset: i64,
    whence: SeekWhence,
) -> UdResult<usize> {
    let started = Instant::now();
    let position = file.resolve(seek_offset, whence);
    let n = file.backend.read(buffer, position)?;
    if let Some(crypto) = &mut file.crypto {
        crypto.apply_at(&mut buffer[..n], position as u64);
    }
    file.file_pos = position + n as i64;
    file.performance.record(n, started);
    Ok(n)
}

/// Seek and write, synchronously.
pub fn write(
    file: &mut UdFile,
    buffer: &[u8],
    seek_offset: i64,
    whence: SeekWhence,
) -> UdResult<usize> {
    let started = Instant::now();
    let position = file.resolve(seek_offset, whence);
    let n = file.backend.write(buffer, position)?;
    file.file_pos = position + n as i64;
    file.performance.record(n, started);
    Ok(n)
}

/// Issue a pipelined read. None of the bundled handlers are genuinely asynchronous, so the read
/// runs to completion immediately and the returned token just records how many bytes landed and
/// this request's position in issue order.
pub fn read_pipelined(
    file: &mut UdFile,
    buffer: &mut [u8],
    seek_offset: i64,
    whence: SeekWhence,
) -> UdResult<PipelinedRequest> {
    let actual_read = read(file, buffer, seek_offset, whence)?;
    let token = PipelinedRequest {
        sequence: file.next_issue_sequence,
        actual_read,
    };
    file.next_issue_sequence += 1;
    file.pending.push_back(token);
    Ok(token)
}

/// Retrieve the result of a pipelined read, which must happen in the same order the reads were
/// issued. Retrieving any token other than the oldest outstanding one returns `OutOfOrder`.
pub fn block_for_pipelined_request(file: &mut UdFile, token: PipelinedRequest) -> UdResult<usize> {
    let Some(&oldest) = file.pending.front() else {
        ud_bail!(UdResultCode::OutOfOrder);
    };
    if oldest.sequence != token.sequence {
        ud_bail!(UdResultCode::OutOfOrder);
    }
    file.pending.pop_front();
    file.next_retrieve_sequence += 1;
    Ok(token.actual_read)
}

/// Release the underlying OS handle (if the backend supports it), permitting it to be reopened
/// transparently on next use. Used to stay under OS open-file-handle limits.
pub fn release(file: &mut UdFile) -> UdResult<()> {
    file.backend.release()
}

/// Close the handle. Taking `file` by value mirrors the source's
/// `udResult udFile_Close(udFile **ppFile)` nulling the caller's pointer: once closed, the
/// handle cannot be used again, which Rust's ownership enforces at compile time rather than at
/// the null-check the source relies on.
pub fn close(mut file: UdFile) -> UdResult<()> {
    file.backend.release()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipelined_reads_must_be_retrieved_in_order() {
        let data = b"0123456789abcdef";
        let path = generate_raw_filename(data, false);
        let mut file = open(&path, FileOpenFlags::READ).unwrap();

        let mut buf_a = [0u8; 4];
        let mut buf_b = [0u8; 4];
        let token_a = read_pipelined(&mut file, &mut buf_a, 0, SeekWhence::Set).unwrap();
        let token_b = read_pipelined(&mut file, &mut buf_b, 4, SeekWhence::Set).unwrap();

        let err = block_for_pipelined_request(&mut file, token_b).unwrap_err();
        assert_eq!(err.code, UdResultCode::OutOfOrder);

        let n = block_for_pipelined_request(&mut file, token_a).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf_a, b"0123");

        let n = block_for_pipelined_request(&mut file, token_b).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf_b, b"4567");
    }

    #[test]
    fn encrypted_read_decrypts_transparently() {
        let plaintext = b"a secret message padded to 32 b";
        assert_eq!(plaintext.len() % 16, 0);

        let key = [3u8; 16];
        let mut encrypted = plaintext.to_vec();
        let mut enc_filter = CtrFilter::new(&key, 99, 0).unwrap();
        enc_filter.apply_at(&mut encrypted, 0);

        let path = generate_raw_filename(&encrypted, false);
        let mut file = open(&path, FileOpenFlags::READ).unwrap();
        file.set_encryption(&key, 99, 0).unwrap();

        let mut buffer = vec![0u8; plaintext.len()];
        read(&mut file, &mut buffer, 0, SeekWhence::Set).unwrap();
        assert_eq!(buffer, plaintext);
    }

    #[test]
    fn load_reads_whole_raw_file() {
        let data = b"the entire contents of a small in-memory file";
        let path = generate_raw_filename(data, false);
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn unknown_compression_name_is_rejected_not_silently_accepted() {
        let err = open(
            "raw://compression=Lz4,size=10@AAAA",
            FileOpenFlags::READ,
        )
        .unwrap_err();
        assert_eq!(err.code, UdResultCode::FormatVariationNotSupported);
    }
}
