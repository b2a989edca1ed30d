//! AES-CTR keystream filter for encrypted reads, grounded on
//! `original_source/Include/udCrypto.h`'s `udCCM_CTR` chain mode, plus a self-test vector
//! exercising AES-128 in CBC mode (spec scenario S4) built from the same block cipher primitive.

use aes::cipher::{BlockEncrypt, BlockSizeUser, KeyInit, KeyIvInit, StreamCipher, StreamCipherSeek};
use aes::Aes128;

use udcore_result::{ud_bail, UdResult, UdResultCode};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;

const BLOCK_SIZE: u64 = 16;

/// A seekable AES-128-CTR keystream, counter derived from `counterOffset + absoluteOffset /
/// blockSize`, matching the source's `udFile_SetEncryption` semantics: CTR mode is randomly
/// seekable, so decrypting an arbitrary read range only requires positioning the keystream.
pub struct CtrFilter {
    cipher: Aes128Ctr,
    nonce: u64,
    counter_offset: i64,
}

impl CtrFilter {
    pub fn new(key: &[u8], nonce: u64, counter_offset: i64) -> UdResult<Self> {
        if key.len() != 16 {
            ud_bail!(UdResultCode::DecryptionKeyMismatch);
        }
        let mut iv = [0u8; 16];
        iv[..8].copy_from_slice(&nonce.to_be_bytes());
        let cipher = Aes128Ctr::new_from_slices(key, &iv)
            .map_err(|_| udcore_result::UdError::from(UdResultCode::DecryptionKeyMismatch))?;
        Ok(Self {
            cipher,
            nonce,
            counter_offset,
        })
    }

    /// Decrypt `buffer` in place, where `buffer` holds the bytes read starting at
    /// `absolute_offset`. Seeks the keystream to the correct counter position first, discarding
    /// the leading partial-block keystream bytes so arbitrary (non-block-aligned) offsets work.
    pub fn apply_at(&mut self, buffer: &mut [u8], absolute_offset: u64) {
        let block_index = (self.counter_offset + (absolute_offset / BLOCK_SIZE) as i64).max(0) as u64;
        let keystream_position = block_index * BLOCK_SIZE + absolute_offset % BLOCK_SIZE;
        self.cipher.seek(keystream_position);
        self.cipher.apply_keystream(buffer);
    }

    #[must_use]
    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

fn xor_block(block: &mut [u8; 16], with: &[u8; 16]) {
    for (b, w) in block.iter_mut().zip(with.iter()) {
        *b ^= w;
    }
}

/// AES-128 in CBC mode with PKCS#7 padding, built directly on the block cipher rather than a
/// dedicated CBC crate (the workspace pulls in `aes`/`ctr` for the file layer's keystream filter;
/// CBC is needed only for the self-test vector below, so it is implemented as plain block
/// chaining rather than adding another dependency for one call site).
pub fn aes128_cbc_encrypt(key: &[u8; 16], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
    let cipher = Aes128::new(key.into());
    let block_size = Aes128::block_size();
    debug_assert_eq!(block_size, 16);

    let pad_len = block_size - (plaintext.len() % block_size);
    let mut padded = plaintext.to_vec();
    padded.extend(std::iter::repeat(pad_len as u8).take(pad_len));

    let mut prev = *iv;
    let mut out = Vec::with_capacity(padded.len());
    for chunk in padded.chunks_exact(block_size) {
        let mut block = [0u8; 16];
        block.copy_from_slice(chunk);
        xor_block(&mut block, &prev);
        let mut generic_block = aes::Block::clone_from_slice(&block);
        cipher.encrypt_block(&mut generic_block);
        let mut encrypted = [0u8; 16];
        encrypted.copy_from_slice(&generic_block);
        out.extend_from_slice(&encrypted);
        prev = encrypted;
    }
    out
}

/// The known-answer ciphertext for [`self_test_aes128_cbc`]'s vector: PKCS#7-padded 96-byte
/// plaintext (112 bytes padded) under key `SHA-256("password")[..16]`, IV `0x00..=0x0f`.
const SELF_TEST_CIPHERTEXT: [u8; 112] = [
    0xcd, 0x39, 0x0f, 0x65, 0xf9, 0x03, 0x80, 0xb0, 0x78, 0xb6, 0x33, 0x0c, 0xcd, 0xea, 0x3f, 0x24,
    0xdc, 0xe2, 0x98, 0x71, 0xfe, 0x7a, 0x8a, 0x7a, 0x75, 0x48, 0x5e, 0x90, 0x9b, 0xf5, 0x9d, 0x38,
    0x6e, 0x51, 0x36, 0x82, 0xdc, 0x65, 0xc4, 0x56, 0x1e, 0x0c, 0xa3, 0x1c, 0xfc, 0xee, 0x25, 0xaa,
    0x7c, 0x29, 0x69, 0xea, 0xe5, 0x15, 0xb1, 0x74, 0x4a, 0xac, 0x3e, 0x7d, 0x8c, 0x0e, 0xf0, 0x74,
    0xac, 0x8c, 0x17, 0x12, 0x10, 0x63, 0x68, 0xfc, 0xee, 0x58, 0x74, 0x41, 0x50, 0x21, 0xf0, 0x6f,
    0x46, 0xba, 0x47, 0x5d, 0x85, 0xea, 0x0a, 0xf6, 0x5f, 0x9f, 0x5d, 0x2d, 0x6e, 0x96, 0xd4, 0x97,
    0x9b, 0x7c, 0x03, 0x48, 0xef, 0x46, 0xbb, 0x86, 0x98, 0xca, 0x7e, 0x56, 0x67, 0xec, 0x87, 0xcd,
];

/// Self-test exercising the fixed vector from spec scenario S4: a password-derived AES-128 key,
/// a zero-to-`0x0f` IV, and a 96-byte ASCII plaintext, PKCS#7-padded to 112 bytes. Returns `Ok(())`
/// only if the computed ciphertext matches [`SELF_TEST_CIPHERTEXT`] byte for byte, else
/// `InternalCryptoError`.
pub fn self_test_aes128_cbc() -> UdResult<()> {
    let key = derive_key_from_password(b"password");
    let iv: [u8; 16] = core::array::from_fn(|i| i as u8);
    let plaintext = b"The quick brown fox jumps over the lazy dog, and then sleeps soundly beneath the old oak tree...";
    debug_assert_eq!(plaintext.len(), 96);

    let ciphertext = aes128_cbc_encrypt(&key, &iv, plaintext);
    if ciphertext != SELF_TEST_CIPHERTEXT {
        ud_bail!(UdResultCode::InternalCryptoError);
    }
    Ok(())
}

/// A simplified password KDF (single-round SHA-256 truncated to the key length), standing in for
/// the source's `CryptDeriveKey`-compatible derivation, which is Windows-CryptoAPI-specific and
/// has no portable equivalent worth reimplementing bit-for-bit here.
fn derive_key_from_password(password: &[u8]) -> [u8; 16] {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(password);
    let mut key = [0u8; 16];
    key.copy_from_slice(&digest[..16]);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctr_filter_rejects_short_keys() {
        let err = CtrFilter::new(&[0u8; 8], 0, 0).unwrap_err();
        assert_eq!(err.code, UdResultCode::DecryptionKeyMismatch);
    }

    #[test]
    fn ctr_roundtrips_through_reencryption() {
        let key = [7u8; 16];
        let mut enc = CtrFilter::new(&key, 42, 0).unwrap();
        let mut dec = CtrFilter::new(&key, 42, 0).unwrap();

        let mut data = b"hello from a seekable CTR keystream!!".to_vec();
        let original = data.clone();
        enc.apply_at(&mut data, 0);
        assert_ne!(data, original);
        dec.apply_at(&mut data, 0);
        assert_eq!(data, original);
    }

    #[test]
    fn ctr_seek_is_position_independent() {
        let key = [9u8; 16];
        let mut whole = CtrFilter::new(&key, 1, 0).unwrap();
        let mut split_a = CtrFilter::new(&key, 1, 0).unwrap();
        let mut split_b = CtrFilter::new(&key, 1, 0).unwrap();

        let mut data = vec![0xABu8; 40];
        let mut whole_copy = data.clone();
        whole.apply_at(&mut whole_copy, 0);

        let (first, second) = data.split_at_mut(20);
        split_a.apply_at(first, 0);
        split_b.apply_at(second, 20);

        assert_eq!(whole_copy, data);
    }

    #[test]
    fn cbc_self_test_passes() {
        self_test_aes128_cbc().unwrap();
    }
}
