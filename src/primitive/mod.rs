//! The block primitive every mode of operation composes over.
//!
//! A mode only needs a fixed block size and the two single-block transforms. Concrete ciphers are
//! plugged in through the adapters enabled by the crate features, or by implementing
//! [`BlockCipher`] directly.

#[cfg(feature = "openssl")]
mod openssl;
#[cfg(feature = "rust-crypto")]
mod rust_crypto;

#[cfg(feature = "openssl")]
pub use self::openssl::{OpensslBlock, OpensslFactory};
#[cfg(feature = "rust-crypto")]
pub use rust_crypto::{RustCryptoBlock, RustCryptoFactory};

use crate::error::Result;

/// Processing direction of a mode, fixed when the mode is constructed
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// A keyed permutation over blocks of [`BlockCipher::block_size`] bytes.
///
/// Implementations must be stateless across calls. Slices handed to the transforms are exactly
/// one block long.
pub trait BlockCipher {
    /// Returns the block size in bytes.
    fn block_size(&self) -> usize;

    /// Encrypts a single block in place.
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decrypts a single block in place.
    fn decrypt_block(&self, block: &mut [u8]);

    /// Encrypts the first block of `src` into the first block of `dst`.
    fn encrypt_block_b2b(&self, src: &[u8], dst: &mut [u8]) {
        let block_size = self.block_size();
        let dst = &mut dst[..block_size];
        dst.copy_from_slice(&src[..block_size]);
        self.encrypt_block(dst);
    }

    /// Decrypts the first block of `src` into the first block of `dst`.
    fn decrypt_block_b2b(&self, src: &[u8], dst: &mut [u8]) {
        let block_size = self.block_size();
        let dst = &mut dst[..block_size];
        dst.copy_from_slice(&src[..block_size]);
        self.decrypt_block(dst);
    }
}

impl<C: BlockCipher + ?Sized> BlockCipher for &C {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        (**self).encrypt_block(block);
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        (**self).decrypt_block(block);
    }
}

impl<C: BlockCipher + ?Sized> BlockCipher for Box<C> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        (**self).encrypt_block(block);
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        (**self).decrypt_block(block);
    }
}

/// Builds block ciphers from raw key material.
///
/// Modes which re-key their primitive while running (key meshing, non-linear feedback) depend on
/// a factory instead of a single cipher instance.
pub trait BlockCipherFactory {
    type Cipher: BlockCipher;

    /// Creates a cipher keyed with `key`.
    fn new_from_key(&self, key: &[u8]) -> Result<Self::Cipher>;
}

impl<F, C> BlockCipherFactory for F
where
    F: Fn(&[u8]) -> Result<C>,
    C: BlockCipher,
{
    type Cipher = C;

    fn new_from_key(&self, key: &[u8]) -> Result<C> {
        self(key)
    }
}
