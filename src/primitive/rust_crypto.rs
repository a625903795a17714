//! Block primitives backed by the RustCrypto [`cipher`] traits.

use std::marker::PhantomData;

use cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};

use super::{BlockCipher, BlockCipherFactory};
use crate::error::{ModeError, Result};

/// Wraps any RustCrypto block cipher, e.g. `aes::Aes128` or `des::Des`.
#[derive(Clone, Debug)]
pub struct RustCryptoBlock<C> {
    cipher: C,
}

impl<C> RustCryptoBlock<C>
where
    C: BlockEncrypt + BlockDecrypt,
{
    pub fn new(cipher: C) -> Self {
        Self { cipher }
    }

    /// Returns the wrapped cipher.
    pub fn into_inner(self) -> C {
        self.cipher
    }
}

impl<C> RustCryptoBlock<C>
where
    C: BlockEncrypt + BlockDecrypt + KeyInit,
{
    /// Keys the wrapped cipher from a slice, rejecting keys of the wrong length.
    pub fn new_from_slice(key: &[u8]) -> Result<Self> {
        let cipher = C::new_from_slice(key).map_err(|_| ModeError::InvalidKeyLength {
            expected: C::key_size(),
            actual: key.len(),
        })?;
        Ok(Self { cipher })
    }
}

impl<C> From<C> for RustCryptoBlock<C>
where
    C: BlockEncrypt + BlockDecrypt,
{
    fn from(cipher: C) -> Self {
        Self::new(cipher)
    }
}

impl<C> BlockCipher for RustCryptoBlock<C>
where
    C: BlockEncrypt + BlockDecrypt,
{
    fn block_size(&self) -> usize {
        C::block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        self.cipher
            .encrypt_block(GenericArray::from_mut_slice(block));
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        self.cipher
            .decrypt_block(GenericArray::from_mut_slice(block));
    }
}

/// Creates [`RustCryptoBlock`]s of cipher `C` from key bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RustCryptoFactory<C> {
    _cipher: PhantomData<C>,
}

impl<C> RustCryptoFactory<C> {
    pub fn new() -> Self {
        Self {
            _cipher: PhantomData,
        }
    }
}

impl<C> BlockCipherFactory for RustCryptoFactory<C>
where
    C: BlockEncrypt + BlockDecrypt + KeyInit,
{
    type Cipher = RustCryptoBlock<C>;

    fn new_from_key(&self, key: &[u8]) -> Result<Self::Cipher> {
        RustCryptoBlock::new_from_slice(key)
    }
}
