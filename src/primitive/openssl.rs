//! Block primitives backed by OpenSSL ECB ciphers.

use std::cell::RefCell;

use openssl::symm::{Cipher, Crypter, Mode};

use super::{BlockCipher, BlockCipherFactory};
use crate::error::{ModeError, Result};

const MAX_BLOCK_SIZE: usize = 32;

/// Single-block access to an OpenSSL cipher in ECB mode, e.g. `Cipher::aes_128_ecb()`.
pub struct OpensslBlock {
    encrypter: RefCell<Crypter>,
    decrypter: RefCell<Crypter>,
    block_size: usize,
}

impl OpensslBlock {
    /// Keys `cipher` with `key`. Only ECB ciphers (no IV) are accepted.
    pub fn new(cipher: Cipher, key: &[u8]) -> Result<Self> {
        if cipher.iv_len().is_some() {
            return Err(ModeError::Unsupported("OpenSSL ciphers other than ECB"));
        }
        if key.len() != cipher.key_len() {
            return Err(ModeError::InvalidKeyLength {
                expected: cipher.key_len(),
                actual: key.len(),
            });
        }
        let block_size = cipher.block_size();
        if block_size > MAX_BLOCK_SIZE {
            return Err(ModeError::InvalidBlockSize {
                expected: MAX_BLOCK_SIZE,
                actual: block_size,
            });
        }

        let encrypter = new_crypter(cipher, Mode::Encrypt, key)?;
        let decrypter = new_crypter(cipher, Mode::Decrypt, key)?;

        Ok(Self {
            encrypter: RefCell::new(encrypter),
            decrypter: RefCell::new(decrypter),
            block_size,
        })
    }

    fn transform(&self, crypter: &RefCell<Crypter>, block: &mut [u8]) {
        let mut out = [0u8; 2 * MAX_BLOCK_SIZE];
        let written = crypter
            .borrow_mut()
            .update(block, &mut out)
            // a full block on an initialised, unpadded ECB context is always processed at once
            .expect("OpenSSL rejected a single ECB block");
        block.copy_from_slice(&out[..written]);
    }
}

fn new_crypter(cipher: Cipher, mode: Mode, key: &[u8]) -> Result<Crypter> {
    let mut crypter = Crypter::new(cipher, mode, key, None)
        .map_err(|err| ModeError::KeyConstruction(err.to_string()))?;
    crypter.pad(false);
    Ok(crypter)
}

impl BlockCipher for OpensslBlock {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        self.transform(&self.encrypter, block);
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        self.transform(&self.decrypter, block);
    }
}

/// Creates [`OpensslBlock`]s for a fixed OpenSSL ECB cipher from key bytes.
#[derive(Clone, Copy)]
pub struct OpensslFactory {
    cipher: Cipher,
}

impl OpensslFactory {
    pub fn new(cipher: Cipher) -> Self {
        Self { cipher }
    }
}

impl BlockCipherFactory for OpensslFactory {
    type Cipher = OpensslBlock;

    fn new_from_key(&self, key: &[u8]) -> Result<OpensslBlock> {
        OpensslBlock::new(self.cipher, key)
    }
}

#[cfg(test)]
mod test {
    use super::{OpensslBlock, OpensslFactory};
    use crate::{
        error::ModeError,
        primitive::{BlockCipher, BlockCipherFactory},
        util::test::{assert_bytes_eq, hex_bytes},
    };
    use openssl::symm::Cipher;

    #[test]
    fn encrypts_aes_known_answer() {
        let cipher = OpensslBlock::new(
            Cipher::aes_128_ecb(),
            &hex_bytes("2b7e151628aed2a6abf7158809cf4f3c"),
        )
        .unwrap();
        let mut block = hex_bytes("6bc1bee22e409f96e93d7e117393172a");

        cipher.encrypt_block(&mut block);
        assert_bytes_eq(&block, &hex_bytes("3ad77bb40d7a3660a89ecaf32466ef97"));

        cipher.decrypt_block(&mut block);
        assert_bytes_eq(&block, &hex_bytes("6bc1bee22e409f96e93d7e117393172a"));
    }

    #[test]
    fn rejects_chaining_ciphers() {
        let result = OpensslFactory::new(Cipher::aes_128_cbc()).new_from_key(&[0u8; 16]);
        assert!(matches!(result, Err(ModeError::Unsupported(_))));
    }
}
