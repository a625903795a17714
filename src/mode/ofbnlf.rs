use zeroize::Zeroizing;

use super::{ensure_aligned, ensure_iv_len, BlockMode, ResetIv};
use crate::{
    error::Result,
    primitive::{BlockCipher, BlockCipherFactory, Direction},
};

/// Output feedback with non-linear function.
///
/// The chaining value is encrypted under the base key for every block and the result keys a fresh
/// cipher which transforms the data block. The derived key becomes the next chaining value, so the
/// factory has to accept keys of exactly one block.
pub struct OfbNlf<F: BlockCipherFactory> {
    factory: F,
    base: F::Cipher,
    chain: Zeroizing<Vec<u8>>,
    direction: Direction,
}

impl<F: BlockCipherFactory> OfbNlf<F> {
    pub fn new(factory: F, key: &[u8], iv: &[u8], direction: Direction) -> Result<Self> {
        let base = factory.new_from_key(key)?;
        let block_size = base.block_size();
        ensure_iv_len(iv, block_size)?;

        // derived keys are one block long, refuse factories which cannot take them up front
        factory.new_from_key(iv)?;
        log::debug!("Setting up OFBNLF ({direction:?}) with {block_size} byte blocks");

        Ok(Self {
            factory,
            base,
            chain: Zeroizing::new(iv.to_vec()),
            direction,
        })
    }
}

impl<F: BlockCipherFactory> BlockMode for OfbNlf<F> {
    fn block_size(&self) -> usize {
        self.base.block_size()
    }

    fn crypt_blocks_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        let block_size = self.block_size();
        ensure_aligned(buf.len(), block_size)?;

        // derive every key before touching data, a refused key leaves buffer and chain as they were
        let mut chain = self.chain.clone();
        let ciphers = buf
            .chunks_exact(block_size)
            .map(|_| {
                self.base.encrypt_block(&mut chain);
                self.factory.new_from_key(&chain)
            })
            .collect::<Result<Vec<_>>>()?;

        for (block, cipher) in buf.chunks_exact_mut(block_size).zip(&ciphers) {
            match self.direction {
                Direction::Encrypt => cipher.encrypt_block(block),
                Direction::Decrypt => cipher.decrypt_block(block),
            }
        }
        self.chain = chain;

        Ok(())
    }
}

impl<F: BlockCipherFactory> ResetIv for OfbNlf<F> {
    fn iv_size(&self) -> usize {
        self.base.block_size()
    }

    fn set_iv(&mut self, iv: &[u8]) -> Result<()> {
        ensure_iv_len(iv, self.iv_size())?;
        self.chain.copy_from_slice(iv);
        Ok(())
    }
}

#[cfg(all(test, feature = "rust-crypto"))]
mod test {
    use std::cell::Cell;

    use super::OfbNlf;
    use crate::{
        error::{ModeError, Result},
        mode::{BlockMode, ResetIv},
        primitive::{Direction, RustCryptoBlock, RustCryptoFactory},
        test_vectors::{aes_iv, aes_key, aes_plain_text},
        util::test::{assert_bytes_eq, hex_bytes},
    };
    use pretty_assertions::assert_eq;

    const OFBNLF_CIPHER_TEXT: &str = concat!(
        "58310742003f72fc73b17a5479e09f92",
        "aa1f67349ae5fed8c59b84367850aa17",
        "d6812ba5ece2e68768247656fa5e7d00",
        "bfc7237d45e79df522500f2b0d6336e1"
    );

    fn ofbnlf(direction: Direction) -> OfbNlf<RustCryptoFactory<aes::Aes128>> {
        OfbNlf::new(RustCryptoFactory::new(), &aes_key(), &aes_iv(), direction).unwrap()
    }

    #[test]
    fn encrypts_known_answer() {
        let mut mode = ofbnlf(Direction::Encrypt);
        let mut data = aes_plain_text();

        mode.crypt_blocks_in_place(&mut data).unwrap();

        assert_bytes_eq(&data, &hex_bytes(OFBNLF_CIPHER_TEXT));
    }

    #[test]
    fn decrypts_across_calls() {
        let mut mode = ofbnlf(Direction::Decrypt);
        let mut data = hex_bytes(OFBNLF_CIPHER_TEXT);

        let (head, tail) = data.split_at_mut(16);
        mode.crypt_blocks_in_place(head).unwrap();
        mode.crypt_blocks_in_place(tail).unwrap();

        assert_bytes_eq(&data, &aes_plain_text());
    }

    #[test]
    fn set_iv_restarts_the_chain() {
        let mut mode = ofbnlf(Direction::Encrypt);
        let mut data = aes_plain_text();
        mode.crypt_blocks_in_place(&mut data).unwrap();

        mode.set_iv(&aes_iv()).unwrap();
        let mut again = aes_plain_text();
        mode.crypt_blocks_in_place(&mut again).unwrap();

        assert_bytes_eq(&again, &data);
    }

    #[test]
    fn rejects_key_the_factory_refuses() {
        let result = OfbNlf::new(
            RustCryptoFactory::<aes::Aes128>::new(),
            &[0u8; 24],
            &aes_iv(),
            Direction::Encrypt,
        );
        assert_eq!(
            result.err(),
            Some(ModeError::InvalidKeyLength {
                expected: 16,
                actual: 24
            })
        );
    }

    #[test]
    fn rejects_factory_without_block_sized_keys() {
        let result = OfbNlf::new(
            RustCryptoFactory::<aes::Aes256>::new(),
            &[0u8; 32],
            &aes_iv(),
            Direction::Encrypt,
        );
        assert_eq!(
            result.err(),
            Some(ModeError::InvalidKeyLength {
                expected: 32,
                actual: 16
            })
        );
    }

    #[test]
    fn refused_derived_key_leaves_state_untouched() {
        // base key, block sized key check and one derived key
        let budget = Cell::new(3usize);
        let factory = |key: &[u8]| -> Result<RustCryptoBlock<aes::Aes128>> {
            if budget.get() == 0 {
                return Err(ModeError::Unsupported("no more keys"));
            }
            budget.set(budget.get() - 1);
            RustCryptoBlock::new_from_slice(key)
        };
        let mut mode = OfbNlf::new(factory, &aes_key(), &aes_iv(), Direction::Encrypt).unwrap();

        let mut data = aes_plain_text()[..32].to_vec();
        assert_eq!(
            mode.crypt_blocks_in_place(&mut data),
            Err(ModeError::Unsupported("no more keys"))
        );
        assert_bytes_eq(&data, &aes_plain_text()[..32]);

        budget.set(2);
        mode.crypt_blocks_in_place(&mut data).unwrap();
        assert_bytes_eq(&data, &hex_bytes(OFBNLF_CIPHER_TEXT)[..32]);
    }
}
