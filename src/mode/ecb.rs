use super::{ensure_aligned, BlockMode};
use crate::{
    error::Result,
    primitive::{BlockCipher, Direction},
};

/// Electronic codebook, every block is transformed on its own.
#[derive(Clone, Debug)]
pub struct Ecb<C> {
    cipher: C,
    direction: Direction,
}

impl<C: BlockCipher> Ecb<C> {
    pub fn new(cipher: C, direction: Direction) -> Self {
        Self { cipher, direction }
    }
}

impl<C: BlockCipher> BlockMode for Ecb<C> {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn crypt_blocks_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        let block_size = self.block_size();
        ensure_aligned(buf.len(), block_size)?;

        for block in buf.chunks_exact_mut(block_size) {
            match self.direction {
                Direction::Encrypt => self.cipher.encrypt_block(block),
                Direction::Decrypt => self.cipher.decrypt_block(block),
            }
        }

        Ok(())
    }
}
