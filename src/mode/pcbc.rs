use super::{ensure_aligned, ensure_iv_len, BlockMode, ResetIv};
use crate::{
    error::Result,
    primitive::{BlockCipher, Direction},
    util::xor_in_place,
};

/// Propagating cipher block chaining.
///
/// Each block is chained with the XOR of the previous plain and cipher text block, the IV acts as
/// that value for the first block. A corrupted cipher text block garbles every block after it.
#[derive(Clone, Debug)]
pub struct Pcbc<C> {
    cipher: C,
    chain: Vec<u8>,
    scratch: Vec<u8>,
    direction: Direction,
}

impl<C: BlockCipher> Pcbc<C> {
    pub fn new(cipher: C, iv: &[u8], direction: Direction) -> Result<Self> {
        let block_size = cipher.block_size();
        ensure_iv_len(iv, block_size)?;

        Ok(Self {
            cipher,
            chain: iv.to_vec(),
            scratch: vec![0u8; block_size],
            direction,
        })
    }
}

impl<C: BlockCipher> BlockMode for Pcbc<C> {
    fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn crypt_blocks_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        let block_size = self.block_size();
        ensure_aligned(buf.len(), block_size)?;

        for block in buf.chunks_exact_mut(block_size) {
            self.scratch.copy_from_slice(block);
            match self.direction {
                Direction::Encrypt => {
                    xor_in_place(block, &self.chain);
                    self.cipher.encrypt_block(block);
                }
                Direction::Decrypt => {
                    self.cipher.decrypt_block(block);
                    xor_in_place(block, &self.chain);
                }
            }
            // plain text XOR cipher text, whichever side the input was
            self.chain.copy_from_slice(&self.scratch);
            xor_in_place(&mut self.chain, block);
        }

        Ok(())
    }
}

impl<C: BlockCipher> ResetIv for Pcbc<C> {
    fn iv_size(&self) -> usize {
        self.cipher.block_size()
    }

    fn set_iv(&mut self, iv: &[u8]) -> Result<()> {
        ensure_iv_len(iv, self.iv_size())?;
        self.chain.copy_from_slice(iv);
        Ok(())
    }
}
