use super::{ensure_iv_len, keystream::KeystreamBuffer, KeystreamOptions, StreamMode};
use crate::{
    error::{ModeError, Result},
    primitive::BlockCipher,
    util::increment_be,
};

/// Counter mode of GOST R 34.13-2015.
///
/// The IV covers the upper half of the counter block, the lower half starts at zero. Each counter
/// value contributes the leading `s` bits of its encryption to the keystream, after which the
/// whole block is incremented as a big-endian integer.
#[derive(Clone, Debug)]
pub struct G3413Ctr<C> {
    cipher: C,
    counter: Vec<u8>,
    scratch: Vec<u8>,
    keystream: KeystreamBuffer,
}

impl<C: BlockCipher> G3413Ctr<C> {
    /// Creates the mode using the full block of every counter value.
    pub fn new(cipher: C, iv: &[u8]) -> Result<Self> {
        let bits = cipher.block_size() * 8;
        Self::with_bit_block_size(cipher, iv, bits)
    }

    /// Creates the mode using only the leading `bits` of every encrypted counter value.
    pub fn with_bit_block_size(cipher: C, iv: &[u8], bits: usize) -> Result<Self> {
        let block_size = cipher.block_size();
        ensure_iv_len(iv, block_size / 2)?;

        if bits % 8 != 0 {
            return Err(ModeError::Unsupported(
                "G3413CTR with a bit block size that is not a multiple of 8",
            ));
        }
        let segment = bits / 8;
        if segment == 0 || segment > block_size {
            return Err(ModeError::InvalidSegmentSize {
                segment,
                block_size,
            });
        }
        log::debug!("Setting up G3413CTR with {bits} bit keystream blocks");

        let mut counter = vec![0u8; block_size];
        counter[..iv.len()].copy_from_slice(iv);

        Ok(Self {
            cipher,
            counter,
            scratch: vec![0u8; block_size],
            keystream: KeystreamBuffer::new(KeystreamOptions::default().buffer_size, segment),
        })
    }

    pub fn block_size(&self) -> usize {
        self.counter.len()
    }
}

impl<C: BlockCipher> StreamMode for G3413Ctr<C> {
    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<()> {
        let Self {
            cipher,
            counter,
            scratch,
            keystream,
        } = self;

        keystream.apply(buf, |chunk| {
            cipher.encrypt_block_b2b(counter, scratch);
            chunk.copy_from_slice(&scratch[..chunk.len()]);
            increment_be(counter);
        });

        Ok(())
    }
}
