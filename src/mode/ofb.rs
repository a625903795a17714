use super::{
    ensure_iv_len,
    keystream::{KeystreamBuffer, KeystreamOptions},
    StreamMode,
};
use crate::{error::Result, primitive::BlockCipher};

/// Output feedback with 8 bit feedback.
///
/// Every keystream byte is the first byte of the encrypted register, which is then shifted left by
/// one byte and the keystream byte appended. Bytes are computed ahead in batches of
/// [`KeystreamOptions::buffer_size`].
#[derive(Clone, Debug)]
pub struct Ofb8<C> {
    cipher: C,
    register: Vec<u8>,
    scratch: Vec<u8>,
    keystream: KeystreamBuffer,
}

impl<C: BlockCipher> Ofb8<C> {
    pub fn new(cipher: C, iv: &[u8]) -> Result<Self> {
        Self::with_options(cipher, iv, KeystreamOptions::default())
    }

    pub fn with_options(cipher: C, iv: &[u8], options: KeystreamOptions) -> Result<Self> {
        let block_size = cipher.block_size();
        ensure_iv_len(iv, block_size)?;

        let capacity = crate::util::raise_to_min_len("OFB8 buffer", options.buffer_size, block_size);
        log::debug!("Setting up OFB8 with {capacity} bytes of keystream buffer");

        Ok(Self {
            cipher,
            register: iv.to_vec(),
            scratch: vec![0u8; block_size],
            keystream: KeystreamBuffer::new(capacity, 1),
        })
    }

    pub fn block_size(&self) -> usize {
        self.register.len()
    }
}

impl<C: BlockCipher> StreamMode for Ofb8<C> {
    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<()> {
        let Self {
            cipher,
            register,
            scratch,
            keystream,
        } = self;

        keystream.apply(buf, |chunk| {
            scratch.copy_from_slice(register);
            cipher.encrypt_block(scratch);

            let key_byte = scratch[0];
            let last = register.len() - 1;
            register.copy_within(1.., 0);
            register[last] = key_byte;
            chunk[0] = key_byte;
        });

        Ok(())
    }
}

/// Output feedback over whole blocks.
///
/// The register is encrypted in place for every keystream block. With a buffer size of a single
/// block nothing is computed ahead and [`Nofb::register`] always holds the last consumed block.
#[derive(Clone, Debug)]
pub struct Nofb<C> {
    cipher: C,
    register: Vec<u8>,
    keystream: KeystreamBuffer,
}

impl<C: BlockCipher> Nofb<C> {
    pub fn new(cipher: C, iv: &[u8]) -> Result<Self> {
        Self::with_options(cipher, iv, KeystreamOptions::default())
    }

    pub fn with_options(cipher: C, iv: &[u8], options: KeystreamOptions) -> Result<Self> {
        Self::with_buffer_size(cipher, iv, options.buffer_size)
    }

    /// Creates the mode with a keystream buffer of `buffer_size` bytes, at least one block.
    pub fn with_buffer_size(cipher: C, iv: &[u8], buffer_size: usize) -> Result<Self> {
        let block_size = cipher.block_size();
        ensure_iv_len(iv, block_size)?;
        log::debug!("Setting up NOFB with {buffer_size} bytes of keystream buffer");

        Ok(Self {
            cipher,
            register: iv.to_vec(),
            keystream: KeystreamBuffer::new(buffer_size, block_size),
        })
    }

    pub fn block_size(&self) -> usize {
        self.register.len()
    }

    pub(crate) fn cipher(&self) -> &C {
        &self.cipher
    }

    /// The most recently generated keystream block.
    pub(crate) fn register(&self) -> &[u8] {
        &self.register
    }
}

impl<C: BlockCipher> StreamMode for Nofb<C> {
    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<()> {
        let Self {
            cipher,
            register,
            keystream,
        } = self;

        keystream.apply(buf, |chunk| {
            cipher.encrypt_block(register);
            chunk.copy_from_slice(register);
        });

        Ok(())
    }
}
