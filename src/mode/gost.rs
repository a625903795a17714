//! GOST 28147-89 output and cipher feedback with CryptoPro key meshing (RFC 4357, section 2.3).
//!
//! After every [`MESHING_INTERVAL`] bytes the key is replaced by the decryption of a fixed
//! constant under the current key, and the feedback register is encrypted once with the new key.
//! Meshing happens lazily, when the first byte of the next epoch arrives, so splitting a message
//! at any position yields the same output as processing it at once.

use zeroize::Zeroizing;

use super::{Cfb, Nofb, StreamMode};
use crate::{
    error::{ModeError, Result},
    primitive::{BlockCipher, BlockCipherFactory, Direction},
};

/// Number of bytes processed with one key.
pub const MESHING_INTERVAL: usize = 1024;

/// Key size of the meshed primitive.
pub const MESHING_KEY_SIZE: usize = 32;

const MESHING_CONSTANT: [u8; MESHING_KEY_SIZE] = [
    0x69, 0x00, 0x72, 0x22, 0x64, 0xc9, 0x04, 0x23, 0x8d, 0x3a, 0xdb, 0x96, 0x46, 0xe9, 0x2a, 0xc4,
    0x18, 0xfe, 0xac, 0x94, 0x00, 0xed, 0x07, 0x12, 0xc0, 0x86, 0xdc, 0xc2, 0xef, 0x4c, 0xa9, 0x2b,
];

/// Position of a meshing stream relative to the key epochs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochState {
    /// the current key may still process `remaining` bytes
    Within { remaining: usize },
    /// the current key is exhausted, the next byte requires a new key
    Boundary,
}

/// Outcome of [`EpochState::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// whether the key has to be meshed before processing
    pub mesh: bool,
    /// number of bytes to process with the (possibly new) key
    pub process: usize,
    /// state after processing
    pub next: EpochState,
}

impl Default for EpochState {
    fn default() -> Self {
        EpochState::Within {
            remaining: MESHING_INTERVAL,
        }
    }
}

impl EpochState {
    /// Plans the next step for `pending` bytes of input.
    pub fn advance(self, pending: usize) -> Advance {
        let (mesh, remaining) = match self {
            EpochState::Within { remaining } => (false, remaining),
            EpochState::Boundary => (true, MESHING_INTERVAL),
        };

        let process = remaining.min(pending);
        let next = if process == remaining {
            EpochState::Boundary
        } else {
            EpochState::Within {
                remaining: remaining - process,
            }
        };

        Advance {
            mesh,
            process,
            next,
        }
    }
}

/// Inner feedback engine which is rebuilt on every meshing.
trait MeshedStream<C>: StreamMode + Sized {
    fn build(cipher: C, iv: &[u8], direction: Direction) -> Result<Self>;
    fn cipher(&self) -> &C;
    fn register(&self) -> &[u8];
}

impl<C: BlockCipher> MeshedStream<C> for Nofb<C> {
    fn build(cipher: C, iv: &[u8], _direction: Direction) -> Result<Self> {
        let block_size = cipher.block_size();
        Nofb::with_buffer_size(cipher, iv, block_size)
    }

    fn cipher(&self) -> &C {
        Nofb::cipher(self)
    }

    fn register(&self) -> &[u8] {
        Nofb::register(self)
    }
}

impl<C: BlockCipher> MeshedStream<C> for Cfb<C> {
    fn build(cipher: C, iv: &[u8], direction: Direction) -> Result<Self> {
        Cfb::ncfb(cipher, iv, direction)
    }

    fn cipher(&self) -> &C {
        Cfb::cipher(self)
    }

    fn register(&self) -> &[u8] {
        Cfb::register(self)
    }
}

struct KeyMeshing<F, E> {
    factory: F,
    direction: Direction,
    inner: E,
    state: EpochState,
    processed: u64,
    epoch: u64,
}

impl<F, E> KeyMeshing<F, E>
where
    F: BlockCipherFactory,
    E: MeshedStream<F::Cipher>,
{
    fn new(factory: F, key: &[u8], iv: &[u8], direction: Direction) -> Result<Self> {
        if key.len() != MESHING_KEY_SIZE {
            return Err(ModeError::InvalidKeyLength {
                expected: MESHING_KEY_SIZE,
                actual: key.len(),
            });
        }

        let cipher = factory.new_from_key(key)?;
        let block_size = cipher.block_size();
        if block_size == 0 || MESHING_KEY_SIZE % block_size != 0 {
            return Err(ModeError::Unsupported(
                "key meshing with a block size not dividing the key size",
            ));
        }
        let inner = E::build(cipher, iv, direction)?;

        Ok(Self {
            factory,
            direction,
            inner,
            state: EpochState::default(),
            processed: 0,
            epoch: 0,
        })
    }

    fn block_size(&self) -> usize {
        self.inner.cipher().block_size()
    }

    fn mesh(&mut self) -> Result<()> {
        let mut next_key = Zeroizing::new(MESHING_CONSTANT.to_vec());
        let block_size = self.block_size();
        for block in next_key.chunks_exact_mut(block_size) {
            self.inner.cipher().decrypt_block(block);
        }

        let cipher = self.factory.new_from_key(&next_key)?;
        let mut iv = Zeroizing::new(self.inner.register().to_vec());
        cipher.encrypt_block(&mut iv);

        self.inner = E::build(cipher, &iv, self.direction)?;
        self.epoch += 1;
        log::trace!(
            "Meshed key after {} bytes, entering epoch {}",
            self.processed,
            self.epoch
        );

        Ok(())
    }

    fn apply(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut rest = buf;
        while !rest.is_empty() {
            let step = self.state.advance(rest.len());
            if step.mesh {
                self.mesh()?;
            }

            let (head, tail) = std::mem::take(&mut rest).split_at_mut(step.process);
            self.inner.apply_keystream(head)?;
            self.state = step.next;
            self.processed += head.len() as u64;
            rest = tail;
        }

        Ok(())
    }
}

/// GOST output feedback with CryptoPro key meshing.
///
/// Encryption and decryption are the same operation.
pub struct Gofb<F: BlockCipherFactory> {
    meshing: KeyMeshing<F, Nofb<F::Cipher>>,
}

impl<F: BlockCipherFactory> Gofb<F> {
    /// Creates the mode for a [`MESHING_KEY_SIZE`] byte key, ciphers are built with `factory`.
    pub fn new(factory: F, key: &[u8], iv: &[u8]) -> Result<Self> {
        log::debug!("Setting up GOFB with key meshing");
        Ok(Self {
            meshing: KeyMeshing::new(factory, key, iv, Direction::Encrypt)?,
        })
    }

    pub fn block_size(&self) -> usize {
        self.meshing.block_size()
    }

    /// Total number of bytes processed so far.
    pub fn bytes_processed(&self) -> u64 {
        self.meshing.processed
    }

    /// Number of key meshings performed so far.
    pub fn epoch(&self) -> u64 {
        self.meshing.epoch
    }

    pub fn epoch_state(&self) -> EpochState {
        self.meshing.state
    }
}

impl<F: BlockCipherFactory> StreamMode for Gofb<F> {
    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<()> {
        self.meshing.apply(buf)
    }
}

/// GOST cipher feedback with CryptoPro key meshing.
pub struct Gcfb<F: BlockCipherFactory> {
    meshing: KeyMeshing<F, Cfb<F::Cipher>>,
}

impl<F: BlockCipherFactory> Gcfb<F> {
    /// Creates the mode for a [`MESHING_KEY_SIZE`] byte key, ciphers are built with `factory`.
    pub fn new(factory: F, key: &[u8], iv: &[u8], direction: Direction) -> Result<Self> {
        log::debug!("Setting up GCFB ({direction:?}) with key meshing");
        Ok(Self {
            meshing: KeyMeshing::new(factory, key, iv, direction)?,
        })
    }

    pub fn block_size(&self) -> usize {
        self.meshing.block_size()
    }

    /// Total number of bytes processed so far.
    pub fn bytes_processed(&self) -> u64 {
        self.meshing.processed
    }

    /// Number of key meshings performed so far.
    pub fn epoch(&self) -> u64 {
        self.meshing.epoch
    }

    pub fn epoch_state(&self) -> EpochState {
        self.meshing.state
    }
}

impl<F: BlockCipherFactory> StreamMode for Gcfb<F> {
    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<()> {
        self.meshing.apply(buf)
    }
}
