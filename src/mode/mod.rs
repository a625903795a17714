//! Modes of operation turning a [`BlockCipher`](crate::primitive::BlockCipher) into usable
//! encryption primitives.
//!
//! Stream modes ([`StreamMode`]) process data of arbitrary length and keep their feedback state
//! between calls, so a message may be fed in chunks of any size. Block modes ([`BlockMode`]) only
//! accept whole blocks. Every entry point validates its arguments before touching any state.

mod cfb;
mod ecb;
mod g3413ctr;
mod gost;
mod ige;
mod keystream;
mod ofb;
mod ofbnlf;
mod pcbc;

pub use cfb::{Cfb, Cfb1};
pub use ecb::Ecb;
pub use g3413ctr::G3413Ctr;
pub use gost::{Advance, EpochState, Gcfb, Gofb, MESHING_INTERVAL, MESHING_KEY_SIZE};
pub use ige::Ige;
pub use keystream::KeystreamOptions;
pub use ofb::{Nofb, Ofb8};
pub use ofbnlf::OfbNlf;
pub use pcbc::Pcbc;

use std::ops::Range;

use crate::{
    error::{ModeError, Result},
    overlap::{self, Windows},
    util::ensure_output_len,
};

/// A mode which XORs a keystream into data of any length.
pub trait StreamMode {
    /// Transforms `buf` in place and advances the state by `buf.len()` bytes.
    fn apply_keystream(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Transforms `src` into `dst[..src.len()]`. The borrows cannot alias, use
    /// [`xor_key_stream_within`](Self::xor_key_stream_within) for windows of one buffer.
    fn xor_key_stream(&mut self, dst: &mut [u8], src: &[u8]) -> Result<()> {
        ensure_output_len(dst, src.len())?;
        let dst = &mut dst[..src.len()];
        dst.copy_from_slice(src);
        self.apply_keystream(dst)
    }

    /// Transforms the window `src` of `buf` into the equally long window starting at `dst_start`.
    /// Both windows may coincide, a partial overlap is rejected.
    fn xor_key_stream_within(
        &mut self,
        buf: &mut [u8],
        src: Range<usize>,
        dst_start: usize,
    ) -> Result<()> {
        match overlap::split_windows(buf, src, dst_start)? {
            Windows::InPlace(data) => self.apply_keystream(data),
            Windows::Split { src, dst } => self.xor_key_stream(dst, src),
        }
    }
}

/// A mode which transforms whole blocks.
pub trait BlockMode {
    /// Returns the block size of the underlying primitive.
    fn block_size(&self) -> usize;

    /// Transforms `buf` in place, `buf.len()` has to be a multiple of the block size.
    fn crypt_blocks_in_place(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Transforms `src` into `dst[..src.len()]`, `src.len()` has to be a multiple of the block size.
    fn crypt_blocks(&mut self, dst: &mut [u8], src: &[u8]) -> Result<()> {
        ensure_aligned(src.len(), self.block_size())?;
        ensure_output_len(dst, src.len())?;
        let dst = &mut dst[..src.len()];
        dst.copy_from_slice(src);
        self.crypt_blocks_in_place(dst)
    }

    /// Transforms the window `src` of `buf` into the equally long window starting at `dst_start`.
    fn crypt_blocks_within(
        &mut self,
        buf: &mut [u8],
        src: Range<usize>,
        dst_start: usize,
    ) -> Result<()> {
        match overlap::split_windows(buf, src, dst_start)? {
            Windows::InPlace(data) => self.crypt_blocks_in_place(data),
            Windows::Split { src, dst } => self.crypt_blocks(dst, src),
        }
    }
}

/// Chaining modes which can be re-seeded to process an independent message.
pub trait ResetIv {
    /// Returns the IV length in bytes.
    fn iv_size(&self) -> usize;

    /// Replaces the chaining state with a fresh IV.
    fn set_iv(&mut self, iv: &[u8]) -> Result<()>;
}

pub(crate) fn ensure_iv_len(iv: &[u8], expected: usize) -> Result<()> {
    if iv.len() != expected {
        log::debug!("Rejecting IV of {} bytes, expected {expected}", iv.len());
        return Err(ModeError::InvalidIvLength {
            expected,
            actual: iv.len(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_aligned(len: usize, block_size: usize) -> Result<()> {
    if len % block_size != 0 {
        return Err(ModeError::NotBlockAligned { len, block_size });
    }
    Ok(())
}
